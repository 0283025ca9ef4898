use termlog_config::config::model::{Format, Level, LogConfig};
use termlog_config::config::{Environment, LoggerRequest};
use termlog_config::logger::color::FOREGROUND_COLOR_PREFIX;
use termlog_config::logger::{wrap_message, Formatter, Handler, COLUMN_WIDTH};
use termlog_config::TermlogConfigError;

use std::fs;

#[test]
fn test_auto_configured_logger_is_named_after_the_calling_file() -> Result<(), TermlogConfigError> {
    let env = Environment::new();
    let logger = env.get_logger(LoggerRequest::new().use_local_config(false))?;

    // this file is tests/logger.rs
    assert_eq!(logger.name(), "logger");
    assert_eq!(logger.handler_count(), 1);

    Ok(())
}

#[test]
fn test_colorization_happens_exactly_once() -> Result<(), TermlogConfigError> {
    let env = Environment::new();
    let request = LoggerRequest::new().name("paint").use_local_config(false);

    let logger = env.get_logger(request.clone())?;
    let ids: Vec<u64> = logger.formatters().iter().map(Formatter::id).collect();
    assert_eq!(ids.len(), 1);

    for _ in 0..5 {
        env.get_logger(request.clone())?;
    }

    let formatters = logger.formatters();
    assert_eq!(formatters.len(), 1);
    assert_eq!(formatters[0].id(), ids[0]);
    // one color prefix, no matter how many times the logger was requested
    assert_eq!(
        formatters[0]
            .template()
            .matches(FOREGROUND_COLOR_PREFIX)
            .count(),
        1
    );

    Ok(())
}

#[test]
fn test_level_override_keeps_formatter_identity() -> Result<(), TermlogConfigError> {
    let env = Environment::new();
    let request = LoggerRequest::new().name("tuner").use_local_config(false);

    let logger = env.get_logger(request.clone().level(Level::Debug))?;
    assert_eq!(logger.level(), Level::Debug);
    let ids: Vec<u64> = logger.formatters().iter().map(Formatter::id).collect();

    let logger = env.get_logger(request.level(Level::Error))?;
    assert_eq!(logger.level(), Level::Error);
    let after: Vec<u64> = logger.formatters().iter().map(Formatter::id).collect();

    // only the threshold moved, the colorized formatters were not touched
    assert_eq!(ids, after);

    Ok(())
}

#[test]
fn test_format_override_replaces_template_in_place() -> Result<(), TermlogConfigError> {
    let env = Environment::new();
    let request = LoggerRequest::new().name("styled").use_local_config(false);

    let logger = env.get_logger(request.clone())?;
    let before = logger.formatters();

    let logger = env.get_logger(request.format_template("${rec:message}"))?;
    let after = logger.formatters();

    assert_eq!(after.len(), 1);
    // same identity, new template, taken verbatim without color escapes
    assert_eq!(after[0].id(), before[0].id());
    assert_eq!(after[0].template(), "${rec:message}");
    assert_eq!(after[0].template().matches(FOREGROUND_COLOR_PREFIX).count(), 0);

    Ok(())
}

#[test]
fn test_invalid_level_fails_fast() {
    let env = Environment::new();
    let error = env
        .get_logger(
            LoggerRequest::new()
                .name("strict")
                .level_name("verbose")
                .use_local_config(false),
        )
        .expect_err("verbose is not a level");

    assert!(matches!(error, TermlogConfigError::InvalidLevel { .. }));
    // the request failed before touching the registry
    assert!(!env.registry().contains("strict"));
}

#[test]
fn test_config_file_applies_at_most_once() -> Result<(), TermlogConfigError> {
    let env = Environment::new();
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("termlog.toml");
    fs::write(
        &path,
        r#"
        [handler.console]
        type = "console"
        level = "debug"

        [logger.filecfg]
        handlers = ["console"]
        level = "debug"
        "#,
    )?;

    assert!(env.apply_path(&path)?);
    assert!(env.is_applied(&path));

    let logger = env.registry().get("filecfg");
    assert_eq!(logger.handler_count(), 1);

    // a handler attached by hand survives later facade calls because the
    // file is never installed a second time
    let (memory, buffer) = Handler::memory(Level::Debug);
    logger.add_handler(memory);

    assert!(!env.apply_path(&path)?);
    assert_eq!(logger.handler_count(), 2);

    logger.info("kept");
    assert!(buffer.lock().unwrap().contains("kept"));

    Ok(())
}

#[test]
fn test_invalid_document_installs_nothing() -> Result<(), TermlogConfigError> {
    let env = Environment::new();
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("termlog.toml");
    fs::write(
        &path,
        r#"
        [logger.broken]
        handlers = ["nope"]
        "#,
    )?;

    let error = env.apply_path(&path).expect_err("dangling handler reference");
    assert!(matches!(error, TermlogConfigError::HandlerNotFound { .. }));
    assert!(!env.is_applied(&path));
    assert!(!env.registry().contains("broken"));

    Ok(())
}

#[test]
fn test_unreadable_file_falls_back() -> Result<(), TermlogConfigError> {
    let env = Environment::new();
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("termlog.toml");
    fs::write(&path, "this ][ is not toml")?;

    // reported through the internal logger, the caller moves on to defaults
    assert!(!env.apply_path(&path)?);
    assert!(!env.is_applied(&path));

    Ok(())
}

#[test]
fn test_forced_logger_survives_later_documents() -> Result<(), TermlogConfigError> {
    let env = Environment::new();

    let mut first: LogConfig = toml::from_str(
        r#"
        [handler.console]
        type = "console"

        [logger.pinned]
        handlers = ["console"]
        level = "debug"
        force = true
        "#,
    )?;
    env.apply_config(&mut first, true)?;

    let logger = env.registry().get("pinned");
    assert_eq!(logger.level(), Level::Debug);

    let mut second: LogConfig = toml::from_str(
        r#"
        [handler.console]
        type = "console"

        [logger.pinned]
        handlers = ["console"]
        level = "error"
        "#,
    )?;
    env.apply_config(&mut second, true)?;

    // the second document's entry was stripped before installation
    assert!(!second.loggers.contains_key("pinned"));
    assert_eq!(logger.level(), Level::Debug);

    Ok(())
}

#[test]
fn test_rendering_and_context_tags() -> Result<(), TermlogConfigError> {
    let env = Environment::new();
    let logger = env.registry().get("memo");
    logger.set_level(Level::Debug);

    let (mut handler, buffer) = Handler::memory(Level::Debug);
    handler.set_formatter(Formatter::new(Format::Standard.template()));
    logger.add_handler(handler);

    logger.info("plain record");
    logger.set_context("submodule");
    logger.warning("tagged record");
    logger.clear_context();
    logger.error("untagged again");

    let text = buffer.lock().unwrap().clone();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);

    // the level column is right-aligned to seven characters
    assert!(lines[0].starts_with("[    INFO ]"));
    // no context renders as the placeholder tag
    assert!(lines[0].contains("[ - ] plain record"));
    // the context is truncated to three characters
    assert!(lines[1].contains("[sub] tagged record"));
    assert!(lines[2].contains("[ - ] untagged again"));

    Ok(())
}

#[test]
fn test_handler_threshold_is_independent() -> Result<(), TermlogConfigError> {
    let env = Environment::new();
    let logger = env.registry().get("sieve");
    logger.set_level(Level::Debug);

    let (handler, buffer) = Handler::memory(Level::Success);
    logger.add_handler(handler);

    logger.info("too quiet");
    logger.success("loud enough");

    let text = buffer.lock().unwrap().clone();
    assert!(!text.contains("too quiet"));
    assert!(text.contains("loud enough"));

    Ok(())
}

#[test]
fn test_propagation_reaches_parent_handlers() -> Result<(), TermlogConfigError> {
    let env = Environment::new();

    let mut config: LogConfig = toml::from_str(
        r#"
        [logger.kid]
        handlers = []
        level = "debug"
        propagate = true
        "#,
    )?;
    env.apply_config(&mut config, true)?;

    let root = env.registry().get("root");
    let (handler, buffer) = Handler::memory(Level::Debug);
    root.add_handler(handler);

    let kid = env.registry().get("kid");
    kid.debug("handed up");

    // records handed up bypass the root logger's own threshold
    assert!(buffer.lock().unwrap().contains("handed up"));

    Ok(())
}

#[test]
fn test_unconfigured_name_still_reaches_root_handlers() -> Result<(), TermlogConfigError> {
    let env = Environment::new();

    // the document only configures root, never "app"
    let mut config: LogConfig = toml::from_str(
        r#"
        [handler.console]
        type = "console"

        [root]
        handlers = ["console"]
        level = "debug"
        "#,
    )?;
    env.apply_config(&mut config, true)?;

    let logger = env.get_logger(
        LoggerRequest::new()
            .name("app")
            .use_local_config(false)
            .auto_configure(false),
    )?;
    assert_eq!(logger.handler_count(), 0);

    let root = env.registry().get("root");
    let (handler, buffer) = Handler::memory(Level::Debug);
    root.add_handler(handler);

    // a bare logger is not silent, it hands its records up to root
    logger.warning("still visible");
    assert!(buffer.lock().unwrap().contains("still visible"));

    Ok(())
}

#[test]
fn test_manual_handler_colorized_only_on_explicit_pass() -> Result<(), TermlogConfigError> {
    let env = Environment::new();
    let request = LoggerRequest::new().name("manual").use_local_config(false);
    let logger = env.get_logger(request.clone())?;

    let (mut handler, _buffer) = Handler::memory(Level::Debug);
    handler.set_formatter(Formatter::new("${rec:message}"));
    logger.add_handler(handler);

    // later facade calls leave the attached handler untouched
    env.get_logger(request)?;
    let formatters = logger.formatters();
    assert_eq!(formatters.len(), 2);
    assert_eq!(formatters[1].template(), "${rec:message}");

    // the colorization pass is available on demand, and stays idempotent
    env.post_config_colorization(&["manual".to_owned()], Format::Standard);
    env.post_config_colorization(&["manual".to_owned()], Format::Standard);
    let formatters = logger.formatters();
    assert_eq!(
        formatters[1]
            .template()
            .matches(FOREGROUND_COLOR_PREFIX)
            .count(),
        1
    );

    Ok(())
}

#[test]
fn test_exception_logs_the_cause_chain() -> Result<(), TermlogConfigError> {
    #[derive(Debug, thiserror::Error)]
    #[error("inner cause")]
    struct Inner;

    #[derive(Debug, thiserror::Error)]
    #[error("outer failed")]
    struct Outer {
        #[source]
        inner: Inner,
    }

    let env = Environment::new();
    let logger = env.registry().get("oops");
    logger.set_level(Level::Debug);
    let (handler, buffer) = Handler::memory(Level::Debug);
    logger.add_handler(handler);

    let header = logger.exception(&Outer { inner: Inner });
    assert_eq!(header, "outer failed");

    let text = buffer.lock().unwrap().clone();
    assert!(text.contains("outer failed"));
    assert!(text.contains("caused by: inner cause"));

    Ok(())
}

#[test]
fn test_wrap_message_short_lines_untouched() {
    assert_eq!(wrap_message("hi", 75), "hi");

    // embedded newlines are kept, continuation lines are indented
    assert_eq!(wrap_message("a\nb", 4), format!("a\n{}b", "    "));
}

#[test]
fn test_wrap_message_prefers_whitespace_breaks() {
    let padding = COLUMN_WIDTH - 4;
    let wrapped = wrap_message("aaa bbb", padding);
    let lines: Vec<&str> = wrapped.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "aaa");
    assert_eq!(lines[1].trim_start(), "bbb");
}

#[test]
fn test_wrap_message_hard_breaks_unbroken_runs() {
    let padding = 20;
    let width = COLUMN_WIDTH - padding;
    let wrapped = wrap_message(&"x".repeat(2 * width + 92), padding);

    let lines: Vec<&str> = wrapped.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0].chars().count(), width);
    for line in &lines[1..] {
        assert!(line.starts_with(&" ".repeat(padding)));
        assert!(line.chars().count() <= COLUMN_WIDTH);
    }
    assert_eq!(lines[2].trim_start().chars().count(), 92);
}
