//! This module contains the configuration file data model.
//!
//! All [`Option`][enum@std::option::Option] fields are optional and are
//! filled in by [`normalize`][fn@crate::config::normalize] and
//! [`reconcile_formatters`][fn@crate::config::reconcile_formatters] before a
//! document is installed.
//!
//! # Example configuration file.
//!
//! ```toml
//! version = 1
//! disable_existing_loggers = false
//!
//! # declare a formatter named "plain"
//! [formatter.plain]
//! format = "${rec:message}" # a record template, fields are ${rec:...} tokens
//!
//! # declare a handler named "console"
//! [handler.console]
//! type = "console" # writes to the terminal; the other kind is "file"
//! formatter = "plain" # optional; inferred from "format" or the default when missing
//! level = "info" # records below this severity are dropped by this handler
//!
//! # declare a handler named "audit"
//! [handler.audit]
//! type = "file"
//! path = "audit.log"
//! format = "detailed" # named format override: "standard", "user" or "detailed"
//!
//! # declare a logger named "myapp"
//! [logger.myapp]
//! handlers = ["console", "audit"]
//! level = "debug"
//! force = true # pin this entry; later documents may not redefine "myapp"
//!
//! # the optional root logger entry
//! [root]
//! handlers = ["console"]
//! level = "warning"
//! ```

use crate::error::TermlogConfigError;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Severity levels, ascending. `SUCCESS` is the custom level sitting between
/// `INFO` and `WARNING`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Debug,
    Info,
    Success,
    Warning,
    Error,
    Critical,
}

impl Level {
    pub const ALL: [Level; 6] = [
        Level::Debug,
        Level::Info,
        Level::Success,
        Level::Warning,
        Level::Error,
        Level::Critical,
    ];

    /// The numeric severity value.
    pub fn value(self) -> u8 {
        match self {
            Level::Debug => 10,
            Level::Info => 20,
            Level::Success => 25,
            Level::Warning => 30,
            Level::Error => 40,
            Level::Critical => 50,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Success => "SUCCESS",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        }
    }

    /// Looks a level up by its numeric value.
    pub fn from_value(value: u8) -> Result<Level, TermlogConfigError> {
        Level::ALL
            .into_iter()
            .find(|level| level.value() == value)
            .ok_or_else(|| TermlogConfigError::InvalidLevel {
                given: value.to_string(),
                expected: Level::expected_names(),
            })
    }

    /// Case-insensitive name lookup. `WARN` is accepted as an alias for
    /// `WARNING`; anything unrecognized is an error, never a silent default.
    pub fn parse(name: &str) -> Result<Level, TermlogConfigError> {
        let upper = name.to_uppercase();
        if upper == "WARN" {
            return Ok(Level::Warning);
        }
        Level::ALL
            .into_iter()
            .find(|level| level.as_str() == upper)
            .ok_or_else(|| TermlogConfigError::InvalidLevel {
                given: name.to_owned(),
                expected: Level::expected_names(),
            })
    }

    fn expected_names() -> String {
        Level::ALL
            .into_iter()
            .map(Level::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three canonical severity-oriented record layouts.
///
/// Configuration files refer to these by name only (in a handler's `format`
/// key); the bound template strings are fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    Standard,
    User,
    Detailed,
}

impl Format {
    pub fn name(self) -> &'static str {
        match self {
            Format::Standard => "standard",
            Format::User => "user",
            Format::Detailed => "detailed",
        }
    }

    /// The record template bound to this format.
    pub fn template(self) -> &'static str {
        match self {
            Format::Standard => {
                "[ ${rec:level} ] ${rec:time} ${rec:name} ${rec:context} ${rec:message}"
            }
            Format::User => "${rec:message}",
            Format::Detailed => {
                "[${rec:level}] ${rec:time} ${rec:file}:${rec:line} ${rec:name} ${rec:context} ${rec:message}"
            }
        }
    }

    /// Column where the message starts when this template is rendered; used
    /// to indent the continuation lines of wrapped messages.
    pub fn padding(self) -> usize {
        match self {
            Format::Standard => 75,
            Format::User => 0,
            Format::Detailed => 67,
        }
    }

    /// Case-insensitive name lookup, restricted to the three enum names.
    ///
    /// This is deliberately the only way a configuration file can reference
    /// a format: templates are data, never evaluated expressions.
    pub fn parse(name: &str) -> Option<Format> {
        match name.to_lowercase().as_str() {
            "standard" => Some(Format::Standard),
            "user" => Some(Format::User),
            "detailed" => Some(Format::Detailed),
            _ => None,
        }
    }
}

/// A named record template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatterConfig {
    /// The template string, holding `${rec:field}` tokens.
    pub format: String,
}

/// Supported handler sinks.
/// # Example
/// ```toml
/// [handler.console]
/// type = "console"
/// [handler.audit]
/// type = "file"
/// path = "audit.log"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[serde(tag = "type")]
pub enum HandlerKind {
    /// Writes to the terminal (standard error).
    Console,
    /// Appends to a file, opened lazily on the first record.
    File { path: String },
}

/// A handler declaration: a sink, a threshold, and a formatter reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerConfig {
    #[serde(flatten)]
    pub kind: HandlerKind,
    /// Name of a `formatter` entry. May be absent before reconciliation,
    /// after which it always resolves.
    pub formatter: Option<String>,
    /// Records below this severity are dropped by this handler.
    /// Defaults to `debug`, i.e. no threshold.
    pub level: Option<Level>,
    /// Named-format override, one of `standard`, `user`, `detailed`.
    /// Consumed by reconciliation; an unrecognized name is a
    /// configuration-validity error.
    pub format: Option<String>,
}

/// A logger declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Names of `handler` entries.
    #[serde(default)]
    pub handlers: Vec<String>,
    /// Logger threshold. Defaults to `warning`.
    pub level: Option<Level>,
    /// Normalized to `false` when unset.
    pub propagate: Option<bool>,
    /// When `true`, this entry is pinned: any later document defining the
    /// same logger name has that entry stripped before installation.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub force: bool,
}

/// This represents the whole configuration file.
///
/// Invariants after [`normalize`][fn@crate::config::normalize] and
/// [`reconcile_formatters`][fn@crate::config::reconcile_formatters]:
/// `version` and `disable_existing_loggers` are present, every logger has an
/// explicit `propagate`, and every handler's `formatter` names an entry
/// present in `formatters`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    pub version: Option<u32>,
    pub disable_existing_loggers: Option<bool>,
    #[serde(rename = "formatter", default, skip_serializing_if = "IndexMap::is_empty")]
    pub formatters: IndexMap<String, FormatterConfig>,
    #[serde(rename = "handler", default, skip_serializing_if = "IndexMap::is_empty")]
    pub handlers: IndexMap<String, HandlerConfig>,
    #[serde(rename = "logger", default, skip_serializing_if = "IndexMap::is_empty")]
    pub loggers: IndexMap<String, LoggerConfig>,
    pub root: Option<LoggerConfig>,
}

impl LogConfig {
    /// The built-in default document: one console handler at `level` with
    /// the given record template, wired to `logger_name` (and to `root` when
    /// `root_level` is given).
    pub fn default_for(
        logger_name: &str,
        level: Level,
        template: &str,
        root_level: Option<Level>,
    ) -> LogConfig {
        let mut formatters = IndexMap::new();
        formatters.insert(
            "default".to_owned(),
            FormatterConfig {
                format: template.to_owned(),
            },
        );

        let mut handlers = IndexMap::new();
        handlers.insert(
            "console".to_owned(),
            HandlerConfig {
                kind: HandlerKind::Console,
                formatter: Some("default".to_owned()),
                level: Some(level),
                format: None,
            },
        );

        let mut loggers = IndexMap::new();
        loggers.insert(
            logger_name.to_owned(),
            LoggerConfig {
                handlers: vec!["console".to_owned()],
                level: Some(level),
                propagate: None,
                force: false,
            },
        );

        LogConfig {
            version: None,
            disable_existing_loggers: None,
            formatters,
            handlers,
            loggers,
            root: root_level.map(|root_level| LoggerConfig {
                handlers: vec!["console".to_owned()],
                level: Some(root_level),
                propagate: None,
                force: false,
            }),
        }
    }

    /// The document for the crate's own bootstrap logger: a file handler so
    /// internal diagnostics never pollute the terminal.
    pub fn internal(level: Level) -> LogConfig {
        let mut formatters = IndexMap::new();
        formatters.insert(
            "default".to_owned(),
            FormatterConfig {
                format: Format::Detailed.template().to_owned(),
            },
        );

        let mut handlers = IndexMap::new();
        handlers.insert(
            "file".to_owned(),
            HandlerConfig {
                kind: HandlerKind::File {
                    path: crate::config::INTERNAL_LOG_FILE.to_owned(),
                },
                formatter: Some("default".to_owned()),
                level: Some(level),
                format: None,
            },
        );

        let mut loggers = IndexMap::new();
        loggers.insert(
            crate::config::INTERNAL_LOGGER_NAME.to_owned(),
            LoggerConfig {
                handlers: vec!["file".to_owned()],
                level: Some(level),
                propagate: None,
                force: false,
            },
        );

        LogConfig {
            version: None,
            disable_existing_loggers: None,
            formatters,
            handlers,
            loggers,
            root: None,
        }
    }
}
