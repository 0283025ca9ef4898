//! The config module contains the data model for the configuration file, the
//! upward file discovery, and the [`Environment`][struct@Environment] that
//! turns configuration documents into live loggers.
//!
//! This uses the [`serde`][mod@serde] and [`toml`][mod@toml] crates to serialize and deserialize the configuration file.
//! Once the configuration is read from disk, environment variables are then resolved.
//!
//! See the [`interpolate`][mod@crate::interpolate] module for an understanding of how the variables are resolved.
//!
//! The [`model`][mod@model] submodule simply contains the configuration data model, start from there to understand how to create your termlog.toml.
//!
//! Most programs never call into this module directly and go through the
//! facade instead:
//!
//! - [`get_logger`][fn@get_logger] in any function, returns a ready logger named after the calling file.
//! - [`named_logger`][fn@named_logger] same, with an explicit name.
//! - [`LoggerRequest`][struct@LoggerRequest] when you need to override the level or format.

pub mod model;

use crate::error::TermlogConfigError;
use crate::interpolate::resolve_from_env_recursive;
use crate::logger::color::colorize;
use crate::logger::handle::{Formatter, Handler, Logger};
use crate::logger::registry::{Registry, ROOT_LOGGER_NAME};

use model::{Format, FormatterConfig, Level, LogConfig};

use indexmap::IndexSet;

use std::collections::{HashMap, HashSet};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, OnceLock};
use std::{env, fs};

/// The configuration file name searched for in the calling file's ancestor
/// directories.
pub const CONFIG_FILE_NAME: &str = "termlog.toml";

/// Environment variable overriding the search: may point at a configuration
/// file directly or at a directory containing [`CONFIG_FILE_NAME`].
pub const ENV_CONFIG_PATH: &str = "termlog_config";

/// Name of the crate's own bootstrap logger. The leading underscore keeps it
/// out of the way of application logger names.
pub const INTERNAL_LOGGER_NAME: &str = "_termlog";

/// File the bootstrap logger appends to, relative to the working directory.
pub const INTERNAL_LOG_FILE: &str = "termlog-internal.log";

/// Logger name used when no name was given and none can be derived from the
/// calling file path.
pub const DEFAULT_LOGGER_NAME: &str = "termlog";

/// The value is set in stone at `25`
///
/// This represents the `depth` with which [`resolve_from_env_recursive`][fn@resolve_from_env_recursive] is called by this module.
pub const RESOLVE_FROM_ENV_DEPTH: u8 = 25;

/// Reads a [`LogConfig`][struct@model::LogConfig] from `file_path`.
///
/// This function also resolves all environment variables `${env:key}` in all
/// [`toml String`][type@toml::Value::String] values, recursively up to
/// [`RESOLVE_FROM_ENV_DEPTH`] (see [`resolve_from_env_recursive`][fn@crate::interpolate::toml::resolve_from_env_recursive]).
///
/// # Returns
/// A [`LogConfig`][struct@model::LogConfig] object or a [`TermlogConfigError`][enum@TermlogConfigError] in case the file could not be read, is not syntactically toml, or references a missing environment variable.
pub fn read_config(file_path: &Path) -> Result<LogConfig, TermlogConfigError> {
    let toml_string = fs::read_to_string(file_path)?;

    let mut toml_value: toml::Value = toml::from_str(&toml_string)?;
    crate::interpolate::toml::resolve_from_env_recursive(&mut toml_value, RESOLVE_FROM_ENV_DEPTH)?;

    let config: LogConfig = toml_value.try_into()?;

    Ok(config)
}

/// Writes `config` to `file_path` as a toml document.
///
/// This is useful if you don't want to bother reading the docs, instead you
/// let the compiler guide you on what fields the various data structures
/// have, then dump the result and keep it as your `termlog.toml`.
pub fn write_config(config: &LogConfig, file_path: &Path) -> Result<(), TermlogConfigError> {
    let toml_string = toml::to_string(config)?;

    let mut file = fs::File::create(file_path)?;
    file.write_all(toml_string.as_bytes())?;

    Ok(())
}

/// Searches for a configuration file and returns its path.
///
/// The function will first check if the environment variable
/// [`termlog_config`][const@ENV_CONFIG_PATH] is set. If set it will resolve
/// all `${env:key}` tokens where `key` is another environment variable (see
/// [`resolve_from_env_recursive`][fn@resolve_from_env_recursive]); should
/// errors occur during resolution, the original value is used as-is.
///
/// - If the variable points to an existing file, that path is returned.
/// - If it points to an existing directory, `directory/termlog.toml` is
///   returned when that file exists.
///
/// Otherwise the search walks upward: starting from the directory containing
/// `calling_file` (or the current working directory when that cannot be
/// determined), each ancestor directory is checked for a file named
/// [`termlog.toml`][const@CONFIG_FILE_NAME] up to the file system root. The
/// first hit wins; symlinks are resolved before walking, so the search runs
/// over real directories.
///
/// # Parameters
/// * `calling_file` - Source path of the caller, the origin of the upward walk.
///
/// # Returns
/// * `Option<PathBuf>` - The path to the configuration file if found, otherwise `None`.
pub fn find_config_path(calling_file: &Path) -> Option<PathBuf> {
    if let Ok(env_path) = env::var(ENV_CONFIG_PATH) {
        let env_path = resolve_from_env_recursive(env_path.as_str(), RESOLVE_FROM_ENV_DEPTH, "env")
            .unwrap_or(env_path);
        let env_path = PathBuf::from(env_path);

        if env_path.is_file() {
            return Some(env_path);
        }
        if env_path.is_dir() {
            let candidate = env_path.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }

    let start = calling_file
        .canonicalize()
        .ok()
        .and_then(|file| file.parent().map(Path::to_path_buf))
        .or_else(|| env::current_dir().ok())?;

    let mut dir: Option<&Path> = Some(start.as_path());
    while let Some(current) = dir {
        let candidate = current.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = current.parent();
    }

    None
}

/// Fills in the optional document fields with their defaults: `version = 1`,
/// `disable_existing_loggers = false`, and `propagate = false` on every
/// logger entry (including `root`) that left it unset.
///
/// Explicit values are never overwritten; a normalized document is
/// serialization-stable.
pub fn normalize(config: &mut LogConfig) {
    if config.version.is_none() {
        config.version = Some(1);
    }
    if config.disable_existing_loggers.is_none() {
        config.disable_existing_loggers = Some(false);
    }
    for logger in config.loggers.values_mut() {
        if logger.propagate.is_none() {
            logger.propagate = Some(false);
        }
    }
    if let Some(root) = &mut config.root {
        if root.propagate.is_none() {
            root.propagate = Some(false);
        }
    }
}

/// Resolves every handler's formatter reference so that
/// [`install`][fn@crate::logger::registry::Registry::install] never meets a
/// dangling one.
///
/// For each handler, in declaration order:
/// - A `format` key is consumed: its value must name one of the three
///   canonical formats or the whole document is rejected with
///   [`UnknownFormat`][type@TermlogConfigError::UnknownFormat].
/// - A handler without a `formatter` reference gets one named after the
///   chosen format (`default_format` when no `format` key was given either).
/// - A referenced formatter that has no `formatter` entry yet is created,
///   bound to the chosen format's template.
///
/// Handlers that already reference an existing formatter entry are left
/// untouched.
pub fn reconcile_formatters(
    config: &mut LogConfig,
    default_format: Format,
) -> Result<(), TermlogConfigError> {
    let LogConfig {
        formatters,
        handlers,
        ..
    } = config;

    for (handler_name, handler) in handlers.iter_mut() {
        let format = match handler.format.take() {
            Some(name) => {
                Format::parse(&name).ok_or_else(|| TermlogConfigError::UnknownFormat {
                    format: name.clone(),
                    handler: handler_name.clone(),
                })?
            }
            None => default_format,
        };

        let formatter_name = match &handler.formatter {
            Some(existing) => existing.clone(),
            None => {
                let inferred = format.name().to_owned();
                handler.formatter = Some(inferred.clone());
                inferred
            }
        };

        if !formatters.contains_key(&formatter_name) {
            formatters.insert(
                formatter_name,
                FormatterConfig {
                    format: format.template().to_owned(),
                },
            );
        }
    }

    Ok(())
}

/// Derives a logger name from the calling source file: the file stem, except
/// that `mod`, `lib` and `main` name nothing useful, in which case the
/// nearest enclosing directory that is not `src` is used instead.
pub fn derive_logger_name(calling_file: &str) -> String {
    let path = Path::new(calling_file);
    let stem = match path.file_stem().and_then(|stem| stem.to_str()) {
        Some(stem) => stem,
        None => return DEFAULT_LOGGER_NAME.to_owned(),
    };
    if matches!(stem, "mod" | "lib" | "main") {
        let mut dir = path.parent();
        while let Some(current) = dir {
            if let Some(name) = current.file_name().and_then(|name| name.to_str()) {
                if name != "src" {
                    return name.to_owned();
                }
            }
            dir = current.parent();
        }
    }
    stem.to_owned()
}

/// The bookkeeping an [`Environment`] guards behind one mutex.
#[derive(Default)]
struct EnvState {
    /// Configuration files already installed, in application order. A path
    /// in this set is never installed a second time.
    applied_configs: IndexSet<PathBuf>,
    /// Parsed documents by path; hits skip disk and reuse the parse.
    config_cache: HashMap<PathBuf, LogConfig>,
    /// Per logger name, the identities of formatters already wrapped in
    /// color escapes. Also doubles as the "has been configured" marker.
    colorized: HashMap<String, HashSet<u64>>,
    /// Logger names pinned by a `force = true` entry; stripped out of every
    /// later document.
    forced_loggers: Vec<String>,
}

/// One self-contained logging world: a registry of named loggers plus all
/// the configuration bookkeeping (applied files, parsed-document cache,
/// colorized formatters, forced loggers).
///
/// Programs use the process-wide instance behind
/// [`global`][fn@Environment::global] through the facade functions; tests
/// construct their own with [`new`][fn@Environment::new] so they cannot
/// observe each other's state.
pub struct Environment {
    registry: Registry,
    internal: Logger,
    state: Mutex<EnvState>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// A fresh environment with only the bootstrap logger configured: a
    /// file handler on [`INTERNAL_LOG_FILE`] at the warning threshold, so
    /// the crate's own diagnostics never pollute the terminal.
    pub fn new() -> Environment {
        let registry = Registry::new();
        let internal = registry.get(INTERNAL_LOGGER_NAME);
        let environment = Environment {
            registry,
            internal,
            state: Mutex::new(EnvState::default()),
        };

        let mut config = LogConfig::internal(Level::Warning);
        // the internal document is a fixed constant with no dangling
        // references, installation cannot fail
        let _ = environment.apply_config(&mut config, true);

        environment
    }

    /// The process-wide environment the facade functions operate on,
    /// created on first use.
    pub fn global() -> &'static Environment {
        static GLOBAL: OnceLock<Environment> = OnceLock::new();
        GLOBAL.get_or_init(Environment::new)
    }

    fn state(&self) -> MutexGuard<'_, EnvState> {
        // a panic while holding the lock leaves the bookkeeping usable
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The bootstrap logger. Applications may raise its threshold to
    /// `debug` to watch the configuration machinery at work.
    pub fn internal_logger(&self) -> &Logger {
        &self.internal
    }

    /// Whether `path` is in the applied-configuration ledger.
    pub fn is_applied(&self, path: &Path) -> bool {
        self.state().applied_configs.contains(path)
    }

    /// The logger names that went through configuration (installed from a
    /// document or auto-configured), in no particular order.
    pub fn configured_names(&self) -> Vec<String> {
        self.state().colorized.keys().cloned().collect()
    }

    /// Drops every named logger and forgets all bookkeeping, then
    /// re-installs the bootstrap document. The environment behaves as if
    /// freshly constructed; previously handed-out [`Logger`] handles keep
    /// working but are orphaned from the registry.
    pub fn reset(&self) {
        {
            let mut state = self.state();
            state.applied_configs.clear();
            state.config_cache.clear();
            state.colorized.clear();
            state.forced_loggers.clear();
        }
        self.registry.clear();

        let mut config = LogConfig::internal(Level::Warning);
        let _ = self.apply_config(&mut config, true);
    }

    /// Normalizes, reconciles and installs `config`, then colorizes the
    /// console formatters of every logger the document configured.
    ///
    /// The document is mutated in place: forced logger names are stripped,
    /// defaults filled in, formatter references resolved. Entries carrying
    /// `force = true` are recorded as pinned before installation.
    ///
    /// # Parameters
    /// * `config` - The document to install.
    /// * `skip_colorization` - Leave the configured formatters untouched; used for the bootstrap document, whose file sink must stay escape-free.
    ///
    /// # Returns
    /// A [`TermlogConfigError`][enum@TermlogConfigError] when the document is invalid (unknown format name, dangling handler or formatter reference). An invalid document installs nothing.
    pub fn apply_config(
        &self,
        config: &mut LogConfig,
        skip_colorization: bool,
    ) -> Result<(), TermlogConfigError> {
        normalize(config);
        self.scrape_forced(config);
        reconcile_formatters(config, Format::Standard)?;

        self.internal.debug(format_args!(
            "installing configuration :\n{}",
            serde_json::to_string_pretty(&*config)
                .unwrap_or_else(|error| format!("<configuration not printable : {error}>"))
        ));

        self.registry.install(config)?;

        if !skip_colorization {
            let mut names: Vec<String> = config
                .loggers
                .keys()
                .filter(|name| !name.is_empty())
                .cloned()
                .collect();
            if config.root.is_some() {
                names.push(ROOT_LOGGER_NAME.to_owned());
            }
            self.post_config_colorization(&names, Format::Standard);
        }

        Ok(())
    }

    /// Strips entries for pinned logger names out of `config`, then records
    /// the names this document pins with `force = true`.
    fn scrape_forced(&self, config: &mut LogConfig) {
        let mut state = self.state();
        for name in &state.forced_loggers {
            if config.loggers.shift_remove(name).is_some() {
                self.internal.debug(format_args!(
                    "logger `{name}` is forced, dropping its entry from the incoming configuration"
                ));
            }
        }
        for (name, logger) in &config.loggers {
            if logger.force && !state.forced_loggers.contains(name) {
                state.forced_loggers.push(name.clone());
            }
        }
    }

    /// Ensures every named logger writes colored terminal output, exactly
    /// once per formatter.
    ///
    /// For each name:
    /// - A logger with no handlers at all gets a debug-threshold console
    ///   handler carrying a colorized `default_format` template.
    /// - Each handler whose formatter identity is already recorded for this
    ///   name is skipped, which is what makes the pass idempotent.
    /// - Any other formatter is replaced by a colorized copy (a handler
    ///   without a formatter gets a colorized `default_format` one) and the
    ///   new identity is recorded.
    pub fn post_config_colorization(&self, logger_names: &[String], default_format: Format) {
        for name in logger_names {
            let logger = self.registry.get(name);
            let mut env = self.state();
            let mut state = logger.state();

            if state.handlers.is_empty() {
                let formatter = Formatter::new(colorize(default_format.template()));
                env.colorized
                    .entry(name.clone())
                    .or_default()
                    .insert(formatter.id());
                let mut handler = Handler::console(Level::Debug);
                handler.set_formatter(formatter);
                state.handlers.push(handler);
                continue;
            }

            for handler in state.handlers.iter_mut() {
                let replacement = match handler.formatter() {
                    Some(formatter) => {
                        let done = env
                            .colorized
                            .get(name)
                            .is_some_and(|ids| ids.contains(&formatter.id()));
                        if done {
                            None
                        } else {
                            Some(Formatter::new(colorize(formatter.template())))
                        }
                    }
                    None => Some(Formatter::new(colorize(default_format.template()))),
                };
                if let Some(formatter) = replacement {
                    env.colorized
                        .entry(name.clone())
                        .or_default()
                        .insert(formatter.id());
                    handler.set_formatter(formatter);
                }
            }
        }
    }

    fn load_cached(&self, path: &Path) -> Result<LogConfig, TermlogConfigError> {
        if let Some(config) = self.state().config_cache.get(path) {
            return Ok(config.clone());
        }
        let config = read_config(path)?;
        self.state()
            .config_cache
            .insert(path.to_owned(), config.clone());
        Ok(config)
    }

    /// Loads and installs the configuration file at `path`, at most once
    /// per environment lifetime.
    ///
    /// # Returns
    /// * `Ok(true)` - The file was installed by this call.
    /// * `Ok(false)` - The file was already in the ledger, or it could not be read or parsed; unreadable files are reported through the internal logger and the caller falls back to defaults.
    /// * `Err` - The file parsed but the document is invalid; this is a mistake worth surfacing rather than papering over.
    pub fn apply_path(&self, path: &Path) -> Result<bool, TermlogConfigError> {
        if self.is_applied(path) {
            self.internal.debug(format_args!(
                "configuration `{}` is already applied, skipping",
                path.display()
            ));
            return Ok(false);
        }

        let mut config = match self.load_cached(path) {
            Ok(config) => config,
            Err(error) => {
                self.internal.error(format_args!(
                    "could not load configuration `{}`, continuing with defaults : {error}",
                    path.display()
                ));
                return Ok(false);
            }
        };

        self.apply_config(&mut config, false)?;
        self.state().applied_configs.insert(path.to_owned());

        self.internal
            .info(format_args!("applied configuration `{}`", path.display()));

        Ok(true)
    }

    /// Installs the built-in default document (one colorized console
    /// handler) for `name`, unless that logger already went through
    /// configuration.
    fn apply_defaults_for(
        &self,
        name: &str,
        level: Level,
        template: &str,
    ) -> Result<bool, TermlogConfigError> {
        if self.state().colorized.contains_key(name) {
            self.internal.debug(format_args!(
                "logger `{name}` is already configured, skipping defaults"
            ));
            return Ok(false);
        }
        let mut config = LogConfig::default_for(name, level, template, None);
        self.apply_config(&mut config, false)?;
        Ok(true)
    }

    /// Resolves a [`LoggerRequest`] against this environment. This is the
    /// whole facade pipeline:
    ///
    /// 1. Validate the requested level, failing fast on an invalid one.
    /// 2. Derive the logger name from the calling file when none was given.
    /// 3. With `use_local_config`, search for a configuration file from the
    ///    calling file upward and install it (at most once per file).
    /// 4. When nothing was installed and `auto_configure` is set, fall back
    ///    to the built-in default document for this name.
    /// 5. Fetch the logger and apply the request's level override (the
    ///    threshold only, handlers and formatters keep their identity) and
    ///    format override (console handler templates, replaced in place so
    ///    the colorized identities survive).
    pub fn get_logger(&self, request: LoggerRequest) -> Result<Logger, TermlogConfigError> {
        let level = match &request.level {
            Some(level) => Some(level.validate()?),
            None => None,
        };
        let name = request
            .name
            .clone()
            .unwrap_or_else(|| derive_logger_name(request.calling_file));

        self.internal.set_context(name.as_str());
        self.internal.debug(format_args!(
            "logger `{name}` requested from `{}`",
            request.calling_file
        ));

        let mut applied = false;
        if request.use_local_config {
            if let Some(path) = find_config_path(Path::new(request.calling_file)) {
                applied = match self.apply_path(&path) {
                    Ok(applied) => applied,
                    Err(error) => {
                        self.internal.clear_context();
                        return Err(error);
                    }
                };
            } else {
                self.internal
                    .debug(format_args!("no configuration file found for `{name}`"));
            }
        }

        if !applied && request.auto_configure {
            let template = request
                .format
                .as_ref()
                .map(FormatArg::template)
                .unwrap_or(Format::Standard.template());
            let defaulted =
                self.apply_defaults_for(&name, level.unwrap_or(Level::Warning), template);
            if let Err(error) = defaulted {
                self.internal.clear_context();
                return Err(error);
            }
        }

        let logger = self.registry.get(&name);

        if let Some(level) = level {
            if logger.level() != level {
                self.internal.debug(format_args!(
                    "overriding level of `{name}` : {} -> {level}",
                    logger.level()
                ));
                logger.set_level(level);
            }
        }

        if let Some(format) = &request.format {
            let template = format.template();
            let mut state = logger.state();
            for handler in state.handlers.iter_mut() {
                if !handler.is_console() {
                    continue;
                }
                let differs = handler
                    .formatter()
                    .is_none_or(|formatter| formatter.template() != template);
                if differs {
                    // replaced in place: the formatter identity stays
                    // registered as colorized, so the explicit template is
                    // never wrapped in another layer of escapes
                    handler.set_template(template);
                }
            }
        }

        self.internal.clear_context();
        Ok(logger)
    }
}

/// Level override of a [`LoggerRequest`], kept as given so validation can
/// report exactly what the caller wrote.
#[derive(Debug, Clone)]
enum LevelArg {
    Typed(Level),
    Named(String),
    Value(u8),
}

impl LevelArg {
    fn validate(&self) -> Result<Level, TermlogConfigError> {
        match self {
            LevelArg::Typed(level) => Ok(*level),
            LevelArg::Named(name) => Level::parse(name),
            LevelArg::Value(value) => Level::from_value(*value),
        }
    }
}

/// Format override of a [`LoggerRequest`]: one of the canonical formats, or
/// a custom record template.
#[derive(Debug, Clone)]
enum FormatArg {
    Named(Format),
    Custom(String),
}

impl FormatArg {
    fn template(&self) -> &str {
        match self {
            FormatArg::Named(format) => format.template(),
            FormatArg::Custom(template) => template,
        }
    }
}

/// A request for a configured logger, built up with chained setters.
///
/// # Usage
/// ```no_run
/// use termlog_config::{Level, LoggerRequest};
///
/// let log = LoggerRequest::new()
///     .name("worker")
///     .level(Level::Debug)
///     .get_or_default();
/// log.info("worker starting");
/// ```
///
/// [`new`][fn@LoggerRequest::new] captures the calling file, which drives
/// both the default logger name and the origin of the configuration file
/// search; construct the request where the logger is used, not in a helper.
#[derive(Debug, Clone)]
pub struct LoggerRequest {
    name: Option<String>,
    level: Option<LevelArg>,
    format: Option<FormatArg>,
    use_local_config: bool,
    auto_configure: bool,
    calling_file: &'static str,
}

impl LoggerRequest {
    /// A request with the defaults: name derived from the calling file,
    /// configuration file search and auto-configuration both enabled, no
    /// overrides.
    #[track_caller]
    pub fn new() -> LoggerRequest {
        LoggerRequest {
            name: None,
            level: None,
            format: None,
            use_local_config: true,
            auto_configure: true,
            calling_file: std::panic::Location::caller().file(),
        }
    }

    /// Requests the logger registered under `name` instead of the one named
    /// after the calling file.
    pub fn name(mut self, name: impl Into<String>) -> LoggerRequest {
        self.name = Some(name.into());
        self
    }

    /// Overrides the logger threshold.
    pub fn level(mut self, level: Level) -> LoggerRequest {
        self.level = Some(LevelArg::Typed(level));
        self
    }

    /// Overrides the logger threshold by level name (case-insensitive, e.g.
    /// from a command line flag). An unknown name fails the request.
    pub fn level_name(mut self, name: impl Into<String>) -> LoggerRequest {
        self.level = Some(LevelArg::Named(name.into()));
        self
    }

    /// Overrides the logger threshold by numeric level value. A value that
    /// is not one of the defined levels fails the request.
    pub fn level_value(mut self, value: u8) -> LoggerRequest {
        self.level = Some(LevelArg::Value(value));
        self
    }

    /// Overrides the console handlers' record template with a canonical
    /// format.
    pub fn format(mut self, format: Format) -> LoggerRequest {
        self.format = Some(FormatArg::Named(format));
        self
    }

    /// Overrides the console handlers' record template with a custom
    /// `${rec:field}` template, taken verbatim (in particular, it is not
    /// wrapped in color escapes).
    pub fn format_template(mut self, template: impl Into<String>) -> LoggerRequest {
        self.format = Some(FormatArg::Custom(template.into()));
        self
    }

    /// Whether to search for and install a configuration file. Defaults to
    /// `true`.
    pub fn use_local_config(mut self, use_local_config: bool) -> LoggerRequest {
        self.use_local_config = use_local_config;
        self
    }

    /// Whether to fall back to the built-in default document when no
    /// configuration file applies. Defaults to `true`.
    pub fn auto_configure(mut self, auto_configure: bool) -> LoggerRequest {
        self.auto_configure = auto_configure;
        self
    }

    /// Resolves this request against the global [`Environment`].
    ///
    /// # Returns
    /// A [`TermlogConfigError`][enum@TermlogConfigError] when an override is invalid or a discovered configuration file is. Prefer [`get_or_default`][fn@LoggerRequest::get_or_default] outside of startup code.
    pub fn get(self) -> Result<Logger, TermlogConfigError> {
        Environment::global().get_logger(self)
    }

    /// Resolves this request, falling back to a default-configured logger
    /// instead of failing: the error is reported through the internal
    /// logger and the request is retried without overrides or configuration
    /// file search. This always yields a working logger.
    pub fn get_or_default(self) -> Logger {
        let environment = Environment::global();
        match environment.get_logger(self.clone()) {
            Ok(logger) => logger,
            Err(error) => {
                environment.internal_logger().error(format_args!(
                    "could not resolve logger request, continuing with defaults : {error}"
                ));
                let fallback = LoggerRequest {
                    level: None,
                    format: None,
                    use_local_config: false,
                    auto_configure: true,
                    ..self
                };
                match environment.get_logger(fallback) {
                    Ok(logger) => logger,
                    // unreachable: a request without overrides or file
                    // search has nothing left to fail on
                    Err(_) => environment.registry().get(DEFAULT_LOGGER_NAME),
                }
            }
        }
    }
}

/// Returns a ready logger named after the calling source file.
///
/// This is the one-liner entry point: it searches for a `termlog.toml` from
/// the calling file upward, installs it once, falls back to a colorized
/// console logger when there is none, and never fails. See
/// [`LoggerRequest`][struct@LoggerRequest] for the knobs.
#[track_caller]
pub fn get_logger() -> Logger {
    LoggerRequest::new().get_or_default()
}

/// Returns a ready logger registered under `name`.
///
/// Same pipeline as [`get_logger`][fn@get_logger], with an explicit name;
/// the configuration file search still starts from the calling file.
#[track_caller]
pub fn named_logger(name: impl Into<String>) -> Logger {
    LoggerRequest::new().name(name).get_or_default()
}
