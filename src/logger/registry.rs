//! The process-wide registry of named loggers and the configuration
//! installer.

use crate::config::model::{HandlerKind, Level, LogConfig, LoggerConfig};
use crate::error::TermlogConfigError;
use crate::logger::handle::{Formatter, Handler, Logger};

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// The name the optional `[root]` configuration entry installs under.
pub const ROOT_LOGGER_NAME: &str = "root";

/// Logger registry keyed by name. The root logger always exists; every
/// other logger is created on first request and holds the root as its
/// propagation parent.
pub struct Registry {
    root: Logger,
    loggers: Mutex<HashMap<String, Logger>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Registry {
        Registry {
            root: Logger::new(ROOT_LOGGER_NAME, None),
            loggers: Mutex::new(HashMap::new()),
        }
    }

    fn loggers(&self) -> MutexGuard<'_, HashMap<String, Logger>> {
        self.loggers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Fetches the logger registered under `name`, creating a bare one if it
    /// does not exist yet (warning threshold, no handlers, propagating to
    /// the root logger until a document configures it).
    pub fn get(&self, name: &str) -> Logger {
        if name == ROOT_LOGGER_NAME {
            return self.root.clone();
        }
        self.loggers()
            .entry(name.to_owned())
            .or_insert_with(|| Logger::new(name, Some(self.root.clone())))
            .clone()
    }

    pub fn contains(&self, name: &str) -> bool {
        name == ROOT_LOGGER_NAME || self.loggers().contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.loggers().keys().cloned().collect()
    }

    /// Drops every named logger. Used by
    /// [`Environment::reset`][fn@crate::config::Environment::reset].
    pub fn clear(&self) {
        self.loggers().clear();
        let mut root = self.root.state();
        root.handlers.clear();
        root.level = Level::Warning;
        root.disabled = false;
        root.context = None;
    }

    /// Installs a normalized, reconciled document: the single atomic
    /// replace-or-merge operation of the logging subsystem.
    ///
    /// Every reference is resolved before any logger is touched, so a
    /// broken document leaves the registry exactly as it was. For each
    /// configured logger the handler list is rebuilt from scratch, which is
    /// precisely why the applied-configuration ledger must prevent a second
    /// install of the same document.
    pub fn install(&self, config: &LogConfig) -> Result<(), TermlogConfigError> {
        struct Staged {
            name: String,
            handlers: Vec<Handler>,
            level: Level,
            propagate: bool,
        }

        let mut staged = Vec::new();
        let mut entries: Vec<(&str, &LoggerConfig)> = config
            .loggers
            .iter()
            .map(|(name, logger)| (name.as_str(), logger))
            .collect();
        if let Some(root) = &config.root {
            entries.push((ROOT_LOGGER_NAME, root));
        }

        for (name, logger_config) in entries {
            let mut handlers = Vec::new();
            for handler_name in &logger_config.handlers {
                let handler_config = config.handlers.get(handler_name).ok_or_else(|| {
                    TermlogConfigError::HandlerNotFound {
                        handler: handler_name.clone(),
                        logger: name.to_owned(),
                    }
                })?;
                let formatter_name = handler_config.formatter.as_deref().ok_or_else(|| {
                    TermlogConfigError::FormatterNotFound {
                        formatter: "<unset>".to_owned(),
                        handler: handler_name.clone(),
                    }
                })?;
                let formatter_config =
                    config.formatters.get(formatter_name).ok_or_else(|| {
                        TermlogConfigError::FormatterNotFound {
                            formatter: formatter_name.to_owned(),
                            handler: handler_name.clone(),
                        }
                    })?;
                let handler_level = handler_config.level.unwrap_or(Level::Debug);
                let mut handler = match &handler_config.kind {
                    HandlerKind::Console => Handler::console(handler_level),
                    HandlerKind::File { path } => Handler::file(path, handler_level),
                };
                handler.set_formatter(Formatter::new(&formatter_config.format));
                handlers.push(handler);
            }
            staged.push(Staged {
                name: name.to_owned(),
                handlers,
                level: logger_config.level.unwrap_or(Level::Warning),
                propagate: logger_config.propagate.unwrap_or(false),
            });
        }

        if config.disable_existing_loggers == Some(true) {
            let configured: Vec<&str> = staged.iter().map(|entry| entry.name.as_str()).collect();
            for name in self.names() {
                if !configured.contains(&name.as_str()) {
                    self.get(&name).state().disabled = true;
                }
            }
        }

        for entry in staged {
            let logger = self.get(&entry.name);
            let mut state = logger.state();
            state.handlers = entry.handlers;
            state.level = entry.level;
            state.propagate = entry.propagate;
            state.disabled = false;
        }

        Ok(())
    }
}
