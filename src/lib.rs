// #![deny(missing_docs)]
#![forbid(unsafe_code)]

//! The primary purpose of this crate is to hand any function in your program
//! a ready-to-use, colorized, named logger with one call, configured from an
//! optional `termlog.toml` configuration file.
//!
//! No setup call in `main()` is required: the first
//! [`get_logger`][fn@get_logger] call configures everything, every later
//! call reuses that work. Loggers write colored records to the terminal and
//! plain records to files, wrap long messages to the terminal width, and
//! carry an optional three-character context tag per logger.
//!
//! # Getting started
//! ```toml
//! # Cargo.toml
//! termlog-config = { version = "0.1" }
//! ```
//! ```rust no_run
//! // main.rs
//! fn main() {
//!     let log = termlog_config::get_logger();
//!     log.info("Hello World");
//!     log.success("it works");
//! }
//! ```
//! The logger is named after the calling source file (`main` above would be
//! named after its enclosing directory); use
//! [`named_logger`][fn@named_logger] or a
//! [`LoggerRequest`][struct@LoggerRequest] to pick the name, level or
//! format yourself:
//! ```rust no_run
//! use termlog_config::{Format, Level, LoggerRequest};
//!
//! let log = LoggerRequest::new()
//!     .name("worker")
//!     .level(Level::Debug)
//!     .format(Format::Detailed)
//!     .get_or_default();
//! log.debug("worker starting");
//! ```
//!
//! # Configuration file search path
//! [`get_logger`][fn@get_logger] walks upward from the calling source
//! file's directory to the file system root and installs the first
//! `termlog.toml` it finds, at most once per file. The easiest way to pin a
//! specific configuration file is to have the `termlog_config` environment
//! variable point directly at it (or at a directory containing one); see
//! [`find_config_path`][fn@config::find_config_path] for the details.
//!
//! Without a configuration file you still get a working logger: a colorized
//! console handler built from the built-in default document.
//!
//! # Configuration file
//! In short words:
//! - a `formatter` is a record template, a string with `${rec:field}`
//!   tokens that render per record.
//! - a `handler` is something that receives rendered records and writes
//!   them to the terminal or appends them to a file. Each handler has its
//!   own severity threshold and references one formatter.
//! - a `logger` is a named entry point your code logs through; it holds a
//!   threshold and a list of handlers.
//!
//! The `"flow"` is `logger`->`handler`->`formatter`.
//!
//! - `Note`: The configuration file can include environment variables in the form of `${env:key}` tokens where a toml string is present, for more details, read the [`config`][mod@config] module level docs and the [`interpolate`][mod@interpolate] module level docs.
//! ```toml
//! # termlog.toml
//! [handler.console]
//! type = "console"
//! format = "standard"
//!
//! [logger.myapp]
//! handlers = ["console"]
//! level = "debug"
//! ```
//! You can find a detailed example at the module level docs for
//! [`config::model`][mod@config::model]; for a full understanding of the
//! configuration file structure, start from the root level structure i.e.:
//! a [`LogConfig`][struct@config::model::LogConfig] structure.
//!
//! # Public modules
//! - [`config`][mod@config]: Configuration file discovery, the data model, and the [`Environment`][struct@config::Environment] behind the facade.
//! - [`logger`][mod@logger]: The runtime primitives, named [`Logger`][struct@logger::Logger]s, handlers, formatters and severity colors.
//! - [`interpolate`][mod@interpolate]: Resolve (recursively) `${scheme:key}` tokens in a given `input` string.

// public crate level modules.

pub mod config;
pub mod interpolate;
pub mod logger;

// private crate level modules.

mod error;

// re-export the basic public api;
// advanced usage should require specific imports.

pub use self::config::get_logger;
pub use self::config::named_logger;
pub use self::config::Environment;
pub use self::config::LoggerRequest;
pub use self::config::model::Format;
pub use self::config::model::Level;
pub use self::error::TermlogConfigError;
pub use self::logger::Logger;
