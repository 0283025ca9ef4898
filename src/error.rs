//! Primary error types for this crate.

use crate::interpolate::VarError;

use thiserror::Error as ThisError;
use std::io::Error as StdIoError;
use toml::de::Error as TomlDeError;
use toml::ser::Error as TomlSerError;

/// The only error type, wraps other errors
///
/// There is no need for multiple error types: the facade promises a working
/// logger and routes most failures through the internal logger, so the few
/// errors that do surface (invalid arguments, configuration-validity
/// mistakes) share one enum.
#[derive(ThisError, Debug)]
pub enum TermlogConfigError {
    #[error("`{given}` is not valid as a level. choose from `{expected}`")]
    InvalidLevel { given: String, expected: String },
    #[error("`{format}` specified in handler `{handler}` is not a recognized format, choose from `standard`, `user`, `detailed`")]
    UnknownFormat { format: String, handler: String },
    #[error("The formatter `{formatter}` referenced by handler `{handler}` was not found")]
    FormatterNotFound { formatter: String, handler: String },
    #[error("The handler `{handler}` referenced by logger `{logger}` was not found")]
    HandlerNotFound { handler: String, logger: String },

    #[error("Could not find environment variable : `{0}`")]
    MissingEnvironmentVariable(#[from] VarError),
    #[error("Configuration file does not exist or it could not be read : `{0}`")]
    IoError(#[from] StdIoError),
    #[error("Deserialization error, configuration file is either not syntactically a toml file or not a LogConfig document : `{0}`")]
    Deserialization(#[from] TomlDeError),
    #[error("Serialization error, configuration could not be serialized : `{0}`")]
    Serialization(#[from] TomlSerError),
}
