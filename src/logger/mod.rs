//! The runtime logging primitive : named loggers, handlers, formatters, and
//! severity colors.

pub mod color;
pub mod handle;
pub mod registry;

pub use handle::{Formatter, Handler, Logger, Record};
pub use handle::{wrap_message, COLUMN_WIDTH};
pub use registry::{Registry, ROOT_LOGGER_NAME};
