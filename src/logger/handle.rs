//! The runtime logging primitive: formatters, handlers, and the [`Logger`]
//! handle returned by the facade.

use crate::config::model::{Format, Level};
use crate::interpolate::resolve_infallible;
use crate::logger::color::level_color;

use chrono::{DateTime, Local};

use std::fmt::Display;
use std::io::Write as _;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Total width of a rendered line; messages longer than what is left after
/// the template's own columns are wrapped.
pub const COLUMN_WIDTH: usize = 224;

static NEXT_FORMATTER_ID: AtomicU64 = AtomicU64::new(1);

/// One log record, borrowed from the emitting logger for the duration of a
/// single emission.
#[derive(Debug)]
pub struct Record<'a> {
    pub level: Level,
    pub name: &'a str,
    pub message: &'a str,
    pub context: Option<&'a str>,
    pub file: &'a str,
    pub line: u32,
    pub time: DateTime<Local>,
}

/// Renders the bounded-width bracketed context tag, `[ - ]` when unset.
fn context_tag(context: Option<&str>) -> String {
    match context {
        Some(context) => format!("[{:<3.3}]", context),
        None => "[ - ]".to_owned(),
    }
}

/// A record template plus a process-unique identity.
///
/// The identity is what the colorized-formatter registry tracks; it survives
/// [`set_template`][fn@Formatter::set_template], so a template replaced by
/// an explicit caller override is still recognized as already processed.
#[derive(Debug, Clone)]
pub struct Formatter {
    id: u64,
    template: String,
}

impl Formatter {
    pub fn new(template: impl Into<String>) -> Formatter {
        Formatter {
            id: NEXT_FORMATTER_ID.fetch_add(1, Ordering::Relaxed),
            template: template.into(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Replaces the template text in place, keeping the identity.
    pub fn set_template(&mut self, template: &str) {
        self.template = template.to_owned();
    }

    /// Renders `record` through the template by resolving its `${rec:field}`
    /// tokens. Unrecognized schemes and fields are left untouched.
    pub fn render(&self, record: &Record<'_>) -> String {
        resolve_infallible(&self.template, |scheme, key| {
            if scheme != "rec" {
                return None;
            }
            Some(match key {
                "level" => format!("{:>7}", record.level.as_str()),
                "time" => record.time.format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
                "name" => format!("{:>12}", record.name),
                "context" => context_tag(record.context),
                "message" => record.message.to_owned(),
                "file" => record.file.to_owned(),
                "line" => record.line.to_string(),
                "color" => level_color(record.level).rgb().to_owned(),
                _ => return None,
            })
        })
    }
}

#[derive(Debug)]
enum Sink {
    Console,
    File {
        path: PathBuf,
        // opened on the first record so merely configuring a file handler
        // never touches the file system
        file: Option<std::fs::File>,
    },
    Memory(Arc<Mutex<String>>),
}

/// A sink a logger writes through, with its own severity threshold and at
/// most one formatter.
#[derive(Debug)]
pub struct Handler {
    sink: Sink,
    level: Level,
    formatter: Option<Formatter>,
}

impl Handler {
    /// A terminal (standard error) handler.
    pub fn console(level: Level) -> Handler {
        Handler {
            sink: Sink::Console,
            level,
            formatter: None,
        }
    }

    /// An appending file handler.
    pub fn file(path: impl Into<PathBuf>, level: Level) -> Handler {
        Handler {
            sink: Sink::File {
                path: path.into(),
                file: None,
            },
            level,
            formatter: None,
        }
    }

    /// An in-memory handler; returns the shared buffer the rendered lines
    /// accumulate in.
    pub fn memory(level: Level) -> (Handler, Arc<Mutex<String>>) {
        let buffer = Arc::new(Mutex::new(String::new()));
        (
            Handler {
                sink: Sink::Memory(Arc::clone(&buffer)),
                level,
                formatter: None,
            },
            buffer,
        )
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn is_console(&self) -> bool {
        matches!(self.sink, Sink::Console)
    }

    pub fn formatter(&self) -> Option<&Formatter> {
        self.formatter.as_ref()
    }

    /// Replaces this handler's formatter wholesale (new identity).
    pub fn set_formatter(&mut self, formatter: Formatter) {
        self.formatter = Some(formatter);
    }

    /// Replaces only the template text, keeping the formatter identity; a
    /// handler without a formatter gets a fresh one.
    pub fn set_template(&mut self, template: &str) {
        match &mut self.formatter {
            Some(formatter) => formatter.set_template(template),
            None => self.formatter = Some(Formatter::new(template)),
        }
    }

    fn emit(&mut self, record: &Record<'_>) {
        if record.level < self.level {
            return;
        }
        let line = match &self.formatter {
            Some(formatter) => formatter.render(record),
            None => record.message.to_owned(),
        };
        self.write_line(&line);
    }

    fn write_line(&mut self, line: &str) {
        // a sink that cannot be written to drops the record; logging must
        // never take the program down
        match &mut self.sink {
            Sink::Console => {
                let _ = writeln!(std::io::stderr().lock(), "{line}");
            }
            Sink::File { path, file } => {
                if file.is_none() {
                    *file = std::fs::OpenOptions::new()
                        .create(true)
                        .append(true)
                        .open(path.as_path())
                        .ok();
                }
                if let Some(file) = file {
                    let _ = writeln!(file, "{line}");
                }
            }
            Sink::Memory(buffer) => {
                if let Ok(mut buffer) = buffer.lock() {
                    buffer.push_str(line);
                    buffer.push('\n');
                }
            }
        }
    }
}

pub(crate) struct LoggerState {
    pub level: Level,
    pub propagate: bool,
    pub disabled: bool,
    pub handlers: Vec<Handler>,
    pub context: Option<String>,
    pub parent: Option<Logger>,
}

/// A named logger handle. Cloning is cheap and clones share all state,
/// including the single active context slot.
#[derive(Clone)]
pub struct Logger {
    shared: Arc<LoggerShared>,
}

struct LoggerShared {
    name: String,
    state: Mutex<LoggerState>,
}

impl Logger {
    // a bare logger propagates to its parent so a name no document
    // configures still reaches the root handlers; installing a document
    // entry replaces this with the entry's explicit propagate value
    pub(crate) fn new(name: &str, parent: Option<Logger>) -> Logger {
        Logger {
            shared: Arc::new(LoggerShared {
                name: name.to_owned(),
                state: Mutex::new(LoggerState {
                    level: Level::Warning,
                    propagate: true,
                    disabled: false,
                    handlers: Vec::new(),
                    context: None,
                    parent,
                }),
            }),
        }
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, LoggerState> {
        // a panic while holding the lock leaves the state usable
        self.shared
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn name(&self) -> &str {
        &self.shared.name
    }

    pub fn level(&self) -> Level {
        self.state().level
    }

    /// Changes only the threshold; handlers and formatters are untouched.
    pub fn set_level(&self, level: Level) {
        self.state().level = level;
    }

    /// Sets the single active context tag, replacing any previous one.
    pub fn set_context(&self, context: impl Into<String>) {
        self.state().context = Some(context.into());
    }

    pub fn clear_context(&self) {
        self.state().context = None;
    }

    pub fn context(&self) -> Option<String> {
        self.state().context.clone()
    }

    /// Attaches an additional handler. Handlers added after configuration
    /// survive later facade calls untouched: automatic colorization only
    /// runs when a document installs, so colorize the handler's template
    /// yourself or run
    /// [`post_config_colorization`][fn@crate::config::Environment::post_config_colorization]
    /// for this logger's name.
    pub fn add_handler(&self, handler: Handler) {
        self.state().handlers.push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.state().handlers.len()
    }

    /// Snapshot of the handlers' formatters, in handler order.
    pub fn formatters(&self) -> Vec<Formatter> {
        self.state()
            .handlers
            .iter()
            .filter_map(|handler| handler.formatter().cloned())
            .collect()
    }

    #[track_caller]
    pub fn debug(&self, message: impl Display) {
        self.log(Level::Debug, message);
    }

    #[track_caller]
    pub fn info(&self, message: impl Display) {
        self.log(Level::Info, message);
    }

    /// Logs at the custom SUCCESS level (between INFO and WARNING).
    #[track_caller]
    pub fn success(&self, message: impl Display) {
        self.log(Level::Success, message);
    }

    #[track_caller]
    pub fn warning(&self, message: impl Display) {
        self.log(Level::Warning, message);
    }

    #[track_caller]
    pub fn error(&self, message: impl Display) {
        self.log(Level::Error, message);
    }

    #[track_caller]
    pub fn critical(&self, message: impl Display) {
        self.log(Level::Critical, message);
    }

    #[track_caller]
    pub fn log(&self, level: Level, message: impl Display) {
        let location = std::panic::Location::caller();
        self.emit(level, &message.to_string(), location.file(), location.line());
    }

    /// Logs `error`, its `source()` chain and a captured backtrace as one
    /// multi-line ERROR record. Returns the header line.
    #[track_caller]
    pub fn exception(&self, error: &dyn std::error::Error) -> String {
        use std::backtrace::{Backtrace, BacktraceStatus};

        let header = error.to_string();
        let mut text = header.clone();
        let mut source = error.source();
        while let Some(cause) = source {
            text.push_str("\ncaused by: ");
            text.push_str(&cause.to_string());
            source = cause.source();
        }
        let backtrace = Backtrace::capture();
        if backtrace.status() == BacktraceStatus::Captured {
            text.push('\n');
            text.push_str(&backtrace.to_string());
        }
        self.log(Level::Error, &text);
        header
    }

    fn emit(&self, level: Level, message: &str, file: &str, line: u32) {
        let mut state = self.state();
        if state.disabled || level < state.level {
            return;
        }
        let context = state.context.clone();
        let wrapped = wrap_message(message, Format::Detailed.padding());
        let record = Record {
            level,
            name: &self.shared.name,
            message: &wrapped,
            context: context.as_deref(),
            file,
            line,
            time: Local::now(),
        };
        for handler in state.handlers.iter_mut() {
            handler.emit(&record);
        }
        let parent = if state.propagate {
            state.parent.clone()
        } else {
            None
        };
        drop(state);
        if let Some(parent) = parent {
            parent.emit_to_handlers(&record);
        }
    }

    /// Propagation target: records handed up bypass the ancestor logger's
    /// own threshold and go straight to its handlers.
    fn emit_to_handlers(&self, record: &Record<'_>) {
        let mut state = self.state();
        if state.disabled {
            return;
        }
        for handler in state.handlers.iter_mut() {
            handler.emit(record);
        }
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("Logger")
            .field("name", &self.shared.name)
            .field("level", &state.level)
            .field("handlers", &state.handlers.len())
            .finish()
    }
}

/// Breaks `message` into lines no wider than [`COLUMN_WIDTH`] minus
/// `padding`, indenting continuation lines by `padding` columns. Embedded
/// newlines are kept; breaks prefer the last whitespace inside the limit and
/// fall back to a hard break for unbroken runs.
pub fn wrap_message(message: &str, padding: usize) -> String {
    let width = COLUMN_WIDTH.saturating_sub(padding).max(1);
    let pad = " ".repeat(padding);
    let mut out = String::with_capacity(message.len());
    for (index, line) in message.split('\n').enumerate() {
        if index > 0 {
            out.push('\n');
            out.push_str(&pad);
        }
        wrap_line(line, width, &pad, &mut out);
    }
    out
}

fn wrap_line(line: &str, width: usize, pad: &str, out: &mut String) {
    let mut rest = line;
    loop {
        if rest.chars().count() <= width {
            out.push_str(rest);
            return;
        }
        // byte offset of the first character past the limit
        let hard_break = rest
            .char_indices()
            .nth(width)
            .map(|(offset, _)| offset)
            .unwrap_or(rest.len());
        let cut = match rest[..hard_break].rfind(char::is_whitespace) {
            Some(whitespace) if whitespace > 0 => whitespace,
            _ => hard_break,
        };
        out.push_str(rest[..cut].trim_end());
        out.push('\n');
        out.push_str(pad);
        rest = rest[cut..].trim_start();
    }
}
