//! Validates a `termlog.toml` configuration file without installing it.
//!
//! ```text
//! termlog-check -c path/to/termlog.toml
//! ```
//!
//! Exits with status `0` when the file parses and reconciles cleanly,
//! `1` otherwise.

use termlog_config::config::model::{Format, LogConfig};
use termlog_config::config::{normalize, read_config, reconcile_formatters};
use termlog_config::TermlogConfigError;

use std::path::Path;
use std::process::ExitCode;

fn check(path: &Path) -> Result<LogConfig, TermlogConfigError> {
    let mut config = read_config(path)?;
    normalize(&mut config);
    reconcile_formatters(&mut config, Format::Standard)?;
    Ok(config)
}

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);

    match args.next().as_deref() {
        Some("-c") => {
            let path = match args.next() {
                Some(path) => path,
                None => {
                    eprintln!("Please provide a file to check");
                    return ExitCode::FAILURE;
                }
            };
            match check(Path::new(&path)) {
                Ok(config) => {
                    let loggers: Vec<&str> =
                        config.loggers.keys().map(String::as_str).collect();
                    println!(
                        "`{path}` is a valid configuration ({} formatters, {} handlers, loggers : [{}])",
                        config.formatters.len(),
                        config.handlers.len(),
                        loggers.join(", ")
                    );
                    ExitCode::SUCCESS
                }
                Err(error) => {
                    eprintln!("`{path}` is not a valid configuration : {error}");
                    ExitCode::FAILURE
                }
            }
        }
        Some(other) => {
            eprintln!("`{other}` is not recognized, the only flag is `-c <file>`");
            ExitCode::FAILURE
        }
        None => {
            eprintln!("Please provide a file to check, usage : termlog-check -c <file>");
            ExitCode::FAILURE
        }
    }
}
