//! Initialisation of the program logger.
//!
//! Messages go to the console (coloured when it is a terminal) and, for the `run` command, to log
//! files in the output folder.
use anyhow::{Context, Result, bail};
use chrono::Local;
use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, FormatCallback};
use log::{LevelFilter, Record};
use std::env;
use std::fmt::{Arguments, Display};
use std::fs::{File, OpenOptions};
use std::io::{IsTerminal, Write};
use std::path::Path;
use std::sync::OnceLock;

/// A flag indicating whether the logger has been initialised
static LOGGER_INIT: OnceLock<()> = OnceLock::new();

/// The default log level, used if neither `UCSWEEP_LOG_LEVEL` nor `settings.toml` give one
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// The environment variable which overrides the log level
const LOG_LEVEL_ENV_VAR: &str = "UCSWEEP_LOG_LEVEL";

/// The file name for the log file containing messages about the ordinary operation of the sweep
const LOG_INFO_FILE_NAME: &str = "ucsweep_info.log";

/// The file name for the log file containing warnings and error messages
const LOG_ERROR_FILE_NAME: &str = "ucsweep_error.log";

/// Whether the program logger has been initialised
pub fn is_logger_initialised() -> bool {
    LOGGER_INIT.get().is_some()
}

/// Initialise the program logger.
///
/// The level comes from the `UCSWEEP_LOG_LEVEL` environment variable if set, otherwise from
/// `settings.toml`. Accepted values are `off`, `error`, `warn`, `info`, `debug` and `trace`.
///
/// # Arguments
///
/// * `log_level_from_settings`: The log level specified in `settings.toml`
/// * `log_file_path`: The location to save log files (if Some, log files will be created)
pub fn init(log_level_from_settings: &str, log_file_path: Option<&Path>) -> Result<()> {
    let log_level = env::var(LOG_LEVEL_ENV_VAR).unwrap_or_else(|_| log_level_from_settings.into());
    let log_level = parse_log_level(&log_level)?;

    let mut dispatch = Dispatch::new()
        .chain(console_dispatch(std::io::stdout(), log_level, false))
        .chain(console_dispatch(std::io::stderr(), log_level, true));

    if let Some(log_file_path) = log_file_path {
        let info_file = new_log_file(&log_file_path.join(LOG_INFO_FILE_NAME))?;
        let error_file = new_log_file(&log_file_path.join(LOG_ERROR_FILE_NAME))?;

        // The info log always records at least the ordinary progress of the sweep
        dispatch = dispatch
            .chain(
                Dispatch::new()
                    .filter(|metadata| metadata.level() > LevelFilter::Warn)
                    .format(write_log_plain)
                    .level(log_level.max(LevelFilter::Info))
                    .chain(info_file),
            )
            .chain(
                Dispatch::new()
                    .format(write_log_plain)
                    .level(LevelFilter::Warn)
                    .chain(error_file),
            );
    }

    dispatch.apply()?;
    LOGGER_INIT
        .set(())
        .map_err(|()| anyhow::anyhow!("Logger already initialised"))?;

    Ok(())
}

/// Create (or truncate) a log file
fn new_log_file(file_path: &Path) -> Result<File> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(file_path)
        .with_context(|| format!("Could not create log file {}", file_path.display()))?;

    Ok(file)
}

/// Dispatch for one console stream.
///
/// Warnings and errors go to the error stream; everything else goes to the other stream.
fn console_dispatch<W>(stream: W, log_level: LevelFilter, is_error_stream: bool) -> Dispatch
where
    W: Write + IsTerminal + Send + 'static,
{
    let colours = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::Magenta);
    let use_colour = stream.is_terminal();

    let dispatch = Dispatch::new().format(move |out, message, record| {
        write_log_colour(out, message, record, use_colour, &colours);
    });
    let dispatch = if is_error_stream {
        dispatch.level(log_level.min(LevelFilter::Warn))
    } else {
        dispatch
            .filter(|metadata| metadata.level() > LevelFilter::Warn)
            .level(log_level)
    };

    dispatch.chain(Box::new(stream) as Box<dyn Write + Send>)
}

/// Convert a log level name (case-insensitive) to a [`LevelFilter`]
fn parse_log_level(name: &str) -> Result<LevelFilter> {
    let level = match name.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        unknown => bail!("Unknown log level: {unknown}"),
    };

    Ok(level)
}

/// Write a log line as `[HH:MM:SS LEVEL target] message`
fn write_log<T: Display>(out: FormatCallback, level: T, target: &str, message: &Arguments) {
    let timestamp = Local::now().format("%H:%M:%S");

    out.finish(format_args!("[{timestamp} {level} {target}] {message}"));
}

/// Write to the log with no colours
fn write_log_plain(out: FormatCallback, message: &Arguments, record: &Record) {
    write_log(out, record.level(), record.target(), message);
}

/// Write to the log with optional colours
fn write_log_colour(
    out: FormatCallback,
    message: &Arguments,
    record: &Record,
    use_colour: bool,
    colours: &ColoredLevelConfig,
) {
    // Format output with or without colour based on `use_colour`
    if use_colour {
        write_log(out, colours.color(record.level()), record.target(), message);
    } else {
        write_log_plain(out, message, record);
    }
}
