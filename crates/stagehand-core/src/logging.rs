//! Logging setup for stagehand front ends

use atty::Stream;
use colored::Colorize;
use fern::{Dispatch, FormatCallback, Output};
use log::{Level, LevelFilter, Record, SetLoggerError};
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

static TIME_FORMAT: &[FormatItem] =
    format_description!("[hour]:[minute]:[second].[subsecond digits:3]");

/// Provides helpful logging args for clap clis
#[derive(Debug, clap::Args, Clone, Default)]
#[clap(next_help_heading = "Log Level")]
pub struct LoggingOpts {
    /// Only display error level log messages
    #[clap(short, long)]
    #[clap(conflicts_with_all(&["warn", "info", "debug", "trace"]))]
    #[clap(display_order = 1)]
    #[clap(global = true)]
    error: bool,

    /// Display warning and above level log messages
    #[clap(short, long)]
    #[clap(conflicts_with_all(&["error", "info", "debug", "trace"]))]
    #[clap(display_order = 2)]
    #[clap(global = true)]
    warn: bool,

    /// Display info and above level log messages
    #[clap(short, long)]
    #[clap(conflicts_with_all(&["error", "warn", "debug", "trace"]))]
    #[clap(display_order = 3)]
    #[clap(global = true)]
    info: bool,

    /// Display debug and above level log messages
    #[clap(long, short)]
    #[clap(conflicts_with_all(&["error", "warn", "info", "trace"]))]
    #[clap(display_order = 4)]
    #[clap(global = true)]
    debug: bool,

    /// Display trace and above level log messages
    #[clap(long)]
    #[clap(conflicts_with_all(&["error", "warn", "info", "debug"]))]
    #[clap(display_order = 5)]
    #[clap(global = true)]
    trace: bool,

    /// Show the source of a logging statement
    #[clap(long)]
    #[clap(help_heading = "Logging Settings")]
    #[clap(global = true)]
    pub show_source: bool,

    /// Prefix every message with the time it was logged
    #[clap(long)]
    #[clap(help_heading = "Logging Settings")]
    #[clap(global = true)]
    pub timestamps: bool,

    /// The console output mode.
    #[clap(long, value_enum, default_value_t = ConsoleMode::Auto)]
    #[clap(help_heading = "Logging Settings")]
    #[clap(global = true)]
    pub console: ConsoleMode,
}

#[derive(Debug, Copy, Clone, clap::ValueEnum, Eq, PartialEq, Default)]
#[repr(u8)]
pub enum ConsoleMode {
    #[default]
    Auto,
    Rich,
    Plain,
}

impl ConsoleMode {
    pub fn resolve(self) -> Self {
        match self {
            ConsoleMode::Auto => {
                if atty::is(Stream::Stdout) {
                    ConsoleMode::Rich
                } else {
                    ConsoleMode::Plain
                }
            }
            other => other,
        }
    }
}

impl LoggingOpts {
    /// Gets the log level
    pub fn log_level_filter(&self) -> LevelFilter {
        if self.error {
            LevelFilter::Error
        } else if self.warn {
            LevelFilter::Warn
        } else if self.info {
            LevelFilter::Info
        } else if self.debug {
            LevelFilter::Debug
        } else if self.trace {
            LevelFilter::Trace
        } else {
            LevelFilter::Info
        }
    }

    pub fn init_root_logger(&self) -> Result<(), SetLoggerError> {
        self.create_logger().apply()
    }

    pub fn create_logger(&self) -> Dispatch {
        if self.console.resolve() == ConsoleMode::Plain {
            colored::control::set_override(false);
        }
        Self::create_logger_with(
            self.log_level_filter(),
            self.show_source,
            self.timestamps,
            Output::stdout("\n"),
        )
    }

    pub fn create_logger_with(
        filter: LevelFilter,
        show_source: bool,
        timestamps: bool,
        output: impl Into<Output>,
    ) -> Dispatch {
        Dispatch::new()
            .level(filter)
            .format(Self::message_format(show_source, timestamps))
            .chain(output)
    }

    fn message_format(
        show_source: bool,
        timestamps: bool,
    ) -> impl Fn(FormatCallback, &fmt::Arguments, &Record) + Sync + Send + 'static {
        move |out, message, record| {
            let message = match record.level() {
                Level::Error => message.to_string().red().to_string(),
                Level::Warn => message.to_string().yellow().to_string(),
                Level::Info | Level::Debug => message.to_string(),
                Level::Trace => message.to_string().bright_blue().to_string(),
            };
            out.finish(format_args!(
                "{} {}",
                format_prefix(record, show_source, timestamps),
                message
            ))
        }
    }
}

fn format_prefix(record: &Record, show_source: bool, timestamps: bool) -> String {
    let level_string = record.level().to_string().to_lowercase();
    let level_string = match record.level() {
        Level::Error => level_string.red(),
        Level::Warn => level_string.yellow(),
        Level::Info => level_string.green(),
        Level::Debug => level_string.blue(),
        Level::Trace => level_string.bright_black(),
    };

    let mut prefix = String::new();
    if timestamps {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        if let Ok(time) = now.format(TIME_FORMAT) {
            prefix.push_str(&format!("[{}] ", time));
        }
    }
    prefix.push_str(&format!("{}:", level_string));

    if show_source {
        match record.module_path().zip(record.file()) {
            Some((module, file)) => {
                let line = record.line().map(|i| format!(":{}", i)).unwrap_or_default();
                let crate_name = module.split("::").next().unwrap_or(module);
                let source: PathBuf = Path::new(file)
                    .iter()
                    .skip_while(|&p| p != OsStr::new("src"))
                    .skip(1)
                    .collect();
                let source = format!(
                    "({crate_name} :: {source}{line})",
                    source = source.to_string_lossy()
                );
                prefix.push_str(&format!(" {}", source.italic()));
            }
            None => prefix.push_str(" (<unknown source>)"),
        }
    }
    prefix
}
