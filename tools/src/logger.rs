//! CLI logging: seven verbosity levels rendered as `[LEVEL] message` lines
//! on standard output, colored when a terminal is attached.
//!
//! The level is fixed once at subscriber installation; there is no mutable
//! global to poke afterwards.

use std::fmt;
use std::io::{self, IsTerminal};
use std::str::FromStr;

use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Verbosity accepted by `--loglvl`. `critical` folds into `error` and
/// `notice` into `info` when mapped onto tracing's five levels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Critical,
    Warning,
    Notice,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub const NAMES: [&'static str; 7] = [
        "error", "critical", "warning", "notice", "info", "debug", "trace",
    ];

    fn as_tracing(self) -> Level {
        match self {
            LogLevel::Error | LogLevel::Critical => Level::ERROR,
            LogLevel::Warning => Level::WARN,
            LogLevel::Notice | LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, String> {
        match name {
            "error" => Ok(LogLevel::Error),
            "critical" => Ok(LogLevel::Critical),
            "warning" => Ok(LogLevel::Warning),
            "notice" => Ok(LogLevel::Notice),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!(
                "unknown log level {other:?}, expected one of {}",
                Self::NAMES.join("|")
            )),
        }
    }
}

/// Installs the stdout subscriber.
pub fn init(level: LogLevel) {
    tracing_subscriber::fmt()
        .with_ansi(io::stdout().is_terminal())
        .event_format(BracketFormat)
        .with_max_level(level.as_tracing())
        .init();
}

struct BracketFormat;

impl<S, N> FormatEvent<S, N> for BracketFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let level = *event.metadata().level();
        if writer.has_ansi_escapes() {
            write!(writer, "[{}{}\x1b[0m] ", color(level), level.as_str())?;
        } else {
            write!(writer, "[{}] ", level.as_str())?;
        }
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn color(level: Level) -> &'static str {
    if level == Level::ERROR {
        "\x1b[0;35m"
    } else if level == Level::WARN {
        "\x1b[0;33m"
    } else if level == Level::INFO {
        "\x1b[0;34m"
    } else if level == Level::DEBUG {
        "\x1b[0;32m"
    } else {
        "\x1b[0;90m"
    }
}
