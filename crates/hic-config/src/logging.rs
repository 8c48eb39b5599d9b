//! Standard-output logging in the `[LEVEL][module] message` format.

use std::env;
use std::fmt;

use hic_core::errors::{ErrorInfo, HicError};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Environment variable selecting the log level.
pub const LOGLEVEL_ENV: &str = "LOGLEVEL";

/// Event formatter producing `[INFO][config] message key=value`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BracketFormat;

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
        let meta = event.metadata();
        let module = module_label(meta.module_path(), meta.target());
        write!(writer, "[{}][{}] ", level_name(meta.level()), module)?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Level label as written in the log line. `WARN` is spelled out as `WARNING`.
pub fn level_name(level: &Level) -> &'static str {
    match *level {
        Level::TRACE => "TRACE",
        Level::DEBUG => "DEBUG",
        Level::INFO => "INFO",
        Level::WARN => "WARNING",
        Level::ERROR => "ERROR",
    }
}

/// Returns the last path segment of the emitting module.
pub fn module_label<'a>(module_path: Option<&'a str>, target: &'a str) -> &'a str {
    let path = module_path.unwrap_or(target);
    path.rsplit("::").next().unwrap_or(path)
}

/// Maps a `LOGLEVEL` value to a level filter. Accepts the usual names in any
/// case, plus `warning` and `critical`.
pub fn parse_level(value: &str) -> Option<LevelFilter> {
    match value.trim().to_ascii_lowercase().as_str() {
        "trace" => Some(LevelFilter::TRACE),
        "debug" => Some(LevelFilter::DEBUG),
        "info" => Some(LevelFilter::INFO),
        "warn" | "warning" => Some(LevelFilter::WARN),
        "error" | "critical" => Some(LevelFilter::ERROR),
        "off" => Some(LevelFilter::OFF),
        _ => None,
    }
}

/// Reads `LOGLEVEL`, falling back to `info` when unset or unrecognised.
pub fn level_from_env() -> LevelFilter {
    env::var(LOGLEVEL_ENV)
        .ok()
        .and_then(|value| parse_level(&value))
        .unwrap_or(LevelFilter::INFO)
}

/// Installs the global subscriber at the level given by `LOGLEVEL`.
pub fn init_logging() -> Result<LevelFilter, HicError> {
    let level = level_from_env();
    init_logging_at(level)?;
    Ok(level)
}

/// Installs the global subscriber at an explicit level.
pub fn init_logging_at(level: LevelFilter) -> Result<(), HicError> {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stdout)
        .with_ansi(false)
        .event_format(BracketFormat)
        .try_init()
        .map_err(|err| {
            HicError::Config(
                ErrorInfo::new("hic_config.logging_init", err.to_string())
                    .with_context("level", level.to_string()),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(emit: impl FnOnce()) -> String {
        let sink = Captured::default();
        let writer = sink.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(LevelFilter::TRACE)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .event_format(BracketFormat)
            .finish();
        tracing::subscriber::with_default(subscriber, emit);
        let bytes = sink.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn events_are_written_as_bracketed_lines() {
        let out = capture(|| {
            tracing::info!("hello");
            tracing::warn!(n = 3, "careful");
        });
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines, vec!["[INFO][tests] hello", "[WARNING][tests] careful n=3"]);
    }

    #[test]
    fn level_labels_spell_out_warning() {
        assert_eq!(level_name(&Level::WARN), "WARNING");
        assert_eq!(level_name(&Level::ERROR), "ERROR");
        assert_eq!(level_name(&Level::DEBUG), "DEBUG");
    }

    #[test]
    fn level_names_are_case_insensitive() {
        assert_eq!(parse_level("INFO"), Some(LevelFilter::INFO));
        assert_eq!(parse_level("Debug"), Some(LevelFilter::DEBUG));
        assert_eq!(parse_level("warning"), Some(LevelFilter::WARN));
        assert_eq!(parse_level("CRITICAL"), Some(LevelFilter::ERROR));
        assert_eq!(parse_level("verbose"), None);
    }

    #[test]
    fn module_label_keeps_last_segment() {
        assert_eq!(module_label(Some("hic_config::config"), "hic_config"), "config");
        assert_eq!(module_label(None, "hic_cli"), "hic_cli");
    }

    #[test]
    fn second_initialisation_is_an_error() {
        let _ = init_logging_at(LevelFilter::WARN);
        let err = init_logging_at(LevelFilter::WARN).unwrap_err();
        assert_eq!(err.info().code, "hic_config.logging_init");
    }
}
