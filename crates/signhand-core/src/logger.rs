//! Process-wide log setup for the signhand tools.
//!
//! Without the `tracing` feature, records go to a small stderr logger that
//! prints `[elapsed LEVEL target] message`. With it, a `tracing` subscriber is
//! installed instead and also receives `log` records.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable consulted when no explicit level is given.
pub const LOG_ENV_VAR: &str = "SIGNHAND_LOG";

#[derive(thiserror::Error, Debug)]
pub enum LogInitError {
    #[error(transparent)]
    Logger(#[from] log::SetLoggerError),
    #[cfg(feature = "tracing")]
    #[error(transparent)]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// How the process should log.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LogSettings {
    /// Explicit level. `None` defers to `SIGNHAND_LOG`, then to `info`.
    pub level: Option<LevelFilter>,
    /// One JSON object per line. Only honoured with the `tracing` feature.
    pub json: bool,
}

impl LogSettings {
    /// Level after applying `SIGNHAND_LOG` to an unset [`LogSettings::level`].
    pub fn effective_level(&self) -> LevelFilter {
        resolve_level(self.level, std::env::var(LOG_ENV_VAR).ok().as_deref())
    }
}

/// Pick the log level: explicit value first, then a parsable environment
/// value (`error`, `warn`, `info`, `debug`, `trace`, `off`), then `info`.
pub fn resolve_level(explicit: Option<LevelFilter>, env: Option<&str>) -> LevelFilter {
    explicit
        .or_else(|| env.and_then(|raw| raw.trim().parse().ok()))
        .unwrap_or(LevelFilter::Info)
}

#[cfg_attr(feature = "tracing", allow(dead_code))]
struct StderrLogger {
    level: LevelFilter,
    started: Instant,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let elapsed = self.started.elapsed().as_secs_f64();
            let _ = write_record(&mut std::io::stderr().lock(), elapsed, record);
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[cfg_attr(feature = "tracing", allow(dead_code))]
fn write_record(out: &mut impl Write, elapsed: f64, record: &Record) -> std::io::Result<()> {
    writeln!(
        out,
        "[{elapsed:7.3}s {:>5} {}] {}",
        record.level(),
        record.target(),
        record.args()
    )
}

#[cfg_attr(feature = "tracing", allow(dead_code))]
static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

#[cfg_attr(feature = "tracing", allow(dead_code))]
fn install_stderr(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_some() {
        return Ok(());
    }
    let logger = LOGGER.get_or_init(|| StderrLogger {
        level,
        started: Instant::now(),
    });
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Install the process logger. Only the first call has an effect.
#[cfg(not(feature = "tracing"))]
pub fn init_logging(settings: &LogSettings) -> Result<(), LogInitError> {
    install_stderr(settings.effective_level())?;
    if settings.json {
        log::warn!("JSON logs need the `tracing` feature; using plain lines");
    }
    Ok(())
}

/// Install the process logger. Only the first call has an effect.
///
/// `RUST_LOG` directives, when present, take precedence over the level.
#[cfg(feature = "tracing")]
pub fn init_logging(settings: &LogSettings) -> Result<(), LogInitError> {
    static INSTALLED: OnceLock<()> = OnceLock::new();
    if INSTALLED.get().is_some() {
        return Ok(());
    }

    let level = settings.effective_level().to_string().to_ascii_lowercase();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    if settings.json {
        builder.json().flatten_event(true).finish().try_init()?;
    } else {
        builder
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init()?;
    }
    let _ = INSTALLED.set(());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    #[test]
    fn explicit_level_beats_environment() {
        assert_eq!(
            resolve_level(Some(LevelFilter::Warn), Some("trace")),
            LevelFilter::Warn
        );
        assert_eq!(resolve_level(None, Some(" debug ")), LevelFilter::Debug);
        assert_eq!(resolve_level(None, Some("OFF")), LevelFilter::Off);
    }

    #[test]
    fn unusable_environment_falls_back_to_info() {
        assert_eq!(resolve_level(None, None), LevelFilter::Info);
        assert_eq!(resolve_level(None, Some("loud")), LevelFilter::Info);
        assert_eq!(resolve_level(None, Some("")), LevelFilter::Info);
    }

    #[test]
    fn record_line_carries_level_and_target() {
        let mut out = Vec::new();
        write_record(
            &mut out,
            1.5,
            &Record::builder()
                .level(Level::Warn)
                .target("signhand::recognize")
                .args(format_args!("hand {}: degenerate", 0))
                .build(),
        )
        .expect("write");
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "[  1.500s  WARN signhand::recognize] hand 0: degenerate\n"
        );
    }

    #[test]
    fn setup_errors_are_std_errors() {
        fn is_error<E: std::error::Error + Send + Sync + 'static>() {}
        is_error::<log::SetLoggerError>();
        is_error::<LogInitError>();

        let parse_err = "loud".parse::<LevelFilter>().unwrap_err();
        let boxed: Box<dyn std::error::Error> = Box::new(parse_err);
        assert!(!boxed.to_string().is_empty());
    }
}
