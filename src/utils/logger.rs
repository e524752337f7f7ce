use chrono::Local;
use eyre::Result;
use fern::Dispatch;
use log::LevelFilter;

/// Timestamp prefix of every line
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Installs the stdout logger.
///
/// The level comes from `verbosity` when given, otherwise from `RUST_LOG`,
/// otherwise Info. Host-level pool chatter is capped at Info unless Trace is asked for.
///
/// # Errors
/// * If a logger is already installed
pub fn setup_logger(verbosity: Option<LevelFilter>) -> Result<()> {
    let level = verbosity.unwrap_or_else(|| {
        std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| level.parse().ok())
            .unwrap_or(LevelFilter::Info)
    });
    let host_level = if level == LevelFilter::Trace {
        LevelFilter::Trace
    } else {
        level.min(LevelFilter::Info)
    };

    Dispatch::new()
        .level(level)
        .level_for("icicle::host", host_level)
        .chain(std::io::stdout())
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}",
                Local::now().format(TIMESTAMP_FORMAT),
                record.level(),
                message
            ));
        })
        .apply()?;
    Ok(())
}

/// Maps `-v` repetitions to a level: none defers to the environment.
#[must_use]
pub const fn verbosity(count: u8) -> Option<LevelFilter> {
    match count {
        0 => None,
        1 => Some(LevelFilter::Debug),
        _ => Some(LevelFilter::Trace),
    }
}
