//! Log setup for the `autoseas` binary. The library only emits through the
//! `log` macros; nothing is printed unless a logger is installed.

use env_logger::{Builder, Target};
use log::LevelFilter;
use std::io::Write;

/// Level from the argument, then `RUST_LOG`, then `info`.
pub fn resolve_level(level: Option<&str>) -> LevelFilter {
    level
        .and_then(|l| l.parse::<LevelFilter>().ok())
        .or_else(|| {
            std::env::var("RUST_LOG")
                .ok()
                .and_then(|v| v.parse::<LevelFilter>().ok())
        })
        .unwrap_or(LevelFilter::Info)
}

/// Install a `[HH:MM:SS LEVEL] message` logger on stderr.
///
/// Stdout is left to the simulation output. Calling this twice keeps the
/// first logger.
pub fn init_logging(level: Option<&str>) -> LevelFilter {
    let log_level = resolve_level(level);

    let installed = Builder::new()
        .filter_level(log_level)
        .target(Target::Stderr)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {:5}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .try_init();

    if installed.is_ok() {
        log::debug!("Logging initialised at {log_level}");
    }
    log_level
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_level_wins() {
        assert_eq!(resolve_level(Some("trace")), LevelFilter::Trace);
        assert_eq!(resolve_level(Some("WARN")), LevelFilter::Warn);
    }

    #[test]
    fn init_twice_is_harmless() {
        assert_eq!(init_logging(Some("error")), LevelFilter::Error);
        assert_eq!(init_logging(Some("debug")), LevelFilter::Debug);
    }
}
