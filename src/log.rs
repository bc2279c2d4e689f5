//! Logger setup for the binaries. Every line starts with `c` followed by the elapsed time, so
//! log output interleaved with a solution is still a valid comment line of the PACE formats.

use env_logger::{Builder, Env, Target, WriteStyle};
use log::LevelFilter;
use std::io::Write;
use std::time::Instant;

const LEVELS: [LevelFilter; 6] = [
    LevelFilter::Off,
    LevelFilter::Error,
    LevelFilter::Warn,
    LevelFilter::Info,
    LevelFilter::Debug,
    LevelFilter::Trace,
];

/// Builds the logger using the environment variable 'RUST_LOG' to determine the log level. Uses the
/// passed in `level` if the environment variable is not set.
pub fn build_pace_logger_for_level(level: LevelFilter) {
    let start_time = Instant::now();

    let env = Env::default().default_filter_or(level.as_str());
    Builder::from_env(env)
        .target(Target::Stderr)
        .write_style(WriteStyle::Never)
        .format(move |buf, record| {
            let elapsed = start_time.elapsed().as_millis();
            writeln!(
                buf,
                "c {:>6}.{:03} [{:<5}] - {}",
                elapsed / 1000,
                elapsed % 1000,
                record.level(),
                record.args()
            )
        })
        .init();
}

/// Builds the logger using the environment variable 'RUST_LOG' to determine the log level. If the
/// environment variable is not set, the passed in `default_level` is increased by `verbosity` many
/// levels and the result is used as the log level.
pub fn build_pace_logger_for_verbosity(default_level: LevelFilter, verbosity: usize) {
    build_pace_logger_for_level(level_from_verbosity(default_level, verbosity));
}

fn level_from_verbosity(default_level: LevelFilter, verbosity: usize) -> LevelFilter {
    let index = LEVELS
        .iter()
        .position(|&level| level == default_level)
        .unwrap_or(0);
    LEVELS[(index + verbosity).min(LEVELS.len() - 1)]
}
