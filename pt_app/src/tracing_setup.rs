use std::io;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// DEBUG with `--verbose`, INFO otherwise
pub fn default_level(verbose: bool) -> Level {
    if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

/// Initialise tracing on stderr, plus a non-blocking hourly file when `log_dir` is set
///
/// Stdout is left for the final result line. Keep the returned guard alive
/// until exit or buffered file output is lost.
pub fn init(app_name: &str, log_dir: Option<&str>, verbose: bool) -> Option<WorkerGuard> {
    // Respects RUST_LOG, falls back to the verbosity flag
    let env_filter = EnvFilter::builder().with_default_directive(default_level(verbose).into()).from_env_lossy();

    let stderr_layer = fmt::layer().with_writer(io::stderr).with_target(verbose).with_line_number(verbose).with_ansi(true).compact();

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let _ = std::fs::create_dir_all(dir);
            let file_appender = tracing_appender::rolling::hourly(dir, format!("{app_name}.log"));
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer =
                fmt::layer().with_writer(non_blocking).with_target(true).with_thread_ids(true).with_line_number(true).with_ansi(false).compact();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry().with(env_filter).with(stderr_layer).with(file_layer).init();

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level() {
        assert_eq!(default_level(false), Level::INFO);
        assert_eq!(default_level(true), Level::DEBUG);
    }
}
