//! Logging setup via `tracing`, mirroring the teacher's `log::initialize_logging`:
//! ANSI output to stdout always, plus an optional daily-rolling file
//! appender when a log directory is configured.

use std::path::Path;

use tracing_appender::rolling;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn initialize_logging(log_dir: Option<&str>, log_level: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    if let Some(dir) = log_dir {
        let path = Path::new(dir);
        if !path.exists() {
            let _ = std::fs::create_dir_all(path);
        }

        let file_appender = rolling::daily(dir, "srp6a-gateway.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        std::mem::forget(guard);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_ansi(true).with_target(false).with_thread_ids(false))
            .with(fmt::layer().with_writer(non_blocking).with_ansi(false).with_target(true))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_ansi(true).with_target(false).with_thread_ids(false))
            .init();
    }
}
