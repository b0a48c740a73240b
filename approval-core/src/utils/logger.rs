//! Logging Infrastructure
//!
//! `RUST_LOG` wins when set; otherwise the configured level applies to every
//! target. Security events go to the `security` target (see `security_log!`).

use std::path::Path;

use tracing_subscriber::EnvFilter;

use crate::core::Config;

/// Initialize the logger (stdout, `info`)
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// Initialize from `LOG_LEVEL` / `LOG_DIR`
pub fn init_from_config(config: &Config) {
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
}

/// Initialize the logger with optional daily-rolling file output
///
/// Safe to call more than once; later calls are ignored (tests share one
/// process-wide subscriber).
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(true);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        match std::fs::create_dir_all(log_path) {
            Ok(()) => {
                let file_appender = tracing_appender::rolling::daily(log_path, "approval-core");
                let _ = subscriber.with_ansi(false).with_writer(file_appender).try_init();
                return;
            }
            Err(e) => eprintln!("log dir {dir} unusable ({e}), logging to stdout"),
        }
    }

    let _ = subscriber.try_init();
}
