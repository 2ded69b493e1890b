//! Logging Infrastructure
//!
//! Plain terminal logging for the one-shot commands, a tui-logger panel for
//! the popup. Both can also write to a daily rolling file.

use std::path::Path;

use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE_PREFIX: &str = "label-popup";

fn env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level))
}

fn file_appender(log_dir: Option<&str>) -> Option<RollingFileAppender> {
    let dir = log_dir?;
    if let Err(e) = std::fs::create_dir_all(Path::new(dir)) {
        eprintln!("Cannot create log directory {}: {}", dir, e);
        return None;
    }
    Some(tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX))
}

/// Initialize the logger for command line use
pub fn init_logger(log_level: &str, log_dir: Option<&str>) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter(log_level))
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false)
        .with_writer(std::io::stderr);

    match file_appender(log_dir) {
        Some(appender) => subscriber.with_ansi(false).with_writer(appender).init(),
        None => subscriber.init(),
    }
}

/// Initialize the logger for the popup, routing events to the log panel
pub fn init_tui_logger(log_level: &str, log_dir: Option<&str>) {
    let file_layer = file_appender(log_dir).map(|appender| {
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_writer(appender)
    });

    tracing_subscriber::registry()
        .with(tui_logger::tracing_subscriber_layer())
        .with(file_layer)
        .with(env_filter(log_level))
        .init();

    // log crate adapter for dependencies that still use it
    let level = log_level.parse().unwrap_or(log::LevelFilter::Info);
    tui_logger::init_logger(level).ok();
    tui_logger::set_default_level(level);
}
