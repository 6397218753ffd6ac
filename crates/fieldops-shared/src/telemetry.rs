//! Telemetry setup

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_telemetry() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().json())
        .init();
}

/// Like [`init_telemetry`], but additionally writes JSON logs to daily rolling
/// files under `dir`. The returned guard must be kept alive for the lifetime
/// of the process or buffered log lines are lost.
pub fn init_telemetry_with_file(dir: &str, file_prefix: &str) -> WorkerGuard {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_appender = tracing_appender::rolling::daily(dir, file_prefix);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().json())
        .with(fmt::layer().json().with_ansi(false).with_writer(non_blocking))
        .init();
    guard
}
