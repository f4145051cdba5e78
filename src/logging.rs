//! # Structured Logging Module
//!
//! Environment-aware console logging using the tracing ecosystem. The library
//! itself only emits `tracing` events; applications that have no subscriber of
//! their own can call [`init_console_only`].
//!
//! Environment:
//! - `TASKQ_ENV` (or `APP_ENV`): `development` / `test` log at debug, `production` at info
//! - `RUST_LOG`: overrides the level filter entirely
//! - `TASKQ_LOG_FORMAT=json`: emit JSON lines instead of human-readable text

use std::io::IsTerminal;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static TRACING_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize console logging once per process
///
/// Safe to call repeatedly, and safe to call when another global subscriber
/// is already installed.
pub fn init_console_only() {
    let environment = get_environment();
    init_with_default_level(&environment, get_log_level(&environment));
}

/// Initialize console logging at a level chosen by CLI verbosity (`-v` count)
///
/// `RUST_LOG` still takes precedence when set.
pub fn init_for_verbosity(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    init_with_default_level(&get_environment(), level);
}

fn init_with_default_level(environment: &str, default_level: &str) {
    TRACING_INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_level));
        let json_output = std::env::var("TASKQ_LOG_FORMAT")
            .map(|format| format.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let console_layer = if json_output {
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .json()
                .with_filter(filter)
                .boxed()
        } else {
            let use_ansi = IsTerminal::is_terminal(&std::io::stderr());
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(use_ansi)
                .with_filter(filter)
                .boxed()
        };

        let subscriber = tracing_subscriber::registry().with(console_layer);

        if subscriber.try_init().is_err() {
            tracing::debug!(
                "Global tracing subscriber already initialized - continuing with existing subscriber"
            );
        } else {
            tracing::info!(
                environment = %environment,
                json_output = json_output,
                "Console logging initialized"
            );
        }
    });
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var("TASKQ_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> &'static str {
    match environment {
        "test" | "development" => "debug",
        "production" => "info",
        _ => "debug",
    }
}
