//! Structured logging utilities for ctlrelay components.
//!
//! Provides consistent logging with component prefixes and structured fields.
//!
//! # Usage
//!
//! ```ignore
//! use ctlrelay_config::log_relay_debug;
//!
//! log_relay_debug!("Command written", bytes = 5);
//! ```

/// Component identifiers for log filtering
pub struct Component;

impl Component {
    pub const RELAY: &'static str = "RELAY";
    pub const EXEC: &'static str = "EXEC";
    pub const CONFIG: &'static str = "CONFIG";
}

/// Env var consulted before `RUST_LOG`
pub const LOG_ENV: &str = "CTLRELAY_LOG";

/// Log levels for runtime configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

// === RELAY logging macros ===

#[macro_export]
macro_rules! log_relay_debug {
    ($msg:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::debug!(component = $crate::logging::Component::RELAY, $($key = $value,)* $msg)
    };
}

// === EXEC logging macros ===

#[macro_export]
macro_rules! log_exec_debug {
    ($msg:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::debug!(component = $crate::logging::Component::EXEC, $($key = $value,)* $msg)
    };
}

// === CONFIG logging macros ===

#[macro_export]
macro_rules! log_config_debug {
    ($msg:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::debug!(component = $crate::logging::Component::CONFIG, $($key = $value,)* $msg)
    };
}

/// Initialize logging with the given level as fallback filter.
/// Call this once at application startup. Output goes to stderr so a
/// program exec'd afterwards owns stdout.
pub fn init_logging(level: LogLevel) {
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(level.as_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
