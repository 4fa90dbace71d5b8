//! Log callback system.
//!
//! The store never writes to stdout or stderr on its own. Hosts that want
//! diagnostics install a process-wide callback and route messages into their
//! own logging stack.

use std::sync::{Mutex, OnceLock};

/// Log level for debug callbacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

type LogCallback = Box<dyn Fn(LogLevel, &str) + Send + Sync + 'static>;

fn log_callback() -> &'static Mutex<Option<LogCallback>> {
    static CALLBACK: OnceLock<Mutex<Option<LogCallback>>> = OnceLock::new();
    CALLBACK.get_or_init(|| Mutex::new(None))
}

/// Set the global log callback.
pub fn set_log_callback<F>(callback: F)
where
    F: Fn(LogLevel, &str) + Send + Sync + 'static,
{
    if let Ok(mut guard) = log_callback().lock() {
        *guard = Some(Box::new(callback));
    }
}

/// Remove the global log callback.
pub fn clear_log_callback() {
    if let Ok(mut guard) = log_callback().lock() {
        *guard = None;
    }
}

/// Emit a log message.
pub fn emit_log(level: LogLevel, message: &str) {
    if let Ok(guard) = log_callback().lock() {
        if let Some(callback) = guard.as_ref() {
            callback(level, message);
        }
    }
}

/// Emit a log message, formatting it only when a callback is installed.
pub fn emit_log_with<F>(level: LogLevel, message: F)
where
    F: FnOnce() -> String,
{
    if let Ok(guard) = log_callback().lock() {
        if let Some(callback) = guard.as_ref() {
            callback(level, &message());
        }
    }
}
