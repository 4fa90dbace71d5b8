//! Test fixtures and helpers for tree store tests.
//!
//! - [`CountingStorage`] - Arena storage that counts primitive calls
//! - [`TreeModel`] - Naive `Vec`-based reference tree
//! - [`setup_test_logging`] - Routes store logs into `tracing`

#![allow(clippy::nursery)] // Test fixtures prioritize clarity over pedantry
#![allow(clippy::pedantic)] // Test fixtures prioritize clarity over pedantry
#![allow(dead_code)] // Not every test binary uses every fixture

pub mod counting_storage;
pub mod tree_model;

pub use counting_storage::*;
pub use tree_model::*;

use std::sync::Once;
use treestore_rust::{LogLevel, set_log_callback};

/// Install a `tracing` subscriber and forward store logs into it.
pub fn setup_test_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .try_init();
        set_log_callback(|level, message| match level {
            LogLevel::Trace => tracing::trace!(target: "treestore", "{message}"),
            LogLevel::Debug => tracing::debug!(target: "treestore", "{message}"),
            LogLevel::Info => tracing::info!(target: "treestore", "{message}"),
            LogLevel::Warn => tracing::warn!(target: "treestore", "{message}"),
            LogLevel::Error => tracing::error!(target: "treestore", "{message}"),
        });
    });
}
