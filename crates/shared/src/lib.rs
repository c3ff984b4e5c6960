//! Shared library for the trigger engine workspace
//!
//! This crate provides common functionality used across the engine binaries:
//! - Error handling types
//! - Configuration management
//! - Logging infrastructure

pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};

/// Initialize tracing subscriber for structured logging
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shared=debug,trigger_engine=debug,trigger_demo=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
