//! Engine configuration loaded from the environment, in the same shape the
//! teacher's per-crate `*Config::from_env()` constructors use.

use crate::listener::DEFAULT_MAX_LISTENERS;
use shared::config::parse_env_or;
use shared::error::Result;

/// Tunables for a [`crate::engine::TriggerEngine`] instance.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Ceiling on concurrently executing dispatch tasks. Default `10`.
    pub max_concurrent_executions: usize,
    /// Soft cap on diagnostic pass-through subscribers. Not semantically
    /// meaningful; only avoids spurious warnings. Default `100`.
    pub max_listeners: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_executions: 10,
            max_listeners: DEFAULT_MAX_LISTENERS,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            max_concurrent_executions: parse_env_or("MAX_CONCURRENT_EXECUTIONS", 10)?,
            max_listeners: parse_env_or("MAX_LISTENERS", DEFAULT_MAX_LISTENERS)?,
        })
    }
}
