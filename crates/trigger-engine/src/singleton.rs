//! Process-wide singleton accessor.
//!
//! A convenience, not a correctness requirement (spec §9): callers that
//! prefer explicit dependency injection can construct a [`TriggerEngine`]
//! directly and ignore this module entirely.

use crate::engine::TriggerEngine;
use std::sync::{Arc, OnceLock, RwLock};

static ENGINE: OnceLock<RwLock<Arc<TriggerEngine>>> = OnceLock::new();

fn cell() -> &'static RwLock<Arc<TriggerEngine>> {
    ENGINE.get_or_init(|| RwLock::new(Arc::new(TriggerEngine::with_defaults())))
}

/// Returns the lazily-created, process-wide shared engine instance.
pub fn get_engine() -> Arc<TriggerEngine> {
    cell().read().expect("singleton lock poisoned").clone()
}

/// Replaces the singleton with a fresh instance. Subsequent `get_engine()`
/// calls return the new instance; holders of the previous `Arc` keep it
/// alive until they drop it. Intended for test isolation and shutdown.
pub fn reset_engine() {
    let mut guard = cell().write().expect("singleton lock poisoned");
    *guard = Arc::new(TriggerEngine::with_defaults());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TriggerBuilder;

    #[tokio::test]
    async fn test_singleton_reset_yields_fresh_instance() {
        let before = get_engine();
        before
            .register(TriggerBuilder::new("singleton_test").action(|_d| async { Ok(()) }))
            .unwrap();
        assert_eq!(get_engine().get_triggers(None).len(), 1);

        reset_engine();

        let after = get_engine();
        assert_eq!(after.get_triggers(None).len(), 0);
        assert!(!Arc::ptr_eq(&before, &after));
    }
}
