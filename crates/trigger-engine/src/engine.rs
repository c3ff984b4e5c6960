//! Public façade composing the registry, concurrency limiter, diagnostic
//! pass-through, and dispatcher into the single `TriggerEngine` API
//! producers and management tooling consume.

use crate::config::EngineConfig;
use crate::dispatcher::Dispatcher;
use crate::error::Result;
use crate::limiter::ConcurrencyLimiter;
use crate::listener::{EventListener, ListenerBus};
use crate::registry::Registry;
use crate::types::{EventData, Trigger, TriggerBuilder};
use std::sync::Arc;

/// Snapshot returned by [`TriggerEngine::get_stats`].
#[derive(Debug, Clone, Default)]
pub struct EngineStats {
    pub total_triggers: usize,
    pub triggers_by_event: std::collections::HashMap<String, usize>,
    pub executing_count: usize,
}

/// The trigger engine: a registry-and-dispatcher pair with a bounded
/// concurrency ceiling. Cheaply cloneable — every clone shares the same
/// underlying state via `Arc`.
#[derive(Clone)]
pub struct TriggerEngine {
    registry: Arc<Registry>,
    limiter: Arc<ConcurrencyLimiter>,
    listeners: Arc<ListenerBus>,
    dispatcher: Arc<Dispatcher>,
}

impl TriggerEngine {
    pub fn new(config: EngineConfig) -> Self {
        let registry = Arc::new(Registry::new());
        let limiter = Arc::new(ConcurrencyLimiter::new(config.max_concurrent_executions));
        let listeners = Arc::new(ListenerBus::new(config.max_listeners));
        let dispatcher = Arc::new(Dispatcher::new(
            registry.clone(),
            limiter.clone(),
            listeners.clone(),
        ));
        Self {
            registry,
            limiter,
            listeners,
            dispatcher,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(EngineConfig::default())
    }

    /// Validates and registers a trigger, returning its (possibly assigned)
    /// id. Fails synchronously with [`EngineError::InvalidTrigger`].
    pub fn register(&self, trigger: TriggerBuilder) -> Result<String> {
        self.registry.register(trigger)
    }

    /// Removes a trigger by id. Returns whether one was found.
    pub fn unregister(&self, id: &str) -> bool {
        self.registry.unregister(id)
    }

    /// Schedules dispatch for `event_type` and returns once scheduling has
    /// completed — never once every matching trigger has finished running.
    pub async fn emit(&self, event_type: impl Into<String>, data: EventData) {
        self.dispatcher.emit(event_type, data).await
    }

    pub fn get_triggers(&self, event_type: Option<&str>) -> Vec<Arc<Trigger>> {
        self.registry.get_triggers(event_type)
    }

    pub fn get_trigger_count(&self, event_type: Option<&str>) -> usize {
        self.registry.get_trigger_count(event_type)
    }

    pub fn get_stats(&self) -> EngineStats {
        let stats = self.registry.stats();
        EngineStats {
            total_triggers: stats.total_triggers,
            triggers_by_event: stats.triggers_by_event,
            executing_count: self.limiter.executing_count(),
        }
    }

    /// Removes an entire event-type bucket, returning the count removed.
    pub fn clear_event(&self, event_type: &str) -> usize {
        self.registry.clear_event(event_type)
    }

    /// Empties the registry entirely. Does not affect in-flight dispatches
    /// already holding a snapshot.
    pub fn clear_all(&self) {
        self.registry.clear_all()
    }

    /// Subscribes an observer to the diagnostic pass-through. Observational
    /// only; see [`ListenerBus`].
    pub fn subscribe(&self, listener: Arc<dyn EventListener>) {
        self.listeners.subscribe(listener)
    }
}
