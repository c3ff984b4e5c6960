//! Optional diagnostic pass-through: every `emit` is re-published here,
//! purely for external observers. Per spec §9, this is a legacy convenience
//! — subscribers must never affect dispatch latency or outcome, and their
//! failures are treated exactly like an `ActionFault`: caught, logged,
//! ignored.

use crate::error::FaultKind;
use crate::types::EventData;
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// An external observer of every emitted event, independent of trigger
/// matching.
#[async_trait]
pub trait EventListener: Send + Sync {
    async fn on_event(&self, event_type: &str, data: &EventData);
}

/// Default soft cap on registered listeners; not semantically meaningful,
/// large enough to avoid spurious warnings (spec §6, `maxListeners`).
pub const DEFAULT_MAX_LISTENERS: usize = 100;

pub struct ListenerBus {
    listeners: RwLock<Vec<Arc<dyn EventListener>>>,
    max_listeners: usize,
}

impl ListenerBus {
    pub fn new(max_listeners: usize) -> Self {
        Self {
            listeners: RwLock::new(Vec::new()),
            max_listeners,
        }
    }

    pub fn subscribe(&self, listener: Arc<dyn EventListener>) {
        let mut listeners = self.listeners.write().expect("listener lock poisoned");
        if listeners.len() >= self.max_listeners {
            tracing::warn!(
                max_listeners = self.max_listeners,
                "diagnostic pass-through at capacity, dropping new subscriber"
            );
            return;
        }
        listeners.push(listener);
    }

    /// Notifies every subscriber synchronously, within the caller's `emit`,
    /// before dispatch is scheduled. Each call is fault-isolated the same
    /// way an action is: a panicking listener is logged and skipped, never
    /// propagated.
    pub async fn notify(&self, event_type: &str, data: &EventData) {
        let listeners = {
            let guard = self.listeners.read().expect("listener lock poisoned");
            guard.clone()
        };
        if listeners.is_empty() {
            return;
        }

        for listener in listeners {
            let event_type = event_type.to_string();
            let data = data.clone();
            let result = tokio::spawn(async move { listener.on_event(&event_type, &data).await })
                .await;
            if let Err(join_err) = result {
                tracing::warn!(
                    error = %join_err,
                    fault = FaultKind::Action.as_str(),
                    "diagnostic listener panicked, ignoring"
                );
            }
        }
    }
}
