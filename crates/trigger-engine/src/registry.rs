//! Thread-safe mapping from event type to a priority-ordered trigger bucket.
//!
//! Mutations replace a bucket wholesale (copy-on-write) so a snapshot taken
//! for dispatch is an immutable view unaffected by later registry activity,
//! per the strategy spec §4.1 suggests.

use crate::error::{EngineError, Result};
use crate::types::{generate_trigger_id, Trigger, TriggerBuilder};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, RwLock};

/// An immutable, priority-ordered view of one event type's triggers.
pub type Bucket = Arc<Vec<Arc<Trigger>>>;

/// A point-in-time summary of registry contents.
#[derive(Debug, Clone, Default)]
pub struct RegistryStats {
    pub total_triggers: usize,
    pub triggers_by_event: HashMap<String, usize>,
}

#[derive(Default)]
pub struct Registry {
    buckets: RwLock<HashMap<String, Bucket>>,
    seq: AtomicU64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, AtomicOrdering::Relaxed)
    }

    /// Validates, assigns an id if needed, inserts, and re-sorts the
    /// affected bucket. Returns the (possibly assigned) id.
    pub fn register(&self, builder: TriggerBuilder) -> Result<String> {
        let (id, event_type, description, priority, condition, actions) = builder.into_parts();

        if event_type.trim().is_empty() {
            return Err(EngineError::invalid_trigger("eventType must not be empty"));
        }
        if actions.is_empty() {
            return Err(EngineError::invalid_trigger("actions must not be empty"));
        }

        let mut buckets = self.buckets.write().expect("registry lock poisoned");

        if let Some(ref requested_id) = id {
            let collides = buckets
                .values()
                .any(|bucket| bucket.iter().any(|t| &t.id == requested_id));
            if collides {
                return Err(EngineError::invalid_trigger(format!(
                    "trigger id '{requested_id}' is already registered"
                )));
            }
        }

        let resolved_id = id.unwrap_or_else(|| generate_trigger_id(&event_type));
        let trigger = Arc::new(Trigger {
            id: resolved_id.clone(),
            event_type: event_type.clone(),
            description,
            priority,
            condition,
            actions,
            seq: self.next_seq(),
        });

        let existing = buckets.get(&event_type).cloned().unwrap_or_default();
        let mut next: Vec<Arc<Trigger>> = (*existing).clone();
        next.push(trigger);
        next.sort_by(|a, b| a.priority.cmp(&b.priority).then(a.seq.cmp(&b.seq)));
        buckets.insert(event_type, Arc::new(next));

        tracing::debug!(trigger_id = %resolved_id, "registered trigger");
        Ok(resolved_id)
    }

    /// Removes the trigger with the given id from whichever bucket holds it.
    /// Drops the bucket entirely if it becomes empty. Returns whether a
    /// trigger was found.
    pub fn unregister(&self, id: &str) -> bool {
        let mut buckets = self.buckets.write().expect("registry lock poisoned");
        let mut found = false;
        let mut emptied: Option<String> = None;

        for (event_type, bucket) in buckets.iter_mut() {
            if !bucket.iter().any(|t| t.id == id) {
                continue;
            }
            let next: Vec<Arc<Trigger>> =
                bucket.iter().filter(|t| t.id != id).cloned().collect();
            found = true;
            if next.is_empty() {
                emptied = Some(event_type.clone());
            } else {
                *bucket = Arc::new(next);
            }
            break;
        }

        if let Some(event_type) = emptied {
            buckets.remove(&event_type);
        }

        if found {
            tracing::debug!(trigger_id = %id, "unregistered trigger");
        }
        found
    }

    /// Removes an entire event-type bucket, returning the count removed.
    pub fn clear_event(&self, event_type: &str) -> usize {
        let mut buckets = self.buckets.write().expect("registry lock poisoned");
        buckets.remove(event_type).map(|b| b.len()).unwrap_or(0)
    }

    /// Empties the registry entirely.
    pub fn clear_all(&self) {
        let mut buckets = self.buckets.write().expect("registry lock poisoned");
        buckets.clear();
    }

    /// Returns the live, immutable bucket for `event_type`, suitable for a
    /// dispatch snapshot. Cloning an `Arc` is O(1); the contents are never
    /// mutated in place.
    pub fn snapshot(&self, event_type: &str) -> Option<Bucket> {
        let buckets = self.buckets.read().expect("registry lock poisoned");
        buckets.get(event_type).cloned()
    }

    /// Defensive-copy view for the management API: either one bucket or the
    /// flat union of all buckets.
    pub fn get_triggers(&self, event_type: Option<&str>) -> Vec<Arc<Trigger>> {
        let buckets = self.buckets.read().expect("registry lock poisoned");
        match event_type {
            Some(et) => buckets.get(et).map(|b| (**b).clone()).unwrap_or_default(),
            None => buckets.values().flat_map(|b| (**b).clone()).collect(),
        }
    }

    pub fn get_trigger_count(&self, event_type: Option<&str>) -> usize {
        let buckets = self.buckets.read().expect("registry lock poisoned");
        match event_type {
            Some(et) => buckets.get(et).map(|b| b.len()).unwrap_or(0),
            None => buckets.values().map(|b| b.len()).sum(),
        }
    }

    pub fn stats(&self) -> RegistryStats {
        let buckets = self.buckets.read().expect("registry lock poisoned");
        let triggers_by_event: HashMap<String, usize> = buckets
            .iter()
            .map(|(event_type, bucket)| (event_type.clone(), bucket.len()))
            .collect();
        let total_triggers = triggers_by_event.values().sum();
        RegistryStats {
            total_triggers,
            triggers_by_event,
        }
    }
}
