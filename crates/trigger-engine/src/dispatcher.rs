//! Non-blocking `emit` and the background execution task it schedules.

use crate::error::FaultKind;
use crate::limiter::ConcurrencyLimiter;
use crate::listener::ListenerBus;
use crate::registry::{Bucket, Registry};
use crate::runner::{evaluate_condition, run_action, ConditionOutcome};
use crate::types::{EventData, Trigger};
use std::sync::Arc;

pub struct Dispatcher {
    registry: Arc<Registry>,
    limiter: Arc<ConcurrencyLimiter>,
    listeners: Arc<ListenerBus>,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>, limiter: Arc<ConcurrencyLimiter>, listeners: Arc<ListenerBus>) -> Self {
        Self {
            registry,
            limiter,
            listeners,
        }
    }

    /// Snapshots the matching bucket, notifies the diagnostic pass-through
    /// synchronously, then schedules a background execution task and
    /// returns without awaiting any trigger's completion.
    pub async fn emit(&self, event_type: impl Into<String>, data: EventData) {
        let event_type = event_type.into();

        self.listeners.notify(&event_type, &data).await;

        let bucket = match self.registry.snapshot(&event_type) {
            Some(bucket) if !bucket.is_empty() => bucket,
            _ => {
                tracing::debug!(event_type = %event_type, "emit: no triggers registered, nothing to dispatch");
                return;
            }
        };

        let limiter = self.limiter.clone();
        tokio::spawn(supervise_dispatch(event_type, bucket, data, limiter));
    }
}

/// Wraps the execution task in its own fault barrier: a panic in scheduling
/// or snapshotting code that somehow escapes `execute_dispatch` itself (as
/// opposed to a per-trigger fault, already isolated below) is logged and
/// swallowed rather than left to the runtime's default panic handler.
async fn supervise_dispatch(
    event_type: String,
    bucket: Bucket,
    data: EventData,
    limiter: Arc<ConcurrencyLimiter>,
) {
    let et = event_type.clone();
    let result = tokio::spawn(execute_dispatch(event_type, bucket, data, limiter)).await;
    if let Err(join_err) = result {
        tracing::error!(
            event_type = %et,
            error = %join_err,
            fault = FaultKind::Dispatch.as_str(),
            "execution task failed outside user code"
        );
    }
}

/// The background execution task: admits through the concurrency limiter,
/// then runs every trigger in the snapshot in stored order.
async fn execute_dispatch(
    event_type: String,
    bucket: Bucket,
    data: EventData,
    limiter: Arc<ConcurrencyLimiter>,
) {
    let _permit = limiter.acquire().await;

    tracing::debug!(
        event_type = %event_type,
        trigger_count = bucket.len(),
        "dispatch: execution slot acquired"
    );

    for trigger in bucket.iter() {
        let trigger = trigger.clone();
        let data = data.clone();
        // Defense-in-depth barrier: a fault that somehow escapes the
        // predicate/action barriers inside `dispatch_trigger` still must not
        // stop the rest of the snapshot from running.
        let result = tokio::spawn(async move { dispatch_trigger(&trigger, &data).await }).await;
        if let Err(join_err) = result {
            tracing::error!(
                event_type = %event_type,
                error = %join_err,
                fault = FaultKind::Trigger.as_str(),
                "trigger dispatch panicked, continuing with next trigger"
            );
        }
    }
}

/// Evaluates one trigger's condition and, if it passes, runs its actions in
/// declared order.
async fn dispatch_trigger(trigger: &Arc<Trigger>, data: &EventData) {
    match evaluate_condition(trigger, data).await {
        ConditionOutcome::Pass => {
            for action_index in 0..trigger.actions.len() {
                run_action(trigger, action_index, data).await;
            }
        }
        ConditionOutcome::SkippedByCondition => {
            tracing::debug!(
                trigger_id = %trigger.id,
                event_type = %trigger.event_type,
                "condition returned false, skipping trigger"
            );
        }
        ConditionOutcome::Faulted => {
            // Already logged inside `evaluate_condition`.
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Priority, TriggerBuilder};
    use serde_json::json;
    use std::sync::{Arc as StdArc, Mutex};
    use std::time::Duration;
    use tokio::sync::Mutex as AsyncMutex;

    #[tokio::test]
    async fn test_emit_on_empty_bucket_returns_immediately() {
        let registry = StdArc::new(Registry::new());
        let limiter = StdArc::new(ConcurrencyLimiter::new(10));
        let listeners = StdArc::new(ListenerBus::new(crate::listener::DEFAULT_MAX_LISTENERS));
        let dispatcher = Dispatcher::new(registry, limiter, listeners);
        dispatcher.emit("nonexistent", json!({})).await;
    }

    #[tokio::test]
    async fn test_priority_ordering_scenario() {
        let registry = StdArc::new(Registry::new());
        let order = StdArc::new(Mutex::new(Vec::<&'static str>::new()));

        let order_n = order.clone();
        registry
            .register(
                TriggerBuilder::new("priority_test")
                    .priority(Priority::Normal)
                    .action(move |_d| {
                        let order = order_n.clone();
                        async move {
                            order.lock().unwrap().push("normal");
                            Ok(())
                        }
                    }),
            )
            .unwrap();

        let order_l = order.clone();
        registry
            .register(
                TriggerBuilder::new("priority_test")
                    .priority(Priority::Low)
                    .action(move |_d| {
                        let order = order_l.clone();
                        async move {
                            order.lock().unwrap().push("low");
                            Ok(())
                        }
                    }),
            )
            .unwrap();

        let order_h = order.clone();
        registry
            .register(
                TriggerBuilder::new("priority_test")
                    .priority(Priority::High)
                    .action(move |_d| {
                        let order = order_h.clone();
                        async move {
                            order.lock().unwrap().push("high");
                            Ok(())
                        }
                    }),
            )
            .unwrap();

        let limiter = StdArc::new(ConcurrencyLimiter::new(10));
        let listeners = StdArc::new(ListenerBus::new(crate::listener::DEFAULT_MAX_LISTENERS));
        let dispatcher = Dispatcher::new(registry, limiter, listeners);
        dispatcher.emit("priority_test", json!({})).await;

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(*order.lock().unwrap(), vec!["high", "normal", "low"]);
    }

    #[tokio::test]
    async fn test_fault_isolation_within_a_trigger() {
        let registry = StdArc::new(Registry::new());
        let log = StdArc::new(Mutex::new(Vec::<&'static str>::new()));
        let log_clone = log.clone();

        registry
            .register(
                TriggerBuilder::new("error_test")
                    .action(|_d| async { Err(anyhow::anyhow!("boom")) })
                    .action(move |_d| {
                        let log = log_clone.clone();
                        async move {
                            log.lock().unwrap().push("second_action");
                            Ok(())
                        }
                    }),
            )
            .unwrap();

        let limiter = StdArc::new(ConcurrencyLimiter::new(10));
        let listeners = StdArc::new(ListenerBus::new(crate::listener::DEFAULT_MAX_LISTENERS));
        let dispatcher = Dispatcher::new(registry, limiter, listeners);
        dispatcher.emit("error_test", json!({})).await;

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(*log.lock().unwrap(), vec!["second_action"]);
    }

    #[tokio::test]
    async fn test_fault_isolation_across_triggers() {
        let registry = StdArc::new(Registry::new());
        let log = StdArc::new(Mutex::new(Vec::<&'static str>::new()));

        let log_first = log.clone();
        registry
            .register(TriggerBuilder::new("trigger_error1").action(move |_d| {
                let log = log_first.clone();
                async move {
                    log.lock().unwrap().push("first");
                    Ok(())
                }
            }))
            .unwrap();

        registry
            .register(
                TriggerBuilder::new("trigger_error1")
                    .condition(|_d| async { panic!("predicate boom") })
                    .action(|_d| async { Ok(()) }),
            )
            .unwrap();

        let log_third = log.clone();
        registry
            .register(TriggerBuilder::new("trigger_error1").action(move |_d| {
                let log = log_third.clone();
                async move {
                    log.lock().unwrap().push("third");
                    Ok(())
                }
            }))
            .unwrap();

        let limiter = StdArc::new(ConcurrencyLimiter::new(10));
        let listeners = StdArc::new(ListenerBus::new(crate::listener::DEFAULT_MAX_LISTENERS));
        let dispatcher = Dispatcher::new(registry, limiter, listeners);
        dispatcher.emit("trigger_error1", json!({})).await;

        tokio::time::sleep(Duration::from_millis(50)).await;
        let mut seen = log.lock().unwrap().clone();
        seen.sort();
        assert_eq!(seen, vec!["first", "third"]);
    }

    #[tokio::test]
    async fn test_conditional_skipping() {
        let registry = StdArc::new(Registry::new());
        let seen = StdArc::new(AsyncMutex::new(Vec::new()));
        let seen_clone = seen.clone();

        registry
            .register(
                TriggerBuilder::new("quality_gate")
                    .condition(|data| async move {
                        data.get("allPassed").and_then(|v| v.as_bool()).unwrap_or(false)
                    })
                    .action(move |data| {
                        let seen = seen_clone.clone();
                        async move {
                            seen.lock().await.push(data);
                            Ok(())
                        }
                    }),
            )
            .unwrap();

        let limiter = StdArc::new(ConcurrencyLimiter::new(10));
        let listeners = StdArc::new(ListenerBus::new(crate::listener::DEFAULT_MAX_LISTENERS));
        let dispatcher = Dispatcher::new(registry.clone(), limiter.clone(), listeners.clone());

        dispatcher.emit("quality_gate", json!({"allPassed": false})).await;
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(seen.lock().await.is_empty());

        dispatcher.emit("quality_gate", json!({"allPassed": true})).await;
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(seen.lock().await.len(), 1);
        assert_eq!(seen.lock().await[0], json!({"allPassed": true}));
    }
}
