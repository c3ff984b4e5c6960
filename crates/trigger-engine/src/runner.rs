//! Predicate and action invocation, fault-isolated at each call.
//!
//! Each call is wrapped in its own `tokio::spawn` so a panicking user
//! callable surfaces as a `JoinError` rather than unwinding across the
//! dispatch task — the same "continue on error, log and proceed" posture the
//! teacher's processor loop takes with its own per-action failures, pushed
//! down to the granularity of a single predicate/action invocation.

use crate::error::FaultKind;
use crate::types::{EventData, Trigger};
use std::sync::Arc;

/// Outcome of evaluating a trigger's condition.
pub enum ConditionOutcome {
    /// No condition present, or the condition returned true.
    Pass,
    /// The condition returned false; the trigger is skipped silently.
    SkippedByCondition,
    /// The condition raised or panicked; logged, trigger skipped.
    Faulted,
}

/// Evaluates `trigger`'s condition (if any) against `data` inside a fault
/// barrier. A missing condition is treated as always-pass.
pub async fn evaluate_condition(trigger: &Arc<Trigger>, data: &EventData) -> ConditionOutcome {
    if trigger.condition.is_none() {
        return ConditionOutcome::Pass;
    }

    let trigger = trigger.clone();
    let data = data.clone();
    let result = tokio::spawn(async move {
        let condition = trigger
            .condition
            .as_ref()
            .expect("condition presence checked by caller");
        condition.evaluate(&data).await
    })
    .await;

    match result {
        Ok(true) => ConditionOutcome::Pass,
        Ok(false) => ConditionOutcome::SkippedByCondition,
        Err(join_err) => {
            tracing::error!(
                trigger_id = %trigger.id,
                event_type = %trigger.event_type,
                error = %join_err,
                fault = FaultKind::Predicate.as_str(),
                "condition panicked, skipping trigger"
            );
            ConditionOutcome::Faulted
        }
    }
}

/// Invokes a single action inside a fault barrier. Never propagates a
/// failure to the caller — it logs and returns whether the action
/// succeeded, so the caller (the dispatcher) can continue to the next
/// action regardless.
pub async fn run_action(
    trigger: &Arc<Trigger>,
    action_index: usize,
    data: &EventData,
) -> bool {
    let trigger = trigger.clone();
    let data = data.clone();
    let result = tokio::spawn(async move {
        let action = trigger
            .actions
            .get(action_index)
            .expect("action_index is caller-controlled and in bounds");
        action.call(&data).await
    })
    .await;

    match result {
        Ok(Ok(())) => true,
        Ok(Err(action_err)) => {
            tracing::error!(
                trigger_id = %trigger.id,
                event_type = %trigger.event_type,
                action_index,
                error = %action_err,
                fault = FaultKind::Action.as_str(),
                "action returned an error, continuing with next action"
            );
            false
        }
        Err(join_err) => {
            tracing::error!(
                trigger_id = %trigger.id,
                event_type = %trigger.event_type,
                action_index,
                error = %join_err,
                fault = FaultKind::Action.as_str(),
                "action panicked, continuing with next action"
            );
            false
        }
    }
}
