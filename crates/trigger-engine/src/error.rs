//! Error types for the trigger engine.
//!
//! Only [`EngineError`] is ever surfaced to a caller, and only from
//! `register`. Faults during dispatch (predicate, action, or internal) are
//! contained and logged — they have no public `Result`-carrying type because
//! they never propagate past the dispatcher.

use thiserror::Error;

/// Result type alias for fallible engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors surfaced synchronously to a caller of the public API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A trigger failed registration-time validation.
    #[error("invalid trigger: {0}")]
    InvalidTrigger(String),
}

impl EngineError {
    pub fn invalid_trigger(msg: impl Into<String>) -> Self {
        Self::InvalidTrigger(msg.into())
    }
}

/// Internal fault classification used by the dispatcher and runner.
///
/// These never reach a caller; they exist so logging call sites can tag the
/// failure kind consistently, matching the taxonomy callers rely on when
/// reading logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// A predicate raised or panicked.
    Predicate,
    /// An action raised or panicked.
    Action,
    /// A fault escaped the per-trigger barrier (defense in depth).
    Trigger,
    /// The execution task itself failed outside user code.
    Dispatch,
}

impl FaultKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FaultKind::Predicate => "PredicateFault",
            FaultKind::Action => "ActionFault",
            FaultKind::Trigger => "TriggerFault",
            FaultKind::Dispatch => "DispatchFault",
        }
    }
}
