//! In-process event trigger engine.
//!
//! A registry-and-dispatcher that lets subscribers register named triggers
//! (event type, optional predicate, ordered action list) and fire events
//! non-blockingly, with bounded concurrency, priority ordering, and
//! per-action fault isolation. See each module for its piece of the
//! contract; [`engine::TriggerEngine`] is the public façade.

pub mod config;
pub mod dispatcher;
pub mod engine;
pub mod error;
pub mod limiter;
pub mod listener;
pub mod payloads;
pub mod registry;
pub mod runner;
pub mod singleton;
pub mod types;

pub use config::EngineConfig;
pub use engine::{EngineStats, TriggerEngine};
pub use error::{EngineError, Result};
pub use listener::EventListener;
pub use singleton::{get_engine, reset_engine};
pub use types::{Action, Condition, EventData, Priority, Trigger, TriggerBuilder};
