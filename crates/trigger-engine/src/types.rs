//! Core data model: triggers, priorities, and the opaque action/condition
//! callables they carry.

use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

/// Opaque payload passed to every condition and action. The engine never
/// inspects it; see `payloads` for the typed shapes producers/handlers agree
/// on out of band.
pub type EventData = Value;

/// Coarse dispatch-order tag. `High` sorts before `Normal` before `Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Priority {
    High,
    #[default]
    Normal,
    Low,
}

impl Priority {
    fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Normal => 1,
            Priority::Low => 2,
        }
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::High => "high",
            Priority::Normal => "normal",
            Priority::Low => "low",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Priority::High),
            "normal" => Ok(Priority::Normal),
            "low" => Ok(Priority::Low),
            other => Err(format!("unknown priority: {other}")),
        }
    }
}

/// A pure (expected-to-be-pure) predicate gating whether a trigger's actions
/// run for a given payload. Truthiness coercion is the caller's
/// responsibility upstream of this trait — the boolean is already resolved
/// by the time it reaches here.
#[async_trait]
pub trait Condition: Send + Sync {
    async fn evaluate(&self, data: &EventData) -> bool;
}

/// A single unit of side-effecting work belonging to a trigger.
#[async_trait]
pub trait Action: Send + Sync {
    async fn call(&self, data: &EventData) -> anyhow::Result<()>;
}

#[async_trait]
impl<F, Fut> Condition for F
where
    F: Fn(EventData) -> Fut + Send + Sync,
    Fut: std::future::Future<Output = bool> + Send,
{
    async fn evaluate(&self, data: &EventData) -> bool {
        (self)(data.clone()).await
    }
}

#[async_trait]
impl<F, Fut> Action for F
where
    F: Fn(EventData) -> Fut + Send + Sync,
    Fut: std::future::Future<Output = anyhow::Result<()>> + Send,
{
    async fn call(&self, data: &EventData) -> anyhow::Result<()> {
        (self)(data.clone()).await
    }
}

static TRIGGER_SEQ: AtomicU64 = AtomicU64::new(0);

/// Generates a unique trigger id when none was supplied at registration:
/// `{eventType}-{monotonic counter}-{short random suffix}`.
pub fn generate_trigger_id(event_type: &str) -> String {
    let seq = TRIGGER_SEQ.fetch_add(1, AtomicOrdering::Relaxed);
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{event_type}-{seq}-{}", &suffix[..8])
}

/// A registered subscription: event type, optional predicate, and an
/// ordered, non-empty list of actions.
pub struct Trigger {
    pub id: String,
    pub event_type: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub condition: Option<Box<dyn Condition>>,
    pub actions: Vec<Box<dyn Action>>,
    /// Monotonic insertion sequence, used as the stable tie-break within a
    /// priority tier. Assigned by the registry at registration time.
    pub seq: u64,
}

impl fmt::Debug for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trigger")
            .field("id", &self.id)
            .field("event_type", &self.event_type)
            .field("description", &self.description)
            .field("priority", &self.priority)
            .field("has_condition", &self.condition.is_some())
            .field("action_count", &self.actions.len())
            .field("seq", &self.seq)
            .finish()
    }
}

/// Builder used by callers to assemble a [`Trigger`] before handing it to
/// `register`. Mirrors the optional/defaulted fields in the data model.
pub struct TriggerBuilder {
    id: Option<String>,
    event_type: String,
    description: Option<String>,
    priority: Priority,
    condition: Option<Box<dyn Condition>>,
    actions: Vec<Box<dyn Action>>,
}

impl TriggerBuilder {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            id: None,
            event_type: event_type.into(),
            description: None,
            priority: Priority::default(),
            condition: None,
            actions: Vec::new(),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn condition(mut self, condition: impl Condition + 'static) -> Self {
        self.condition = Some(Box::new(condition));
        self
    }

    pub fn action(mut self, action: impl Action + 'static) -> Self {
        self.actions.push(Box::new(action));
        self
    }

    /// Consumes the builder, producing the raw parts `Registry::register`
    /// needs. Validation (non-empty `event_type`/`actions`) happens there,
    /// not here, so construction itself never fails.
    pub(crate) fn into_parts(
        self,
    ) -> (
        Option<String>,
        String,
        Option<String>,
        Priority,
        Option<Box<dyn Condition>>,
        Vec<Box<dyn Action>>,
    ) {
        (
            self.id,
            self.event_type,
            self.description,
            self.priority,
            self.condition,
            self.actions,
        )
    }
}
