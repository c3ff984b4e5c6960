//! Canonical event payload shapes (spec §6).
//!
//! The engine never inspects these — `emit` and every `Action`/`Condition`
//! only ever see a [`crate::types::EventData`] (`serde_json::Value`). These
//! structs exist purely so producers and handlers that agree on one of the
//! recognized event types have something concrete to serialize into and
//! deserialize out of, the way `shared::models` gives concrete types to the
//! teacher's own domain shapes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityGatePassed {
    pub project_id: String,
    pub commit_sha: String,
    pub tests_passed: bool,
    pub all_checks: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_details: Option<HashMap<String, bool>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestFailed {
    pub project_id: String,
    pub test_name: String,
    pub error_message: String,
    pub failure_count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Warning,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostAlert {
    pub project_id: String,
    pub daily_cost: f64,
    pub monthly_cost: f64,
    pub daily_limit: f64,
    pub monthly_limit: f64,
    pub percent_of_limit: f64,
    pub alert_level: AlertLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentTimeout {
    pub agent_id: String,
    pub task_id: String,
    pub running_ms: i64,
    pub timeout_ms: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowCompleted {
    pub workflow_id: String,
    pub project_id: String,
    pub total_cost: f64,
    pub execution_time_ms: i64,
    pub agents_used: Vec<String>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildStarted {
    pub build_id: String,
    pub project_id: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildCompleted {
    pub build_id: String,
    pub project_id: String,
    pub version: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentStarted {
    pub deployment_id: String,
    pub project_id: String,
    pub environment: String,
    pub version: String,
    pub commit_sha: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityAlert {
    pub alert_id: String,
    pub severity: String,
    pub title: String,
    pub description: String,
    pub affected_component: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cve_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation_steps: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_quality_gate_passed_round_trips_through_json() {
        let payload = QualityGatePassed {
            project_id: "proj-1".into(),
            commit_sha: "abc123".into(),
            tests_passed: true,
            all_checks: true,
            check_details: None,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["projectId"], json!("proj-1"));
        let back: QualityGatePassed = serde_json::from_value(value).unwrap();
        assert_eq!(back.commit_sha, "abc123");
    }

    #[test]
    fn test_cost_alert_alert_level_serializes_lowercase() {
        let payload = CostAlert {
            project_id: "proj-1".into(),
            daily_cost: 10.0,
            monthly_cost: 200.0,
            daily_limit: 50.0,
            monthly_limit: 1000.0,
            percent_of_limit: 20.0,
            alert_level: AlertLevel::Critical,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["alertLevel"], json!("critical"));
    }
}
