//! Trigger engine demo
//!
//! Registers a handful of sample triggers for the canonical event types and
//! emits representative events against them, then waits for a shutdown
//! signal. Action bodies are log-only stubs — concrete deploy/alert/notify
//! integrations are consumers of this engine, not part of it.

use anyhow::{Context, Result};
use serde_json::json;
use shared::Config;
use tokio::signal;
use trigger_engine::{EngineConfig, Priority, TriggerBuilder, TriggerEngine};

#[tokio::main]
async fn main() -> Result<()> {
    shared::init_tracing();

    tracing::info!("Starting trigger-demo...");

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(service_name = %config.service_name, "Configuration loaded");

    let engine_config = EngineConfig::from_env().context("Failed to load engine configuration")?;
    let engine = TriggerEngine::new(engine_config);

    register_sample_triggers(&engine)?;
    emit_sample_events(&engine).await;

    tracing::info!("trigger-demo ready, waiting for shutdown signal...");

    signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    tracing::info!("Shutdown signal received, stopping trigger-demo...");

    Ok(())
}

fn register_sample_triggers(engine: &TriggerEngine) -> Result<()> {
    engine.register(
        TriggerBuilder::new("quality_gate_passed")
            .description("auto-deploy on a clean quality gate")
            .priority(Priority::High)
            .condition(|data| async move {
                data.get("allChecks").and_then(|v| v.as_bool()).unwrap_or(false)
            })
            .action(|data| async move {
                tracing::info!(payload = %data, "would trigger auto-deploy");
                Ok(())
            }),
    )?;

    engine.register(
        TriggerBuilder::new("cost_alert")
            .description("notify on critical cost overruns")
            .priority(Priority::High)
            .condition(|data| async move {
                data.get("alertLevel").and_then(|v| v.as_str()) == Some("critical")
            })
            .action(|data| async move {
                tracing::warn!(payload = %data, "would send critical cost alert");
                Ok(())
            }),
    )?;

    engine.register(
        TriggerBuilder::new("agent_timeout")
            .description("recover a timed-out agent task")
            .action(|data| async move {
                tracing::warn!(payload = %data, "would attempt agent recovery");
                Ok(())
            }),
    )?;

    engine.register(
        TriggerBuilder::new("build_completed")
            .description("track build completion")
            .priority(Priority::Low)
            .action(|data| async move {
                tracing::info!(payload = %data, "would record build completion");
                Ok(())
            }),
    )?;

    Ok(())
}

async fn emit_sample_events(engine: &TriggerEngine) {
    engine
        .emit(
            "quality_gate_passed",
            json!({
                "projectId": "demo-project",
                "commitSha": "abc1234",
                "testsPassed": true,
                "allChecks": true,
            }),
        )
        .await;

    engine
        .emit(
            "cost_alert",
            json!({
                "projectId": "demo-project",
                "dailyCost": 120.0,
                "monthlyCost": 2400.0,
                "dailyLimit": 100.0,
                "monthlyLimit": 2000.0,
                "percentOfLimit": 120.0,
                "alertLevel": "critical",
            }),
        )
        .await;

    engine
        .emit(
            "agent_timeout",
            json!({
                "agentId": "agent-7",
                "taskId": "task-42",
                "runningMs": 60_000,
                "timeoutMs": 30_000,
            }),
        )
        .await;
}
