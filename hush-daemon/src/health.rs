//! Aggregated health check reporting.
//!
//! Combines the reaper's `health_check()` and the liveness of the spawned
//! inhibition and ingest tasks into a unified [`DaemonHealth`] report.
//! The overall daemon status is the worst status among all enabled components.
//!
//! # Aggregation Rule
//!
//! - All Healthy -> Healthy
//! - Any Degraded, none Unhealthy -> Degraded(reason)
//! - Any Unhealthy -> Unhealthy(reason)

use serde::Serialize;
use tokio::task::JoinHandle;

use hush_core::pipeline::HealthStatus;

/// Aggregated health report for the entire daemon.
#[derive(Debug, Clone, Serialize)]
pub struct DaemonHealth {
    /// Overall daemon health status (worst of all components).
    pub status: HealthStatus,
    /// Daemon uptime in seconds since start.
    pub uptime_secs: u64,
    /// Number of silences currently held by the store.
    pub silences: usize,
    /// Per-component health reports.
    pub modules: Vec<ModuleHealth>,
}

/// Health status for a single component.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleHealth {
    /// Component name ("reaper", "inhibition" or "ingest").
    pub name: String,
    /// Whether the component is enabled in configuration.
    pub enabled: bool,
    /// Current health status of the component.
    pub status: HealthStatus,
}

/// Aggregate multiple component health statuses into a single status.
///
/// Returns the worst status found: Unhealthy > Degraded > Healthy.
/// Only considers enabled components.
pub fn aggregate_status(modules: &[ModuleHealth]) -> HealthStatus {
    let mut worst = HealthStatus::Healthy;
    let mut reasons = Vec::new();

    for module in modules.iter().filter(|m| m.enabled) {
        match &module.status {
            HealthStatus::Healthy => {}
            HealthStatus::Degraded(reason) => {
                if !worst.is_unhealthy() {
                    reasons.push(format!("{}: {}", module.name, reason));
                    worst = HealthStatus::Degraded(String::new());
                }
            }
            HealthStatus::Unhealthy(reason) => {
                reasons.push(format!("{}: {}", module.name, reason));
                worst = HealthStatus::Unhealthy(String::new());
            }
        }
    }

    match worst {
        HealthStatus::Healthy => HealthStatus::Healthy,
        HealthStatus::Degraded(_) => HealthStatus::Degraded(reasons.join("; ")),
        HealthStatus::Unhealthy(_) => HealthStatus::Unhealthy(reasons.join("; ")),
    }
}

/// Health of a spawned stage task.
///
/// `started` stays false until the orchestrator spawns its stages. A task
/// that ended on its own while the daemon is still running reports `on_exit`;
/// a task already joined during shutdown reports `stopped`.
pub fn task_status(
    started: bool,
    task: Option<&JoinHandle<()>>,
    on_exit: HealthStatus,
) -> HealthStatus {
    match (started, task) {
        (false, _) => HealthStatus::Unhealthy("not started".to_owned()),
        (true, None) => HealthStatus::Unhealthy("stopped".to_owned()),
        (true, Some(task)) if task.is_finished() => on_exit,
        (true, Some(_)) => HealthStatus::Healthy,
    }
}
