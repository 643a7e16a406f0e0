//! Health check use case
//!
//! Probes every registered stage concurrently, each bounded by a timeout.
//! The report never affects ticket processing.

use crate::ports::stage_client::HealthStatus;
use crate::use_cases::stages::StageRegistry;
use futures::future::join_all;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;
use triage_domain::Stage;

/// Health of the orchestrator and each stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub orchestrator: HealthStatus,
    pub stages: BTreeMap<Stage, HealthStatus>,
}

impl HealthReport {
    pub fn all_healthy(&self) -> bool {
        self.stages.values().all(HealthStatus::is_healthy)
    }
}

pub struct HealthCheckUseCase {
    stages: StageRegistry,
    timeout: Duration,
}

impl HealthCheckUseCase {
    pub fn new(stages: StageRegistry, timeout: Duration) -> Self {
        Self { stages, timeout }
    }

    pub async fn execute(&self) -> HealthReport {
        let probes = self.stages.iter().map(|(stage, client)| async move {
            let status = match tokio::time::timeout(self.timeout, client.health_check()).await {
                Ok(status) => status,
                Err(_) => HealthStatus::Unreachable(format!(
                    "no response within {}s",
                    self.timeout.as_secs()
                )),
            };
            debug!("{} stage is {}", stage, status.as_str());
            (stage, status)
        });

        HealthReport {
            orchestrator: HealthStatus::Healthy,
            stages: join_all(probes).await.into_iter().collect(),
        }
    }
}
