//! Model-service health checking and bootstrap
//!
//! The health check is decoupled from the inference call itself: a bounded,
//! observable retry policy (fixed attempts, fixed backoff) probes the
//! service, with at most one bootstrap attempt followed by a fixed grace
//! period before re-checking.

use crate::InferError;
use std::time::Duration;
use tokio::process::Command;
use tracing::{info, warn};

/// Bounded retry policy for service probing
#[derive(Debug, Clone, Copy)]
pub struct HealthPolicy {
    /// Probe attempts before giving up
    pub attempts: u32,
    /// Fixed delay between probe attempts
    pub backoff: Duration,
    /// Grace period after a bootstrap attempt before re-probing
    pub grace: Duration,
}

impl Default for HealthPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff: Duration::from_secs(2),
            grace: Duration::from_secs(3),
        }
    }
}

/// Command used to start the service when the first probe fails
#[derive(Debug, Clone)]
pub struct BootstrapCommand {
    /// Program to spawn
    pub program: String,
    /// Program arguments
    pub args: Vec<String>,
}

/// Health checker for the model service
pub struct ServiceHealth {
    probe_url: String,
    policy: HealthPolicy,
    bootstrap: Option<BootstrapCommand>,
    client: reqwest::Client,
}

impl ServiceHealth {
    /// Probe `probe_url` under `policy`. Probes use a short timeout so a
    /// hung service cannot stall the run.
    pub fn new(probe_url: impl Into<String>, policy: HealthPolicy) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(3))
            .build()
            .unwrap_or_default();
        Self {
            probe_url: probe_url.into(),
            policy,
            bootstrap: None,
            client,
        }
    }

    /// Attach a bootstrap command, attempted once when the first probe fails
    pub fn with_bootstrap(mut self, bootstrap: BootstrapCommand) -> Self {
        self.bootstrap = Some(bootstrap);
        self
    }

    async fn probe(&self) -> bool {
        match self.client.get(&self.probe_url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// Ensure the service answers its health probe, bootstrapping once if a
    /// command is configured. Exhausting the policy is an error.
    pub async fn ensure_available(&self) -> Result<(), InferError> {
        let mut bootstrapped = false;

        for attempt in 1..=self.policy.attempts.max(1) {
            if self.probe().await {
                return Ok(());
            }
            warn!(attempt, url = %self.probe_url, "model service probe failed");

            if !bootstrapped {
                if let Some(command) = &self.bootstrap {
                    info!(program = %command.program, "bootstrapping model service");
                    // Best-effort: a spawn failure just leaves the next probe
                    // to fail and the policy to run out
                    let _ = Command::new(&command.program).args(&command.args).spawn();
                    bootstrapped = true;
                    tokio::time::sleep(self.policy.grace).await;
                    continue;
                }
            }

            if attempt < self.policy.attempts {
                tokio::time::sleep(self.policy.backoff).await;
            }
        }

        Err(InferError::ServiceUnavailable(format!(
            "no healthy response from {} after {} attempts",
            self.probe_url, self.policy.attempts
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_service_exhausts_policy() {
        let policy = HealthPolicy {
            attempts: 2,
            backoff: Duration::from_millis(10),
            grace: Duration::from_millis(10),
        };
        // Reserved TEST-NET address: nothing listens there
        let health = ServiceHealth::new("http://192.0.2.1:9/healthz", policy);
        let result = health.ensure_available().await;
        assert!(matches!(result, Err(InferError::ServiceUnavailable(_))));
    }
}
