//! Readiness gate.
//!
//! # Responsibilities
//! - Probe the InfluxDB health endpoint
//! - Block until it answers 200 or the attempt budget runs out

use std::time::Duration;

use reqwest::{Client, StatusCode};
use url::Url;

use crate::config::{InfluxConfig, ReadinessConfig};
use crate::resilience::timeouts::with_deadline;
use crate::resilience::{AttemptError, RetryError, RetryPolicy};

pub struct ReadinessGate {
    client: Client,
    url: Url,
    timeout: Duration,
    policy: RetryPolicy,
}

impl ReadinessGate {
    pub fn new(
        client: Client,
        influx: &InfluxConfig,
        config: &ReadinessConfig,
    ) -> Result<Self, url::ParseError> {
        Ok(Self {
            client,
            url: influx.endpoint(&config.path)?,
            timeout: Duration::from_secs(config.timeout_secs),
            policy: RetryPolicy::from(config),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Single health probe. Only an exact 200 counts as healthy.
    pub async fn probe(&self) -> Result<(), AttemptError> {
        with_deadline(self.timeout, async {
            let response = self
                .client
                .get(self.url.clone())
                .header("user-agent", "telegraf-registrar-health-check")
                .send()
                .await?;

            if response.status() == StatusCode::OK {
                Ok(())
            } else {
                Err(AttemptError::from_response(response).await)
            }
        })
        .await
    }

    /// Poll until healthy. Returns the number of probes it took.
    pub async fn wait(&self) -> Result<u32, RetryError> {
        tracing::info!(
            url = %self.url,
            max_attempts = self.policy.max_attempts,
            "Waiting for InfluxDB to become healthy"
        );

        let attempts = self
            .policy
            .run(
                "health_check",
                |attempt| async move {
                    self.probe().await?;
                    Ok::<_, AttemptError>(attempt)
                },
                // Every probe failure is transient except a malformed request
                |error| !matches!(error, AttemptError::Build(_)),
            )
            .await?;

        tracing::info!(attempts, "InfluxDB is healthy");
        Ok(attempts)
    }
}
