//! Registration submission.
//!
//! # Responsibilities
//! - POST the registration request with token authentication
//! - Retry transient failures with the configured policy
//! - Stop at the first successful response

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use url::Url;
use uuid::Uuid;

use crate::config::{InfluxConfig, SubmissionConfig};
use crate::registration::payload::RegistrationRequest;
use crate::resilience::timeouts::with_deadline;
use crate::resilience::{AttemptError, RetryError, RetryPolicy};

/// Path of the Telegraf configuration collection.
pub const TELEGRAFS_PATH: &str = "/api/v2/telegrafs";

/// Successful creation response.
#[derive(Debug, Clone)]
pub struct Receipt {
    pub status: StatusCode,
    pub body: String,
    pub attempts: u32,
}

pub struct Submitter {
    client: Client,
    url: Url,
    token: String,
    timeout: Duration,
    policy: RetryPolicy,
    fail_fast_on_client_error: bool,
}

impl Submitter {
    pub fn new(
        client: Client,
        influx: &InfluxConfig,
        config: &SubmissionConfig,
        token: String,
    ) -> Result<Self, url::ParseError> {
        let mut url = influx.endpoint(TELEGRAFS_PATH)?;
        url.query_pairs_mut().append_pair("org", &influx.org);

        Ok(Self {
            client,
            url,
            token,
            timeout: Duration::from_secs(config.timeout_secs),
            policy: RetryPolicy::from(config),
            fail_fast_on_client_error: config.fail_fast_on_client_error,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    async fn attempt(&self, body: &[u8], attempt: u32) -> Result<Receipt, AttemptError> {
        let request_id = Uuid::new_v4();
        tracing::debug!(attempt, request_id = %request_id, url = %self.url, "Posting telegraf config");

        with_deadline(self.timeout, async {
            let response = self
                .client
                .post(self.url.clone())
                .header(AUTHORIZATION, format!("Token {}", self.token))
                .header(CONTENT_TYPE, "application/json")
                .header("x-request-id", request_id.to_string())
                .body(body.to_vec())
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(AttemptError::from_response(response).await);
            }

            let body = response.text().await?;
            Ok(Receipt {
                status,
                body,
                attempts: attempt,
            })
        })
        .await
    }

    /// Submit `request`, retrying per policy.
    pub async fn submit(&self, request: &RegistrationRequest) -> Result<Receipt, SubmitError> {
        let payload = request.to_bytes()?;
        let body = payload.as_slice();

        tracing::info!(
            url = %self.url,
            name = %request.name,
            bytes = request.configuration_text.len(),
            max_attempts = self.policy.max_attempts,
            "Registering telegraf config"
        );

        let fail_fast = self.fail_fast_on_client_error;
        let receipt = self
            .policy
            .run(
                "telegraf_create",
                |attempt| async move { self.attempt(body, attempt).await },
                |error| error.is_retryable(fail_fast),
            )
            .await?;

        Ok(receipt)
    }
}

/// Terminal submission failure.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("failed to encode registration request: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Retry(#[from] RetryError),
}
