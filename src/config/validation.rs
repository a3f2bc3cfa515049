//! Configuration validation.
//!
//! Semantic checks only; serde handles the syntax. Every problem is
//! reported, not just the first.

use thiserror::Error;
use url::Url;

use crate::config::schema::RegistrarConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("influx.base_url '{url}' is invalid: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("telegraf.name must not be empty")]
    EmptyName,

    #[error("readiness.path must start with '/', got '{0}'")]
    RelativeHealthPath(String),

    #[error("{0}.max_attempts must be at least 1")]
    ZeroAttempts(&'static str),

    #[error("{0}.timeout_secs must be at least 1")]
    ZeroTimeout(&'static str),

    #[error("submission.max_delay_ms ({max}) is below submission.delay_ms ({base})")]
    DelayCapBelowBase { base: u64, max: u64 },
}

/// Validate a fully layered configuration.
pub fn validate_config(config: &RegistrarConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.influx.base_url) {
        Ok(url) if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") => {
            errors.push(ValidationError::InvalidBaseUrl {
                url: config.influx.base_url.clone(),
                reason: "expected an http(s) URL".to_string(),
            });
        }
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::InvalidBaseUrl {
            url: config.influx.base_url.clone(),
            reason: e.to_string(),
        }),
    }

    if config.telegraf.name.trim().is_empty() {
        errors.push(ValidationError::EmptyName);
    }
    if !config.readiness.path.starts_with('/') {
        errors.push(ValidationError::RelativeHealthPath(
            config.readiness.path.clone(),
        ));
    }

    if config.readiness.max_attempts == 0 {
        errors.push(ValidationError::ZeroAttempts("readiness"));
    }
    if config.submission.max_attempts == 0 {
        errors.push(ValidationError::ZeroAttempts("submission"));
    }
    if config.readiness.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("readiness"));
    }
    if config.submission.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("submission"));
    }

    if config.submission.max_delay_ms < config.submission.delay_ms {
        errors.push(ValidationError::DelayCapBelowBase {
            base: config.submission.delay_ms,
            max: config.submission.max_delay_ms,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
