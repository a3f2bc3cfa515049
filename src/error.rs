//! Fatal outcomes and their process exit codes.

use std::path::PathBuf;
use std::process::ExitCode;

use thiserror::Error;

use crate::config::loader::{ConfigError, TOKEN_ENV_VARS};
use crate::registration::SubmitError;
use crate::resilience::RetryError;

#[derive(Debug, Error)]
pub enum RegistrarError {
    #[error("registrar settings are invalid: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("no token found in env {} or {}", TOKEN_ENV_VARS[0], TOKEN_ENV_VARS[1])]
    MissingToken,

    #[error("InfluxDB not healthy, aborting: {0}")]
    NotReady(#[source] RetryError),

    #[error("failed to read telegraf conf {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to POST telegraf config: {0}")]
    Submission(#[source] SubmitError),
}

impl RegistrarError {
    pub fn exit_code(&self) -> u8 {
        match self {
            RegistrarError::Config(_) | RegistrarError::Url(_) | RegistrarError::Client(_) => 1,
            RegistrarError::MissingToken => 2,
            RegistrarError::NotReady(_) => 3,
            RegistrarError::ConfigRead { .. } => 4,
            RegistrarError::Submission(_) => 5,
        }
    }
}

impl From<&RegistrarError> for ExitCode {
    fn from(err: &RegistrarError) -> Self {
        ExitCode::from(err.exit_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resilience::AttemptError;
    use std::time::Duration;

    #[test]
    fn test_exit_codes() {
        assert_eq!(RegistrarError::MissingToken.exit_code(), 2);

        let not_ready = RegistrarError::NotReady(RetryError::Exhausted {
            attempts: 30,
            last: AttemptError::Timeout(Duration::from_secs(5)),
        });
        assert_eq!(not_ready.exit_code(), 3);

        let read = RegistrarError::ConfigRead {
            path: "/etc/telegraf/telegraf.conf".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(read.exit_code(), 4);

        let submission = RegistrarError::Submission(SubmitError::Retry(RetryError::Exhausted {
            attempts: 10,
            last: AttemptError::Timeout(Duration::from_secs(10)),
        }));
        assert_eq!(submission.exit_code(), 5);

        let config = RegistrarError::Config(ConfigError::Validation(Vec::new()));
        assert_eq!(config.exit_code(), 1);
    }

    #[test]
    fn test_missing_token_message_names_both_vars() {
        let message = RegistrarError::MissingToken.to_string();
        assert!(message.contains("DOCKER_INFLUXDB_INIT_ADMIN_TOKEN"));
        assert!(message.contains("INFLUX_TOKEN"));
    }
}
