//! Configuration loading and layering.
//!
//! Layers, lowest precedence first: built-in defaults, the optional TOML
//! settings file, the process environment, then command-line overrides.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::{LogFormat, RegistrarConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Token variables in lookup order; the first non-empty one wins.
pub const TOKEN_ENV_VARS: [&str; 2] = ["DOCKER_INFLUXDB_INIT_ADMIN_TOKEN", "INFLUX_TOKEN"];

/// Organization variable.
pub const ORG_ENV_VAR: &str = "DOCKER_INFLUXDB_INIT_ORG";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Values supplied on the command line (or their bound env vars).
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub influx_url: Option<String>,
    pub org: Option<String>,
    pub telegraf_conf: Option<PathBuf>,
    pub log_format: Option<LogFormat>,
}

/// Load a TOML settings file. Missing sections fall back to defaults.
pub fn load_settings(path: &Path) -> Result<RegistrarConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolve the API token from the environment.
///
/// Empty values are treated as unset, so an empty admin token still falls
/// through to `INFLUX_TOKEN`.
pub fn resolve_token<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    TOKEN_ENV_VARS
        .iter()
        .filter_map(|name| lookup(*name))
        .find(|value| !value.is_empty())
}

/// Build the effective configuration.
///
/// The token is not checked here; callers decide how a missing token is
/// reported.
pub fn build_config<F>(
    settings: Option<&Path>,
    overrides: &Overrides,
    lookup: F,
) -> Result<RegistrarConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match settings {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Loading settings file");
            load_settings(path)?
        }
        None => RegistrarConfig::default(),
    };

    config.influx.token = resolve_token(&lookup);
    // Set-but-empty is kept as given; only an unset variable keeps the default
    if let Some(org) = lookup(ORG_ENV_VAR) {
        config.influx.org = org;
    }

    if let Some(url) = &overrides.influx_url {
        config.influx.base_url = url.clone();
    }
    if let Some(org) = &overrides.org {
        config.influx.org = org.clone();
    }
    if let Some(path) = &overrides.telegraf_conf {
        config.telegraf.conf_path = path.clone();
    }
    if let Some(format) = overrides.log_format {
        config.observability.log_format = format;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
