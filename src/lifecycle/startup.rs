//! Startup orchestration.
//!
//! Phases run strictly in order and any phase failure is fatal:
//! `CHECK_TOKEN → WAIT_HEALTHY → READ_CONFIG → SUBMIT`.

use std::io::Write;
use std::path::Path;

use reqwest::Client;

use crate::config::loader::{build_config, resolve_token, Overrides};
use crate::config::RegistrarConfig;
use crate::error::RegistrarError;
use crate::health::ReadinessGate;
use crate::registration::{read_configuration, Receipt, RegistrationRequest, Submitter};

const USER_AGENT: &str = concat!("telegraf-registrar/", env!("CARGO_PKG_VERSION"));

/// Resolve the effective configuration.
///
/// The token is checked before anything else is loaded, so a missing token
/// is reported as such even when the settings file is also broken.
pub fn prepare<F>(
    settings: Option<&Path>,
    overrides: &Overrides,
    lookup: F,
) -> Result<RegistrarConfig, RegistrarError>
where
    F: Fn(&str) -> Option<String>,
{
    if resolve_token(&lookup).is_none() {
        return Err(RegistrarError::MissingToken);
    }
    Ok(build_config(settings, overrides, lookup)?)
}

/// Run every phase and, on success, write the report to `out`.
pub async fn run<W: Write>(
    config: &RegistrarConfig,
    out: &mut W,
) -> Result<Receipt, RegistrarError> {
    let token = config
        .influx
        .token
        .clone()
        .filter(|t| !t.is_empty())
        .ok_or(RegistrarError::MissingToken)?;

    // InfluxDB is reached directly on the container network
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .no_proxy()
        .build()
        .map_err(RegistrarError::Client)?;

    let gate = ReadinessGate::new(client.clone(), &config.influx, &config.readiness)?;
    gate.wait().await.map_err(RegistrarError::NotReady)?;

    let conf_path = &config.telegraf.conf_path;
    let text = read_configuration(conf_path).map_err(|source| RegistrarError::ConfigRead {
        path: conf_path.clone(),
        source,
    })?;
    tracing::info!(path = %conf_path.display(), bytes = text.len(), "Read telegraf conf");

    let request = RegistrationRequest::new(&config.telegraf, text);
    let submitter = Submitter::new(client, &config.influx, &config.submission, token)?;
    let receipt = submitter
        .submit(&request)
        .await
        .map_err(RegistrarError::Submission)?;

    tracing::info!(
        status = %receipt.status,
        attempts = receipt.attempts,
        "Telegraf config registered"
    );
    // The config is already registered upstream. A non-zero exit here would
    // make the supervisor rerun the registrar and create a duplicate, so a
    // lost report is logged and the run still succeeds.
    if let Err(e) = report_success(out, &receipt) {
        tracing::error!(error = %e, "Failed to write registration response");
    }

    Ok(receipt)
}

/// Print the creation status and response body.
pub fn report_success<W: Write>(out: &mut W, receipt: &Receipt) -> std::io::Result<()> {
    writeln!(out, "Influx telegraf create response: {}", receipt.status.as_u16())?;
    writeln!(out, "{}", receipt.body)?;
    out.flush()
}
