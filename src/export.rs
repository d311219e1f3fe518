//! Export submission and polling.
//!
//! Submitting an export yields a job id; the job is then polled at a fixed
//! cadence until the service hands back the rendered document, reports an
//! error, or the attempt budget runs out. The status endpoint is overloaded:
//! a JSON body is a status object, any other content type is the finished
//! document itself.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::client::ApihubClient;
use crate::groups::GroupRef;

/// Fixed delay between export status polls
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Polling gives up after this many status requests
pub const MAX_POLL_ATTEMPTS: u32 = 30;

const EXPORTED_ENTITY: &str = "restOperationsGroup";
const TRANSFORMATION: &str = "reducedSourceSpecifications";

/// Export document format selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Yaml,
    Json,
}

impl OutputFormat {
    /// Lowercase name used on the wire and in the output filename
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Yaml => "yaml",
            OutputFormat::Json => "json",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "yaml" => Ok(OutputFormat::Yaml),
            "json" => Ok(OutputFormat::Json),
            other => bail!("invalid output format: {other} (expected yaml or json)"),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportRequest<'a> {
    exported_entity: &'a str,
    package_id: &'a str,
    version: &'a str,
    group_name: &'a str,
    operations_spec_transformation: &'a str,
    format: &'a str,
    remove_oas_extensions: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExportAccepted {
    export_id: String,
}

#[derive(Deserialize)]
struct ExportStatusResponse {
    status: String,
    #[serde(default)]
    message: String,
}

/// One observation of an export job
enum PollOutcome {
    Pending,
    Completed(Vec<u8>),
}

/// Submits an export job for the group; the service must acknowledge with 202
/// and a job id
pub async fn start_export(
    client: &ApihubClient,
    group: GroupRef<'_>,
    format: OutputFormat,
) -> Result<String> {
    let url = client.endpoint(&["api", "v1", "export"])?;
    let request = ExportRequest {
        exported_entity: EXPORTED_ENTITY,
        package_id: group.package_id,
        version: group.version,
        group_name: group.name,
        operations_spec_transformation: TRANSFORMATION,
        format: format.as_str(),
        remove_oas_extensions: true,
    };

    let response = client
        .post(url)
        .json(&request)
        .send()
        .await
        .context("starting export")?;

    let status = response.status();
    if status != StatusCode::ACCEPTED {
        let body = response.text().await.unwrap_or_default();
        bail!("starting export: unexpected status: {status}, body: {body}");
    }

    let accepted: ExportAccepted = response
        .json()
        .await
        .context("decoding export acknowledgment")?;
    Ok(accepted.export_id)
}

/// Waits for the export to finish at the standard cadence and returns the
/// rendered document
pub async fn wait_for_export(client: &ApihubClient, export_id: &str) -> Result<Vec<u8>> {
    poll_export(client, export_id, POLL_INTERVAL, MAX_POLL_ATTEMPTS).await
}

/// Poll core with an explicit cadence so tests can run fast. The interval is
/// constant; only the export poll ever retries.
pub async fn poll_export(
    client: &ApihubClient,
    export_id: &str,
    interval: Duration,
    max_attempts: u32,
) -> Result<Vec<u8>> {
    for _ in 0..max_attempts {
        match fetch_export_status(client, export_id).await? {
            PollOutcome::Completed(document) => {
                if document.is_empty() {
                    bail!("export returned an empty document");
                }
                return Ok(document);
            }
            PollOutcome::Pending => {}
        }
        tokio::time::sleep(interval).await;
    }

    bail!("export timed out after {max_attempts} attempts")
}

async fn fetch_export_status(client: &ApihubClient, export_id: &str) -> Result<PollOutcome> {
    let url = client.endpoint(&["api", "v1", "export", export_id, "status"])?;
    let response = client
        .get(url)
        .send()
        .await
        .context("polling export status")?;

    let status = response.status();
    if status != StatusCode::OK {
        let body = response.text().await.unwrap_or_default();
        bail!("polling export status: unexpected status: {status}, body: {body}");
    }

    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"));

    if is_json {
        let state: ExportStatusResponse = response
            .json()
            .await
            .context("decoding export status")?;
        if state.status == "error" {
            bail!("export failed: {}", state.message);
        }
        return Ok(PollOutcome::Pending);
    }

    // Non-JSON body means the job is done and this is the document itself
    let document = response
        .bytes()
        .await
        .context("reading export document")?;
    Ok(PollOutcome::Completed(document.to_vec()))
}
