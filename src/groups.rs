//! Operation group lifecycle against the Apihub API.
//!
//! The pipeline only ever runs these in one order: probe (with `--force`),
//! delete, create, replace membership. Each step requires the exact
//! acknowledgment status the service documents for it.

use std::collections::HashSet;

use anyhow::{bail, Context, Result};
use reqwest::multipart::Form;
use reqwest::{StatusCode, Url};
use serde::Serialize;

use crate::client::{ApihubClient, API_TYPE};
use crate::operations::Operation;

/// Identifies an operation group within a package version
#[derive(Debug, Clone, Copy)]
pub struct GroupRef<'a> {
    pub package_id: &'a str,
    pub version: &'a str,
    pub name: &'a str,
}

/// The minimal projection of an operation sent back when assigning membership
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OperationRef {
    pub operation_id: String,
}

fn group_url(client: &ApihubClient, group: GroupRef<'_>, api_version: &str) -> Result<Url> {
    client.endpoint(&[
        "api",
        api_version,
        "packages",
        group.package_id,
        "versions",
        group.version,
        API_TYPE,
        "groups",
        group.name,
    ])
}

async fn require_status(
    response: reqwest::Response,
    expected: StatusCode,
    action: &str,
) -> Result<()> {
    let status = response.status();
    if status != expected {
        let body = response.text().await.unwrap_or_default();
        bail!("{action}: unexpected status: {status}, body: {body}");
    }
    Ok(())
}

/// Probes whether the group exists; found and not-found are both valid answers
pub async fn group_exists(client: &ApihubClient, group: GroupRef<'_>) -> Result<bool> {
    let url = group_url(client, group, "v2")?;
    let response = client
        .get(url)
        .send()
        .await
        .context("checking group existence")?;

    match response.status() {
        StatusCode::OK => Ok(true),
        StatusCode::NOT_FOUND => Ok(false),
        status => bail!("checking group existence: unexpected status: {status}"),
    }
}

/// Deletes the group; the service must acknowledge with 204
pub async fn delete_group(client: &ApihubClient, group: GroupRef<'_>) -> Result<()> {
    let url = group_url(client, group, "v2")?;
    let response = client.delete(url).send().await.context("deleting group")?;
    require_status(response, StatusCode::NO_CONTENT, "deleting group").await
}

/// Creates a new, empty group; the service must acknowledge with 201
pub async fn create_group(client: &ApihubClient, group: GroupRef<'_>) -> Result<()> {
    let url = client.endpoint(&[
        "api",
        "v3",
        "packages",
        group.package_id,
        "versions",
        group.version,
        API_TYPE,
        "groups",
    ])?;

    let form = Form::new().text("groupName", group.name.to_string());
    let response = client
        .post(url)
        .multipart(form)
        .send()
        .await
        .context("creating group")?;
    require_status(response, StatusCode::CREATED, "creating group").await
}

/// Replaces the group's membership with exactly the given operations; the
/// service must acknowledge with 204
pub async fn replace_group_operations(
    client: &ApihubClient,
    group: GroupRef<'_>,
    operations: &[Operation],
) -> Result<()> {
    let payload = serde_json::to_string(&membership_refs(operations))
        .context("encoding group operations")?;

    let url = group_url(client, group, "v3")?;
    let form = Form::new().text("operations", payload);
    let response = client
        .patch(url)
        .multipart(form)
        .send()
        .await
        .context("updating group")?;
    require_status(response, StatusCode::NO_CONTENT, "updating group").await
}

/// Builds the membership payload; duplicate operation ids are dropped so no
/// id is sent twice within one request (first occurrence wins)
fn membership_refs(operations: &[Operation]) -> Vec<OperationRef> {
    let mut seen = HashSet::new();
    operations
        .iter()
        .filter(|operation| seen.insert(operation.operation_id.as_str()))
        .map(|operation| OperationRef {
            operation_id: operation.operation_id.clone(),
        })
        .collect()
}
