//! Operation listing and custom-tag filtering.
//!
//! Listing walks the paginated operations endpoint until the service returns
//! a short page. Filtering is a pure function over the accumulated list.

use std::collections::{BTreeSet, HashMap};

use anyhow::{bail, Context, Result};
use reqwest::StatusCode;
use serde::Deserialize;

use crate::client::{ApihubClient, API_TYPE};

/// Operations are fetched in fixed-size pages; a short page ends the listing
pub const PAGE_SIZE: usize = 100;

/// A single REST operation of a package version
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub operation_id: String,
    #[serde(default)]
    pub custom_tags: HashMap<String, TagValues>,
    #[serde(default)]
    pub package_ref: String,
}

/// Custom-tag values, normalized once at deserialization time.
///
/// The service is loose about the value shape: a tag may carry a bare string,
/// a string list, or a mixed list. All three collapse into the set of string
/// values; non-string list elements and any other JSON shape are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagValues(BTreeSet<String>);

impl TagValues {
    pub fn contains(&self, value: &str) -> bool {
        self.0.contains(value)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for TagValues {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = serde_json::Value::deserialize(deserializer)?;
        let mut values = BTreeSet::new();
        match raw {
            serde_json::Value::String(value) => {
                values.insert(value);
            }
            serde_json::Value::Array(items) => {
                for item in items {
                    if let serde_json::Value::String(value) = item {
                        values.insert(value);
                    }
                }
            }
            _ => {}
        }
        Ok(TagValues(values))
    }
}

#[derive(Deserialize)]
struct ListResponse {
    #[serde(default)]
    operations: Vec<Operation>,
}

/// Fetches every operation of the package version, page by page, in service
/// order. Fails fast on the first unexpected status or malformed payload.
pub async fn list_operations(
    client: &ApihubClient,
    package_id: &str,
    version: &str,
) -> Result<Vec<Operation>> {
    let mut all_operations = Vec::new();
    let mut page: u32 = 0;

    loop {
        let mut url = client.endpoint(&[
            "api",
            "v2",
            "packages",
            package_id,
            "versions",
            version,
            API_TYPE,
            "operations",
        ])?;
        url.query_pairs_mut()
            .append_pair("skipRefs", "true")
            .append_pair("limit", &PAGE_SIZE.to_string())
            .append_pair("page", &page.to_string());

        let response = client
            .get(url)
            .send()
            .await
            .with_context(|| format!("listing operations (page {page})"))?;

        let status = response.status();
        if status != StatusCode::OK {
            bail!("listing operations (page {page}): unexpected status: {status}");
        }

        let body: ListResponse = response
            .json()
            .await
            .with_context(|| format!("decoding operations list (page {page})"))?;

        let fetched = body.operations.len();
        all_operations.extend(body.operations);

        if fetched < PAGE_SIZE {
            break;
        }
        page += 1;
    }

    Ok(all_operations)
}

/// Keeps the operations whose values for `tag_key` contain `tag_value`.
/// Source order is preserved; operations without the tag are skipped.
pub fn filter_operations(
    operations: Vec<Operation>,
    tag_key: &str,
    tag_value: &str,
) -> Vec<Operation> {
    operations
        .into_iter()
        .filter(|operation| {
            operation
                .custom_tags
                .get(tag_key)
                .is_some_and(|values| values.contains(tag_value))
        })
        .collect()
}
