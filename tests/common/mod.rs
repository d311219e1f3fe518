//! Common test utilities for the wiremock-backed integration tests
#![allow(dead_code)]

use std::sync::{Mutex, MutexGuard, OnceLock};

use apihub_group_export::client::ApihubClient;
use apihub_group_export::commands::ExportArgs;
use apihub_group_export::export::OutputFormat;
use serde_json::{json, Value};

pub const TEST_TOKEN: &str = "test-token";
pub const PACKAGE_ID: &str = "acme.billing";
pub const VERSION: &str = "2024.1";

static TEST_MUTEX: OnceLock<Mutex<()>> = OnceLock::new();

/// Acquires a global lock for tests that modify process-wide state (like CWD)
pub fn lock_test() -> MutexGuard<'static, ()> {
    TEST_MUTEX.get_or_init(|| Mutex::new(())).lock().unwrap()
}

/// Builds a client pointed at a mock server
pub fn test_client(server_uri: &str) -> ApihubClient {
    ApihubClient::new(server_uri, TEST_TOKEN).expect("client for mock server")
}

/// Builds pipeline arguments pointed at a mock server, filtering on
/// audience=external
pub fn export_args(server_uri: &str, group_name: &str, force: bool) -> ExportArgs {
    ExportArgs {
        apihub_url: server_uri.to_string(),
        package_id: PACKAGE_ID.to_string(),
        version: VERSION.to_string(),
        group_name: group_name.to_string(),
        token: TEST_TOKEN.to_string(),
        tag_key: "audience".to_string(),
        tag_value: "external".to_string(),
        force,
        output_format: OutputFormat::Yaml,
    }
}

/// An operation JSON payload carrying a single custom tag
pub fn operation(id: &str, tag_key: &str, tag_value: Value) -> Value {
    json!({
        "operationId": id,
        "customTags": { tag_key: tag_value },
        "packageRef": format!("{PACKAGE_ID}@{VERSION}"),
    })
}

/// A listing response page
pub fn operations_page(operations: Vec<Value>) -> Value {
    json!({ "operations": operations })
}
