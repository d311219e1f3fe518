//! The export pipeline: list, filter, rebuild the group, export.

use anyhow::{Context, Result};

use crate::client::ApihubClient;
use crate::export::{self, OutputFormat};
use crate::groups::{self, GroupRef};
use crate::operations::{filter_operations, list_operations};

/// Everything the export pipeline needs, as collected from the command line
#[derive(Debug, Clone)]
pub struct ExportArgs {
    pub apihub_url: String,
    pub package_id: String,
    pub version: String,
    pub group_name: String,
    pub token: String,
    pub tag_key: String,
    pub tag_value: String,
    pub force: bool,
    pub output_format: OutputFormat,
}

/// Handles the group export command: runs the pipeline strictly top to
/// bottom. An empty filter result is a legitimate "nothing to do" end state
/// and returns success before any group mutation is issued.
pub async fn handle_export_command(args: &ExportArgs) -> Result<()> {
    let client = ApihubClient::new(&args.apihub_url, &args.token)?;
    let group = GroupRef {
        package_id: &args.package_id,
        version: &args.version,
        name: &args.group_name,
    };

    let operations = list_operations(&client, &args.package_id, &args.version).await?;
    println!("Operations count: {}", operations.len());

    let matched = filter_operations(operations, &args.tag_key, &args.tag_value);
    println!("Found {} operations matching conditions", matched.len());

    if matched.is_empty() {
        println!("No operations matching criteria found, exiting");
        return Ok(());
    }

    if args.force && groups::group_exists(&client, group).await? {
        groups::delete_group(&client, group).await?;
        println!("Existing group deleted");
    }

    groups::create_group(&client, group).await?;
    println!("Group created successfully");

    groups::replace_group_operations(&client, group, &matched).await?;
    println!("Group updated with {} operations", matched.len());

    let export_id = export::start_export(&client, group, args.output_format).await?;
    println!("Export started, id: {export_id}");

    let document = export::wait_for_export(&client, &export_id).await?;

    let output_path = format!("{}.{}", args.group_name, args.output_format.as_str());
    tokio::fs::write(&output_path, &document)
        .await
        .with_context(|| format!("writing export result to {output_path}"))?;
    println!("Export result saved to {output_path}");

    Ok(())
}
