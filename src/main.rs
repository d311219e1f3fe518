//! apihub-group-export: builds an Apihub operation group from a custom-tag
//! filter and exports it to a YAML or JSON document.

use anyhow::Result;
use clap::{Arg, ArgMatches, Command as ClapCommand};

use apihub_group_export::commands::{handle_export_command, ExportArgs};
use apihub_group_export::export::OutputFormat;

/// Fetches a required string argument; clap has already enforced presence
fn required(matches: &ArgMatches, id: &str) -> String {
    matches.get_one::<String>(id).cloned().unwrap_or_default()
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = ClapCommand::new("apihub-group-export")
        .about("Builds and exports an Apihub operation group filtered by custom tag")
        .arg(
            Arg::new("apihub-url")
                .long("apihub-url")
                .value_name("URL")
                .help("Base URL of the Apihub instance")
                .required(true),
        )
        .arg(
            Arg::new("package-id")
                .long("package-id")
                .value_name("ID")
                .help("Package unique identifier (full alias)")
                .required(true),
        )
        .arg(
            Arg::new("version")
                .long("version")
                .value_name("VERSION")
                .help("Package version")
                .required(true),
        )
        .arg(
            Arg::new("group")
                .long("group")
                .value_name("NAME")
                .help("Operation group name")
                .required(true),
        )
        .arg(
            Arg::new("token")
                .long("token")
                .value_name("TOKEN")
                .help("Personal access token")
                .required(true),
        )
        .arg(
            Arg::new("x-key")
                .long("x-key")
                .value_name("KEY")
                .help("Custom tag key to filter operations by")
                .required(true),
        )
        .arg(
            Arg::new("x-value")
                .long("x-value")
                .value_name("VALUE")
                .help("Custom tag value to filter operations by")
                .required(true),
        )
        .arg(
            Arg::new("force")
                .long("force")
                .help("Recreate the group if it already exists")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output-format")
                .long("output-format")
                .value_name("FORMAT")
                .help("Export output format")
                .value_parser(["yaml", "json"])
                .default_value("yaml"),
        )
        .get_matches();

    let output_format: OutputFormat = required(&matches, "output-format").parse()?;

    let args = ExportArgs {
        apihub_url: required(&matches, "apihub-url"),
        package_id: required(&matches, "package-id"),
        version: required(&matches, "version"),
        group_name: required(&matches, "group"),
        token: required(&matches, "token"),
        tag_key: required(&matches, "x-key"),
        tag_value: required(&matches, "x-value"),
        force: matches.get_flag("force"),
        output_format,
    };

    handle_export_command(&args).await
}
