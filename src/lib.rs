//! # apihub-group-export
//!
//! Automates one Apihub workflow: list the REST operations of a package
//! version, keep the ones carrying a given custom-tag value, rebuild a named
//! operation group from them, and export the group to a YAML or JSON document.
//!
//! The pipeline is strictly sequential; any stage failure aborts the run. The
//! library surface exists so each stage can be driven directly from
//! integration tests; the `apihub-group-export` binary wires the stages
//! together in [`commands::handle_export_command`].

pub mod client;
pub mod commands;
pub mod export;
pub mod groups;
pub mod operations;
