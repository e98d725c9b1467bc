//! CLI module for graph-schema
//!
//! Provides command-line interface for:
//! - init: Write an empty schema file
//! - inspect / validate: Read-only views of the schema
//! - add-* / remove-*: One schema mutation per invocation
//! - project: Write the global property-id projection
//! - type: Decode a type string

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command, KindArg};
pub use commands::{
    add_label, add_primary_key, add_property, add_relation, execute, init, inspect, project,
    remove_label, remove_property, run, run_command, type_of, validate,
};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response};
