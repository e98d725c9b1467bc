//! CLI argument definitions using clap
//!
//! Commands:
//! - graph-schema init --config <path>
//! - graph-schema inspect --config <path>
//! - graph-schema add-label --kind <vertex|edge> --name <label>
//! - graph-schema add-property --kind <k> --label <l> --name <n> --type <t>
//! - graph-schema remove-property --kind <k> --label <l> --name <n>
//! - graph-schema remove-label --kind <k> --name <label>
//! - graph-schema add-primary-key --kind <k> --label <l> --name <n>
//! - graph-schema add-relation --label <edge> --src <vertex> --dst <vertex>
//! - graph-schema validate --config <path>
//! - graph-schema project --config <path>
//! - graph-schema type --value <type string>

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::schema::LabelKind;

/// graph-schema - Property-graph schema registry
#[derive(Parser, Debug)]
#[command(name = "graph-schema")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Label kind as spelled on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    Vertex,
    Edge,
}

impl From<KindArg> for LabelKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Vertex => LabelKind::Vertex,
            KindArg::Edge => LabelKind::Edge,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write an empty schema file
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./graph-schema.json")]
        config: PathBuf,
    },

    /// Print valid labels and their valid properties
    Inspect {
        /// Path to configuration file
        #[arg(long, default_value = "./graph-schema.json")]
        config: PathBuf,
    },

    /// Declare a new label
    AddLabel {
        /// Path to configuration file
        #[arg(long, default_value = "./graph-schema.json")]
        config: PathBuf,
        #[arg(long, value_enum)]
        kind: KindArg,
        /// Label name
        #[arg(long)]
        name: String,
    },

    /// Declare a property on an existing label
    AddProperty {
        /// Path to configuration file
        #[arg(long, default_value = "./graph-schema.json")]
        config: PathBuf,
        #[arg(long, value_enum)]
        kind: KindArg,
        /// Owning label name
        #[arg(long)]
        label: String,
        /// Property name
        #[arg(long)]
        name: String,
        /// Property type, e.g. LONG, LISTSTRING, TIMESTAMP[MS][UTC]
        #[arg(long = "type")]
        type_name: String,
    },

    /// Soft-delete a property
    RemoveProperty {
        /// Path to configuration file
        #[arg(long, default_value = "./graph-schema.json")]
        config: PathBuf,
        #[arg(long, value_enum)]
        kind: KindArg,
        /// Owning label name
        #[arg(long)]
        label: String,
        /// Property name
        #[arg(long)]
        name: String,
    },

    /// Soft-delete a label
    RemoveLabel {
        /// Path to configuration file
        #[arg(long, default_value = "./graph-schema.json")]
        config: PathBuf,
        #[arg(long, value_enum)]
        kind: KindArg,
        /// Label name
        #[arg(long)]
        name: String,
    },

    /// Append a primary-key property name to a label
    AddPrimaryKey {
        /// Path to configuration file
        #[arg(long, default_value = "./graph-schema.json")]
        config: PathBuf,
        #[arg(long, value_enum)]
        kind: KindArg,
        /// Owning label name
        #[arg(long)]
        label: String,
        /// Property name
        #[arg(long)]
        name: String,
    },

    /// Append a (source, destination) vertex label pair to an edge label
    AddRelation {
        /// Path to configuration file
        #[arg(long, default_value = "./graph-schema.json")]
        config: PathBuf,
        /// Edge label name
        #[arg(long)]
        label: String,
        /// Source vertex label
        #[arg(long)]
        src: String,
        /// Destination vertex label
        #[arg(long)]
        dst: String,
    },

    /// Validate the schema and print its sorted property list
    Validate {
        /// Path to configuration file
        #[arg(long, default_value = "./graph-schema.json")]
        config: PathBuf,
    },

    /// Build the global property-id projection and write it out
    Project {
        /// Path to configuration file
        #[arg(long, default_value = "./graph-schema.json")]
        config: PathBuf,
    },

    /// Decode a type string and print its canonical form
    Type {
        /// Type string
        #[arg(long)]
        value: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
