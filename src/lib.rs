//! graph-schema - Property-graph schema registry
//!
//! Label and property metadata for partitioned property graphs, a string
//! grammar for property types, and a projection into a single global
//! property-id namespace for foreign graph engines.

pub mod cli;
pub mod observability;
pub mod schema;
