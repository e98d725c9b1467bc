//! Property-graph schema subsystem
//!
//! Label and property metadata for a partitioned property graph, with a
//! string grammar for property types and a JSON wire format shared with
//! foreign graph engines.
//!
//! # Design Principles
//!
//! - Append-only storage: labels and properties are soft-deleted, never erased
//! - Ids are stable for the lifetime of a registry
//! - Read lookups answer misses with sentinels (`-1`, `""`, null type)
//! - Mutable lookups by name fail hard with `GS_LABEL_NOT_FOUND`
//! - Decoding is all-or-nothing

mod codec;
mod entry;
mod errors;
mod loader;
mod projector;
mod registry;
mod types;
mod wire;

pub use codec::{
    decode, decode_with, encode, encode_checked, BuiltinTypeNames, NoFallback, TypeNameResolver,
    MAX_TYPE_NESTING,
};
pub use entry::{LabelEntry, LabelId, PropertyDef, PropertyId, INVALID_ID};
pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, Severity};
pub use projector::SchemaProjector;
pub use registry::SchemaRegistry;
pub use types::{LabelKind, PropertyType, TimeUnit};
