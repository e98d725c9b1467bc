//! Observable schema lifecycle events
//!
//! Events are explicit and typed. Read-only lookups have no events.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Label lifecycle
    /// Label created in a registry
    LabelCreated,
    /// Existing label entry copied into a registry
    LabelAdded,
    /// Label soft-deleted
    LabelInvalidated,

    // Property lifecycle
    /// Property appended to a label
    PropertyAdded,
    /// Property soft-deleted
    PropertyRemoved,

    // Serialization
    /// Schema decoded from JSON
    SchemaDecoded,
    /// Schema encoded to JSON
    SchemaEncoded,
    /// Schema written to a file
    SchemaDumped,
    /// Schema read from a file
    SchemaLoaded,
    /// Structural validation ran
    SchemaValidated,

    // Projection
    /// Projected schema built from a registry
    ProjectionBuilt,

    // Type codec
    /// Temporal type string without a usable unit; default unit substituted
    TypeUnitDefaulted,
    /// Type string resolved by the fallback resolver
    TypeResolvedByFallback,
    /// Type string rejected for nesting lists too deeply
    TypeNestingExceeded,

    // Front end
    /// Configuration loaded
    ConfigLoaded,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::LabelCreated => "LABEL_CREATED",
            Event::LabelAdded => "LABEL_ADDED",
            Event::LabelInvalidated => "LABEL_INVALIDATED",
            Event::PropertyAdded => "PROPERTY_ADDED",
            Event::PropertyRemoved => "PROPERTY_REMOVED",
            Event::SchemaDecoded => "SCHEMA_DECODED",
            Event::SchemaEncoded => "SCHEMA_ENCODED",
            Event::SchemaDumped => "SCHEMA_DUMPED",
            Event::SchemaLoaded => "SCHEMA_LOADED",
            Event::SchemaValidated => "SCHEMA_VALIDATED",
            Event::ProjectionBuilt => "PROJECTION_BUILT",
            Event::TypeUnitDefaulted => "TYPE_UNIT_DEFAULTED",
            Event::TypeResolvedByFallback => "TYPE_RESOLVED_BY_FALLBACK",
            Event::TypeNestingExceeded => "TYPE_NESTING_EXCEEDED",
            Event::ConfigLoaded => "CONFIG_LOADED",
        }
    }

    /// Returns whether this event records a single mutation.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Event::LabelCreated
                | Event::LabelAdded
                | Event::LabelInvalidated
                | Event::PropertyAdded
                | Event::PropertyRemoved
        )
    }

    /// Returns whether this event reports degraded or refused input.
    pub fn is_degraded(&self) -> bool {
        matches!(self, Event::TypeUnitDefaulted | Event::TypeNestingExceeded)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
