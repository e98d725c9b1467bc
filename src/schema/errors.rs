//! Schema error types
//!
//! Error codes:
//! - GS_MALFORMED_TYPE (REJECT)
//! - GS_LABEL_NOT_FOUND (REJECT)
//! - GS_PARSE_ERROR (REJECT)
//! - GS_MISSING_FIELD (REJECT)
//! - GS_SERIALIZATION_ERROR (REJECT)
//! - GS_IO_ERROR (FATAL)
//!
//! Property and label read lookups never return these; they answer with
//! sentinels (`-1`, empty string, null type) instead.

use std::fmt;
use std::io;

use thiserror::Error;

use super::types::LabelKind;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Caller request rejected, registry state unchanged
    Reject,
    /// Backing storage failed
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Stable machine-readable error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Type string not understood by the codec or the fallback resolver
    GsMalformedType,
    /// Mutable label lookup by name found nothing
    GsLabelNotFound,
    /// JSON text could not be parsed
    GsParseError,
    /// Required JSON field absent
    GsMissingField,
    /// Encoding to JSON failed
    GsSerializationError,
    /// File read or write failed
    GsIoError,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::GsMalformedType => "GS_MALFORMED_TYPE",
            SchemaErrorCode::GsLabelNotFound => "GS_LABEL_NOT_FOUND",
            SchemaErrorCode::GsParseError => "GS_PARSE_ERROR",
            SchemaErrorCode::GsMissingField => "GS_MISSING_FIELD",
            SchemaErrorCode::GsSerializationError => "GS_SERIALIZATION_ERROR",
            SchemaErrorCode::GsIoError => "GS_IO_ERROR",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            SchemaErrorCode::GsIoError => Severity::Fatal,
            _ => Severity::Reject,
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised by the schema registry, codec and projector.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Unrecognized type string
    #[error("malformed property type '{0}'")]
    MalformedType(String),

    /// Label lookup for mutation failed
    #[error("not found the entry of label {kind} {label}")]
    NotFound {
        /// Requested kind
        kind: LabelKind,
        /// Requested label name
        label: String,
    },

    /// Malformed JSON text or structurally inconsistent document
    #[error("failed to parse schema JSON: {0}")]
    Parse(String),

    /// Required field absent from a JSON object
    #[error("missing required field '{field}' in {context}")]
    MissingField {
        /// Field name as written on the wire
        field: &'static str,
        /// Object that lacked it
        context: &'static str,
    },

    /// JSON encoding failed
    #[error("failed to serialize schema: {0}")]
    Serialization(String),

    /// File access failed
    #[error("I/O error on '{path}': {source}")]
    Io {
        /// File path
        path: String,
        /// Underlying error
        #[source]
        source: io::Error,
    },
}

impl SchemaError {
    /// Create a label-not-found error
    pub fn not_found(kind: LabelKind, label: impl Into<String>) -> Self {
        SchemaError::NotFound {
            kind,
            label: label.into(),
        }
    }

    /// Create a missing-field error
    pub fn missing_field(field: &'static str, context: &'static str) -> Self {
        SchemaError::MissingField { field, context }
    }

    /// Create an I/O error bound to a path
    pub fn io(path: impl Into<String>, source: io::Error) -> Self {
        SchemaError::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        match self {
            SchemaError::MalformedType(_) => SchemaErrorCode::GsMalformedType,
            SchemaError::NotFound { .. } => SchemaErrorCode::GsLabelNotFound,
            SchemaError::Parse(_) => SchemaErrorCode::GsParseError,
            SchemaError::MissingField { .. } => SchemaErrorCode::GsMissingField,
            SchemaError::Serialization(_) => SchemaErrorCode::GsSerializationError,
            SchemaError::Io { .. } => SchemaErrorCode::GsIoError,
        }
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code().severity()
    }

    /// Returns whether this is a fatal error
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl From<serde_json::Error> for SchemaError {
    fn from(e: serde_json::Error) -> Self {
        SchemaError::Parse(e.to_string())
    }
}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
