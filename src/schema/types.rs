//! Property type descriptors and label kinds
//!
//! The type set is closed:
//! - Primitives: null, bool, signed/unsigned integers, floats, utf8 string
//! - Temporal: date32 (day), date64 (ms), time32/time64 with unit,
//!   timestamp with unit and optional timezone
//! - Composite: list, large list, fixed-size list (recursive element type)
//!
//! Equality is structural. The textual form lives in `codec`.

use std::fmt;

/// Resolution of temporal values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    /// Seconds
    Second,
    /// Milliseconds
    Milli,
    /// Microseconds
    Micro,
    /// Nanoseconds
    Nano,
}

impl TimeUnit {
    /// Unit substituted when a temporal type string carries no usable suffix.
    pub const DEFAULT: TimeUnit = TimeUnit::Nano;

    /// All units, in ascending resolution.
    pub const ALL: [TimeUnit; 4] = [
        TimeUnit::Second,
        TimeUnit::Milli,
        TimeUnit::Micro,
        TimeUnit::Nano,
    ];

    /// Returns the bracketed suffix used in encoded type strings.
    pub fn suffix(&self) -> &'static str {
        match self {
            TimeUnit::Second => "[S]",
            TimeUnit::Milli => "[MS]",
            TimeUnit::Micro => "[US]",
            TimeUnit::Nano => "[NS]",
        }
    }

    /// Matches a unit suffix at the start of `text` (already upper-cased).
    ///
    /// Returns the unit together with the suffix length consumed.
    pub fn match_prefix(text: &str) -> Option<(TimeUnit, usize)> {
        TimeUnit::ALL
            .iter()
            .find(|unit| text.starts_with(unit.suffix()))
            .map(|unit| (*unit, unit.suffix().len()))
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Type descriptor of a property.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum PropertyType {
    /// Absent / unknown type; also the miss sentinel of type lookups
    #[default]
    Null,
    /// Boolean
    Bool,
    /// 8-bit signed integer
    Int8,
    /// 16-bit signed integer
    Int16,
    /// 32-bit signed integer
    Int32,
    /// 64-bit signed integer
    Int64,
    /// 8-bit unsigned integer
    UInt8,
    /// 16-bit unsigned integer
    UInt16,
    /// 32-bit unsigned integer
    UInt32,
    /// 64-bit unsigned integer
    UInt64,
    /// 32-bit float
    Float32,
    /// 64-bit float
    Float64,
    /// UTF-8 string
    String,
    /// Days since epoch
    Date32,
    /// Milliseconds since epoch
    Date64,
    /// Time of day stored in 32 bits
    Time32(TimeUnit),
    /// Time of day stored in 64 bits
    Time64(TimeUnit),
    /// Instant with unit and optional timezone name
    Timestamp {
        /// Resolution
        unit: TimeUnit,
        /// Timezone name, `None` when naive. Never `Some("")`: an empty
        /// zone encodes the same as a naive one and decodes to `None`.
        timezone: Option<String>,
    },
    /// Variable-length list (32-bit offsets)
    List(Box<PropertyType>),
    /// Variable-length list (64-bit offsets)
    LargeList(Box<PropertyType>),
    /// List with a fixed element count
    FixedSizeList {
        /// Element type
        element: Box<PropertyType>,
        /// Element count
        size: u32,
    },
}

impl PropertyType {
    /// Shorthand for `List(element)`.
    pub fn list(element: PropertyType) -> Self {
        PropertyType::List(Box::new(element))
    }

    /// Shorthand for `LargeList(element)`.
    pub fn large_list(element: PropertyType) -> Self {
        PropertyType::LargeList(Box::new(element))
    }

    /// Shorthand for `FixedSizeList { element, size }`.
    pub fn fixed_size_list(element: PropertyType, size: u32) -> Self {
        PropertyType::FixedSizeList {
            element: Box::new(element),
            size,
        }
    }

    /// Shorthand for a timestamp type. An empty zone is treated as naive.
    pub fn timestamp(unit: TimeUnit, timezone: Option<&str>) -> Self {
        PropertyType::Timestamp {
            unit,
            timezone: timezone.filter(|tz| !tz.is_empty()).map(str::to_string),
        }
    }

    /// Returns true for the null type.
    pub fn is_null(&self) -> bool {
        matches!(self, PropertyType::Null)
    }

    /// Returns true for list, large list and fixed-size list.
    pub fn is_list(&self) -> bool {
        matches!(
            self,
            PropertyType::List(_) | PropertyType::LargeList(_) | PropertyType::FixedSizeList { .. }
        )
    }

    /// Element type of list kinds.
    pub fn element_type(&self) -> Option<&PropertyType> {
        match self {
            PropertyType::List(element)
            | PropertyType::LargeList(element)
            | PropertyType::FixedSizeList { element, .. } => Some(element),
            _ => None,
        }
    }

    /// Returns the type name for error messages and listings
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyType::Null => "null",
            PropertyType::Bool => "bool",
            PropertyType::Int8 => "int8",
            PropertyType::Int16 => "int16",
            PropertyType::Int32 => "int32",
            PropertyType::Int64 => "int64",
            PropertyType::UInt8 => "uint8",
            PropertyType::UInt16 => "uint16",
            PropertyType::UInt32 => "uint32",
            PropertyType::UInt64 => "uint64",
            PropertyType::Float32 => "float32",
            PropertyType::Float64 => "float64",
            PropertyType::String => "utf8",
            PropertyType::Date32 => "date32",
            PropertyType::Date64 => "date64",
            PropertyType::Time32(_) => "time32",
            PropertyType::Time64(_) => "time64",
            PropertyType::Timestamp { .. } => "timestamp",
            PropertyType::List(_) => "list",
            PropertyType::LargeList(_) => "large_list",
            PropertyType::FixedSizeList { .. } => "fixed_size_list",
        }
    }
}

/// Whether a label describes vertices or edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelKind {
    /// Vertex label
    Vertex,
    /// Edge label
    Edge,
}

impl LabelKind {
    /// Wire name of vertex labels.
    pub const VERTEX_TYPE_NAME: &'static str = "VERTEX";
    /// Wire name of edge labels.
    pub const EDGE_TYPE_NAME: &'static str = "EDGE";

    /// Returns the wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelKind::Vertex => Self::VERTEX_TYPE_NAME,
            LabelKind::Edge => Self::EDGE_TYPE_NAME,
        }
    }

    /// Parses a wire name. Case-insensitive.
    pub fn parse(text: &str) -> Option<Self> {
        if text.eq_ignore_ascii_case(Self::VERTEX_TYPE_NAME) {
            Some(LabelKind::Vertex)
        } else if text.eq_ignore_ascii_case(Self::EDGE_TYPE_NAME) {
            Some(LabelKind::Edge)
        } else {
            None
        }
    }
}

impl fmt::Display for LabelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
