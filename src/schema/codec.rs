//! Textual encoding of property types
//!
//! Canonical form is upper-case; decoding is case-insensitive.
//!
//! | Type                      | Encoding                         |
//! |---------------------------|----------------------------------|
//! | null, bool                | `NULL`, `BOOL`                   |
//! | int8/16/32/64             | `BYTE`, `SHORT`, `INT`, `LONG`   |
//! | uint8/16/32/64            | `UBYTE`, `USHORT`, `UINT`, `ULONG` |
//! | float32/64                | `FLOAT`, `DOUBLE`                |
//! | utf8                      | `STRING`                         |
//! | date32 / date64           | `DATE32[DAY]`, `DATE64[MS]`      |
//! | time32 / time64           | `TIME[32][MS]`, `TIME[64][NS]`   |
//! | timestamp                 | `TIMESTAMP[US][UTC]`             |
//! | list / large list         | `LISTINT`, `LARGELISTSTRING`     |
//! | fixed-size list           | `FIXEDLISTFLOAT4`                |
//!
//! A temporal string whose unit suffix is missing or unrecognized decodes
//! with `TimeUnit::DEFAULT`. Anything else that does not match is handed
//! to a [`TypeNameResolver`] before failing with `MalformedType`.

use std::fmt;
use std::str::FromStr;

use super::errors::{SchemaError, SchemaResult};
use super::types::{PropertyType, TimeUnit};
use crate::observability::{log_event_with_fields, Event};

const TIME32_PREFIX: &str = "TIME[32]";
const TIME64_PREFIX: &str = "TIME[64]";
const TIMESTAMP_PREFIX: &str = "TIMESTAMP";
const LIST_PREFIX: &str = "LIST";
const LARGE_LIST_PREFIX: &str = "LARGELIST";
const FIXED_LIST_PREFIX: &str = "FIXEDLIST";

/// Shortest unit suffix (`[S]`); anything shorter counts as absent.
const MIN_UNIT_SUFFIX_LEN: usize = 3;

/// Deepest list nesting the codec accepts.
pub const MAX_TYPE_NESTING: usize = 32;

/// Secondary lookup for type names outside the canonical grammar.
pub trait TypeNameResolver {
    /// Resolves `name` (as written by the caller, original case) or returns `None`.
    fn resolve(&self, name: &str) -> Option<PropertyType>;
}

/// Resolves the C-style and Arrow-style type names used by graph loaders
/// (`int32_t`, `uint64`, `double`, `std::string`, `large_utf8`, ...).
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTypeNames;

impl TypeNameResolver for BuiltinTypeNames {
    fn resolve(&self, name: &str) -> Option<PropertyType> {
        let ty = match name.to_ascii_lowercase().as_str() {
            "bool" | "boolean" => PropertyType::Bool,
            "int8" | "int8_t" => PropertyType::Int8,
            "int16" | "int16_t" => PropertyType::Int16,
            "int32" | "int32_t" | "integer" => PropertyType::Int32,
            "int64" | "int64_t" => PropertyType::Int64,
            "uint8" | "uint8_t" => PropertyType::UInt8,
            "uint16" | "uint16_t" => PropertyType::UInt16,
            "uint32" | "uint32_t" => PropertyType::UInt32,
            "uint64" | "uint64_t" => PropertyType::UInt64,
            "float32" => PropertyType::Float32,
            "float64" => PropertyType::Float64,
            "str" | "std::string" | "utf8" | "large_utf8" | "large_string" => PropertyType::String,
            "date32" => PropertyType::Date32,
            "date64" => PropertyType::Date64,
            _ => return None,
        };
        Some(ty)
    }
}

/// Resolver that knows no names; decoding becomes strictly canonical.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFallback;

impl TypeNameResolver for NoFallback {
    fn resolve(&self, _name: &str) -> Option<PropertyType> {
        None
    }
}

/// Encodes a type into its canonical string.
pub fn encode(ty: &PropertyType) -> String {
    let mut out = String::with_capacity(16);
    encode_into(ty, &mut out);
    out
}

fn encode_into(ty: &PropertyType, out: &mut String) {
    match ty {
        PropertyType::Null => out.push_str("NULL"),
        PropertyType::Bool => out.push_str("BOOL"),
        PropertyType::Int8 => out.push_str("BYTE"),
        PropertyType::Int16 => out.push_str("SHORT"),
        PropertyType::Int32 => out.push_str("INT"),
        PropertyType::Int64 => out.push_str("LONG"),
        PropertyType::UInt8 => out.push_str("UBYTE"),
        PropertyType::UInt16 => out.push_str("USHORT"),
        PropertyType::UInt32 => out.push_str("UINT"),
        PropertyType::UInt64 => out.push_str("ULONG"),
        PropertyType::Float32 => out.push_str("FLOAT"),
        PropertyType::Float64 => out.push_str("DOUBLE"),
        PropertyType::String => out.push_str("STRING"),
        PropertyType::Date32 => out.push_str("DATE32[DAY]"),
        PropertyType::Date64 => out.push_str("DATE64[MS]"),
        PropertyType::Time32(unit) => {
            out.push_str(TIME32_PREFIX);
            out.push_str(unit.suffix());
        }
        PropertyType::Time64(unit) => {
            out.push_str(TIME64_PREFIX);
            out.push_str(unit.suffix());
        }
        PropertyType::Timestamp { unit, timezone } => {
            out.push_str(TIMESTAMP_PREFIX);
            out.push_str(unit.suffix());
            out.push('[');
            if let Some(tz) = timezone {
                out.push_str(tz);
            }
            out.push(']');
        }
        PropertyType::List(element) => {
            out.push_str(LIST_PREFIX);
            encode_into(element, out);
        }
        PropertyType::LargeList(element) => {
            out.push_str(LARGE_LIST_PREFIX);
            encode_into(element, out);
        }
        PropertyType::FixedSizeList { element, size } => {
            out.push_str(FIXED_LIST_PREFIX);
            encode_into(element, out);
            out.push_str(&size.to_string());
        }
    }
}

/// Encodes a type, refusing shapes whose canonical string would not
/// decode back to the same type.
///
/// Refused with `MalformedType`: list nesting deeper than
/// [`MAX_TYPE_NESTING`], a fixed-size list whose element encoding itself
/// ends in a size (the two sizes would run together), and a timestamp
/// holding an empty zone name.
pub fn encode_checked(ty: &PropertyType) -> SchemaResult<String> {
    let mut depth = 0;
    let mut current = ty;
    loop {
        let element = match current {
            PropertyType::List(element) | PropertyType::LargeList(element) => &**element,
            PropertyType::FixedSizeList { element, .. } => {
                if ends_with_size(element) {
                    return Err(SchemaError::MalformedType(encode(ty)));
                }
                &**element
            }
            PropertyType::Timestamp {
                timezone: Some(tz), ..
            } if tz.is_empty() => return Err(SchemaError::MalformedType(encode(ty))),
            _ => return Ok(encode(ty)),
        };
        depth += 1;
        if depth > MAX_TYPE_NESTING {
            return Err(SchemaError::MalformedType(encode(ty)));
        }
        current = element;
    }
}

/// Whether the encoding of `ty` ends with fixed-list size digits.
fn ends_with_size(ty: &PropertyType) -> bool {
    let mut current = ty;
    loop {
        match current {
            PropertyType::FixedSizeList { .. } => return true,
            PropertyType::List(element) | PropertyType::LargeList(element) => current = &**element,
            _ => return false,
        }
    }
}

/// Decodes a type string, falling back to [`BuiltinTypeNames`].
pub fn decode(text: &str) -> SchemaResult<PropertyType> {
    decode_with(text, &BuiltinTypeNames)
}

/// Decodes a type string, falling back to `resolver` for names outside
/// the canonical grammar.
///
/// List prefixes are peeled iteratively; more than [`MAX_TYPE_NESTING`]
/// of them fail with `MalformedType`.
pub fn decode_with(text: &str, resolver: &dyn TypeNameResolver) -> SchemaResult<PropertyType> {
    // ASCII upper-casing keeps byte offsets aligned with `text`, so slices
    // taken from `upper` positions are valid in the original.
    let upper = text.to_ascii_uppercase();
    if let Some(ty) = decode_canonical(text, &upper, resolver) {
        return Ok(ty);
    }
    match resolve_fallback(text, resolver) {
        Some(ty) => Ok(ty),
        None => Err(SchemaError::MalformedType(text.to_string())),
    }
}

/// List wrapper peeled off the front of a type string.
enum ListKind {
    List,
    LargeList,
    Fixed(u32),
}

fn decode_canonical(
    text: &str,
    upper: &str,
    resolver: &dyn TypeNameResolver,
) -> Option<PropertyType> {
    let mut wrappers = Vec::new();
    let (mut start, mut end) = (0, text.len());

    loop {
        let rest = &upper[start..end];
        let wrapper = if rest.starts_with(LARGE_LIST_PREFIX) {
            start += LARGE_LIST_PREFIX.len();
            ListKind::LargeList
        } else if rest.starts_with(FIXED_LIST_PREFIX) {
            let tail = &rest[FIXED_LIST_PREFIX.len()..];
            let digits_at = tail.trim_end_matches(|c: char| c.is_ascii_digit()).len();
            if digits_at == tail.len() {
                return None;
            }
            let size: u32 = tail[digits_at..].parse().ok()?;
            start += FIXED_LIST_PREFIX.len();
            end = start + digits_at;
            ListKind::Fixed(size)
        } else if rest.starts_with(LIST_PREFIX) {
            start += LIST_PREFIX.len();
            ListKind::List
        } else {
            break;
        };
        if wrappers.len() == MAX_TYPE_NESTING {
            let limit = MAX_TYPE_NESTING.to_string();
            log_event_with_fields(Event::TypeNestingExceeded, &[("limit", limit.as_str())]);
            return None;
        }
        wrappers.push(wrapper);
    }

    let element = decode_element(&text[start..end], &upper[start..end], resolver)?;
    Some(
        wrappers
            .into_iter()
            .rev()
            .fold(element, |inner, wrapper| match wrapper {
                ListKind::List => PropertyType::list(inner),
                ListKind::LargeList => PropertyType::large_list(inner),
                ListKind::Fixed(size) => PropertyType::fixed_size_list(inner, size),
            }),
    )
}

/// Decodes a non-list type: keyword, temporal, or fallback name.
fn decode_element(
    text: &str,
    upper: &str,
    resolver: &dyn TypeNameResolver,
) -> Option<PropertyType> {
    if let Some(ty) = scalar_from_keyword(upper) {
        return Some(ty);
    }
    if let Some(rest) = upper.strip_prefix(TIME32_PREFIX) {
        return Some(PropertyType::Time32(unit_or_default(rest, text)));
    }
    if let Some(rest) = upper.strip_prefix(TIME64_PREFIX) {
        return Some(PropertyType::Time64(unit_or_default(rest, text)));
    }
    if upper.starts_with(TIMESTAMP_PREFIX) {
        return decode_timestamp(text, upper);
    }
    resolve_fallback(text, resolver)
}

fn resolve_fallback(text: &str, resolver: &dyn TypeNameResolver) -> Option<PropertyType> {
    let ty = resolver.resolve(text)?;
    log_event_with_fields(Event::TypeResolvedByFallback, &[("input", text)]);
    Some(ty)
}

fn scalar_from_keyword(upper: &str) -> Option<PropertyType> {
    let ty = match upper {
        "NULL" => PropertyType::Null,
        "BOOL" => PropertyType::Bool,
        "BYTE" => PropertyType::Int8,
        "SHORT" => PropertyType::Int16,
        "INT" => PropertyType::Int32,
        "LONG" => PropertyType::Int64,
        "UBYTE" => PropertyType::UInt8,
        "USHORT" => PropertyType::UInt16,
        "UINT" => PropertyType::UInt32,
        "ULONG" => PropertyType::UInt64,
        "FLOAT" => PropertyType::Float32,
        "DOUBLE" => PropertyType::Float64,
        "STRING" => PropertyType::String,
        "DATE32[DAY]" => PropertyType::Date32,
        "DATE64[MS]" => PropertyType::Date64,
        _ => return None,
    };
    Some(ty)
}

fn unit_or_default(rest: &str, original: &str) -> TimeUnit {
    if rest.len() < MIN_UNIT_SUFFIX_LEN {
        return TimeUnit::DEFAULT;
    }
    match TimeUnit::match_prefix(rest) {
        Some((unit, _)) => unit,
        None => {
            log_event_with_fields(
                Event::TypeUnitDefaulted,
                &[("input", original), ("unit", TimeUnit::DEFAULT.suffix())],
            );
            TimeUnit::DEFAULT
        }
    }
}

fn decode_timestamp(text: &str, upper: &str) -> Option<PropertyType> {
    let rest = &upper[TIMESTAMP_PREFIX.len()..];
    if rest.len() < MIN_UNIT_SUFFIX_LEN {
        return Some(PropertyType::Timestamp {
            unit: TimeUnit::DEFAULT,
            timezone: None,
        });
    }
    let Some((unit, consumed)) = TimeUnit::match_prefix(rest) else {
        return Some(PropertyType::Timestamp {
            unit: unit_or_default(rest, text),
            timezone: None,
        });
    };

    let tail = &text[TIMESTAMP_PREFIX.len() + consumed..];
    if tail.is_empty() {
        return Some(PropertyType::Timestamp {
            unit,
            timezone: None,
        });
    }
    let zone = tail.strip_prefix('[')?.strip_suffix(']')?;
    Some(PropertyType::Timestamp {
        unit,
        timezone: (!zone.is_empty()).then(|| zone.to_string()),
    })
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(self))
    }
}

impl FromStr for PropertyType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}
