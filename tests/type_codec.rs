//! Type Codec Tests
//!
//! Tests for the property-type string grammar:
//! - decode(encode(t)) == t for every canonical type
//! - Decoding is case-insensitive, encoding is upper-case
//! - Missing or unknown time units fall back to the default unit
//! - Unknown base kinds go through the fallback resolver, then fail

use graph_schema::schema::{
    decode, decode_with, encode, encode_checked, BuiltinTypeNames, NoFallback, PropertyType,
    SchemaError, TimeUnit, TypeNameResolver, MAX_TYPE_NESTING,
};

// =============================================================================
// Helper Functions
// =============================================================================

fn scalars() -> Vec<PropertyType> {
    vec![
        PropertyType::Null,
        PropertyType::Bool,
        PropertyType::Int8,
        PropertyType::Int16,
        PropertyType::Int32,
        PropertyType::Int64,
        PropertyType::UInt8,
        PropertyType::UInt16,
        PropertyType::UInt32,
        PropertyType::UInt64,
        PropertyType::Float32,
        PropertyType::Float64,
        PropertyType::String,
        PropertyType::Date32,
        PropertyType::Date64,
    ]
}

fn temporals() -> Vec<PropertyType> {
    let mut types = Vec::new();
    for unit in TimeUnit::ALL {
        types.push(PropertyType::Time32(unit));
        types.push(PropertyType::Time64(unit));
        types.push(PropertyType::timestamp(unit, None));
        types.push(PropertyType::timestamp(unit, Some("UTC")));
        types.push(PropertyType::timestamp(unit, Some("America/New_York")));
    }
    types
}

fn assert_round_trip(ty: &PropertyType) {
    let text = encode(ty);
    let decoded = decode(&text).unwrap_or_else(|e| panic!("{} failed to decode: {}", text, e));
    assert_eq!(&decoded, ty, "round trip through {}", text);
}

// =============================================================================
// Round Trip Tests
// =============================================================================

#[test]
fn test_scalar_round_trip() {
    for ty in scalars() {
        assert_round_trip(&ty);
    }
}

#[test]
fn test_temporal_round_trip_every_unit() {
    for ty in temporals() {
        assert_round_trip(&ty);
    }
}

#[test]
fn test_list_round_trip() {
    for element in [
        PropertyType::Int32,
        PropertyType::Int64,
        PropertyType::Float32,
        PropertyType::Float64,
        PropertyType::String,
    ] {
        assert_round_trip(&PropertyType::list(element.clone()));
        assert_round_trip(&PropertyType::large_list(element));
    }
}

#[test]
fn test_fixed_list_round_trip_sizes() {
    for size in [0, 1, 4, 1024] {
        for element in [
            PropertyType::Int32,
            PropertyType::Int64,
            PropertyType::Float32,
            PropertyType::Float64,
            PropertyType::String,
        ] {
            assert_round_trip(&PropertyType::fixed_size_list(element, size));
        }
    }
}

#[test]
fn test_nested_lists_round_trip() {
    assert_round_trip(&PropertyType::list(PropertyType::list(PropertyType::Int64)));
    assert_round_trip(&PropertyType::large_list(PropertyType::list(
        PropertyType::Time64(TimeUnit::Micro),
    )));
    assert_round_trip(&PropertyType::list(PropertyType::fixed_size_list(
        PropertyType::Float64,
        3,
    )));
}

/// An empty zone name round-trips as a naive timestamp.
#[test]
fn test_empty_timezone_round_trip() {
    let ty = PropertyType::timestamp(TimeUnit::Second, Some(""));
    assert_eq!(encode(&ty), "TIMESTAMP[S][]");
    assert_round_trip(&ty);

    let raw = PropertyType::Timestamp {
        unit: TimeUnit::Second,
        timezone: Some(String::new()),
    };
    assert!(encode_checked(&raw).is_err());
}

// =============================================================================
// Nesting Tests
// =============================================================================

/// Very deep list prefixes are refused instead of exhausting the stack.
#[test]
fn test_deeply_nested_list_rejected() {
    for prefix in ["LIST", "largelist"] {
        let text = format!("{}INT", prefix.repeat(2000));
        match decode(&text) {
            Err(SchemaError::MalformedType(input)) => assert_eq!(input, text),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }
    let at_limit = format!("{}DOUBLE", "LIST".repeat(MAX_TYPE_NESTING));
    assert!(decode(&at_limit).is_ok());
}

/// A fixed list directly holding a fixed list has no decodable encoding.
#[test]
fn test_fixed_list_of_fixed_list_refused() {
    let inner = PropertyType::fixed_size_list(PropertyType::Int32, 4);
    let outer = PropertyType::fixed_size_list(inner.clone(), 2);
    assert!(matches!(encode_checked(&outer), Err(SchemaError::MalformedType(_))));
    assert!(decode("FIXEDLISTFIXEDLISTINT42").is_err());

    let wrapped = PropertyType::large_list(inner);
    assert_eq!(encode_checked(&wrapped).unwrap(), "LARGELISTFIXEDLISTINT4");
    assert_round_trip(&wrapped);
}

// =============================================================================
// Grammar Tests
// =============================================================================

#[test]
fn test_canonical_strings() {
    assert_eq!(encode(&PropertyType::Int8), "BYTE");
    assert_eq!(encode(&PropertyType::UInt64), "ULONG");
    assert_eq!(encode(&PropertyType::Date64), "DATE64[MS]");
    assert_eq!(encode(&PropertyType::Time64(TimeUnit::Nano)), "TIME[64][NS]");
    assert_eq!(encode(&PropertyType::list(PropertyType::String)), "LISTSTRING");
    assert_eq!(
        encode(&PropertyType::large_list(PropertyType::Float64)),
        "LARGELISTDOUBLE"
    );
    assert_eq!(
        encode(&PropertyType::fixed_size_list(PropertyType::Int32, 4)),
        "FIXEDLISTINT4"
    );
}

#[test]
fn test_decode_case_insensitive() {
    assert_eq!(decode("double").unwrap(), PropertyType::Float64);
    assert_eq!(decode("Time[32][ms]").unwrap(), PropertyType::Time32(TimeUnit::Milli));
    assert_eq!(
        decode("largelistlong").unwrap(),
        PropertyType::large_list(PropertyType::Int64)
    );
    assert_eq!(
        decode("fixedListFloat16").unwrap(),
        PropertyType::fixed_size_list(PropertyType::Float32, 16)
    );
}

#[test]
fn test_timezone_keeps_original_case() {
    assert_eq!(
        decode("timestamp[us][Europe/Berlin]").unwrap(),
        PropertyType::timestamp(TimeUnit::Micro, Some("Europe/Berlin"))
    );
}

#[test]
fn test_absent_unit_uses_default() {
    assert_eq!(decode("TIME[32]").unwrap(), PropertyType::Time32(TimeUnit::DEFAULT));
    assert_eq!(decode("TIME[64]X").unwrap(), PropertyType::Time64(TimeUnit::DEFAULT));
    assert_eq!(
        decode("TIMESTAMP").unwrap(),
        PropertyType::timestamp(TimeUnit::DEFAULT, None)
    );
}

#[test]
fn test_unknown_unit_uses_default() {
    assert_eq!(
        decode("TIME[32][HOURS]").unwrap(),
        PropertyType::Time32(TimeUnit::DEFAULT)
    );
    assert_eq!(TimeUnit::DEFAULT, TimeUnit::Nano);
}

// =============================================================================
// Fallback Resolver Tests
// =============================================================================

struct DecimalAsDouble;

impl TypeNameResolver for DecimalAsDouble {
    fn resolve(&self, name: &str) -> Option<PropertyType> {
        name.eq_ignore_ascii_case("decimal")
            .then_some(PropertyType::Float64)
    }
}

#[test]
fn test_builtin_names() {
    let resolver = BuiltinTypeNames;
    assert_eq!(decode_with("int32_t", &resolver).unwrap(), PropertyType::Int32);
    assert_eq!(decode_with("std::string", &resolver).unwrap(), PropertyType::String);
    assert_eq!(decode_with("large_utf8", &resolver).unwrap(), PropertyType::String);
    assert_eq!(decode_with("uint64", &resolver).unwrap(), PropertyType::UInt64);
}

#[test]
fn test_custom_resolver() {
    assert_eq!(
        decode_with("Decimal", &DecimalAsDouble).unwrap(),
        PropertyType::Float64
    );
    assert_eq!(
        decode_with("LISTDECIMAL", &DecimalAsDouble).unwrap(),
        PropertyType::list(PropertyType::Float64)
    );
    assert!(decode_with("int32_t", &DecimalAsDouble).is_err());
}

#[test]
fn test_unrecognized_fails() {
    for text in ["", "DECIMAL", "LISTDECIMAL", "FIXEDLISTINT", "MAP<STRING,INT>"] {
        match decode_with(text, &NoFallback) {
            Err(SchemaError::MalformedType(input)) => assert_eq!(input, text),
            other => panic!("{:?} decoded to {:?}", text, other.ok()),
        }
    }
}

#[test]
fn test_display_and_from_str() {
    let ty: PropertyType = "fixedlistlong8".parse().unwrap();
    assert_eq!(ty.to_string(), "FIXEDLISTLONG8");
    assert!("NOPE".parse::<PropertyType>().is_err());
}
