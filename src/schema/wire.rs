//! JSON wire records
//!
//! Encoding uses borrowing records so field order on the wire follows
//! declaration order. Decoding uses owned records whose required fields
//! are `Option` so that absence surfaces as `MissingField` rather than a
//! generic parse failure.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct PropertyDefJson<'a> {
    pub id: i32,
    pub name: &'a str,
    pub data_type: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPropertyDef {
    pub id: Option<i32>,
    pub name: Option<String>,
    pub data_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct IndexJson<'a> {
    #[serde(rename = "propertyNames")]
    pub property_names: &'a [String],
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawIndex {
    #[serde(rename = "propertyNames", default)]
    pub property_names: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RelationJson<'a> {
    #[serde(rename = "srcVertexLabel")]
    pub src: &'a str,
    #[serde(rename = "dstVertexLabel")]
    pub dst: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawRelation {
    #[serde(rename = "srcVertexLabel", default)]
    pub src: Option<String>,
    #[serde(rename = "dstVertexLabel", default)]
    pub dst: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct EntryJson<'a> {
    pub id: i32,
    pub label: &'a str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(rename = "propertyDefList")]
    pub property_defs: Vec<PropertyDefJson<'a>>,
    pub indexes: Vec<IndexJson<'a>>,
    #[serde(rename = "rawRelationShips")]
    pub relations: Vec<RelationJson<'a>>,
    #[serde(skip_serializing_if = "is_empty_slice")]
    pub mapping: &'a [i32],
    #[serde(skip_serializing_if = "is_empty_slice")]
    pub reverse_mapping: &'a [i32],
    pub valid_properties: Vec<u8>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawEntry {
    pub id: Option<i32>,
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(rename = "propertyDefList")]
    pub property_defs: Option<Vec<RawPropertyDef>>,
    #[serde(default)]
    pub indexes: Option<Vec<RawIndex>>,
    #[serde(rename = "rawRelationShips", default)]
    pub relations: Option<Vec<RawRelation>>,
    #[serde(default)]
    pub mapping: Option<Vec<i32>>,
    #[serde(default)]
    pub reverse_mapping: Option<Vec<i32>>,
    #[serde(default)]
    pub valid_properties: Option<Vec<i64>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RegistryJson<'a> {
    #[serde(rename = "partitionNum")]
    pub partition_count: usize,
    pub types: Vec<EntryJson<'a>>,
    pub valid_vertices: Vec<u8>,
    pub valid_edges: Vec<u8>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawRegistry {
    #[serde(rename = "partitionNum")]
    pub partition_count: Option<usize>,
    pub types: Option<Vec<RawEntry>>,
    #[serde(default)]
    pub valid_vertices: Option<Vec<i64>>,
    #[serde(default)]
    pub valid_edges: Option<Vec<i64>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProjectionJson<'a> {
    #[serde(rename = "partitionNum")]
    pub partition_count: usize,
    pub types: Vec<EntryJson<'a>>,
    #[serde(rename = "uniquePropertyNames")]
    pub unique_property_names: &'a [String],
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawProjection {
    #[serde(rename = "partitionNum")]
    pub partition_count: Option<usize>,
    pub types: Option<Vec<RawEntry>>,
    #[serde(rename = "uniquePropertyNames", default)]
    pub unique_property_names: Option<Vec<String>>,
}

fn is_empty_slice(slice: &&[i32]) -> bool {
    slice.is_empty()
}

/// Encodes a soft-delete mask as `0|1` integers.
pub(crate) fn mask_to_wire(mask: &[bool]) -> Vec<u8> {
    mask.iter().map(|valid| u8::from(*valid)).collect()
}

/// Decodes a `0|1` mask; any non-zero value counts as valid.
pub(crate) fn mask_from_wire(raw: &[i64]) -> Vec<bool> {
    raw.iter().map(|bit| *bit != 0).collect()
}
