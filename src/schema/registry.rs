//! Property-graph schema registry
//!
//! Holds vertex and edge label entries in two append-only collections,
//! each with a label-level validity mask. A label's index is permanent:
//! invalidating a label clears its bit and never renumbers the others.
//!
//! # Concurrency
//!
//! The registry is passive state with no internal locking. The owning
//! catalog serializes mutation behind its own exclusive lock; read-only
//! accessors are safe to call concurrently while no writer holds it.

use std::path::Path;

use serde::Deserialize;

use super::codec::{self, BuiltinTypeNames, TypeNameResolver};
use super::entry::{LabelEntry, LabelId, PropertyDef, PropertyId, INVALID_ID};
use super::errors::{SchemaError, SchemaResult};
use super::loader;
use super::types::{LabelKind, PropertyType};
use super::wire::{mask_from_wire, mask_to_wire, RawRegistry, RegistryJson};
use crate::observability::{log_event_with_fields, Event};

static NULL_TYPE: PropertyType = PropertyType::Null;

/// Vertex and edge label metadata of a partitioned property graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaRegistry {
    partition_count: usize,
    vertex_entries: Vec<LabelEntry>,
    valid_vertices: Vec<bool>,
    edge_entries: Vec<LabelEntry>,
    valid_edges: Vec<bool>,
}

impl SchemaRegistry {
    /// Creates an empty registry with zero partitions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry for `partition_count` partitions.
    pub fn with_partitions(partition_count: usize) -> Self {
        Self {
            partition_count,
            ..Self::default()
        }
    }

    /// Number of partitions the graph is split into.
    pub fn partition_count(&self) -> usize {
        self.partition_count
    }

    /// Records the partition count.
    pub fn set_partition_count(&mut self, partition_count: usize) {
        self.partition_count = partition_count;
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Appends a new, valid label and returns it for further definition.
    pub fn create_entry(&mut self, name: impl Into<String>, kind: LabelKind) -> &mut LabelEntry {
        let (entries, valid) = self.collection_mut(kind);
        let pos = entries.len();
        let id = pos as LabelId;
        entries.push(LabelEntry::new(id, name, kind));
        valid.push(true);

        let entry = &mut entries[pos];
        let id_text = id.to_string();
        log_event_with_fields(
            Event::LabelCreated,
            &[
                ("kind", kind.as_str()),
                ("label", entry.label.as_str()),
                ("id", id_text.as_str()),
            ],
        );
        entry
    }

    /// Appends a copy of an existing entry (merging or cloning schemas).
    ///
    /// The entry is marked valid and renumbered to its position in this
    /// registry; the id it carried in its source registry is discarded.
    /// Returns the new id.
    pub fn add_entry(&mut self, mut entry: LabelEntry) -> LabelId {
        let kind = entry.kind;
        let (entries, valid) = self.collection_mut(kind);
        let id = entries.len() as LabelId;
        entry.id = id;

        let id_text = id.to_string();
        log_event_with_fields(
            Event::LabelAdded,
            &[
                ("kind", kind.as_str()),
                ("label", entry.label.as_str()),
                ("id", id_text.as_str()),
            ],
        );
        entries.push(entry);
        valid.push(true);
        id
    }

    /// Soft-deletes a vertex label. Out-of-range ids are ignored.
    pub fn invalidate_vertex(&mut self, label_id: LabelId) {
        self.invalidate(LabelKind::Vertex, label_id);
    }

    /// Soft-deletes an edge label. Out-of-range ids are ignored.
    pub fn invalidate_edge(&mut self, label_id: LabelId) {
        self.invalidate(LabelKind::Edge, label_id);
    }

    fn invalidate(&mut self, kind: LabelKind, label_id: LabelId) {
        let (_, valid) = self.collection_mut(kind);
        if let Some(bit) = slot(label_id).and_then(|pos| valid.get_mut(pos)) {
            *bit = false;
            let id_text = label_id.to_string();
            log_event_with_fields(
                Event::LabelInvalidated,
                &[("kind", kind.as_str()), ("id", id_text.as_str())],
            );
        }
    }

    // =========================================================================
    // Entry access
    // =========================================================================

    /// Entry at `label_id`, valid or not.
    pub fn entry(&self, label_id: LabelId, kind: LabelKind) -> Option<&LabelEntry> {
        let (entries, _) = self.collection(kind);
        slot(label_id).and_then(|pos| entries.get(pos))
    }

    /// Mutable entry at `label_id`, valid or not.
    pub fn entry_mut(&mut self, label_id: LabelId, kind: LabelKind) -> Option<&mut LabelEntry> {
        let (entries, _) = self.collection_mut(kind);
        slot(label_id).and_then(move |pos| entries.get_mut(pos))
    }

    /// Mutable entry named `label`.
    ///
    /// # Errors
    ///
    /// `NotFound` when no entry of that kind carries the name. Validity is
    /// not consulted.
    pub fn entry_mut_by_name(&mut self, label: &str, kind: LabelKind) -> SchemaResult<&mut LabelEntry> {
        let (entries, _) = self.collection_mut(kind);
        entries
            .iter_mut()
            .find(|entry| entry.label == label)
            .ok_or_else(|| SchemaError::not_found(kind, label))
    }

    /// Valid vertex entries in id order.
    pub fn valid_vertex_entries(&self) -> Vec<&LabelEntry> {
        valid_entries(&self.vertex_entries, &self.valid_vertices)
    }

    /// Valid edge entries in id order.
    pub fn valid_edge_entries(&self) -> Vec<&LabelEntry> {
        valid_entries(&self.edge_entries, &self.valid_edges)
    }

    /// Every vertex entry, invalidated ones included.
    pub fn all_vertex_entries(&self) -> &[LabelEntry] {
        &self.vertex_entries
    }

    /// Every edge entry, invalidated ones included.
    pub fn all_edge_entries(&self) -> &[LabelEntry] {
        &self.edge_entries
    }

    /// Whether the vertex label exists and is valid.
    pub fn is_vertex_valid(&self, label_id: LabelId) -> bool {
        self.live_entry(LabelKind::Vertex, label_id).is_some()
    }

    /// Whether the edge label exists and is valid.
    pub fn is_edge_valid(&self, label_id: LabelId) -> bool {
        self.live_entry(LabelKind::Edge, label_id).is_some()
    }

    /// Names of valid vertex labels in id order.
    pub fn vertex_labels(&self) -> Vec<String> {
        self.labels(LabelKind::Vertex)
    }

    /// Names of valid edge labels in id order.
    pub fn edge_labels(&self) -> Vec<String> {
        self.labels(LabelKind::Edge)
    }

    fn labels(&self, kind: LabelKind) -> Vec<String> {
        let (entries, valid) = self.collection(kind);
        valid_entries(entries, valid)
            .into_iter()
            .map(|entry| entry.label.clone())
            .collect()
    }

    // =========================================================================
    // Sentinel lookups
    // =========================================================================

    /// Id of the valid vertex label `name`, or `-1`.
    pub fn vertex_label_id(&self, name: &str) -> LabelId {
        self.label_id(LabelKind::Vertex, name)
    }

    /// Name of the valid vertex label `label_id`, or `""`.
    pub fn vertex_label_name(&self, label_id: LabelId) -> &str {
        self.label_name(LabelKind::Vertex, label_id)
    }

    /// Id of the valid edge label `name`, or `-1`.
    pub fn edge_label_id(&self, name: &str) -> LabelId {
        self.label_id(LabelKind::Edge, name)
    }

    /// Name of the valid edge label `label_id`, or `""`.
    pub fn edge_label_name(&self, label_id: LabelId) -> &str {
        self.label_name(LabelKind::Edge, label_id)
    }

    /// Property id of `name` in a valid vertex label, or `-1`.
    pub fn vertex_property_id(&self, label_id: LabelId, name: &str) -> PropertyId {
        self.property_id(LabelKind::Vertex, label_id, name)
    }

    /// Property name of `prop_id` in a valid vertex label, or `""`.
    pub fn vertex_property_name(&self, label_id: LabelId, prop_id: PropertyId) -> &str {
        self.property_name(LabelKind::Vertex, label_id, prop_id)
    }

    /// Property type of `prop_id` in a valid vertex label, or the null type.
    pub fn vertex_property_type(&self, label_id: LabelId, prop_id: PropertyId) -> &PropertyType {
        self.property_type(LabelKind::Vertex, label_id, prop_id)
    }

    /// Property id of `name` in a valid edge label, or `-1`.
    pub fn edge_property_id(&self, label_id: LabelId, name: &str) -> PropertyId {
        self.property_id(LabelKind::Edge, label_id, name)
    }

    /// Property name of `prop_id` in a valid edge label, or `""`.
    pub fn edge_property_name(&self, label_id: LabelId, prop_id: PropertyId) -> &str {
        self.property_name(LabelKind::Edge, label_id, prop_id)
    }

    /// Property type of `prop_id` in a valid edge label, or the null type.
    pub fn edge_property_type(&self, label_id: LabelId, prop_id: PropertyId) -> &PropertyType {
        self.property_type(LabelKind::Edge, label_id, prop_id)
    }

    /// `(name, encoded type)` of each valid property of a valid vertex label.
    pub fn vertex_property_list(&self, label_id: LabelId) -> Vec<(String, String)> {
        self.property_list(LabelKind::Vertex, label_id)
    }

    /// As [`Self::vertex_property_list`], looking the label up by name.
    pub fn vertex_property_list_by_label(&self, label: &str) -> Vec<(String, String)> {
        self.property_list(LabelKind::Vertex, self.vertex_label_id(label))
    }

    /// `(name, encoded type)` of each valid property of a valid edge label.
    pub fn edge_property_list(&self, label_id: LabelId) -> Vec<(String, String)> {
        self.property_list(LabelKind::Edge, label_id)
    }

    /// As [`Self::edge_property_list`], looking the label up by name.
    pub fn edge_property_list_by_label(&self, label: &str) -> Vec<(String, String)> {
        self.property_list(LabelKind::Edge, self.edge_label_id(label))
    }

    fn label_id(&self, kind: LabelKind, name: &str) -> LabelId {
        let (entries, valid) = self.collection(kind);
        entries
            .iter()
            .zip(valid.iter())
            .find(|(entry, valid)| **valid && entry.label == name)
            .map_or(INVALID_ID, |(entry, _)| entry.id)
    }

    fn label_name(&self, kind: LabelKind, label_id: LabelId) -> &str {
        self.live_entry(kind, label_id)
            .map_or("", |entry| entry.label.as_str())
    }

    fn property_id(&self, kind: LabelKind, label_id: LabelId, name: &str) -> PropertyId {
        self.live_entry(kind, label_id)
            .map_or(INVALID_ID, |entry| entry.property_id(name))
    }

    fn property_name(&self, kind: LabelKind, label_id: LabelId, prop_id: PropertyId) -> &str {
        self.live_entry(kind, label_id)
            .map_or("", |entry| entry.property_name(prop_id))
    }

    fn property_type(&self, kind: LabelKind, label_id: LabelId, prop_id: PropertyId) -> &PropertyType {
        self.live_entry(kind, label_id)
            .map_or(&NULL_TYPE, |entry| entry.property_type(prop_id))
    }

    fn property_list(&self, kind: LabelKind, label_id: LabelId) -> Vec<(String, String)> {
        self.live_entry(kind, label_id)
            .map(|entry| {
                entry
                    .properties()
                    .map(|prop| (prop.name.clone(), codec::encode(&prop.property_type)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Entry at `label_id` if it is in range and valid.
    fn live_entry(&self, kind: LabelKind, label_id: LabelId) -> Option<&LabelEntry> {
        let (entries, valid) = self.collection(kind);
        let pos = slot(label_id)?;
        match (entries.get(pos), valid.get(pos)) {
            (Some(entry), Some(true)) => Some(entry),
            _ => None,
        }
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Valid properties of every valid label, sorted by name (stable).
    pub fn sorted_valid_properties(&self) -> Vec<&PropertyDef> {
        let mut all: Vec<&PropertyDef> = self
            .valid_vertex_entries()
            .into_iter()
            .chain(self.valid_edge_entries())
            .flat_map(|entry| entry.properties())
            .collect();
        all.sort_by(|lhs, rhs| lhs.name.cmp(&rhs.name));
        all
    }

    /// Structural validation.
    ///
    /// Gathers and sorts the live property set; no integrity rule is
    /// enforced on it yet, so this currently always succeeds.
    pub fn validate(&self) -> Result<(), String> {
        let gathered = self.sorted_valid_properties();
        let count = gathered.len().to_string();
        log_event_with_fields(Event::SchemaValidated, &[("properties", count.as_str())]);
        Ok(())
    }

    // =========================================================================
    // Serialization
    // =========================================================================

    /// Encodes the registry as compact JSON text.
    pub fn to_json_string(&self) -> SchemaResult<String> {
        let text = serde_json::to_string(&self.to_wire()?)
            .map_err(|e| SchemaError::Serialization(e.to_string()))?;
        self.log_encoded(text.len());
        Ok(text)
    }

    /// Encodes the registry as indented JSON text.
    pub fn to_json_string_pretty(&self) -> SchemaResult<String> {
        let text = serde_json::to_string_pretty(&self.to_wire()?)
            .map_err(|e| SchemaError::Serialization(e.to_string()))?;
        self.log_encoded(text.len());
        Ok(text)
    }

    /// Encodes the registry as a JSON value.
    pub fn to_json(&self) -> SchemaResult<serde_json::Value> {
        serde_json::to_value(self.to_wire()?).map_err(|e| SchemaError::Serialization(e.to_string()))
    }

    /// Decodes a registry, resolving non-canonical type names with
    /// [`BuiltinTypeNames`].
    pub fn from_json_str(text: &str) -> SchemaResult<Self> {
        Self::from_json_str_with(text, &BuiltinTypeNames)
    }

    /// Decodes a registry with a caller-supplied type-name resolver.
    ///
    /// Fails as a whole on malformed JSON; no partial registry is returned.
    pub fn from_json_str_with(text: &str, resolver: &dyn TypeNameResolver) -> SchemaResult<Self> {
        let raw: RawRegistry = serde_json::from_str(text)?;
        let registry = Self::from_wire(raw, resolver)?;
        let vertices = registry.vertex_entries.len().to_string();
        let edges = registry.edge_entries.len().to_string();
        log_event_with_fields(
            Event::SchemaDecoded,
            &[("vertex_labels", vertices.as_str()), ("edge_labels", edges.as_str())],
        );
        Ok(registry)
    }

    /// Decodes a registry from a JSON value.
    pub fn from_json(value: &serde_json::Value, resolver: &dyn TypeNameResolver) -> SchemaResult<Self> {
        let raw = RawRegistry::deserialize(value)?;
        Self::from_wire(raw, resolver)
    }

    /// Writes the JSON text form to `path`, replacing any existing file.
    pub fn dump_to_file(&self, path: impl AsRef<Path>) -> SchemaResult<()> {
        loader::write_json_file(path.as_ref(), &self.to_json_string()?)
    }

    /// Writes the indented JSON text form to `path`, replacing any existing file.
    pub fn dump_to_file_pretty(&self, path: impl AsRef<Path>) -> SchemaResult<()> {
        loader::write_json_file(path.as_ref(), &self.to_json_string_pretty()?)
    }

    /// Reads a registry from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> SchemaResult<Self> {
        let text = loader::read_json_file(path.as_ref())?;
        Self::from_json_str(&text)
    }

    fn log_encoded(&self, bytes: usize) {
        let bytes = bytes.to_string();
        log_event_with_fields(Event::SchemaEncoded, &[("bytes", bytes.as_str())]);
    }

    fn to_wire(&self) -> SchemaResult<RegistryJson<'_>> {
        let types = self
            .vertex_entries
            .iter()
            .chain(self.edge_entries.iter())
            .map(LabelEntry::to_wire)
            .collect::<SchemaResult<Vec<_>>>()?;
        Ok(RegistryJson {
            partition_count: self.partition_count,
            types,
            valid_vertices: mask_to_wire(&self.valid_vertices),
            valid_edges: mask_to_wire(&self.valid_edges),
        })
    }

    fn from_wire(raw: RawRegistry, resolver: &dyn TypeNameResolver) -> SchemaResult<Self> {
        let partition_count = raw
            .partition_count
            .ok_or_else(|| SchemaError::missing_field("partitionNum", "schema"))?;
        let types = raw
            .types
            .ok_or_else(|| SchemaError::missing_field("types", "schema"))?;

        let mut registry = Self::with_partitions(partition_count);
        for raw_entry in types {
            let entry = LabelEntry::from_wire(raw_entry, resolver)?;
            let (entries, _) = registry.collection_mut(entry.kind);
            // A label's id is its position in its own collection.
            if slot(entry.id) != Some(entries.len()) {
                return Err(SchemaError::Parse(format!(
                    "{} label '{}' has id {} at position {}",
                    entry.kind,
                    entry.label,
                    entry.id,
                    entries.len()
                )));
            }
            entries.push(entry);
        }

        registry.valid_vertices = decode_mask(
            raw.valid_vertices.as_deref(),
            registry.vertex_entries.len(),
            "valid_vertices",
        )?;
        registry.valid_edges = decode_mask(
            raw.valid_edges.as_deref(),
            registry.edge_entries.len(),
            "valid_edges",
        )?;
        Ok(registry)
    }

    fn collection(&self, kind: LabelKind) -> (&[LabelEntry], &[bool]) {
        match kind {
            LabelKind::Vertex => (&self.vertex_entries, &self.valid_vertices),
            LabelKind::Edge => (&self.edge_entries, &self.valid_edges),
        }
    }

    fn collection_mut(&mut self, kind: LabelKind) -> (&mut Vec<LabelEntry>, &mut Vec<bool>) {
        match kind {
            LabelKind::Vertex => (&mut self.vertex_entries, &mut self.valid_vertices),
            LabelKind::Edge => (&mut self.edge_entries, &mut self.valid_edges),
        }
    }
}

/// Converts a label id into a collection position; negative ids have none.
fn slot(label_id: LabelId) -> Option<usize> {
    usize::try_from(label_id).ok()
}

fn valid_entries<'a>(entries: &'a [LabelEntry], valid: &[bool]) -> Vec<&'a LabelEntry> {
    entries
        .iter()
        .zip(valid.iter())
        .filter(|(_, valid)| **valid)
        .map(|(entry, _)| entry)
        .collect()
}

fn decode_mask(raw: Option<&[i64]>, expected: usize, field: &str) -> SchemaResult<Vec<bool>> {
    match raw {
        None => Ok(vec![true; expected]),
        Some(bits) if bits.len() == expected => Ok(mask_from_wire(bits)),
        Some(bits) => Err(SchemaError::Parse(format!(
            "{} has {} bits for {} labels",
            field,
            bits.len(),
            expected
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::with_partitions(4);
        let person = registry.create_entry("person", LabelKind::Vertex);
        person.add_property("id", PropertyType::Int64);
        person.add_property("name", PropertyType::String);
        person.add_primary_key("id");

        let software = registry.create_entry("software", LabelKind::Vertex);
        software.add_property("id", PropertyType::Int64);
        software.add_property("lang", PropertyType::String);

        let knows = registry.create_entry("knows", LabelKind::Edge);
        knows.add_property("weight", PropertyType::Float64);
        knows.add_relation("person", "person");
        registry
    }

    #[test]
    fn test_create_entry_assigns_collection_ids() {
        let registry = sample_registry();
        assert_eq!(registry.vertex_label_id("person"), 0);
        assert_eq!(registry.vertex_label_id("software"), 1);
        assert_eq!(registry.edge_label_id("knows"), 0);
        assert_eq!(registry.vertex_labels(), vec!["person", "software"]);
        assert_eq!(registry.edge_labels(), vec!["knows"]);
    }

    #[test]
    fn test_entry_mut_by_name_not_found() {
        let mut registry = sample_registry();
        let err = registry
            .entry_mut_by_name("company", LabelKind::Vertex)
            .unwrap_err();
        assert!(matches!(
            err,
            SchemaError::NotFound { kind: LabelKind::Vertex, ref label } if label == "company"
        ));
        // Edge space is separate from vertex space.
        assert!(registry.entry_mut_by_name("person", LabelKind::Edge).is_err());
    }

    #[test]
    fn test_entry_mut_by_name_ignores_validity() {
        let mut registry = sample_registry();
        registry.invalidate_vertex(0);
        let entry = registry.entry_mut_by_name("person", LabelKind::Vertex).unwrap();
        entry.add_property("age", PropertyType::Int32);
        assert_eq!(registry.all_vertex_entries()[0].property_count(), 3);
    }

    #[test]
    fn test_invalidated_label_hidden_from_lookups() {
        let mut registry = sample_registry();
        registry.invalidate_vertex(0);

        assert!(!registry.is_vertex_valid(0));
        assert_eq!(registry.vertex_label_id("person"), INVALID_ID);
        assert_eq!(registry.vertex_label_name(0), "");
        assert_eq!(registry.vertex_property_id(0, "id"), INVALID_ID);
        assert_eq!(registry.vertex_property_name(0, 0), "");
        assert!(registry.vertex_property_type(0, 0).is_null());
        assert!(registry.vertex_property_list(0).is_empty());

        assert_eq!(registry.valid_vertex_entries().len(), 1);
        assert_eq!(registry.all_vertex_entries().len(), 2);
        // Direct access bypasses the mask.
        assert_eq!(registry.entry(0, LabelKind::Vertex).unwrap().label, "person");
        // The remaining label keeps its id.
        assert_eq!(registry.vertex_label_id("software"), 1);
    }

    #[test]
    fn test_out_of_range_lookups_return_sentinels() {
        let registry = sample_registry();
        assert_eq!(registry.edge_property_id(5, "weight"), INVALID_ID);
        assert_eq!(registry.edge_property_id(-1, "weight"), INVALID_ID);
        assert_eq!(registry.edge_property_name(9, 0), "");
        assert!(registry.edge_property_type(9, 0).is_null());
        assert_eq!(registry.edge_label_name(3), "");
        assert!(registry.entry(7, LabelKind::Edge).is_none());
        assert!(!registry.is_edge_valid(7));
    }

    #[test]
    fn test_property_list_encodes_types() {
        let registry = sample_registry();
        assert_eq!(
            registry.vertex_property_list_by_label("person"),
            vec![
                ("id".to_string(), "LONG".to_string()),
                ("name".to_string(), "STRING".to_string())
            ]
        );
        assert_eq!(
            registry.edge_property_list(0),
            vec![("weight".to_string(), "DOUBLE".to_string())]
        );
        assert!(registry.vertex_property_list_by_label("nobody").is_empty());
    }

    #[test]
    fn test_add_entry_copies_into_matching_collection() {
        let source = sample_registry();
        let mut target = SchemaRegistry::new();
        assert_eq!(target.add_entry(source.all_edge_entries()[0].clone()), 0);

        assert!(target.all_vertex_entries().is_empty());
        assert_eq!(target.edge_labels(), vec!["knows"]);
        assert_eq!(target.edge_property_id(0, "weight"), 0);
    }

    #[test]
    fn test_add_entry_renumbers_to_position() {
        let source = sample_registry();
        let mut target = SchemaRegistry::new();
        target.create_entry("company", LabelKind::Vertex);
        target.create_entry("city", LabelKind::Vertex);

        // "person" is vertex 0 in the source.
        let id = target.add_entry(source.all_vertex_entries()[0].clone());
        assert_eq!(id, 2);
        assert_eq!(target.vertex_label_id("person"), 2);
        assert_eq!(target.vertex_label_name(2), "person");
        assert_eq!(target.vertex_property_id(2, "name"), 1);

        let decoded = SchemaRegistry::from_json_str(&target.to_json_string().unwrap()).unwrap();
        assert_eq!(decoded, target);
    }

    #[test]
    fn test_decode_rejects_label_id_off_position() {
        let text = r#"{"partitionNum": 1, "types": [
            {"id": 0, "label": "v", "type": "VERTEX", "propertyDefList": []},
            {"id": 2147483647, "label": "e", "type": "EDGE", "propertyDefList": []}
        ]}"#;
        match SchemaRegistry::from_json_str(text).unwrap_err() {
            SchemaError::Parse(message) => assert!(message.contains("'e'")),
            other => panic!("unexpected error: {other}"),
        }

        let negative = r#"{"partitionNum": 1, "types": [
            {"id": -1, "label": "v", "type": "VERTEX", "propertyDefList": []}
        ]}"#;
        assert!(matches!(
            SchemaRegistry::from_json_str(negative).unwrap_err(),
            SchemaError::Parse(_)
        ));
    }

    #[test]
    fn test_unencodable_type_fails_serialization() {
        let mut registry = SchemaRegistry::new();
        let inner = PropertyType::fixed_size_list(PropertyType::Int32, 4);
        registry
            .create_entry("tensor", LabelKind::Vertex)
            .add_property("cells", PropertyType::fixed_size_list(inner, 2));

        assert!(matches!(
            registry.to_json_string().unwrap_err(),
            SchemaError::MalformedType(text) if text == "FIXEDLISTFIXEDLISTINT42"
        ));
        assert!(registry.to_json().is_err());
        assert!(registry.to_json_string_pretty().is_err());
    }

    #[test]
    fn test_validate_gathers_sorted_live_properties() {
        let mut registry = sample_registry();
        registry.entry_mut(0, LabelKind::Vertex).unwrap().remove_property("name");
        registry.invalidate_vertex(1);

        let names: Vec<&str> = registry
            .sorted_valid_properties()
            .iter()
            .map(|prop| prop.name.as_str())
            .collect();
        assert_eq!(names, vec!["id", "weight"]);
        assert!(registry.validate().is_ok());
    }

    #[test]
    fn test_empty_registry_json() {
        let registry = SchemaRegistry::new();
        assert_eq!(
            registry.to_json_string().unwrap(),
            r#"{"partitionNum":0,"types":[],"valid_vertices":[],"valid_edges":[]}"#
        );
        let decoded = SchemaRegistry::from_json_str(&registry.to_json_string().unwrap()).unwrap();
        assert_eq!(decoded, registry);
    }

    #[test]
    fn test_json_orders_vertices_before_edges() {
        let mut registry = SchemaRegistry::new();
        registry.create_entry("knows", LabelKind::Edge);
        registry.create_entry("person", LabelKind::Vertex);

        let value = registry.to_json().unwrap();
        assert_eq!(value["types"][0]["label"], "person");
        assert_eq!(value["types"][1]["label"], "knows");
        assert_eq!(value["valid_vertices"], json!([1]));
        assert_eq!(value["valid_edges"], json!([1]));
    }

    #[test]
    fn test_json_round_trip() {
        let mut registry = sample_registry();
        registry.invalidate_edge(0);
        registry.entry_mut(1, LabelKind::Vertex).unwrap().remove_property("lang");

        let text = registry.to_json_string().unwrap();
        let decoded = SchemaRegistry::from_json_str(&text).unwrap();
        assert_eq!(decoded, registry);
        assert_eq!(decoded.partition_count(), 4);
    }

    #[test]
    fn test_decode_defaults_missing_masks() {
        let text = r#"{
            "partitionNum": 2,
            "types": [
                {"id": 0, "label": "person", "type": "VERTEX", "propertyDefList": []},
                {"id": 0, "label": "knows", "type": "EDGE", "propertyDefList": []}
            ]
        }"#;
        let registry = SchemaRegistry::from_json_str(text).unwrap();
        assert!(registry.is_vertex_valid(0));
        assert!(registry.is_edge_valid(0));
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(
            SchemaRegistry::from_json_str("{\"partitionNum\": 1, \"types\": [").unwrap_err(),
            SchemaError::Parse(_)
        ));
        assert!(matches!(
            SchemaRegistry::from_json_str(r#"{"types": []}"#).unwrap_err(),
            SchemaError::MissingField { field: "partitionNum", .. }
        ));
        assert!(matches!(
            SchemaRegistry::from_json_str(
                r#"{"partitionNum": 1, "types": [], "valid_vertices": [1]}"#
            )
            .unwrap_err(),
            SchemaError::Parse(_)
        ));
        assert!(matches!(
            SchemaRegistry::from_json_str(
                r#"{"partitionNum": 1, "types": [{"id": 0, "label": "x", "type": "VERTEX",
                    "propertyDefList": [{"id": 0, "name": "p", "data_type": "DECIMAL"}]}]}"#
            )
            .unwrap_err(),
            SchemaError::MalformedType(_)
        ));
    }
}
