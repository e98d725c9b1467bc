//! Global property-id projection
//!
//! A `SchemaProjector` is a read-only snapshot of a finished registry in
//! which every property name shares one numeric namespace across all
//! labels. Global ids start at 1; id 0 is never assigned.
//!
//! Vertex entries come first, followed by edge entries whose label ids are
//! offset by the vertex-label count. Soft deletes are ignored: removed
//! labels and removed properties stay visible with validity forced on.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use super::codec::{BuiltinTypeNames, TypeNameResolver};
use super::entry::{LabelEntry, LabelId, PropertyId, INVALID_ID};
use super::errors::{SchemaError, SchemaResult};
use super::loader;
use super::registry::SchemaRegistry;
use super::types::PropertyType;
use super::wire::{ProjectionJson, RawProjection};
use crate::observability::{log_event_with_fields, Event};

static NULL_TYPE: PropertyType = PropertyType::Null;

/// Unused forward slot.
const UNMAPPED_FORWARD: PropertyId = -1;

/// Unused reverse slot. Collides with a real property id, so reverse
/// lookups must be confirmed against the forward map.
const UNMAPPED_REVERSE: PropertyId = 1;

/// Registry view with one global property-id namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaProjector {
    partition_count: usize,
    unique_property_names: Vec<String>,
    entries: Vec<LabelEntry>,
}

impl SchemaProjector {
    /// Builds the projection of `registry`.
    ///
    /// Must run after every mutation of the source registry; the projector
    /// owns copies of the entries and never observes later changes.
    pub fn new(registry: &SchemaRegistry) -> Self {
        let vertices = registry.all_vertex_entries();
        let edges = registry.all_edge_entries();

        let names: BTreeSet<&str> = vertices
            .iter()
            .chain(edges.iter())
            .flat_map(|entry| entry.all_properties())
            .map(|prop| prop.name.as_str())
            .collect();
        let unique_property_names: Vec<String> = names.into_iter().map(str::to_string).collect();
        let global_ids: BTreeMap<&str, PropertyId> = unique_property_names
            .iter()
            .enumerate()
            .map(|(pos, name)| (name.as_str(), pos as PropertyId + 1))
            .collect();
        let slots = unique_property_names.len() + 1;

        let label_offset = LabelId::try_from(vertices.len()).unwrap_or(LabelId::MAX);
        let mut entries = Vec::with_capacity(vertices.len() + edges.len());
        for entry in vertices {
            entries.push(project_entry(entry, 0, &global_ids, slots));
        }
        for entry in edges {
            entries.push(project_entry(entry, label_offset, &global_ids, slots));
        }

        let labels = entries.len().to_string();
        let properties = unique_property_names.len().to_string();
        log_event_with_fields(
            Event::ProjectionBuilt,
            &[("labels", labels.as_str()), ("properties", properties.as_str())],
        );

        Self {
            partition_count: registry.partition_count(),
            unique_property_names,
            entries,
        }
    }

    /// Partition count copied from the source registry.
    pub fn partition_count(&self) -> usize {
        self.partition_count
    }

    /// Every property name ever declared, sorted. Position `i` holds global id `i + 1`.
    pub fn unique_property_names(&self) -> &[String] {
        &self.unique_property_names
    }

    /// Projected entries: vertices first, then edges.
    pub fn entries(&self) -> &[LabelEntry] {
        &self.entries
    }

    /// Name to global id for every unique property name.
    pub fn property_name_to_id(&self) -> BTreeMap<String, PropertyId> {
        self.unique_property_names
            .iter()
            .enumerate()
            .map(|(pos, name)| (name.clone(), pos as PropertyId + 1))
            .collect()
    }

    // =========================================================================
    // Lookups (first match wins, sentinel on miss)
    // =========================================================================

    /// Global id of the first property named `name`, or `-1`.
    pub fn property_id(&self, name: &str) -> PropertyId {
        self.entries
            .iter()
            .map(|entry| entry.property_id(name))
            .find(|id| *id != INVALID_ID)
            .unwrap_or(INVALID_ID)
    }

    /// Name behind global id `prop_id`, or `""`.
    pub fn property_name(&self, prop_id: PropertyId) -> &str {
        self.entries
            .iter()
            .map(|entry| entry.property_name(prop_id))
            .find(|name| !name.is_empty())
            .unwrap_or("")
    }

    /// Type of `prop_id` in projected label `label_id`, or the null type.
    pub fn property_type(&self, label_id: LabelId, prop_id: PropertyId) -> &PropertyType {
        self.entries
            .iter()
            .filter(|entry| entry.id == label_id)
            .map(|entry| entry.property_type(prop_id))
            .find(|ty| !ty.is_null())
            .unwrap_or(&NULL_TYPE)
    }

    /// Projected id of the first label named `name`, or `-1`.
    pub fn label_id(&self, name: &str) -> LabelId {
        self.entries
            .iter()
            .find(|entry| entry.label == name)
            .map_or(INVALID_ID, |entry| entry.id)
    }

    /// Name of projected label `label_id`, or `""`.
    pub fn label_name(&self, label_id: LabelId) -> &str {
        self.entries
            .iter()
            .find(|entry| entry.id == label_id)
            .map_or("", |entry| entry.label.as_str())
    }

    /// Label-local id behind `global_id` in projected label `label_id`, or `-1`.
    pub fn original_property_id(&self, label_id: LabelId, global_id: PropertyId) -> PropertyId {
        self.entries
            .iter()
            .filter(|entry| entry.id == label_id)
            .map(|entry| entry.original_property_id(global_id))
            .find(|id| *id != INVALID_ID)
            .unwrap_or(INVALID_ID)
    }

    // =========================================================================
    // Serialization
    // =========================================================================

    /// Encodes the projection as compact JSON text.
    pub fn to_json_string(&self) -> SchemaResult<String> {
        let wire = ProjectionJson {
            partition_count: self.partition_count,
            types: self
                .entries
                .iter()
                .map(LabelEntry::to_wire)
                .collect::<SchemaResult<Vec<_>>>()?,
            unique_property_names: &self.unique_property_names,
        };
        serde_json::to_string(&wire).map_err(|e| SchemaError::Serialization(e.to_string()))
    }

    /// Decodes a projection previously written by [`Self::to_json_string`].
    pub fn from_json_str(text: &str) -> SchemaResult<Self> {
        Self::from_json_str_with(text, &BuiltinTypeNames)
    }

    /// Decodes a projection with a caller-supplied type-name resolver.
    ///
    /// `uniquePropertyNames` is optional; when absent the name list is empty.
    pub fn from_json_str_with(text: &str, resolver: &dyn TypeNameResolver) -> SchemaResult<Self> {
        let raw: RawProjection = serde_json::from_str(text)?;
        let partition_count = raw
            .partition_count
            .ok_or_else(|| SchemaError::missing_field("partitionNum", "projection"))?;
        let types = raw
            .types
            .ok_or_else(|| SchemaError::missing_field("types", "projection"))?;

        let entries = types
            .into_iter()
            .map(|raw_entry| LabelEntry::from_wire(raw_entry, resolver))
            .collect::<SchemaResult<Vec<_>>>()?;

        Ok(Self {
            partition_count,
            unique_property_names: raw.unique_property_names.unwrap_or_default(),
            entries,
        })
    }

    /// Writes the JSON text form to `path`, replacing any existing file.
    pub fn dump_to_file(&self, path: impl AsRef<Path>) -> SchemaResult<()> {
        loader::write_json_file(path.as_ref(), &self.to_json_string()?)
    }

    /// Reads a projection from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> SchemaResult<Self> {
        let text = loader::read_json_file(path.as_ref())?;
        Self::from_json_str(&text)
    }
}

impl From<&SchemaRegistry> for SchemaProjector {
    fn from(registry: &SchemaRegistry) -> Self {
        Self::new(registry)
    }
}

/// Copies `source` into the global namespace.
///
/// Maps are sized `slots` and grow when a label-local id reaches past
/// them, which happens once removed names have been re-added. A label id
/// that cannot be offset without overflow projects to `-1`.
fn project_entry(
    source: &LabelEntry,
    label_offset: LabelId,
    global_ids: &BTreeMap<&str, PropertyId>,
    slots: usize,
) -> LabelEntry {
    let mut entry = source.clone();
    entry.id = source.id.checked_add(label_offset).unwrap_or(INVALID_ID);
    entry.valid_properties.iter_mut().for_each(|bit| *bit = true);
    entry.mapping = vec![UNMAPPED_FORWARD; slots];
    entry.reverse_mapping = vec![UNMAPPED_REVERSE; slots];

    for prop in entry.props.iter_mut() {
        let Some(&global_id) = global_ids.get(prop.name.as_str()) else {
            continue;
        };
        if let Ok(local) = usize::try_from(prop.id) {
            if local >= entry.mapping.len() {
                entry.mapping.resize(local + 1, UNMAPPED_FORWARD);
            }
            entry.mapping[local] = global_id;
        }
        entry.reverse_mapping[global_id as usize] = prop.id;
        prop.id = global_id;
    }
    entry
}
