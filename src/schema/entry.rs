//! Label entries: one vertex or edge label and its property definitions
//!
//! Properties live in an append-only arena with a parallel validity mask.
//! Removing a property clears its bit; the slot and its id are never
//! reused, so ids cached by consumers stay meaningful.
//!
//! Read lookups answer misses with sentinels (`-1`, `""`, the null type)
//! instead of errors.

use serde::Deserialize;
use serde_json::Value;

use super::codec::{self, TypeNameResolver};
use super::errors::{SchemaError, SchemaResult};
use super::types::{LabelKind, PropertyType};
use super::wire::{
    mask_from_wire, mask_to_wire, EntryJson, IndexJson, PropertyDefJson, RawEntry,
    RawPropertyDef, RelationJson,
};
use crate::observability::{log_event_with_fields, Event};

/// Property identifier within a label (or within the projected namespace).
pub type PropertyId = i32;

/// Label identifier within its collection.
pub type LabelId = i32;

/// Sentinel returned by id lookups that miss.
pub const INVALID_ID: i32 = -1;

static NULL_TYPE: PropertyType = PropertyType::Null;

/// A named, typed property of a label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDef {
    /// Stable id, assigned at creation
    pub id: PropertyId,
    /// Property name
    pub name: String,
    /// Property type
    pub property_type: PropertyType,
}

impl PropertyDef {
    /// Create a property definition
    pub fn new(id: PropertyId, name: impl Into<String>, property_type: PropertyType) -> Self {
        Self {
            id,
            name: name.into(),
            property_type,
        }
    }

    pub(crate) fn to_wire(&self) -> SchemaResult<PropertyDefJson<'_>> {
        Ok(PropertyDefJson {
            id: self.id,
            name: &self.name,
            data_type: codec::encode_checked(&self.property_type)?,
        })
    }

    pub(crate) fn from_wire(
        raw: RawPropertyDef,
        resolver: &dyn TypeNameResolver,
    ) -> SchemaResult<Self> {
        let id = raw
            .id
            .ok_or_else(|| SchemaError::missing_field("id", "property definition"))?;
        let name = raw
            .name
            .ok_or_else(|| SchemaError::missing_field("name", "property definition"))?;
        let data_type = raw
            .data_type
            .ok_or_else(|| SchemaError::missing_field("data_type", "property definition"))?;
        Ok(Self {
            id,
            name,
            property_type: codec::decode_with(&data_type, resolver)?,
        })
    }
}

/// Metadata of one vertex or edge label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEntry {
    /// Index within its collection (offset by the vertex count once projected)
    pub id: LabelId,
    /// Label name
    pub label: String,
    /// Vertex or edge
    pub kind: LabelKind,
    pub(crate) props: Vec<PropertyDef>,
    pub(crate) valid_properties: Vec<bool>,
    next_property_id: PropertyId,
    primary_keys: Vec<String>,
    relations: Vec<(String, String)>,
    pub(crate) mapping: Vec<PropertyId>,
    pub(crate) reverse_mapping: Vec<PropertyId>,
}

impl LabelEntry {
    /// Create an empty label entry
    pub fn new(id: LabelId, label: impl Into<String>, kind: LabelKind) -> Self {
        Self {
            id,
            label: label.into(),
            kind,
            props: Vec::new(),
            valid_properties: Vec::new(),
            next_property_id: 0,
            primary_keys: Vec::new(),
            relations: Vec::new(),
            mapping: Vec::new(),
            reverse_mapping: Vec::new(),
        }
    }

    /// Appends a property and returns its id.
    ///
    /// Names are not checked against removed properties: re-adding a removed
    /// name yields a second definition, only the newer one valid.
    pub fn add_property(&mut self, name: impl Into<String>, property_type: PropertyType) -> PropertyId {
        let id = self.next_property_id;
        self.next_property_id += 1;
        let def = PropertyDef::new(id, name, property_type);
        let id_text = id.to_string();
        log_event_with_fields(
            Event::PropertyAdded,
            &[
                ("label", self.label.as_str()),
                ("property", def.name.as_str()),
                ("id", id_text.as_str()),
            ],
        );
        self.props.push(def);
        self.valid_properties.push(true);
        id
    }

    /// Soft-deletes the first property (in id order) named `name`.
    ///
    /// Validity is not consulted when picking the match, so with a reused
    /// name this may hit an already removed slot and leave the live one.
    pub fn remove_property(&mut self, name: &str) {
        let first = self
            .props
            .iter()
            .filter(|prop| prop.name == name)
            .map(|prop| prop.id)
            .min();
        if let Some(id) = first {
            self.remove_property_by_id(id);
        }
    }

    /// Soft-deletes the property with the given id. Unknown ids are ignored.
    pub fn remove_property_by_id(&mut self, id: PropertyId) {
        if let Some(pos) = self.position_of(id) {
            self.valid_properties[pos] = false;
            let id_text = id.to_string();
            log_event_with_fields(
                Event::PropertyRemoved,
                &[("label", self.label.as_str()), ("id", id_text.as_str())],
            );
        }
    }

    /// Id of the valid property named `name`, or `-1`.
    pub fn property_id(&self, name: &str) -> PropertyId {
        self.properties()
            .find(|prop| prop.name == name)
            .map_or(INVALID_ID, |prop| prop.id)
    }

    /// Name of the valid property with id `id`, or `""`.
    pub fn property_name(&self, id: PropertyId) -> &str {
        self.properties()
            .find(|prop| prop.id == id)
            .map_or("", |prop| prop.name.as_str())
    }

    /// Type of the valid property with id `id`, or the null type.
    pub fn property_type(&self, id: PropertyId) -> &PropertyType {
        self.properties()
            .find(|prop| prop.id == id)
            .map_or(&NULL_TYPE, |prop| &prop.property_type)
    }

    /// Valid properties in creation order.
    pub fn properties(&self) -> impl Iterator<Item = &PropertyDef> + '_ {
        self.props
            .iter()
            .zip(self.valid_properties.iter())
            .filter(|(_, valid)| **valid)
            .map(|(prop, _)| prop)
    }

    /// Every property ever created, removed ones included.
    pub fn all_properties(&self) -> &[PropertyDef] {
        &self.props
    }

    /// Number of valid properties.
    pub fn property_count(&self) -> usize {
        self.valid_properties.iter().filter(|valid| **valid).count()
    }

    /// Whether the property with id `id` exists and is valid.
    pub fn is_property_valid(&self, id: PropertyId) -> bool {
        self.position_of(id)
            .map_or(false, |pos| self.valid_properties[pos])
    }

    /// Soft-delete mask aligned with `all_properties()`.
    pub fn valid_mask(&self) -> &[bool] {
        &self.valid_properties
    }

    /// Id the next added property will receive.
    pub fn next_property_id(&self) -> PropertyId {
        self.next_property_id
    }

    /// Appends a primary key name. Duplicates are kept.
    pub fn add_primary_key(&mut self, name: impl Into<String>) {
        self.primary_keys.push(name.into());
    }

    /// Appends several primary key names in order.
    pub fn add_primary_keys<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_keys.extend(names.into_iter().map(Into::into));
    }

    /// Primary key names in insertion order.
    pub fn primary_keys(&self) -> &[String] {
        &self.primary_keys
    }

    /// Appends a (source, destination) vertex label pair.
    pub fn add_relation(&mut self, src: impl Into<String>, dst: impl Into<String>) {
        self.relations.push((src.into(), dst.into()));
    }

    /// Relation pairs in insertion order.
    pub fn relations(&self) -> &[(String, String)] {
        &self.relations
    }

    /// Original property id -> projected id. Empty outside a projection.
    pub fn mapping(&self) -> &[PropertyId] {
        &self.mapping
    }

    /// Projected id -> original property id. Empty outside a projection.
    ///
    /// Unused slots hold `1`; use [`LabelEntry::original_property_id`]
    /// rather than indexing directly.
    pub fn reverse_mapping(&self) -> &[PropertyId] {
        &self.reverse_mapping
    }

    /// Original property id behind projected id `global_id`, or `-1`.
    ///
    /// A reverse slot counts only if the forward mapping points back at it.
    pub fn original_property_id(&self, global_id: PropertyId) -> PropertyId {
        let Ok(slot) = usize::try_from(global_id) else {
            return INVALID_ID;
        };
        let Some(&original) = self.reverse_mapping.get(slot) else {
            return INVALID_ID;
        };
        let points_back = usize::try_from(original)
            .ok()
            .and_then(|pos| self.mapping.get(pos))
            .map_or(false, |forward| *forward == global_id);
        if points_back {
            original
        } else {
            INVALID_ID
        }
    }

    /// Encodes this entry as a JSON value.
    pub fn to_json(&self) -> SchemaResult<Value> {
        serde_json::to_value(self.to_wire()?)
            .map_err(|e| SchemaError::Serialization(e.to_string()))
    }

    /// Decodes an entry from a JSON value.
    pub fn from_json(value: &Value, resolver: &dyn TypeNameResolver) -> SchemaResult<Self> {
        let raw = RawEntry::deserialize(value)?;
        Self::from_wire(raw, resolver)
    }

    fn position_of(&self, id: PropertyId) -> Option<usize> {
        self.props.iter().position(|prop| prop.id == id)
    }

    /// Wire record for this entry.
    ///
    /// Fails with `MalformedType` when a property type has no decodable
    /// encoding.
    pub(crate) fn to_wire(&self) -> SchemaResult<EntryJson<'_>> {
        let indexes = if self.primary_keys.is_empty() {
            Vec::new()
        } else {
            vec![IndexJson {
                property_names: &self.primary_keys,
            }]
        };
        let property_defs = self
            .props
            .iter()
            .map(PropertyDef::to_wire)
            .collect::<SchemaResult<Vec<_>>>()?;
        Ok(EntryJson {
            id: self.id,
            label: &self.label,
            kind: self.kind.as_str(),
            property_defs,
            indexes,
            relations: self
                .relations
                .iter()
                .map(|(src, dst)| RelationJson { src, dst })
                .collect(),
            mapping: &self.mapping,
            reverse_mapping: &self.reverse_mapping,
            valid_properties: mask_to_wire(&self.valid_properties),
        })
    }

    pub(crate) fn from_wire(raw: RawEntry, resolver: &dyn TypeNameResolver) -> SchemaResult<Self> {
        let id = raw
            .id
            .ok_or_else(|| SchemaError::missing_field("id", "label entry"))?;
        let label = raw
            .label
            .ok_or_else(|| SchemaError::missing_field("label", "label entry"))?;
        let kind_name = raw
            .kind
            .ok_or_else(|| SchemaError::missing_field("type", "label entry"))?;
        let kind = LabelKind::parse(&kind_name).ok_or_else(|| {
            SchemaError::Parse(format!("label '{}' has unknown type '{}'", label, kind_name))
        })?;
        let raw_props = raw
            .property_defs
            .ok_or_else(|| SchemaError::missing_field("propertyDefList", "label entry"))?;

        let props = raw_props
            .into_iter()
            .map(|prop| PropertyDef::from_wire(prop, resolver))
            .collect::<SchemaResult<Vec<_>>>()?;

        let valid_properties = match raw.valid_properties {
            Some(bits) if bits.len() != props.len() => {
                return Err(SchemaError::Parse(format!(
                    "label '{}' has {} validity bits for {} properties",
                    label,
                    bits.len(),
                    props.len()
                )));
            }
            Some(bits) => mask_from_wire(&bits),
            None => vec![true; props.len()],
        };

        // Only the first index carrying names is taken as the primary key.
        let primary_keys = raw
            .indexes
            .unwrap_or_default()
            .into_iter()
            .find_map(|index| index.property_names)
            .unwrap_or_default();

        let relations = raw
            .relations
            .unwrap_or_default()
            .into_iter()
            .filter_map(|rel| Some((rel.src?, rel.dst?)))
            .collect();

        let next_property_id = props
            .iter()
            .map(|prop| prop.id.saturating_add(1))
            .max()
            .unwrap_or(0)
            .max(props.len() as PropertyId);

        Ok(Self {
            id,
            label,
            kind,
            props,
            valid_properties,
            next_property_id,
            primary_keys,
            relations,
            mapping: raw.mapping.unwrap_or_default(),
            reverse_mapping: raw.reverse_mapping.unwrap_or_default(),
        })
    }
}
