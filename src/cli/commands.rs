//! CLI command implementations
//!
//! Every mutating command reads the schema file, applies one change and
//! rewrites the file. The CLI process is the single writer for the
//! duration of the command; concurrent invocations are not coordinated.

use std::path::Path;

use serde_json::{json, Value};

use crate::observability::Logger;
use crate::schema::{
    self, LabelEntry, LabelId, LabelKind, SchemaError, SchemaProjector, SchemaRegistry,
    INVALID_ID,
};

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run a command and write its JSON response to stdout
pub fn run_command(cmd: Command) -> CliResult<()> {
    match execute(cmd) {
        Ok(data) => write_response(data),
        Err(e) => {
            write_error(e.code_str(), e.message())?;
            Err(e)
        }
    }
}

/// Run a command and return its response data
pub fn execute(cmd: Command) -> CliResult<Value> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Inspect { config } => inspect(&config),
        Command::AddLabel { config, kind, name } => add_label(&config, kind.into(), &name),
        Command::AddProperty {
            config,
            kind,
            label,
            name,
            type_name,
        } => add_property(&config, kind.into(), &label, &name, &type_name),
        Command::RemoveProperty {
            config,
            kind,
            label,
            name,
        } => remove_property(&config, kind.into(), &label, &name),
        Command::RemoveLabel { config, kind, name } => remove_label(&config, kind.into(), &name),
        Command::AddPrimaryKey {
            config,
            kind,
            label,
            name,
        } => add_primary_key(&config, kind.into(), &label, &name),
        Command::AddRelation {
            config,
            label,
            src,
            dst,
        } => add_relation(&config, &label, &src, &dst),
        Command::Validate { config } => validate(&config),
        Command::Project { config } => project(&config),
        Command::Type { value } => type_of(&value),
    }
}

/// Write an empty schema with the configured partition count
///
/// Refuses to overwrite an existing schema file.
pub fn init(config_path: &Path) -> CliResult<Value> {
    let config = load_config(config_path)?;

    if config.schema_path().exists() {
        return Err(CliError::already_initialized(config.schema_path().display()));
    }

    let registry = SchemaRegistry::with_partitions(config.partition_count);
    save_registry(&config, &registry)?;

    Ok(json!({
        "initialized": true,
        "schema_path": config.schema_path,
        "partition_count": config.partition_count,
    }))
}

/// Describe the valid labels and their valid properties
pub fn inspect(config_path: &Path) -> CliResult<Value> {
    let config = load_config(config_path)?;
    let registry = open_registry(&config)?;

    Ok(json!({
        "partition_count": registry.partition_count(),
        "vertices": registry
            .valid_vertex_entries()
            .into_iter()
            .map(describe_entry)
            .collect::<Vec<_>>(),
        "edges": registry
            .valid_edge_entries()
            .into_iter()
            .map(describe_entry)
            .collect::<Vec<_>>(),
    }))
}

/// Declare a new label
pub fn add_label(config_path: &Path, kind: LabelKind, name: &str) -> CliResult<Value> {
    let config = load_config(config_path)?;
    let mut registry = open_registry(&config)?;

    if label_id(&registry, kind, name) != INVALID_ID {
        return Err(CliError::schema_error(format!(
            "{} label '{}' already exists",
            kind, name
        )));
    }

    let id = registry.create_entry(name, kind).id;
    save_registry(&config, &registry)?;

    Ok(json!({"kind": kind.as_str(), "label": name, "id": id}))
}

/// Declare a property on an existing label
pub fn add_property(
    config_path: &Path,
    kind: LabelKind,
    label: &str,
    name: &str,
    type_name: &str,
) -> CliResult<Value> {
    let config = load_config(config_path)?;
    let mut registry = open_registry(&config)?;
    let property_type = schema::decode(type_name)?;

    let entry = registry.entry_mut_by_name(label, kind)?;
    if entry.property_id(name) != INVALID_ID {
        return Err(CliError::schema_error(format!(
            "property '{}' already exists on {} label '{}'",
            name, kind, label
        )));
    }
    let canonical = schema::encode(&property_type);
    let id = entry.add_property(name, property_type);
    save_registry(&config, &registry)?;

    Ok(json!({"label": label, "name": name, "id": id, "type": canonical}))
}

/// Soft-delete a property by name
pub fn remove_property(
    config_path: &Path,
    kind: LabelKind,
    label: &str,
    name: &str,
) -> CliResult<Value> {
    let config = load_config(config_path)?;
    let mut registry = open_registry(&config)?;

    let entry = registry.entry_mut_by_name(label, kind)?;
    // Remove by id: a reused name leaves removed slots ahead of the live one.
    let id = entry.property_id(name);
    if id == INVALID_ID {
        return Err(CliError::schema_error(format!(
            "property '{}' not found on {} label '{}'",
            name, kind, label
        )));
    }
    entry.remove_property_by_id(id);
    let remaining = entry.property_count();
    save_registry(&config, &registry)?;

    Ok(json!({"label": label, "removed": name, "property_count": remaining}))
}

/// Soft-delete a label by name
pub fn remove_label(config_path: &Path, kind: LabelKind, name: &str) -> CliResult<Value> {
    let config = load_config(config_path)?;
    let mut registry = open_registry(&config)?;

    let id = label_id(&registry, kind, name);
    if id == INVALID_ID {
        return Err(SchemaError::not_found(kind, name).into());
    }
    match kind {
        LabelKind::Vertex => registry.invalidate_vertex(id),
        LabelKind::Edge => registry.invalidate_edge(id),
    }
    save_registry(&config, &registry)?;

    Ok(json!({"kind": kind.as_str(), "removed": name, "id": id}))
}

/// Append a primary-key property name
pub fn add_primary_key(
    config_path: &Path,
    kind: LabelKind,
    label: &str,
    name: &str,
) -> CliResult<Value> {
    let config = load_config(config_path)?;
    let mut registry = open_registry(&config)?;

    let entry = registry.entry_mut_by_name(label, kind)?;
    entry.add_primary_key(name);
    let primary_keys = entry.primary_keys().to_vec();
    save_registry(&config, &registry)?;

    Ok(json!({"label": label, "primary_keys": primary_keys}))
}

/// Append a (source, destination) pair to an edge label
///
/// Both endpoints must name valid vertex labels.
pub fn add_relation(config_path: &Path, label: &str, src: &str, dst: &str) -> CliResult<Value> {
    let config = load_config(config_path)?;
    let mut registry = open_registry(&config)?;

    for endpoint in [src, dst] {
        if registry.vertex_label_id(endpoint) == INVALID_ID {
            return Err(SchemaError::not_found(LabelKind::Vertex, endpoint).into());
        }
    }

    let entry = registry.entry_mut_by_name(label, LabelKind::Edge)?;
    entry.add_relation(src, dst);
    let relation_count = entry.relations().len();
    save_registry(&config, &registry)?;

    Ok(json!({"label": label, "src": src, "dst": dst, "relation_count": relation_count}))
}

/// Validate the schema and list its live properties sorted by name
pub fn validate(config_path: &Path) -> CliResult<Value> {
    let config = load_config(config_path)?;
    let registry = open_registry(&config)?;

    registry.validate().map_err(CliError::schema_error)?;

    let properties: Vec<Value> = registry
        .sorted_valid_properties()
        .into_iter()
        .map(|prop| json!({"name": prop.name, "type": schema::encode(&prop.property_type)}))
        .collect();

    Ok(json!({"valid": true, "properties": properties}))
}

/// Build the global property-id projection and write it out
pub fn project(config_path: &Path) -> CliResult<Value> {
    let config = load_config(config_path)?;
    let registry = open_registry(&config)?;

    let projector = SchemaProjector::new(&registry);
    let projection_path = config.projection_path();
    projector.dump_to_file(&projection_path)?;

    Ok(json!({
        "projection_path": projection_path.display().to_string(),
        "labels": projector.entries().len(),
        "unique_property_names": projector.unique_property_names(),
    }))
}

/// Decode a type string and report its canonical encoding
pub fn type_of(value: &str) -> CliResult<Value> {
    let property_type = schema::decode(value)?;

    Ok(json!({
        "input": value,
        "canonical": schema::encode(&property_type),
        "kind": property_type.type_name(),
    }))
}

fn load_config(config_path: &Path) -> CliResult<Config> {
    let config = Config::load(config_path)?;
    Logger::set_min_severity(config.severity()?);
    Ok(config)
}

fn open_registry(config: &Config) -> CliResult<SchemaRegistry> {
    let path = config.schema_path();
    if !path.exists() {
        return Err(CliError::not_initialized(path.display()));
    }
    Ok(SchemaRegistry::load_from_file(path)?)
}

fn save_registry(config: &Config, registry: &SchemaRegistry) -> CliResult<()> {
    if config.pretty {
        registry.dump_to_file_pretty(config.schema_path())?;
    } else {
        registry.dump_to_file(config.schema_path())?;
    }
    Ok(())
}

fn label_id(registry: &SchemaRegistry, kind: LabelKind, name: &str) -> LabelId {
    match kind {
        LabelKind::Vertex => registry.vertex_label_id(name),
        LabelKind::Edge => registry.edge_label_id(name),
    }
}

fn describe_entry(entry: &LabelEntry) -> Value {
    let properties: Vec<Value> = entry
        .properties()
        .map(|prop| {
            json!({
                "id": prop.id,
                "name": prop.name,
                "type": schema::encode(&prop.property_type),
            })
        })
        .collect();
    let relations: Vec<Value> = entry
        .relations()
        .iter()
        .map(|(src, dst)| json!({"src": src, "dst": dst}))
        .collect();

    json!({
        "id": entry.id,
        "label": entry.label,
        "properties": properties,
        "primary_keys": entry.primary_keys(),
        "relations": relations,
    })
}

#[cfg(test)]
mod tests {
    use super::super::errors::CliErrorCode;
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn create_config(temp_dir: &TempDir) -> PathBuf {
        let config_path = temp_dir.path().join("graph-schema.json");
        let schema_path = temp_dir.path().join("schema.json");

        let config = json!({
            "schema_path": schema_path.to_string_lossy(),
            "partition_count": 4,
            "log_level": "error"
        });

        fs::write(&config_path, config.to_string()).unwrap();
        config_path
    }

    fn initialized(temp_dir: &TempDir) -> PathBuf {
        let config_path = create_config(temp_dir);
        init(&config_path).unwrap();
        config_path
    }

    #[test]
    fn test_init_writes_empty_schema() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = initialized(&temp_dir);

        let text = fs::read_to_string(temp_dir.path().join("schema.json")).unwrap();
        assert_eq!(
            text,
            r#"{"partitionNum":4,"types":[],"valid_vertices":[],"valid_edges":[]}"#
        );

        let result = init(&config_path);
        assert_eq!(
            result.unwrap_err().code(),
            &CliErrorCode::AlreadyInitialized
        );
    }

    #[test]
    fn test_commands_require_init() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir);

        let result = inspect(&config_path);
        assert_eq!(result.unwrap_err().code(), &CliErrorCode::NotInitialized);
    }

    #[test]
    fn test_label_and_property_lifecycle() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = initialized(&temp_dir);

        add_label(&config_path, LabelKind::Vertex, "person").unwrap();
        let added = add_property(&config_path, LabelKind::Vertex, "person", "id", "int").unwrap();
        assert_eq!(added["id"], 0);
        assert_eq!(added["type"], "INT");
        add_property(&config_path, LabelKind::Vertex, "person", "name", "string").unwrap();

        let removed =
            remove_property(&config_path, LabelKind::Vertex, "person", "id").unwrap();
        assert_eq!(removed["property_count"], 1);

        let view = inspect(&config_path).unwrap();
        assert_eq!(view["partition_count"], 4);
        assert_eq!(view["vertices"][0]["label"], "person");
        assert_eq!(
            view["vertices"][0]["properties"],
            json!([{"id": 1, "name": "name", "type": "STRING"}])
        );
    }

    #[test]
    fn test_remove_property_after_name_reuse() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = initialized(&temp_dir);

        add_label(&config_path, LabelKind::Vertex, "person").unwrap();
        add_property(&config_path, LabelKind::Vertex, "person", "age", "INT").unwrap();
        remove_property(&config_path, LabelKind::Vertex, "person", "age").unwrap();
        let readded =
            add_property(&config_path, LabelKind::Vertex, "person", "age", "LONG").unwrap();
        assert_eq!(readded["id"], 1);

        let removed =
            remove_property(&config_path, LabelKind::Vertex, "person", "age").unwrap();
        assert_eq!(removed["property_count"], 0);

        let view = inspect(&config_path).unwrap();
        assert_eq!(view["vertices"][0]["properties"], json!([]));
        let err =
            remove_property(&config_path, LabelKind::Vertex, "person", "age").unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::SchemaError);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = initialized(&temp_dir);

        add_label(&config_path, LabelKind::Vertex, "person").unwrap();
        let err = add_label(&config_path, LabelKind::Vertex, "person").unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::SchemaError);

        add_property(&config_path, LabelKind::Vertex, "person", "id", "LONG").unwrap();
        let err =
            add_property(&config_path, LabelKind::Vertex, "person", "id", "INT").unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::SchemaError);
    }

    #[test]
    fn test_unknown_label_and_type() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = initialized(&temp_dir);

        let err =
            add_property(&config_path, LabelKind::Edge, "knows", "w", "DOUBLE").unwrap_err();
        assert!(err.message().starts_with("GS_LABEL_NOT_FOUND"));

        add_label(&config_path, LabelKind::Edge, "knows").unwrap();
        let err =
            add_property(&config_path, LabelKind::Edge, "knows", "w", "DECIMAL").unwrap_err();
        assert!(err.message().starts_with("GS_MALFORMED_TYPE"));
    }

    #[test]
    fn test_relation_requires_vertex_endpoints() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = initialized(&temp_dir);

        add_label(&config_path, LabelKind::Vertex, "person").unwrap();
        add_label(&config_path, LabelKind::Edge, "knows").unwrap();

        let err = add_relation(&config_path, "knows", "person", "company").unwrap_err();
        assert!(err.message().contains("company"));

        let ok = add_relation(&config_path, "knows", "person", "person").unwrap();
        assert_eq!(ok["relation_count"], 1);
    }

    #[test]
    fn test_remove_label_hides_it() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = initialized(&temp_dir);

        add_label(&config_path, LabelKind::Vertex, "person").unwrap();
        add_label(&config_path, LabelKind::Vertex, "software").unwrap();
        let removed = remove_label(&config_path, LabelKind::Vertex, "person").unwrap();
        assert_eq!(removed["id"], 0);

        let view = inspect(&config_path).unwrap();
        assert_eq!(view["vertices"].as_array().unwrap().len(), 1);
        assert_eq!(view["vertices"][0]["id"], 1);

        let err = remove_label(&config_path, LabelKind::Vertex, "person").unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::SchemaError);
    }

    #[test]
    fn test_validate_and_project() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = initialized(&temp_dir);

        add_label(&config_path, LabelKind::Vertex, "person").unwrap();
        add_property(&config_path, LabelKind::Vertex, "person", "name", "STRING").unwrap();
        add_property(&config_path, LabelKind::Vertex, "person", "age", "INT").unwrap();
        add_primary_key(&config_path, LabelKind::Vertex, "person", "name").unwrap();

        let report = validate(&config_path).unwrap();
        assert_eq!(report["valid"], true);
        assert_eq!(report["properties"][0]["name"], "age");
        assert_eq!(report["properties"][1]["name"], "name");

        let summary = project(&config_path).unwrap();
        assert_eq!(summary["unique_property_names"], json!(["age", "name"]));
        let projection_path = temp_dir.path().join("schema.json.projected.json");
        assert!(projection_path.exists());

        let projector = SchemaProjector::load_from_file(&projection_path).unwrap();
        assert_eq!(projector.property_id("age"), 1);
        assert_eq!(projector.property_id("name"), 2);
    }

    #[test]
    fn test_pretty_schema_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("graph-schema.json");
        // Missing parent directories are created on first write.
        let schema_path = temp_dir.path().join("catalog").join("schema.json");
        let config = json!({"schema_path": schema_path.to_string_lossy(), "pretty": true});
        fs::write(&config_path, config.to_string()).unwrap();

        init(&config_path).unwrap();
        add_label(&config_path, LabelKind::Vertex, "person").unwrap();

        let text = fs::read_to_string(&schema_path).unwrap();
        assert!(text.contains('\n'));
        let registry = SchemaRegistry::from_json_str(&text).unwrap();
        assert_eq!(registry.vertex_labels(), vec!["person"]);
    }

    #[test]
    fn test_type_of() {
        let result = type_of("timestamp[ms][UTC]").unwrap();
        assert_eq!(result["canonical"], "TIMESTAMP[MS][UTC]");
        assert_eq!(result["kind"], "timestamp");

        let err = type_of("DECIMAL").unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::SchemaError);
    }
}
