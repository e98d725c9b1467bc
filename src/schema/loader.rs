//! Schema file access
//!
//! Registries and projections are persisted as a single JSON document per
//! file. Missing parent directories are created on write. Any filesystem
//! failure surfaces as `GS_IO_ERROR` carrying the path.

use std::fs;
use std::path::Path;

use super::errors::{SchemaError, SchemaResult};
use crate::observability::{log_event_with_fields, Event};

/// Reads a JSON document from `path`.
pub(crate) fn read_json_file(path: &Path) -> SchemaResult<String> {
    let content =
        fs::read_to_string(path).map_err(|e| SchemaError::io(path.display().to_string(), e))?;

    let path_text = path.display().to_string();
    let bytes = content.len().to_string();
    log_event_with_fields(
        Event::SchemaLoaded,
        &[("path", path_text.as_str()), ("bytes", bytes.as_str())],
    );
    Ok(content)
}

/// Writes a JSON document to `path`, replacing any existing file.
pub(crate) fn write_json_file(path: &Path, content: &str) -> SchemaResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .map_err(|e| SchemaError::io(parent.display().to_string(), e))?;
        }
    }

    fs::write(path, content).map_err(|e| SchemaError::io(path.display().to_string(), e))?;

    let path_text = path.display().to_string();
    let bytes = content.len().to_string();
    log_event_with_fields(
        Event::SchemaDumped,
        &[("path", path_text.as_str()), ("bytes", bytes.as_str())],
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("schema.json");

        write_json_file(&path, "{\"partitionNum\":1}").unwrap();
        assert_eq!(read_json_file(&path).unwrap(), "{\"partitionNum\":1}");
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("meta").join("graph").join("schema.json");

        write_json_file(&path, "{}").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("schema.json");

        write_json_file(&path, "{\"a\":1}").unwrap();
        write_json_file(&path, "{}").unwrap();
        assert_eq!(read_json_file(&path).unwrap(), "{}");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = read_json_file(&temp_dir.path().join("absent.json")).unwrap_err();

        assert_eq!(err.code().code(), "GS_IO_ERROR");
        assert!(err.is_fatal());
        assert!(err.to_string().contains("absent.json"));
    }
}
