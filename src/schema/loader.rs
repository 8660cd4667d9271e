//! Schema loader for named schemas kept on disk
//!
//! - One JSON file per schema in a schema directory
//! - Each file holds `{"name": ..., "description"?: ..., "columns": {...}}`
//! - A name can be registered once; later registrations are rejected
//! - A malformed file fails the whole load

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::{LoaderError, LoaderResult};
use super::types::Schema;

/// A schema together with the name it is registered under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDocument {
    /// Registry key
    pub name: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Column declarations
    pub columns: Schema,
}

impl SchemaDocument {
    pub fn new(name: impl Into<String>, columns: Schema) -> Self {
        Self {
            name: name.into(),
            description: None,
            columns,
        }
    }
}

/// Schema loader that reads schema files from disk and maintains an
/// in-memory registry keyed by name.
pub struct SchemaLoader {
    /// Directory containing schema files
    schema_dir: PathBuf,
    /// Loaded schemas indexed by name
    schemas: BTreeMap<String, SchemaDocument>,
}

impl SchemaLoader {
    /// Creates a loader over `schema_dir`. Nothing is read until `load_all`.
    pub fn new(schema_dir: &Path) -> Self {
        Self {
            schema_dir: schema_dir.to_path_buf(),
            schemas: BTreeMap::new(),
        }
    }

    /// Returns the schema directory path.
    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Loads every `*.json` file in the schema directory.
    ///
    /// A missing directory is treated as empty.
    pub fn load_all(&mut self) -> LoaderResult<()> {
        if !self.schema_dir.exists() {
            return Ok(());
        }

        let dir = self.schema_dir.display().to_string();
        let entries = fs::read_dir(&self.schema_dir).map_err(|e| {
            LoaderError::malformed(&dir, format!("Failed to read schema directory: {}", e))
        })?;

        // Sorted so duplicate-name errors name the same file every run
        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                LoaderError::malformed(&dir, format!("Failed to read directory entry: {}", e))
            })?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in paths {
            self.load_schema_file(&path)?;
        }

        Ok(())
    }

    /// Loads a single schema file.
    fn load_schema_file(&mut self, path: &Path) -> LoaderResult<()> {
        let display = path.display().to_string();

        let content = fs::read_to_string(path)
            .map_err(|e| LoaderError::malformed(&display, format!("Failed to read file: {}", e)))?;

        let document: SchemaDocument = serde_json::from_str(&content)
            .map_err(|e| LoaderError::malformed(&display, format!("Invalid JSON: {}", e)))?;

        if document.name.trim().is_empty() {
            return Err(LoaderError::malformed(&display, "Schema name must not be empty"));
        }

        self.register(document)
    }

    /// Registers a schema directly.
    pub fn register(&mut self, document: SchemaDocument) -> LoaderResult<()> {
        if self.schemas.contains_key(&document.name) {
            return Err(LoaderError::SchemaImmutable(document.name));
        }

        self.schemas.insert(document.name.clone(), document);
        Ok(())
    }

    /// Gets a schema by name.
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name).map(|doc| &doc.columns)
    }

    /// Gets a schema by name, failing if it is not registered.
    pub fn require(&self, name: &str) -> LoaderResult<&Schema> {
        self.get(name)
            .ok_or_else(|| LoaderError::UnknownSchema(name.to_string()))
    }

    /// Checks if a schema exists.
    pub fn exists(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    /// Returns the number of loaded schemas.
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }

    /// Saves a schema document into the schema directory as `<name>.json`.
    ///
    /// The name must be a plain file stem: no path separators, no `..`.
    pub fn save_schema(&self, document: &SchemaDocument) -> LoaderResult<PathBuf> {
        let name = document.name.as_str();
        if name.trim().is_empty() || name.contains(['/', '\\']) || name.contains("..") {
            return Err(LoaderError::malformed(
                self.schema_dir.display().to_string(),
                format!("Invalid schema name '{}'", name),
            ));
        }

        let path = self.schema_dir.join(format!("{}.json", name));
        let display = path.display().to_string();

        if path.exists() {
            return Err(LoaderError::SchemaImmutable(document.name.clone()));
        }

        fs::create_dir_all(&self.schema_dir).map_err(|e| {
            LoaderError::malformed(
                self.schema_dir.display().to_string(),
                format!("Failed to create schema directory: {}", e),
            )
        })?;

        let content = serde_json::to_string_pretty(document).map_err(|e| {
            LoaderError::malformed(&display, format!("Failed to serialize schema: {}", e))
        })?;

        fs::write(&path, content)
            .map_err(|e| LoaderError::malformed(&display, format!("Failed to write file: {}", e)))?;

        Ok(path)
    }
}
