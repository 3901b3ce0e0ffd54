//! Table catalog loaded from JSON definition files
//!
//! One file per table (`<name>.json`) in a catalog directory. A missing
//! directory is an empty catalog; unreadable or invalid files fail the load.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::errors::{SchemaError, SchemaResult};
use super::types::TableDef;

impl TableDef {
    /// Parses and validates a table definition from JSON text
    pub fn from_json_str(content: &str) -> SchemaResult<Self> {
        let table: TableDef = serde_json::from_str(content)
            .map_err(|e| SchemaError::malformed("<inline>", format!("Invalid JSON: {}", e)))?;
        table
            .validate_structure()
            .map_err(|e| SchemaError::malformed(table.name.clone(), e))?;
        Ok(table)
    }
}

/// In-memory registry of table definitions.
pub struct TableCatalog {
    /// Directory containing table definition files
    dir: PathBuf,
    /// Loaded definitions by table name
    tables: HashMap<String, TableDef>,
}

impl TableCatalog {
    /// Creates an empty catalog rooted at `dir`
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            tables: HashMap::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Loads every `.json` file in the catalog directory.
    pub fn load_all(&mut self) -> SchemaResult<()> {
        if !self.dir.exists() {
            return Ok(());
        }

        let entries = fs::read_dir(&self.dir).map_err(|e| {
            SchemaError::malformed(
                self.dir.display().to_string(),
                format!("Failed to read catalog directory: {}", e),
            )
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::malformed(
                    self.dir.display().to_string(),
                    format!("Failed to read directory entry: {}", e),
                )
            })?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                paths.push(path);
            }
        }
        // Deterministic load order
        paths.sort();

        for path in paths {
            self.load_file(&path)?;
        }
        Ok(())
    }

    fn load_file(&mut self, path: &Path) -> SchemaResult<()> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed(path.display().to_string(), format!("Failed to read file: {}", e))
        })?;

        let table: TableDef = serde_json::from_str(&content).map_err(|e| {
            SchemaError::malformed(path.display().to_string(), format!("Invalid JSON: {}", e))
        })?;

        self.register(table)
            .map_err(|e| SchemaError::malformed(path.display().to_string(), e.message()))
    }

    /// Registers a definition directly.
    pub fn register(&mut self, table: TableDef) -> SchemaResult<()> {
        table
            .validate_structure()
            .map_err(|e| SchemaError::malformed(table.name.clone(), e))?;

        if self.tables.contains_key(&table.name) {
            return Err(SchemaError::table_exists(&table.name));
        }
        self.tables.insert(table.name.clone(), table);
        Ok(())
    }

    /// Looks up a table definition
    pub fn get(&self, name: &str) -> SchemaResult<&TableDef> {
        self.tables
            .get(name)
            .ok_or_else(|| SchemaError::unknown_table(name))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
