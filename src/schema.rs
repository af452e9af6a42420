//! Schema model for completions.
//!
//! A schema is an ordered mapping from table name to an ordered list of
//! column descriptors. It is supplied by the caller and is read-only to the
//! widget; the caller may swap it out wholesale at any time.
//!
//! On disk a schema is a JSON object whose keys are table names and whose
//! values are arrays of `{ "name", "type", "fk" }` objects. Key order in the
//! file is the iteration order used for completions.

use crate::error::{QueryBoxError, Result};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::Path;

/// The set of known tables and their columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    /// Tables in declaration order.
    pub tables: Vec<Table>,
}

impl Schema {
    /// Creates a new empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a schema from a list of tables.
    pub fn with_tables(tables: Vec<Table>) -> Self {
        Self { tables }
    }

    /// Built-in schema used when no schema file is configured.
    pub fn demo() -> Self {
        Self::with_tables(vec![
            Table::new("reclamos").with_columns(vec![
                Column::new("id", "integer"),
                Column::new("estado", "text"),
                Column::new("descripcion", "text"),
                Column::new("prioridad", "text"),
                Column::new("fecha_alta", "timestamp"),
                Column::new("zona_id", "integer").references("zona"),
                Column::new("usuario_id", "integer").references("usuarios"),
                Column::new("categoria_id", "integer").references("categorias"),
            ]),
            Table::new("zona").with_columns(vec![
                Column::new("id", "integer"),
                Column::new("nombre", "text"),
                Column::new("municipio", "text"),
            ]),
            Table::new("usuarios").with_columns(vec![
                Column::new("id", "integer"),
                Column::new("nombre", "text"),
                Column::new("email", "text"),
                Column::new("rol", "text"),
                Column::new("zona_id", "integer").references("zona"),
            ]),
            Table::new("categorias").with_columns(vec![
                Column::new("id", "integer"),
                Column::new("nombre", "text"),
            ]),
        ])
    }

    /// Parses a schema from its JSON representation.
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| QueryBoxError::schema(e.to_string()))
    }

    /// Loads a schema from a JSON file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            QueryBoxError::schema(format!("Failed to read {}: {e}", path.display()))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            QueryBoxError::schema(format!("Invalid schema in {}:\n  {e}", path.display()))
        })
    }

    /// Looks a table up by name, ignoring case.
    pub fn table(&self, name: &str) -> Option<&Table> {
        let wanted = name.to_lowercase();
        self.tables.iter().find(|t| t.name.to_lowercase() == wanted)
    }

    /// Returns true if the schema has no tables.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Total number of columns across all tables.
    pub fn column_count(&self) -> usize {
        self.tables.iter().map(|t| t.columns.len()).sum()
    }

    /// Short human-readable summary, e.g. "4 tables, 18 columns".
    pub fn summary(&self) -> String {
        let tables = self.tables.len();
        let columns = self.column_count();
        format!(
            "{tables} {}, {columns} {}",
            if tables == 1 { "table" } else { "tables" },
            if columns == 1 { "column" } else { "columns" }
        )
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.tables.len()))?;
        for table in &self.tables {
            map.serialize_entry(&table.name, &table.columns)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(SchemaVisitor)
    }
}

/// Collects map entries in document order.
struct SchemaVisitor;

impl<'de> Visitor<'de> for SchemaVisitor {
    type Value = Schema;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of table names to column lists")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Schema, A::Error> {
        let mut tables: Vec<Table> = Vec::with_capacity(map.size_hint().unwrap_or(0));

        while let Some((name, columns)) = map.next_entry::<String, Vec<Column>>()? {
            let lower = name.to_lowercase();
            if tables.iter().any(|t| t.name.to_lowercase() == lower) {
                return Err(de::Error::custom(format!("duplicate table '{name}'")));
            }
            tables.push(Table { name, columns });
        }

        Ok(Schema { tables })
    }
}

/// A table and its columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Table name, in its original case.
    pub name: String,

    /// Columns in declaration order.
    pub columns: Vec<Column>,
}

impl Table {
    /// Creates a new table with the given name and no columns.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Sets the columns of the table.
    pub fn with_columns(self, columns: Vec<Column>) -> Self {
        Self { columns, ..self }
    }
}

/// A column descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name, in its original case.
    pub name: String,

    /// Data type (e.g., "integer", "text").
    #[serde(rename = "type", default)]
    pub data_type: String,

    /// Table this column references, if it is a foreign key.
    #[serde(
        rename = "fk",
        alias = "foreign_key",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub foreign_key: Option<String>,
}

impl Column {
    /// Creates a new column with the given name and data type.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            foreign_key: None,
        }
    }

    /// Marks the column as a foreign key to `table`.
    pub fn references(self, table: impl Into<String>) -> Self {
        Self {
            foreign_key: Some(table.into()),
            ..self
        }
    }
}
