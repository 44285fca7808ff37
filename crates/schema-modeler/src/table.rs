//! Mapped table descriptors and the schema map handed to code generation.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::association::Association;
use crate::column::ColumnDescriptor;
use crate::error::Result;

/// Normalized description of one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDescriptor {
    /// Table name.
    pub name: String,

    /// Columns in database order, serialized as a name-keyed object.
    #[serde(serialize_with = "columns_by_name")]
    pub columns: Vec<ColumnDescriptor>,

    /// Whether the table joins two others many-to-many.
    pub is_junction_table: bool,

    /// Relationship edges owned by this table, in discovery order.
    pub associations: Vec<Association>,
}

impl TableDescriptor {
    /// Table with columns and classification, before association wiring.
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDescriptor>, is_junction_table: bool) -> Self {
        Self {
            name: name.into(),
            columns,
            is_junction_table,
            associations: Vec::new(),
        }
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }
}

fn columns_by_name<S: Serializer>(
    columns: &[ColumnDescriptor],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(columns.len()))?;
    for column in columns {
        map.serialize_entry(&column.name, column)?;
    }
    map.end()
}

/// Complete, immutable result of a mapping run, ordered by table name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SchemaMap {
    tables: BTreeMap<String, TableDescriptor>,
}

impl SchemaMap {
    pub(crate) fn new(tables: BTreeMap<String, TableDescriptor>) -> Self {
        Self { tables }
    }

    pub fn get(&self, table: &str) -> Option<&TableDescriptor> {
        self.tables.get(table)
    }

    /// Tables in lexicographic name order.
    pub fn iter(&self) -> impl Iterator<Item = &TableDescriptor> {
        self.tables.values()
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Number of tables classified as junction tables.
    pub fn junction_count(&self) -> usize {
        self.iter().filter(|t| t.is_junction_table).count()
    }

    /// Total association edges across all tables.
    pub fn association_count(&self) -> usize {
        self.iter().map(|t| t.associations.len()).sum()
    }

    pub fn into_inner(self) -> BTreeMap<String, TableDescriptor> {
        self.tables
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
