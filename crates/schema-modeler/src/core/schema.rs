//! Raw schema metadata for tables, columns, indexes, and foreign keys.
//!
//! These types describe what an introspection backend reports, before any
//! type decoding or relationship inference has happened.

use serde::{Deserialize, Serialize};

/// Raw metadata for one table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableMetadata {
    /// Column definitions in database order.
    #[serde(default)]
    pub columns: Vec<RawColumn>,

    /// Indexes, including the primary key index.
    #[serde(default)]
    pub indexes: Vec<IndexFact>,

    /// Single-column foreign key constraints.
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeyFact>,
}

/// Column as reported by the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawColumn {
    /// Column name.
    pub name: String,

    /// Dialect type string, e.g. "decimal(10,2)" or "enum('a','b')".
    #[serde(rename = "type")]
    pub data_type: String,

    /// Whether the column allows NULL.
    #[serde(default = "default_true")]
    pub nullable: bool,

    /// Whether the column is part of the primary key.
    #[serde(default)]
    pub primary_key: bool,

    /// Default value, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,

    /// Whether the column is auto-incremented.
    #[serde(default)]
    pub auto_increment: bool,

    /// Column comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl RawColumn {
    /// Create a nullable, non-key column.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable: true,
            primary_key: false,
            default_value: None,
            auto_increment: false,
            comment: None,
        }
    }

    /// Mark the column as a (non-nullable) primary key column.
    pub fn primary(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    /// Mark the column as NOT NULL.
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }
}

/// Index metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexFact {
    /// Index name.
    pub name: String,

    /// Whether the index enforces uniqueness.
    #[serde(default)]
    pub unique: bool,

    /// Whether this is the primary key index.
    #[serde(default)]
    pub primary: bool,

    /// Indexed fields in key order.
    #[serde(default)]
    pub fields: Vec<IndexField>,
}

impl IndexFact {
    /// Build an index over the given column names.
    pub fn new(name: impl Into<String>, unique: bool, columns: &[&str]) -> Self {
        Self {
            name: name.into(),
            unique,
            primary: false,
            fields: columns.iter().map(|c| IndexField::new(*c)).collect(),
        }
    }

    /// Check whether the index covers a column.
    pub fn contains(&self, column: &str) -> bool {
        self.fields.iter().any(|f| f.attribute == column)
    }
}

/// One field of an index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexField {
    /// Column name.
    pub attribute: String,

    /// Prefix length for partial indexes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,

    /// Sort order ("ASC" / "DESC").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
}

impl IndexField {
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            length: None,
            order: None,
        }
    }
}

/// Single-column foreign key constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKeyFact {
    /// Source column name.
    pub column_name: String,

    /// Referenced table name.
    pub referenced_table_name: String,

    /// Referenced column name.
    pub referenced_column_name: String,

    /// Constraint name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint_name: Option<String>,

    /// ON DELETE action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_delete: Option<String>,

    /// ON UPDATE action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_update: Option<String>,
}

impl ForeignKeyFact {
    pub fn new(
        column_name: impl Into<String>,
        referenced_table_name: impl Into<String>,
        referenced_column_name: impl Into<String>,
    ) -> Self {
        Self {
            column_name: column_name.into(),
            referenced_table_name: referenced_table_name.into(),
            referenced_column_name: referenced_column_name.into(),
            constraint_name: None,
            on_delete: None,
            on_update: None,
        }
    }
}

fn default_true() -> bool {
    true
}
