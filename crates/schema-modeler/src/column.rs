//! Column normalization.
//!
//! Merges a raw column, its decoded type, its uniqueness classification and
//! its foreign-key reference into one [`ColumnDescriptor`].

use serde::{Serialize, Serializer};

use crate::core::schema::{ForeignKeyFact, IndexFact, RawColumn, TableMetadata};
use crate::typemap::{ColumnKind, LanguageType, TypeDecoder, TypeDescriptor};

/// Uniqueness of a column, derived from non-primary unique indexes.
///
/// Serializes as `true` for a sole-member unique index, or as the index
/// name when the column shares a composite unique index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Uniqueness {
    /// Sole member of a unique index.
    Unique,
    /// Member of the named multi-column unique index.
    Composite(String),
}

impl Serialize for Uniqueness {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Uniqueness::Unique => serializer.serialize_bool(true),
            Uniqueness::Composite(name) => serializer.serialize_str(name),
        }
    }
}

/// Target of a single-column foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnReference {
    /// Referenced table name.
    pub table: String,
    /// Referenced column name.
    pub column: String,
}

/// Normalized description of one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDescriptor {
    /// Column name.
    pub name: String,

    /// Type string exactly as reported by the database.
    pub raw_type: String,

    /// Decoded kind and facets.
    #[serde(flatten)]
    pub data_type: TypeDescriptor,

    /// Language type hint.
    pub language_type: LanguageType,

    /// ORM type hint.
    pub orm_type: &'static str,

    pub nullable: bool,

    pub primary_key: bool,

    pub auto_increment: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique: Option<Uniqueness>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<ColumnReference>,
}

impl ColumnDescriptor {
    /// Normalized kind.
    pub fn kind(&self) -> ColumnKind {
        self.data_type.kind
    }

    /// Whether the column is independently unique (not merely part of a
    /// composite unique index).
    pub fn is_unique(&self) -> bool {
        matches!(self.unique, Some(Uniqueness::Unique))
    }
}

/// Classify a column's uniqueness from the table's indexes.
///
/// The primary key index is ignored. A sole-member unique index takes
/// precedence over composite ones; otherwise the first composite unique
/// index containing the column is reported.
pub fn uniqueness(column: &str, indexes: &[IndexFact]) -> Option<Uniqueness> {
    let mut candidates = indexes
        .iter()
        .filter(|idx| idx.unique && !idx.primary && idx.contains(column))
        .peekable();

    let first = candidates.peek().map(|idx| idx.name.clone());
    if candidates.any(|idx| idx.fields.len() == 1) {
        return Some(Uniqueness::Unique);
    }
    first.map(Uniqueness::Composite)
}

/// Find the foreign key reference for a column, if any.
pub fn resolve_reference(column: &str, foreign_keys: &[ForeignKeyFact]) -> Option<ColumnReference> {
    foreign_keys
        .iter()
        .find(|fk| fk.column_name == column)
        .map(|fk| ColumnReference {
            table: fk.referenced_table_name.clone(),
            column: fk.referenced_column_name.clone(),
        })
}

/// Merge a raw column with its externally computed facts.
pub fn normalize(
    raw: &RawColumn,
    data_type: TypeDescriptor,
    unique: Option<Uniqueness>,
    reference: Option<ColumnReference>,
) -> ColumnDescriptor {
    ColumnDescriptor {
        name: raw.name.clone(),
        raw_type: raw.data_type.clone(),
        language_type: data_type.language_type(),
        orm_type: data_type.orm_type(),
        data_type,
        nullable: raw.nullable,
        primary_key: raw.primary_key,
        auto_increment: raw.auto_increment,
        default_value: raw.default_value.clone(),
        comment: raw.comment.clone(),
        unique,
        reference,
    }
}

/// Normalize every column of a table, preserving database column order.
pub fn normalize_columns(meta: &TableMetadata, decoder: &TypeDecoder) -> Vec<ColumnDescriptor> {
    meta.columns
        .iter()
        .map(|raw| {
            normalize(
                raw,
                decoder.decode(&raw.data_type),
                uniqueness(&raw.name, &meta.indexes),
                resolve_reference(&raw.name, &meta.foreign_keys),
            )
        })
        .collect()
}
