//! Introspection collaborators implementing [`SchemaSource`].
//!
//! - [`SnapshotSource`]: metadata captured ahead of time (YAML or JSON file, or built in memory)
//! - `MysqlSource`: live MySQL/MariaDB introspection (feature `mysql`)

#[cfg(feature = "mysql")]
mod mysql;

#[cfg(feature = "mysql")]
pub use mysql::MysqlSource;

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use crate::core::schema::{ForeignKeyFact, IndexFact, IndexField, RawColumn, TableMetadata};
use crate::core::traits::SchemaSource;
use crate::error::{ModelerError, Result};

/// Schema metadata held in memory.
///
/// The file format is a mapping from table name to `{columns, indexes, foreign_keys}`:
///
/// ```yaml
/// users:
///   columns:
///     - { name: id, type: "int(11) unsigned", primary_key: true }
///     - { name: email, type: "varchar(255)", nullable: false }
///   indexes:
///     - { name: uq_email, unique: true, fields: [{ attribute: email }] }
/// ```
#[derive(Debug, Clone, Default)]
pub struct SnapshotSource {
    tables: BTreeMap<String, TableMetadata>,
}

impl SnapshotSource {
    /// Build from already-collected metadata.
    pub fn from_tables<I, S>(tables: I) -> Self
    where
        I: IntoIterator<Item = (S, TableMetadata)>,
        S: Into<String>,
    {
        Self {
            tables: tables.into_iter().map(|(name, meta)| (name.into(), meta)).collect(),
        }
    }

    /// Load a snapshot file, JSON for `.json` and YAML otherwise.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let source = if is_json {
            Self::from_json(&content)?
        } else {
            Self::from_yaml(&content)?
        };
        debug!("Loaded snapshot {:?} with {} tables", path, source.tables.len());
        Ok(source)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let tables: BTreeMap<String, TableMetadata> = serde_yaml::from_str(yaml)?;
        Ok(Self { tables })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let tables: BTreeMap<String, TableMetadata> = serde_json::from_str(json)?;
        Ok(Self { tables })
    }

    fn table(&self, table: &str) -> Result<&TableMetadata> {
        self.tables
            .get(table)
            .ok_or_else(|| ModelerError::table_metadata(table, "table not found in snapshot"))
    }
}

#[async_trait]
impl SchemaSource for SnapshotSource {
    async fn list_tables(&self) -> Result<Vec<String>> {
        Ok(self.tables.keys().cloned().collect())
    }

    async fn load_table_metadata(&self, table: &str) -> Result<TableMetadata> {
        self.table(table).cloned()
    }

    async fn load_columns(&self, table: &str) -> Result<Vec<RawColumn>> {
        Ok(self.table(table)?.columns.clone())
    }

    async fn load_indexes(&self, table: &str) -> Result<Vec<IndexFact>> {
        Ok(self.table(table)?.indexes.clone())
    }

    async fn load_foreign_keys(&self, table: &str) -> Result<Vec<ForeignKeyFact>> {
        Ok(self.table(table)?.foreign_keys.clone())
    }

    fn db_type(&self) -> &str {
        "snapshot"
    }
}

/// Fold per-column index rows into indexes.
///
/// Rows are `(index name, unique, field)` in key order; fields of one index
/// stay in row order and indexes keep first-seen order. `PRIMARY` is the
/// primary key index.
#[cfg_attr(not(feature = "mysql"), allow(dead_code))]
pub(crate) fn group_index_rows(rows: Vec<(String, bool, IndexField)>) -> Vec<IndexFact> {
    let mut indexes: Vec<IndexFact> = Vec::new();
    for (name, unique, field) in rows {
        match indexes.iter_mut().find(|index| index.name == name) {
            Some(index) => index.fields.push(field),
            None => indexes.push(IndexFact {
                primary: name == "PRIMARY",
                unique,
                name,
                fields: vec![field],
            }),
        }
    }
    indexes
}

/// Keep only foreign key constraints spanning a single column.
///
/// Rows are `(constraint name, column mapping)`; a constraint reported on
/// more than one row is a composite key and is dropped.
#[cfg_attr(not(feature = "mysql"), allow(dead_code))]
pub(crate) fn single_column_fks(
    table: &str,
    rows: Vec<(String, ForeignKeyFact)>,
) -> Vec<ForeignKeyFact> {
    let mut groups: Vec<(String, Vec<ForeignKeyFact>)> = Vec::new();
    for (constraint, fk) in rows {
        match groups.iter_mut().find(|(name, _)| *name == constraint) {
            Some((_, fks)) => fks.push(fk),
            None => groups.push((constraint, vec![fk])),
        }
    }

    let mut foreign_keys = Vec::with_capacity(groups.len());
    for (constraint, mut fks) in groups {
        if fks.len() == 1 {
            foreign_keys.extend(fks.pop());
        } else {
            debug!(
                "{}: skipping multi-column foreign key {} ({} columns)",
                table,
                constraint,
                fks.len()
            );
        }
    }
    foreign_keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const YAML: &str = r#"
users:
  columns:
    - { name: id, type: "int(11) unsigned", primary_key: true, nullable: false }
    - { name: email, type: "varchar(255)", nullable: false }
  indexes:
    - name: uq_email
      unique: true
      fields: [{ attribute: email }]
posts:
  columns:
    - { name: id, type: int, primary_key: true }
    - { name: user_id, type: int }
  foreign_keys:
    - column_name: user_id
      referenced_table_name: users
      referenced_column_name: id
      on_delete: CASCADE
"#;

    #[tokio::test]
    async fn test_yaml_snapshot() {
        let source = SnapshotSource::from_yaml(YAML).unwrap();
        assert_eq!(source.db_type(), "snapshot");
        assert_eq!(source.list_tables().await.unwrap(), vec!["posts", "users"]);

        let users = source.load_table_metadata("users").await.unwrap();
        assert_eq!(users.columns.len(), 2);
        assert_eq!(users.columns[0].data_type, "int(11) unsigned");
        assert!(users.columns[0].primary_key);
        assert!(!users.columns[1].nullable);
        assert_eq!(users.indexes[0].fields[0].attribute, "email");

        let fks = source.load_foreign_keys("posts").await.unwrap();
        assert_eq!(fks[0].on_delete.as_deref(), Some("CASCADE"));
    }

    #[tokio::test]
    async fn test_unknown_table_is_metadata_error() {
        let source = SnapshotSource::from_yaml(YAML).unwrap();
        let err = source.load_columns("comments").await.unwrap_err();
        assert!(matches!(err, ModelerError::TableMetadata { ref table, .. } if table == "comments"));
    }

    #[tokio::test]
    async fn test_load_json_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"tags": {{"columns": [{{"name": "id", "type": "int", "primary_key": true}}]}}}}"#
        )
        .unwrap();

        let source = SnapshotSource::load(file.path()).unwrap();
        assert_eq!(source.list_tables().await.unwrap(), vec!["tags"]);
        assert!(source.load_indexes("tags").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_from_tables() {
        let source = SnapshotSource::from_tables([("b", TableMetadata::default()), ("a", TableMetadata::default())]);
        assert_eq!(source.list_tables().await.unwrap(), vec!["a", "b"]);
    }

    fn field(column: &str) -> IndexField {
        IndexField::new(column)
    }

    #[test]
    fn test_group_index_rows() {
        let rows = vec![
            ("PRIMARY".to_string(), true, field("id")),
            ("idx_tenant_handle".to_string(), true, field("tenant_id")),
            ("idx_tenant_handle".to_string(), true, field("handle")),
            ("idx_created".to_string(), false, field("created_at")),
        ];
        let indexes = group_index_rows(rows);

        assert_eq!(indexes.len(), 3);
        assert_eq!(indexes[0].name, "PRIMARY");
        assert!(indexes[0].primary && indexes[0].unique);

        assert_eq!(indexes[1].name, "idx_tenant_handle");
        assert!(!indexes[1].primary);
        let fields: Vec<&str> = indexes[1].fields.iter().map(|f| f.attribute.as_str()).collect();
        assert_eq!(fields, vec!["tenant_id", "handle"]);

        assert!(!indexes[2].unique);
        assert_eq!(indexes[2].fields.len(), 1);
    }

    #[test]
    fn test_single_column_fks_drops_composite_constraints() {
        let rows = vec![
            ("fk_user".to_string(), ForeignKeyFact::new("user_id", "users", "id")),
            ("fk_line".to_string(), ForeignKeyFact::new("order_id", "order_lines", "order_id")),
            ("fk_line".to_string(), ForeignKeyFact::new("line_no", "order_lines", "line_no")),
            ("fk_tag".to_string(), ForeignKeyFact::new("tag_id", "tags", "id")),
        ];
        let fks = single_column_fks("order_notes", rows);

        let columns: Vec<&str> = fks.iter().map(|fk| fk.column_name.as_str()).collect();
        assert_eq!(columns, vec!["user_id", "tag_id"]);
    }

    #[test]
    fn test_single_column_fks_empty() {
        assert!(single_column_fks("t", Vec::new()).is_empty());
    }

    #[test]
    fn test_malformed_yaml_is_error() {
        assert!(SnapshotSource::from_yaml("users: [not, a, table").is_err());
    }
}
