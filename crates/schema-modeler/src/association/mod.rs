//! Association wiring across the whole schema graph.
//!
//! Every foreign key from table `S` to table `T` yields a `belongsTo` edge
//! on `S` and exactly one opposite edge:
//!
//! - `belongsToMany` on `T` towards the junction's other target, when `S` is
//!   a junction table
//! - `hasOne` on `T` when the foreign key column is independently unique
//! - `hasMany` on `T` otherwise
//!
//! Foreign keys pointing outside the mapped table set produce no edges.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::core::schema::ForeignKeyFact;
use crate::table::TableDescriptor;

/// Cardinality and ownership direction of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AssociationKind {
    BelongsTo,
    BelongsToMany,
    HasOne,
    HasMany,
}

/// Directed relationship between two tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Association {
    #[serde(rename = "associationType")]
    pub kind: AssociationKind,

    /// Table owning the edge.
    pub source: String,

    /// Related table.
    pub target: String,

    /// Column driving the relation.
    pub foreign_key: String,

    /// Referenced column on the target (`belongsTo` only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_key: Option<String>,

    /// Junction table (`belongsToMany` only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub through: Option<String>,

    /// The junction table's other foreign key column (`belongsToMany` only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_delete: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_update: Option<String>,
}

impl Association {
    fn edge(kind: AssociationKind, source: &str, target: &str, fk: &ForeignKeyFact) -> Self {
        Self {
            kind,
            source: source.to_string(),
            target: target.to_string(),
            foreign_key: fk.column_name.clone(),
            target_key: None,
            through: None,
            other_key: None,
            on_delete: fk.on_delete.clone(),
            on_update: fk.on_update.clone(),
        }
    }

    /// `source` holds `fk` pointing at its referenced table.
    pub fn belongs_to(source: &str, fk: &ForeignKeyFact) -> Self {
        let mut edge = Self::edge(AssociationKind::BelongsTo, source, &fk.referenced_table_name, fk);
        edge.target_key = Some(fk.referenced_column_name.clone());
        edge
    }

    /// `source` is referenced by exactly one row of `target` through `fk`.
    pub fn has_one(source: &str, target: &str, fk: &ForeignKeyFact) -> Self {
        Self::edge(AssociationKind::HasOne, source, target, fk)
    }

    /// `source` is referenced by many rows of `target` through `fk`.
    pub fn has_many(source: &str, target: &str, fk: &ForeignKeyFact) -> Self {
        Self::edge(AssociationKind::HasMany, source, target, fk)
    }

    /// `source` relates to `other.referenced_table_name` through `junction`.
    pub fn belongs_to_many(
        source: &str,
        junction: &str,
        fk: &ForeignKeyFact,
        other: &ForeignKeyFact,
    ) -> Self {
        let mut edge = Self::edge(
            AssociationKind::BelongsToMany,
            source,
            &other.referenced_table_name,
            fk,
        );
        edge.through = Some(junction.to_string());
        edge.other_key = Some(other.column_name.clone());
        edge
    }
}

/// Append association edges to every table in place.
///
/// Source tables are visited in name order and their foreign keys in
/// discovery order, so identical input always yields identical edge lists.
/// Returns the number of edges added.
pub fn build_associations(
    tables: &mut BTreeMap<String, TableDescriptor>,
    foreign_keys: &BTreeMap<String, Vec<ForeignKeyFact>>,
) -> usize {
    let mut edges: Vec<(String, Association)> = Vec::new();

    for (source, fks) in foreign_keys {
        let Some(source_table) = tables.get(source) else {
            continue;
        };

        for fk in fks {
            let target = &fk.referenced_table_name;
            if !tables.contains_key(target) {
                debug!(
                    "Skipping {}.{} -> {}: table not mapped",
                    source, fk.column_name, target
                );
                continue;
            }

            edges.push((source.clone(), Association::belongs_to(source, fk)));

            if source_table.is_junction_table {
                match fks.iter().find(|other| other.column_name != fk.column_name) {
                    Some(other) if tables.contains_key(&other.referenced_table_name) => {
                        edges.push((
                            target.clone(),
                            Association::belongs_to_many(target, source, fk, other),
                        ));
                    }
                    Some(other) => debug!(
                        "Skipping belongsToMany {} -> {} through {}: table not mapped",
                        target, other.referenced_table_name, source
                    ),
                    None => warn!(
                        "Junction table {} has no second foreign key besides {}",
                        source, fk.column_name
                    ),
                }
            } else {
                let unique = source_table
                    .column(&fk.column_name)
                    .is_some_and(|c| c.is_unique());
                let edge = if unique {
                    Association::has_one(target, source, fk)
                } else {
                    Association::has_many(target, source, fk)
                };
                edges.push((target.clone(), edge));
            }
        }
    }

    let added = edges.len();
    for (owner, edge) in edges {
        if let Some(table) = tables.get_mut(&owner) {
            table.associations.push(edge);
        }
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::normalize_columns;
    use crate::core::schema::{IndexFact, RawColumn, TableMetadata};
    use crate::typemap::TypeDecoder;

    struct Fixture {
        tables: BTreeMap<String, TableDescriptor>,
        fks: BTreeMap<String, Vec<ForeignKeyFact>>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                tables: BTreeMap::new(),
                fks: BTreeMap::new(),
            }
        }

        fn table(mut self, name: &str, meta: TableMetadata, junction: bool) -> Self {
            let columns = normalize_columns(&meta, &TypeDecoder::default());
            self.tables
                .insert(name.to_string(), TableDescriptor::new(name, columns, junction));
            self.fks.insert(name.to_string(), meta.foreign_keys);
            self
        }

        fn build(mut self) -> BTreeMap<String, TableDescriptor> {
            build_associations(&mut self.tables, &self.fks);
            self.tables
        }
    }

    fn id_table() -> TableMetadata {
        TableMetadata {
            columns: vec![RawColumn::new("id", "int").primary()],
            ..Default::default()
        }
    }

    fn child(fk_col: &str, target: &str, unique: bool) -> TableMetadata {
        TableMetadata {
            columns: vec![
                RawColumn::new("id", "int").primary(),
                RawColumn::new(fk_col, "int"),
            ],
            indexes: if unique {
                vec![IndexFact::new("uq_fk", true, &[fk_col])]
            } else {
                vec![]
            },
            foreign_keys: vec![ForeignKeyFact::new(fk_col, target, "id")],
        }
    }

    fn junction() -> TableMetadata {
        TableMetadata {
            columns: vec![
                RawColumn::new("user_id", "int").primary(),
                RawColumn::new("tag_id", "int").primary(),
            ],
            indexes: vec![],
            foreign_keys: vec![
                ForeignKeyFact::new("user_id", "users", "id"),
                ForeignKeyFact::new("tag_id", "tags", "id"),
            ],
        }
    }

    #[test]
    fn test_has_many() {
        let tables = Fixture::new()
            .table("users", id_table(), false)
            .table("posts", child("user_id", "users", false), false)
            .build();

        let posts = &tables["posts"].associations;
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].kind, AssociationKind::BelongsTo);
        assert_eq!(posts[0].source, "posts");
        assert_eq!(posts[0].target, "users");
        assert_eq!(posts[0].foreign_key, "user_id");
        assert_eq!(posts[0].target_key.as_deref(), Some("id"));

        let users = &tables["users"].associations;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].kind, AssociationKind::HasMany);
        assert_eq!(users[0].source, "users");
        assert_eq!(users[0].target, "posts");
        assert_eq!(users[0].foreign_key, "user_id");
    }

    #[test]
    fn test_has_one_for_unique_fk() {
        let tables = Fixture::new()
            .table("users", id_table(), false)
            .table("profiles", child("user_id", "users", true), false)
            .build();

        let users = &tables["users"].associations;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].kind, AssociationKind::HasOne);
        assert_eq!(users[0].target, "profiles");
    }

    #[test]
    fn test_composite_unique_fk_is_has_many() {
        let mut meta = child("user_id", "users", false);
        meta.columns.push(RawColumn::new("slot", "int"));
        meta.indexes = vec![IndexFact::new("uq_user_slot", true, &["user_id", "slot"])];

        let tables = Fixture::new()
            .table("users", id_table(), false)
            .table("slots", meta, false)
            .build();
        assert_eq!(tables["users"].associations[0].kind, AssociationKind::HasMany);
    }

    #[test]
    fn test_belongs_to_many_through_junction() {
        let tables = Fixture::new()
            .table("users", id_table(), false)
            .table("tags", id_table(), false)
            .table("user_tags", junction(), true)
            .build();

        let junction_edges = &tables["user_tags"].associations;
        assert_eq!(junction_edges.len(), 2);
        assert!(junction_edges
            .iter()
            .all(|a| a.kind == AssociationKind::BelongsTo));

        let users = &tables["users"].associations;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].kind, AssociationKind::BelongsToMany);
        assert_eq!(users[0].source, "users");
        assert_eq!(users[0].target, "tags");
        assert_eq!(users[0].through.as_deref(), Some("user_tags"));
        assert_eq!(users[0].foreign_key, "user_id");
        assert_eq!(users[0].other_key.as_deref(), Some("tag_id"));

        let tags = &tables["tags"].associations;
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].target, "users");
        assert_eq!(tags[0].foreign_key, "tag_id");
        assert_eq!(tags[0].other_key.as_deref(), Some("user_id"));
    }

    #[test]
    fn test_dangling_fk_emits_nothing() {
        let tables = Fixture::new()
            .table("posts", child("user_id", "users", false), false)
            .build();
        assert!(tables["posts"].associations.is_empty());
    }

    #[test]
    fn test_malformed_junction_keeps_belongs_to() {
        let meta = TableMetadata {
            columns: vec![RawColumn::new("user_id", "int").primary()],
            indexes: vec![],
            foreign_keys: vec![ForeignKeyFact::new("user_id", "users", "id")],
        };
        let tables = Fixture::new()
            .table("users", id_table(), false)
            .table("lonely", meta, true)
            .build();

        assert_eq!(tables["lonely"].associations.len(), 1);
        assert_eq!(tables["lonely"].associations[0].kind, AssociationKind::BelongsTo);
        assert!(tables["users"].associations.is_empty());
    }

    #[test]
    fn test_self_reference() {
        let tables = Fixture::new()
            .table("employees", child("manager_id", "employees", false), false)
            .build();
        let kinds: Vec<AssociationKind> = tables["employees"]
            .associations
            .iter()
            .map(|a| a.kind)
            .collect();
        assert_eq!(kinds, vec![AssociationKind::BelongsTo, AssociationKind::HasMany]);
    }

    #[test]
    fn test_edge_counts_are_symmetric() {
        let tables = Fixture::new()
            .table("users", id_table(), false)
            .table("tags", id_table(), false)
            .table("posts", child("user_id", "users", false), false)
            .table("profiles", child("user_id", "users", true), false)
            .table("user_tags", junction(), true)
            .build();

        let all: Vec<&Association> = tables.values().flat_map(|t| &t.associations).collect();
        let belongs_to = all.iter().filter(|a| a.kind == AssociationKind::BelongsTo).count();
        let opposite = all.len() - belongs_to;
        assert_eq!(belongs_to, 4);
        assert_eq!(opposite, 4);
    }

    #[test]
    fn test_referential_actions_are_carried() {
        let mut meta = child("user_id", "users", false);
        meta.foreign_keys[0].on_delete = Some("CASCADE".into());
        let tables = Fixture::new()
            .table("users", id_table(), false)
            .table("posts", meta, false)
            .build();
        assert_eq!(tables["users"].associations[0].on_delete.as_deref(), Some("CASCADE"));
        assert_eq!(tables["posts"].associations[0].on_delete.as_deref(), Some("CASCADE"));
    }

    #[test]
    fn test_serialized_association() {
        let fk = ForeignKeyFact::new("user_id", "users", "id");
        let json = serde_json::to_value(Association::has_many("users", "posts", &fk)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "associationType": "hasMany",
                "source": "users",
                "target": "posts",
                "foreignKey": "user_id"
            })
        );
    }
}
