//! Built-in junction rules as pure predicates over one table.

use crate::column::ColumnDescriptor;
use crate::core::schema::ForeignKeyFact;

fn primary_key(columns: &[ColumnDescriptor]) -> Vec<&str> {
    columns
        .iter()
        .filter(|c| c.primary_key)
        .map(|c| c.name.as_str())
        .collect()
}

/// Exactly two primary key columns, and exactly two foreign keys whose
/// columns are primary key columns.
pub fn composite_primary(columns: &[ColumnDescriptor], foreign_keys: &[ForeignKeyFact]) -> bool {
    let pk = primary_key(columns);
    if pk.len() != 2 {
        return false;
    }

    foreign_keys
        .iter()
        .filter(|fk| pk.contains(&fk.column_name.as_str()))
        .count()
        == 2
}

/// [`composite_primary`] on a table with no columns besides the key.
pub fn composite_primary_only(
    columns: &[ColumnDescriptor],
    foreign_keys: &[ForeignKeyFact],
) -> bool {
    columns.len() == 2 && composite_primary(columns, foreign_keys)
}

/// One primary key column, exactly two foreign keys on non-key columns, and
/// every other non-key column is a date/time column.
pub fn primary_and_timestamp_only(
    columns: &[ColumnDescriptor],
    foreign_keys: &[ForeignKeyFact],
) -> bool {
    let pk = primary_key(columns);
    if pk.len() != 1 {
        return false;
    }

    let fk_columns: Vec<&str> = foreign_keys
        .iter()
        .map(|fk| fk.column_name.as_str())
        .filter(|name| !pk.contains(name))
        .collect();
    if fk_columns.len() != 2 {
        return false;
    }

    columns
        .iter()
        .filter(|c| !c.primary_key)
        .all(|c| fk_columns.contains(&c.name.as_str()) || c.language_type.is_temporal())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::normalize_columns;
    use crate::core::schema::{RawColumn, TableMetadata};
    use crate::typemap::TypeDecoder;

    fn table(
        columns: Vec<RawColumn>,
        fks: &[(&str, &str)],
    ) -> (Vec<ColumnDescriptor>, Vec<ForeignKeyFact>) {
        let meta = TableMetadata {
            columns,
            indexes: vec![],
            foreign_keys: fks
                .iter()
                .map(|(col, target)| ForeignKeyFact::new(*col, *target, "id"))
                .collect(),
        };
        (normalize_columns(&meta, &TypeDecoder::default()), meta.foreign_keys)
    }

    #[test]
    fn test_composite_primary() {
        let (cols, fks) = table(
            vec![
                RawColumn::new("a_id", "int").primary(),
                RawColumn::new("b_id", "int").primary(),
                RawColumn::new("note", "text"),
            ],
            &[("a_id", "a"), ("b_id", "b")],
        );
        assert!(composite_primary(&cols, &fks));
        assert!(!composite_primary_only(&cols, &fks));
    }

    #[test]
    fn test_composite_primary_requires_fk_on_both_keys() {
        let (cols, fks) = table(
            vec![
                RawColumn::new("a_id", "int").primary(),
                RawColumn::new("seq", "int").primary(),
            ],
            &[("a_id", "a")],
        );
        assert!(!composite_primary(&cols, &fks));
        assert!(!composite_primary_only(&cols, &fks));
    }

    #[test]
    fn test_single_primary_is_not_composite() {
        let (cols, fks) = table(
            vec![
                RawColumn::new("id", "int").primary(),
                RawColumn::new("a_id", "int"),
            ],
            &[("a_id", "a")],
        );
        assert!(!composite_primary(&cols, &fks));
    }

    #[test]
    fn test_primary_and_timestamp_only() {
        let (cols, fks) = table(
            vec![
                RawColumn::new("id", "bigint").primary(),
                RawColumn::new("user_id", "int"),
                RawColumn::new("group_id", "int"),
                RawColumn::new("created_at", "datetime"),
                RawColumn::new("updated_at", "timestamp"),
            ],
            &[("user_id", "users"), ("group_id", "groups")],
        );
        assert!(primary_and_timestamp_only(&cols, &fks));
    }

    #[test]
    fn test_primary_and_timestamp_only_rejects_payload() {
        let (cols, fks) = table(
            vec![
                RawColumn::new("id", "bigint").primary(),
                RawColumn::new("user_id", "int"),
                RawColumn::new("group_id", "int"),
                RawColumn::new("role", "varchar(20)"),
            ],
            &[("user_id", "users"), ("group_id", "groups")],
        );
        assert!(!primary_and_timestamp_only(&cols, &fks));
    }

    #[test]
    fn test_primary_and_timestamp_only_needs_two_fks() {
        let (cols, fks) = table(
            vec![
                RawColumn::new("id", "bigint").primary(),
                RawColumn::new("user_id", "int"),
                RawColumn::new("created_at", "datetime"),
            ],
            &[("user_id", "users")],
        );
        assert!(!primary_and_timestamp_only(&cols, &fks));
    }
}
