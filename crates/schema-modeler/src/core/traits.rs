//! Core traits at the seams of the mapping pipeline.
//!
//! - [`SchemaSource`]: supplies raw metadata per table (the introspection collaborator)
//! - [`JunctionPredicate`]: externally supplied junction-table rule

use async_trait::async_trait;

use crate::column::ColumnDescriptor;
use crate::error::Result;

use super::schema::{ForeignKeyFact, IndexFact, RawColumn, TableMetadata};

/// Read schema metadata from a database or a captured snapshot.
///
/// Implementations must be safe to call concurrently for different tables;
/// the mapper fans out one metadata load per table.
#[async_trait]
pub trait SchemaSource: Send + Sync {
    /// List every table name the source knows about.
    async fn list_tables(&self) -> Result<Vec<String>>;

    /// Load full metadata for a table.
    ///
    /// Template method over the individual loaders; a failure in any of them
    /// fails the table.
    async fn load_table_metadata(&self, table: &str) -> Result<TableMetadata> {
        let columns = self.load_columns(table).await?;
        let indexes = self.load_indexes(table).await?;
        let foreign_keys = self.load_foreign_keys(table).await?;
        Ok(TableMetadata {
            columns,
            indexes,
            foreign_keys,
        })
    }

    /// Load column definitions in database order.
    async fn load_columns(&self, table: &str) -> Result<Vec<RawColumn>>;

    /// Load index metadata, including the primary key index.
    async fn load_indexes(&self, table: &str) -> Result<Vec<IndexFact>>;

    /// Load single-column foreign keys.
    async fn load_foreign_keys(&self, table: &str) -> Result<Vec<ForeignKeyFact>>;

    /// Backend identifier (e.g. "snapshot", "mysql").
    fn db_type(&self) -> &str;
}

/// Caller-supplied junction-table rule.
///
/// Invoked with the normalized columns and raw foreign keys of one table.
/// The classifier awaits it but never inspects how it decides.
#[async_trait]
pub trait JunctionPredicate: Send + Sync {
    async fn is_junction(
        &self,
        table: &str,
        columns: &[ColumnDescriptor],
        foreign_keys: &[ForeignKeyFact],
    ) -> Result<bool>;
}
