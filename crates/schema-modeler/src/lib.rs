//! # schema-modeler
//!
//! Relational schema mapping and relationship inference for code generation.
//!
//! Given raw table metadata (columns, indexes, foreign keys) this library
//! produces a deterministic, language-agnostic description of every table:
//!
//! - **Type decoding** of dialect type strings into normalized kinds with
//!   language and ORM type hints
//! - **Column normalization** with uniqueness and foreign key references
//! - **Junction table detection** via configurable rules or a caller predicate
//! - **Association inference** (belongsTo, hasOne, hasMany, belongsToMany)
//!   across the whole schema graph
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use schema_modeler::{Config, SchemaMapper, SnapshotSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("modeler.yaml")?;
//!     let source = SnapshotSource::load("schema.yaml")?;
//!     let mapper = SchemaMapper::from_config(&config, Arc::new(source))?;
//!     let (schema, report) = mapper.run().await?;
//!     println!("{}", schema.to_json()?);
//!     eprintln!("Mapped {} tables", report.tables_mapped);
//!     Ok(())
//! }
//! ```

pub mod association;
pub mod column;
pub mod config;
pub mod core;
pub mod error;
pub mod junction;
pub mod orchestrator;
pub mod source;
pub mod table;
pub mod typemap;

// Re-exports for convenient access
pub use association::{build_associations, Association, AssociationKind};
pub use column::{ColumnDescriptor, ColumnReference, Uniqueness};
pub use config::{Config, JunctionRulesConfig, MappingConfig, SourceConfig, TablesConfig};
pub use crate::core::{
    ForeignKeyFact, IndexFact, IndexField, JunctionPredicate, RawColumn, SchemaSource,
    TableMetadata,
};
pub use error::{ModelerError, Result};
pub use junction::{JunctionClassifier, JunctionRule, JunctionRules, JunctionSetting};
pub use orchestrator::{MappingReport, SchemaMapper};
pub use source::SnapshotSource;
#[cfg(feature = "mysql")]
pub use source::MysqlSource;
pub use table::{SchemaMap, TableDescriptor};
pub use typemap::{decode, ColumnKind, LanguageType, Length, TypeDecoder, TypeDescriptor};
