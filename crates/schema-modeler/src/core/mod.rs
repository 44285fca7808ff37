//! Core abstractions shared by the mapping pipeline.
//!
//! - [`schema`]: raw table metadata as reported by an introspection backend
//! - [`traits`]: the introspection collaborator and the junction callback seam
//!
//! Everything in here is read-only input to the decoder, normalizer,
//! classifier and association builder.

pub mod schema;
pub mod traits;

pub use schema::{ForeignKeyFact, IndexFact, IndexField, RawColumn, TableMetadata};
pub use traits::{JunctionPredicate, SchemaSource};
