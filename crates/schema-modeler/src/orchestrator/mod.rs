//! Schema mapper - main workflow coordinator.
//!
//! A run lists the source's tables, applies the include/exclude filter, then
//! fans out one metadata load per table (bounded by a semaphore). Each task
//! normalizes its columns and classifies its table, returning its own
//! descriptor. Only after every task has finished are association edges
//! wired across the complete table set.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tracing::{debug, info};

use crate::association::build_associations;
use crate::column::normalize_columns;
use crate::config::Config;
use crate::core::schema::ForeignKeyFact;
use crate::core::traits::{JunctionPredicate, SchemaSource};
use crate::error::{ModelerError, Result};
use crate::junction::{JunctionClassifier, JunctionRules};
use crate::table::{SchemaMap, TableDescriptor};
use crate::typemap::TypeDecoder;

/// Default bound on concurrent per-table loads.
const DEFAULT_MAX_CONCURRENT_TABLES: usize = 8;

/// Schema mapper.
pub struct SchemaMapper {
    source: Arc<dyn SchemaSource>,
    decoder: TypeDecoder,
    classifier: JunctionClassifier,
    include: Vec<String>,
    exclude: Vec<String>,
    max_concurrent_tables: usize,
}

/// Summary of a mapping run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingReport {
    /// Unique run identifier.
    pub run_id: String,

    /// Backend the metadata came from.
    pub source: String,

    /// Total duration in seconds.
    pub duration_seconds: f64,

    /// When the run started.
    pub started_at: DateTime<Utc>,

    /// When the run completed.
    pub completed_at: DateTime<Utc>,

    /// Tables reported by the source.
    pub tables_total: usize,

    /// Tables left after filtering.
    pub tables_mapped: usize,

    /// Tables classified as junction tables.
    pub junction_tables: usize,

    /// Association edges across all tables.
    pub associations: usize,
}

impl SchemaMapper {
    /// Create a mapper with the default decoder and junction rules.
    pub fn new(source: Arc<dyn SchemaSource>) -> Self {
        Self {
            source,
            decoder: TypeDecoder::default(),
            classifier: JunctionClassifier::default(),
            include: Vec::new(),
            exclude: Vec::new(),
            max_concurrent_tables: DEFAULT_MAX_CONCURRENT_TABLES,
        }
    }

    /// Create a mapper configured from the `tables`, `junction_rules` and `mapping` sections.
    pub fn from_config(config: &Config, source: Arc<dyn SchemaSource>) -> Result<Self> {
        let mut mapper = Self::new(source)
            .with_junction_rules(config.junction_rules()?)
            .with_tables(config.tables.include.clone(), config.tables.exclude.clone());
        mapper.max_concurrent_tables = config.mapping.max_concurrent_tables.max(1);
        Ok(mapper)
    }

    /// Replace the junction rule set, keeping any callback.
    pub fn with_junction_rules(mut self, rules: JunctionRules) -> Self {
        let mut classifier = JunctionClassifier::new(rules);
        if let Some(callback) = self.classifier.callback() {
            classifier = classifier.with_callback(callback);
        }
        self.classifier = classifier;
        self
    }

    /// Supply the predicate used by the `callback` junction rule.
    pub fn with_junction_callback(mut self, callback: Arc<dyn JunctionPredicate>) -> Self {
        self.classifier = self.classifier.with_callback(callback);
        self
    }

    /// Use a custom type rule table.
    pub fn with_decoder(mut self, decoder: TypeDecoder) -> Self {
        self.decoder = decoder;
        self
    }

    /// Restrict the mapped set. An empty include list means all tables.
    pub fn with_tables(mut self, include: Vec<String>, exclude: Vec<String>) -> Self {
        self.include = include;
        self.exclude = exclude;
        self
    }

    /// Bound the number of tables loaded at once (minimum 1).
    pub fn with_max_concurrent_tables(mut self, limit: usize) -> Self {
        self.max_concurrent_tables = limit.max(1);
        self
    }

    /// Apply the include/exclude filter, keeping source order.
    pub fn filter_tables(&self, tables: Vec<String>) -> Vec<String> {
        tables
            .into_iter()
            .filter(|t| self.include.is_empty() || self.include.contains(t))
            .filter(|t| !self.exclude.contains(t))
            .collect()
    }

    /// List the tables a run would map.
    pub async fn list_tables(&self) -> Result<Vec<String>> {
        let all = self.source.list_tables().await?;
        Ok(self.filter_tables(all))
    }

    /// Map exactly the given tables.
    ///
    /// Fails as a whole if any table's metadata cannot be loaded or the
    /// junction callback fails; no partial map is returned.
    pub async fn map_schema(&self, tables: &[String]) -> Result<SchemaMap> {
        self.classifier.validate()?;

        let semaphore = Semaphore::new(self.max_concurrent_tables);
        let tasks = tables.iter().map(|name| self.map_table(name, &semaphore));
        let mapped = try_join_all(tasks).await?;

        let mut descriptors = BTreeMap::new();
        let mut foreign_keys = BTreeMap::new();
        for (descriptor, fks) in mapped {
            foreign_keys.insert(descriptor.name.clone(), fks);
            descriptors.insert(descriptor.name.clone(), descriptor);
        }

        let edges = build_associations(&mut descriptors, &foreign_keys);
        debug!("Wired {} association edges", edges);

        Ok(SchemaMap::new(descriptors))
    }

    async fn map_table(
        &self,
        table: &str,
        semaphore: &Semaphore,
    ) -> Result<(TableDescriptor, Vec<ForeignKeyFact>)> {
        let _permit = semaphore
            .acquire()
            .await
            .map_err(|e| ModelerError::table_metadata(table, e))?;

        let meta = self
            .source
            .load_table_metadata(table)
            .await
            .map_err(|e| match e {
                ModelerError::TableMetadata { .. } => e,
                other => ModelerError::table_metadata(table, other),
            })?;

        let columns = normalize_columns(&meta, &self.decoder);
        let is_junction = self
            .classifier
            .classify(table, &columns, &meta.foreign_keys)
            .await?;

        debug!(
            "{}: {} columns, {} foreign keys{}",
            table,
            columns.len(),
            meta.foreign_keys.len(),
            if is_junction { ", junction" } else { "" }
        );

        Ok((
            TableDescriptor::new(table, columns, is_junction),
            meta.foreign_keys,
        ))
    }

    /// List, filter and map the source's tables.
    pub async fn run(&self) -> Result<(SchemaMap, MappingReport)> {
        self.classifier.validate()?;

        let started_at = Utc::now();
        let run_id = uuid::Uuid::new_v4().to_string();

        info!("Starting mapping run: {}", run_id);

        info!("Phase 1: Listing tables from {} source", self.source.db_type());
        let all = self.source.list_tables().await?;
        let tables_total = all.len();
        let tables = self.filter_tables(all);
        info!("Found {} tables to map ({} listed)", tables.len(), tables_total);

        info!("Phase 2: Loading and normalizing table metadata");
        debug!(
            "Decoding with {} type rules, junction rules {:?}",
            self.decoder.rules().len(),
            self.classifier.rules()
        );
        let map = self.map_schema(&tables).await?;

        let completed_at = Utc::now();
        let duration = (completed_at - started_at).num_milliseconds() as f64 / 1000.0;

        let report = MappingReport {
            run_id,
            source: self.source.db_type().to_string(),
            duration_seconds: duration,
            started_at,
            completed_at,
            tables_total,
            tables_mapped: map.len(),
            junction_tables: map.junction_count(),
            associations: map.association_count(),
        };

        info!(
            "Mapping complete: {} tables, {} junction tables, {} associations in {:.3}s",
            report.tables_mapped, report.junction_tables, report.associations, duration
        );

        Ok((map, report))
    }
}
