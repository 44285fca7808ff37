//! Error types for the schema modeler.

use thiserror::Error;

/// Main error type for schema mapping operations.
#[derive(Error, Debug)]
pub enum ModelerError {
    /// Configuration error (invalid YAML, missing fields, conflicting rules)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Metadata for one table could not be fetched
    #[error("Failed to load metadata for table {table}: {message}")]
    TableMetadata { table: String, message: String },

    /// Introspection backend error not tied to a single table
    #[error("Schema source error: {0}")]
    Source(String),

    /// The externally supplied junction predicate failed
    #[error("Junction callback failed for table {table}: {message}")]
    JunctionCallback { table: String, message: String },

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ModelerError {
    /// Create a TableMetadata error
    pub fn table_metadata(table: impl Into<String>, message: impl std::fmt::Display) -> Self {
        ModelerError::TableMetadata {
            table: table.into(),
            message: message.to_string(),
        }
    }

    /// Create a JunctionCallback error
    pub fn junction_callback(table: impl Into<String>, message: impl std::fmt::Display) -> Self {
        ModelerError::JunctionCallback {
            table: table.into(),
            message: message.to_string(),
        }
    }

    /// Process exit code for the CLI.
    pub fn exit_code(&self) -> u8 {
        match self {
            ModelerError::Config(_) | ModelerError::Yaml(_) | ModelerError::Json(_) => 1,
            ModelerError::TableMetadata { .. } | ModelerError::Source(_) => 2,
            ModelerError::JunctionCallback { .. } => 3,
            ModelerError::Io(_) => 7,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for schema mapping operations.
pub type Result<T> = std::result::Result<T, ModelerError>;
