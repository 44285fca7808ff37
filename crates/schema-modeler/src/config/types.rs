//! Configuration type definitions.

use serde::{Deserialize, Serialize};

use crate::junction::JunctionSetting;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where table metadata comes from.
    pub source: SourceConfig,

    /// Which tables to map.
    #[serde(default)]
    pub tables: TablesConfig,

    /// Junction classification rules (default: composite_primary_only).
    #[serde(default)]
    pub junction_rules: JunctionRulesConfig,

    /// Mapping run behavior.
    #[serde(default)]
    pub mapping: MappingConfig,
}

/// Metadata source configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Source type: "snapshot" or "mysql" (default: snapshot).
    #[serde(default = "default_snapshot")]
    pub r#type: String,

    /// Snapshot file (YAML, or JSON when the extension is `.json`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Database host.
    #[serde(default)]
    pub host: String,

    /// Database port (default: 3306).
    #[serde(default = "default_mysql_port")]
    pub port: u16,

    /// Database name.
    #[serde(default)]
    pub database: String,

    /// Username.
    #[serde(default)]
    pub user: String,

    /// Password.
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceConfig")
            .field("type", &self.r#type)
            .field("path", &self.path)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Table selection. Names are matched exactly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TablesConfig {
    /// Tables to map (empty = all tables).
    #[serde(default)]
    pub include: Vec<String>,

    /// Tables to skip, applied after `include`.
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// `junction_rules: true | false | [rule, ...]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JunctionRulesConfig {
    Toggle(bool),
    List(Vec<JunctionSetting>),
}

impl Default for JunctionRulesConfig {
    fn default() -> Self {
        JunctionRulesConfig::Toggle(true)
    }
}

/// Mapping run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingConfig {
    /// Upper bound on concurrent per-table metadata loads (default: 8).
    #[serde(default = "default_max_concurrent_tables")]
    pub max_concurrent_tables: usize,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            max_concurrent_tables: default_max_concurrent_tables(),
        }
    }
}

fn default_snapshot() -> String {
    "snapshot".to_string()
}

fn default_mysql_port() -> u16 {
    3306
}

fn default_max_concurrent_tables() -> usize {
    8
}
