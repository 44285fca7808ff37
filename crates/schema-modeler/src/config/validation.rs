//! Configuration validation.

use super::{Config, JunctionRulesConfig};
use crate::error::{ModelerError, Result};

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    match config.source.r#type.as_str() {
        "snapshot" => {
            if config.source.path.as_deref().map_or(true, str::is_empty) {
                return Err(ModelerError::Config(
                    "source.path is required for snapshot sources".into(),
                ));
            }
        }
        "mysql" => {
            if config.source.host.is_empty() {
                return Err(ModelerError::Config("source.host is required".into()));
            }
            if config.source.database.is_empty() {
                return Err(ModelerError::Config("source.database is required".into()));
            }
            if config.source.user.is_empty() {
                return Err(ModelerError::Config("source.user is required".into()));
            }
        }
        other => {
            return Err(ModelerError::Config(format!(
                "source.type must be 'snapshot' or 'mysql', got '{}'",
                other
            )));
        }
    }

    if let JunctionRulesConfig::List(settings) = &config.junction_rules {
        if settings.is_empty() {
            return Err(ModelerError::Config(
                "junction_rules must name at least one rule (use false to disable)".into(),
            ));
        }
    }

    if config.mapping.max_concurrent_tables == 0 {
        return Err(ModelerError::Config(
            "mapping.max_concurrent_tables must be at least 1".into(),
        ));
    }

    Ok(())
}
