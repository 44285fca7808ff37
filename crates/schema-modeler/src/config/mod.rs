//! Configuration loading and validation.

mod types;
mod validation;

pub use types::*;

use std::path::Path;

use crate::error::Result;
use crate::junction::JunctionRules;

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }

    /// Resolve the `junction_rules` entry into the classifier's rule set.
    pub fn junction_rules(&self) -> Result<JunctionRules> {
        match &self.junction_rules {
            JunctionRulesConfig::Toggle(true) => Ok(JunctionRules::default()),
            JunctionRulesConfig::Toggle(false) => Ok(JunctionRules::Off),
            JunctionRulesConfig::List(settings) => JunctionRules::from_settings(settings),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelerError;
    use crate::junction::JunctionRule;
    use std::io::Write;

    const SNAPSHOT_YAML: &str = r#"
source:
  type: snapshot
  path: schema.yaml
"#;

    #[test]
    fn test_minimal_snapshot_config() {
        let config = Config::from_yaml(SNAPSHOT_YAML).unwrap();
        assert_eq!(config.source.r#type, "snapshot");
        assert_eq!(config.source.path.as_deref(), Some("schema.yaml"));
        assert!(config.tables.include.is_empty());
        assert!(config.tables.exclude.is_empty());
        assert_eq!(config.mapping.max_concurrent_tables, 8);
        assert_eq!(config.junction_rules().unwrap(), JunctionRules::default());
    }

    #[test]
    fn test_full_mysql_config() {
        let yaml = r#"
source:
  type: mysql
  host: db.internal
  database: app
  user: reader
  password: hunter2
tables:
  include: [users, posts, user_tags]
  exclude: [migrations]
junction_rules:
  - primary_and_timestamp_only
  - composite_primary
mapping:
  max_concurrent_tables: 2
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.source.port, 3306);
        assert_eq!(config.tables.include.len(), 3);
        assert_eq!(config.tables.exclude, vec!["migrations".to_string()]);
        assert_eq!(config.mapping.max_concurrent_tables, 2);
        assert_eq!(
            config.junction_rules().unwrap(),
            JunctionRules::Enabled(vec![
                JunctionRule::PrimaryAndTimestampOnly,
                JunctionRule::CompositePrimary
            ])
        );
    }

    #[test]
    fn test_junction_rules_false_is_off() {
        let yaml = format!("{}junction_rules: false\n", SNAPSHOT_YAML);
        let config = Config::from_yaml(&yaml).unwrap();
        assert_eq!(config.junction_rules().unwrap(), JunctionRules::Off);
    }

    #[test]
    fn test_junction_rules_off_wins() {
        let yaml = format!(
            "{}junction_rules: [composite_primary, off]\n",
            SNAPSHOT_YAML
        );
        let config = Config::from_yaml(&yaml).unwrap();
        assert_eq!(config.junction_rules().unwrap(), JunctionRules::Off);
    }

    #[test]
    fn test_empty_junction_rules_rejected() {
        let yaml = format!("{}junction_rules: []\n", SNAPSHOT_YAML);
        let err = Config::from_yaml(&yaml).unwrap_err();
        assert!(matches!(err, ModelerError::Config(_)));
    }

    #[test]
    fn test_unknown_junction_rule_is_yaml_error() {
        let yaml = format!("{}junction_rules: [magic]\n", SNAPSHOT_YAML);
        let err = Config::from_yaml(&yaml).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SNAPSHOT_YAML.as_bytes()).unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.source.r#type, "snapshot");
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = Config::load("/nonexistent/modeler.yaml").unwrap_err();
        assert!(matches!(err, ModelerError::Io(_)));
    }
}
