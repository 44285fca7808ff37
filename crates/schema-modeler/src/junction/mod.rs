//! Junction (many-to-many join) table classification.
//!
//! A table is a junction table when any enabled rule accepts it. Rules are
//! evaluated in configuration order and evaluation stops at the first hit.
//! [`JunctionRules::Off`] disables classification outright.

mod rules;

pub use rules::{composite_primary, composite_primary_only, primary_and_timestamp_only};

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::column::ColumnDescriptor;
use crate::core::schema::ForeignKeyFact;
use crate::core::traits::JunctionPredicate;
use crate::error::{ModelerError, Result};

/// A junction classification rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JunctionRule {
    /// Exactly two primary key columns, both foreign keys.
    CompositePrimary,
    /// [`JunctionRule::CompositePrimary`] with no other columns.
    CompositePrimaryOnly,
    /// Surrogate key, two foreign keys, and only date/time columns besides.
    PrimaryAndTimestampOnly,
    /// Caller-supplied [`JunctionPredicate`].
    Callback,
}

/// One entry of the `junction_rules` configuration list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JunctionSetting {
    CompositePrimary,
    CompositePrimaryOnly,
    PrimaryAndTimestampOnly,
    Callback,
    Off,
}

/// The enabled rule set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JunctionRules {
    /// Classification disabled; no table is a junction table.
    Off,
    /// Non-empty ordered set of rules, OR-composed.
    Enabled(Vec<JunctionRule>),
}

impl Default for JunctionRules {
    fn default() -> Self {
        JunctionRules::Enabled(vec![JunctionRule::CompositePrimaryOnly])
    }
}

impl JunctionRules {
    /// Build the rule set from configuration entries.
    ///
    /// Order is kept and duplicates dropped. `off` overrides every other entry.
    pub fn from_settings(settings: &[JunctionSetting]) -> Result<Self> {
        if settings.is_empty() {
            return Err(ModelerError::Config(
                "junction_rules must name at least one rule (use false to disable)".into(),
            ));
        }

        if settings.contains(&JunctionSetting::Off) {
            if settings.len() > 1 {
                warn!("junction_rules contains 'off' together with other rules; classification is disabled");
            }
            return Ok(JunctionRules::Off);
        }

        let mut rules = Vec::with_capacity(settings.len());
        for setting in settings {
            let rule = match setting {
                JunctionSetting::CompositePrimary => JunctionRule::CompositePrimary,
                JunctionSetting::CompositePrimaryOnly => JunctionRule::CompositePrimaryOnly,
                JunctionSetting::PrimaryAndTimestampOnly => JunctionRule::PrimaryAndTimestampOnly,
                JunctionSetting::Callback => JunctionRule::Callback,
                JunctionSetting::Off => continue,
            };
            if !rules.contains(&rule) {
                rules.push(rule);
            }
        }

        Ok(JunctionRules::Enabled(rules))
    }

    /// Check whether a rule is enabled.
    pub fn contains(&self, rule: JunctionRule) -> bool {
        match self {
            JunctionRules::Off => false,
            JunctionRules::Enabled(rules) => rules.contains(&rule),
        }
    }
}

/// Decides per table whether it is a junction table.
#[derive(Clone, Default)]
pub struct JunctionClassifier {
    rules: JunctionRules,
    callback: Option<Arc<dyn JunctionPredicate>>,
}

impl std::fmt::Debug for JunctionClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JunctionClassifier")
            .field("rules", &self.rules)
            .field("callback", &self.callback.as_ref().map(|_| "<predicate>"))
            .finish()
    }
}

impl JunctionClassifier {
    pub fn new(rules: JunctionRules) -> Self {
        Self {
            rules,
            callback: None,
        }
    }

    /// Attach the predicate used by [`JunctionRule::Callback`].
    pub fn with_callback(mut self, callback: Arc<dyn JunctionPredicate>) -> Self {
        self.callback = Some(callback);
        self
    }

    pub fn rules(&self) -> &JunctionRules {
        &self.rules
    }

    pub fn callback(&self) -> Option<Arc<dyn JunctionPredicate>> {
        self.callback.clone()
    }

    /// Ensure the callback rule has a predicate to call.
    pub fn validate(&self) -> Result<()> {
        if self.rules.contains(JunctionRule::Callback) && self.callback.is_none() {
            return Err(ModelerError::Config(
                "junction rule 'callback' is enabled but no predicate was supplied".into(),
            ));
        }
        Ok(())
    }

    /// Classify one table.
    pub async fn classify(
        &self,
        table: &str,
        columns: &[ColumnDescriptor],
        foreign_keys: &[ForeignKeyFact],
    ) -> Result<bool> {
        let rules = match &self.rules {
            JunctionRules::Off => return Ok(false),
            JunctionRules::Enabled(rules) => rules,
        };

        for rule in rules {
            let hit = match rule {
                JunctionRule::CompositePrimary => composite_primary(columns, foreign_keys),
                JunctionRule::CompositePrimaryOnly => composite_primary_only(columns, foreign_keys),
                JunctionRule::PrimaryAndTimestampOnly => {
                    primary_and_timestamp_only(columns, foreign_keys)
                }
                JunctionRule::Callback => {
                    let callback = self.callback.as_ref().ok_or_else(|| {
                        ModelerError::Config(
                            "junction rule 'callback' is enabled but no predicate was supplied"
                                .into(),
                        )
                    })?;
                    callback
                        .is_junction(table, columns, foreign_keys)
                        .await
                        .map_err(|e| match e {
                            ModelerError::JunctionCallback { .. } => e,
                            other => ModelerError::junction_callback(table, other),
                        })?
                }
            };

            if hit {
                debug!("Table {} classified as junction table by {:?}", table, rule);
                return Ok(true);
            }
        }

        Ok(false)
    }
}
