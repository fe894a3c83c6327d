//! Settings for an import run.

use crate::error::StixError as Error;
use serde::{Deserialize, Serialize};

/// Defaults applied by the importer when a STIX object leaves a value unset.
///
/// Every field has a default, so `ImportConfig::default()` reproduces the stock OpenCTI connector behavior.
/// A partial JSON document only overrides the fields it names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Confidence weight given to every relation created from a STIX relationship.
    pub relation_weight: i64,
    /// Level given to marking definitions without an `x_opencti_level`.
    pub default_marking_level: i64,
    /// Description given to domain entities without a `description`.
    pub default_description: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            relation_weight: 4,
            default_marking_level: 0,
            default_description: String::new(),
        }
    }
}

impl ImportConfig {
    /// Read a configuration from a JSON String
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error::ConfigError(e.to_string()))
    }

    /// Set the confidence weight of created relations
    pub fn relation_weight(mut self, weight: i64) -> Self {
        self.relation_weight = weight;
        self
    }

    /// Set the level used for marking definitions that do not carry one
    pub fn default_marking_level(mut self, level: i64) -> Self {
        self.default_marking_level = level;
        self
    }

    /// Set the description used for entities that do not carry one
    pub fn default_description(mut self, description: &str) -> Self {
        self.default_description = description.to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ImportConfig;

    #[test]
    fn defaults_match_connector() {
        let config = ImportConfig::default();

        assert_eq!(config.relation_weight, 4);
        assert_eq!(config.default_marking_level, 0);
        assert_eq!(config.default_description, "");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ImportConfig::from_json(r#"{ "relation_weight": 2 }"#).unwrap();

        assert_eq!(config, ImportConfig::default().relation_weight(2));
    }

    #[test]
    fn invalid_json_is_config_error() {
        assert!(ImportConfig::from_json(r#"{ "relation_weight": "high" }"#).is_err());
    }
}
