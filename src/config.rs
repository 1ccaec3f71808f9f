use crate::error::{Result, TrackerError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CURRENCY_UNIT: &str = "€";
pub const DEFAULT_SPARKLINE_LIMIT: usize = 10;
pub const DEFAULT_DUPLICATE_SUFFIX: &str = " (Kopie)";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EngineConfig {
    #[serde(default = "default_currency_unit")]
    #[schemars(
        description = "Unit label that marks a category as monetary. Only these categories feed the combined total, and savings categories always carry it."
    )]
    pub currency_unit: String,

    #[serde(default = "default_sparkline_limit")]
    #[schemars(description = "Number of trailing entries shown in a category sparkline")]
    pub sparkline_limit: usize,

    #[serde(default = "default_duplicate_suffix")]
    #[schemars(description = "Suffix appended to the name of a duplicated category")]
    pub duplicate_suffix: String,
}

fn default_currency_unit() -> String {
    DEFAULT_CURRENCY_UNIT.to_string()
}

fn default_sparkline_limit() -> usize {
    DEFAULT_SPARKLINE_LIMIT
}

fn default_duplicate_suffix() -> String {
    DEFAULT_DUPLICATE_SUFFIX.to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            currency_unit: default_currency_unit(),
            sparkline_limit: default_sparkline_limit(),
            duplicate_suffix: default_duplicate_suffix(),
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.currency_unit.trim().is_empty() {
            return Err(TrackerError::Validation(
                "currency_unit must not be empty".to_string(),
            ));
        }
        if self.sparkline_limit == 0 {
            return Err(TrackerError::Validation(
                "sparkline_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_currency(&self, unit: &str) -> bool {
        unit == self.currency_unit
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(EngineConfig)
    }
}
