//! Experiment configuration - deployment-specific protocol settings.
//!
//! These were ambient module constants in earlier generations of the
//! backend; they are injected here so one binary can serve different
//! deployments.

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::RegistryVersion;

/// Experiment configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExperimentConfig {
    /// Display name shown on the homepage
    #[serde(default = "default_author_name")]
    pub author_name: String,

    /// Whether the engine may re-show designs a respondent has already seen
    #[serde(default)]
    pub allow_repeated_designs: bool,

    /// Percentage of theta rows sampled into each new profile
    #[serde(default = "default_sample_percentage_theta")]
    pub default_sample_percentage_theta: f64,

    /// Percentage of candidate designs searched when choosing each question
    #[serde(default = "default_sample_percentage_designs")]
    pub default_sample_percentage_designs: f64,

    /// Survey recode value identifying the treated option
    #[serde(default = "default_treated_answer_value")]
    pub treated_answer_value: i64,

    /// Which characteristic registry generation this deployment runs
    #[serde(default)]
    pub registry_version: RegistryVersion,
}

impl ExperimentConfig {
    /// Validate experiment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (name, value) in [
            ("theta", self.default_sample_percentage_theta),
            ("designs", self.default_sample_percentage_designs),
        ] {
            if !(value > 0.0 && value <= 100.0) {
                return Err(ValidationError::InvalidSamplePercentage(name));
            }
        }
        Ok(())
    }
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            author_name: default_author_name(),
            allow_repeated_designs: false,
            default_sample_percentage_theta: default_sample_percentage_theta(),
            default_sample_percentage_designs: default_sample_percentage_designs(),
            treated_answer_value: default_treated_answer_value(),
            registry_version: RegistryVersion::default(),
        }
    }
}

fn default_author_name() -> String {
    "Anna Swanson".to_string()
}

fn default_sample_percentage_theta() -> f64 {
    100.0
}

fn default_sample_percentage_designs() -> f64 {
    20.0
}

fn default_treated_answer_value() -> i64 {
    1
}
