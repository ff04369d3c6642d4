// Configuration loading.
// Reads an optional TOML file (`--config` or `CAMPAIGN_GRADER_CONFIG`);
// every section falls back to built-in defaults. The API credential only
// ever comes from the environment.
use crate::error::GradeError;
use crate::ranking::ScoringConfig;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub insights: InsightsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Campaigns taken from each end of the sorted table for the extract.
    #[serde(default = "default_extract_size")]
    pub extract_size: usize,
}

fn default_extract_size() -> usize {
    3
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            extract_size: default_extract_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightsConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Currency named in the prompt; figures are never converted.
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_currency() -> String {
    "INR".to_string()
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            currency: default_currency(),
        }
    }
}

impl AppConfig {
    /// Load from `path` when given, otherwise use defaults. The result is
    /// validated before it is returned.
    pub fn load(path: Option<&Path>) -> Result<Self, GradeError> {
        let config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    GradeError::Config(format!("cannot read {}: {e}", path.display()))
                })?;
                Self::from_toml(&content)?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, GradeError> {
        toml::from_str(content).map_err(|e| GradeError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), GradeError> {
        self.scoring.validate()?;
        if self.report.extract_size == 0 {
            return Err(GradeError::Config("report.extract_size must be at least 1".into()));
        }
        Ok(())
    }
}

/// API credential for the text-generation service, read from the process
/// environment or a `.env` file. Blank values count as absent.
pub fn api_key_from_env() -> Option<SecretString> {
    dotenvy::var(API_KEY_VAR)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(SecretString::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::Direction;
    use crate::types::MetricColumn;

    #[test]
    fn empty_file_gives_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.scoring, ScoringConfig::default());
        assert_eq!(config.report.extract_size, 3);
        assert_eq!(config.insights.model, "gemini-2.5-flash");
        assert_eq!(config.insights.currency, "INR");
    }

    #[test]
    fn default_weights_are_40_30_18_12() {
        let scoring = ScoringConfig::default();
        let weights: Vec<f64> = scoring.criteria.iter().map(|c| c.weight).collect();
        assert_eq!(weights, vec![40.0, 30.0, 18.0, 12.0]);
        assert_eq!(scoring.total_weight(), 100.0);
        assert_eq!(scoring.criteria[2].metric, MetricColumn::Cpl);
        assert_eq!(scoring.criteria[2].direction, Direction::LowerIsBetter);
    }

    #[test]
    fn criteria_can_be_replaced() {
        let config = AppConfig::from_toml(
            r#"
            [[scoring.criteria]]
            metric = "ROAS"
            weight = 70
            direction = "higher"

            [[scoring.criteria]]
            metric = "CPA"
            weight = 30
            direction = "lower"

            [insights]
            currency = "AUD"
            "#,
        )
        .unwrap();
        assert_eq!(config.scoring.criteria.len(), 2);
        assert_eq!(config.scoring.criteria[0].metric, MetricColumn::Roas);
        assert_eq!(config.scoring.criteria[1].direction, Direction::LowerIsBetter);
        assert_eq!(config.insights.currency, "AUD");
        assert_eq!(config.insights.timeout_secs, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_metric_is_a_config_error() {
        let err = AppConfig::from_toml(
            r#"
            [[scoring.criteria]]
            metric = "Clicks"
            weight = 10
            direction = "higher"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, GradeError::Config(_)));
    }

    #[test]
    fn zero_extract_size_is_rejected() {
        let config = AppConfig::from_toml("[report]\nextract_size = 0\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_is_reported() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/grader.toml"))).unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }
}
