//! Analysis configuration
//!
//! Everything that is tunable about a run lives here. The significance level is
//! deliberately not part of it: the happy/sad comparison always uses α = 0.05.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Significance level for every t-test (p < α ⇒ significant)
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Key Action Units rendered in the plots, in priority order
pub const DEFAULT_KEY_FEATURES: [&str; 5] = ["AU06_r", "AU12_r", "AU01_r", "AU04_r", "AU15_r"];

/// Errors raised while loading or validating a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Configuration for an analysis run
///
/// # Example
/// ```
/// use auscope::config::AnalysisConfig;
///
/// let config = AnalysisConfig::default();
/// assert_eq!(config.identifier_column, "filename");
/// assert!(config.equal_variance);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Column holding the sample identifier (OpenFace emits `filename`)
    pub identifier_column: String,

    /// Features to plot, in priority order; only those present are drawn
    pub key_features: Vec<String>,

    /// Pooled-variance Student t-test when true, Welch's t-test when false
    pub equal_variance: bool,

    /// Treat a missing identifier column as a fatal load error
    ///
    /// Default: false (every row is labelled `unknown` and the run degrades
    /// to empty artifacts)
    pub require_identifier: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            identifier_column: "filename".to_string(),
            key_features: DEFAULT_KEY_FEATURES.iter().map(|s| s.to_string()).collect(),
            equal_variance: true,
            require_identifier: false,
        }
    }
}

impl AnalysisConfig {
    /// Parse a TOML document; missing keys fall back to defaults
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: AnalysisConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.identifier_column.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "identifier_column must not be empty".to_string(),
            ));
        }

        if let Some(feature) = self.key_features.iter().find(|f| f.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "key_features contains an empty name: '{}'",
                feature
            )));
        }

        Ok(())
    }
}
