//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.contribhist.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// External service settings.
    #[serde(default)]
    pub services: ServicesConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "contrib_history.md".to_string()
}

/// External service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicesConfig {
    /// Base URL of the ledger/index service.
    #[serde(default = "default_ledger_url")]
    pub ledger_url: String,

    /// Base URL of the report metadata service.
    #[serde(default = "default_report_url")]
    pub report_url: String,

    /// Request timeout in seconds. Bounds every report lookup, so one hung
    /// downstream call cannot stall the whole aggregation.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            ledger_url: default_ledger_url(),
            report_url: default_report_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_ledger_url() -> String {
    "http://localhost:8055".to_string()
}

fn default_report_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Include cover images in the report.
    #[serde(default = "default_true")]
    pub include_images: bool,

    /// Include report summaries in the history section.
    #[serde(default = "default_true")]
    pub include_descriptions: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            include_images: true,
            include_descriptions: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".contribhist.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        // Service URLs always override since they have defaults in CLI
        self.services.ledger_url = args.ledger_url.clone();
        self.services.report_url = args.report_url.clone();

        // Timeout - only override if explicitly provided via CLI
        if let Some(timeout) = args.timeout {
            self.services.timeout_seconds = timeout;
        }

        // Output path - only override if explicitly provided via CLI
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.services.ledger_url, "http://localhost:8055");
        assert_eq!(config.services.timeout_seconds, 30);
        assert_eq!(config.general.output, "contrib_history.md");
        assert!(config.report.include_images);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "history_report.md"
verbose = true

[services]
ledger_url = "https://ledger.example.org"
timeout_seconds = 10

[report]
include_images = false
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output, "history_report.md");
        assert!(config.general.verbose);
        assert_eq!(config.services.ledger_url, "https://ledger.example.org");
        assert_eq!(config.services.timeout_seconds, 10);
        // Unset keys fall back to defaults
        assert_eq!(config.services.report_url, "http://localhost:3000");
        assert!(!config.report.include_images);
        assert!(config.report.include_descriptions);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[services]"));
        assert!(toml_str.contains("[report]"));
    }
}
