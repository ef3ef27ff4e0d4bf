//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// Contribhist - contribution history reporter for on-chain impact funding
///
/// Fetch an address's contribution history from a ledger service, enrich it
/// with report metadata, and render a Markdown/JSON report with summary
/// statistics.
///
/// Examples:
///   contribhist --address 0x42d26eb1e5a01be69e1ccad79affd6d2df181f62
///   contribhist --address 0x42d2... --format json --output history.json
///   contribhist --address 0x42d2... --dry-run
///   contribhist --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Blockchain address to fetch contribution history for
    ///
    /// Expected to be a 0x-prefixed 20-byte hex identifier. The shape is not
    /// enforced; an unknown or malformed address simply yields no history.
    #[arg(
        short,
        long,
        value_name = "ADDRESS",
        required_unless_present = "init_config"
    )]
    pub address: Option<String>,

    /// Base URL of the ledger/index service
    #[arg(
        long,
        default_value = "http://localhost:8055",
        env = "CONTRIBHIST_LEDGER_URL"
    )]
    pub ledger_url: String,

    /// Base URL of the report metadata service
    #[arg(
        long,
        default_value = "http://localhost:3000",
        env = "CONTRIBHIST_REPORT_URL"
    )]
    pub report_url: String,

    /// Output file path for the report
    ///
    /// Defaults to the config file setting, or contrib_history.md.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Request timeout in seconds
    ///
    /// Bounds the ledger call and every report lookup. Default: from config
    /// or 30s.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .contribhist.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Dry run: list raw contributions without fetching reports
    ///
    /// Shows what the ledger returns for the address and exits.
    #[arg(long)]
    pub dry_run: bool,

    /// Fail when the history comes back empty
    ///
    /// Useful for CI pipelines. Exit code 2 when no entries were joined,
    /// whether the address has no contributions or the ledger was
    /// unreachable.
    #[arg(long)]
    pub fail_empty: bool,

    /// Generate a default .contribhist.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the address, empty if not set (should be validated first).
    pub fn address_str(&self) -> &str {
        self.address.as_deref().unwrap_or("")
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Validate service URL formats
        for (name, url) in [("Ledger", &self.ledger_url), ("Report", &self.report_url)] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(format!(
                    "{} URL must start with 'http://' or 'https://'",
                    name
                ));
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        // Validate timeout if provided
        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

/// Whether a string has the shape of a 0x-prefixed 20-byte hex address.
///
/// Advisory only: a failing shape is logged, never rejected.
pub fn looks_like_address(address: &str) -> bool {
    let Some(hex) = address.strip_prefix("0x") else {
        return false;
    };
    hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            address: Some("0x42d26eb1e5a01be69e1ccad79affd6d2df181f62".to_string()),
            ledger_url: "http://localhost:8055".to_string(),
            report_url: "http://localhost:3000".to_string(),
            output: None,
            format: OutputFormat::Markdown,
            timeout: None,
            config: None,
            verbose: false,
            quiet: false,
            dry_run: false,
            fail_empty: false,
            init_config: false,
        }
    }

    #[test]
    fn test_validation_accepts_defaults() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_service_url() {
        let mut args = make_args();
        args.ledger_url = "ledger.example.org".to_string();
        assert!(args.validate().is_err());

        let mut args = make_args();
        args.report_url = "ftp://reports.example.org".to_string();
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let mut args = make_args();
        args.timeout = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_malformed_address_is_not_rejected() {
        // Malformed addresses flow through and surface as an empty history
        let mut args = make_args();
        args.address = Some("not-an-address".to_string());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_looks_like_address() {
        assert!(looks_like_address(
            "0x42d26eb1e5a01be69e1ccad79affd6d2df181f62"
        ));
        assert!(!looks_like_address("42d26eb1e5a01be69e1ccad79affd6d2df181f62"));
        assert!(!looks_like_address("0x42d2"));
        assert!(!looks_like_address("0xzzz26eb1e5a01be69e1ccad79affd6d2df181f62"));
    }
}
