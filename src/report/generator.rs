//! Markdown and JSON report generation.
//!
//! Renders a `ProfileReport` either as a human-readable Markdown document
//! or as pretty-printed JSON for downstream tooling.

use crate::config::ReportConfig;
use crate::models::{HistoryEntry, ProfileReport, ReportMetadata, SummaryStats};
use anyhow::{Context, Result};

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &ProfileReport, config: &ReportConfig) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# Contribution History Report\n\n");

    // Metadata section
    output.push_str(&generate_metadata_section(&report.metadata));

    // Summary section
    output.push_str(&generate_summary_section(&report.summary));

    // History section
    output.push_str(&generate_history_section(&report.history, config));

    // Footer
    output.push_str(&generate_footer());

    output
}

/// Generate a JSON report.
pub fn generate_json_report(report: &ProfileReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize report to JSON")
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Address:** `{}`\n", metadata.address));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Ledger Service:** {}\n", metadata.ledger_url));
    section.push_str(&format!("- **Report Service:** {}\n", metadata.report_url));
    section.push_str(&format!("- **History Entries:** {}\n", metadata.entry_count));
    section.push_str(&format!(
        "- **Fetch Duration:** {:.1}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

/// Generate the summary section.
fn generate_summary_section(summary: &SummaryStats) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");
    section.push_str(&format!(
        "- **Total Contributed:** {:.2}\n",
        summary.total_amount
    ));
    section.push_str(&format!("- **Reports Funded:** {}\n", summary.report_count));
    section.push('\n');

    if !summary.category_counts.is_empty() {
        section.push_str("### By Category\n\n");
        section.push_str("| Category | Contributions |\n");
        section.push_str("|----------|---------------|\n");

        for (category, count) in summary.top_categories() {
            section.push_str(&format!("| {} | {} |\n", category, count));
        }

        section.push('\n');
    }

    section
}

/// Generate the history section, one block per entry in ledger order.
fn generate_history_section(history: &[HistoryEntry], config: &ReportConfig) -> String {
    let mut section = String::new();

    section.push_str("## History\n\n");

    if history.is_empty() {
        section.push_str("_No contributions to show._\n\n");
        return section;
    }

    for entry in history {
        section.push_str(&format!("### {}\n\n", entry.title));
        section.push_str(&format!(
            "- **Date:** {}\n",
            entry.date.format("%Y-%m-%d")
        ));
        section.push_str(&format!("- **Amount:** {:.2}\n", entry.amount));
        section.push_str(&format!("- **Category:** {}\n", entry.category));
        section.push_str(&format!("- **Location:** {}\n", entry.location));
        section.push_str(&format!("- **Transaction:** `{}`\n", entry.id));

        if config.include_images && !entry.image.src.is_empty() {
            section.push_str(&format!(
                "\n![{}]({})\n",
                entry.image.alt, entry.image.src
            ));
        }

        if config.include_descriptions && !entry.description.is_empty() {
            section.push_str(&format!("\n{}\n", entry.description));
        }

        section.push('\n');
    }

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    format!(
        "---\n\n_Generated by contribhist v{}_\n",
        env!("CARGO_PKG_VERSION")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ImageRef;
    use chrono::{TimeZone, Utc};

    fn sample_report() -> ProfileReport {
        let entry = HistoryEntry {
            id: "0xabc".to_string(),
            date: Utc.with_ymd_and_hms(2024, 3, 21, 16, 0, 0).unwrap(),
            amount: 25.0,
            image: ImageRef {
                src: "https://reports.test/cover.png".to_string(),
                alt: "Clean water for schools".to_string(),
            },
            title: "Clean water for schools".to_string(),
            category: "Education".to_string(),
            location: "Tamil Nadu".to_string(),
            description: "Borewell installation across twelve schools.".to_string(),
        };
        let summary = SummaryStats::from_entries(std::slice::from_ref(&entry));

        ProfileReport {
            metadata: ReportMetadata {
                address: "0x42d26eb1e5a01be69e1ccad79affd6d2df181f62".to_string(),
                generated_at: Utc.with_ymd_and_hms(2024, 3, 22, 8, 0, 0).unwrap(),
                ledger_url: "http://ledger.test".to_string(),
                report_url: "http://reports.test".to_string(),
                entry_count: 1,
                duration_seconds: 0.4,
            },
            summary,
            history: vec![entry],
        }
    }

    #[test]
    fn test_markdown_report_sections() {
        let report = sample_report();
        let output = generate_markdown_report(&report, &ReportConfig::default());

        assert!(output.contains("# Contribution History Report"));
        assert!(output.contains("## Metadata"));
        assert!(output.contains("## Summary"));
        assert!(output.contains("## History"));
        assert!(output.contains("### Clean water for schools"));
        assert!(output.contains("| Education | 1 |"));
        assert!(output.contains("**Total Contributed:** 25.00"));
        assert!(output.contains("![Clean water for schools](https://reports.test/cover.png)"));
    }

    #[test]
    fn test_markdown_report_respects_report_config() {
        let report = sample_report();
        let config = ReportConfig {
            include_images: false,
            include_descriptions: false,
        };
        let output = generate_markdown_report(&report, &config);

        assert!(!output.contains("![Clean water for schools]"));
        assert!(!output.contains("Borewell installation"));
    }

    #[test]
    fn test_markdown_report_empty_history() {
        let mut report = sample_report();
        report.history.clear();
        report.summary = SummaryStats::default();

        let output = generate_markdown_report(&report, &ReportConfig::default());
        assert!(output.contains("_No contributions to show._"));
        assert!(!output.contains("### Clean water"));
    }

    #[test]
    fn test_json_report_round_trips() {
        let report = sample_report();
        let output = generate_json_report(&report).unwrap();

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["summary"]["report_count"], 1);
        assert_eq!(value["history"][0]["id"], "0xabc");
        assert_eq!(
            value["metadata"]["address"],
            "0x42d26eb1e5a01be69e1ccad79affd6d2df181f62"
        );
    }
}
