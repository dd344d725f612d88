// 📋 Match Report - Assemble and export one reconciliation run
// The engine returns rows; this module packages them with the summary and
// parse stats, renders the CLI table and writes JSON/CSV exports.

use crate::matcher::{summarize, ComparisonSummary, DifferenceType, MatchFilter, MatchResult};
use crate::parser::ParseStats;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

// ============================================================================
// MATCH REPORT
// ============================================================================

/// Everything produced by one reconciliation run.
///
/// Transient by design: rebuilt in full on every run, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub generated_at: DateTime<Utc>,
    pub summary: ComparisonSummary,
    pub system_parse: ParseStats,
    pub wallet_parse: ParseStats,
    pub results: Vec<MatchResult>,
}

impl MatchReport {
    /// Package engine output into a report, recomputing the summary.
    pub fn new(results: Vec<MatchResult>, system_parse: ParseStats, wallet_parse: ParseStats) -> Self {
        MatchReport {
            generated_at: Utc::now(),
            summary: summarize(&results),
            system_parse,
            wallet_parse,
            results,
        }
    }

    /// One-line human summary
    pub fn summary_line(&self) -> String {
        format!(
            "{} system entries vs {} wallet entries: {} matched, {} differences",
            self.summary.total_system,
            self.summary.total_wallet,
            self.summary.matched_count,
            self.summary.differences_count
        )
    }

    /// Rows passing the given filter
    pub fn filtered(&self, filter: MatchFilter) -> Vec<&MatchResult> {
        filter.apply(&self.results)
    }

    /// Count of rows with the given status (for filter tab badges)
    pub fn count_for(&self, filter: MatchFilter) -> usize {
        self.results.iter().filter(|r| filter.matches(r.status)).count()
    }
}

// ============================================================================
// TEXT RENDERING (CLI)
// ============================================================================

/// Render the classification table as plain text, one row per value.
pub fn render_table(results: &[&MatchResult]) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "{:>14}  {:<20}  {:>8}  {:>8}  {}\n",
        "Value", "Status", "System", "Wallet", "Description"
    ));
    out.push_str(&format!("{}\n", "─".repeat(86)));

    if results.is_empty() {
        out.push_str("  (no results for this filter)\n");
        return out;
    }

    for r in results {
        out.push_str(&format!(
            "{:>14}  {:<20}  {:>8}  {:>8}  {}\n",
            format_value(r.value),
            r.status.to_string(),
            r.system_count,
            r.wallet_count,
            r.description
        ));
    }

    out
}

/// Format a value without trailing ".0" noise for whole numbers.
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

// ============================================================================
// EXPORTS
// ============================================================================

/// Write the full report as pretty JSON.
pub fn write_json<W: Write>(report: &MatchReport, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, report).context("Failed to serialize report to JSON")?;
    Ok(())
}

/// Write the classification rows as CSV (one row per distinct value).
pub fn write_csv<W: Write>(report: &MatchReport, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(["value", "status", "system_count", "wallet_count", "description"])
        .context("Failed to write CSV header")?;

    for r in &report.results {
        wtr.write_record([
            format_value(r.value),
            r.status.to_string(),
            r.system_count.to_string(),
            r.wallet_count.to_string(),
            r.description.clone(),
        ])
        .with_context(|| format!("Failed to write CSV row for value {}", r.value))?;
    }

    wtr.flush().context("Failed to flush CSV output")?;
    Ok(())
}

/// One-character badge for a status, used in table and TUI cells.
pub fn status_marker(status: DifferenceType) -> &'static str {
    match status {
        DifferenceType::Matched => "✓",
        DifferenceType::SystemOnly => "S",
        DifferenceType::WalletOnly => "W",
        DifferenceType::FrequencyMismatch => "≠",
    }
}

// ============================================================================
// TESTS
// ============================================================================
