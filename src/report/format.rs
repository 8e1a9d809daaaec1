//! Formatted terminal output.

use crate::app::pipeline::{PreparedData, RunOutput};
use crate::io::ingest::IngestedRecords;

/// Format the shared (criterion-independent) summary: ingest and dating
/// accounting. Every input row is accounted for exactly once.
pub fn format_prepare_summary(ingested: &IngestedRecords, prepared: &PreparedData) -> String {
    let mut out = String::new();

    out.push_str("=== bab - Babylonian price panel ===\n");
    out.push_str(&format!(
        "Rows: read={} malformed={}\n",
        ingested.rows_read,
        ingested.row_errors.len()
    ));

    let n = &prepared.stats.normalize;
    out.push_str(&format!(
        "Normalize: kept={} dropped: year={} month={}\n",
        n.kept, n.dropped_missing_year, n.dropped_bad_month
    ));
    out.push_str(&format!(
        "Dating: dated={} dropped: unclassified={} invalid={}\n",
        prepared.stats.dated,
        prepared.stats.dropped_unclassified,
        prepared.stats.dropped_invalid_date
    ));
    out.push_str(&format!("Day counts: {}\n", prepared.meta.len()));

    for err in &ingested.row_errors {
        out.push_str(&format!("  (line {}) {}\n", err.line, err.message));
    }

    out
}

/// Format the summary of one criterion run.
pub fn format_run_summary(output: &RunOutput) -> String {
    let mut out = String::new();

    out.push_str(&format!("\n--- criterion {} ---\n", output.config.criterion.label()));
    out.push_str(&format!(
        "Selected: obs={} price_points={}\n",
        output.selected, output.aggregate.price_points
    ));
    out.push_str(&format!(
        "Panel: rows={} dropped: long_gap={} no_successor={}\n",
        output.aggregate.panel_rows,
        output.aggregate.dropped_long_gap,
        output.aggregate.dropped_no_successor
    ));
    if let Some((first, last)) = output.panel.first().zip(output.panel.last()) {
        out.push_str(&format!(
            "Span: day {:.1} ({}-{:02}-{:02}) .. day {:.1} ({}-{:02}-{:02})\n",
            first.day_count,
            first.solar.year,
            first.solar.month,
            first.solar.day,
            last.day_count,
            last.solar.year,
            last.solar.month,
            last.solar.day
        ));
    }

    out
}
