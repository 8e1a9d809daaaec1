//! Observation normalization.
//!
//! Turns raw tabular records into [`RawObservation`]s that are safe to
//! date and aggregate:
//!
//! - month labels collapse to the canonical lunar-month set (whitespace
//!   padding tolerated, ambiguous labels rejected)
//! - the two part-of-month classification columns parse independently
//! - prices become log prices; non-positive or missing levels stay undefined
//! - records missing the year labels or a canonical month are dropped
//!
//! Dropping is silent with respect to the pipeline result but every drop is
//! counted and logged, so a run summary can account for the full input.

use tracing::debug;

use crate::domain::{MonthPart, RawObservation, RawRecord};

/// Per-stage accounting for the normalizer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    pub records_in: usize,
    pub dropped_missing_year: usize,
    pub dropped_bad_month: usize,
    pub kept: usize,
}

/// Normalize raw records, dropping those without the essential fields.
pub fn normalize(records: &[RawRecord]) -> (Vec<RawObservation>, NormalizeStats) {
    let mut stats = NormalizeStats {
        records_in: records.len(),
        ..NormalizeStats::default()
    };
    let mut out = Vec::with_capacity(records.len());

    for rec in records {
        let (Some(year_label), Some(year_bc)) = (rec.year_label, rec.year_bc) else {
            stats.dropped_missing_year += 1;
            debug!(line = rec.line, "dropping record without year labels");
            continue;
        };

        let month = rec.month_label.as_deref().and_then(crate::domain::LunarMonth::from_label);
        let Some(month) = month else {
            stats.dropped_bad_month += 1;
            debug!(
                line = rec.line,
                label = rec.month_label.as_deref().unwrap_or(""),
                "dropping record without a canonical month label"
            );
            continue;
        };

        out.push(RawObservation {
            year_label,
            year_bc,
            month,
            solar_month: rec.solar_month,
            solar_day: rec.solar_day,
            part_v0: rec.part_v0.as_deref().and_then(MonthPart::from_label),
            part_v1: rec.part_v1.as_deref().and_then(MonthPart::from_label),
            log_barley: log_price(rec.price_barley),
            log_dates: log_price(rec.price_dates),
            // A price without an explicit "not italic" flag counts as
            // uncertain, so it only enters the full-range subsets.
            uncertain_barley: rec.uncertain_barley.unwrap_or(true),
            uncertain_dates: rec.uncertain_dates.unwrap_or(true),
        });
        stats.kept += 1;
    }

    (out, stats)
}

/// Natural log of a positive, finite price level.
pub fn log_price(level: Option<f64>) -> Option<f64> {
    let level = level?;
    if level.is_finite() && level > 0.0 {
        Some(level.ln())
    } else {
        None
    }
}
