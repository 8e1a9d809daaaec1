//! Shared pipeline logic.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//!
//! normalize -> date -> (per criterion) select -> dedup -> expand/tag -> aggregate
//!
//! Normalization and dating are criterion-independent, so they run once
//! (`prepare`); the per-criterion stages are pure functions over the
//! prepared data and can run in parallel for the four-criterion batch.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::calendar::{DateError, LunarTable, to_day_count};
use crate::domain::{DatedObservation, PanelConfig, PanelRow, RawRecord, SlotMeta};
use crate::error::AppError;
use crate::normalize::NormalizeStats;
use crate::panel::AggregateStats;
use crate::panel;

/// Accounting for the criterion-independent stages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrepareStats {
    pub normalize: NormalizeStats,
    pub dropped_unclassified: usize,
    pub dropped_invalid_date: usize,
    pub dated: usize,
}

/// Normalized, dated observations plus the per-day-count metadata shared by
/// every criterion run.
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub dated: Vec<DatedObservation>,
    pub meta: Vec<SlotMeta>,
    pub stats: PrepareStats,
}

/// All computed outputs of a single criterion run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub config: PanelConfig,
    pub panel: Vec<PanelRow>,
    pub selected: usize,
    pub aggregate: AggregateStats,
}

/// Normalize and date the raw records.
///
/// A record that cannot be dated (no part classification, or an invalid
/// recorded date) is dropped and counted; a hole in the conversion table is
/// a fatal configuration error.
pub fn prepare(records: &[RawRecord], table: &LunarTable) -> Result<PreparedData, AppError> {
    let (observations, normalize_stats) = crate::normalize::normalize(records);

    let mut stats = PrepareStats {
        normalize: normalize_stats,
        ..PrepareStats::default()
    };

    let mut dated = Vec::with_capacity(observations.len());
    for obs in observations {
        match to_day_count(&obs, table) {
            Ok(day_count) => dated.push(DatedObservation { day_count, obs }),
            Err(DateError::Unclassified) => {
                stats.dropped_unclassified += 1;
                debug!(
                    year_bc = obs.year_bc,
                    month = obs.month.name(),
                    "dropping unclassified lunar-regime record"
                );
            }
            Err(DateError::InvalidDate(reason)) => {
                stats.dropped_invalid_date += 1;
                debug!(year_bc = obs.year_bc, %reason, "dropping record with invalid date");
            }
            Err(err @ DateError::MappingMissing { .. }) => {
                return Err(AppError::new(2, err.to_string()));
            }
        }
    }
    stats.dated = dated.len();

    if dated.is_empty() {
        return Err(AppError::new(3, "No observation could be dated."));
    }

    let meta = panel::slot_meta(&dated);
    info!(
        records = records.len(),
        dated = stats.dated,
        day_counts = meta.len(),
        "prepared observations"
    );

    Ok(PreparedData { dated, meta, stats })
}

/// Execute one criterion run over prepared data.
pub fn run_panel(prepared: &PreparedData, config: &PanelConfig) -> Result<RunOutput, AppError> {
    let subset = crate::select::select(&prepared.dated, config.criterion);
    let points = panel::dedup_prices(&subset);
    let daily = panel::expand_daily(&points, &config.seasons)
        .map_err(|e| AppError::new(4, format!("Daily expansion failed: {e}")))?;
    let slots = panel::summarize_slots(&daily);
    let (rows, aggregate) = panel::build_panel(&points, &slots, &prepared.meta, config);

    info!(
        criterion = config.criterion.label(),
        selected = subset.len(),
        price_points = points.len(),
        panel_rows = rows.len(),
        "criterion run complete"
    );

    Ok(RunOutput {
        config: config.clone(),
        panel: rows,
        selected: subset.len(),
        aggregate,
    })
}

/// Execute several criterion runs in parallel.
///
/// The runs share only the immutable prepared data, so this is a plain
/// parallel map.
pub fn run_all(prepared: &PreparedData, configs: &[PanelConfig]) -> Result<Vec<RunOutput>, AppError> {
    configs
        .par_iter()
        .map(|config| run_panel(prepared, config))
        .collect()
}
