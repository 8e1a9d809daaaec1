//! Panel CSV export.
//!
//! One file per criterion run. Column names carry the criterion suffix so
//! the four outputs can later be merged on `day_count` without collisions;
//! the merge itself happens downstream.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{PanelConfig, PanelRow};
use crate::error::AppError;

/// Write the panel for one criterion run.
///
/// Columns: `day_count`, then suffixed `growth` (barley, the numeraire
/// difference `growth_diff`), `day_gap`, and one season-days fraction per
/// configured season.
pub fn write_panel_csv(path: &Path, rows: &[PanelRow], config: &PanelConfig) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create panel CSV '{}': {e}", path.display()))
    })?;

    let sfx = config.criterion.suffix();
    let mut header = format!("day_count,growth{sfx},growth_diff{sfx},day_gap{sfx}");
    for season in &config.seasons {
        header.push_str(&format!(",{}{sfx}", season.name));
    }
    writeln!(file, "{header}")
        .map_err(|e| AppError::new(2, format!("Failed to write panel CSV header: {e}")))?;

    for row in rows {
        let mut line = format!(
            "{:.1},{:.10},{:.10},{:.1}",
            row.day_count, row.growth_barley, row.growth_diff, row.day_gap
        );
        for fraction in &row.season_fraction {
            line.push_str(&format!(",{fraction:.6}"));
        }
        writeln!(file, "{line}")
            .map_err(|e| AppError::new(2, format!("Failed to write panel CSV row: {e}")))?;
    }

    Ok(())
}

/// Write the fixed reference columns (solar dates of the broadest run),
/// shared by the downstream merge of all criterion outputs.
pub fn write_fixed_csv(path: &Path, rows: &[PanelRow]) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create fixed CSV '{}': {e}", path.display()))
    })?;

    writeln!(file, "day_count,solar_year,solar_month,solar_day")
        .map_err(|e| AppError::new(2, format!("Failed to write fixed CSV header: {e}")))?;
    for row in rows {
        writeln!(
            file,
            "{:.1},{},{},{}",
            row.day_count, row.solar.year, row.solar.month, row.solar.day
        )
        .map_err(|e| AppError::new(2, format!("Failed to write fixed CSV row: {e}")))?;
    }

    Ok(())
}
