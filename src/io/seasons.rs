//! Season-definition JSON.
//!
//! The two default windows cover the barley and dates harvests; research
//! variants can supply their own list. The file is a JSON array of
//! `{name, begin_month, begin_day, end_month, end_day}` objects; every
//! registered season flows through tagging, aggregation, and export
//! automatically.

use std::fs::File;
use std::path::Path;

use crate::domain::Season;
use crate::error::AppError;

/// Read season definitions from a JSON file.
pub fn read_seasons_json(path: &Path) -> Result<Vec<Season>, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open seasons JSON '{}': {e}", path.display()))
    })?;
    let seasons: Vec<Season> = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid seasons JSON: {e}")))?;

    if seasons.is_empty() {
        return Err(AppError::new(2, "Seasons JSON defines no seasons."));
    }
    for season in &seasons {
        if season.name.is_empty() {
            return Err(AppError::new(2, "Season with an empty name."));
        }
        for (what, month, day) in [
            ("begin", season.begin_month, season.begin_day),
            ("end", season.end_month, season.end_day),
        ] {
            if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
                return Err(AppError::new(
                    2,
                    format!(
                        "Season '{}': {what} ({month}, {day}) is not a calendar date.",
                        season.name
                    ),
                ));
            }
        }
    }

    let mut names: Vec<&str> = seasons.iter().map(|s| s.name.as_str()).collect();
    names.sort_unstable();
    names.dedup();
    if names.len() != seasons.len() {
        return Err(AppError::new(2, "Season names must be unique."));
    }

    Ok(seasons)
}
