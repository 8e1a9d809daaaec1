//! Conversion-table CSV loading.
//!
//! The table is reference data with a fixed contract: every row must parse,
//! keys must be unique, and the mapped first-of-month dates must be
//! calendar-valid. Unlike the observations file, any defect here is fatal:
//! a hole in the table would silently mis-date records.
//!
//! Expected columns: `year` (BC year in which the lunar year begins),
//! `month` (lunar month, either notation), `first_month`, `first_day`
//! (solar date of the month's first day).

use std::fs::File;
use std::path::Path;

use crate::calendar::LunarTable;
use crate::domain::LunarMonth;
use crate::error::AppError;

/// Load the lunar→solar conversion table.
pub fn load_lunar_table(path: &Path) -> Result<LunarTable, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open conversion table '{}': {e}", path.display()))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read conversion-table headers: {e}")))?;
    let mut year_idx = None;
    let mut month_idx = None;
    let mut first_month_idx = None;
    let mut first_day_idx = None;
    for (idx, name) in headers.iter().enumerate() {
        match name.trim().trim_start_matches('\u{feff}').to_ascii_lowercase().as_str() {
            "year" => year_idx = Some(idx),
            "month" => month_idx = Some(idx),
            "first_month" => first_month_idx = Some(idx),
            "first_day" => first_day_idx = Some(idx),
            _ => {}
        }
    }
    let (Some(year_idx), Some(month_idx), Some(first_month_idx), Some(first_day_idx)) =
        (year_idx, month_idx, first_month_idx, first_day_idx)
    else {
        return Err(AppError::new(
            2,
            "Conversion table must have `year`, `month`, `first_month`, and `first_day` columns.",
        ));
    };

    let mut table = LunarTable::new();
    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        let record = result
            .map_err(|e| AppError::new(2, format!("Conversion table line {line}: {e}")))?;

        let field = |i: usize| record.get(i).map(str::trim).unwrap_or("");

        let year: i32 = field(year_idx)
            .parse()
            .map_err(|_| bad_line(line, "year", field(year_idx)))?;
        let month = LunarMonth::from_label(field(month_idx))
            .ok_or_else(|| bad_line(line, "month", field(month_idx)))?;
        let first_month: u32 = field(first_month_idx)
            .parse()
            .map_err(|_| bad_line(line, "first_month", field(first_month_idx)))?;
        let first_day: u32 = field(first_day_idx)
            .parse()
            .map_err(|_| bad_line(line, "first_day", field(first_day_idx)))?;

        if !(1..=12).contains(&first_month) || !(1..=31).contains(&first_day) {
            return Err(AppError::new(
                2,
                format!("Conversion table line {line}: ({first_month}, {first_day}) is not a calendar date."),
            ));
        }

        if table.insert(year, month, first_month, first_day).is_some() {
            return Err(AppError::new(
                2,
                format!(
                    "Conversion table line {line}: duplicate entry for year {year}, month {}.",
                    month.name()
                ),
            ));
        }
    }

    if table.is_empty() {
        return Err(AppError::new(2, "Conversion table contains no entries."));
    }

    Ok(table)
}

fn bad_line(line: usize, name: &str, value: &str) -> AppError {
    AppError::new(2, format!("Conversion table line {line}: invalid `{name}` value '{value}'."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_csv(content: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("bab-mapping-{}-{}.csv", std::process::id(), content.len()));
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_both_month_notations() {
        let path = write_temp_csv(
            "year,month,first_month,first_day\n350,Nisanu,3,28\n350,II,4,27\n",
        );
        let table = load_lunar_table(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(table.len(), 2);
        assert_eq!(table.first_solar_day(350, LunarMonth::Nisanu), Some((3, 28)));
        assert_eq!(table.first_solar_day(350, LunarMonth::Aiaru), Some((4, 27)));
    }

    #[test]
    fn duplicates_and_bad_rows_are_fatal() {
        let dup = write_temp_csv(
            "year,month,first_month,first_day\n350,I,3,28\n350,Nisanu,3,29\n",
        );
        assert_eq!(load_lunar_table(&dup).unwrap_err().exit_code(), 2);
        std::fs::remove_file(&dup).ok();

        let bad = write_temp_csv("year,month,first_month,first_day\n350,I,13,28\n");
        assert_eq!(load_lunar_table(&bad).unwrap_err().exit_code(), 2);
        std::fs::remove_file(&bad).ok();

        let garbled = write_temp_csv("year,month,first_month,first_day\n350,II?,3,28\n");
        assert_eq!(load_lunar_table(&garbled).unwrap_err().exit_code(), 2);
        std::fs::remove_file(&garbled).ok();
    }
}
