//! Observations CSV ingest.
//!
//! Turns the raw observations export into [`RawRecord`]s. Design goals,
//! shared with the rest of the boundary I/O:
//!
//! - **Strict schema** for the columns the pipeline cannot work without
//! - **Row-level tolerance**: a malformed row is reported and skipped, the
//!   file keeps loading
//! - **No interpretation**: month labels, classifications, and flags pass
//!   through verbatim; `normalize` owns their meaning

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::StringRecord;

use crate::domain::RawRecord;
use crate::error::AppError;

/// A row-level problem encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: raw records plus row-level diagnostics.
#[derive(Debug, Clone)]
pub struct IngestedRecords {
    pub records: Vec<RawRecord>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

const REQUIRED_COLUMNS: [&str; 5] = [
    "year",
    "month",
    "julian_year",
    "price_barley",
    "price_dates",
];

/// Load the observations CSV.
pub fn load_observations(path: &Path) -> Result<IngestedRecords, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open observations CSV '{}': {e}", path.display()))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    for name in REQUIRED_COLUMNS {
        if !header_map.contains_key(name) {
            return Err(AppError::new(2, format!("Missing required column: `{name}`")));
        }
    }

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header row; CSV lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &header_map, line) {
            Ok(raw) => records.push(raw),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    Ok(IngestedRecords {
        records,
        row_errors,
        rows_read,
    })
}

fn parse_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
    line: usize,
) -> Result<RawRecord, String> {
    Ok(RawRecord {
        line,
        year_label: parse_opt_i32(get_optional(record, header_map, "year"), "year")?,
        month_label: get_optional(record, header_map, "month").map(str::to_string),
        year_bc: parse_opt_i32(get_optional(record, header_map, "julian_year"), "julian_year")?,
        solar_month: parse_opt_u32(get_optional(record, header_map, "julian_month"), "julian_month")?,
        solar_day: parse_opt_u32(get_optional(record, header_map, "julian_day"), "julian_day")?,
        part_v0: get_optional(record, header_map, "part_v0").map(str::to_string),
        part_v1: get_optional(record, header_map, "part_v1").map(str::to_string),
        price_barley: parse_opt_f64(get_optional(record, header_map, "price_barley"), "price_barley")?,
        price_dates: parse_opt_f64(get_optional(record, header_map, "price_dates"), "price_dates")?,
        uncertain_barley: parse_opt_flag(get_optional(record, header_map, "uncertain_barley"), "uncertain_barley")?,
        uncertain_dates: parse_opt_flag(get_optional(record, header_map, "uncertain_dates"), "uncertain_dates")?,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel exports sometimes prefix the first header with a UTF-8 BOM;
    // without stripping it the schema check would report a missing column.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn get_optional<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_opt_i32(s: Option<&str>, name: &str) -> Result<Option<i32>, String> {
    let Some(s) = s else { return Ok(None) };
    s.parse::<i32>()
        .map(Some)
        .map_err(|_| format!("Invalid `{name}` value '{s}' (expected an integer)."))
}

fn parse_opt_u32(s: Option<&str>, name: &str) -> Result<Option<u32>, String> {
    let Some(s) = s else { return Ok(None) };
    s.parse::<u32>()
        .map(Some)
        .map_err(|_| format!("Invalid `{name}` value '{s}' (expected a non-negative integer)."))
}

fn parse_opt_f64(s: Option<&str>, name: &str) -> Result<Option<f64>, String> {
    let Some(s) = s else { return Ok(None) };
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(format!("Invalid `{name}` value '{s}' (expected a finite number).")),
    }
}

/// Flags arrive as `0`/`1` (sometimes written as floats) or `true`/`false`.
fn parse_opt_flag(s: Option<&str>, name: &str) -> Result<Option<bool>, String> {
    let Some(s) = s else { return Ok(None) };
    match s.to_ascii_lowercase().as_str() {
        "true" => return Ok(Some(true)),
        "false" => return Ok(Some(false)),
        _ => {}
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v != 0.0)),
        _ => Err(format!("Invalid `{name}` value '{s}' (expected 0/1 or true/false).")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_csv(content: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("bab-ingest-{}-{}.csv", std::process::id(), content.len()));
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_rows_and_reports_bad_ones() {
        let path = write_temp_csv(
            "year,month,julian_year,julian_month,julian_day,part_v0,part_v1,price_barley,price_dates,uncertain_barley,uncertain_dates\n\
             -349,I ,350,,,b,b,10.0,5.0,0.0,0.0\n\
             -349,II,350,,,m,,abc,5.0,1.0,0.0\n\
             ,,,,,,,,,,\n",
        );

        let ingested = load_observations(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(ingested.rows_read, 3);
        assert_eq!(ingested.records.len(), 2);
        assert_eq!(ingested.row_errors.len(), 1);
        assert_eq!(ingested.row_errors[0].line, 3);

        let first = &ingested.records[0];
        assert_eq!(first.year_label, Some(-349));
        assert_eq!(first.month_label.as_deref(), Some("I"));
        assert_eq!(first.year_bc, Some(350));
        assert_eq!(first.price_barley, Some(10.0));
        assert_eq!(first.uncertain_barley, Some(false));

        // The all-empty row survives as an all-None record; normalize drops it.
        let empty = &ingested.records[1];
        assert_eq!(empty.year_label, None);
        assert_eq!(empty.month_label, None);
    }

    #[test]
    fn missing_required_column_is_fatal() {
        let path = write_temp_csv("year,month,price_barley,price_dates\n-349,I,10,5\n");
        let err = load_observations(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("julian_year"));
    }

    #[test]
    fn flag_spellings_parse() {
        assert_eq!(parse_opt_flag(Some("1.0"), "f").unwrap(), Some(true));
        assert_eq!(parse_opt_flag(Some("0"), "f").unwrap(), Some(false));
        assert_eq!(parse_opt_flag(Some("TRUE"), "f").unwrap(), Some(true));
        assert!(parse_opt_flag(Some("maybe"), "f").is_err());
        assert_eq!(parse_opt_flag(None, "f").unwrap(), None);
    }
}
