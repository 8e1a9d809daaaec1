//! Shared domain types.
//!
//! These types are intentionally lightweight so they can be:
//!
//! - passed between pipeline stages by value
//! - exported to CSV
//! - constructed directly in tests

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// The Babylonian lunar calendar has 12 ordinary months plus two intercalary
/// variants (a second Ululu and a second Addaru), inserted to keep the lunar
/// year aligned with the agricultural one.
///
/// Source records label months with Roman numerals (`I`..`XII`, `VIB`,
/// `XIIB`); the conversion tables use the Babylonian names. Both spellings
/// parse via [`LunarMonth::from_label`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LunarMonth {
    Nisanu,
    Aiaru,
    Simanu,
    Duzu,
    Abu,
    Ululu,
    UluluII,
    Tashritu,
    Arahsamnu,
    Kislimu,
    Tebetu,
    Shabatu,
    Addaru,
    AddaruII,
}

impl LunarMonth {
    /// All months in calendar order (intercalary months after their base month).
    pub const ALL: [LunarMonth; 14] = [
        LunarMonth::Nisanu,
        LunarMonth::Aiaru,
        LunarMonth::Simanu,
        LunarMonth::Duzu,
        LunarMonth::Abu,
        LunarMonth::Ululu,
        LunarMonth::UluluII,
        LunarMonth::Tashritu,
        LunarMonth::Arahsamnu,
        LunarMonth::Kislimu,
        LunarMonth::Tebetu,
        LunarMonth::Shabatu,
        LunarMonth::Addaru,
        LunarMonth::AddaruII,
    ];

    /// Parse a month label in either notation.
    ///
    /// The label is trimmed and upper-cased, then matched exactly. Anything
    /// else (ambiguous readings like `II?`, ranges like `I-IV`, alternatives
    /// like `I of XIIB`) yields `None`, and the record is dropped downstream.
    pub fn from_label(label: &str) -> Option<Self> {
        let canon = label.trim().to_ascii_uppercase();
        let month = match canon.as_str() {
            "I" | "NISANU" => LunarMonth::Nisanu,
            "II" | "AIARU" => LunarMonth::Aiaru,
            "III" | "SIMANU" => LunarMonth::Simanu,
            "IV" | "DUZU" => LunarMonth::Duzu,
            "V" | "ABU" => LunarMonth::Abu,
            "VI" | "ULULU" => LunarMonth::Ululu,
            "VIB" | "ULULU II" => LunarMonth::UluluII,
            "VII" | "TASHRITU" => LunarMonth::Tashritu,
            "VIII" | "ARAHSAMNU" => LunarMonth::Arahsamnu,
            "IX" | "KISLIMU" => LunarMonth::Kislimu,
            "X" | "TEBETU" => LunarMonth::Tebetu,
            "XI" | "SHABATU" => LunarMonth::Shabatu,
            "XII" | "ADDARU" => LunarMonth::Addaru,
            "XIIB" | "ADDARU II" => LunarMonth::AddaruII,
            _ => return None,
        };
        Some(month)
    }

    /// Babylonian month name.
    pub fn name(self) -> &'static str {
        match self {
            LunarMonth::Nisanu => "Nisanu",
            LunarMonth::Aiaru => "Aiaru",
            LunarMonth::Simanu => "Simanu",
            LunarMonth::Duzu => "Duzu",
            LunarMonth::Abu => "Abu",
            LunarMonth::Ululu => "Ululu",
            LunarMonth::UluluII => "Ululu II",
            LunarMonth::Tashritu => "Tashritu",
            LunarMonth::Arahsamnu => "Arahsamnu",
            LunarMonth::Kislimu => "Kislimu",
            LunarMonth::Tebetu => "Tebetu",
            LunarMonth::Shabatu => "Shabatu",
            LunarMonth::Addaru => "Addaru",
            LunarMonth::AddaruII => "Addaru II",
        }
    }

    /// Roman-numeral label as used in the source records.
    pub fn label(self) -> &'static str {
        match self {
            LunarMonth::Nisanu => "I",
            LunarMonth::Aiaru => "II",
            LunarMonth::Simanu => "III",
            LunarMonth::Duzu => "IV",
            LunarMonth::Abu => "V",
            LunarMonth::Ululu => "VI",
            LunarMonth::UluluII => "VIB",
            LunarMonth::Tashritu => "VII",
            LunarMonth::Arahsamnu => "VIII",
            LunarMonth::Kislimu => "IX",
            LunarMonth::Tebetu => "X",
            LunarMonth::Shabatu => "XI",
            LunarMonth::Addaru => "XII",
            LunarMonth::AddaruII => "XIIB",
        }
    }
}

/// Where within its lunar month an observation falls.
///
/// The conversion tables give the first solar day of each lunar month; the
/// part classification picks the day offset added on top: a record from the
/// beginning of the month is dated 4 days in, middle 14, end 24.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthPart {
    Begin,
    Middle,
    End,
}

impl MonthPart {
    /// Parse the single-letter classification used in the source columns.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "b" => Some(MonthPart::Begin),
            "m" => Some(MonthPart::Middle),
            "e" => Some(MonthPart::End),
            _ => None,
        }
    }

    /// Days added to the first solar day of the lunar month.
    pub fn day_offset(self) -> f64 {
        match self {
            MonthPart::Begin => 4.0,
            MonthPart::Middle => 14.0,
            MonthPart::End => 24.0,
        }
    }
}

/// Which part-classification scheme a criterion filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassVersion {
    V0,
    V1,
}

/// Criterion selection on the command line.
///
/// `All` runs the four concrete criteria as independent pipeline invocations
/// and writes one output per criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CriterionSpec {
    All,
    V0All,
    V0Certain,
    V1All,
    V1Certain,
}

impl CriterionSpec {
    /// Expand to the concrete criteria to run.
    pub fn to_criteria(self) -> Vec<Criterion> {
        match self {
            CriterionSpec::All => vec![
                Criterion::V1All,
                Criterion::V1Certain,
                Criterion::V0All,
                Criterion::V0Certain,
            ],
            CriterionSpec::V0All => vec![Criterion::V0All],
            CriterionSpec::V0Certain => vec![Criterion::V0Certain],
            CriterionSpec::V1All => vec![Criterion::V1All],
            CriterionSpec::V1Certain => vec![Criterion::V1Certain],
        }
    }
}

/// A concrete inclusion criterion: which classification version must be
/// defined, and whether uncertain (italic-flagged) prices are excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Criterion {
    V0All,
    V0Certain,
    V1All,
    V1Certain,
}

impl Criterion {
    pub fn version(self) -> ClassVersion {
        match self {
            Criterion::V0All | Criterion::V0Certain => ClassVersion::V0,
            Criterion::V1All | Criterion::V1Certain => ClassVersion::V1,
        }
    }

    /// Whether uncertain observations are excluded.
    pub fn certain_only(self) -> bool {
        matches!(self, Criterion::V0Certain | Criterion::V1Certain)
    }

    /// Short identifier used in logs and the run summary.
    pub fn label(self) -> &'static str {
        match self {
            Criterion::V0All => "v0_all",
            Criterion::V0Certain => "v0_cert",
            Criterion::V1All => "v1_all",
            Criterion::V1Certain => "v1_cert",
        }
    }

    /// Column-name suffix that keeps the four criterion outputs mergeable
    /// without collisions.
    pub fn suffix(self) -> String {
        format!("__{}", self.label())
    }
}

/// A proleptic solar-calendar date (astronomical year numbering; year 0 = 1 BCE).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

/// A growing/harvest window on the solar calendar, spanning whole months
/// except for partial begin/end months.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Season {
    pub name: String,
    pub begin_month: u32,
    pub begin_day: u32,
    pub end_month: u32,
    pub end_day: u32,
}

impl Season {
    pub fn new(name: &str, begin_month: u32, begin_day: u32, end_month: u32, end_day: u32) -> Self {
        Self {
            name: name.to_string(),
            begin_month,
            begin_day,
            end_month,
            end_day,
        }
    }

    /// Season membership for a solar (month, day).
    pub fn contains(&self, month: u32, day: u32) -> bool {
        (month == self.begin_month && day >= self.begin_day)
            || (month > self.begin_month && month < self.end_month)
            || (month == self.end_month && day <= self.end_day)
    }

    /// The two default windows: barley (Mar 1 to May 30) and dates (Aug 1 to Oct 30).
    pub fn defaults() -> Vec<Season> {
        vec![
            Season::new("barley_season", 3, 1, 5, 30),
            Season::new("dates_season", 8, 1, 10, 30),
        ]
    }
}

/// Configuration of a single pipeline run.
#[derive(Debug, Clone)]
pub struct PanelConfig {
    pub criterion: Criterion,
    /// Growth rates are per `scale_factor` days (10 = per ten days; use 30
    /// for per-month).
    pub scale_factor: f64,
    /// Intervals longer than this many days are dropped as unreliable.
    pub max_day_gap: f64,
    pub seasons: Vec<Season>,
}

impl PanelConfig {
    pub fn new(criterion: Criterion) -> Self {
        Self {
            criterion,
            scale_factor: 10.0,
            max_day_gap: 180.0,
            seasons: Season::defaults(),
        }
    }
}

/// A raw row of the observations table (everything optional).
///
/// Field-level validation happens in `normalize`; keeping the raw shape here
/// lets ingest report per-row problems without losing the rest of the file.
#[derive(Debug, Clone, Default)]
pub struct RawRecord {
    /// 1-based source line, for drop diagnostics.
    pub line: usize,
    /// Lunar-calendar year label, astronomical numbering (negative for BCE).
    pub year_label: Option<i32>,
    /// Raw month label, possibly malformed.
    pub month_label: Option<String>,
    /// Solar-calendar year of the observation, BC numbering (positive).
    pub year_bc: Option<i32>,
    /// Directly recorded solar month/day (later records only).
    pub solar_month: Option<u32>,
    pub solar_day: Option<u32>,
    /// Part-of-month classifications, two alternative schemes.
    pub part_v0: Option<String>,
    pub part_v1: Option<String>,
    /// Price levels (litres of commodity per shekel of silver).
    pub price_barley: Option<f64>,
    pub price_dates: Option<f64>,
    /// Uncertainty flags derived upstream from italic typography.
    pub uncertain_barley: Option<bool>,
    pub uncertain_dates: Option<bool>,
}

/// A normalized observation: canonical month, parsed classifications, log
/// prices. Produced by `normalize`, not yet dated.
#[derive(Debug, Clone)]
pub struct RawObservation {
    pub year_label: i32,
    pub year_bc: i32,
    pub month: LunarMonth,
    pub solar_month: Option<u32>,
    pub solar_day: Option<u32>,
    pub part_v0: Option<MonthPart>,
    pub part_v1: Option<MonthPart>,
    pub log_barley: Option<f64>,
    pub log_dates: Option<f64>,
    /// A missing upstream flag counts as uncertain.
    pub uncertain_barley: bool,
    pub uncertain_dates: bool,
}

/// An observation with its assigned day count.
#[derive(Debug, Clone)]
pub struct DatedObservation {
    pub day_count: f64,
    pub obs: RawObservation,
}

impl DatedObservation {
    pub fn part(&self, version: ClassVersion) -> Option<MonthPart> {
        match version {
            ClassVersion::V0 => self.obs.part_v0,
            ClassVersion::V1 => self.obs.part_v1,
        }
    }
}

/// Deduplicated log prices for one day count (mean over merged observations).
#[derive(Debug, Clone, Copy)]
pub struct PricePoint {
    pub day_count: f64,
    pub log_barley: f64,
    pub log_dates: f64,
}

/// Calendar metadata carried per day count, taken from the first observation
/// assigned to it (over the full dated set, before subset selection).
#[derive(Debug, Clone)]
pub struct SlotMeta {
    pub day_count: f64,
    pub year_label: i32,
    pub month: LunarMonth,
    pub part_v0: Option<MonthPart>,
    pub part_v1: Option<MonthPart>,
}

/// One day of the expanded timeline.
///
/// `slot` is the forward-filled day count of the most recent observation at
/// or before this day; season flags are positional against the configured
/// season list.
#[derive(Debug, Clone)]
pub struct DailyRecord {
    pub day: f64,
    pub slot: Option<f64>,
    pub solar: SolarDate,
    pub seasons: Vec<bool>,
}

/// Per-slot season-day totals: how many days of the interval owned by this
/// day count fall inside each season.
#[derive(Debug, Clone)]
pub struct SlotSummary {
    pub day_count: f64,
    pub solar: SolarDate,
    pub season_days: Vec<f64>,
}

/// One row of the output panel.
///
/// Growth rates are forward-looking (toward the next observation) and scaled
/// to `scale_factor` days; season fractions give the share of the interval
/// inside each season, with `complement = 1 - fraction`.
#[derive(Debug, Clone)]
pub struct PanelRow {
    pub day_count: f64,
    pub year_label: i32,
    pub month: LunarMonth,
    pub part_v0: Option<MonthPart>,
    pub part_v1: Option<MonthPart>,
    pub solar: SolarDate,
    pub log_barley: f64,
    pub log_dates: f64,
    pub growth_barley: f64,
    pub growth_dates: f64,
    pub growth_diff: f64,
    pub day_gap: f64,
    pub season_fraction: Vec<f64>,
    pub season_complement: Vec<f64>,
}
