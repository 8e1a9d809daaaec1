//! Day-count formulas.
//!
//! The day count used throughout the pipeline is the Julian Day at the
//! midnight *starting* a calendar day, i.e. `JDN - 0.5` where `JDN` is the
//! usual noon-referenced integer Julian Day Number.
//!
//! Two calendars are involved:
//!
//! - the **proleptic Julian calendar**: the conversion tables and the
//!   directly recorded dates of the early period are Julian. The ecosystem
//!   date crates only model the Gregorian calendar, so the standard
//!   closed-form Julian formula is implemented here. All intermediate
//!   divisions truncate toward zero.
//! - the **proleptic Gregorian calendar**: used to stamp the expanded
//!   daily timeline. This side delegates to `chrono`, whose `NaiveDate` is
//!   proleptic Gregorian with astronomical year numbering (year 0 = 1 BCE),
//!   via day arithmetic against the day-count epoch.

use chrono::{Datelike, NaiveDate};

use crate::domain::SolarDate;

/// Offset between a noon Julian Day Number and chrono's day count from
/// 0001-01-01 (Gregorian): `days_from_ce = JDN - 1_721_425`.
const JDN_TO_DAYS_FROM_CE: i64 = 1_721_425;

/// Day count of midnight starting the given proleptic Julian-calendar date.
pub fn julian_to_jd(year: i32, month: u32, day: u32) -> f64 {
    let y = year as i64;
    let m = month as i64;
    let d = day as i64;

    let mut jdn = 367 * y;
    jdn -= (7 * (y + 5001 + (m - 9) / 7)) / 4;
    jdn += (275 * m) / 9;
    jdn += d + 1_729_777;

    jdn as f64 - 0.5
}

/// Day count of midnight starting the given proleptic Gregorian date.
///
/// `None` if the (year, month, day) triple is not a valid Gregorian date.
pub fn gregorian_to_jd(year: i32, month: u32, day: u32) -> Option<f64> {
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let jdn = date.num_days_from_ce() as i64 + JDN_TO_DAYS_FROM_CE;
    Some(jdn as f64 - 0.5)
}

/// Proleptic Gregorian date of the day containing the given day count.
///
/// A day count of `N - 0.5` (midnight) and any instant up to the following
/// midnight map to the same calendar day. `None` only for day counts far
/// outside the representable date range.
pub fn jd_to_gregorian(jd: f64) -> Option<SolarDate> {
    let jdn = (jd + 0.5).floor() as i64;
    let days = i32::try_from(jdn - JDN_TO_DAYS_FROM_CE).ok()?;
    let date = NaiveDate::from_num_days_from_ce_opt(days)?;
    Some(SolarDate {
        year: date.year(),
        month: date.month(),
        day: date.day(),
    })
}

/// Whether `year` (astronomical numbering) is a Julian-calendar leap year.
pub fn is_julian_leap_year(year: i32) -> bool {
    year.rem_euclid(4) == 0
}

/// Days in a proleptic Julian-calendar month.
pub fn julian_days_in_month(year: i32, month: u32) -> Option<u32> {
    let days = match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_julian_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => return None,
    };
    Some(days)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn julian_matches_gregorian_at_the_1582_transition() {
        // Julian 1582-10-05 and Gregorian 1582-10-15 are the same day.
        let j = julian_to_jd(1582, 10, 5);
        let g = gregorian_to_jd(1582, 10, 15).unwrap();
        assert_eq!(j, g);
        assert_eq!(j, 2_299_160.5);
    }

    #[test]
    fn julian_ce_epoch_anchor() {
        // Julian 0001-01-01 is JDN 1721424 (noon), i.e. 1721423.5 at midnight,
        // two days behind the proleptic Gregorian 0001-01-01.
        assert_eq!(julian_to_jd(1, 1, 1), 1_721_423.5);
        assert_eq!(gregorian_to_jd(1, 1, 1).unwrap(), 1_721_425.5);
    }

    #[test]
    fn gregorian_round_trip() {
        for &(y, m, d) in &[
            (2000, 1, 1),
            (1999, 12, 31),
            (-330, 4, 3),
            (-63, 10, 29),
            (4, 2, 29),
        ] {
            let jd = gregorian_to_jd(y, m, d).unwrap();
            let back = jd_to_gregorian(jd).unwrap();
            assert_eq!(back, SolarDate { year: y, month: m, day: d }, "({y},{m},{d})");
        }
    }

    #[test]
    fn julian_day_counts_strictly_increase() {
        // Walk every day of a Julian leap year in the BCE range and check the
        // count advances by exactly one day.
        let year = -348; // rem_euclid(4) == 0 -> leap
        assert!(is_julian_leap_year(year));
        let mut prev = julian_to_jd(year, 1, 1);
        for month in 1..=12u32 {
            let len = julian_days_in_month(year, month).unwrap();
            for day in 1..=len {
                if (month, day) == (1, 1) {
                    continue;
                }
                let jd = julian_to_jd(year, month, day);
                assert_eq!(jd, prev + 1.0, "{year}-{month}-{day}");
                prev = jd;
            }
        }
        assert_eq!(julian_to_jd(year + 1, 1, 1), prev + 1.0);
        assert_eq!(julian_days_in_month(year, 2), Some(29));
        assert_eq!(julian_days_in_month(-347, 2), Some(28));
    }

    #[test]
    fn midnight_and_late_evening_fall_on_the_same_day() {
        let jd = gregorian_to_jd(-330, 9, 1).unwrap();
        assert_eq!(jd.fract().abs(), 0.5);
        let at_midnight = jd_to_gregorian(jd).unwrap();
        let late = jd_to_gregorian(jd + 0.9).unwrap();
        assert_eq!(at_midnight, late);
        assert_eq!(at_midnight, SolarDate { year: -330, month: 9, day: 1 });
    }

    #[test]
    fn rejects_invalid_gregorian_dates() {
        assert!(gregorian_to_jd(2001, 2, 29).is_none());
        assert!(gregorian_to_jd(2001, 13, 1).is_none());
        assert!(julian_days_in_month(-300, 0).is_none());
    }
}
