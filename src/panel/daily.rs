//! Daily expansion and season tagging.
//!
//! The observation series is irregular; season exposure is defined on
//! calendar days. The bridge is a dense timeline covering every day from
//! the first observation to the last:
//!
//! 1. deduplicate observations sharing a day count (unweighted mean)
//! 2. expand to one record per day, each at the `+0.5` midnight convention
//! 3. stamp every day with its solar date and season membership
//! 4. forward-fill the owning day count ("slot") across the gaps
//! 5. sum season flags per slot, giving season-days per interval

use crate::calendar::{DateError, to_calendar_date};
use crate::domain::{DailyRecord, DatedObservation, PricePoint, Season, SlotMeta, SlotSummary};

/// Collapse observations sharing a day count into one price point per day.
///
/// Log prices are averaged unweighted, skipping a missing side; a day
/// retaining no value for either commodity is dropped. Output is sorted by
/// day count.
pub fn dedup_prices(selected: &[DatedObservation]) -> Vec<PricePoint> {
    let mut sorted: Vec<&DatedObservation> = selected.iter().collect();
    sorted.sort_by(|a, b| a.day_count.total_cmp(&b.day_count));

    let mut out = Vec::new();
    let mut i = 0;
    while i < sorted.len() {
        let day_count = sorted[i].day_count;
        let mut j = i;
        let mut barley = MeanAcc::default();
        let mut dates = MeanAcc::default();
        while j < sorted.len() && sorted[j].day_count == day_count {
            barley.push(sorted[j].obs.log_barley);
            dates.push(sorted[j].obs.log_dates);
            j += 1;
        }
        if let (Some(log_barley), Some(log_dates)) = (barley.mean(), dates.mean()) {
            out.push(PricePoint {
                day_count,
                log_barley,
                log_dates,
            });
        }
        i = j;
    }
    out
}

#[derive(Default)]
struct MeanAcc {
    sum: f64,
    n: usize,
}

impl MeanAcc {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.n += 1;
        }
    }

    fn mean(&self) -> Option<f64> {
        if self.n == 0 {
            None
        } else {
            Some(self.sum / self.n as f64)
        }
    }
}

/// Calendar metadata per day count, first occurrence wins.
///
/// Taken over the full dated set (before subset selection), so a day count
/// retained by any criterion resolves to the same metadata.
pub fn slot_meta(dated: &[DatedObservation]) -> Vec<SlotMeta> {
    let mut sorted: Vec<&DatedObservation> = dated.iter().collect();
    sorted.sort_by(|a, b| a.day_count.total_cmp(&b.day_count));
    sorted.dedup_by(|a, b| a.day_count == b.day_count);

    sorted
        .into_iter()
        .map(|d| SlotMeta {
            day_count: d.day_count,
            year_label: d.obs.year_label,
            month: d.obs.month,
            part_v0: d.obs.part_v0,
            part_v1: d.obs.part_v1,
        })
        .collect()
}

/// Expand sorted price points into a dense daily timeline.
///
/// Every integer day between the first and last observation appears once,
/// offset by `+0.5`. `slot` forward-fills the day count of the most recent
/// observation at or before the day; the first day is an observation day,
/// so no leading gap exists.
pub fn expand_daily(points: &[PricePoint], seasons: &[Season]) -> Result<Vec<DailyRecord>, DateError> {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Ok(Vec::new());
    };
    let first_day = (first.day_count - 0.5).floor() as i64;
    let last_day = (last.day_count - 0.5).floor() as i64;

    let mut out = Vec::with_capacity((last_day - first_day + 1) as usize);
    let mut slot = None;
    let mut next_point = 0;

    for d in first_day..=last_day {
        let day = d as f64 + 0.5;
        while next_point < points.len() && points[next_point].day_count <= day {
            slot = Some(points[next_point].day_count);
            next_point += 1;
        }
        let solar = to_calendar_date(day)?;
        let flags = seasons
            .iter()
            .map(|s| s.contains(solar.month, solar.day))
            .collect();
        out.push(DailyRecord {
            day,
            slot,
            solar,
            seasons: flags,
        });
    }
    Ok(out)
}

/// Sum season flags per slot.
///
/// A slot's group covers the observation day itself and every day up to
/// (not including) the next observation; its solar date is the one of the
/// observation day. Days without a slot are skipped.
pub fn summarize_slots(daily: &[DailyRecord]) -> Vec<SlotSummary> {
    let mut out: Vec<SlotSummary> = Vec::new();
    for record in daily {
        let Some(slot) = record.slot else { continue };
        match out.last_mut() {
            Some(current) if current.day_count == slot => {
                for (total, &flag) in current.season_days.iter_mut().zip(&record.seasons) {
                    *total += f64::from(u8::from(flag));
                }
            }
            _ => out.push(SlotSummary {
                day_count: slot,
                solar: record.solar,
                season_days: record.seasons.iter().map(|&f| f64::from(u8::from(f))).collect(),
            }),
        }
    }
    out
}
