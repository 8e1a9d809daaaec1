//! Panel aggregation.
//!
//! Collapses the daily work back onto observation days and computes, per
//! row, the forward-looking quantities against the next observation:
//! day gap, scaled growth rates, and fractional season exposures.

use crate::domain::{PanelConfig, PanelRow, PricePoint, SlotMeta, SlotSummary};

/// Accounting for the aggregation stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateStats {
    pub price_points: usize,
    /// The chronologically last observation has no successor interval.
    pub dropped_no_successor: usize,
    pub dropped_long_gap: usize,
    pub panel_rows: usize,
}

/// Build the output panel from the deduplicated price series, the per-slot
/// season-day totals, and the per-day-count calendar metadata.
///
/// All three inputs are sorted by day count; the joins are inner, so a day
/// count must appear in all of them to yield a row.
pub fn build_panel(
    points: &[PricePoint],
    slots: &[SlotSummary],
    meta: &[SlotMeta],
    config: &PanelConfig,
) -> (Vec<PanelRow>, AggregateStats) {
    let mut stats = AggregateStats {
        price_points: points.len(),
        ..AggregateStats::default()
    };

    // Inner-join the three day-count-keyed sequences.
    let mut joined = Vec::with_capacity(points.len());
    let mut slot_idx = 0;
    let mut meta_idx = 0;
    for point in points {
        while slot_idx < slots.len() && slots[slot_idx].day_count < point.day_count {
            slot_idx += 1;
        }
        while meta_idx < meta.len() && meta[meta_idx].day_count < point.day_count {
            meta_idx += 1;
        }
        let slot = slots.get(slot_idx).filter(|s| s.day_count == point.day_count);
        let m = meta.get(meta_idx).filter(|m| m.day_count == point.day_count);
        if let (Some(slot), Some(m)) = (slot, m) {
            joined.push((point, slot, m));
        }
    }

    let mut rows = Vec::with_capacity(joined.len().saturating_sub(1));
    for window in joined.windows(2) {
        let (point, slot, m) = window[0];
        let (next, _, _) = window[1];

        let day_gap = next.day_count - point.day_count;
        if day_gap <= 0.0 {
            continue;
        }
        if day_gap > config.max_day_gap {
            stats.dropped_long_gap += 1;
            continue;
        }

        let growth_barley = (next.log_barley - point.log_barley) / day_gap * config.scale_factor;
        let growth_dates = (next.log_dates - point.log_dates) / day_gap * config.scale_factor;

        let season_fraction: Vec<f64> =
            slot.season_days.iter().map(|&days| days / day_gap).collect();
        let season_complement = season_fraction.iter().map(|&f| 1.0 - f).collect();

        rows.push(PanelRow {
            day_count: point.day_count,
            year_label: m.year_label,
            month: m.month,
            part_v0: m.part_v0,
            part_v1: m.part_v1,
            solar: slot.solar,
            log_barley: point.log_barley,
            log_dates: point.log_dates,
            growth_barley,
            growth_dates,
            growth_diff: growth_barley - growth_dates,
            day_gap,
            season_fraction,
            season_complement,
        });
    }

    if !joined.is_empty() {
        stats.dropped_no_successor = 1;
    }
    stats.panel_rows = rows.len();
    (rows, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Criterion, LunarMonth, SolarDate};

    fn config() -> PanelConfig {
        PanelConfig::new(Criterion::V1All)
    }

    fn point(day_count: f64, log_barley: f64, log_dates: f64) -> PricePoint {
        PricePoint {
            day_count,
            log_barley,
            log_dates,
        }
    }

    fn slot(day_count: f64, season_days: &[f64]) -> SlotSummary {
        SlotSummary {
            day_count,
            solar: SolarDate { year: -330, month: 4, day: 5 },
            season_days: season_days.to_vec(),
        }
    }

    fn meta(day_count: f64) -> SlotMeta {
        SlotMeta {
            day_count,
            year_label: -330,
            month: LunarMonth::Simanu,
            part_v0: None,
            part_v1: None,
        }
    }

    #[test]
    fn growth_follows_the_per_ten_days_convention() {
        let points = vec![
            point(1_600_000.5, 10.0f64.ln(), 5.0f64.ln()),
            point(1_600_007.5, 12.0f64.ln(), 5.0f64.ln()),
        ];
        let slots = vec![slot(1_600_000.5, &[3.0]), slot(1_600_007.5, &[1.0])];
        let metas = vec![meta(1_600_000.5), meta(1_600_007.5)];

        let (rows, stats) = build_panel(&points, &slots, &metas, &config());
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.day_gap, 7.0);
        let expected = (12.0f64.ln() - 10.0f64.ln()) / 7.0 * 10.0;
        assert!((row.growth_barley - expected).abs() < 1e-12);
        assert!(row.growth_dates.abs() < 1e-12);
        assert!((row.growth_diff - expected).abs() < 1e-12);
        assert_eq!(stats.dropped_no_successor, 1);
        assert_eq!(stats.panel_rows, 1);
    }

    #[test]
    fn fractions_and_complements_sum_to_one_within_bounds() {
        let points = vec![
            point(1_600_000.5, 1.0, 1.0),
            point(1_600_010.5, 1.1, 1.2),
            point(1_600_030.5, 1.2, 1.1),
        ];
        let slots = vec![
            slot(1_600_000.5, &[4.0, 0.0]),
            slot(1_600_010.5, &[20.0, 7.0]),
            slot(1_600_030.5, &[1.0, 0.0]),
        ];
        let metas = vec![meta(1_600_000.5), meta(1_600_010.5), meta(1_600_030.5)];

        let (rows, _) = build_panel(&points, &slots, &metas, &config());
        assert_eq!(rows.len(), 2);
        for row in &rows {
            for (fraction, complement) in row.season_fraction.iter().zip(&row.season_complement) {
                assert!(*fraction >= 0.0 && *fraction <= 1.0);
                assert!((fraction + complement - 1.0).abs() < 1e-12);
            }
        }
        assert_eq!(rows[0].season_fraction[0], 0.4);
        assert_eq!(rows[1].season_fraction[0], 1.0);
        assert_eq!(rows[1].season_fraction[1], 0.35);
    }

    #[test]
    fn long_gaps_are_dropped_and_counted() {
        let points = vec![
            point(1_600_000.5, 1.0, 1.0),
            point(1_600_200.5, 1.1, 1.2),
            point(1_600_210.5, 1.2, 1.1),
        ];
        let slots = vec![
            slot(1_600_000.5, &[]),
            slot(1_600_200.5, &[]),
            slot(1_600_210.5, &[]),
        ];
        let metas = vec![meta(1_600_000.5), meta(1_600_200.5), meta(1_600_210.5)];

        let (rows, stats) = build_panel(&points, &slots, &metas, &config());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].day_count, 1_600_200.5);
        assert_eq!(stats.dropped_long_gap, 1);
        assert!(rows.iter().all(|r| r.day_gap > 0.0 && r.day_gap <= 180.0));
    }

    #[test]
    fn metadata_joins_on_day_count() {
        let points = vec![point(1_600_000.5, 1.0, 1.0), point(1_600_001.5, 1.0, 1.0)];
        let slots = vec![slot(1_600_000.5, &[]), slot(1_600_001.5, &[])];
        // Metadata covers more day counts than the subset retains.
        let metas = vec![meta(1_599_990.5), meta(1_600_000.5), meta(1_600_001.5)];

        let (rows, _) = build_panel(&points, &slots, &metas, &config());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].month, LunarMonth::Simanu);
        assert_eq!(rows[0].solar, SolarDate { year: -330, month: 4, day: 5 });
    }

    #[test]
    fn empty_input_yields_an_empty_panel() {
        let (rows, stats) = build_panel(&[], &[], &[], &config());
        assert!(rows.is_empty());
        assert_eq!(stats.dropped_no_successor, 0);
    }
}
