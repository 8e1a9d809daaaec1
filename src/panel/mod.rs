//! Panel construction.
//!
//! `daily` expands the sparse day-count-indexed price series into a dense
//! daily timeline, stamps each day with its solar date, tags season
//! membership, and collapses the tags back to per-observation season-day
//! counts. `aggregate` then computes the output panel: forward growth
//! rates, day gaps, and fractional season exposures.

pub mod aggregate;
pub mod daily;

pub use aggregate::{AggregateStats, build_panel};
pub use daily::{dedup_prices, expand_daily, slot_meta, summarize_slots};
