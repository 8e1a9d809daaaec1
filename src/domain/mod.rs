//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the calendar vocabulary (`LunarMonth`, `MonthPart`, `SolarDate`)
//! - the observation lifecycle structs (`RawRecord` → `RawObservation` →
//!   `DatedObservation` → `PricePoint` → `PanelRow`)
//! - run configuration (`Criterion`, `Season`, `PanelConfig`)

pub mod types;

pub use types::*;
