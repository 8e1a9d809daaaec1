//! Boundary I/O.
//!
//! The core pipeline works on in-memory tables; these modules are the thin
//! collaborators at its edges:
//!
//! - `ingest`: observations CSV → raw records
//! - `mapping`: conversion-table CSV → [`crate::calendar::LunarTable`]
//! - `seasons`: optional season-definition JSON
//! - `export`: panel CSVs (per-criterion columns + fixed reference columns)

pub mod export;
pub mod ingest;
pub mod mapping;
pub mod seasons;
