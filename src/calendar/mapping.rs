//! The lunar→solar first-of-month table.
//!
//! One entry per (lunar year, lunar month) gives the proleptic
//! Julian-calendar (month, day) on which that lunar month began. Years are
//! keyed by the BC year in which the lunar year starts (its Nisanu falls in
//! that solar year; later months may spill into the next).
//!
//! The table is reference data: loaded once, shared read-only by every
//! stage and criterion run, never mutated after load.

use std::collections::HashMap;

use crate::domain::LunarMonth;

#[derive(Debug, Clone, Default)]
pub struct LunarTable {
    entries: HashMap<(i32, LunarMonth), (u32, u32)>,
}

impl LunarTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry; returns the previous value if the key was already
    /// present (the loader treats that as a malformed table).
    pub fn insert(
        &mut self,
        year_bc: i32,
        month: LunarMonth,
        first_month: u32,
        first_day: u32,
    ) -> Option<(u32, u32)> {
        self.entries.insert((year_bc, month), (first_month, first_day))
    }

    /// Solar (month, day) of the first day of the given lunar month.
    pub fn first_solar_day(&self, year_bc: i32, month: LunarMonth) -> Option<(u32, u32)> {
        self.entries.get(&(year_bc, month)).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_hits_and_misses() {
        let mut table = LunarTable::new();
        assert!(table.is_empty());
        assert_eq!(table.insert(350, LunarMonth::Nisanu, 4, 3), None);
        assert_eq!(table.first_solar_day(350, LunarMonth::Nisanu), Some((4, 3)));
        assert_eq!(table.first_solar_day(350, LunarMonth::Aiaru), None);
        assert_eq!(table.first_solar_day(351, LunarMonth::Nisanu), None);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn duplicate_insert_reports_previous_value() {
        let mut table = LunarTable::new();
        table.insert(320, LunarMonth::Abu, 8, 12);
        assert_eq!(table.insert(320, LunarMonth::Abu, 8, 13), Some((8, 12)));
    }
}
