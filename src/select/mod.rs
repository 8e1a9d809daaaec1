//! Subset selection.
//!
//! Each pipeline run admits dated observations under exactly one criterion:
//! the chosen classification version must be defined, and the `certain`
//! variants additionally require both prices to be free of the uncertainty
//! flag. Day-count availability is implicit: selection runs on
//! observations that already carry a day count.

use crate::domain::{Criterion, DatedObservation};

impl Criterion {
    /// Whether this criterion admits the observation.
    pub fn admits(self, obs: &DatedObservation) -> bool {
        if obs.part(self.version()).is_none() {
            return false;
        }
        if self.certain_only() && (obs.obs.uncertain_barley || obs.obs.uncertain_dates) {
            return false;
        }
        true
    }
}

/// Filter dated observations down to the active subset.
pub fn select(dated: &[DatedObservation], criterion: Criterion) -> Vec<DatedObservation> {
    dated
        .iter()
        .filter(|obs| criterion.admits(obs))
        .cloned()
        .collect()
}
