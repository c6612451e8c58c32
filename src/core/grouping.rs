//! Grouping of closely spaced hits into single pulses.
//!
//! Raw photon hits on a sensor are often merged before summarising: any hit
//! arriving within the grouping window of the previous hit joins the same
//! group. A group is reported at the time of its first hit with the summed
//! charge of all its hits.

use crate::core::stats::sort_by_time;
use crate::error::{SummaryError, SummaryResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Hits merged into time groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupedHits {
    /// Time of the first hit of each group, non-decreasing
    pub times: Vec<f64>,
    /// Summed charge of each group
    pub charges: Vec<f64>,
}

impl GroupedHits {
    /// Number of groups.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Check if there are no groups.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Start a new group at `time`.
    fn open(&mut self, time: f64, charge: f64) {
        self.times.push(time);
        self.charges.push(charge);
    }

    /// Add charge to the most recent group.
    fn extend_last(&mut self, charge: f64) {
        if let Some(last) = self.charges.last_mut() {
            *last += charge;
        }
    }
}

/// Group hits whose gap to the previous hit is at most `window_ns`.
///
/// Gaps chain: a long train of hits each within the window of its
/// predecessor forms one group, however long the train is.
pub fn group_hits_by_window(
    times: &[f64],
    charges: &[f64],
    window_ns: f64,
) -> SummaryResult<GroupedHits> {
    if times.is_empty() {
        return Ok(GroupedHits::default());
    }

    if times.len() != charges.len() {
        return Err(SummaryError::length_mismatch(times.len(), charges.len()));
    }

    let (times, charges) = sort_by_time(times, charges);

    let mut groups = GroupedHits::default();
    let mut previous: Option<f64> = None;

    for (&time, &charge) in times.iter().zip(charges.iter()) {
        match previous {
            Some(prev) if time - prev <= window_ns => groups.extend_last(charge),
            _ => groups.open(time, charge),
        }
        previous = Some(time);
    }

    debug!(
        hits = times.len(),
        groups = groups.len(),
        window_ns,
        "grouped hits"
    );

    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_empty() {
        let groups = group_hits_by_window(&[], &[], 2.0).unwrap();
        assert!(groups.is_empty());
    }

    #[test]
    fn test_group_single_hit() {
        let groups = group_hits_by_window(&[5.0], &[1.5], 2.0).unwrap();
        assert_eq!(groups.times, vec![5.0]);
        assert_eq!(groups.charges, vec![1.5]);
    }

    #[test]
    fn test_group_basic() {
        let times = [10.0, 10.5, 15.0, 100.0];
        let charges = [1.0, 0.5, 2.0, 1.0];
        let groups = group_hits_by_window(&times, &charges, 2.0).unwrap();

        assert_eq!(groups.times, vec![10.0, 15.0, 100.0]);
        assert_eq!(groups.charges, vec![1.5, 2.0, 1.0]);
    }

    #[test]
    fn test_group_gap_equal_to_window_joins() {
        let groups = group_hits_by_window(&[0.0, 2.0, 4.5], &[1.0, 1.0, 1.0], 2.0).unwrap();
        assert_eq!(groups.times, vec![0.0, 4.5]);
        assert_eq!(groups.charges, vec![2.0, 1.0]);
    }

    #[test]
    fn test_group_gaps_chain() {
        let times = [0.0, 1.5, 3.0, 4.5, 6.0];
        let groups = group_hits_by_window(&times, &[1.0; 5], 2.0).unwrap();
        assert_eq!(groups.times, vec![0.0]);
        assert_eq!(groups.charges, vec![5.0]);
    }

    #[test]
    fn test_group_unsorted_input() {
        let groups = group_hits_by_window(&[15.0, 10.5, 10.0], &[2.0, 0.5, 1.0], 2.0).unwrap();
        assert_eq!(groups.times, vec![10.0, 15.0]);
        assert_eq!(groups.charges, vec![1.5, 2.0]);
    }

    #[test]
    fn test_group_length_mismatch() {
        let err = group_hits_by_window(&[1.0, 2.0], &[1.0], 2.0).unwrap_err();
        assert_eq!(err, SummaryError::length_mismatch(2, 1));
    }
}
