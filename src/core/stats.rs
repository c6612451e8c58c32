//! Summary statistics for the pulses of a single sensor.
//!
//! This module turns a sensor's pulse arrival times and charges into the nine
//! traditional summary statistics used as per-sensor features (see
//! <https://arxiv.org/abs/2101.11589>). Times are in nanoseconds, charges in
//! arbitrary units.

use crate::error::{SummaryError, SummaryResult};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tracing::{trace, warn};

/// Number of statistics produced per sensor.
pub const STAT_COUNT: usize = 9;

/// Statistic names by output index.
pub const STAT_NAMES: [&str; STAT_COUNT] = [
    "total_charge",
    "charge_100ns",
    "charge_500ns",
    "first_pulse_time",
    "last_pulse_time",
    "charge_20_percent_time",
    "charge_50_percent_time",
    "charge_weighted_mean_time",
    "charge_weighted_std_time",
];

/// Short integration window after the first pulse (ns).
const SHORT_WINDOW_NS: f64 = 100.0;

/// Long integration window after the first pulse (ns).
const LONG_WINDOW_NS: f64 = 500.0;

/// Charge fractions for the percentile times.
const EARLY_CHARGE_FRACTION: f64 = 0.2;
const MEDIAN_CHARGE_FRACTION: f64 = 0.5;

/// The nine summary statistics of one sensor, in output order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Sum of all charges
    pub total_charge: f64,
    /// Charge of pulses up to and including 100ns after the first pulse
    pub charge_100ns: f64,
    /// Charge of pulses up to and including 500ns after the first pulse
    pub charge_500ns: f64,
    /// Time of the earliest pulse
    pub first_pulse_time: f64,
    /// Time of the latest pulse
    pub last_pulse_time: f64,
    /// Earliest time at which cumulative charge exceeds 20% of the total
    pub charge_20_percent_time: f64,
    /// Earliest time at which cumulative charge exceeds 50% of the total
    pub charge_50_percent_time: f64,
    /// Charge-weighted mean of pulse times
    pub charge_weighted_mean_time: f64,
    /// Charge-weighted standard deviation of pulse times
    pub charge_weighted_std_time: f64,
}

impl SummaryStats {
    /// The statistics as a fixed array, indexed as in [`STAT_NAMES`].
    pub fn to_array(&self) -> [f64; STAT_COUNT] {
        [
            self.total_charge,
            self.charge_100ns,
            self.charge_500ns,
            self.first_pulse_time,
            self.last_pulse_time,
            self.charge_20_percent_time,
            self.charge_50_percent_time,
            self.charge_weighted_mean_time,
            self.charge_weighted_std_time,
        ]
    }

    /// Build statistics from a fixed array in [`STAT_NAMES`] order.
    pub fn from_array(values: [f64; STAT_COUNT]) -> Self {
        Self {
            total_charge: values[0],
            charge_100ns: values[1],
            charge_500ns: values[2],
            first_pulse_time: values[3],
            last_pulse_time: values[4],
            charge_20_percent_time: values[5],
            charge_50_percent_time: values[6],
            charge_weighted_mean_time: values[7],
            charge_weighted_std_time: values[8],
        }
    }

    /// Iterate over `(name, value)` pairs in output order.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> {
        STAT_NAMES.into_iter().zip(self.to_array())
    }
}

impl From<SummaryStats> for [f64; STAT_COUNT] {
    fn from(stats: SummaryStats) -> Self {
        stats.to_array()
    }
}

impl From<[f64; STAT_COUNT]> for SummaryStats {
    fn from(values: [f64; STAT_COUNT]) -> Self {
        Self::from_array(values)
    }
}

/// Compute the nine summary statistics for one sensor.
///
/// Empty `times` yields all zeros without looking at `charges`. Otherwise
/// the two slices must have equal length.
///
/// Charges are not validated. With negative charges the cumulative charge is
/// no longer monotonic and the weighted variance may be negative, in which
/// case the standard deviation is NaN.
///
/// # Example
///
/// ```
/// use nt_summary_stats::compute_summary_stats;
///
/// let stats = compute_summary_stats(&[10.0, 15.0, 25.0, 100.0], &[1.0, 2.0, 1.5, 0.5]).unwrap();
/// assert_eq!(stats.total_charge, 5.0);
/// assert_eq!(stats.first_pulse_time, 10.0);
/// ```
pub fn compute_summary_stats(times: &[f64], charges: &[f64]) -> SummaryResult<SummaryStats> {
    if times.is_empty() {
        return Ok(SummaryStats::default());
    }

    if times.len() != charges.len() {
        warn!(
            times = times.len(),
            charges = charges.len(),
            "rejecting pulse sequence with mismatched lengths"
        );
        return Err(SummaryError::length_mismatch(times.len(), charges.len()));
    }

    let (times, charges) = sort_by_time(times, charges);
    let times: &[f64] = &times;
    let charges: &[f64] = &charges;
    let n = times.len();

    let total_charge = sequential_sum(charges);
    let first_pulse_time = times[0];
    let last_pulse_time = times[n - 1];

    // Closed windows: a pulse exactly at the cutoff counts.
    let idx_short = upper_bound(times, first_pulse_time + SHORT_WINDOW_NS);
    let idx_long = upper_bound(times, first_pulse_time + LONG_WINDOW_NS);
    let charge_100ns = sequential_sum(&charges[..idx_short]);
    let charge_500ns = sequential_sum(&charges[..idx_long]);

    let cumulative = cumulative_sum(charges);
    let charge_20_percent_time =
        percentile_time(times, &cumulative, EARLY_CHARGE_FRACTION * total_charge);
    let charge_50_percent_time =
        percentile_time(times, &cumulative, MEDIAN_CHARGE_FRACTION * total_charge);

    let (charge_weighted_mean_time, charge_weighted_std_time) = if total_charge > 0.0 {
        weighted_moments(times, charges, total_charge)
    } else {
        (0.0, 0.0)
    };

    Ok(SummaryStats {
        total_charge,
        charge_100ns,
        charge_500ns,
        first_pulse_time,
        last_pulse_time,
        charge_20_percent_time,
        charge_50_percent_time,
        charge_weighted_mean_time,
        charge_weighted_std_time,
    })
}

/// Whether `times` is already non-decreasing.
pub(crate) fn is_time_sorted(times: &[f64]) -> bool {
    times.windows(2).all(|pair| pair[0] <= pair[1])
}

/// Reorder pulses by time, keeping each charge attached to its time.
///
/// Borrows the input when it is already sorted. Equal times keep their input
/// order.
pub(crate) fn sort_by_time<'a>(
    times: &'a [f64],
    charges: &'a [f64],
) -> (Cow<'a, [f64]>, Cow<'a, [f64]>) {
    if is_time_sorted(times) {
        return (Cow::Borrowed(times), Cow::Borrowed(charges));
    }

    trace!(pulses = times.len(), "sorting pulses by time");

    let mut order: Vec<usize> = (0..times.len()).collect();
    order.sort_by(|&a, &b| times[a].total_cmp(&times[b]));

    let sorted_times: Vec<f64> = order.iter().map(|&i| times[i]).collect();
    let sorted_charges: Vec<f64> = order.iter().map(|&i| charges[i]).collect();
    (Cow::Owned(sorted_times), Cow::Owned(sorted_charges))
}

/// Number of leading elements `<= value` in a non-decreasing slice.
fn upper_bound(sorted: &[f64], value: f64) -> usize {
    sorted.partition_point(|&x| x <= value)
}

/// Left-to-right sum. `Iterator::sum` is avoided so an empty slice sums to +0.0.
fn sequential_sum(values: &[f64]) -> f64 {
    values.iter().fold(0.0, |acc, &v| acc + v)
}

/// Inclusive running sum.
fn cumulative_sum(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .scan(0.0, |acc, &v| {
            *acc += v;
            Some(*acc)
        })
        .collect()
}

/// Time of the first pulse whose cumulative charge strictly exceeds
/// `threshold`, or of the last pulse if none does.
fn percentile_time(times: &[f64], cumulative: &[f64], threshold: f64) -> f64 {
    let idx = upper_bound(cumulative, threshold).min(times.len() - 1);
    times[idx]
}

/// Charge-weighted mean and standard deviation of `times`.
fn weighted_moments(times: &[f64], charges: &[f64], total_charge: f64) -> (f64, f64) {
    let weighted_sum = times
        .iter()
        .zip(charges)
        .fold(0.0, |acc, (&t, &q)| acc + t * q);
    let mean = weighted_sum / total_charge;

    let weighted_variance = times.iter().zip(charges).fold(0.0, |acc, (&t, &q)| {
        let diff = t - mean;
        acc + q * diff * diff
    }) / total_charge;

    (mean, weighted_variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_input() {
        let stats = compute_summary_stats(&[], &[]).unwrap();
        assert_eq!(stats.to_array(), [0.0; STAT_COUNT]);
    }

    #[test]
    fn test_empty_times_skips_length_check() {
        let stats = compute_summary_stats(&[], &[1.0]).unwrap();
        assert_eq!(stats, SummaryStats::default());
    }

    #[test]
    fn test_length_mismatch() {
        let err = compute_summary_stats(&[1.0], &[1.0, 2.0]).unwrap_err();
        assert_eq!(err, SummaryError::length_mismatch(1, 2));
    }

    #[test]
    fn test_single_pulse() {
        let stats = compute_summary_stats(&[10.0], &[5.0]).unwrap();
        assert_eq!(
            stats.to_array(),
            [5.0, 5.0, 5.0, 10.0, 10.0, 10.0, 10.0, 10.0, 0.0]
        );
    }

    #[test]
    fn test_basic_values() {
        let stats = compute_summary_stats(&[10.0, 15.0, 25.0, 100.0], &[1.0, 2.0, 1.5, 0.5])
            .unwrap();

        assert_eq!(stats.total_charge, 5.0);
        assert_eq!(stats.charge_100ns, 5.0);
        assert_eq!(stats.charge_500ns, 5.0);
        assert_eq!(stats.first_pulse_time, 10.0);
        assert_eq!(stats.last_pulse_time, 100.0);
        // Cumulative charge reaches exactly 1.0 at t=10, which does not exceed 20%.
        assert_eq!(stats.charge_20_percent_time, 15.0);
        assert_eq!(stats.charge_50_percent_time, 15.0);
        assert_relative_eq!(stats.charge_weighted_mean_time, 25.5);
        assert_relative_eq!(stats.charge_weighted_std_time, 647.25_f64.sqrt());
    }

    #[test]
    fn test_window_boundaries_are_closed() {
        let times = [0.0, 100.0, 100.5, 500.0, 501.0];
        let charges = [1.0, 2.0, 4.0, 8.0, 16.0];
        let stats = compute_summary_stats(&times, &charges).unwrap();

        assert_eq!(stats.charge_100ns, 3.0);
        assert_eq!(stats.charge_500ns, 15.0);
        assert_eq!(stats.total_charge, 31.0);
    }

    #[test]
    fn test_unsorted_keeps_charges_attached() {
        let sorted = compute_summary_stats(&[10.0, 20.0, 30.0], &[1.0, 2.0, 3.0]).unwrap();
        let shuffled = compute_summary_stats(&[30.0, 10.0, 20.0], &[3.0, 1.0, 2.0]).unwrap();
        assert_eq!(sorted, shuffled);
    }

    #[test]
    fn test_zero_charge() {
        let stats = compute_summary_stats(&[10.0, 20.0, 30.0], &[0.0, 0.0, 0.0]).unwrap();

        assert_eq!(stats.total_charge, 0.0);
        // Every cumulative value equals the zero threshold, so the search
        // runs off the end and clamps to the last pulse.
        assert_eq!(stats.charge_20_percent_time, 30.0);
        assert_eq!(stats.charge_50_percent_time, 30.0);
        assert_eq!(stats.charge_weighted_mean_time, 0.0);
        assert_eq!(stats.charge_weighted_std_time, 0.0);
    }

    #[test]
    fn test_mixed_zero_charges() {
        let stats = compute_summary_stats(&[10.0, 20.0, 30.0], &[1.0, 0.0, 2.0]).unwrap();
        assert_eq!(stats.charge_20_percent_time, 10.0);
        assert_eq!(stats.charge_50_percent_time, 30.0);
    }

    #[test]
    fn test_negative_charge_gives_nan_std() {
        let stats = compute_summary_stats(&[0.0, 10.0], &[2.0, -1.0]).unwrap();

        assert_eq!(stats.total_charge, 1.0);
        assert_relative_eq!(stats.charge_weighted_mean_time, -10.0);
        assert!(stats.charge_weighted_std_time.is_nan());
    }

    #[test]
    fn test_negative_total_charge_skips_moments() {
        let stats = compute_summary_stats(&[0.0, 10.0], &[-2.0, 1.0]).unwrap();
        assert_eq!(stats.total_charge, -1.0);
        assert_eq!(stats.charge_weighted_mean_time, 0.0);
        assert_eq!(stats.charge_weighted_std_time, 0.0);
    }

    #[test]
    fn test_large_time_offsets() {
        let stats = compute_summary_stats(&[1e6, 1e6 + 100.0, 1e6 + 200.0], &[1.0, 2.0, 3.0])
            .unwrap();
        assert_eq!(stats.charge_100ns, 3.0);
        assert_eq!(stats.charge_500ns, 6.0);
        assert_relative_eq!(
            stats.charge_weighted_mean_time,
            1e6 + 800.0 / 6.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_upper_bound_includes_ties() {
        assert_eq!(upper_bound(&[1.0, 2.0, 2.0, 3.0], 2.0), 3);
        assert_eq!(upper_bound(&[1.0, 2.0], 0.5), 0);
        assert_eq!(upper_bound(&[1.0, 2.0], 5.0), 2);
    }

    #[test]
    fn test_sort_borrows_sorted_input() {
        let times = [1.0, 1.0, 2.0];
        let charges = [3.0, 4.0, 5.0];
        let (t, q) = sort_by_time(&times, &charges);
        assert!(matches!(t, Cow::Borrowed(_)));
        assert!(matches!(q, Cow::Borrowed(_)));
    }

    #[test]
    fn test_sort_is_stable_for_equal_times() {
        let (t, q) = sort_by_time(&[2.0, 1.0, 2.0], &[7.0, 8.0, 9.0]);
        assert_eq!(&*t, &[1.0, 2.0, 2.0]);
        assert_eq!(&*q, &[8.0, 7.0, 9.0]);
    }

    #[test]
    fn test_array_round_trip_and_names() {
        let stats = SummaryStats::from_array([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        assert_eq!(stats.charge_weighted_std_time, 9.0);

        let names: Vec<_> = stats.named().map(|(name, _)| name).collect();
        assert_eq!(names, STAT_NAMES);
        let values: [f64; STAT_COUNT] = stats.into();
        assert_eq!(values[3], 4.0);
    }

    #[test]
    fn test_serde_field_names() {
        let json = serde_json::to_value(SummaryStats::default()).unwrap();
        for name in STAT_NAMES {
            assert!(json.get(name).is_some(), "missing field {name}");
        }
    }
}
