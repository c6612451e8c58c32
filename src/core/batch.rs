//! Batch computation over many sensors.
//!
//! Each sensor is handled independently by [`compute_summary_stats`]. The
//! whole batch fails on the first malformed sensor; no partial results are
//! returned.

use crate::core::stats::{compute_summary_stats, SummaryStats, STAT_COUNT};
use crate::error::{SummaryError, SummaryResult};
use tracing::{debug, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Compute summary statistics for each `(times_list[i], charges_list[i])` pair.
///
/// The outer lengths are checked before any sensor is processed. A
/// per-sensor length mismatch is returned as the kernel reported it.
///
/// # Example
///
/// ```
/// use nt_summary_stats::compute_summary_stats_batch;
///
/// let times = vec![vec![10.0, 15.0], vec![]];
/// let charges = vec![vec![1.0, 2.0], vec![]];
/// let results = compute_summary_stats_batch(&times, &charges).unwrap();
/// assert_eq!(results.len(), 2);
/// assert_eq!(results[0].total_charge, 3.0);
/// ```
pub fn compute_summary_stats_batch<T, C>(
    times_list: &[T],
    charges_list: &[C],
) -> SummaryResult<Vec<SummaryStats>>
where
    T: AsRef<[f64]>,
    C: AsRef<[f64]>,
{
    check_outer_lengths(times_list.len(), charges_list.len())?;
    debug!(sensors = times_list.len(), "computing batch summary statistics");

    times_list
        .iter()
        .zip(charges_list)
        .enumerate()
        .map(|(index, (times, charges))| {
            compute_summary_stats(times.as_ref(), charges.as_ref()).map_err(|e| {
                warn!(sensor = index, error = %e, "batch aborted");
                e
            })
        })
        .collect()
}

/// Parallel variant of [`compute_summary_stats_batch`].
///
/// Results are identical to the sequential driver. If several sensors are
/// malformed, the error of the lowest index is returned.
#[cfg(feature = "parallel")]
pub fn compute_summary_stats_batch_par<T, C>(
    times_list: &[T],
    charges_list: &[C],
) -> SummaryResult<Vec<SummaryStats>>
where
    T: AsRef<[f64]> + Sync,
    C: AsRef<[f64]> + Sync,
{
    check_outer_lengths(times_list.len(), charges_list.len())?;
    debug!(
        sensors = times_list.len(),
        threads = rayon::current_num_threads(),
        "computing batch summary statistics in parallel"
    );

    let results: Vec<SummaryResult<SummaryStats>> = times_list
        .par_iter()
        .zip(charges_list.par_iter())
        .map(|(times, charges)| compute_summary_stats(times.as_ref(), charges.as_ref()))
        .collect();

    // Collect sequentially so the first failing index wins.
    results.into_iter().collect()
}

/// Flatten a batch into a row-major `N x 9` matrix.
pub fn stats_matrix(results: &[SummaryStats]) -> Vec<f64> {
    let mut matrix = Vec::with_capacity(results.len() * STAT_COUNT);
    for stats in results {
        matrix.extend_from_slice(&stats.to_array());
    }
    matrix
}

fn check_outer_lengths(times_list: usize, charges_list: usize) -> SummaryResult<()> {
    if times_list != charges_list {
        warn!(times_list, charges_list, "rejecting batch with mismatched lengths");
        return Err(SummaryError::batch_mismatch(times_list, charges_list));
    }
    Ok(())
}
