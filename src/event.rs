//! Prometheus event processing.
//!
//! A Prometheus simulation event stores its photon hits as parallel columns.
//! This module splits the hits by sensor, optionally groups them in time,
//! and computes the summary statistics for every sensor that saw light.

use crate::core::grouping::group_hits_by_window;
use crate::core::stats::{compute_summary_stats, SummaryStats};
use crate::error::{SummaryError, SummaryResult};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use tracing::debug;

/// Photon hit columns of a Prometheus event.
///
/// All columns are indexed by hit. `charge` is optional; hits without a
/// charge column count as unit charge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhotonTable {
    pub sensor_pos_x: Vec<f64>,
    pub sensor_pos_y: Vec<f64>,
    pub sensor_pos_z: Vec<f64>,
    pub string_id: Vec<i32>,
    pub sensor_id: Vec<i32>,
    /// Hit times (ns)
    pub t: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charge: Option<Vec<f64>>,
}

impl PhotonTable {
    /// Number of hits.
    pub fn len(&self) -> usize {
        self.t.len()
    }

    /// Check if the table has no hits.
    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// Check that every column has one entry per hit.
    pub fn validate(&self) -> SummaryResult<()> {
        let expected = self.t.len();
        let mut columns = vec![
            ("sensor_pos_x", self.sensor_pos_x.len()),
            ("sensor_pos_y", self.sensor_pos_y.len()),
            ("sensor_pos_z", self.sensor_pos_z.len()),
            ("string_id", self.string_id.len()),
            ("sensor_id", self.sensor_id.len()),
        ];
        if let Some(ref charge) = self.charge {
            columns.push(("charge", charge.len()));
        }

        match columns.into_iter().find(|&(_, len)| len != expected) {
            Some((column, actual)) => Err(SummaryError::ColumnLengthMismatch {
                column,
                expected,
                actual,
            }),
            None => Ok(()),
        }
    }
}

/// A Prometheus event as stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrometheusEvent {
    pub photons: PhotonTable,
}

/// Identifies a sensor by its string and position on the string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SensorKey {
    pub string_id: i32,
    pub sensor_id: i32,
}

/// Statistics of one sensor within an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorSummary {
    pub key: SensorKey,
    /// Sensor position (x, y, z) taken from its first hit
    pub position: [f64; 3],
    /// Number of raw hits before grouping
    pub n_hits: usize,
    pub stats: SummaryStats,
}

/// Per-sensor statistics of a whole event, ordered by sensor key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventSummary {
    pub sensors: Vec<SensorSummary>,
}

impl EventSummary {
    /// Sensor positions as rows of `[x, y, z]`.
    pub fn positions(&self) -> Vec<[f64; 3]> {
        self.sensors.iter().map(|s| s.position).collect()
    }

    /// Statistics of every sensor, in sensor order.
    pub fn stats(&self) -> Vec<SummaryStats> {
        self.sensors.iter().map(|s| s.stats).collect()
    }

    /// Total number of raw hits across all sensors.
    pub fn hit_count(&self) -> usize {
        self.sensors.iter().map(|s| s.n_hits).sum()
    }
}

/// Compute statistics for one sensor's hits.
///
/// Missing `charges` means unit charge per hit. When `grouping_window_ns` is
/// a positive window, hits are first merged with [`group_hits_by_window`].
pub fn process_sensor_data(
    times: &[f64],
    charges: Option<&[f64]>,
    grouping_window_ns: Option<f64>,
) -> SummaryResult<SummaryStats> {
    let charges: Cow<'_, [f64]> = match charges {
        Some(charges) => Cow::Borrowed(charges),
        None => Cow::Owned(vec![1.0; times.len()]),
    };

    if times.is_empty() {
        return compute_summary_stats(&[], &[]);
    }

    match grouping_window_ns {
        Some(window) if window > 0.0 => {
            let groups = group_hits_by_window(times, &charges, window)?;
            compute_summary_stats(&groups.times, &groups.charges)
        }
        _ => compute_summary_stats(times, &charges),
    }
}

/// Compute statistics for every sensor hit in `event`.
///
/// # Example
///
/// ```
/// use nt_summary_stats::event::{process_prometheus_event, PhotonTable, PrometheusEvent};
///
/// let event = PrometheusEvent {
///     photons: PhotonTable {
///         sensor_pos_x: vec![0.0, 0.0, 100.0],
///         sensor_pos_y: vec![0.0, 0.0, 0.0],
///         sensor_pos_z: vec![0.0, 0.0, 50.0],
///         string_id: vec![1, 1, 2],
///         sensor_id: vec![1, 1, 1],
///         t: vec![10.0, 15.0, 20.0],
///         charge: None,
///     },
/// };
/// let summary = process_prometheus_event(&event, None).unwrap();
/// assert_eq!(summary.sensors.len(), 2);
/// ```
pub fn process_prometheus_event(
    event: &PrometheusEvent,
    grouping_window_ns: Option<f64>,
) -> SummaryResult<EventSummary> {
    let photons = &event.photons;
    photons.validate()?;

    if photons.is_empty() {
        return Ok(EventSummary::default());
    }

    // Hit indices per sensor, in input order.
    let mut hits_by_sensor: BTreeMap<SensorKey, Vec<usize>> = BTreeMap::new();
    for (hit, (&string_id, &sensor_id)) in photons
        .string_id
        .iter()
        .zip(photons.sensor_id.iter())
        .enumerate()
    {
        hits_by_sensor
            .entry(SensorKey {
                string_id,
                sensor_id,
            })
            .or_default()
            .push(hit);
    }

    debug!(
        hits = photons.len(),
        sensors = hits_by_sensor.len(),
        "processing prometheus event"
    );

    let mut sensors = Vec::with_capacity(hits_by_sensor.len());
    for (key, hits) in hits_by_sensor {
        let first = hits[0];
        let times: Vec<f64> = hits.iter().map(|&i| photons.t[i]).collect();
        let charges: Option<Vec<f64>> = photons
            .charge
            .as_ref()
            .map(|charge| hits.iter().map(|&i| charge[i]).collect());

        let stats = process_sensor_data(&times, charges.as_deref(), grouping_window_ns)?;

        sensors.push(SensorSummary {
            key,
            position: [
                photons.sensor_pos_x[first],
                photons.sensor_pos_y[first],
                photons.sensor_pos_z[first],
            ],
            n_hits: hits.len(),
            stats,
        });
    }

    Ok(EventSummary { sensors })
}
