//! NT Summary Stats - fast summary statistics for neutrino telescope sensors.
//!
//! This library computes the nine traditional per-sensor summary statistics
//! used to describe the photon pulses recorded by an optical module
//! (see <https://arxiv.org/abs/2101.11589>):
//!
//! | index | statistic |
//! |---|---|
//! | 0 | total charge |
//! | 1 | charge within 100ns of the first pulse |
//! | 2 | charge within 500ns of the first pulse |
//! | 3 | time of the first pulse |
//! | 4 | time of the last pulse |
//! | 5 | time at which 20% of the charge is collected |
//! | 6 | time at which 50% of the charge is collected |
//! | 7 | charge-weighted mean time |
//! | 8 | charge-weighted standard deviation of time |
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      NT Summary Stats                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐       │
//! │  │ Prometheus  │──▶│  Grouping   │──▶│   Kernel    │       │
//! │  │   event     │   │ (optional)  │   │  (9 stats)  │       │
//! │  └─────────────┘   └─────────────┘   └─────────────┘       │
//! │                                             ▲               │
//! │  ┌─────────────┐                            │               │
//! │  │   Batch     │────────────────────────────┘               │
//! │  └─────────────┘                                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use nt_summary_stats::{compute_summary_stats, compute_summary_stats_batch};
//!
//! let stats = compute_summary_stats(&[10.0, 15.0, 25.0, 100.0], &[1.0, 2.0, 1.5, 0.5]).unwrap();
//! assert_eq!(stats.total_charge, 5.0);
//!
//! let times = vec![vec![10.0], vec![20.0, 30.0]];
//! let charges = vec![vec![1.0], vec![2.0, 2.0]];
//! let rows = compute_summary_stats_batch(&times, &charges).unwrap();
//! assert_eq!(rows[1].charge_weighted_mean_time, 25.0);
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod event;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigError, OutputFormat};
#[cfg(feature = "parallel")]
pub use crate::core::compute_summary_stats_batch_par;
pub use crate::core::{
    compute_summary_stats, compute_summary_stats_batch, group_hits_by_window, stats_matrix,
    GroupedHits, ReportBuilder, SummaryReport, SummaryStats, STAT_COUNT, STAT_NAMES,
};
pub use error::{SummaryError, SummaryResult};
pub use event::{
    process_prometheus_event, process_sensor_data, EventSummary, PhotonTable, PrometheusEvent,
    SensorKey, SensorSummary,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
