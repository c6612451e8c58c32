//! Core functionality for summary statistics.
//!
//! This module contains:
//! - The single-sensor statistics kernel
//! - The batch driver over many sensors
//! - Hit grouping ahead of summarising
//! - Report building for export

pub mod batch;
pub mod grouping;
pub mod report;
pub mod stats;

// Re-export commonly used types
#[cfg(feature = "parallel")]
pub use batch::compute_summary_stats_batch_par;
pub use batch::{compute_summary_stats_batch, stats_matrix};
pub use grouping::{group_hits_by_window, GroupedHits};
pub use report::{ReportBuilder, SensorRecord, SummaryReport, PRODUCER_NAME, REPORT_VERSION};
pub use stats::{compute_summary_stats, SummaryStats, STAT_COUNT, STAT_NAMES};
