//! Serializable reports of per-sensor summary statistics.
//!
//! A report wraps the statistics of one event with producer metadata so
//! exported files can be traced back to the run that made them.

use crate::core::stats::{SummaryStats, STAT_NAMES};
use crate::event::EventSummary;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The current report format version.
pub const REPORT_VERSION: &str = "1.0";

/// The name of this producer.
pub const PRODUCER_NAME: &str = "nt-summary-stats";

/// Producer metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportProducer {
    /// Name of the producing software
    pub name: String,
    /// Version of the producing software
    pub version: String,
    /// Unique instance identifier (UUID)
    pub instance_id: String,
}

/// Statistics of a single sensor as exported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorRecord {
    pub string_id: i32,
    pub sensor_id: i32,
    /// Sensor position (x, y, z)
    pub position: [f64; 3],
    /// Raw hits seen by the sensor
    pub n_hits: usize,
    pub stats: SummaryStats,
}

/// Summary statistics of one event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReport {
    /// Report schema version
    pub format_version: String,
    /// When this report was computed (RFC3339)
    pub computed_at_utc: String,
    /// Producer metadata
    pub producer: ReportProducer,
    /// Input the statistics were computed from, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Hit grouping window applied before summarising (ns)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grouping_window_ns: Option<f64>,
    /// Statistic names in array order
    pub stat_names: Vec<String>,
    /// One record per sensor with hits
    pub sensors: Vec<SensorRecord>,
}

impl SummaryReport {
    /// Render the report as pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Render the sensor records as JSON Lines, one sensor per line.
    pub fn to_jsonl(&self) -> serde_json::Result<String> {
        let lines = self
            .sensors
            .iter()
            .map(serde_json::to_string)
            .collect::<serde_json::Result<Vec<_>>>()?;
        Ok(lines.join("\n"))
    }
}

/// Builder for summary reports.
pub struct ReportBuilder {
    instance_id: Uuid,
    source: Option<String>,
}

impl ReportBuilder {
    /// Create a new report builder with a unique instance ID.
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4(),
            source: None,
        }
    }

    /// Record the input the reports are built from.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Get the instance ID.
    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    /// Build a report from an event's per-sensor statistics.
    pub fn build(&self, summary: &EventSummary, grouping_window_ns: Option<f64>) -> SummaryReport {
        let sensors = summary
            .sensors
            .iter()
            .map(|sensor| SensorRecord {
                string_id: sensor.key.string_id,
                sensor_id: sensor.key.sensor_id,
                position: sensor.position,
                n_hits: sensor.n_hits,
                stats: sensor.stats,
            })
            .collect();

        SummaryReport {
            format_version: REPORT_VERSION.to_string(),
            computed_at_utc: Utc::now().to_rfc3339(),
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: crate::VERSION.to_string(),
                instance_id: self.instance_id.to_string(),
            },
            source: self.source.clone(),
            grouping_window_ns: grouping_window_ns.filter(|&w| w > 0.0),
            stat_names: STAT_NAMES.iter().map(|s| s.to_string()).collect(),
            sensors,
        }
    }
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}
