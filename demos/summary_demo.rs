//! Demonstration of summary statistics on a synthetic event.
//!
//! This example shows how to:
//! 1. Compute statistics for a single sensor
//! 2. Process a batch of sensors
//! 3. Process a Prometheus-style event with hit grouping
//! 4. Build a report for export
//!
//! Run with: cargo run --example summary_demo

use nt_summary_stats::{
    compute_summary_stats, compute_summary_stats_batch, process_prometheus_event, PhotonTable,
    PrometheusEvent, ReportBuilder, SummaryResult,
};

fn main() -> SummaryResult<()> {
    println!("NT Summary Stats - Demo");
    println!("=======================");
    println!();

    // Single sensor
    let times = [10.0, 15.0, 25.0, 100.0];
    let charges = [1.0, 2.0, 1.5, 0.5];
    let stats = compute_summary_stats(&times, &charges)?;

    println!("Single sensor:");
    for (name, value) in stats.named() {
        println!("  {name:<26} {value:.3}");
    }
    println!();

    // Batch
    let times_list = vec![vec![10.0, 15.0, 25.0], vec![5.0, 10.0, 15.0, 20.0], vec![]];
    let charges_list = vec![vec![1.0, 2.0, 1.5], vec![0.5, 1.0, 1.5, 2.0], vec![]];
    let rows = compute_summary_stats_batch(&times_list, &charges_list)?;

    println!("Batch of {} sensors:", rows.len());
    for (i, row) in rows.iter().enumerate() {
        println!(
            "  sensor {i}: total charge {:.2}, mean time {:.2}",
            row.total_charge, row.charge_weighted_mean_time
        );
    }
    println!();

    // Event with 2ns hit grouping
    let event = PrometheusEvent {
        photons: PhotonTable {
            sensor_pos_x: vec![0.0, 0.0, 0.0, 100.0, 100.0],
            sensor_pos_y: vec![0.0; 5],
            sensor_pos_z: vec![0.0, 0.0, 0.0, 50.0, 50.0],
            string_id: vec![1, 1, 1, 2, 2],
            sensor_id: vec![1, 1, 1, 1, 1],
            t: vec![10.0, 10.5, 15.0, 200.0, 700.0],
            charge: None,
        },
    };
    let summary = process_prometheus_event(&event, Some(2.0))?;

    let report = ReportBuilder::new()
        .with_source("synthetic")
        .build(&summary, Some(2.0));
    match report.to_json() {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Error serializing report: {e}"),
    }

    Ok(())
}
