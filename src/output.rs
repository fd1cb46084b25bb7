//! Output formatting for frames.
//!
//! Supports pretty-printing, JSON serialization, and CSV append.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::session::Frame;
use crate::stats::FrameStats;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// One marker of one frame, flattened for CSV.
#[derive(Debug, Serialize)]
pub struct MarkerRow<'a> {
    pub filter: i32,
    pub short_name: &'a str,
    pub lon: f64,
    pub lat: f64,
    pub departures: usize,
    pub arrivals: usize,
    pub total_traffic: usize,
    pub departure_ratio: f64,
    pub flow_description: String,
    pub radius: f64,
    pub flow_intensity: f64,
}

/// Flattens a frame into one row per station, in frame order.
pub fn marker_rows(frame: &Frame) -> Vec<MarkerRow<'_>> {
    frame
        .stations
        .iter()
        .zip(frame.markers())
        .map(|(view, marker)| MarkerRow {
            filter: frame.filter.slider_value(),
            short_name: view.id(),
            lon: view.station.lon,
            lat: view.station.lat,
            departures: view.departures,
            arrivals: view.arrivals,
            total_traffic: view.total_traffic,
            departure_ratio: view.departure_ratio,
            flow_description: view.flow_description.to_string(),
            radius: marker.radius,
            flow_intensity: marker.flow_intensity,
        })
        .collect()
}

/// Logs frame statistics using Rust's debug pretty-print format.
pub fn print_pretty(stats: &FrameStats) {
    debug!("{:#?}", stats);
}

/// Logs the whole frame as pretty-printed JSON.
pub fn print_json(frame: &Frame) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(frame)?);
    Ok(())
}

/// Appends the frame's marker rows to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_frame(path: &str, frame: &Frame) -> Result<()> {
    append_rows(path, &marker_rows(frame))
}

/// Appends a [`FrameStats`] record as a row to a CSV file.
pub fn append_stats(path: &str, stats: &FrameStats) -> Result<()> {
    append_rows(path, std::slice::from_ref(stats))
}

fn append_rows<T: Serialize>(path: &str, rows: &[T]) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, rows = rows.len(), "Appending CSV rows");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}
