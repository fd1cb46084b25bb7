use anyhow::{Context, Result};
use serde::Deserialize;

use crate::overlay::DEFAULT_ROUTE_SOURCE;

pub const DEFAULT_STATIONS_SOURCE: &str =
    "https://dsc106.com/labs/lab07/data/bluebikes-stations.json";
pub const DEFAULT_TRIPS_SOURCE: &str =
    "https://dsc106.com/labs/lab07/data/bluebikes-traffic-2024-03.csv";

/// Where the station metadata and trip export are read from.
///
/// Stored as a plain JSON object on disk:
/// ```json
/// {
///   "stations": "https://example.org/bluebikes-stations.json",
///   "trips": "data/bluebikes-traffic-2024-03.csv.gz",
///   "route_overlay": "data/bike-network.geojson"
/// }
/// ```
/// Any key may be omitted to keep the default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub stations: String,
    pub trips: String,
    /// GeoJSON for the static bike-lane overlay.
    pub route_overlay: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            stations: DEFAULT_STATIONS_SOURCE.to_string(),
            trips: DEFAULT_TRIPS_SOURCE.to_string(),
            route_overlay: DEFAULT_ROUTE_SOURCE.to_string(),
        }
    }
}

impl SourceConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("reading config {path}"))?;
        let config: SourceConfig =
            serde_json::from_str(&content).with_context(|| format!("parsing config {path}"))?;
        Ok(config)
    }

    /// Applies `STATIONS_SOURCE`, `TRIPS_SOURCE` and `ROUTE_OVERLAY_SOURCE`
    /// from the environment.
    pub fn with_env(self) -> Self {
        self.with_overrides(
            std::env::var("STATIONS_SOURCE").ok(),
            std::env::var("TRIPS_SOURCE").ok(),
        )
        .with_overlay_override(std::env::var("ROUTE_OVERLAY_SOURCE").ok())
    }

    /// Replaces whichever sources are given; empty strings are ignored.
    pub fn with_overrides(mut self, stations: Option<String>, trips: Option<String>) -> Self {
        if let Some(stations) = stations.filter(|s| !s.trim().is_empty()) {
            self.stations = stations;
        }
        if let Some(trips) = trips.filter(|s| !s.trim().is_empty()) {
            self.trips = trips;
        }
        self
    }

    /// Replaces the overlay source if one is given; empty strings are ignored.
    pub fn with_overlay_override(mut self, route_overlay: Option<String>) -> Self {
        if let Some(route_overlay) = route_overlay.filter(|s| !s.trim().is_empty()) {
            self.route_overlay = route_overlay;
        }
        self
    }
}
