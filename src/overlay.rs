//! Static route overlay drawn beneath the station markers.
//!
//! Registered once when the map loads. It never depends on traffic data, so
//! filter and viewport changes leave it alone.

use serde::Serialize;

pub const DEFAULT_ROUTE_SOURCE: &str = "https://bostonopendata-boston.opendata.arcgis.com/datasets/boston::existing-bike-network-2022.geojson";

const BIKE_LANES_SOURCE_ID: &str = "boston_route";
const BIKE_LANES_LAYER_ID: &str = "bike-lanes";
const BIKE_LANES_COLOR: &str = "#32D400";
const BIKE_LANES_WIDTH: f64 = 5.0;
const BIKE_LANES_OPACITY: f64 = 0.6;

/// A GeoJSON line layer for the map surface to register.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteOverlay {
    /// Layer id.
    pub id: String,
    /// Id the GeoJSON source is registered under.
    pub source_id: String,
    /// GeoJSON URL or path.
    pub source: String,
    pub color: String,
    pub width: f64,
    pub opacity: f64,
}

impl RouteOverlay {
    /// The bike-lane network layer, read from `source`.
    pub fn bike_lanes(source: impl Into<String>) -> Self {
        RouteOverlay {
            id: BIKE_LANES_LAYER_ID.to_string(),
            source_id: BIKE_LANES_SOURCE_ID.to_string(),
            source: source.into(),
            color: BIKE_LANES_COLOR.to_string(),
            width: BIKE_LANES_WIDTH,
            opacity: BIKE_LANES_OPACITY,
        }
    }
}

impl Default for RouteOverlay {
    fn default() -> Self {
        Self::bike_lanes(DEFAULT_ROUTE_SOURCE)
    }
}
