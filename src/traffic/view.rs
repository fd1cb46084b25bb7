//! Render-ready station records.

use serde::Serialize;

use crate::traffic::aggregate::TrafficTable;
use crate::traffic::types::{FlowDescription, Station, StationTraffic};

/// A copy of a static station decorated with the current traffic figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationView {
    #[serde(flatten)]
    pub station: Station,
    pub departures: usize,
    pub arrivals: usize,
    pub total_traffic: usize,
    pub departure_ratio: f64,
    pub flow_description: FlowDescription,
}

impl StationView {
    pub fn decorate(station: &Station, traffic: &StationTraffic) -> Self {
        StationView {
            station: station.clone(),
            departures: traffic.departures,
            arrivals: traffic.arrivals,
            total_traffic: traffic.total_traffic,
            departure_ratio: traffic.departure_ratio,
            flow_description: traffic.flow,
        }
    }

    pub fn id(&self) -> &str {
        self.station.id()
    }

    /// Hover text for the station marker.
    pub fn tooltip(&self) -> String {
        format!(
            "{}: {} trips ({} departures, {} arrivals)",
            self.station.short_name, self.total_traffic, self.departures, self.arrivals
        )
    }
}

/// Decorates every station, in input order, with its entry from `traffic`.
///
/// Stations without an entry are treated as idle.
pub fn project(stations: &[Station], traffic: &TrafficTable) -> Vec<StationView> {
    stations
        .iter()
        .map(|station| match traffic.get(station.id()) {
            Some(t) => StationView::decorate(station, t),
            None => StationView::decorate(station, &StationTraffic::idle(station.id())),
        })
        .collect()
}

/// Largest total traffic among the views, 0 when there are none.
pub fn max_total_traffic(views: &[StationView]) -> usize {
    views.iter().map(|v| v.total_traffic).max().unwrap_or(0)
}
