//! Owned pipeline state and the per-event handlers the UI calls into.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::overlay::RouteOverlay;
use crate::projection::{Projector, ScreenPoint};
use crate::services::dataset_api::DatasetApi;
use crate::traffic::aggregate::aggregate;
use crate::traffic::bucket::{Direction, MinuteBuckets};
use crate::traffic::scale::{RadiusScale, flow_intensity};
use crate::traffic::types::{Station, TimeFilter};
use crate::traffic::view::{StationView, max_total_traffic, project};
use crate::traffic::window::select;

/// Everything the presentation layer needs to draw one state of the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub filter: TimeFilter,
    pub stations: Vec<StationView>,
    pub radius_scale: RadiusScale,
    pub departures_in_window: usize,
    pub arrivals_in_window: usize,
}

/// Per-station drawing attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub station_id: String,
    pub radius: f64,
    pub flow_intensity: f64,
    pub tooltip: String,
}

impl Frame {
    /// Runs window selection, aggregation, projection and scaling for `filter`.
    pub fn compute(stations: &[Station], buckets: &MinuteBuckets, filter: TimeFilter) -> Self {
        let departures = select(buckets, Direction::Departures, filter);
        let arrivals = select(buckets, Direction::Arrivals, filter);
        let traffic = aggregate(&departures, &arrivals);

        let views = project(stations, &traffic);
        let radius_scale = RadiusScale::for_filter(max_total_traffic(&views), filter);

        Frame {
            filter,
            stations: views,
            radius_scale,
            departures_in_window: departures.len(),
            arrivals_in_window: arrivals.len(),
        }
    }

    pub fn markers(&self) -> Vec<Marker> {
        self.stations
            .iter()
            .map(|view| Marker {
                station_id: view.id().to_string(),
                radius: self.radius_scale.radius(view.total_traffic),
                flow_intensity: flow_intensity(view.departure_ratio),
                tooltip: view.tooltip(),
            })
            .collect()
    }

    /// Screen positions for the stations, in frame order.
    pub fn positions<P: Projector + ?Sized>(&self, projector: &P) -> Vec<ScreenPoint> {
        self.stations
            .iter()
            .map(|view| projector.project(view.station.lon, view.station.lat))
            .collect()
    }
}

/// The loaded dataset plus the current filter and frame.
///
/// Stations, buckets and the route overlay are fixed after construction; only
/// the filter and the frame derived from it change.
#[derive(Debug, Clone)]
pub struct TrafficSession {
    stations: Vec<Station>,
    buckets: MinuteBuckets,
    overlay: RouteOverlay,
    filter: TimeFilter,
    frame: Frame,
}

impl TrafficSession {
    pub fn new(stations: Vec<Station>, buckets: MinuteBuckets) -> Self {
        let filter = TimeFilter::AnyTime;
        let frame = Frame::compute(&stations, &buckets, filter);
        TrafficSession {
            stations,
            buckets,
            overlay: RouteOverlay::default(),
            filter,
            frame,
        }
    }

    /// Replaces the route overlay registered with the map surface.
    pub fn with_overlay(mut self, overlay: RouteOverlay) -> Self {
        self.overlay = overlay;
        self
    }

    /// Loads stations, then trips, then buckets the trips.
    #[tracing::instrument(skip(api))]
    pub async fn load<A: DatasetApi + ?Sized>(api: &A) -> Result<Self> {
        let stations = api.stations().await.context("loading station metadata")?;
        info!(stations = stations.len(), "Stations loaded");

        let load = api.trips().await.context("loading trip dataset")?;
        let buckets = MinuteBuckets::build(load.records).with_extra_excluded(load.rejected_rows);
        info!(
            trips = buckets.len(),
            excluded = buckets.excluded(),
            "Trips bucketed"
        );

        Ok(Self::new(stations, buckets))
    }

    /// Slider handler. `-1` selects any time.
    pub fn on_filter_change(&mut self, slider_value: i32) -> Result<&Frame> {
        let filter = TimeFilter::from_slider(slider_value)?;
        Ok(self.apply_filter(filter))
    }

    /// Recomputes the frame. `filter` must come from [`TimeFilter::from_slider`].
    pub(crate) fn apply_filter(&mut self, filter: TimeFilter) -> &Frame {
        self.filter = filter;
        self.frame = Frame::compute(&self.stations, &self.buckets, filter);
        debug!(
            filter = %filter,
            departures = self.frame.departures_in_window,
            arrivals = self.frame.arrivals_in_window,
            "Frame recomputed"
        );
        &self.frame
    }

    /// Viewport handler: repositions the current frame without recomputing traffic.
    pub fn on_viewport_change<P: Projector + ?Sized>(&self, projector: &P) -> Vec<ScreenPoint> {
        self.frame.positions(projector)
    }

    /// Static overlay for the map surface; independent of the frame.
    pub fn overlay(&self) -> &RouteOverlay {
        &self.overlay
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn filter(&self) -> TimeFilter {
        self.filter
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn buckets(&self) -> &MinuteBuckets {
        &self.buckets
    }
}
