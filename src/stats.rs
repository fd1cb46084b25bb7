use serde::Serialize;

use crate::session::Frame;
use crate::traffic::types::FlowDescription;

/// Summary of one frame, for logs and CSV exports.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct FrameStats {
    pub filter: i32,
    pub filter_label: String,
    pub stations: usize,
    pub active_stations: usize,

    pub departures_in_window: usize,
    pub arrivals_in_window: usize,
    pub matched_departures: usize,
    pub matched_arrivals: usize,

    // flow bands
    pub more_departures: usize,
    pub more_arrivals: usize,
    pub balanced: usize,

    pub busiest_station: Option<String>,
    pub busiest_total: usize,
    pub max_radius: f64,
}

impl FrameStats {
    pub fn from_frame(frame: &Frame) -> Self {
        let mut s = FrameStats {
            filter: frame.filter.slider_value(),
            filter_label: frame.filter.to_string(),
            stations: frame.stations.len(),
            departures_in_window: frame.departures_in_window,
            arrivals_in_window: frame.arrivals_in_window,
            ..Default::default()
        };

        for view in &frame.stations {
            if view.total_traffic > 0 {
                s.active_stations += 1;
            }

            s.matched_departures += view.departures;
            s.matched_arrivals += view.arrivals;

            match view.flow_description {
                FlowDescription::MoreDepartures => s.more_departures += 1,
                FlowDescription::MoreArrivals => s.more_arrivals += 1,
                FlowDescription::Balanced => s.balanced += 1,
            }

            // Ties keep the first station in list order.
            if view.total_traffic > s.busiest_total {
                s.busiest_total = view.total_traffic;
                s.busiest_station = Some(view.id().to_string());
            }
        }

        s.max_radius = frame.radius_scale.radius(s.busiest_total);
        s
    }

    pub fn pct(part: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            (part as f64 / total as f64) * 100.0
        }
    }

    pub fn active_pct(&self) -> f64 {
        Self::pct(self.active_stations, self.stations)
    }

    /// Share of departures in the window that start at a known station.
    pub fn matched_departures_pct(&self) -> f64 {
        Self::pct(self.matched_departures, self.departures_in_window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traffic::bucket::MinuteBuckets;
    use crate::traffic::types::{Station, TimeFilter, TripRecord};

    fn station(short_name: &str) -> Station {
        Station {
            short_name: short_name.to_string(),
            lon: -71.0,
            lat: 42.0,
            name: None,
            extra: serde_json::Map::new(),
        }
    }

    fn record(start: &str, end: &str) -> TripRecord {
        TripRecord {
            start_station_id: start.to_string(),
            end_station_id: end.to_string(),
            started_at: "2024-03-01 12:00:00".to_string(),
            ended_at: "2024-03-01 12:10:00".to_string(),
        }
    }

    #[test]
    fn test_pct_with_zero_total() {
        assert_eq!(FrameStats::pct(10, 0), 0.0);
    }

    #[test]
    fn test_pct_normal_values() {
        assert_eq!(FrameStats::pct(50, 100), 50.0);
        assert_eq!(FrameStats::pct(1, 4), 25.0);
    }

    #[test]
    fn test_from_empty_frame() {
        let frame = Frame::compute(&[], &MinuteBuckets::build(Vec::new()), TimeFilter::AnyTime);
        let stats = FrameStats::from_frame(&frame);

        assert_eq!(stats.stations, 0);
        assert_eq!(stats.busiest_station, None);
        assert_eq!(stats.active_pct(), 0.0);
        assert_eq!(stats.filter, -1);
    }

    #[test]
    fn test_from_frame_counts_bands() {
        let stations = vec![station("A"), station("B"), station("C")];
        let buckets = MinuteBuckets::build(vec![
            record("A", "B"),
            record("A", "B"),
            record("A", "X"),
            record("X", "A"),
        ]);
        let frame = Frame::compute(&stations, &buckets, TimeFilter::Minute(720));
        let stats = FrameStats::from_frame(&frame);

        assert_eq!(stats.active_stations, 2);
        assert_eq!(stats.more_departures, 1);
        assert_eq!(stats.more_arrivals, 1);
        assert_eq!(stats.balanced, 1);
        assert_eq!(stats.busiest_station.as_deref(), Some("A"));
        assert_eq!(stats.busiest_total, 4);
        assert_eq!(stats.departures_in_window, 4);
        assert_eq!(stats.matched_departures, 3);
        assert_eq!(stats.matched_departures_pct(), 75.0);
        assert_eq!(stats.max_radius, 20.0);
        assert_eq!(stats.filter_label, "12:00 PM");
    }
}
