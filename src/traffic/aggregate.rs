use std::collections::BTreeMap;

use crate::traffic::bucket::{Direction, MinuteBuckets};
use crate::traffic::flow::{classify, departure_ratio};
use crate::traffic::types::{StationTraffic, TimeFilter, Trip};
use crate::traffic::window::select;

/// Per-station traffic keyed by station id, in id order.
pub type TrafficTable = BTreeMap<String, StationTraffic>;

impl StationTraffic {
    /// Derives totals, ratio and flow band from raw counts.
    pub fn from_counts(station_id: &str, departures: usize, arrivals: usize) -> Self {
        let ratio = departure_ratio(departures, arrivals);
        StationTraffic {
            station_id: station_id.to_string(),
            departures,
            arrivals,
            total_traffic: departures + arrivals,
            departure_ratio: ratio,
            flow: classify(ratio),
        }
    }

    /// Traffic for a station that saw no trips.
    pub fn idle(station_id: &str) -> Self {
        Self::from_counts(station_id, 0, 0)
    }
}

/// Number of trips per key.
pub fn count_by<'a, F>(trips: &[&'a Trip], key: F) -> BTreeMap<&'a str, usize>
where
    F: Fn(&'a Trip) -> &'a str,
{
    let mut counts = BTreeMap::new();
    for trip in trips {
        *counts.entry(key(*trip)).or_insert(0) += 1;
    }
    counts
}

/// Counts departures by start station and arrivals by end station.
///
/// Every station id seen in either collection gets an entry.
pub fn aggregate(departure_trips: &[&Trip], arrival_trips: &[&Trip]) -> TrafficTable {
    let departures = count_by(departure_trips, |t| t.start_station_id.as_str());
    let arrivals = count_by(arrival_trips, |t| t.end_station_id.as_str());

    let mut table = TrafficTable::new();
    for id in departures.keys().chain(arrivals.keys()) {
        if table.contains_key(*id) {
            continue;
        }
        let d = departures.get(id).copied().unwrap_or(0);
        let a = arrivals.get(id).copied().unwrap_or(0);
        table.insert(id.to_string(), StationTraffic::from_counts(id, d, a));
    }
    table
}

/// Selects both directions for `filter` and aggregates them.
pub fn aggregate_window(buckets: &MinuteBuckets, filter: TimeFilter) -> TrafficTable {
    let departures = select(buckets, Direction::Departures, filter);
    let arrivals = select(buckets, Direction::Arrivals, filter);
    aggregate(&departures, &arrivals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traffic::types::{FlowDescription, TripRecord};

    fn record(start: &str, end: &str, started_at: &str, ended_at: &str) -> TripRecord {
        TripRecord {
            start_station_id: start.to_string(),
            end_station_id: end.to_string(),
            started_at: started_at.to_string(),
            ended_at: ended_at.to_string(),
        }
    }

    /// Station A: 8 departures, 2 arrivals across the day.
    fn lopsided_buckets() -> MinuteBuckets {
        let mut records = Vec::new();
        for hour in 0..8 {
            records.push(record(
                "A",
                "B",
                &format!("2024-03-01 {:02}:10:00", hour * 3),
                &format!("2024-03-01 {:02}:25:00", hour * 3),
            ));
        }
        for hour in [7, 19] {
            records.push(record(
                "C",
                "A",
                &format!("2024-03-02 {hour:02}:00:00"),
                &format!("2024-03-02 {hour:02}:30:00"),
            ));
        }
        MinuteBuckets::build(records)
    }

    #[test]
    fn test_any_time_scenario() {
        let table = aggregate_window(&lopsided_buckets(), TimeFilter::AnyTime);
        let a = &table["A"];

        assert_eq!(a.departures, 8);
        assert_eq!(a.arrivals, 2);
        assert_eq!(a.total_traffic, 10);
        assert_eq!(a.departure_ratio, 0.8);
        assert_eq!(a.flow, FlowDescription::MoreDepartures);

        let b = &table["B"];
        assert_eq!(b.departures, 0);
        assert_eq!(b.arrivals, 8);
        assert_eq!(b.flow, FlowDescription::MoreArrivals);
    }

    #[test]
    fn test_window_restricts_counts() {
        // 07:10 departure from A, 07:30 arrival at A; window around 07:15 is 06:16..=08:15.
        let table = aggregate_window(&lopsided_buckets(), TimeFilter::Minute(435));
        let a = &table["A"];
        assert_eq!(a.departures, 0);
        assert_eq!(a.arrivals, 1);

        let c = &table["C"];
        assert_eq!(c.departures, 1);
        assert_eq!(c.arrivals, 0);
    }

    #[test]
    fn test_totals_and_ratio_invariants() {
        let buckets = lopsided_buckets();
        for filter in [
            TimeFilter::AnyTime,
            TimeFilter::Minute(0),
            TimeFilter::Minute(430),
            TimeFilter::Minute(1439),
        ] {
            for traffic in aggregate_window(&buckets, filter).values() {
                assert_eq!(traffic.departures + traffic.arrivals, traffic.total_traffic);
                assert!((0.0..=1.0).contains(&traffic.departure_ratio));
            }
        }
    }

    #[test]
    fn test_aggregation_is_repeatable() {
        let buckets = lopsided_buckets();
        let first = aggregate_window(&buckets, TimeFilter::Minute(1140));
        let second = aggregate_window(&buckets, TimeFilter::Minute(1140));
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_empty_selection() {
        let table = aggregate(&[], &[]);
        assert!(table.is_empty());
    }

    #[test]
    fn test_idle_station() {
        let idle = StationTraffic::idle("Z");
        assert_eq!(idle.total_traffic, 0);
        assert_eq!(idle.departure_ratio, 0.5);
        assert_eq!(idle.flow, FlowDescription::Balanced);
    }
}
