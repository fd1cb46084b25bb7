use bikeshare_traffic::config::SourceConfig;
use bikeshare_traffic::infra::bluebikes::BluebikesClient;
use bikeshare_traffic::parser::{parse_stations, parse_trips};
use bikeshare_traffic::session::TrafficSession;
use bikeshare_traffic::stats::FrameStats;
use bikeshare_traffic::traffic::bucket::{Direction, MinuteBuckets};
use bikeshare_traffic::traffic::types::{FlowDescription, TimeFilter};

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn fixture_session() -> TrafficSession {
    let stations = parse_stations(include_bytes!("fixtures/stations.json")).unwrap();
    let load = parse_trips(&include_bytes!("fixtures/trips.csv")[..]).unwrap();
    TrafficSession::new(stations, MinuteBuckets::build(load.records))
}

#[test]
fn test_fixture_partition() {
    let session = fixture_session();
    let buckets = session.buckets();

    assert_eq!(buckets.len(), 12);
    assert_eq!(buckets.excluded(), 1);

    for direction in [Direction::Departures, Direction::Arrivals] {
        let entries: usize = buckets.slots(direction).iter().map(Vec::len).sum();
        assert_eq!(entries, buckets.len());
    }
}

#[test]
fn test_any_time_frame() {
    let session = fixture_session();
    let frame = session.frame();
    let mit = &frame.stations[0];

    assert_eq!(mit.id(), "M32006");
    assert_eq!(mit.departures, 8);
    assert_eq!(mit.arrivals, 2);
    assert_eq!(mit.total_traffic, 10);
    assert_eq!(mit.departure_ratio, 0.8);
    assert_eq!(mit.flow_description, FlowDescription::MoreDepartures);
    assert_eq!(frame.radius_scale.radius(mit.total_traffic), 15.0);

    let boylston = &frame.stations[3];
    assert_eq!(boylston.total_traffic, 0);
    assert_eq!(boylston.flow_description, FlowDescription::Balanced);
    assert_eq!(frame.radius_scale.radius(0), 3.0);
}

#[test]
fn test_morning_rush_window() {
    let mut session = fixture_session();
    // 08:00 covers 07:01..=09:00.
    let frame = session.on_filter_change(480).unwrap();

    let mit = &frame.stations[0];
    assert_eq!(mit.departures, 4);
    assert_eq!(mit.arrivals, 0);

    let central = &frame.stations[1];
    assert_eq!(central.arrivals, 3);
    assert_eq!(central.flow_description, FlowDescription::MoreArrivals);
    assert_eq!(frame.radius_scale.range, (5.0, 20.0));
}

#[test]
fn test_midnight_window_spans_both_days() {
    let mut session = fixture_session();
    let frame = session.on_filter_change(0).unwrap().clone();

    assert_eq!(frame.filter, TimeFilter::Minute(0));
    assert_eq!(frame.departures_in_window, 2);
    assert_eq!(frame.arrivals_in_window, 2);

    let back_bay = &frame.stations[2];
    assert_eq!(back_bay.departures, 2);
    assert_eq!(frame.radius_scale.range, (3.0, 10.0));

    let again = session.on_filter_change(0).unwrap();
    assert_eq!(&frame, again);
}

#[test]
fn test_stats_for_fixture() {
    let session = fixture_session();
    let stats = FrameStats::from_frame(session.frame());

    assert_eq!(stats.stations, 4);
    assert_eq!(stats.active_stations, 3);
    assert_eq!(stats.busiest_station.as_deref(), Some("M32006"));
    // The dockless ride has no start station.
    assert_eq!(stats.departures_in_window, 12);
    assert_eq!(stats.matched_departures, 11);
}

#[tokio::test]
async fn test_load_from_files() {
    let client = BluebikesClient::new(SourceConfig {
        stations: fixture("stations.json"),
        trips: fixture("trips.csv"),
        ..SourceConfig::default()
    });

    let session = TrafficSession::load(&client).await.unwrap();
    assert_eq!(session.stations().len(), 4);
    assert_eq!(session.buckets().len(), 12);
    assert_eq!(session.buckets().excluded(), 1);
}

#[tokio::test]
async fn test_load_fails_without_stations() {
    let client = BluebikesClient::new(SourceConfig {
        stations: fixture("missing.json"),
        trips: fixture("trips.csv"),
        ..SourceConfig::default()
    });

    assert!(TrafficSession::load(&client).await.is_err());
}
