//! Decoders for the station metadata document and the trip export.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use tracing::debug;

use crate::services::dataset_api::TripLoad;
use crate::traffic::types::{Station, TripRecord};

const REQUIRED_TRIP_COLUMNS: &[&str] = &[
    "start_station_id",
    "end_station_id",
    "started_at",
    "ended_at",
];

/// GBFS-style `{"data": {"stations": [...]}}`.
#[derive(Deserialize)]
struct StationEnvelope {
    data: StationList,
}

#[derive(Deserialize)]
struct StationList {
    stations: Vec<Station>,
}

/// Decodes the station metadata JSON.
///
/// Accepts the `{"data": {"stations": [...]}}` envelope, a bare
/// `{"stations": [...]}` object or a plain array. Each shape is decoded
/// directly so a bad record is reported with its line and column.
///
/// # Errors
///
/// Returns an error if the document is not valid JSON, holds no station list,
/// has a malformed station, or lists the same `short_name` twice.
pub fn parse_stations(bytes: &[u8]) -> Result<Vec<Station>> {
    let document: serde_json::Value =
        serde_json::from_slice(bytes).context("station document is not valid JSON")?;

    let stations = if document.get("data").is_some() {
        serde_json::from_slice::<StationEnvelope>(bytes)
            .context("decoding station document")?
            .data
            .stations
    } else if document.get("stations").is_some() {
        serde_json::from_slice::<StationList>(bytes)
            .context("decoding station list")?
            .stations
    } else if document.is_array() {
        serde_json::from_slice::<Vec<Station>>(bytes).context("decoding station array")?
    } else {
        bail!("station document holds no station list");
    };

    {
        let mut seen = HashSet::new();
        for station in &stations {
            if !seen.insert(station.short_name.as_str()) {
                bail!("Duplicate station short_name {:?}", station.short_name);
            }
        }
    }

    Ok(stations)
}

/// Reads trip rows from CSV.
///
/// Rows that fail to decode are counted in [`TripLoad::rejected_rows`] and
/// skipped; a missing required column fails the whole load.
pub fn parse_trips<R: Read>(reader: R) -> Result<TripLoad> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().context("reading trip CSV header")?.clone();
    for column in REQUIRED_TRIP_COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            bail!("trip CSV is missing the '{column}' column");
        }
    }

    let mut load = TripLoad::default();
    for result in rdr.deserialize::<TripRecord>() {
        match result {
            Ok(record) => load.records.push(record),
            Err(e) => {
                debug!(error = %e, "Skipping undecodable trip row");
                load.rejected_rows += 1;
            }
        }
    }

    Ok(load)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stations_envelope() {
        let json = br#"{"last_updated": 1, "data": {"stations": [
            {"short_name": "A32000", "lon": -71.09, "lat": 42.36, "name": "MIT"},
            {"short_name": "B32006", "lon": "-71.07", "lat": "42.35"}
        ]}}"#;

        let stations = parse_stations(json).unwrap();
        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].name.as_deref(), Some("MIT"));
        assert_eq!(stations[1].lat, 42.35);
    }

    #[test]
    fn test_parse_stations_bare_array() {
        let json = br#"[{"short_name": "A", "lon": 0, "lat": 0}]"#;
        assert_eq!(parse_stations(json).unwrap().len(), 1);
    }

    #[test]
    fn test_parse_stations_rejects_duplicates() {
        let json = br#"{"stations": [
            {"short_name": "A", "lon": 0, "lat": 0},
            {"short_name": "A", "lon": 1, "lat": 1}
        ]}"#;
        assert!(parse_stations(json).is_err());
    }

    #[test]
    fn test_parse_stations_reports_bad_record_position() {
        let json = br#"{"data": {"stations": [
            {"short_name": "A", "lon": -71.09, "lat": 42.36},
            {"short_name": "B", "lon": null, "lat": 42.35}
        ]}}"#;

        let message = format!("{:#}", parse_stations(json).unwrap_err());
        assert!(message.starts_with("decoding station document"));
        assert!(message.contains("line 3"), "{message}");
    }

    #[test]
    fn test_parse_stations_no_list() {
        let err = parse_stations(br#"{"ttl": 5}"#).unwrap_err();
        assert!(err.to_string().contains("no station list"));
    }

    #[test]
    fn test_parse_stations_invalid_json() {
        assert!(parse_stations(b"<html>oops</html>").is_err());
        assert!(parse_stations(br#"{"data": {}}"#).is_err());
    }

    #[test]
    fn test_parse_trips_ignores_extra_columns() {
        let csv = "ride_id,rideable_type,started_at,ended_at,start_station_id,end_station_id,is_member\n\
                   r1,classic_bike,2024-03-01 08:00:00,2024-03-01 08:15:00,A32000,B32006,1\n\
                   r2,electric_bike,2024-03-01 09:00:00,2024-03-01 09:05:00,B32006,A32000,0\n";

        let load = parse_trips(csv.as_bytes()).unwrap();
        assert_eq!(load.records.len(), 2);
        assert_eq!(load.rejected_rows, 0);
        assert_eq!(load.records[1].start_station_id, "B32006");
    }

    #[test]
    fn test_parse_trips_counts_short_rows() {
        let csv = "started_at,ended_at,start_station_id,end_station_id\n\
                   2024-03-01 08:00:00,2024-03-01 08:15:00,A,B\n\
                   2024-03-01 08:00:00\n";

        let load = parse_trips(csv.as_bytes()).unwrap();
        assert_eq!(load.records.len(), 1);
        assert_eq!(load.rejected_rows, 1);
    }

    #[test]
    fn test_parse_trips_keeps_bad_timestamps_for_bucketer() {
        let csv = "started_at,ended_at,start_station_id,end_station_id\n\
                   soon,later,A,B\n";

        let load = parse_trips(csv.as_bytes()).unwrap();
        assert_eq!(load.records.len(), 1);
        assert_eq!(load.rejected_rows, 0);
    }

    #[test]
    fn test_parse_trips_missing_column() {
        let csv = "started_at,ended_at,start_station_id\n2024-03-01 08:00:00,2024-03-01 08:15:00,A\n";
        assert!(parse_trips(csv.as_bytes()).is_err());
    }
}
