//! Data types shared by the traffic pipeline.

use anyhow::{Result, bail};
use chrono::NaiveDateTime;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::traffic::utility::{format_time, minutes_since_midnight, parse_timestamp};

/// Minute of the day, `0..=1439`.
pub type MinuteOfDay = u16;

pub const MINUTES_PER_DAY: usize = 1440;

/// Slider value meaning "no time filter".
pub const ANY_TIME_SLIDER_VALUE: i32 = -1;

/// A docking station as published in the station metadata document.
///
/// Fields other than the key and coordinates are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    #[serde(deserialize_with = "string_or_number")]
    pub short_name: String,
    #[serde(deserialize_with = "number_or_string")]
    pub lon: f64,
    #[serde(deserialize_with = "number_or_string")]
    pub lat: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Station {
    pub fn id(&self) -> &str {
        &self.short_name
    }
}

/// A single row of the trip export, before timestamps are interpreted.
#[derive(Debug, Clone, Deserialize)]
pub struct TripRecord {
    #[serde(default)]
    pub start_station_id: String,
    #[serde(default)]
    pub end_station_id: String,
    pub started_at: String,
    pub ended_at: String,
}

/// A trip with its timestamps parsed and minute-of-day keys precomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trip {
    pub start_station_id: String,
    pub end_station_id: String,
    pub started_at: NaiveDateTime,
    pub ended_at: NaiveDateTime,
    pub started_minute: MinuteOfDay,
    pub ended_minute: MinuteOfDay,
}

impl Trip {
    /// Interprets a raw record. Fails if either timestamp is unreadable.
    pub fn from_record(record: TripRecord) -> Result<Self> {
        let started_at = parse_timestamp(&record.started_at)?;
        let ended_at = parse_timestamp(&record.ended_at)?;

        Ok(Trip {
            start_station_id: record.start_station_id.trim().to_string(),
            end_station_id: record.end_station_id.trim().to_string(),
            started_minute: minutes_since_midnight(&started_at),
            ended_minute: minutes_since_midnight(&ended_at),
            started_at,
            ended_at,
        })
    }
}

/// Time-of-day filter driven by the slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum TimeFilter {
    #[default]
    AnyTime,
    Minute(MinuteOfDay),
}

impl TimeFilter {
    /// Converts a slider reading in `-1..=1439`.
    pub fn from_slider(value: i32) -> Result<Self> {
        match value {
            ANY_TIME_SLIDER_VALUE => Ok(TimeFilter::AnyTime),
            v if (0..MINUTES_PER_DAY as i32).contains(&v) => {
                Ok(TimeFilter::Minute(v as MinuteOfDay))
            }
            v => bail!("slider value {v} outside -1..=1439"),
        }
    }

    pub fn slider_value(&self) -> i32 {
        match self {
            TimeFilter::AnyTime => ANY_TIME_SLIDER_VALUE,
            TimeFilter::Minute(m) => i32::from(*m),
        }
    }

    /// Within an hour of midnight on either side.
    pub fn is_near_midnight(&self) -> bool {
        match self {
            TimeFilter::AnyTime => false,
            TimeFilter::Minute(m) => *m >= 1380 || *m <= 60,
        }
    }

    /// Text for the selected-time label; empty when any time is selected.
    pub fn label(&self) -> String {
        match self {
            TimeFilter::AnyTime => String::new(),
            TimeFilter::Minute(m) => format_time(*m),
        }
    }
}

impl fmt::Display for TimeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeFilter::AnyTime => write!(f, "any time"),
            TimeFilter::Minute(m) => write!(f, "{}", format_time(*m)),
        }
    }
}

/// Which way a station's traffic leans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FlowDescription {
    MoreDepartures,
    MoreArrivals,
    Balanced,
}

impl fmt::Display for FlowDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FlowDescription::MoreDepartures => "More departures",
            FlowDescription::MoreArrivals => "More arrivals",
            FlowDescription::Balanced => "Balanced traffic",
        };
        f.write_str(text)
    }
}

/// Per-station counts for one aggregation pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationTraffic {
    pub station_id: String,
    pub departures: usize,
    pub arrivals: usize,
    pub total_traffic: usize,
    pub departure_ratio: f64,
    pub flow: FlowDescription,
}

fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(de::Error::custom),
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Text(s) => Ok(s),
        Raw::Number(n) => Ok(n.to_string()),
    }
}
