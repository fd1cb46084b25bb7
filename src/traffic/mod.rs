//! Time-windowed station traffic.
//!
//! Trips are bucketed by minute-of-day once per dataset load. Every filter
//! change then selects a window of buckets, counts departures and arrivals per
//! station, decorates the static station list with those counts, and derives
//! the marker scales for the presentation layer.

pub mod aggregate;
pub mod bucket;
pub mod flow;
pub mod scale;
pub mod types;
pub mod utility;
pub mod view;
pub mod window;
