use crate::traffic::types::FlowDescription;

/// Ratio assigned to stations with no traffic at all.
pub const NEUTRAL_RATIO: f64 = 0.5;

const MORE_DEPARTURES_ABOVE: f64 = 0.6;
const MORE_ARRIVALS_BELOW: f64 = 0.4;

/// Fraction of a station's traffic that is outbound.
///
/// Zero traffic yields [`NEUTRAL_RATIO`] so idle stations are not colored
/// towards either end.
pub fn departure_ratio(departures: usize, arrivals: usize) -> f64 {
    let total = departures + arrivals;
    if total == 0 {
        NEUTRAL_RATIO
    } else {
        departures as f64 / total as f64
    }
}

/// Converts a departure ratio into a flow band.
///
/// | Ratio        | Flow           |
/// |--------------|----------------|
/// | > 0.6        | MoreDepartures |
/// | < 0.4        | MoreArrivals   |
/// | otherwise    | Balanced       |
pub fn classify(ratio: f64) -> FlowDescription {
    match ratio {
        r if r > MORE_DEPARTURES_ABOVE => FlowDescription::MoreDepartures,
        r if r < MORE_ARRIVALS_BELOW => FlowDescription::MoreArrivals,
        _ => FlowDescription::Balanced,
    }
}
