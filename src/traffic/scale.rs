//! Marker scales derived from the current frame.

use serde::Serialize;

use crate::traffic::types::TimeFilter;

const ANY_TIME_RANGE: (f64, f64) = (3.0, 15.0);
const NEAR_MIDNIGHT_RANGE: (f64, f64) = (3.0, 10.0);
const WINDOW_RANGE: (f64, f64) = (5.0, 20.0);

/// Discrete color levels for the departure ratio.
pub const FLOW_LEVELS: [f64; 3] = [0.0, 0.5, 1.0];

/// Square-root scale from total traffic to marker radius.
///
/// Marker area grows linearly with traffic. Values past the domain maximum
/// extrapolate rather than clamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadiusScale {
    pub domain_max: f64,
    pub range: (f64, f64),
}

impl RadiusScale {
    /// Scale for a frame whose busiest station has `max_total_traffic` trips.
    pub fn for_filter(max_total_traffic: usize, filter: TimeFilter) -> Self {
        let range = match filter {
            TimeFilter::AnyTime => ANY_TIME_RANGE,
            f if f.is_near_midnight() => NEAR_MIDNIGHT_RANGE,
            _ => WINDOW_RANGE,
        };

        RadiusScale {
            domain_max: max_total_traffic.max(1) as f64,
            range,
        }
    }

    pub fn radius(&self, total_traffic: usize) -> f64 {
        let (r0, r1) = self.range;
        let t = (total_traffic as f64).sqrt() / self.domain_max.sqrt();
        r0 + (r1 - r0) * t
    }
}

/// Quantizes a departure ratio into one of [`FLOW_LEVELS`].
///
/// `[0, 1]` is cut into equal thirds; values outside are clamped.
pub fn flow_intensity(ratio: f64) -> f64 {
    let n = FLOW_LEVELS.len();
    let bucket = (ratio * n as f64).floor();
    let index = if bucket.is_nan() {
        n / 2
    } else {
        bucket.clamp(0.0, (n - 1) as f64) as usize
    };
    FLOW_LEVELS[index]
}
