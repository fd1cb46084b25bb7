//! Selection of minute buckets around the filter time.

use crate::traffic::bucket::{Direction, MinuteBuckets};
use crate::traffic::types::{MINUTES_PER_DAY, MinuteOfDay, TimeFilter, Trip};

const NEAR_MIDNIGHT_HALF_WIDTH: u16 = 30;
const DAYTIME_HALF_WIDTH: u16 = 60;

/// Inclusive span of minutes, possibly wrapping past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: MinuteOfDay,
    pub end: MinuteOfDay,
}

impl Window {
    /// Window centred on `minute`, narrower within an hour of midnight.
    ///
    /// The lower bound sits one minute after `minute - half_width` while the
    /// upper bound is `minute + half_width`, so the span holds
    /// `2 * half_width` minutes.
    /// Minutes past the end of the day wrap around.
    pub fn around(minute: MinuteOfDay) -> Self {
        let minute = minute % MINUTES_PER_DAY as MinuteOfDay;
        let half_width = half_width(minute) as i32;
        let minute = i32::from(minute);
        let day = MINUTES_PER_DAY as i32;

        Window {
            start: ((minute - half_width + 1 + day) % day) as MinuteOfDay,
            end: ((minute + half_width) % day) as MinuteOfDay,
        }
    }

    pub fn wraps(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, minute: MinuteOfDay) -> bool {
        if self.wraps() {
            minute >= self.start || minute <= self.end
        } else {
            (self.start..=self.end).contains(&minute)
        }
    }

    /// Number of minute slots covered.
    pub fn span(&self) -> usize {
        self.ranges().iter().map(|r| r.end() - r.start() + 1).sum()
    }

    /// The one or two contiguous slot ranges making up the window, in visiting order.
    pub fn ranges(&self) -> Vec<std::ops::RangeInclusive<usize>> {
        let start = usize::from(self.start);
        let end = usize::from(self.end);
        if self.wraps() {
            vec![start..=MINUTES_PER_DAY - 1, 0..=end]
        } else {
            vec![start..=end]
        }
    }
}

/// Half-width in minutes used for a filter at `minute`.
pub fn half_width(minute: MinuteOfDay) -> u16 {
    if TimeFilter::Minute(minute).is_near_midnight() {
        NEAR_MIDNIGHT_HALF_WIDTH
    } else {
        DAYTIME_HALF_WIDTH
    }
}

/// The window a filter covers; `None` means every minute.
pub fn window_for(filter: TimeFilter) -> Option<Window> {
    match filter {
        TimeFilter::AnyTime => None,
        TimeFilter::Minute(m) => Some(Window::around(m)),
    }
}

/// Trips in the selected buckets of one direction, in slot order.
pub fn select<'a>(
    buckets: &'a MinuteBuckets,
    direction: Direction,
    filter: TimeFilter,
) -> Vec<&'a Trip> {
    let slots = buckets.slots(direction);

    let ranges = match window_for(filter) {
        None => vec![0..=MINUTES_PER_DAY - 1],
        Some(window) => window.ranges(),
    };

    ranges
        .into_iter()
        .flat_map(|range| slots[range].iter())
        .flatten()
        .map(|&index| buckets.trip(index))
        .collect()
}
