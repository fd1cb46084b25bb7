//! Minute-of-day partition of the loaded trips.

use tracing::{debug, warn};

use crate::traffic::types::{MINUTES_PER_DAY, MinuteOfDay, Trip, TripRecord};

/// Index of a trip inside [`MinuteBuckets::trips`].
pub type TripIndex = usize;

/// Which timestamp a bucket set is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Departures,
    Arrivals,
}

/// Owns the loaded trips and two 1440-slot indexes over them.
///
/// Each trip sits in exactly one departure slot (its start minute) and exactly
/// one arrival slot (its end minute).
#[derive(Debug, Clone)]
pub struct MinuteBuckets {
    trips: Vec<Trip>,
    departures: Vec<Vec<TripIndex>>,
    arrivals: Vec<Vec<TripIndex>>,
    excluded: usize,
}

impl MinuteBuckets {
    /// Buckets already-parsed trips.
    pub fn from_trips(trips: Vec<Trip>) -> Self {
        let mut departures = vec![Vec::new(); MINUTES_PER_DAY];
        let mut arrivals = vec![Vec::new(); MINUTES_PER_DAY];

        for (index, trip) in trips.iter().enumerate() {
            departures[usize::from(trip.started_minute) % MINUTES_PER_DAY].push(index);
            arrivals[usize::from(trip.ended_minute) % MINUTES_PER_DAY].push(index);
        }

        MinuteBuckets {
            trips,
            departures,
            arrivals,
            excluded: 0,
        }
    }

    /// Parses and buckets raw trip rows.
    ///
    /// Rows with unreadable timestamps are left out of both bucket sets and
    /// counted in [`MinuteBuckets::excluded`].
    pub fn build<I>(records: I) -> Self
    where
        I: IntoIterator<Item = TripRecord>,
    {
        let mut trips = Vec::new();
        let mut excluded = 0;

        for record in records {
            match Trip::from_record(record) {
                Ok(trip) => trips.push(trip),
                Err(e) => {
                    debug!(error = %e, "Excluding trip with unreadable timestamp");
                    excluded += 1;
                }
            }
        }

        if excluded > 0 {
            warn!(excluded, kept = trips.len(), "Trips excluded from bucketing");
        }

        let mut buckets = Self::from_trips(trips);
        buckets.excluded = excluded;
        buckets
    }

    /// Adds rows that were rejected before reaching the bucketer.
    pub(crate) fn with_extra_excluded(mut self, count: usize) -> Self {
        self.excluded += count;
        self
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn trip(&self, index: TripIndex) -> &Trip {
        &self.trips[index]
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    /// Number of rows that could not be bucketed.
    pub fn excluded(&self) -> usize {
        self.excluded
    }

    pub fn slots(&self, direction: Direction) -> &[Vec<TripIndex>] {
        match direction {
            Direction::Departures => &self.departures,
            Direction::Arrivals => &self.arrivals,
        }
    }

    /// Trips in one minute's slot; `None` past minute 1439.
    pub fn slot(&self, direction: Direction, minute: MinuteOfDay) -> Option<&[TripIndex]> {
        self.slots(direction)
            .get(usize::from(minute))
            .map(Vec::as_slice)
    }
}
