//! Room double-booking guard.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A stay as a half-open range: the guest leaves on `departure`, so the
/// room is free again that day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayRange {
    pub arrival: NaiveDate,
    pub departure: NaiveDate,
}

impl StayRange {
    pub fn new(arrival: NaiveDate, departure: NaiveDate) -> Option<Self> {
        (arrival < departure).then_some(Self { arrival, departure })
    }

    pub fn nights(&self) -> i64 {
        (self.departure - self.arrival).num_days()
    }

    pub fn overlaps(&self, other: &StayRange) -> bool {
        !(other.departure <= self.arrival || other.arrival >= self.departure)
    }
}

/// An active booking already holding a room.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct Occupancy {
    pub booking_id: i64,
    pub arrival_date: NaiveDate,
    pub departure_date: NaiveDate,
}

impl Occupancy {
    pub fn range(&self) -> StayRange {
        StayRange {
            arrival: self.arrival_date,
            departure: self.departure_date,
        }
    }
}

/// First existing booking that collides with `candidate`, skipping `exclude`
/// (the booking being edited).
pub fn find_conflict(
    candidate: &StayRange,
    existing: &[Occupancy],
    exclude: Option<i64>,
) -> Option<i64> {
    existing
        .iter()
        .filter(|o| Some(o.booking_id) != exclude)
        .find(|o| candidate.overlaps(&o.range()))
        .map(|o| o.booking_id)
}
