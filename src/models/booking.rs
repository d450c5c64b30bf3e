use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::availability::StayRange;

/// Bookings joined with the room they hold.
pub const BOOKING_SELECT: &str = r#"
    SELECT b.booking_id, b.client_id, br.room_id, b.arrival_date, b.departure_date,
           b.status, b.total_cost, b.created_at
    FROM bookings b
    JOIN booking_rooms br ON br.booking_id = b.booking_id
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum BookingStatus {
    Active,
    Cancelled,
    Completed,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub booking_id: i64,
    pub client_id: i64,
    pub room_id: i64,
    pub arrival_date: NaiveDate,
    pub departure_date: NaiveDate,
    pub status: BookingStatus,
    pub total_cost: f64,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
pub struct BookingInput {
    pub client_id: i64,
    pub room_id: i64,
    pub arrival_date: NaiveDate,
    pub departure_date: NaiveDate,
    /// New bookings default to active.
    pub status: Option<BookingStatus>,
}

impl BookingInput {
    pub fn stay(&self) -> Option<StayRange> {
        StayRange::new(self.arrival_date, self.departure_date)
    }
}

#[derive(Debug, Deserialize)]
pub struct BookingSearch {
    pub client_id: Option<i64>,
    pub room_id: Option<i64>,
    pub status: Option<BookingStatus>,
}
