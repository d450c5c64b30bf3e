use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct Room {
    pub room_id: i64,
    pub room_number: String,
    pub floor: i64,
    pub capacity: i64,
    pub category: String,
    pub price_per_night: f64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RoomInput {
    #[validate(length(min = 1))]
    pub room_number: String,
    pub floor: i64,
    #[validate(range(min = 1))]
    pub capacity: i64,
    #[validate(length(min = 1))]
    pub category: String,
    #[validate(range(min = 0.0))]
    pub price_per_night: f64,
}

impl RoomInput {
    pub fn trimmed(self) -> Self {
        Self {
            room_number: self.room_number.trim().to_string(),
            category: self.category.trim().to_string(),
            ..self
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RoomSearch {
    pub category: Option<String>,
    pub floor: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub arrival: NaiveDate,
    pub departure: NaiveDate,
    pub min_capacity: Option<i64>,
}
