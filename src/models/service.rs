use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// An extra ordered against a booking (breakfast, transfer, laundry...).
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct AdditionalService {
    pub service_id: i64,
    pub booking_id: i64,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ServiceInput {
    pub booking_id: i64,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(range(min = 1))]
    #[serde(default = "one")]
    pub quantity: i64,
}

impl ServiceInput {
    pub fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            ..self
        }
    }
}

fn one() -> i64 {
    1
}
