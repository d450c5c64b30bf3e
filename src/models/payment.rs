use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub payment_id: i64,
    pub booking_id: i64,
    pub amount: f64,
    pub method: PaymentMethod,
    pub paid_at: NaiveDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PaymentInput {
    pub booking_id: i64,
    #[validate(range(min = 0.01))]
    pub amount: f64,
    pub method: PaymentMethod,
    /// Defaults to the time the payment is recorded.
    pub paid_at: Option<NaiveDateTime>,
}
