pub mod booking;
pub mod client;
pub mod document;
pub mod payment;
pub mod room;
pub mod service;
pub mod user;

use serde::Deserialize;
use validator::ValidationError;

/// Phones are stored as bare digits.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.is_empty() || !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new("phone_digits_only"));
    }
    Ok(())
}

/// `?booking_id=` filter shared by the booking-scoped lists.
#[derive(Debug, Deserialize)]
pub struct BookingFilter {
    pub booking_id: Option<i64>,
}
