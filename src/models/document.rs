use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Document {
    pub document_id: i64,
    pub booking_id: i64,
    pub document_type: String,
    pub document_number: String,
    pub issued_at: NaiveDate,
}

#[derive(Debug, Deserialize, Validate)]
pub struct DocumentInput {
    pub booking_id: i64,
    #[validate(length(min = 1))]
    pub document_type: String,
    #[validate(length(min = 1))]
    pub document_number: String,
    pub issued_at: NaiveDate,
}

impl DocumentInput {
    pub fn trimmed(self) -> Self {
        Self {
            document_type: self.document_type.trim().to_string(),
            document_number: self.document_number.trim().to_string(),
            ..self
        }
    }
}
