use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Client {
    pub client_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub passport: Option<String>,
    pub registered_at: NaiveDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ClientInput {
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
    #[validate(custom = "crate::models::validate_phone")]
    pub phone: String,
    #[validate(email)]
    pub email: Option<String>,
    pub passport: Option<String>,
}

impl ClientInput {
    pub fn trimmed(self) -> Self {
        Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty()),
            passport: self.passport.map(|p| p.trim().to_string()).filter(|p| !p.is_empty()),
        }
    }
}

/// `?q=` matches first name, last name or phone.
#[derive(Debug, Deserialize)]
pub struct ClientSearch {
    pub q: Option<String>,
}
