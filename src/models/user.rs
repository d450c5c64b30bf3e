use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::auth::lockout::AccountState;

/// Column list for [`User`]; callers append joins and a WHERE clause.
pub const USER_SELECT: &str = r#"
    SELECT u.user_id, u.first_name, u.last_name, u.phone, u.email, u.user_login,
           u.position_id, p.position_name, p.is_admin, u.created_at, u.login_date,
           u.block, u.failed_attempts, u.password_change_required
    FROM users u
    JOIN positions p ON p.position_id = u.position_id
"#;

/// A user as returned by the API. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub user_login: String,
    pub position_id: i64,
    pub position_name: String,
    pub is_admin: bool,
    pub created_at: NaiveDateTime,
    pub login_date: Option<NaiveDateTime>,
    pub block: bool,
    pub failed_attempts: i64,
    pub password_change_required: bool,
}

/// The credential row consulted during login.
#[derive(Debug, FromRow)]
pub struct Credentials {
    pub user_id: i64,
    pub user_password: String,
    pub block: bool,
    pub failed_attempts: i64,
    pub login_date: Option<NaiveDateTime>,
}

impl Credentials {
    pub fn account_state(&self) -> AccountState {
        AccountState {
            blocked: self.block,
            failed_attempts: u32::try_from(self.failed_attempts).unwrap_or(0),
            last_login: self.login_date,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Position {
    pub position_id: i64,
    pub position_name: String,
    pub is_admin: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
    #[validate(custom = "crate::models::validate_phone")]
    pub phone: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub user_login: String,
    pub position_id: i64,
}

impl CreateUser {
    pub fn trimmed(self) -> Self {
        Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            user_login: self.user_login.trim().to_string(),
            position_id: self.position_id,
        }
    }
}

/// The administrator created on an empty database. Held to the same rules as
/// any other user.
#[derive(Debug, Clone, Validate)]
pub struct AdminAccount {
    #[validate(length(min = 1))]
    pub login: String,
    #[validate(custom = "crate::models::validate_phone")]
    pub phone: String,
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub user_login: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct ChangePassword {
    pub current_password: String,
    pub new_password: String,
    pub repeat_password: String,
}
