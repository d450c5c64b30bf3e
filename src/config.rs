use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::env;

use crate::auth::lockout::LockoutPolicy;
use crate::auth::password::Argon2Params;
use crate::models::user::AdminAccount;

/// Service settings, built from defaults and `HOTEL_*` environment variables.
///
/// `DATABASE_URL` is read without the prefix, the same variable sqlx tooling uses.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub database_url: String,
    pub bind_address: String,
    pub port: u16,
    pub max_connections: u32,
    pub max_failed_attempts: u32,
    pub inactivity_block_days: i64,
    pub default_password: String,
    pub admin_login: Option<String>,
    pub admin_phone: String,
    pub admin_email: String,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("database_url", "sqlite://hotel.db?mode=rwc")?
            .set_default("bind_address", "127.0.0.1")?
            .set_default("port", 8080)?
            .set_default("max_connections", 5)?
            .set_default("max_failed_attempts", 3)?
            .set_default("inactivity_block_days", 30)?
            .set_default("default_password", "1234")?
            .set_default("admin_phone", "0000000000")?
            .set_default("admin_email", "admin@hotel.local")?
            .add_source(Environment::with_prefix("HOTEL"))
            .set_override_option("database_url", env::var("DATABASE_URL").ok())?
            .build()?
            .try_deserialize()
    }

    /// The bootstrap administrator, when `admin_login` is set.
    pub fn admin_account(&self) -> Option<AdminAccount> {
        self.admin_login.as_ref().map(|login| AdminAccount {
            login: login.trim().to_string(),
            phone: self.admin_phone.trim().to_string(),
            email: self.admin_email.trim().to_string(),
        })
    }

    pub fn auth(&self) -> AuthSettings {
        AuthSettings {
            policy: LockoutPolicy::new(
                self.max_failed_attempts,
                chrono::Duration::days(self.inactivity_block_days),
            ),
            default_password: self.default_password.clone(),
            hashing: Argon2Params::default(),
        }
    }
}

/// Everything the auth handlers need besides the pool.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub policy: LockoutPolicy,
    pub default_password: String,
    pub hashing: Argon2Params,
}
