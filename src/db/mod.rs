use sqlx::migrate::MigrateError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

use crate::models::user::AdminAccount;

pub async fn get_db_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Create the first administrator when the users table is empty.
///
/// Returns whether a user was created.
pub async fn bootstrap_admin(
    pool: &SqlitePool,
    account: &AdminAccount,
    password_hash: &str,
) -> Result<bool, sqlx::Error> {
    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    if users > 0 {
        return Ok(false);
    }

    let position_id: i64 =
        sqlx::query_scalar("SELECT position_id FROM positions WHERE is_admin = 1 ORDER BY position_id LIMIT 1")
            .fetch_one(pool)
            .await?;

    sqlx::query(
        r#"
        INSERT INTO users
            (first_name, last_name, phone, email, user_login, user_password, position_id, created_at)
        VALUES ('Administrator', '', ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&account.phone)
    .bind(&account.email)
    .bind(&account.login)
    .bind(password_hash)
    .bind(position_id)
    .bind(chrono::Utc::now().naive_utc())
    .execute(pool)
    .await?;

    Ok(true)
}
