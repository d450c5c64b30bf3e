use actix_web::{web, HttpResponse};
use chrono::Utc;
use sqlx::SqlitePool;
use validator::Validate;

use crate::auth::password::hash_password;
use crate::auth::AdminUser;
use crate::config::AuthSettings;
use crate::errors::ApiError;
use crate::models::user::{CreateUser, Position, User, USER_SELECT};

pub async fn list_users(
    pool: web::Data<SqlitePool>,
    _admin: AdminUser,
) -> Result<HttpResponse, ApiError> {
    let users = sqlx::query_as::<_, User>(&format!("{USER_SELECT} ORDER BY u.user_id"))
        .fetch_all(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(users))
}

pub async fn get_user(
    pool: web::Data<SqlitePool>,
    _admin: AdminUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let user = sqlx::query_as::<_, User>(&format!("{USER_SELECT} WHERE u.user_id = ?"))
        .bind(id)
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::not_found("User", id))?;

    Ok(HttpResponse::Ok().json(user))
}

/// New accounts always start with the default password and must change it on first login.
pub async fn create_user(
    pool: web::Data<SqlitePool>,
    auth: web::Data<AuthSettings>,
    admin: AdminUser,
    body: web::Json<CreateUser>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner().trimmed();
    input.validate()?;

    let password_hash = hash_password(&auth.default_password, auth.hashing)?;

    let user_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO users
            (first_name, last_name, phone, email, user_login, user_password, position_id,
             created_at, block, failed_attempts, password_change_required)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, 0, 1)
        RETURNING user_id
        "#,
    )
    .bind(&input.first_name)
    .bind(&input.last_name)
    .bind(&input.phone)
    .bind(&input.email)
    .bind(&input.user_login)
    .bind(password_hash)
    .bind(input.position_id)
    .bind(Utc::now().naive_utc())
    .fetch_one(pool.get_ref())
    .await?;

    let user = sqlx::query_as::<_, User>(&format!("{USER_SELECT} WHERE u.user_id = ?"))
        .bind(user_id)
        .fetch_one(pool.get_ref())
        .await?;

    log::info!(
        "User {} created by {}",
        user.user_login,
        admin.0.user.user_login
    );
    Ok(HttpResponse::Created().json(user))
}

pub async fn block_user(
    pool: web::Data<SqlitePool>,
    admin: AdminUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let login = path.into_inner();

    let result = sqlx::query("UPDATE users SET block = 1 WHERE user_login = ?")
        .bind(&login)
        .execute(pool.get_ref())
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("User", &login));
    }

    log::warn!("User {login} blocked by {}", admin.0.user.user_login);
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "User blocked",
        "user_login": login
    })))
}

/// Clears the block and the failed-attempt counter. An inactivity clock that
/// already ran out restarts from now, otherwise the next login would block again.
pub async fn unblock_user(
    pool: web::Data<SqlitePool>,
    admin: AdminUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let login = path.into_inner();

    let result = sqlx::query(
        r#"
        UPDATE users
        SET block = 0,
            failed_attempts = 0,
            login_date = CASE WHEN login_date IS NULL THEN NULL ELSE ? END
        WHERE user_login = ?
        "#,
    )
    .bind(Utc::now().naive_utc())
    .bind(&login)
    .execute(pool.get_ref())
    .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("User", &login));
    }

    log::info!("User {login} unblocked by {}", admin.0.user.user_login);
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "User unblocked",
        "user_login": login
    })))
}

pub async fn list_positions(
    pool: web::Data<SqlitePool>,
    _admin: AdminUser,
) -> Result<HttpResponse, ApiError> {
    let positions = sqlx::query_as::<_, Position>(
        "SELECT position_id, position_name, is_admin FROM positions ORDER BY position_id",
    )
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(positions))
}
