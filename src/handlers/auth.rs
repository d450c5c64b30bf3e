use actix_web::{web, HttpResponse};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::auth::lockout::LoginOutcome;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::SessionUser;
use crate::config::AuthSettings;
use crate::errors::ApiError;
use crate::models::user::{ChangePassword, Credentials, LoginRequest, LoginResponse, User, USER_SELECT};

pub async fn login(
    pool: web::Data<SqlitePool>,
    auth: web::Data<AuthSettings>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let user_login = body.user_login.trim();
    let password = body.password.trim();
    if user_login.is_empty() || password.is_empty() {
        return Err(ApiError::BadRequest("All fields are required".to_string()));
    }

    let mut tx = pool.begin().await?;

    let Some(credentials) = sqlx::query_as::<_, Credentials>(
        "SELECT user_id, user_password, block, failed_attempts, login_date FROM users WHERE user_login = ?",
    )
    .bind(user_login)
    .fetch_optional(&mut *tx)
    .await?
    else {
        log::info!("Login attempt for unknown login {user_login:?}");
        return Err(ApiError::InvalidCredentials);
    };

    let now = Utc::now().naive_utc();
    let state = credentials.account_state();

    let mut verify_error = None;
    let outcome = auth.policy.evaluate(&state, now, || {
        verify_password(password, &credentials.user_password).unwrap_or_else(|e| {
            verify_error = Some(e);
            false
        })
    });
    if let Some(e) = verify_error {
        return Err(e);
    }

    if let Some(next) = state.apply(outcome, now) {
        sqlx::query("UPDATE users SET block = ?, failed_attempts = ?, login_date = ? WHERE user_id = ?")
            .bind(next.blocked)
            .bind(i64::from(next.failed_attempts))
            .bind(next.last_login)
            .bind(credentials.user_id)
            .execute(&mut *tx)
            .await?;
    }

    match outcome {
        LoginOutcome::BlockedForInactivity => {
            log::warn!(
                "User {user_login} blocked after {} days of inactivity",
                auth.policy.inactivity_period.num_days()
            );
        }
        LoginOutcome::LockedOut => {
            log::warn!(
                "User {user_login} blocked after {} failed login attempts",
                auth.policy.max_failed_attempts
            );
        }
        LoginOutcome::WrongPassword { failed_attempts } => {
            log::info!("Wrong password for {user_login} ({failed_attempts} failed attempts)");
        }
        _ => {}
    }

    if !outcome.is_success() {
        tx.commit().await?;
        return Err(if outcome.is_blocked() {
            ApiError::Blocked
        } else {
            ApiError::InvalidCredentials
        });
    }

    let token = Uuid::new_v4().simple().to_string();
    sqlx::query("INSERT INTO sessions (token, user_id, created_at) VALUES (?, ?, ?)")
        .bind(&token)
        .bind(credentials.user_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

    let user = sqlx::query_as::<_, User>(&format!("{USER_SELECT} WHERE u.user_id = ?"))
        .bind(credentials.user_id)
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;

    log::info!("User {user_login} logged in");
    Ok(HttpResponse::Ok().json(LoginResponse { token, user }))
}

pub async fn logout(
    pool: web::Data<SqlitePool>,
    session: SessionUser,
) -> Result<HttpResponse, ApiError> {
    sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(&session.token)
        .execute(pool.get_ref())
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

pub async fn me(session: SessionUser) -> HttpResponse {
    HttpResponse::Ok().json(session.user)
}

pub async fn change_password(
    pool: web::Data<SqlitePool>,
    auth: web::Data<AuthSettings>,
    session: SessionUser,
    body: web::Json<ChangePassword>,
) -> Result<HttpResponse, ApiError> {
    let current = body.current_password.trim();
    let new = body.new_password.trim();
    let repeat = body.repeat_password.trim();

    if current.is_empty() || new.is_empty() || repeat.is_empty() {
        return Err(ApiError::BadRequest("All fields are required".to_string()));
    }
    if new != repeat {
        return Err(ApiError::BadRequest("New passwords do not match".to_string()));
    }
    if new == auth.default_password {
        return Err(ApiError::BadRequest(
            "New password must differ from the default password".to_string(),
        ));
    }

    let stored: String = sqlx::query_scalar("SELECT user_password FROM users WHERE user_id = ?")
        .bind(session.user.user_id)
        .fetch_one(pool.get_ref())
        .await?;

    if !verify_password(current, &stored)? {
        return Err(ApiError::BadRequest("Invalid current password".to_string()));
    }

    let hash = hash_password(new, auth.hashing)?;
    sqlx::query("UPDATE users SET user_password = ?, password_change_required = 0 WHERE user_id = ?")
        .bind(hash)
        .bind(session.user.user_id)
        .execute(pool.get_ref())
        .await?;

    log::info!("User {} changed their password", session.user.user_login);
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Password changed successfully"
    })))
}
