//! Request extractors for session-gated routes.
//!
//! [`SessionUser`] only needs a live session for an unblocked account.
//! [`StaffUser`] also requires the first-login password change to be done.
//! [`AdminUser`] requires a staff user holding an admin position.

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use sqlx::SqlitePool;
use std::future::Future;
use std::pin::Pin;

use crate::errors::ApiError;
use crate::models::user::{User, USER_SELECT};

type ExtractFuture<T> = Pin<Box<dyn Future<Output = Result<T, ApiError>>>>;

#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Clone)]
pub struct StaffUser(pub SessionUser);

#[derive(Debug, Clone)]
pub struct AdminUser(pub SessionUser);

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

impl FromRequest for SessionUser {
    type Error = ApiError;
    type Future = ExtractFuture<Self>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = bearer_token(req);
        let pool = req.app_data::<web::Data<SqlitePool>>().cloned();

        Box::pin(async move {
            let token = token.ok_or(ApiError::Unauthenticated)?;
            let pool = pool.ok_or_else(|| ApiError::Internal {
                operation: "access database pool".to_string(),
            })?;

            let user = sqlx::query_as::<_, User>(&format!(
                "{USER_SELECT} JOIN sessions s ON s.user_id = u.user_id WHERE s.token = ?"
            ))
            .bind(&token)
            .fetch_optional(pool.get_ref())
            .await?
            .ok_or(ApiError::Unauthenticated)?;

            if user.block {
                return Err(ApiError::Blocked);
            }

            Ok(SessionUser { user, token })
        })
    }
}

impl FromRequest for StaffUser {
    type Error = ApiError;
    type Future = ExtractFuture<Self>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let session = SessionUser::from_request(req, payload);
        Box::pin(async move {
            let session = session.await?;
            if session.user.password_change_required {
                return Err(ApiError::PasswordChangeRequired);
            }
            Ok(StaffUser(session))
        })
    }
}

impl FromRequest for AdminUser {
    type Error = ApiError;
    type Future = ExtractFuture<Self>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let staff = StaffUser::from_request(req, payload);
        Box::pin(async move {
            let StaffUser(session) = staff.await?;
            if !session.user.is_admin {
                return Err(ApiError::Forbidden(
                    "Administrator position required".to_string(),
                ));
            }
            Ok(AdminUser(session))
        })
    }
}
