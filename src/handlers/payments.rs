use actix_web::{web, HttpResponse};
use chrono::Utc;
use sqlx::SqlitePool;
use validator::Validate;

use super::ensure_booking_exists;
use crate::auth::StaffUser;
use crate::errors::ApiError;
use crate::models::payment::{Payment, PaymentInput};
use crate::models::BookingFilter;

const PAYMENT_COLUMNS: &str = "payment_id, booking_id, amount, method, paid_at";

pub async fn list_payments(
    pool: web::Data<SqlitePool>,
    _staff: StaffUser,
    params: web::Query<BookingFilter>,
) -> Result<HttpResponse, ApiError> {
    let payments = sqlx::query_as::<_, Payment>(&format!(
        "SELECT {PAYMENT_COLUMNS} FROM payments WHERE (?1 IS NULL OR booking_id = ?1) ORDER BY paid_at"
    ))
    .bind(params.booking_id)
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(payments))
}

pub async fn get_payment(
    pool: web::Data<SqlitePool>,
    _staff: StaffUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let payment = sqlx::query_as::<_, Payment>(&format!(
        "SELECT {PAYMENT_COLUMNS} FROM payments WHERE payment_id = ?"
    ))
    .bind(id)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or_else(|| ApiError::not_found("Payment", id))?;

    Ok(HttpResponse::Ok().json(payment))
}

pub async fn create_payment(
    pool: web::Data<SqlitePool>,
    _staff: StaffUser,
    body: web::Json<PaymentInput>,
) -> Result<HttpResponse, ApiError> {
    body.validate()?;

    let mut conn = pool.acquire().await?;
    ensure_booking_exists(&mut conn, body.booking_id).await?;

    let payment = sqlx::query_as::<_, Payment>(&format!(
        r#"
        INSERT INTO payments (booking_id, amount, method, paid_at)
        VALUES (?, ?, ?, ?)
        RETURNING {PAYMENT_COLUMNS}
        "#
    ))
    .bind(body.booking_id)
    .bind(body.amount)
    .bind(body.method)
    .bind(body.paid_at.unwrap_or_else(|| Utc::now().naive_utc()))
    .fetch_one(&mut *conn)
    .await?;

    log::info!(
        "Payment of {:.2} recorded for booking {}",
        payment.amount,
        payment.booking_id
    );
    Ok(HttpResponse::Created().json(payment))
}

pub async fn update_payment(
    pool: web::Data<SqlitePool>,
    _staff: StaffUser,
    path: web::Path<i64>,
    body: web::Json<PaymentInput>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    body.validate()?;

    let mut conn = pool.acquire().await?;
    ensure_booking_exists(&mut conn, body.booking_id).await?;

    let payment = sqlx::query_as::<_, Payment>(&format!(
        r#"
        UPDATE payments
        SET booking_id = ?, amount = ?, method = ?, paid_at = COALESCE(?, paid_at)
        WHERE payment_id = ?
        RETURNING {PAYMENT_COLUMNS}
        "#
    ))
    .bind(body.booking_id)
    .bind(body.amount)
    .bind(body.method)
    .bind(body.paid_at)
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| ApiError::not_found("Payment", id))?;

    Ok(HttpResponse::Ok().json(payment))
}

pub async fn delete_payment(
    pool: web::Data<SqlitePool>,
    _staff: StaffUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let result = sqlx::query("DELETE FROM payments WHERE payment_id = ?")
        .bind(id)
        .execute(pool.get_ref())
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Payment", id));
    }

    Ok(HttpResponse::NoContent().finish())
}
