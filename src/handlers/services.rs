use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;
use validator::Validate;

use super::ensure_booking_exists;
use crate::auth::StaffUser;
use crate::errors::ApiError;
use crate::models::service::{AdditionalService, ServiceInput};
use crate::models::BookingFilter;

const SERVICE_COLUMNS: &str = "service_id, booking_id, name, price, quantity";

pub async fn list_services(
    pool: web::Data<SqlitePool>,
    _staff: StaffUser,
    params: web::Query<BookingFilter>,
) -> Result<HttpResponse, ApiError> {
    let services = sqlx::query_as::<_, AdditionalService>(&format!(
        "SELECT {SERVICE_COLUMNS} FROM additional_services WHERE (?1 IS NULL OR booking_id = ?1) ORDER BY service_id"
    ))
    .bind(params.booking_id)
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(services))
}

pub async fn get_service(
    pool: web::Data<SqlitePool>,
    _staff: StaffUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let service = sqlx::query_as::<_, AdditionalService>(&format!(
        "SELECT {SERVICE_COLUMNS} FROM additional_services WHERE service_id = ?"
    ))
    .bind(id)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or_else(|| ApiError::not_found("Service", id))?;

    Ok(HttpResponse::Ok().json(service))
}

pub async fn create_service(
    pool: web::Data<SqlitePool>,
    _staff: StaffUser,
    body: web::Json<ServiceInput>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner().trimmed();
    input.validate()?;

    let mut conn = pool.acquire().await?;
    ensure_booking_exists(&mut conn, input.booking_id).await?;

    let service = sqlx::query_as::<_, AdditionalService>(&format!(
        r#"
        INSERT INTO additional_services (booking_id, name, price, quantity)
        VALUES (?, ?, ?, ?)
        RETURNING {SERVICE_COLUMNS}
        "#
    ))
    .bind(input.booking_id)
    .bind(&input.name)
    .bind(input.price)
    .bind(input.quantity)
    .fetch_one(&mut *conn)
    .await?;

    Ok(HttpResponse::Created().json(service))
}

pub async fn update_service(
    pool: web::Data<SqlitePool>,
    _staff: StaffUser,
    path: web::Path<i64>,
    body: web::Json<ServiceInput>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let input = body.into_inner().trimmed();
    input.validate()?;

    let mut conn = pool.acquire().await?;
    ensure_booking_exists(&mut conn, input.booking_id).await?;

    let service = sqlx::query_as::<_, AdditionalService>(&format!(
        r#"
        UPDATE additional_services
        SET booking_id = ?, name = ?, price = ?, quantity = ?
        WHERE service_id = ?
        RETURNING {SERVICE_COLUMNS}
        "#
    ))
    .bind(input.booking_id)
    .bind(&input.name)
    .bind(input.price)
    .bind(input.quantity)
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| ApiError::not_found("Service", id))?;

    Ok(HttpResponse::Ok().json(service))
}

pub async fn delete_service(
    pool: web::Data<SqlitePool>,
    _staff: StaffUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let result = sqlx::query("DELETE FROM additional_services WHERE service_id = ?")
        .bind(id)
        .execute(pool.get_ref())
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Service", id));
    }

    Ok(HttpResponse::NoContent().finish())
}
