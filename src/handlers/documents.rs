use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;
use validator::Validate;

use super::ensure_booking_exists;
use crate::auth::StaffUser;
use crate::errors::ApiError;
use crate::models::document::{Document, DocumentInput};
use crate::models::BookingFilter;

const DOCUMENT_COLUMNS: &str = "document_id, booking_id, document_type, document_number, issued_at";

pub async fn list_documents(
    pool: web::Data<SqlitePool>,
    _staff: StaffUser,
    params: web::Query<BookingFilter>,
) -> Result<HttpResponse, ApiError> {
    let documents = sqlx::query_as::<_, Document>(&format!(
        "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE (?1 IS NULL OR booking_id = ?1) ORDER BY issued_at, document_id"
    ))
    .bind(params.booking_id)
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(documents))
}

pub async fn get_document(
    pool: web::Data<SqlitePool>,
    _staff: StaffUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let document = sqlx::query_as::<_, Document>(&format!(
        "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE document_id = ?"
    ))
    .bind(id)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or_else(|| ApiError::not_found("Document", id))?;

    Ok(HttpResponse::Ok().json(document))
}

pub async fn create_document(
    pool: web::Data<SqlitePool>,
    _staff: StaffUser,
    body: web::Json<DocumentInput>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner().trimmed();
    input.validate()?;

    let mut conn = pool.acquire().await?;
    ensure_booking_exists(&mut conn, input.booking_id).await?;

    let document = sqlx::query_as::<_, Document>(&format!(
        r#"
        INSERT INTO documents (booking_id, document_type, document_number, issued_at)
        VALUES (?, ?, ?, ?)
        RETURNING {DOCUMENT_COLUMNS}
        "#
    ))
    .bind(input.booking_id)
    .bind(&input.document_type)
    .bind(&input.document_number)
    .bind(input.issued_at)
    .fetch_one(&mut *conn)
    .await?;

    Ok(HttpResponse::Created().json(document))
}

pub async fn update_document(
    pool: web::Data<SqlitePool>,
    _staff: StaffUser,
    path: web::Path<i64>,
    body: web::Json<DocumentInput>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let input = body.into_inner().trimmed();
    input.validate()?;

    let mut conn = pool.acquire().await?;
    ensure_booking_exists(&mut conn, input.booking_id).await?;

    let document = sqlx::query_as::<_, Document>(&format!(
        r#"
        UPDATE documents
        SET booking_id = ?, document_type = ?, document_number = ?, issued_at = ?
        WHERE document_id = ?
        RETURNING {DOCUMENT_COLUMNS}
        "#
    ))
    .bind(input.booking_id)
    .bind(&input.document_type)
    .bind(&input.document_number)
    .bind(input.issued_at)
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| ApiError::not_found("Document", id))?;

    Ok(HttpResponse::Ok().json(document))
}

pub async fn delete_document(
    pool: web::Data<SqlitePool>,
    _staff: StaffUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let result = sqlx::query("DELETE FROM documents WHERE document_id = ?")
        .bind(id)
        .execute(pool.get_ref())
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Document", id));
    }

    Ok(HttpResponse::NoContent().finish())
}
