use actix_web::{web, HttpResponse};
use chrono::Utc;
use sqlx::SqlitePool;
use validator::Validate;

use crate::auth::StaffUser;
use crate::errors::ApiError;
use crate::models::client::{Client, ClientInput, ClientSearch};

const CLIENT_COLUMNS: &str =
    "client_id, first_name, last_name, phone, email, passport, registered_at";

pub async fn list_clients(
    pool: web::Data<SqlitePool>,
    _staff: StaffUser,
    params: web::Query<ClientSearch>,
) -> Result<HttpResponse, ApiError> {
    let mut query = sqlx::QueryBuilder::new(format!("SELECT {CLIENT_COLUMNS} FROM clients"));

    if let Some(q) = params.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        let pattern = format!("%{q}%");
        query
            .push(" WHERE first_name LIKE ")
            .push_bind(pattern.clone())
            .push(" OR last_name LIKE ")
            .push_bind(pattern.clone())
            .push(" OR phone LIKE ")
            .push_bind(pattern);
    }
    query.push(" ORDER BY last_name, first_name");

    let clients = query
        .build_query_as::<Client>()
        .fetch_all(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(clients))
}

pub async fn get_client(
    pool: web::Data<SqlitePool>,
    _staff: StaffUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let client = sqlx::query_as::<_, Client>(&format!(
        "SELECT {CLIENT_COLUMNS} FROM clients WHERE client_id = ?"
    ))
    .bind(id)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or_else(|| ApiError::not_found("Client", id))?;

    Ok(HttpResponse::Ok().json(client))
}

pub async fn create_client(
    pool: web::Data<SqlitePool>,
    _staff: StaffUser,
    body: web::Json<ClientInput>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner().trimmed();
    input.validate()?;

    let client = sqlx::query_as::<_, Client>(&format!(
        r#"
        INSERT INTO clients (first_name, last_name, phone, email, passport, registered_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING {CLIENT_COLUMNS}
        "#
    ))
    .bind(&input.first_name)
    .bind(&input.last_name)
    .bind(&input.phone)
    .bind(&input.email)
    .bind(&input.passport)
    .bind(Utc::now().naive_utc())
    .fetch_one(pool.get_ref())
    .await?;

    Ok(HttpResponse::Created().json(client))
}

pub async fn update_client(
    pool: web::Data<SqlitePool>,
    _staff: StaffUser,
    path: web::Path<i64>,
    body: web::Json<ClientInput>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let input = body.into_inner().trimmed();
    input.validate()?;

    let client = sqlx::query_as::<_, Client>(&format!(
        r#"
        UPDATE clients
        SET first_name = ?, last_name = ?, phone = ?, email = ?, passport = ?
        WHERE client_id = ?
        RETURNING {CLIENT_COLUMNS}
        "#
    ))
    .bind(&input.first_name)
    .bind(&input.last_name)
    .bind(&input.phone)
    .bind(&input.email)
    .bind(&input.passport)
    .bind(id)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or_else(|| ApiError::not_found("Client", id))?;

    Ok(HttpResponse::Ok().json(client))
}

/// Clients with bookings cannot be deleted; the foreign key refuses it.
pub async fn delete_client(
    pool: web::Data<SqlitePool>,
    _staff: StaffUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let result = sqlx::query("DELETE FROM clients WHERE client_id = ?")
        .bind(id)
        .execute(pool.get_ref())
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Client", id));
    }

    Ok(HttpResponse::NoContent().finish())
}
