use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;
use validator::Validate;

use crate::auth::StaffUser;
use crate::availability::StayRange;
use crate::errors::ApiError;
use crate::models::room::{AvailabilityQuery, Room, RoomInput, RoomSearch};

const ROOM_COLUMNS: &str = "room_id, room_number, floor, capacity, category, price_per_night";

pub async fn list_rooms(
    pool: web::Data<SqlitePool>,
    _staff: StaffUser,
    params: web::Query<RoomSearch>,
) -> Result<HttpResponse, ApiError> {
    let mut query =
        sqlx::QueryBuilder::new(format!("SELECT {ROOM_COLUMNS} FROM rooms WHERE 1=1"));

    if let Some(category) = &params.category {
        query.push(" AND category = ").push_bind(category.clone());
    }
    if let Some(floor) = params.floor {
        query.push(" AND floor = ").push_bind(floor);
    }
    query.push(" ORDER BY room_number");

    let rooms = query
        .build_query_as::<Room>()
        .fetch_all(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(rooms))
}

pub async fn get_room(
    pool: web::Data<SqlitePool>,
    _staff: StaffUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let room = sqlx::query_as::<_, Room>(&format!("SELECT {ROOM_COLUMNS} FROM rooms WHERE room_id = ?"))
        .bind(id)
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::not_found("Room", id))?;

    Ok(HttpResponse::Ok().json(room))
}

pub async fn create_room(
    pool: web::Data<SqlitePool>,
    _staff: StaffUser,
    body: web::Json<RoomInput>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner().trimmed();
    input.validate()?;

    let room = sqlx::query_as::<_, Room>(&format!(
        r#"
        INSERT INTO rooms (room_number, floor, capacity, category, price_per_night)
        VALUES (?, ?, ?, ?, ?)
        RETURNING {ROOM_COLUMNS}
        "#
    ))
    .bind(&input.room_number)
    .bind(input.floor)
    .bind(input.capacity)
    .bind(&input.category)
    .bind(input.price_per_night)
    .fetch_one(pool.get_ref())
    .await?;

    Ok(HttpResponse::Created().json(room))
}

/// Existing bookings keep the cost they were made with.
pub async fn update_room(
    pool: web::Data<SqlitePool>,
    _staff: StaffUser,
    path: web::Path<i64>,
    body: web::Json<RoomInput>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let input = body.into_inner().trimmed();
    input.validate()?;

    let room = sqlx::query_as::<_, Room>(&format!(
        r#"
        UPDATE rooms
        SET room_number = ?, floor = ?, capacity = ?, category = ?, price_per_night = ?
        WHERE room_id = ?
        RETURNING {ROOM_COLUMNS}
        "#
    ))
    .bind(&input.room_number)
    .bind(input.floor)
    .bind(input.capacity)
    .bind(&input.category)
    .bind(input.price_per_night)
    .bind(id)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or_else(|| ApiError::not_found("Room", id))?;

    Ok(HttpResponse::Ok().json(room))
}

pub async fn delete_room(
    pool: web::Data<SqlitePool>,
    _staff: StaffUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let result = sqlx::query("DELETE FROM rooms WHERE room_id = ?")
        .bind(id)
        .execute(pool.get_ref())
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Room", id));
    }

    Ok(HttpResponse::NoContent().finish())
}

/// Rooms with no active booking overlapping `[arrival, departure)`.
pub async fn available_rooms(
    pool: web::Data<SqlitePool>,
    _staff: StaffUser,
    params: web::Query<AvailabilityQuery>,
) -> Result<HttpResponse, ApiError> {
    let stay = StayRange::new(params.arrival, params.departure)
        .ok_or_else(|| ApiError::BadRequest("Departure must be after arrival".to_string()))?;

    let rooms = sqlx::query_as::<_, Room>(&format!(
        r#"
        SELECT {ROOM_COLUMNS} FROM rooms r
        WHERE r.capacity >= ?
        AND NOT EXISTS (
            SELECT 1 FROM bookings b
            JOIN booking_rooms br ON br.booking_id = b.booking_id
            WHERE br.room_id = r.room_id
            AND b.status = 'active'
            AND b.arrival_date < ?
            AND b.departure_date > ?
        )
        ORDER BY r.room_number
        "#
    ))
    .bind(params.min_capacity.unwrap_or(1))
    .bind(stay.departure)
    .bind(stay.arrival)
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(rooms))
}
