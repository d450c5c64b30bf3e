use crate::auth::StaffUser;
use crate::availability::{find_conflict, Occupancy, StayRange};
use crate::errors::ApiError;
use crate::models::booking::{Booking, BookingInput, BookingSearch, BookingStatus, BOOKING_SELECT};
use crate::models::room::Room;
use actix_web::{web, HttpResponse};

use sqlx::{SqliteConnection, SqlitePool};

async fn fetch_booking(conn: &mut SqliteConnection, id: i64) -> Result<Booking, ApiError> {
    sqlx::query_as::<_, Booking>(&format!("{BOOKING_SELECT} WHERE b.booking_id = ?"))
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| ApiError::not_found("Booking", id))
}

/// Client and room must exist; returns the room for pricing.
async fn load_parties(conn: &mut SqliteConnection, input: &BookingInput) -> Result<Room, ApiError> {
    sqlx::query_scalar::<_, i64>("SELECT client_id FROM clients WHERE client_id = ?")
        .bind(input.client_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| ApiError::not_found("Client", input.client_id))?;

    let room = sqlx::query_as::<_, Room>(
        "SELECT room_id, room_number, floor, capacity, category, price_per_night FROM rooms WHERE room_id = ?",
    )
    .bind(input.room_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| ApiError::not_found("Room", input.room_id))?;

    Ok(room)
}

/// Reject `stay` if another active booking already holds `room_id` for any of those nights.
/// `exclude` is the booking being edited.
async fn ensure_room_free(
    conn: &mut SqliteConnection,
    room_id: i64,
    stay: &StayRange,
    exclude: Option<i64>,
) -> Result<(), ApiError> {
    let occupied = sqlx::query_as::<_, Occupancy>(
        r#"
        SELECT b.booking_id, b.arrival_date, b.departure_date
        FROM bookings b
        JOIN booking_rooms br ON br.booking_id = b.booking_id
        WHERE br.room_id = ?
        AND b.status = 'active'
        "#,
    )
    .bind(room_id)
    .fetch_all(conn)
    .await?;

    if let Some(conflict) = find_conflict(stay, &occupied, exclude) {
        return Err(ApiError::Conflict(format!(
            "Room is already booked for these dates (booking {conflict})"
        )));
    }
    Ok(())
}

fn validated_stay(input: &BookingInput) -> Result<StayRange, ApiError> {
    input
        .stay()
        .ok_or_else(|| ApiError::BadRequest("Departure must be after arrival".to_string()))
}

pub async fn list_bookings(
    pool: web::Data<SqlitePool>,
    _staff: StaffUser,
    params: web::Query<BookingSearch>,
) -> Result<HttpResponse, ApiError> {
    let mut query = sqlx::QueryBuilder::new(format!("{BOOKING_SELECT} WHERE 1=1"));

    if let Some(client_id) = params.client_id {
        query.push(" AND b.client_id = ").push_bind(client_id);
    }
    if let Some(room_id) = params.room_id {
        query.push(" AND br.room_id = ").push_bind(room_id);
    }
    if let Some(status) = params.status {
        query.push(" AND b.status = ").push_bind(status);
    }
    query.push(" ORDER BY b.arrival_date, b.booking_id");

    let bookings = query
        .build_query_as::<Booking>()
        .fetch_all(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(bookings))
}

pub async fn get_booking(
    pool: web::Data<SqlitePool>,
    _staff: StaffUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = pool.acquire().await?;
    let booking = fetch_booking(&mut conn, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(booking))
}

pub async fn create_booking(
    pool: web::Data<SqlitePool>,
    _staff: StaffUser,
    body: web::Json<BookingInput>,
) -> Result<HttpResponse, ApiError> {
    let stay = validated_stay(&body)?;
    let status = body.status.unwrap_or(BookingStatus::Active);

    // Availability check and insert share one transaction.
    let mut tx = pool.begin().await?;

    let room = load_parties(&mut tx, &body).await?;
    if status == BookingStatus::Active {
        ensure_room_free(&mut tx, room.room_id, &stay, None).await?;
    }

    let total_cost = room.price_per_night * stay.nights() as f64;

    let booking_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO bookings (client_id, arrival_date, departure_date, status, total_cost, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING booking_id
        "#,
    )
    .bind(body.client_id)
    .bind(stay.arrival)
    .bind(stay.departure)
    .bind(status)
    .bind(total_cost)
    .bind(chrono::Utc::now().naive_utc())
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("INSERT INTO booking_rooms (booking_id, room_id) VALUES (?, ?)")
        .bind(booking_id)
        .bind(room.room_id)
        .execute(&mut *tx)
        .await?;

    let booking = fetch_booking(&mut tx, booking_id).await?;
    tx.commit().await?;

    log::info!(
        "Booking {booking_id} created for room {} ({} to {})",
        room.room_number,
        stay.arrival,
        stay.departure
    );
    Ok(HttpResponse::Created().json(booking))
}

/// Replace a booking. The booking never conflicts with itself; cost is recomputed.
pub async fn update_booking(
    pool: web::Data<SqlitePool>,
    _staff: StaffUser,
    path: web::Path<i64>,
    body: web::Json<BookingInput>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let stay = validated_stay(&body)?;

    let mut tx = pool.begin().await?;

    let existing = fetch_booking(&mut tx, id).await?;
    let status = body.status.unwrap_or(existing.status);

    let room = load_parties(&mut tx, &body).await?;
    if status == BookingStatus::Active {
        ensure_room_free(&mut tx, room.room_id, &stay, Some(id)).await?;
    }

    let total_cost = room.price_per_night * stay.nights() as f64;

    sqlx::query(
        r#"
        UPDATE bookings
        SET client_id = ?, arrival_date = ?, departure_date = ?, status = ?, total_cost = ?
        WHERE booking_id = ?
        "#,
    )
    .bind(body.client_id)
    .bind(stay.arrival)
    .bind(stay.departure)
    .bind(status)
    .bind(total_cost)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    sqlx::query("UPDATE booking_rooms SET room_id = ? WHERE booking_id = ?")
        .bind(room.room_id)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let booking = fetch_booking(&mut tx, id).await?;
    tx.commit().await?;

    Ok(HttpResponse::Ok().json(booking))
}

pub async fn cancel_booking(
    pool: web::Data<SqlitePool>,
    _staff: StaffUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let mut tx = pool.begin().await?;

    let booking = fetch_booking(&mut tx, id).await?;

    if booking.status != BookingStatus::Active {
        return Err(ApiError::BadRequest(
            "Only active bookings can be cancelled".to_string(),
        ));
    }

    let today = chrono::Utc::now().naive_utc().date();
    if booking.arrival_date <= today {
        return Err(ApiError::BadRequest(
            "Cannot cancel booking after or on arrival date".to_string(),
        ));
    }

    sqlx::query("UPDATE bookings SET status = 'cancelled' WHERE booking_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let paid_amount: f64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(amount), 0.0) FROM payments WHERE booking_id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

    tx.commit().await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Booking cancelled successfully",
        "booking_id": id,
        "paid_amount": paid_amount
    })))
}

/// Payments, services and documents of the booking go with it.
pub async fn delete_booking(
    pool: web::Data<SqlitePool>,
    _staff: StaffUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let result = sqlx::query("DELETE FROM bookings WHERE booking_id = ?")
        .bind(id)
        .execute(pool.get_ref())
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Booking", id));
    }

    Ok(HttpResponse::NoContent().finish())
}
