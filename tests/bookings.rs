mod common;

use actix_web::test;
use serde_json::{json, Value};

use common::*;

#[actix_web::test]
async fn test_overlapping_booking_is_rejected() {
    let pool = test_pool().await;
    let token = staff_token(&pool).await;
    let client = create_client(&pool, &token, "79001234567").await;
    let room = create_room(&pool, &token, "101", 50.0).await;

    let resp = post_booking(&pool, &token, client, room, days_from_today(10), days_from_today(14)).await;
    assert_eq!(resp.status(), 201);

    // Back-to-back stays share the changeover day.
    let resp = post_booking(&pool, &token, client, room, days_from_today(14), days_from_today(16)).await;
    assert_eq!(resp.status(), 201);
    let resp = post_booking(&pool, &token, client, room, days_from_today(6), days_from_today(10)).await;
    assert_eq!(resp.status(), 201);

    let resp = post_booking(&pool, &token, client, room, days_from_today(12), days_from_today(13)).await;
    assert_eq!(resp.status(), 409);
    let resp = post_booking(&pool, &token, client, room, days_from_today(5), days_from_today(20)).await;
    assert_eq!(resp.status(), 409);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().starts_with("Room is already booked"));

    // Another room is unaffected.
    let other_room = create_room(&pool, &token, "102", 50.0).await;
    let resp = post_booking(&pool, &token, client, other_room, days_from_today(12), days_from_today(13)).await;
    assert_eq!(resp.status(), 201);
}

#[actix_web::test]
async fn test_booking_cost_and_date_validation() {
    let pool = test_pool().await;
    let token = staff_token(&pool).await;
    let client = create_client(&pool, &token, "79001234567").await;
    let room = create_room(&pool, &token, "101", 80.0).await;

    let resp = post_booking(&pool, &token, client, room, days_from_today(3), days_from_today(6)).await;
    let booking: Value = test::read_body_json(resp).await;
    assert_eq!(booking["total_cost"], 240.0);
    assert_eq!(booking["status"], "active");
    assert_eq!(booking["room_id"], room);

    let resp = post_booking(&pool, &token, client, room, days_from_today(9), days_from_today(9)).await;
    assert_eq!(resp.status(), 400);
    let resp = post_booking(&pool, &token, client, room, days_from_today(9), days_from_today(7)).await;
    assert_eq!(resp.status(), 400);

    let resp = post_booking(&pool, &token, 999, room, days_from_today(20), days_from_today(21)).await;
    assert_eq!(resp.status(), 404);
    let resp = post_booking(&pool, &token, client, 999, days_from_today(20), days_from_today(21)).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_editing_booking_excludes_itself() {
    let pool = test_pool().await;
    let token = staff_token(&pool).await;
    let client = create_client(&pool, &token, "79001234567").await;
    let room = create_room(&pool, &token, "101", 100.0).await;

    let resp = post_booking(&pool, &token, client, room, days_from_today(10), days_from_today(12)).await;
    let first: Value = test::read_body_json(resp).await;
    let first_id = first["booking_id"].as_i64().unwrap();
    let resp = post_booking(&pool, &token, client, room, days_from_today(20), days_from_today(22)).await;
    assert_eq!(resp.status(), 201);

    let edit = |arrival: i64, departure: i64| {
        authed(test::TestRequest::put().uri(&format!("/bookings/{first_id}")), &token).set_json(json!({
            "client_id": client,
            "room_id": room,
            "arrival_date": days_from_today(arrival),
            "departure_date": days_from_today(departure)
        }))
    };

    // Extending over its own nights is fine.
    let resp = send(&pool, edit(9, 15)).await;
    assert_eq!(resp.status(), 200);
    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["total_cost"], 600.0);

    let resp = send(&pool, edit(9, 21)).await;
    assert_eq!(resp.status(), 409);

    let resp = send(
        &pool,
        authed(test::TestRequest::put().uri("/bookings/999"), &token).set_json(json!({
            "client_id": client,
            "room_id": room,
            "arrival_date": days_from_today(40),
            "departure_date": days_from_today(41)
        })),
    )
    .await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_cancelled_booking_frees_the_room() {
    let pool = test_pool().await;
    let token = staff_token(&pool).await;
    let client = create_client(&pool, &token, "79001234567").await;
    let room = create_room(&pool, &token, "101", 100.0).await;

    let resp = post_booking(&pool, &token, client, room, days_from_today(10), days_from_today(12)).await;
    let booking: Value = test::read_body_json(resp).await;
    let id = booking["booking_id"].as_i64().unwrap();

    create_json(
        &pool,
        &token,
        "/payments",
        json!({ "booking_id": id, "amount": 50.0, "method": "card" }),
    )
    .await;

    let resp = send(
        &pool,
        authed(test::TestRequest::post().uri(&format!("/bookings/{id}/cancel")), &token),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["paid_amount"], 50.0);

    // Cancelling twice is refused.
    let resp = send(
        &pool,
        authed(test::TestRequest::post().uri(&format!("/bookings/{id}/cancel")), &token),
    )
    .await;
    assert_eq!(resp.status(), 400);

    let resp = post_booking(&pool, &token, client, room, days_from_today(10), days_from_today(12)).await;
    assert_eq!(resp.status(), 201);
}

#[actix_web::test]
async fn test_cannot_cancel_started_booking() {
    let pool = test_pool().await;
    let token = staff_token(&pool).await;
    let client = create_client(&pool, &token, "79001234567").await;
    let room = create_room(&pool, &token, "101", 100.0).await;

    let resp = post_booking(&pool, &token, client, room, days_from_today(-1), days_from_today(2)).await;
    let booking: Value = test::read_body_json(resp).await;
    let id = booking["booking_id"].as_i64().unwrap();

    let resp = send(
        &pool,
        authed(test::TestRequest::post().uri(&format!("/bookings/{id}/cancel")), &token),
    )
    .await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_available_rooms() {
    let pool = test_pool().await;
    let token = staff_token(&pool).await;
    let client = create_client(&pool, &token, "79001234567").await;
    let booked = create_room(&pool, &token, "101", 100.0).await;
    let free = create_room(&pool, &token, "102", 100.0).await;

    post_booking(&pool, &token, client, booked, days_from_today(10), days_from_today(12)).await;

    let uri = format!(
        "/rooms/available?arrival={}&departure={}",
        days_from_today(11),
        days_from_today(13)
    );
    let resp = send(&pool, authed(test::TestRequest::get().uri(&uri), &token)).await;
    assert_eq!(resp.status(), 200);
    let rooms: Vec<Value> = test::read_body_json(resp).await;
    let ids: Vec<i64> = rooms.iter().map(|r| r["room_id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![free]);

    let uri = format!(
        "/rooms/available?arrival={}&departure={}&min_capacity=3",
        days_from_today(12),
        days_from_today(13)
    );
    let resp = send(&pool, authed(test::TestRequest::get().uri(&uri), &token)).await;
    let rooms: Vec<Value> = test::read_body_json(resp).await;
    assert!(rooms.is_empty());
}

#[actix_web::test]
async fn test_booking_records_follow_the_booking() {
    let pool = test_pool().await;
    let token = staff_token(&pool).await;
    let client = create_client(&pool, &token, "79001234567").await;
    let room = create_room(&pool, &token, "101", 100.0).await;

    let resp = post_booking(&pool, &token, client, room, days_from_today(10), days_from_today(12)).await;
    let booking: Value = test::read_body_json(resp).await;
    let id = booking["booking_id"].as_i64().unwrap();

    let payment = create_json(
        &pool,
        &token,
        "/payments",
        json!({ "booking_id": id, "amount": 200.0, "method": "cash" }),
    )
    .await;
    assert_eq!(payment["method"], "cash");

    let service = create_json(
        &pool,
        &token,
        "/services",
        json!({ "booking_id": id, "name": "Breakfast", "price": 12.5 }),
    )
    .await;
    assert_eq!(service["quantity"], 1);

    create_json(
        &pool,
        &token,
        "/documents",
        json!({
            "booking_id": id,
            "document_type": "invoice",
            "document_number": "INV-1",
            "issued_at": days_from_today(0)
        }),
    )
    .await;

    let resp = send(
        &pool,
        authed(test::TestRequest::post().uri("/payments"), &token)
            .set_json(json!({ "booking_id": id, "amount": 0.0, "method": "cash" })),
    )
    .await;
    assert_eq!(resp.status(), 400);

    let resp = send(
        &pool,
        authed(test::TestRequest::post().uri("/payments"), &token)
            .set_json(json!({ "booking_id": 999, "amount": 10.0, "method": "cash" })),
    )
    .await;
    assert_eq!(resp.status(), 404);

    let resp = send(
        &pool,
        authed(test::TestRequest::get().uri(&format!("/payments?booking_id={id}")), &token),
    )
    .await;
    let payments: Vec<Value> = test::read_body_json(resp).await;
    assert_eq!(payments.len(), 1);

    let resp = send(
        &pool,
        authed(test::TestRequest::delete().uri(&format!("/bookings/{id}")), &token),
    )
    .await;
    assert_eq!(resp.status(), 204);

    for uri in ["/payments", "/services", "/documents"] {
        let resp = send(&pool, authed(test::TestRequest::get().uri(uri), &token)).await;
        let rows: Vec<Value> = test::read_body_json(resp).await;
        assert!(rows.is_empty(), "{uri} still has rows");
    }
}

#[actix_web::test]
async fn test_client_crud_and_search() {
    let pool = test_pool().await;
    let token = staff_token(&pool).await;
    let client = create_client(&pool, &token, "79001234567").await;

    let resp = send(
        &pool,
        authed(test::TestRequest::post().uri("/clients"), &token)
            .set_json(json!({ "first_name": "Oleg", "last_name": "Ivanov", "phone": "79001234567" })),
    )
    .await;
    assert_eq!(resp.status(), 409);

    let resp = send(
        &pool,
        authed(test::TestRequest::put().uri(&format!("/clients/{client}")), &token).set_json(json!({
            "first_name": "Anna",
            "last_name": "Sokolova",
            "phone": "79001234567",
            "email": "anna@example.com"
        })),
    )
    .await;
    assert_eq!(resp.status(), 200);

    let resp = send(&pool, authed(test::TestRequest::get().uri("/clients?q=Soko"), &token)).await;
    let found: Vec<Value> = test::read_body_json(resp).await;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["email"], "anna@example.com");

    let resp = send(&pool, authed(test::TestRequest::get().uri("/clients?q=Petrov"), &token)).await;
    let found: Vec<Value> = test::read_body_json(resp).await;
    assert!(found.is_empty());

    // A client with bookings is kept.
    let room = create_room(&pool, &token, "101", 100.0).await;
    post_booking(&pool, &token, client, room, days_from_today(1), days_from_today(2)).await;
    let resp = send(
        &pool,
        authed(test::TestRequest::delete().uri(&format!("/clients/{client}")), &token),
    )
    .await;
    assert_eq!(resp.status(), 400);

    // So is its room.
    let resp = send(
        &pool,
        authed(test::TestRequest::delete().uri(&format!("/rooms/{room}")), &token),
    )
    .await;
    assert_eq!(resp.status(), 400);
    let resp = send(&pool, authed(test::TestRequest::get().uri(&format!("/rooms/{room}")), &token)).await;
    assert_eq!(resp.status(), 200);

    // An unbooked room can go.
    let spare = create_room(&pool, &token, "102", 100.0).await;
    let resp = send(
        &pool,
        authed(test::TestRequest::delete().uri(&format!("/rooms/{spare}")), &token),
    )
    .await;
    assert_eq!(resp.status(), 204);

    let resp = send(&pool, authed(test::TestRequest::get().uri("/clients/999"), &token)).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_blank_fields_are_rejected() {
    let pool = test_pool().await;
    let token = staff_token(&pool).await;
    let client = create_client(&pool, &token, "79001234567").await;
    let room = create_room(&pool, &token, "101", 100.0).await;
    let resp = post_booking(&pool, &token, client, room, days_from_today(10), days_from_today(12)).await;
    let booking: Value = test::read_body_json(resp).await;
    let id = booking["booking_id"].as_i64().unwrap();

    let rejected = [
        (
            test::TestRequest::post().uri("/clients"),
            json!({ "first_name": "   ", "last_name": "Ivanov", "phone": "79007654321" }),
        ),
        (
            test::TestRequest::put().uri(&format!("/clients/{client}")),
            json!({ "first_name": "Anna", "last_name": "\t", "phone": "79001234567" }),
        ),
        (
            test::TestRequest::post().uri("/rooms"),
            json!({ "room_number": "  ", "floor": 1, "capacity": 2, "category": "standard", "price_per_night": 50.0 }),
        ),
        (
            test::TestRequest::put().uri(&format!("/rooms/{room}")),
            json!({ "room_number": "101", "floor": 1, "capacity": 2, "category": " ", "price_per_night": 50.0 }),
        ),
        (
            test::TestRequest::post().uri("/services"),
            json!({ "booking_id": id, "name": "  ", "price": 10.0 }),
        ),
        (
            test::TestRequest::post().uri("/documents"),
            json!({
                "booking_id": id,
                "document_type": "invoice",
                "document_number": "   ",
                "issued_at": days_from_today(0)
            }),
        ),
    ];
    for (req, body) in rejected {
        let resp = send(&pool, authed(req, &token).set_json(body)).await;
        assert_eq!(resp.status(), 400);
    }

    // Surrounding whitespace is dropped, and a blank email is no email.
    let saved = create_json(
        &pool,
        &token,
        "/clients",
        json!({
            "first_name": " Oleg ",
            "last_name": "Petrov",
            "phone": " 79007654321 ",
            "email": "  ",
            "passport": ""
        }),
    )
    .await;
    assert_eq!(saved["first_name"], "Oleg");
    assert_eq!(saved["phone"], "79007654321");
    assert!(saved["email"].is_null());
    assert!(saved["passport"].is_null());

    let resp = send(&pool, authed(test::TestRequest::get().uri("/rooms"), &token)).await;
    let rooms: Vec<Value> = test::read_body_json(resp).await;
    assert_eq!(rooms.len(), 1);
}
