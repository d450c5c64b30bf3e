#![allow(dead_code)]

use actix_web::dev::ServiceResponse;
use actix_web::{test, web, App};
use chrono::{Duration, NaiveDate, Utc};
use serde_json::{json, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

use hotel_desk::auth::lockout::LockoutPolicy;
use hotel_desk::auth::password::{hash_password, Argon2Params};
use hotel_desk::config::AuthSettings;
use hotel_desk::{db, handlers};

pub const ADMIN_POSITION: i64 = 1;
pub const RECEPTIONIST_POSITION: i64 = 2;

/// Single-connection in-memory database; every connection to `:memory:` is a fresh database.
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();
    db::run_migrations(&pool).await.unwrap();
    pool
}

pub fn test_auth() -> AuthSettings {
    AuthSettings {
        policy: LockoutPolicy::default(),
        default_password: "1234".to_string(),
        hashing: Argon2Params::insecure_fast(),
    }
}

pub async fn send(pool: &SqlitePool, req: test::TestRequest) -> ServiceResponse {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(test_auth()))
            .configure(handlers::configure),
    )
    .await;
    test::call_service(&app, req.to_request()).await
}

pub fn authed(req: test::TestRequest, token: &str) -> test::TestRequest {
    req.insert_header(("Authorization", format!("Bearer {token}")))
}

/// Distinct digits-only phone per login.
fn phone_for(login: &str) -> String {
    login.bytes().map(|b| format!("{b:03}")).collect()
}

/// Insert a user that has already changed the default password.
pub async fn insert_user(pool: &SqlitePool, login: &str, password: &str, position_id: i64) -> i64 {
    let hash = hash_password(password, Argon2Params::insecure_fast()).unwrap();
    sqlx::query_scalar(
        r#"
        INSERT INTO users
            (first_name, last_name, phone, email, user_login, user_password, position_id,
             created_at, password_change_required)
        VALUES ('Test', 'User', ?, 'test@example.com', ?, ?, ?, ?, 0)
        RETURNING user_id
        "#,
    )
    .bind(phone_for(login))
    .bind(login)
    .bind(hash)
    .bind(position_id)
    .bind(Utc::now().naive_utc())
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn login(pool: &SqlitePool, login: &str, password: &str) -> ServiceResponse {
    send(
        pool,
        test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "user_login": login, "password": password })),
    )
    .await
}

pub async fn token_for(pool: &SqlitePool, user: &str, password: &str) -> String {
    let resp = login(pool, user, password).await;
    assert!(resp.status().is_success(), "login failed: {}", resp.status());
    let body: Value = test::read_body_json(resp).await;
    body["token"].as_str().unwrap().to_string()
}

pub async fn admin_token(pool: &SqlitePool) -> String {
    insert_user(pool, "admin", "admin-pass", ADMIN_POSITION).await;
    token_for(pool, "admin", "admin-pass").await
}

pub async fn staff_token(pool: &SqlitePool) -> String {
    insert_user(pool, "reception", "desk-pass", RECEPTIONIST_POSITION).await;
    token_for(pool, "reception", "desk-pass").await
}

pub fn days_from_today(days: i64) -> NaiveDate {
    Utc::now().date_naive() + Duration::days(days)
}

pub async fn create_json(pool: &SqlitePool, token: &str, uri: &str, body: Value) -> Value {
    let resp = send(
        pool,
        authed(test::TestRequest::post().uri(uri), token).set_json(body),
    )
    .await;
    assert_eq!(resp.status(), 201, "POST {uri} failed");
    test::read_body_json(resp).await
}

pub async fn create_client(pool: &SqlitePool, token: &str, phone: &str) -> i64 {
    let client = create_json(
        pool,
        token,
        "/clients",
        json!({ "first_name": "Anna", "last_name": "Petrova", "phone": phone }),
    )
    .await;
    client["client_id"].as_i64().unwrap()
}

pub async fn create_room(pool: &SqlitePool, token: &str, number: &str, price: f64) -> i64 {
    let room = create_json(
        pool,
        token,
        "/rooms",
        json!({
            "room_number": number,
            "floor": 2,
            "capacity": 2,
            "category": "standard",
            "price_per_night": price
        }),
    )
    .await;
    room["room_id"].as_i64().unwrap()
}

pub async fn post_booking(
    pool: &SqlitePool,
    token: &str,
    client_id: i64,
    room_id: i64,
    arrival: NaiveDate,
    departure: NaiveDate,
) -> ServiceResponse {
    send(
        pool,
        authed(test::TestRequest::post().uri("/bookings"), token).set_json(json!({
            "client_id": client_id,
            "room_id": room_id,
            "arrival_date": arrival,
            "departure_date": departure
        })),
    )
    .await
}
