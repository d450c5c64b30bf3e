pub mod auth;
pub mod bookings;
pub mod clients;
pub mod documents;
pub mod payments;
pub mod rooms;
pub mod services;
pub mod users;

use actix_web::web;
use sqlx::SqliteConnection;

use crate::errors::ApiError;

/// Register every route. Shared by `main` and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/login", web::post().to(auth::login))
            .route("/logout", web::post().to(auth::logout))
            .route("/me", web::get().to(auth::me))
            .route("/password", web::post().to(auth::change_password)),
    )
    .service(
        web::scope("/users")
            .route("", web::get().to(users::list_users))
            .route("", web::post().to(users::create_user))
            .route("/{id}", web::get().to(users::get_user))
            .route("/{login}/block", web::post().to(users::block_user))
            .route("/{login}/unblock", web::post().to(users::unblock_user)),
    )
    .route("/positions", web::get().to(users::list_positions))
    .service(
        web::scope("/clients")
            .route("", web::get().to(clients::list_clients))
            .route("", web::post().to(clients::create_client))
            .route("/{id}", web::get().to(clients::get_client))
            .route("/{id}", web::put().to(clients::update_client))
            .route("/{id}", web::delete().to(clients::delete_client)),
    )
    .service(
        web::scope("/rooms")
            .route("", web::get().to(rooms::list_rooms))
            .route("", web::post().to(rooms::create_room))
            .route("/available", web::get().to(rooms::available_rooms))
            .route("/{id}", web::get().to(rooms::get_room))
            .route("/{id}", web::put().to(rooms::update_room))
            .route("/{id}", web::delete().to(rooms::delete_room)),
    )
    .service(
        web::scope("/bookings")
            .route("", web::get().to(bookings::list_bookings))
            .route("", web::post().to(bookings::create_booking))
            .route("/{id}", web::get().to(bookings::get_booking))
            .route("/{id}", web::put().to(bookings::update_booking))
            .route("/{id}", web::delete().to(bookings::delete_booking))
            .route("/{id}/cancel", web::post().to(bookings::cancel_booking)),
    )
    .service(
        web::scope("/payments")
            .route("", web::get().to(payments::list_payments))
            .route("", web::post().to(payments::create_payment))
            .route("/{id}", web::get().to(payments::get_payment))
            .route("/{id}", web::put().to(payments::update_payment))
            .route("/{id}", web::delete().to(payments::delete_payment)),
    )
    .service(
        web::scope("/services")
            .route("", web::get().to(services::list_services))
            .route("", web::post().to(services::create_service))
            .route("/{id}", web::get().to(services::get_service))
            .route("/{id}", web::put().to(services::update_service))
            .route("/{id}", web::delete().to(services::delete_service)),
    )
    .service(
        web::scope("/documents")
            .route("", web::get().to(documents::list_documents))
            .route("", web::post().to(documents::create_document))
            .route("/{id}", web::get().to(documents::get_document))
            .route("/{id}", web::put().to(documents::update_document))
            .route("/{id}", web::delete().to(documents::delete_document)),
    );
}

/// Payments, services and documents all hang off a booking.
pub(crate) async fn ensure_booking_exists(
    conn: &mut SqliteConnection,
    booking_id: i64,
) -> Result<(), ApiError> {
    sqlx::query_scalar::<_, i64>("SELECT booking_id FROM bookings WHERE booking_id = ?")
        .bind(booking_id)
        .fetch_optional(conn)
        .await?
        .map(|_| ())
        .ok_or_else(|| ApiError::not_found("Booking", booking_id))
}
