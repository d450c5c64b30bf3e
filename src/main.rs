use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;
use std::io;
use validator::Validate;

use hotel_desk::auth::password::hash_password;
use hotel_desk::config::Settings;
use hotel_desk::{db, handlers};

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    io::Error::other(format!("{context}: {err}"))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Initialize logger and environment
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let settings = Settings::load().map_err(|e| startup_error("Failed to load configuration", e))?;
    let auth = settings.auth();

    log::info!("Connecting to database...");
    let pool = db::get_db_pool(&settings.database_url, settings.max_connections)
        .await
        .map_err(|e| startup_error("Failed to create pool", e))?;

    log::info!("Running migrations...");
    db::run_migrations(&pool)
        .await
        .map_err(|e| startup_error("Failed to run migrations", e))?;

    if let Some(account) = settings.admin_account() {
        account
            .validate()
            .map_err(|e| startup_error("Invalid administrator settings", e))?;
        let hash = hash_password(&auth.default_password, auth.hashing)
            .map_err(|e| startup_error("Failed to hash default password", e))?;
        let created = db::bootstrap_admin(&pool, &account, &hash)
            .await
            .map_err(|e| startup_error("Failed to create administrator", e))?;
        if created {
            log::warn!("Created administrator {} with the default password", account.login);
        }
    }

    let bind = (settings.bind_address.clone(), settings.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let pool_data = web::Data::new(pool);
    let auth_data = web::Data::new(auth);

    HttpServer::new(move || {
        App::new()
            .app_data(pool_data.clone())
            .app_data(auth_data.clone())
            .wrap(middleware::Logger::default())
            .configure(handlers::configure)
    })
    .bind(bind)?
    .run()
    .await
}
