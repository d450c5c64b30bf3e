pub mod auth;
pub mod availability;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
