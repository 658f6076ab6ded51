pub mod ai;
pub mod auth;
pub mod config;
pub mod handlers;
pub mod models;
pub mod registry;
pub mod repository;
pub mod routes;
pub mod session;
pub mod utils;
