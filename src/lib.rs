pub mod app;
pub mod auth;
pub mod blob;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod state;
pub mod store;
pub mod validation;
