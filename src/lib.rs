//! Velin Library Circulation Server
//!
//! A Rust implementation of a single-site library circulation server:
//! catalog inventory, member registration, checkout/return processing,
//! fines, and renewal approval behind a REST JSON API.

use std::sync::Arc;

pub mod api;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod fines;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
