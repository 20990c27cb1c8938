//! Livros book records server
//!
//! A small REST JSON API for registering, listing, updating and deleting
//! book records, guarded by HTTP Basic credentials.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Wire services over `repository`, authenticating against `auth`
    pub fn new(auth: config::AuthConfig, repository: Arc<dyn repository::BookRepository>) -> Self {
        Self {
            services: Arc::new(services::Services::new(repository, auth)),
        }
    }
}
