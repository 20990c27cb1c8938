//! Business logic services

pub mod auth;
pub mod books;

use std::sync::Arc;

use crate::{
    config::{AuthConfig, StorageBackend, StorageConfig},
    error::AppResult,
    repository::{memory::InMemoryBookRepository, postgres::PgBookRepository, BookRepository},
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub books: books::BooksService,
}

impl Services {
    /// Create all services over the given repository
    pub fn new(repository: Arc<dyn BookRepository>, auth_config: AuthConfig) -> Self {
        let credentials = auth::CredentialStore::new(auth_config.users);
        if credentials.is_empty() {
            tracing::warn!("No credentials configured; every request will be refused");
        }

        Self {
            auth: auth::AuthService::new(Arc::new(credentials)),
            books: books::BooksService::new(repository),
        }
    }
}

/// Build the repository selected by `storage.backend`
pub async fn open_repository(config: &StorageConfig) -> AppResult<Arc<dyn BookRepository>> {
    let repository: Arc<dyn BookRepository> = match config.backend {
        StorageBackend::Memory => Arc::new(InMemoryBookRepository::new()),
        StorageBackend::Postgres => Arc::new(PgBookRepository::connect(&config.database).await?),
    };
    tracing::info!("Using {} book storage", repository.backend_name());
    Ok(repository)
}
