//! In-memory book repository.
//!
//! Books live in an `IndexMap` keyed by id, so iteration follows insertion
//! order. The map sits behind a `tokio::sync::RwLock`: mutations take the
//! write lock for their whole check-then-act sequence, reads take the read
//! lock and clone what they need. Nothing is persisted across restarts.

use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;

use super::{BookRepository, BOOK_ALREADY_EXISTS, BOOK_NOT_FOUND};
use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookInput, NewBook},
};

#[derive(Clone, Default)]
pub struct InMemoryBookRepository {
    books: Arc<RwLock<IndexMap<i32, Book>>>,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn add(&self, data: NewBook) -> AppResult<Book> {
        let mut books = self.books.write().await;
        if books.contains_key(&data.id) {
            return Err(AppError::Conflict(BOOK_ALREADY_EXISTS.to_string()));
        }
        let book = Book::from(data);
        books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn get_all(&self) -> AppResult<Vec<Book>> {
        Ok(self.books.read().await.values().cloned().collect())
    }

    async fn update(&self, id: i32, data: BookInput) -> AppResult<Book> {
        let mut books = self.books.write().await;
        let slot = books
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(BOOK_NOT_FOUND.to_string()))?;
        *slot = Book::new(id, data);
        Ok(slot.clone())
    }

    async fn update_with(
        &self,
        id: i32,
        merge: Box<dyn FnOnce(Book) -> BookInput + Send>,
    ) -> AppResult<Book> {
        let mut books = self.books.write().await;
        let slot = books
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(BOOK_NOT_FOUND.to_string()))?;
        *slot = Book::new(id, merge(slot.clone()));
        Ok(slot.clone())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        // shift_remove keeps the remaining books in insertion order
        self.books
            .write()
            .await
            .shift_remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(BOOK_NOT_FOUND.to_string()))
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.books.read().await.len() as i64)
    }

    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
