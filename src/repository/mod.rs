//! Repository layer for book storage
//!
//! Handlers and services only see [`BookRepository`]; the storage engine is
//! picked at startup from `storage.backend`.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::book::{Book, BookInput, NewBook, PageRequest, SortField},
};

pub const BOOK_ALREADY_EXISTS: &str = "Livro já cadastrado.";
pub const BOOK_NOT_FOUND: &str = "Livro não encontrado.";

/// Merge function passed to [`BookRepository::update_with`]
pub type MergeFn = Box<dyn FnOnce(Book) -> BookInput + Send>;

/// Storage contract for book records.
///
/// Every method is atomic with respect to the others: a failed call leaves
/// the collection untouched, and no reader sees a half-written record.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Insert a new book, failing with `Conflict` if its id is taken
    async fn add(&self, book: NewBook) -> AppResult<Book>;

    /// All books in natural order (insertion order or primary-key order)
    async fn get_all(&self) -> AppResult<Vec<Book>>;

    /// Replace title, author and year of an existing book
    async fn update(&self, id: i32, data: BookInput) -> AppResult<Book>;

    /// Replace an existing book with `merge(current)`, read and write as one step
    async fn update_with(
        &self,
        id: i32,
        merge: MergeFn,
    ) -> AppResult<Book>;

    async fn delete(&self, id: i32) -> AppResult<()>;

    async fn count(&self) -> AppResult<i64>;

    /// One page of books and the collection total, read from a single snapshot
    async fn list_page(&self, request: &PageRequest) -> AppResult<(Vec<Book>, i64)> {
        let books = self.get_all().await?;
        Ok(paginate(books, request))
    }

    async fn health_check(&self) -> AppResult<()>;

    fn backend_name(&self) -> &'static str;
}

/// Order books by `field`, breaking ties by ascending id
pub fn sort_books(books: &mut [Book], field: SortField, descending: bool) {
    books.sort_by(|a, b| {
        let ordering = match field {
            SortField::Title => a.title.cmp(&b.title),
            SortField::Author => a.author.cmp(&b.author),
            SortField::Year => a.year.cmp(&b.year),
        };
        let ordering = if descending {
            ordering.reverse()
        } else {
            ordering
        };
        ordering.then_with(|| a.id.cmp(&b.id))
    });
}

/// Slice a full snapshot into the requested page. Returns the page and the snapshot size.
pub fn paginate(mut books: Vec<Book>, request: &PageRequest) -> (Vec<Book>, i64) {
    let total = books.len() as i64;
    if let Some(field) = request.sort_by {
        sort_books(&mut books, field, request.sort_desc);
    }
    let start = usize::try_from(request.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(request.limit).unwrap_or(0);
    let page = books.into_iter().skip(start).take(limit).collect();
    (page, total)
}
