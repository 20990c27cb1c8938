//! Book catalog service

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookInput, BookPatch, ListBooksQuery, NewBook, PageRequest, PageResult},
    repository::BookRepository,
};

pub const NO_BOOKS_FOUND: &str = "Nenhum livro encontrado.";

#[derive(Clone)]
pub struct BooksService {
    repository: Arc<dyn BookRepository>,
}

impl BooksService {
    pub fn new(repository: Arc<dyn BookRepository>) -> Self {
        Self { repository }
    }

    /// One page of books. An empty collection is reported as not found,
    /// while a page past the end is an empty list.
    pub async fn list(&self, query: ListBooksQuery) -> AppResult<PageResult> {
        let request = PageRequest::try_from(query)?;
        let (livros, total) = self.repository.list_page(&request).await?;

        if total == 0 {
            return Err(AppError::NotFound(NO_BOOKS_FOUND.to_string()));
        }

        Ok(PageResult {
            page: request.page,
            limit: request.limit,
            total,
            livros,
        })
    }

    pub async fn add(&self, data: NewBook) -> AppResult<Book> {
        data.validate()?;
        let book = self.repository.add(data).await?;
        tracing::info!("Book created: id={} title={:?}", book.id, book.title);
        Ok(book)
    }

    /// Full replacement of title, author and year
    pub async fn update(&self, id: i32, data: BookInput) -> AppResult<Book> {
        data.validate()?;
        let book = self.repository.update(id, data).await?;
        tracing::info!("Book updated: id={}", id);
        Ok(book)
    }

    /// Overwrite only the fields present and non-empty in `patch`
    pub async fn patch(&self, id: i32, patch: BookPatch) -> AppResult<Book> {
        let book = self
            .repository
            .update_with(id, Box::new(move |current| patch.merge(current)))
            .await?;
        tracing::info!("Book patched: id={}", id);
        Ok(book)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.delete(id).await?;
        tracing::info!("Book deleted: id={}", id);
        Ok(())
    }

    pub async fn count(&self) -> AppResult<i64> {
        self.repository.count().await
    }

    pub async fn health_check(&self) -> AppResult<()> {
        self.repository.health_check().await
    }

    pub fn backend_name(&self) -> &'static str {
        self.repository.backend_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::book::SortField;
    use crate::repository::{memory::InMemoryBookRepository, MockBookRepository};
    use mockall::predicate::eq;

    fn book(id: i32, year: i32) -> Book {
        Book {
            id,
            title: format!("Book {}", id),
            author: "Anon".into(),
            year,
        }
    }

    #[tokio::test]
    async fn empty_collection_is_not_found() {
        let mut repo = MockBookRepository::new();
        repo.expect_list_page()
            .times(1)
            .returning(|_| Ok((Vec::new(), 0)));
        let service = BooksService::new(Arc::new(repo));

        let err = service.list(ListBooksQuery::default()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg == NO_BOOKS_FOUND));
    }

    #[tokio::test]
    async fn invalid_page_never_reaches_repository() {
        let service = BooksService::new(Arc::new(MockBookRepository::new()));
        let query = ListBooksQuery {
            page: 0,
            ..Default::default()
        };
        assert!(matches!(
            service.list(query).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn list_forwards_parsed_request() {
        let mut repo = MockBookRepository::new();
        let expected = PageRequest {
            page: 2,
            limit: 5,
            sort_by: Some(SortField::Year),
            sort_desc: true,
        };
        repo.expect_list_page()
            .withf(move |request| *request == expected)
            .returning(|_| Ok((Vec::new(), 3)));
        let service = BooksService::new(Arc::new(repo));

        let result = service
            .list(ListBooksQuery {
                page: 2,
                limit: 5,
                sort_by: Some("ano".into()),
                sort_desc: true,
            })
            .await
            .unwrap();
        assert_eq!(result.total, 3);
        assert!(result.livros.is_empty());
    }

    #[tokio::test]
    async fn empty_title_is_rejected_before_storage() {
        let service = BooksService::new(Arc::new(MockBookRepository::new()));
        let data = NewBook {
            id: 1,
            title: String::new(),
            author: "Herbert".into(),
            year: 1965,
        };
        assert!(matches!(service.add(data).await, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn delete_propagates_not_found() {
        let mut repo = MockBookRepository::new();
        repo.expect_delete()
            .with(eq(9))
            .returning(|_| Err(AppError::NotFound("Livro não encontrado.".into())));
        let service = BooksService::new(Arc::new(repo));
        assert!(matches!(service.delete(9).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn second_page_by_year_returns_third_ranked_book() {
        let repo = InMemoryBookRepository::new();
        for (id, year) in [(1, 2001), (2, 1999), (3, 2010)] {
            let b = book(id, year);
            repo.add(NewBook {
                id: b.id,
                title: b.title,
                author: b.author,
                year: b.year,
            })
            .await
            .unwrap();
        }
        let service = BooksService::new(Arc::new(repo));

        let result = service
            .list(ListBooksQuery {
                page: 2,
                limit: 2,
                sort_by: Some("ano".into()),
                sort_desc: false,
            })
            .await
            .unwrap();
        assert_eq!(result.total, 3);
        assert_eq!(result.livros, vec![book(3, 2010)]);
    }

    #[tokio::test]
    async fn patch_keeps_untouched_fields() {
        let repo = InMemoryBookRepository::new();
        repo.add(NewBook {
            id: 1,
            title: "Dune".into(),
            author: "Herbert".into(),
            year: 1965,
        })
        .await
        .unwrap();
        let service = BooksService::new(Arc::new(repo));

        let patched = service
            .patch(
                1,
                BookPatch {
                    author: Some("Frank Herbert".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(patched.title, "Dune");
        assert_eq!(patched.author, "Frank Herbert");
        assert_eq!(patched.year, 1965);
    }
}
