//! Table-backed book repository (PostgreSQL)

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};

use super::{BookRepository, BOOK_ALREADY_EXISTS, BOOK_NOT_FOUND};
use crate::{
    config::DatabaseConfig,
    error::{AppError, AppResult},
    models::book::{Book, BookInput, NewBook, PageRequest, SortField},
};

const SELECT_BOOK: &str = "SELECT id, titulo, autor, ano FROM livros";

/// ORDER BY clause for a page request.
///
/// Text columns sort under the "C" collation so the order is plain byte
/// order, the same as `sort_books` gives the in-memory store. Column names
/// come from `SortField`, never from user input.
fn order_by(request: &PageRequest) -> String {
    match request.sort_by {
        Some(field) => {
            let key = match field {
                SortField::Title | SortField::Author => format!("{} COLLATE \"C\"", field.column()),
                SortField::Year => field.column().to_string(),
            };
            let direction = if request.sort_desc { "DESC" } else { "ASC" };
            format!("{} {}, id ASC", key, direction)
        }
        None => "id ASC".to_string(),
    }
}

/// Repository over the `livros` table.
///
/// Each call runs in its own transaction. Early returns drop the
/// transaction, which rolls it back.
#[derive(Clone)]
pub struct PgBookRepository {
    pool: Pool<Postgres>,
}

impl PgBookRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Open a pool and bring the schema up to date
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect(&config.url)
            .await?;

        tracing::info!("Connected to database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::Internal(format!("migration failed: {}", e)))?;

        tracing::info!("Database migrations completed");

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }
}

#[async_trait]
impl BookRepository for PgBookRepository {
    async fn add(&self, data: NewBook) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        // The primary key arbitrates concurrent inserts of the same id
        let book = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO livros (id, titulo, autor, ano)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO NOTHING
            RETURNING id, titulo, autor, ano
            "#,
        )
        .bind(data.id)
        .bind(&data.title)
        .bind(&data.author)
        .bind(data.year)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::Conflict(BOOK_ALREADY_EXISTS.to_string()))?;

        tx.commit().await?;
        Ok(book)
    }

    async fn get_all(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(&format!("{} ORDER BY id", SELECT_BOOK))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn update(&self, id: i32, data: BookInput) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let book = sqlx::query_as::<_, Book>(
            r#"
            UPDATE livros SET titulo = $2, autor = $3, ano = $4
            WHERE id = $1
            RETURNING id, titulo, autor, ano
            "#,
        )
        .bind(id)
        .bind(&data.title)
        .bind(&data.author)
        .bind(data.year)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(BOOK_NOT_FOUND.to_string()))?;

        tx.commit().await?;
        Ok(book)
    }

    async fn update_with(
        &self,
        id: i32,
        merge: Box<dyn FnOnce(Book) -> BookInput + Send>,
    ) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Book>(&format!("{} WHERE id = $1 FOR UPDATE", SELECT_BOOK))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(BOOK_NOT_FOUND.to_string()))?;

        let data = merge(current);

        let book = sqlx::query_as::<_, Book>(
            r#"
            UPDATE livros SET titulo = $2, autor = $3, ano = $4
            WHERE id = $1
            RETURNING id, titulo, autor, ano
            "#,
        )
        .bind(id)
        .bind(&data.title)
        .bind(&data.author)
        .bind(data.year)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(book)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM livros WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(BOOK_NOT_FOUND.to_string()));
        }

        tx.commit().await?;
        Ok(())
    }

    async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM livros")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn list_page(&self, request: &PageRequest) -> AppResult<(Vec<Book>, i64)> {
        let mut tx = self.pool.begin().await?;

        // Count and page must come from the same snapshot
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM livros")
            .fetch_one(&mut *tx)
            .await?;

        let rows = sqlx::query_as::<_, Book>(&format!(
            "{} ORDER BY {} LIMIT $1 OFFSET $2",
            SELECT_BOOK,
            order_by(request)
        ))
        .bind(request.limit)
        .bind(request.offset())
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((rows, total))
    }

    async fn health_check(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
