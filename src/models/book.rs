//! Book model and the pagination request/result types

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::AppError;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

/// Book record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    /// Client-assigned identifier, unique among live records
    pub id: i32,
    #[serde(rename = "titulo")]
    #[sqlx(rename = "titulo")]
    pub title: String,
    #[serde(rename = "autor")]
    #[sqlx(rename = "autor")]
    pub author: String,
    /// Publication year
    #[serde(rename = "ano")]
    #[sqlx(rename = "ano")]
    pub year: i32,
}

impl Book {
    pub fn new(id: i32, data: BookInput) -> Self {
        Self {
            id,
            title: data.title,
            author: data.author,
            year: data.year,
        }
    }
}

/// Create book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewBook {
    pub id: i32,
    #[serde(rename = "titulo")]
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(rename = "autor")]
    #[validate(length(min = 1))]
    pub author: String,
    #[serde(rename = "ano")]
    pub year: i32,
}

impl From<NewBook> for Book {
    fn from(data: NewBook) -> Self {
        Self {
            id: data.id,
            title: data.title,
            author: data.author,
            year: data.year,
        }
    }
}

/// Full replacement body for an existing book
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate, ToSchema)]
pub struct BookInput {
    #[serde(rename = "titulo")]
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(rename = "autor")]
    #[validate(length(min = 1))]
    pub author: String,
    #[serde(rename = "ano")]
    pub year: i32,
}

impl From<Book> for BookInput {
    fn from(book: Book) -> Self {
        Self {
            title: book.title,
            author: book.author,
            year: book.year,
        }
    }
}

/// Partial update body. Absent, empty or zero fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct BookPatch {
    #[serde(rename = "titulo")]
    pub title: Option<String>,
    #[serde(rename = "autor")]
    pub author: Option<String>,
    #[serde(rename = "ano")]
    pub year: Option<i32>,
}

impl BookPatch {
    /// Merge the patch over `current`, producing the full replacement to store
    pub fn merge(&self, current: Book) -> BookInput {
        let mut merged = BookInput::from(current);
        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            merged.title = title.to_string();
        }
        if let Some(author) = self.author.as_deref().filter(|a| !a.is_empty()) {
            merged.author = author.to_string();
        }
        if let Some(year) = self.year.filter(|y| *y != 0) {
            merged.year = year;
        }
        merged
    }
}

/// Field a listing can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Title,
    Author,
    Year,
}

impl SortField {
    /// Column name in the `livros` table
    pub fn column(self) -> &'static str {
        match self {
            SortField::Title => "titulo",
            SortField::Author => "autor",
            SortField::Year => "ano",
        }
    }
}

impl FromStr for SortField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "titulo" | "title" => Ok(SortField::Title),
            "autor" | "author" => Ok(SortField::Author),
            "ano" | "year" => Ok(SortField::Year),
            other => Err(AppError::Validation(format!(
                "sort_by must be one of titulo, autor, ano (got '{}')",
                other
            ))),
        }
    }
}

fn default_page() -> i64 {
    DEFAULT_PAGE
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

/// Query string of `GET /livros`
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListBooksQuery {
    /// Page number, starting at 1
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub page: i64,
    /// Records per page (1-100)
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: i64,
    /// One of `titulo`, `autor`, `ano`
    pub sort_by: Option<String>,
    /// Sort descending instead of ascending
    #[serde(default)]
    pub sort_desc: bool,
}

impl Default for ListBooksQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            sort_by: None,
            sort_desc: false,
        }
    }
}

/// Validated page request handed to the repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
    pub sort_by: Option<SortField>,
    pub sort_desc: bool,
}

impl PageRequest {
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl TryFrom<ListBooksQuery> for PageRequest {
    type Error = AppError;

    fn try_from(query: ListBooksQuery) -> Result<Self, Self::Error> {
        query.validate()?;
        let sort_by = query.sort_by.as_deref().map(str::parse).transpose()?;
        Ok(Self {
            page: query.page,
            limit: query.limit,
            sort_by,
            sort_desc: query.sort_desc,
        })
    }
}

/// One page of books plus pagination metadata
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PageResult {
    pub page: i64,
    pub limit: i64,
    /// Number of books in the whole collection
    pub total: i64,
    pub livros: Vec<Book>,
}
