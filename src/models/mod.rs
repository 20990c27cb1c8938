//! Data models for Livros

pub mod book;

// Re-export commonly used types
pub use book::{Book, BookInput, BookPatch, ListBooksQuery, NewBook, PageRequest, PageResult, SortField};
