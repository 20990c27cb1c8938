//! Book endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::book::{BookInput, BookPatch, ListBooksQuery, NewBook, PageResult},
};

use super::AuthenticatedUser;

/// Short confirmation returned by mutating endpoints
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub mensagem: String,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            mensagem: message.to_string(),
        })
    }
}

/// List books with pagination and optional sorting
#[utoipa::path(
    get,
    path = "/livros",
    tag = "livros",
    security(("basic_auth" = [])),
    params(ListBooksQuery),
    responses(
        (status = 200, description = "One page of books", body = PageResult),
        (status = 400, description = "Invalid pagination parameters", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 404, description = "No books registered", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_identity): AuthenticatedUser,
    WithRejection(Query(query), _): WithRejection<Query<ListBooksQuery>, AppError>,
) -> AppResult<Json<PageResult>> {
    let page = state.services.books.list(query).await?;
    Ok(Json(page))
}

/// Register a new book
#[utoipa::path(
    post,
    path = "/addlivros",
    tag = "livros",
    security(("basic_auth" = [])),
    request_body = NewBook,
    responses(
        (status = 201, description = "Book created", body = MessageResponse),
        (status = 400, description = "Duplicate id or invalid body", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn add_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    WithRejection(Json(data), _): WithRejection<Json<NewBook>, AppError>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    tracing::debug!("add_book requested by {}", identity.username);
    state.services.books.add(data).await?;
    Ok((
        StatusCode::CREATED,
        MessageResponse::new("Livro cadastrado com sucesso."),
    ))
}

/// Replace a book's title, author and year
#[utoipa::path(
    put,
    path = "/atualizarlivros/{id}",
    tag = "livros",
    security(("basic_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = BookInput,
    responses(
        (status = 200, description = "Book updated", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
    WithRejection(Json(data), _): WithRejection<Json<BookInput>, AppError>,
) -> AppResult<Json<MessageResponse>> {
    tracing::debug!("update_book {} requested by {}", id, identity.username);
    state.services.books.update(id, data).await?;
    Ok(MessageResponse::new("Livro atualizado com sucesso."))
}

/// Update only the fields present and non-empty in the body
#[utoipa::path(
    patch,
    path = "/atualizarlivros/{id}",
    tag = "livros",
    security(("basic_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = BookPatch,
    responses(
        (status = 200, description = "Book updated", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn patch_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
    WithRejection(Json(patch), _): WithRejection<Json<BookPatch>, AppError>,
) -> AppResult<Json<MessageResponse>> {
    tracing::debug!("patch_book {} requested by {}", id, identity.username);
    state.services.books.patch(id, patch).await?;
    Ok(MessageResponse::new("Livro atualizado com sucesso."))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/deletarlivros/{id}",
    tag = "livros",
    security(("basic_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book deleted", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
) -> AppResult<Json<MessageResponse>> {
    tracing::debug!("delete_book {} requested by {}", id, identity.username);
    state.services.books.delete(id).await?;
    Ok(MessageResponse::new("Livro deletado com sucesso."))
}
