//! HTTP handlers for the books module.
//!
//! Write handlers validate before touching the repository; every failure is
//! translated to an [`AppError`] here so no request can take the process down.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use bookshelf_http::error::AppError;
use serde_json::{json, Value};

use super::models::{BookEnvelope, BookList, Message};
use super::repository::{BookRepository, RepositoryError};
use super::validation::{self, FieldError};

pub type SharedRepository = Arc<dyn BookRepository>;

/// Book routes, relative to the module mount point
pub fn router(repository: SharedRepository) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route(
            "/{isbn}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(repository)
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(isbn) => {
                AppError::not_found(format!("book {isbn} not found"))
            }
            RepositoryError::Duplicate(isbn) => AppError::conflict(
                vec![json!({
                    "field": "isbn",
                    "code": "duplicate",
                    "message": format!("a book with isbn {isbn} already exists"),
                })],
                "book already exists",
            ),
            RepositoryError::Storage(e) => AppError::Internal(anyhow::Error::new(e)),
        }
    }
}

fn validation_failed(errors: Vec<FieldError>) -> AppError {
    tracing::debug!(fields = ?errors.iter().map(|e| e.field).collect::<Vec<_>>(), "book payload rejected");
    AppError::validation(
        errors.iter().map(FieldError::to_detail).collect(),
        "book payload failed validation",
    )
}

fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::bad_request(rejection.body_text()))
}

async fn list_books(State(repository): State<SharedRepository>) -> Result<Json<BookList>, AppError> {
    let books = repository.list_all().await?;
    tracing::debug!(count = books.len(), "listed books");
    Ok(Json(BookList { books }))
}

async fn get_book(
    State(repository): State<SharedRepository>,
    Path(isbn): Path<String>,
) -> Result<Json<BookEnvelope>, AppError> {
    let book = repository.get_by_isbn(&isbn).await?;
    Ok(Json(BookEnvelope { book }))
}

async fn create_book(
    State(repository): State<SharedRepository>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<BookEnvelope>), AppError> {
    let payload = json_body(payload)?;
    let new_book = validation::validate_create(&payload).map_err(validation_failed)?;

    let book = repository.create(new_book).await?;
    tracing::info!(isbn = %book.isbn, "book created");

    Ok((StatusCode::CREATED, Json(BookEnvelope { book })))
}

async fn update_book(
    State(repository): State<SharedRepository>,
    Path(isbn): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<BookEnvelope>, AppError> {
    let payload = json_body(payload)?;
    let changes = validation::validate_update(&isbn, &payload).map_err(validation_failed)?;

    let book = repository.update(&isbn, changes).await?;
    tracing::info!(isbn = %book.isbn, "book updated");

    Ok(Json(BookEnvelope { book }))
}

async fn delete_book(
    State(repository): State<SharedRepository>,
    Path(isbn): Path<String>,
) -> Result<Json<Message>, AppError> {
    repository.delete(&isbn).await?;
    tracing::info!(isbn = %isbn, "book deleted");

    Ok(Json(Message {
        message: "Book deleted",
    }))
}
