//! HTTP adapter over [`BookStore`]: translates outcomes into status codes.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use bookshelf_http::error::AppError;
use serde::Deserialize;
use serde_json::json;

use super::error::BookStoreError;
use super::models::{Book, BookInput};
use super::store::{BookStats, BookStore};

impl From<BookStoreError> for AppError {
    fn from(error: BookStoreError) -> Self {
        let message = error.to_string();
        match error {
            BookStoreError::InvalidArgument { .. } => AppError::bad_request(message),
            BookStoreError::Validation { field, .. } => AppError::validation(
                vec![json!({ "field": field, "error": message.clone() })],
                message,
            ),
            BookStoreError::Conflict { isbn } => {
                AppError::conflict(vec![json!({ "field": "isbn", "value": isbn })], message)
            }
            BookStoreError::Internal(_) => AppError::Internal(anyhow::Error::new(error)),
        }
    }
}

pub fn router(store: BookStore) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/health", get(health_check))
        .route("/stats", get(book_stats))
        .route(
            "/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(store)
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Case-insensitive filter on title, author and genre
    pub q: Option<String>,
}

async fn health_check() -> &'static str {
    "books module is healthy"
}

async fn list_books(
    State(store): State<BookStore>,
    Query(params): Query<ListParams>,
) -> Json<Vec<Book>> {
    let books = match params.q {
        Some(query) => store.search(&query).await,
        None => store.list_all().await,
    };
    Json(books)
}

async fn book_stats(State(store): State<BookStore>) -> Json<BookStats> {
    Json(store.stats().await)
}

async fn get_book(
    State(store): State<BookStore>,
    Path(id): Path<String>,
) -> Result<Json<Book>, AppError> {
    store
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(&id))
}

async fn create_book(
    State(store): State<BookStore>,
    payload: Result<Json<BookInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let Json(input) = payload.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let book = store.create(input).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

async fn update_book(
    State(store): State<BookStore>,
    Path(id): Path<String>,
    payload: Result<Json<BookInput>, JsonRejection>,
) -> Result<Json<Book>, AppError> {
    let Json(input) = payload.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    store
        .update(&id, input)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(&id))
}

async fn delete_book(
    State(store): State<BookStore>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if store.delete(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(&id))
    }
}

fn not_found(id: &str) -> AppError {
    AppError::not_found(format!("book {} not found", id))
}
