pub mod error;
pub mod models;
pub mod routes;
pub mod seed;
pub mod store;
pub mod validation;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{InitCtx, Module};
use serde_json::{json, Value};

pub use error::{BookStoreError, BookStoreResult};
pub use models::{Book, BookField, BookInput};
pub use store::{BookStats, BookStore, Latency};

/// Mounts the book store under `/api/books`.
pub struct BooksModule {
    store: BookStore,
}

impl BooksModule {
    pub fn new(store: BookStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &BookStore {
        &self.store
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            seeded = ctx.settings.books.seed,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.store.clone())
    }

    fn openapi(&self) -> Option<Value> {
        Some(openapi_fragment())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let books = self.store.len().await;
        tracing::info!(module = self.name(), books, "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

pub fn create_module(store: BookStore) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store))
}

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    })
}

fn book_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/Book" }
            }
        }
    })
}

fn book_input_body() -> Value {
    json!({
        "required": true,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/BookInput" }
            }
        }
    })
}

fn id_parameter() -> Value {
    json!({
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "string" }
    })
}

fn input_properties() -> Value {
    json!({
        "title": { "type": "string", "minLength": 1, "maxLength": 200 },
        "author": { "type": "string", "minLength": 1, "maxLength": 100 },
        "authorEmail": { "type": "string", "format": "email", "maxLength": 255 },
        "authorAge": { "type": "integer", "minimum": 1, "maximum": 150 },
        "publishedDate": { "type": "string", "minLength": 1 },
        "publisher": { "type": "string", "minLength": 1, "maxLength": 150 },
        "overview": { "type": "string", "minLength": 10, "maxLength": 2000 },
        "genre": { "type": "string", "minLength": 1, "maxLength": 50 },
        "isbn": { "type": "string", "minLength": 10, "maxLength": 20 },
        "pages": { "type": "integer", "minimum": 1, "maximum": 10000 }
    })
}

fn stats_path() -> Value {
    json!({
        "get": {
            "summary": "Collection totals",
            "tags": ["Books"],
            "responses": {
                "200": {
                    "description": "Book, author, genre and page totals",
                    "content": {
                        "application/json": {
                            "schema": { "$ref": "#/components/schemas/BookStats" }
                        }
                    }
                }
            }
        }
    })
}

fn stats_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "totalBooks": { "type": "integer" },
            "authors": { "type": "integer" },
            "genres": { "type": "integer" },
            "totalPages": { "type": "integer" }
        },
        "required": ["totalBooks", "authors", "genres", "totalPages"]
    })
}

const INPUT_FIELDS: [&str; 10] = [
    "title",
    "author",
    "authorEmail",
    "authorAge",
    "publishedDate",
    "publisher",
    "overview",
    "genre",
    "isbn",
    "pages",
];

fn openapi_fragment() -> Value {
    let mut book_properties = input_properties();
    book_properties["id"] = json!({ "type": "string", "description": "Store-assigned identifier" });
    let mut book_required: Vec<&str> = vec!["id"];
    book_required.extend(INPUT_FIELDS);

    json!({
        "paths": {
            "/": {
                "get": {
                    "summary": "List books, optionally filtered by title, author or genre",
                    "tags": ["Books"],
                    "parameters": [{
                        "name": "q",
                        "in": "query",
                        "required": false,
                        "schema": { "type": "string" }
                    }],
                    "responses": {
                        "200": {
                            "description": "Books in insertion order",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "array",
                                        "items": { "$ref": "#/components/schemas/Book" }
                                    }
                                }
                            }
                        }
                    }
                },
                "post": {
                    "summary": "Create a book",
                    "tags": ["Books"],
                    "requestBody": book_input_body(),
                    "responses": {
                        "201": book_response("Created book"),
                        "400": error_response("Malformed request"),
                        "409": error_response("ISBN already in use"),
                        "422": error_response("Validation error")
                    }
                }
            },
            "/{id}": {
                "get": {
                    "summary": "Get a book",
                    "tags": ["Books"],
                    "parameters": [id_parameter()],
                    "responses": {
                        "200": book_response("The book"),
                        "404": error_response("No such book")
                    }
                },
                "put": {
                    "summary": "Replace a book's fields",
                    "tags": ["Books"],
                    "parameters": [id_parameter()],
                    "requestBody": book_input_body(),
                    "responses": {
                        "200": book_response("Updated book"),
                        "400": error_response("Malformed request"),
                        "404": error_response("No such book"),
                        "409": error_response("ISBN already in use"),
                        "422": error_response("Validation error")
                    }
                },
                "delete": {
                    "summary": "Delete a book",
                    "tags": ["Books"],
                    "parameters": [id_parameter()],
                    "responses": {
                        "204": { "description": "Deleted" },
                        "404": error_response("No such book")
                    }
                }
            },
            "/stats": stats_path(),
            "/health": {
                "get": {
                    "summary": "Books health check",
                    "tags": ["Books"],
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": { "text/plain": { "schema": { "type": "string" } } }
                        }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "properties": book_properties,
                    "required": book_required
                },
                "BookStats": stats_schema(),
                "BookInput": {
                    "type": "object",
                    "properties": input_properties(),
                    "required": INPUT_FIELDS
                }
            }
        }
    })
}
