//! HTTP routing and shared handler plumbing.

use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use bazaar_core::repository::PaginatedResult;

use crate::error::ApiError;
use crate::state::AppState;

mod brands;
mod categories;
mod products;
mod qa;
mod specifications;
mod users;
mod vendors;
mod warranties;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Paginated JSON envelope shared by list endpoints.
#[derive(Debug, Serialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

impl<T> From<PaginatedResult<T>> for PageResponse<T> {
    fn from(page: PaginatedResult<T>) -> Self {
        Self {
            items: page.items,
            total: page.total,
            offset: page.offset,
            limit: page.limit,
        }
    }
}

/// Reject empty or whitespace-only required string fields.
pub fn require_field(name: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        Err(ApiError::validation(format!("{name} must not be empty")))
    } else {
        Ok(())
    }
}

/// 201 wrapper used by every create endpoint.
pub fn created<T: Serialize>(body: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(body))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        // Accounts
        .route("/users/register", post(users::register))
        .route("/users/login", post(users::login))
        .route("/whoami", get(users::whoami))
        .route("/users", get(users::list))
        .route(
            "/users/:id",
            get(users::get).put(users::update).delete(users::deactivate),
        )
        .route("/users/:id/password", put(users::change_password))
        // Vendors
        .route("/vendors", post(vendors::create).get(vendors::list))
        .route(
            "/vendors/:id",
            get(vendors::get).put(vendors::update).delete(vendors::delete),
        )
        // Brands
        .route("/brands", post(brands::create).get(brands::list))
        .route(
            "/brands/:id",
            get(brands::get).put(brands::update).delete(brands::delete),
        )
        // Categories
        .route("/categories", post(categories::create).get(categories::list))
        .route("/categories/tree", get(categories::tree))
        .route(
            "/categories/:id",
            get(categories::get)
                .put(categories::update)
                .delete(categories::delete),
        )
        // Products
        .route("/products", post(products::create).get(products::list))
        .route("/products/slug/:slug", get(products::get_by_slug))
        .route(
            "/products/:id",
            get(products::get)
                .put(products::update)
                .delete(products::delete),
        )
        .route(
            "/products/:id/specifications",
            get(specifications::list_by_product),
        )
        .route("/products/:id/warranty", get(warranties::get_by_product))
        .route("/products/:id/qa", get(qa::list_by_product))
        // Specifications
        .route("/specifications", post(specifications::create))
        .route("/specifications/bulk", post(specifications::create_bulk))
        .route(
            "/specifications/:id",
            put(specifications::update).delete(specifications::delete),
        )
        // Warranties
        .route("/warranties", post(warranties::create))
        .route(
            "/warranties/:id",
            put(warranties::update).delete(warranties::delete),
        )
        // Q&A
        .route("/questions", post(qa::ask))
        .route("/answers", post(qa::answer))
}
