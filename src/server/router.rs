//! Router for the dashboard routes

use super::handlers::{
    AppState, authenticate, create_invoice, delete_invoice, health, list_invoices, update_invoice,
};
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

/// Build the dashboard routes rooted at the configured listing path:
///
/// - GET /health - Liveness check
/// - GET {invoices} - Invoice listing (cached)
/// - POST {invoices}/create - Create action
/// - POST {invoices}/{id}/edit - Update action
/// - POST {invoices}/{id}/delete - Delete action
/// - POST /login - Authenticate action
pub fn build_router(state: AppState) -> Router {
    let invoices = state.invoices.invoices_path().to_string();

    Router::new()
        .route("/health", get(health))
        .route(&invoices, get(list_invoices))
        .route(&format!("{invoices}/create"), post(create_invoice))
        .route(&format!("{invoices}/{{id}}/edit"), post(update_invoice))
        .route(&format!("{invoices}/{{id}}/delete"), post(delete_invoice))
        .route("/login", post(authenticate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
