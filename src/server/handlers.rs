//! HTTP handlers: turn form posts into action calls and outcomes into responses

use crate::actions::invoices::{MSG_CREATE_DB_ERROR, MSG_DELETE_DB_ERROR, MSG_UPDATE_DB_ERROR};
use crate::actions::{AuthActions, InvoiceActions};
use crate::core::cache::RouteCache;
use crate::core::error::DashboardError;
use crate::core::form::{FormData, FormState, Outcome};
use axum::{
    Form, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::{Value, json};
use std::sync::Arc;

/// Shared state for every dashboard route
#[derive(Clone)]
pub struct AppState {
    pub invoices: InvoiceActions,
    pub auth: AuthActions,
    pub cache: Arc<RouteCache>,
}

/// Status code for a state the client stays on
fn state_status(state: &FormState) -> StatusCode {
    if state.has_errors() {
        return StatusCode::UNPROCESSABLE_ENTITY;
    }
    match state.message.as_deref() {
        Some(MSG_CREATE_DB_ERROR | MSG_UPDATE_DB_ERROR | MSG_DELETE_DB_ERROR) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        _ => StatusCode::OK,
    }
}

fn form_state_response(state: FormState) -> Response {
    (state_status(&state), Json(state)).into_response()
}

/// Redirects become `303 See Other`
fn outcome_response(outcome: Outcome<FormState>) -> Response {
    match outcome {
        Outcome::Redirect(to) => Redirect::to(&to).into_response(),
        Outcome::State(state) => form_state_response(state),
    }
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Invoice listing, served from the route cache until revalidated
pub async fn list_invoices(State(state): State<AppState>) -> Result<Json<Value>, DashboardError> {
    let path = state.invoices.invoices_path();

    if let Some(page) = state.cache.get(path) {
        return Ok(Json(page));
    }

    // A mutation landing while the list is read makes this page stale
    let generation = state.cache.generation(path);
    let invoices = state.invoices.repository().list().await?;
    let page = json!({
        "invoices": invoices,
        "count": invoices.len()
    });

    state.cache.put_if_fresh(path, generation, page.clone());
    Ok(Json(page))
}

pub async fn create_invoice(State(state): State<AppState>, Form(form): Form<FormData>) -> Response {
    outcome_response(state.invoices.create_invoice(&form).await)
}

pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<FormData>,
) -> Response {
    outcome_response(state.invoices.update_invoice(&id, &form).await)
}

pub async fn delete_invoice(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    form_state_response(state.invoices.delete_invoice(&id).await)
}

/// Login form; unexpected authenticator failures surface as a 500
pub async fn authenticate(
    State(state): State<AppState>,
    Form(form): Form<FormData>,
) -> Result<Response, DashboardError> {
    let response = match state.auth.authenticate(None, &form).await? {
        Outcome::Redirect(to) => Redirect::to(&to).into_response(),
        Outcome::State(message) => {
            (StatusCode::UNAUTHORIZED, Json(json!({ "message": message }))).into_response()
        }
    };
    Ok(response)
}
