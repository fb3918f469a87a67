//! Axum router and all HTTP handlers for petal-daemon.
//!
//! `build_router` is the single entry point; `main.rs` calls it and attaches
//! middleware layers. The daemon only renders and plans. It never persists
//! an order or fetches upstream data itself.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, warn};

use petal_mapping::{preview, render_card};
use petal_schemas::{LabelTables, OrderRecord, OrderUpdate};
use petal_status::plan;

use crate::{
    api_types::{
        CardRequest, ErrorResponse, FieldSetResponse, HealthResponse, PlanRequest,
        PreviewRequest, ValidateRequest,
    },
    state::AppState,
};

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the complete application router wired to the given shared state.
///
/// Middleware layers (CORS, tracing) are **not** applied here; `main.rs`
/// attaches them after this call so tests can use the bare router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/health", get(health))
        .route("/v1/fields", get(fields))
        .route("/v1/fields/validate", post(validate_fields))
        .route("/v1/labels", put(replace_labels))
        .route("/v1/preview", post(preview_handler))
        .route("/v1/card", post(card))
        .route("/v1/card/plan", post(card_plan))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn bad_request(error: impl Into<String>) -> Response {
    let error = error.into();
    warn!(%error, "rejected request");
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error })).into_response()
}

/// Every malformed body is a 400 with `{ error }`, never axum's plain-text
/// 415/422 defaults.
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    payload
        .map(|Json(v)| v)
        .map_err(|rej| bad_request(format!("INVALID_BODY: {}", rej.body_text())))
}

/// Pair legacy parallel label arrays carried in the product bag.
fn normalize_order(mut order: OrderRecord) -> Result<OrderRecord, Response> {
    order
        .adopt_legacy_labels()
        .map_err(|e| bad_request(e.to_string()))?;
    Ok(order)
}

// ---------------------------------------------------------------------------
// GET /v1/health
// ---------------------------------------------------------------------------

pub(crate) async fn health(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            ok: true,
            service: st.build.service,
            version: st.build.version,
        }),
    )
}

// ---------------------------------------------------------------------------
// /v1/fields
// ---------------------------------------------------------------------------

pub(crate) async fn fields(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    Json(FieldSetResponse {
        config_hash: st.fields.config_hash.clone(),
        fields: st.fields.fields.clone(),
    })
}

pub(crate) async fn validate_fields(
    payload: Result<Json<ValidateRequest>, JsonRejection>,
) -> Response {
    let req = match body(payload) {
        Ok(r) => r,
        Err(resp) => return resp,
    };
    let report = petal_config::validate_field_set(&req.fields);
    info!(
        fields = report.field_count,
        publishable = report.publishable,
        "field set validated"
    );
    (StatusCode::OK, Json(report)).into_response()
}

// ---------------------------------------------------------------------------
// PUT /v1/labels
// ---------------------------------------------------------------------------

pub(crate) async fn replace_labels(
    State(st): State<Arc<AppState>>,
    payload: Result<Json<LabelTables>, JsonRejection>,
) -> Response {
    let tables = match body(payload) {
        Ok(t) => t,
        Err(resp) => return resp,
    };
    info!(
        florists = tables.florists.len(),
        difficulty = tables.difficulty.len(),
        product_types = tables.product_types.len(),
        "label snapshot replaced"
    );
    *st.labels.write().await = tables.clone();
    (StatusCode::OK, Json(tables)).into_response()
}

// ---------------------------------------------------------------------------
// POST /v1/preview
// ---------------------------------------------------------------------------

pub(crate) async fn preview_handler(
    State(st): State<Arc<AppState>>,
    payload: Result<Json<PreviewRequest>, JsonRejection>,
) -> Response {
    let req = match body(payload) {
        Ok(r) => r,
        Err(resp) => return resp,
    };
    let order = match normalize_order(req.order) {
        Ok(o) => o,
        Err(resp) => return resp,
    };
    let labels = st.labels_or_current(req.labels).await;
    let fields = req.fields.as_deref().unwrap_or(&st.fields.fields[..]);

    let report = preview(fields, &order, &labels);
    info!(
        order_id = %order.id,
        total = report.summary.total,
        failed = report.summary.failed,
        "preview"
    );
    (StatusCode::OK, Json(report)).into_response()
}

// ---------------------------------------------------------------------------
// POST /v1/card
// ---------------------------------------------------------------------------

pub(crate) async fn card(
    State(st): State<Arc<AppState>>,
    payload: Result<Json<CardRequest>, JsonRejection>,
) -> Response {
    let req = match body(payload) {
        Ok(r) => r,
        Err(resp) => return resp,
    };
    let order = match normalize_order(req.order) {
        Ok(o) => o,
        Err(resp) => return resp,
    };
    let labels = st.labels_or_current(req.labels).await;
    let view = render_card(&st.fields.fields, &order, &labels);
    (StatusCode::OK, Json(view)).into_response()
}

// ---------------------------------------------------------------------------
// POST /v1/card/plan
// ---------------------------------------------------------------------------

pub(crate) async fn card_plan(payload: Result<Json<PlanRequest>, JsonRejection>) -> Response {
    let req = match body(payload) {
        Ok(r) => r,
        Err(resp) => return resp,
    };
    let update = OrderUpdate {
        order_id: req.order.id.clone(),
        patch: plan(&req.order, &req.action),
    };
    info!(order_id = %update.order_id, action = req.action.name(), "card action planned");
    (StatusCode::OK, Json(update)).into_response()
}
