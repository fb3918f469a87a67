//! Request and response types for all petal-daemon HTTP endpoints.
//!
//! No business logic lives here.

use serde::{Deserialize, Serialize};

use petal_schemas::{FieldDefinition, LabelTables, OrderRecord};
use petal_status::CardAction;

// ---------------------------------------------------------------------------
// /v1/health
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: &'static str,
    pub version: &'static str,
}

// ---------------------------------------------------------------------------
// Errors (400)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ---------------------------------------------------------------------------
// /v1/fields
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSetResponse {
    pub config_hash: String,
    pub fields: Vec<FieldDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidateRequest {
    pub fields: Vec<FieldDefinition>,
}

// ---------------------------------------------------------------------------
// /v1/preview  /v1/card  /v1/card/plan
// ---------------------------------------------------------------------------

/// `fields` absent means "the daemon's loaded field set".
#[derive(Debug, Clone, Deserialize)]
pub struct PreviewRequest {
    #[serde(default)]
    pub fields: Option<Vec<FieldDefinition>>,
    pub order: OrderRecord,
    #[serde(default)]
    pub labels: Option<LabelTables>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CardRequest {
    pub order: OrderRecord,
    #[serde(default)]
    pub labels: Option<LabelTables>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlanRequest {
    pub order: OrderRecord,
    pub action: CardAction,
}
