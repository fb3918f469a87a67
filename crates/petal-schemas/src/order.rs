use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{labels_from_parallel, LabelBagError, ProductLabel};

// ---------------------------------------------------------------------------
// OrderStatus
// ---------------------------------------------------------------------------

/// Operational status of an order card. Any state may move to any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Unassigned,
    Assigned,
    Completed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Unassigned => "unassigned",
            OrderStatus::Assigned => "assigned",
            OrderStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unassigned" => Some(OrderStatus::Unassigned),
            "assigned" => Some(OrderStatus::Assigned),
            "completed" | "done" => Some(OrderStatus::Completed),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// OrderRecord
// ---------------------------------------------------------------------------

/// One order snapshot as delivered by the realtime feed.
///
/// `upstream` is the commerce platform's payload; its shape is not owned
/// here. A JSON `null` deserializes to `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub id: String,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<ProductLabel>,
    /// Local product bag read by `product:<field>` paths.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub product: Map<String, Value>,
    /// Any other locally persisted field (sample data, custom columns).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OrderRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_upstream(mut self, payload: Value) -> Self {
        self.upstream = if payload.is_null() { None } else { Some(payload) };
        self
    }

    pub fn with_local(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// `orderRecord[field_id]` over the typed and free-form local fields.
    ///
    /// Scalar typed fields always answer (`Null` when unset). `product`,
    /// `labels` and `upstream` answer as they serialize, or `None` when
    /// empty or absent. Other keys answer `None` when absent.
    pub fn local_value(&self, field_id: &str) -> Option<Value> {
        match field_id {
            "id" => Some(Value::String(self.id.clone())),
            "status" => Some(Value::String(self.status.as_str().to_string())),
            "assignedTo" => Some(opt_string(&self.assigned_to)),
            "notes" => Some(opt_string(&self.notes)),
            "product" if self.product.is_empty() => None,
            "product" => Some(Value::Object(self.product.clone())),
            "labels" if self.labels.is_empty() => None,
            "labels" => serde_json::to_value(&self.labels).ok(),
            "upstream" => self.upstream.clone(),
            _ => self.extra.get(field_id).cloned(),
        }
    }

    /// Convert `product.labelNames` / `product.labelCategories` into
    /// [`ProductLabel`] pairs when no pairs were supplied directly.
    pub fn adopt_legacy_labels(&mut self) -> Result<(), LabelBagError> {
        if !self.labels.is_empty() {
            return Ok(());
        }
        let names = string_array(self.product.get("labelNames"));
        let categories = string_array(self.product.get("labelCategories"));
        if names.is_empty() && categories.is_empty() {
            return Ok(());
        }
        self.labels = labels_from_parallel(&names, &categories)?;
        Ok(())
    }
}

fn opt_string(v: &Option<String>) -> Value {
    v.as_ref()
        .map(|s| Value::String(s.clone()))
        .unwrap_or(Value::Null)
}

fn string_array(v: Option<&Value>) -> Vec<String> {
    match v {
        Some(Value::Array(items)) => items
            .iter()
            .map(|i| match i {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    }
}
