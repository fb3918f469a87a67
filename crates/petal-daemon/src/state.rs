//! Shared runtime state for petal-daemon.
//!
//! Handlers receive `State<Arc<AppState>>` from Axum. The field set is fixed
//! for the process lifetime; label tables can be replaced at runtime.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::RwLock;

use petal_config::LoadedFieldSet;
use petal_schemas::{FieldDefinition, LabelTables};

/// Static build metadata included in health responses.
#[derive(Clone, Debug)]
pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
}

/// The published field set this daemon renders with.
#[derive(Clone, Debug)]
pub struct FieldSet {
    pub config_hash: String,
    pub fields: Vec<FieldDefinition>,
}

impl From<LoadedFieldSet> for FieldSet {
    fn from(loaded: LoadedFieldSet) -> Self {
        Self {
            config_hash: loaded.config_hash,
            fields: loaded.fields,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub build: BuildInfo,
    pub fields: Arc<FieldSet>,
    /// Used when a request carries no `labels`.
    pub labels: Arc<RwLock<LabelTables>>,
}

impl AppState {
    pub fn new(fields: FieldSet) -> Self {
        Self {
            build: BuildInfo {
                service: "petal-daemon",
                version: env!("CARGO_PKG_VERSION"),
            },
            fields: Arc::new(fields),
            labels: Arc::new(RwLock::new(LabelTables::default())),
        }
    }

    /// State backed by the embedded default field set.
    pub fn with_defaults() -> Result<Self> {
        Ok(Self::new(petal_config::default_field_set()?.into()))
    }

    /// Request labels win; otherwise the current snapshot.
    pub async fn labels_or_current(&self, requested: Option<LabelTables>) -> LabelTables {
        match requested {
            Some(tables) => tables,
            None => self.labels.read().await.clone(),
        }
    }
}
