use anyhow::Result;

use petal_schemas::OrderUpdate;

/// External persistence collaborator for partial order updates.
///
/// Any retry or backoff policy belongs to the implementation; callers submit
/// exactly once per operator action.
#[async_trait::async_trait]
pub trait OrderUpdater: Send + Sync {
    async fn update_order(&self, update: &OrderUpdate) -> Result<()>;
}
