//! Command handler modules for petal-cli.
//!
//! Shared file loaders live here. Command-specific logic lives in the
//! submodules.

pub mod preview;
pub mod transition;
pub mod validate;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::fs;

use petal_config::LoadedFieldSet;
use petal_schemas::OrderRecord;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Read a JSON file into `T`, tolerating a UTF-8 BOM.
pub fn read_json<T: DeserializeOwned>(path: &str, what: &str) -> Result<T> {
    let bytes = fs::read(path).with_context(|| format!("read {what} failed: {path}"))?;
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(&bytes);
    serde_json::from_slice(bytes).with_context(|| format!("{what} must contain valid JSON: {path}"))
}

/// Load an order snapshot and pair any legacy label arrays it carries.
pub fn load_order(path: &str) -> Result<OrderRecord> {
    let mut order: OrderRecord = read_json(path, "order")?;
    order
        .adopt_legacy_labels()
        .with_context(|| format!("order {} has an unusable label bag", order.id))?;
    Ok(order)
}

/// Layer `paths` over the embedded defaults, the same way the daemon loads
/// `PETAL_FIELDS`. No paths means the defaults alone.
pub fn load_fields(paths: &[String]) -> Result<LoadedFieldSet> {
    let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
    petal_config::load_with_defaults(&path_refs)
}
