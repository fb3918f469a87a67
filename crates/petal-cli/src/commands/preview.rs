//! `petal preview`: resolve a whole field set against one order snapshot.

use anyhow::{Context, Result};
use tracing::info;

use petal_schemas::LabelTables;

use super::{load_fields, load_order, read_json};

pub fn run(field_paths: &[String], order_path: &str, labels_path: Option<&str>) -> Result<()> {
    let loaded = load_fields(field_paths)?;
    let order = load_order(order_path)?;
    let labels: LabelTables = match labels_path {
        Some(p) => read_json(p, "labels")?,
        None => LabelTables::default(),
    };

    let report = petal_mapping::preview(&loaded.fields, &order, &labels);
    info!(
        order_id = %order.id,
        config_hash = %loaded.config_hash,
        failed = report.summary.failed,
        "preview"
    );

    let json = serde_json::to_string_pretty(&report).context("serialize preview report failed")?;
    println!("{json}");
    Ok(())
}
