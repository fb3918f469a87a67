//! `petal validate`: run the publish gate without publishing anything.

use anyhow::{Context, Result};

use super::load_fields;

pub fn run(field_paths: &[String], strict: bool) -> Result<()> {
    let loaded = load_fields(field_paths)?;
    let report = petal_config::validate_field_set(&loaded.fields);

    let json = serde_json::to_string_pretty(&report).context("serialize publish report failed")?;
    println!("{json}");

    if strict {
        petal_config::require_publishable(&report)?;
    }
    Ok(())
}
