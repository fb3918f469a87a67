//! Layered field-set configuration.
//!
//! Field sets are YAML documents with a top-level `fields:` list. Layers are
//! merged in order: a later field with an id already present replaces that
//! entry in place, a new id is appended, and any other top-level key is
//! deep-merged. The merged document is canonicalised to JSON and hashed so a
//! published field set has a stable identity.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;

use petal_schemas::FieldDefinition;

mod validate;

pub use validate::{
    require_publishable, validate_field_set, FieldIssue, IssueSeverity, PublishReport,
};

/// Field set shipped with a fresh install.
pub const DEFAULT_FIELDS_YAML: &str = include_str!("../defaults.yaml");

const FIELDS_KEY: &str = "fields";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSetError {
    /// A layer is not YAML, or the merged document is not a field set.
    Parse { layer: Option<usize>, message: String },
    /// Publish gate refused the set.
    Invalid { errors: usize, first: Vec<String> },
}

impl std::fmt::Display for FieldSetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldSetError::Parse {
                layer: Some(i),
                message,
            } => write!(f, "FIELDSET_PARSE layer={i}: {message}"),
            FieldSetError::Parse {
                layer: None,
                message,
            } => write!(f, "FIELDSET_PARSE: {message}"),
            FieldSetError::Invalid { errors, first } => write!(
                f,
                "FIELDSET_INVALID: {errors} blocking issue(s). First few: {first:?}"
            ),
        }
    }
}

impl std::error::Error for FieldSetError {}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LoadedFieldSet {
    pub config_hash: String,
    pub canonical_json: String,
    pub config_json: Value,
    pub fields: Vec<FieldDefinition>,
}

#[derive(Deserialize)]
struct FieldSetDoc {
    #[serde(default)]
    fields: Vec<FieldDefinition>,
}

pub fn load_layered_yaml(paths: &[&str]) -> Result<LoadedFieldSet> {
    let mut docs: Vec<String> = Vec::new();
    for p in paths {
        let raw =
            fs::read_to_string(p).with_context(|| format!("failed to read field set yaml: {p}"))?;
        docs.push(raw);
    }
    let doc_refs: Vec<&str> = docs.iter().map(|s| s.as_str()).collect();
    load_layered_yaml_from_strings(&doc_refs)
}

pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedFieldSet> {
    let mut merged = serde_json::json!({});
    for (i, raw) in yaml_docs.iter().enumerate() {
        let v_yaml: serde_yaml::Value =
            serde_yaml::from_str(raw).map_err(|e| FieldSetError::Parse {
                layer: Some(i),
                message: e.to_string(),
            })?;
        // An empty document is an empty layer.
        if v_yaml.is_null() {
            continue;
        }
        let v_json = serde_json::to_value(v_yaml).context("yaml->json conversion failed")?;
        merged = merge_layer(merged, v_json);
    }

    let doc: FieldSetDoc =
        serde_json::from_value(merged.clone()).map_err(|e| FieldSetError::Parse {
            layer: None,
            message: e.to_string(),
        })?;

    let canonical_json = canonicalize_json(&merged)?;
    let config_hash = sha256_hex(canonical_json.as_bytes());
    Ok(LoadedFieldSet {
        config_hash,
        canonical_json,
        config_json: merged,
        fields: doc.fields,
    })
}

pub fn default_field_set() -> Result<LoadedFieldSet> {
    load_layered_yaml_from_strings(&[DEFAULT_FIELDS_YAML])
}

/// The embedded defaults with operator layers on top.
pub fn load_with_defaults(paths: &[&str]) -> Result<LoadedFieldSet> {
    let mut docs: Vec<String> = vec![DEFAULT_FIELDS_YAML.to_string()];
    for p in paths {
        docs.push(
            fs::read_to_string(p).with_context(|| format!("failed to read field set yaml: {p}"))?,
        );
    }
    let doc_refs: Vec<&str> = docs.iter().map(|s| s.as_str()).collect();
    load_layered_yaml_from_strings(&doc_refs)
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

fn merge_layer(base: Value, layer: Value) -> Value {
    match (base, layer) {
        (Value::Object(mut base_map), Value::Object(layer_map)) => {
            for (k, layer_val) in layer_map {
                let base_val = base_map.remove(&k).unwrap_or(Value::Null);
                let next = if k == FIELDS_KEY {
                    merge_fields(base_val, layer_val)
                } else {
                    deep_merge(base_val, layer_val)
                };
                base_map.insert(k, next);
            }
            Value::Object(base_map)
        }
        (_, other) => other,
    }
}

/// Replace-by-id against the lower layers, append otherwise. Each base slot
/// is replaced at most once per layer, so an id repeated inside one layer
/// stays duplicated and the publish gate still sees it. Entries without a
/// string id are always appended; validation reports them later.
fn merge_fields(base: Value, layer: Value) -> Value {
    let (mut out, layer_items) = match (base, layer) {
        (Value::Array(b), Value::Array(l)) => (b, l),
        (_, other) => return other,
    };
    let base_len = out.len();
    let mut replaced = vec![false; base_len];
    for item in layer_items {
        let slot = field_id(&item).and_then(|id| {
            (0..base_len).find(|&i| !replaced[i] && field_id(&out[i]) == Some(id))
        });
        match slot {
            Some(i) => {
                replaced[i] = true;
                out[i] = item;
            }
            None => out.push(item),
        }
    }
    Value::Array(out)
}

fn field_id(v: &Value) -> Option<&str> {
    v.get("id").and_then(Value::as_str)
}

fn deep_merge(a: Value, b: Value) -> Value {
    match (a, b) {
        (Value::Object(mut a_map), Value::Object(b_map)) => {
            for (k, b_val) in b_map {
                let a_val = a_map.remove(&k).unwrap_or(Value::Null);
                a_map.insert(k, deep_merge(a_val, b_val));
            }
            Value::Object(a_map)
        }
        (_, b_other) => b_other,
    }
}

// ---------------------------------------------------------------------------
// Canonical form
// ---------------------------------------------------------------------------

fn canonicalize_json(v: &Value) -> Result<String> {
    // serde_json's default Map is ordered by key, so object key order in the
    // YAML source does not affect the output. Array order does.
    serde_json::to_string(v).context("canonical json serialize failed")
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
