//! Per-field value resolution.
//!
//! # Upstream exclusivity
//!
//! Once an order carries an upstream payload, every field resolves strictly
//! from that payload (or the local label bag via `product:` paths) or shows
//! empty. Local / sample values are consulted **only** when no payload is
//! present at all. Mixing the two would show placeholder data as if it
//! belonged to a real order.
//!
//! # Algorithm
//!
//! 1. Payload present, paths declared: first defined, non-null path hit wins
//!    and is marked upstream-sourced.
//! 2. Payload present, nothing found: raw is `null`. No local fallback.
//! 3. No payload: raw is `orderRecord[field.id]`.
//! 4. Arrays are joined with `", "`.
//! 5. Transformation; a non-`None` result is the display value.
//! 6. Otherwise upstream-sourced extract fields show `"N/A"`; everything
//!    else shows the raw value, `null` rendering as "not set".
//!
//! Label indirection (`field.lookup`) runs last, on non-sentinel values.

use serde_json::Value;

use petal_schemas::{FieldDefinition, OrderRecord};

use crate::labels::LabelIndex;
use crate::path::{join_if_list, DataBag, PathError, SourcePath};
use crate::sentinel::{DisplayValue, Sentinel};
use crate::transform::{apply_cached, PatternCache, Transformed};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures that abort one field's resolution. Never returned to callers of
/// [`ValueResolver::resolve`]; they surface as `"Error loading field"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    MalformedPath { index: usize, source: PathError },
}

impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolveError::MalformedPath { index, source } => {
                write!(f, "source path #{index} is malformed: {source}")
            }
        }
    }
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResolveError::MalformedPath { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Trace
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedPath {
    pub index: usize,
    pub path: String,
}

/// Full account of one field's resolution, used by the preview tool.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldTrace {
    pub field_id: String,
    pub matched: Option<MatchedPath>,
    pub from_upstream: bool,
    /// Raw value before transformation; `None` is "undefined".
    pub raw: Option<Value>,
    pub display: DisplayValue,
}

// ---------------------------------------------------------------------------
// ValueResolver
// ---------------------------------------------------------------------------

/// Resolves display values for one render pass.
///
/// Holds the pass's label index and pattern cache; create one per card (or
/// per preview request) and drop it afterwards.
pub struct ValueResolver<'l> {
    labels: &'l LabelIndex,
    patterns: PatternCache,
}

impl<'l> ValueResolver<'l> {
    pub fn new(labels: &'l LabelIndex) -> Self {
        Self {
            labels,
            patterns: PatternCache::new(),
        }
    }

    pub fn labels(&self) -> &LabelIndex {
        self.labels
    }

    pub fn resolve(&mut self, field: &FieldDefinition, order: &OrderRecord) -> DisplayValue {
        self.resolve_traced(field, order).display
    }

    pub fn resolve_traced(&mut self, field: &FieldDefinition, order: &OrderRecord) -> FieldTrace {
        match self.try_resolve(field, order) {
            Ok(trace) => trace,
            Err(err) => {
                tracing::warn!(
                    order_id = %order.id,
                    field_id = %field.id,
                    error = %err,
                    "field resolution failed"
                );
                FieldTrace {
                    field_id: field.id.clone(),
                    matched: None,
                    from_upstream: false,
                    raw: None,
                    display: DisplayValue::Sentinel(Sentinel::ErrorLoading),
                }
            }
        }
    }

    fn try_resolve(
        &mut self,
        field: &FieldDefinition,
        order: &OrderRecord,
    ) -> Result<FieldTrace, ResolveError> {
        let paths = field
            .source_paths
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                SourcePath::parse(raw).map_err(|source| ResolveError::MalformedPath { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut matched = None;
        let raw: Option<Value> = match DataBag::for_order(order) {
            Some(bag) => {
                let hit = paths.iter().enumerate().find_map(|(index, path)| {
                    path.resolve(&bag)
                        .filter(|v| !v.is_null())
                        .map(|v| (index, v))
                });
                match hit {
                    Some((index, v)) => {
                        matched = Some(MatchedPath {
                            index,
                            path: field.source_paths[index].clone(),
                        });
                        Some(v)
                    }
                    None => Some(Value::Null),
                }
            }
            None => order.local_value(&field.id),
        };
        let from_upstream = matched.is_some();

        let joined = raw.as_ref().map(join_if_list);
        let subject = joined.clone().unwrap_or(Value::Null);

        let display = match apply_cached(&subject, field, &mut self.patterns) {
            Some(Transformed::Value(text)) => DisplayValue::Text(text),
            Some(Transformed::Failed(sentinel)) => DisplayValue::Sentinel(sentinel),
            None if from_upstream && field.transformation.is_extract() => {
                DisplayValue::Sentinel(Sentinel::NotAvailable)
            }
            None if subject.is_null() => DisplayValue::not_set(),
            None => DisplayValue::Raw(subject),
        };
        let display = self.apply_lookup(field, display);

        let sentinel = display.sentinel();
        tracing::debug!(
            order_id = %order.id,
            field_id = %field.id,
            from_upstream,
            sentinel = ?sentinel,
            "field resolved"
        );

        Ok(FieldTrace {
            field_id: field.id.clone(),
            matched,
            from_upstream,
            raw,
            display,
        })
    }

    fn apply_lookup(&self, field: &FieldDefinition, display: DisplayValue) -> DisplayValue {
        let Some(kind) = field.lookup else {
            return display;
        };
        let key = match &display {
            DisplayValue::Text(s) => Some(s.clone()),
            DisplayValue::Raw(Value::String(s)) => Some(s.clone()),
            DisplayValue::Raw(other) => Some(other.to_string()),
            DisplayValue::Sentinel(Sentinel::NotSpecified) => None,
            DisplayValue::Sentinel(_) | DisplayValue::Label(_) => return display,
        };
        DisplayValue::Label(self.labels.resolve_label(kind, key.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petal_schemas::{FieldType, LabelEntry, LabelKind, LabelTables};
    use serde_json::json;

    fn resolve(field: &FieldDefinition, order: &OrderRecord) -> DisplayValue {
        let idx = LabelIndex::empty();
        ValueResolver::new(&idx).resolve(field, order)
    }

    #[test]
    fn local_mode_returns_order_field_verbatim() {
        let order = OrderRecord::new("o1").with_local("recipientName", json!("Ana Lima"));
        let f = FieldDefinition::new("recipientName", "Recipient");
        assert_eq!(resolve(&f, &order), DisplayValue::Raw(json!("Ana Lima")));
    }

    #[test]
    fn local_mode_ignores_source_paths() {
        let order = OrderRecord::new("o1").with_local("city", json!("Porto"));
        let f = FieldDefinition::new("city", "City").with_paths(["shipping_address.city"]);
        assert_eq!(resolve(&f, &order), DisplayValue::Raw(json!("Porto")));
    }

    #[test]
    fn upstream_never_falls_back_to_local() {
        let order = OrderRecord::new("o1")
            .with_local("city", json!("Sample City"))
            .with_upstream(json!({ "shipping_address": {} }));
        let f = FieldDefinition::new("city", "City").with_paths(["shipping_address.city"]);
        assert_eq!(resolve(&f, &order), DisplayValue::not_set());
    }

    #[test]
    fn upstream_field_without_paths_is_empty() {
        let order = OrderRecord::new("o1")
            .with_local("city", json!("Sample City"))
            .with_upstream(json!({ "city": "Real City" }));
        let f = FieldDefinition::new("city", "City");
        assert_eq!(resolve(&f, &order), DisplayValue::not_set());
    }

    #[test]
    fn fallback_chain_skips_null_and_missing() {
        let order = OrderRecord::new("o1").with_upstream(json!({
            "billing_address": { "phone": null },
            "customer": { "phone": "+351 900" }
        }));
        let f = FieldDefinition::new("phone", "Phone").with_paths([
            "shipping_address.phone",
            "billing_address.phone",
            "customer.phone",
        ]);
        let idx = LabelIndex::empty();
        let trace = ValueResolver::new(&idx).resolve_traced(&f, &order);
        assert_eq!(trace.display, DisplayValue::Raw(json!("+351 900")));
        assert_eq!(
            trace.matched,
            Some(MatchedPath {
                index: 2,
                path: "customer.phone".to_string()
            })
        );
        assert!(trace.from_upstream);
    }

    #[test]
    fn upstream_extract_on_non_string_is_not_available() {
        let order = OrderRecord::new("o1").with_upstream(json!({ "order_number": 1042 }));
        let f = FieldDefinition::new("num", "Number")
            .with_paths(["order_number"])
            .with_extract(r"(\d+)");
        assert_eq!(resolve(&f, &order), DisplayValue::Sentinel(Sentinel::NotAvailable));
    }

    #[test]
    fn upstream_extract_with_nothing_found_is_not_set() {
        let order = OrderRecord::new("o1").with_upstream(json!({}));
        let f = FieldDefinition::new("num", "Number")
            .with_paths(["order_number"])
            .with_extract(r"(\d+)");
        assert_eq!(resolve(&f, &order), DisplayValue::not_set());
    }

    #[test]
    fn arrays_are_joined_before_extract() {
        let order = OrderRecord::new("o1").with_upstream(json!({
            "note_lines": ["gift wrap", "deliver 25/12/2024"]
        }));
        let f = FieldDefinition::new("delivery", "Delivery")
            .with_type(FieldType::Date)
            .with_paths(["note_lines"])
            .with_extract(r"(\d{2}/\d{2}/\d{4})");
        assert_eq!(
            resolve(&f, &order),
            DisplayValue::Text("2024-12-25T00:00:00.000Z".to_string())
        );
    }

    #[test]
    fn malformed_path_degrades_to_error_sentinel() {
        let order = OrderRecord::new("o1").with_upstream(json!({ "a": 1 }));
        let f = FieldDefinition::new("x", "X").with_paths(["a..b"]);
        assert_eq!(resolve(&f, &order), DisplayValue::Sentinel(Sentinel::ErrorLoading));
    }

    #[test]
    fn lookup_maps_ids_and_defaults() {
        let tables = LabelTables {
            florists: vec![LabelEntry::new("U42", "Marta", "#F472B6")],
            ..LabelTables::default()
        };
        let idx = LabelIndex::build(&tables);
        let mut r = ValueResolver::new(&idx);
        let f = FieldDefinition::new("assignedTo", "Florist").with_lookup(LabelKind::Florist);

        let mut order = OrderRecord::new("o1");
        order.assigned_to = Some("U42".to_string());
        let DisplayValue::Label(l) = r.resolve(&f, &order) else {
            panic!("expected label");
        };
        assert_eq!(l.name, "Marta");

        order.assigned_to = None;
        let DisplayValue::Label(l) = r.resolve(&f, &order) else {
            panic!("expected label");
        };
        assert_eq!(l.name, "Unassigned");
    }

    #[test]
    fn lookup_leaves_failure_sentinels_alone() {
        let idx = LabelIndex::empty();
        let f = FieldDefinition::new("d", "D")
            .with_paths(["x"])
            .with_extract("[")
            .with_lookup(LabelKind::Difficulty);
        let order = OrderRecord::new("o1").with_upstream(json!({ "x": "text" }));
        assert_eq!(
            ValueResolver::new(&idx).resolve(&f, &order),
            DisplayValue::Sentinel(Sentinel::InvalidRegex)
        );
    }
}
