//! Scenario: upstream exclusivity.
//!
//! # Invariant under test
//! Once an order carries an upstream payload, no field ever shows a value
//! that exists only in the local / sample record. Fields the payload cannot
//! answer show "Not specified" (or "N/A"), never the stale local value.
//!
//! Without a payload the same fields show the local values verbatim.

use serde_json::{json, Value};

use petal_mapping::{DisplayValue, LabelIndex, Sentinel, ValueResolver};
use petal_schemas::{FieldDefinition, OrderRecord};
use petal_testkit::{delivery_fields, sample_order, upstream_order};

fn local_only_values(order: &OrderRecord) -> Vec<Value> {
    order.extra.values().cloned().collect()
}

#[test]
fn no_field_leaks_local_values_once_upstream_is_present() {
    let fields = delivery_fields();
    let mut order = upstream_order("o-1042");
    // Payload that answers nothing the field set asks for.
    order.upstream = Some(json!({ "unrelated": true }));
    let stale = local_only_values(&order);

    let idx = LabelIndex::empty();
    let mut r = ValueResolver::new(&idx);
    for f in fields.iter().filter(|f| f.lookup.is_none()) {
        let shown = r.resolve(f, &order);
        if let DisplayValue::Raw(v) = &shown {
            assert!(
                !stale.contains(v),
                "field {} leaked local value {v}",
                f.id
            );
        }
        assert!(
            matches!(
                shown,
                DisplayValue::Sentinel(Sentinel::NotSpecified | Sentinel::NotAvailable)
            ),
            "field {} should be empty, got {shown:?}",
            f.id
        );
    }
}

#[test]
fn empty_payload_object_still_counts_as_upstream() {
    let order = sample_order("o-1").with_upstream(json!({}));
    let f = FieldDefinition::new("recipientName", "Recipient");
    let idx = LabelIndex::empty();
    assert_eq!(
        ValueResolver::new(&idx).resolve(&f, &order),
        DisplayValue::not_set()
    );
}

#[test]
fn null_payload_is_local_mode() {
    let order = sample_order("o-1").with_upstream(Value::Null);
    assert!(order.upstream.is_none());
    let f = FieldDefinition::new("recipientName", "Recipient").with_paths(["shipping_address.name"]);
    let idx = LabelIndex::empty();
    assert_eq!(
        ValueResolver::new(&idx).resolve(&f, &order),
        DisplayValue::Raw(json!("Sample Recipient"))
    );
}

#[test]
fn empty_paths_local_mode_returns_record_value_exactly() {
    let order = sample_order("o-1");
    let idx = LabelIndex::empty();
    let mut r = ValueResolver::new(&idx);
    for (key, value) in order.extra.iter() {
        let f = FieldDefinition::new(key.clone(), key.clone());
        let expected = match value {
            Value::Array(items) => Value::String(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            other => other.clone(),
        };
        assert_eq!(r.resolve(&f, &order), DisplayValue::Raw(expected), "{key}");
    }
    let notes = FieldDefinition::new("notes", "Notes");
    assert_eq!(
        r.resolve(&notes, &order),
        DisplayValue::Raw(json!("sample notes"))
    );
}

#[test]
fn upstream_values_replace_sample_values_field_by_field() {
    let order = upstream_order("o-1042");
    let idx = LabelIndex::empty();
    let mut r = ValueResolver::new(&idx);
    let by_id = |id: &str| {
        delivery_fields()
            .into_iter()
            .find(|f| f.id == id)
            .unwrap()
    };

    assert_eq!(
        r.resolve(&by_id("recipientName"), &order),
        DisplayValue::Raw(json!("Rita Lima"))
    );
    assert_eq!(
        r.resolve(&by_id("orderNumber"), &order),
        DisplayValue::Text("1042".into())
    );
    // shipping phone is null upstream; falls through to the customer phone.
    assert_eq!(
        r.resolve(&by_id("recipientPhone"), &order),
        DisplayValue::Raw(json!("+351 912 000 111"))
    );
    assert_eq!(
        r.resolve(&by_id("tags"), &order),
        DisplayValue::Raw(json!("rush, vip"))
    );
}
