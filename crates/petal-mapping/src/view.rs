//! The two consumers' shared output contract: the live card and the preview
//! report. Both go through one [`ValueResolver`] per call.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use petal_schemas::{FieldDefinition, FieldIcon, LabelKind, LabelTables, OrderRecord, OrderStatus};

use crate::kind::{FieldKind, RenderHint};
use crate::labels::{LabelIndex, ResolvedLabel};
use crate::resolver::ValueResolver;
use crate::sentinel::Sentinel;

// ---------------------------------------------------------------------------
// Card
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardField {
    pub field_id: String,
    pub label: String,
    pub icon: FieldIcon,
    pub hint: RenderHint,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentinel: Option<Sentinel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSection {
    pub category: String,
    pub fields: Vec<CardField>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub order_id: String,
    pub status: OrderStatus,
    pub assignee: ResolvedLabel,
    pub sections: Vec<CardSection>,
}

impl CardView {
    pub fn field(&self, field_id: &str) -> Option<&CardField> {
        self.sections
            .iter()
            .flat_map(|s| s.fields.iter())
            .find(|f| f.field_id == field_id)
    }
}

/// Render the visible fields of `order`, grouped by category in the order
/// categories first appear in `fields`.
pub fn render_card(fields: &[FieldDefinition], order: &OrderRecord, labels: &LabelTables) -> CardView {
    let index = LabelIndex::build(labels);
    let mut resolver = ValueResolver::new(&index);
    let mut sections: Vec<CardSection> = Vec::new();

    for field in fields.iter().filter(|f| f.visible) {
        let kind = FieldKind::of(field);
        let display = kind.resolve(&mut resolver, order);
        let entry = CardField {
            field_id: field.id.clone(),
            label: field.label.clone(),
            icon: kind.icon(),
            hint: kind.render_hint(),
            value: display.render(field.placeholder.as_deref()),
            color: display.color().map(str::to_string),
            sentinel: display.sentinel(),
        };
        match sections.iter_mut().find(|s| s.category == field.category) {
            Some(section) => section.fields.push(entry),
            None => sections.push(CardSection {
                category: field.category.clone(),
                fields: vec![entry],
            }),
        }
    }

    CardView {
        order_id: order.id.clone(),
        status: order.status,
        assignee: index.resolve_label(LabelKind::Florist, order.assigned_to.as_deref()),
        sections,
    }
}

// ---------------------------------------------------------------------------
// Preview
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewField {
    pub field_id: String,
    pub label: String,
    pub visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_path: Option<String>,
    pub from_upstream: bool,
    /// Raw value before transformation; absent when undefined.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
    pub display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentinel: Option<Sentinel>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewSummary {
    pub total: usize,
    pub resolved: usize,
    pub not_set: usize,
    pub failed: usize,
    /// Sentinel display string → count. Only sentinels that occurred.
    pub by_sentinel: BTreeMap<String, usize>,
}

impl PreviewSummary {
    fn record(&mut self, sentinel: Option<Sentinel>) {
        self.total += 1;
        match sentinel {
            None => self.resolved += 1,
            Some(s) => {
                if s.is_failure() {
                    self.failed += 1;
                } else {
                    self.not_set += 1;
                }
                *self.by_sentinel.entry(s.as_str().to_string()).or_default() += 1;
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewReport {
    pub order_id: String,
    pub has_upstream: bool,
    pub fields: Vec<PreviewField>,
    pub summary: PreviewSummary,
}

impl PreviewReport {
    pub fn field(&self, field_id: &str) -> Option<&PreviewField> {
        self.fields.iter().find(|f| f.field_id == field_id)
    }
}

/// Resolve every field, visible or not, with the path that produced it.
pub fn preview(fields: &[FieldDefinition], order: &OrderRecord, labels: &LabelTables) -> PreviewReport {
    let index = LabelIndex::build(labels);
    let mut resolver = ValueResolver::new(&index);
    let mut summary = PreviewSummary::default();

    let rows: Vec<PreviewField> = fields
        .iter()
        .map(|field| {
            let trace = resolver.resolve_traced(field, order);
            let sentinel = trace.display.sentinel();
            summary.record(sentinel);
            PreviewField {
                field_id: field.id.clone(),
                label: field.label.clone(),
                visible: field.visible,
                matched_path: trace.matched.map(|m| m.path),
                from_upstream: trace.from_upstream,
                raw: trace.raw,
                display: trace.display.render(field.placeholder.as_deref()),
                sentinel,
            }
        })
        .collect();

    tracing::debug!(
        order_id = %order.id,
        total = summary.total,
        failed = summary.failed,
        "preview built"
    );

    PreviewReport {
        order_id: order.id.clone(),
        has_upstream: order.upstream.is_some(),
        fields: rows,
        summary,
    }
}
