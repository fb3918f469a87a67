//! Closed set of field kinds exposed to the rendering layer.

use serde::Serialize;

use petal_schemas::{FieldDefinition, FieldIcon, FieldType, OrderRecord};

use crate::resolver::ValueResolver;
use crate::sentinel::DisplayValue;

/// How the rendering layer should lay a value out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RenderHint {
    SingleLine,
    MultiLine,
    Date,
    Choice,
}

#[derive(Debug, Clone, Copy)]
pub enum FieldKind<'a> {
    Text(&'a FieldDefinition),
    Date(&'a FieldDefinition),
    Select(&'a FieldDefinition),
    Textarea(&'a FieldDefinition),
}

impl<'a> FieldKind<'a> {
    pub fn of(field: &'a FieldDefinition) -> Self {
        match field.field_type {
            FieldType::Text => FieldKind::Text(field),
            FieldType::Date => FieldKind::Date(field),
            FieldType::Select => FieldKind::Select(field),
            FieldType::Textarea => FieldKind::Textarea(field),
        }
    }

    pub fn definition(&self) -> &'a FieldDefinition {
        match *self {
            FieldKind::Text(f)
            | FieldKind::Date(f)
            | FieldKind::Select(f)
            | FieldKind::Textarea(f) => f,
        }
    }

    /// Configured icon; an unset or unknown icon falls back to the kind's own.
    pub fn icon(&self) -> FieldIcon {
        let configured = self.definition().icon;
        if configured != FieldIcon::Generic {
            return configured;
        }
        match self {
            FieldKind::Text(_) => FieldIcon::Generic,
            FieldKind::Date(_) => FieldIcon::Calendar,
            FieldKind::Select(_) => FieldIcon::Tag,
            FieldKind::Textarea(_) => FieldIcon::FileText,
        }
    }

    pub fn render_hint(&self) -> RenderHint {
        match self {
            FieldKind::Text(_) => RenderHint::SingleLine,
            FieldKind::Date(_) => RenderHint::Date,
            FieldKind::Select(_) => RenderHint::Choice,
            FieldKind::Textarea(_) => RenderHint::MultiLine,
        }
    }

    pub fn resolve(&self, resolver: &mut ValueResolver<'_>, order: &OrderRecord) -> DisplayValue {
        resolver.resolve(self.definition(), order)
    }
}
