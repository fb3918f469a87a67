//! Source-path resolution over untyped order data.
//!
//! A configured path string is parsed once into a [`SourcePath`] whose
//! variant is chosen by the path's shape, in this precedence:
//!
//! 1. `product:<field>` reads the local label / product bag
//! 2. `tags` reads the upstream tag list, joined with `", "`
//! 3. `line_items.title` / `line_items.variant_title` read the first line item
//! 4. anything else is a generic dot-path walk over the upstream payload
//!
//! The live card and the preview tool both go through [`SourcePath::resolve`],
//! so they cannot disagree about what a path means.
//!
//! Resolution returns `None` for "undefined" and `Some(Value::Null)` for an
//! explicit null.

use serde_json::{Map, Value};

use petal_schemas::{LabelCategory, OrderRecord, ProductLabel};

const PRODUCT_PREFIX: &str = "product:";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A configured path string that cannot be resolved against anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    Empty,
    EmptySegment { path: String },
    EmptyProductField { path: String },
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::Empty => write!(f, "source path is empty"),
            PathError::EmptySegment { path } => {
                write!(f, "source path '{path}' has an empty segment")
            }
            PathError::EmptyProductField { path } => {
                write!(f, "source path '{path}' names no product field")
            }
        }
    }
}

impl std::error::Error for PathError {}

// ---------------------------------------------------------------------------
// Data bag
// ---------------------------------------------------------------------------

/// Everything a path may read for one order.
#[derive(Debug, Clone, Copy)]
pub struct DataBag<'a> {
    pub upstream: &'a Value,
    pub labels: &'a [ProductLabel],
    pub product: &'a Map<String, Value>,
}

impl<'a> DataBag<'a> {
    /// Bag for an order that carries an upstream payload; `None` otherwise.
    pub fn for_order(order: &'a OrderRecord) -> Option<Self> {
        order.upstream.as_ref().map(|upstream| DataBag {
            upstream,
            labels: &order.labels,
            product: &order.product,
        })
    }
}

// ---------------------------------------------------------------------------
// SourcePath
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductKey {
    /// `product:labelNames`: first label name regardless of category.
    FirstLabel,
    /// `product:difficultyLabel` / `product:productTypeLabel`.
    FirstInCategory(LabelCategory),
    /// Any other `product:<field>`: direct property lookup.
    Property(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineItemField {
    Title,
    VariantTitle,
}

impl LineItemField {
    fn key(&self) -> &'static str {
        match self {
            LineItemField::Title => "title",
            LineItemField::VariantTitle => "variant_title",
        }
    }
}

/// A parsed source path; the variant is the resolution strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourcePath {
    Product(ProductKey),
    Tags,
    LineItem(LineItemField),
    Dotted(Vec<String>),
}

impl SourcePath {
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        let path = raw.trim();
        if path.is_empty() {
            return Err(PathError::Empty);
        }

        if let Some(field) = path.strip_prefix(PRODUCT_PREFIX) {
            let field = field.trim();
            let key = match field {
                "" => {
                    return Err(PathError::EmptyProductField {
                        path: path.to_string(),
                    })
                }
                "labelNames" => ProductKey::FirstLabel,
                "difficultyLabel" => ProductKey::FirstInCategory(LabelCategory::Difficulty),
                "productTypeLabel" => ProductKey::FirstInCategory(LabelCategory::ProductType),
                other => ProductKey::Property(other.to_string()),
            };
            return Ok(SourcePath::Product(key));
        }

        match path {
            "tags" => return Ok(SourcePath::Tags),
            "line_items.title" => return Ok(SourcePath::LineItem(LineItemField::Title)),
            "line_items.variant_title" => {
                return Ok(SourcePath::LineItem(LineItemField::VariantTitle))
            }
            _ => {}
        }

        let segments: Vec<String> = path.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(PathError::EmptySegment {
                path: path.to_string(),
            });
        }
        Ok(SourcePath::Dotted(segments))
    }

    pub fn resolve(&self, bag: &DataBag<'_>) -> Option<Value> {
        match self {
            SourcePath::Product(key) => resolve_product(key, bag),
            SourcePath::Tags => bag.upstream.get("tags").map(join_if_list),
            SourcePath::LineItem(field) => bag
                .upstream
                .get("line_items")
                .and_then(Value::as_array)
                .and_then(|items| items.first())
                .and_then(|item| item.get(field.key()))
                .cloned(),
            SourcePath::Dotted(segments) => walk(bag.upstream, segments).cloned(),
        }
    }
}

/// Parse and resolve in one step.
pub fn resolve_path(raw: &str, bag: &DataBag<'_>) -> Result<Option<Value>, PathError> {
    Ok(SourcePath::parse(raw)?.resolve(bag))
}

fn resolve_product(key: &ProductKey, bag: &DataBag<'_>) -> Option<Value> {
    match key {
        ProductKey::FirstLabel => Some(
            bag.labels
                .first()
                .map(|l| Value::String(l.name.clone()))
                .unwrap_or(Value::Null),
        ),
        ProductKey::FirstInCategory(category) => Some(
            bag.labels
                .iter()
                .find(|l| &l.category == category)
                .map(|l| Value::String(l.name.clone()))
                .unwrap_or(Value::Null),
        ),
        ProductKey::Property(name) => bag.product.get(name).cloned(),
    }
}

fn walk<'v>(root: &'v Value, segments: &[String]) -> Option<&'v Value> {
    let mut cur = root;
    for seg in segments {
        cur = match cur {
            Value::Object(map) => map.get(seg)?,
            Value::Array(items) => items.get(seg.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(cur)
}

/// Join a list into `", "`-separated text; anything else passes through.
pub(crate) fn join_if_list(v: &Value) -> Value {
    match v {
        Value::Array(items) => Value::String(
            items
                .iter()
                .filter(|i| !i.is_null())
                .map(|i| match i {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", "),
        ),
        other => other.clone(),
    }
}
