//! petal-mapping
//!
//! Field-mapping engine: resolves display values for an order from its
//! upstream payload, local fields and label tables.
//!
//! Everything here is synchronous and side-effect free. Failures never
//! escape as errors; they become [`Sentinel`] display values so one broken
//! field cannot take down a card.

pub mod kind;
pub mod labels;
pub mod path;
pub mod resolver;
pub mod sentinel;
pub mod transform;
pub mod view;

pub use kind::{FieldKind, RenderHint};
pub use labels::{LabelIndex, ResolvedLabel};
pub use path::{resolve_path, DataBag, PathError, SourcePath};
pub use resolver::{FieldTrace, MatchedPath, ResolveError, ValueResolver};
pub use sentinel::{DisplayValue, Sentinel};
pub use transform::{apply as apply_transformation, normalize_date, PatternCache, Transformed};
pub use view::{
    preview, render_card, CardField, CardSection, CardView, PreviewField, PreviewReport,
    PreviewSummary,
};
