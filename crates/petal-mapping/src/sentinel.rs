//! Failure taxonomy surfaced as ordinary display data.
//!
//! Resolution never returns `Err` to its caller. Every failure mode maps to
//! one stable sentinel string; one bad field degrades on its own while the
//! rest of the card renders normally.

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::labels::ResolvedLabel;

/// Stable placeholder returned in place of a missing or failed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sentinel {
    /// No value resolved from any source.
    NotSpecified,
    /// Upstream-sourced field whose extract transformation could not run.
    NotAvailable,
    /// Pattern compiled and ran, but did not match.
    NoMatch,
    /// Pattern failed to compile.
    InvalidRegex,
    /// Date field failed to parse after the dd/mm/yyyy reformat attempt.
    InvalidDate,
    /// Unexpected failure during resolution; logged at the point of capture.
    ErrorLoading,
}

impl Sentinel {
    pub const ALL: [Sentinel; 6] = [
        Sentinel::NotSpecified,
        Sentinel::NotAvailable,
        Sentinel::NoMatch,
        Sentinel::InvalidRegex,
        Sentinel::InvalidDate,
        Sentinel::ErrorLoading,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentinel::NotSpecified => "Not specified",
            Sentinel::NotAvailable => "N/A",
            Sentinel::NoMatch => "No match",
            Sentinel::InvalidRegex => "Invalid Regex",
            Sentinel::InvalidDate => "Invalid Date",
            Sentinel::ErrorLoading => "Error loading field",
        }
    }

    /// `true` for sentinels that indicate a broken mapping rather than
    /// merely absent data.
    pub fn is_failure(&self) -> bool {
        !matches!(self, Sentinel::NotSpecified)
    }
}

impl std::fmt::Display for Sentinel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Sentinel {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// DisplayValue
// ---------------------------------------------------------------------------

/// The resolved value of one field, before the consumer turns it into text.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayValue {
    /// Output of an extract transformation.
    Text(String),
    /// Untransformed, non-null raw value.
    Raw(Value),
    /// Value mapped through a label table.
    Label(ResolvedLabel),
    Sentinel(Sentinel),
}

impl DisplayValue {
    pub fn not_set() -> Self {
        DisplayValue::Sentinel(Sentinel::NotSpecified)
    }

    pub fn sentinel(&self) -> Option<Sentinel> {
        match self {
            DisplayValue::Sentinel(s) => Some(*s),
            _ => None,
        }
    }

    pub fn is_not_set(&self) -> bool {
        self.sentinel() == Some(Sentinel::NotSpecified)
    }

    pub fn color(&self) -> Option<&str> {
        match self {
            DisplayValue::Label(l) if !l.color.is_empty() => Some(&l.color),
            _ => None,
        }
    }

    /// Text shown to the operator. `placeholder` replaces the generic
    /// "Not specified" text only.
    pub fn render(&self, placeholder: Option<&str>) -> String {
        match self {
            DisplayValue::Text(s) => s.clone(),
            DisplayValue::Raw(v) => render_raw(v),
            DisplayValue::Label(l) => l.name.clone(),
            DisplayValue::Sentinel(Sentinel::NotSpecified) => placeholder
                .unwrap_or(Sentinel::NotSpecified.as_str())
                .to_string(),
            DisplayValue::Sentinel(s) => s.as_str().to_string(),
        }
    }
}

fn render_raw(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => Sentinel::NotSpecified.as_str().to_string(),
        other => other.to_string(),
    }
}
