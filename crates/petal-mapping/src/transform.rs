//! Regex-extract and date normalization applied after path resolution.
//!
//! [`apply`] returns `None` when no transformation applies (kind is not
//! `extract`, or the raw value is not a string). The caller decides the
//! fallback in that case. Every other outcome is either extracted text or a
//! failure [`Sentinel`].

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use regex::{Regex, RegexBuilder};
use serde_json::Value;

use petal_schemas::{FieldDefinition, FieldType};

use crate::sentinel::Sentinel;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transformed {
    Value(String),
    Failed(Sentinel),
}

impl Transformed {
    pub fn sentinel(&self) -> Option<Sentinel> {
        match self {
            Transformed::Failed(s) => Some(*s),
            Transformed::Value(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Pattern cache
// ---------------------------------------------------------------------------

/// Compiled patterns for one resolution pass. Compile failures are cached
/// as `None` so a broken pattern is reported once per pass, not per field.
#[derive(Debug, Default)]
pub struct PatternCache {
    compiled: HashMap<String, Option<Regex>>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, pattern: &str) -> Option<&Regex> {
        self.compiled
            .entry(pattern.to_string())
            .or_insert_with(|| compile(pattern))
            .as_ref()
    }

    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }
}

/// Case-insensitive compile; `None` on any syntax error.
pub fn compile(pattern: &str) -> Option<Regex> {
    match RegexBuilder::new(pattern).case_insensitive(true).build() {
        Ok(re) => Some(re),
        Err(err) => {
            tracing::debug!(pattern, error = %err, "extract pattern failed to compile");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Apply `field.transformation` to `raw`, compiling the pattern fresh.
pub fn apply(raw: &Value, field: &FieldDefinition) -> Option<Transformed> {
    apply_cached(raw, field, &mut PatternCache::new())
}

pub fn apply_cached(
    raw: &Value,
    field: &FieldDefinition,
    cache: &mut PatternCache,
) -> Option<Transformed> {
    if !field.transformation.is_extract() {
        return None;
    }
    let text = raw.as_str()?;

    let candidate = match field.transformation.pattern.as_deref() {
        None | Some("") => text.to_string(),
        Some(pattern) => {
            let Some(re) = cache.get(pattern) else {
                return Some(Transformed::Failed(Sentinel::InvalidRegex));
            };
            let Some(caps) = re.captures(text) else {
                return Some(Transformed::Failed(Sentinel::NoMatch));
            };
            caps.get(1)
                .filter(|m| !m.as_str().is_empty())
                .or_else(|| caps.get(0))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default()
        }
    };

    if field.field_type == FieldType::Date {
        return Some(match normalize_date(&candidate) {
            Some(iso) => Transformed::Value(iso),
            None => Transformed::Failed(Sentinel::InvalidDate),
        });
    }
    Some(Transformed::Value(candidate))
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S %z", "%Y-%m-%dT%H:%M:%S%.f%z"];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Normalize a date candidate to a UTC instant `YYYY-MM-DDTHH:MM:SS.mmmZ`.
///
/// `DD/MM/YYYY` is reordered to `YYYY-MM-DD` before parsing. Values without
/// an offset are read as UTC. Returns `None` for anything unparseable,
/// including calendar-invalid dates such as `31/02/2024`.
pub fn normalize_date(candidate: &str) -> Option<String> {
    let trimmed = candidate.trim();
    let reordered = reorder_day_month_year(trimmed);
    let input = reordered.as_deref().unwrap_or(trimmed);
    parse_instant(input).map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn reorder_day_month_year(s: &str) -> Option<String> {
    let b = s.as_bytes();
    let shaped = b.len() == 10
        && b[2] == b'/'
        && b[5] == b'/'
        && b.iter()
            .enumerate()
            .all(|(i, c)| i == 2 || i == 5 || c.is_ascii_digit());
    if !shaped {
        return None;
    }
    Some(format!("{}-{}-{}", &s[6..10], &s[3..5], &s[0..2]))
}

fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    let parsed = OFFSET_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            NAIVE_DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|ndt| ndt.and_utc())
        })
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|ndt| ndt.and_utc())
        })?;
    // `%Y` takes any digit count, so `25/12/24` would otherwise read as 0025.
    has_four_digit_year(parsed).then_some(parsed)
}

fn has_four_digit_year(dt: DateTime<Utc>) -> bool {
    (1000..=9999).contains(&dt.year())
}
