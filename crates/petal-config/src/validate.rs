//! Publish gate for a merged field set.
//!
//! Errors block publishing; warnings are reported but do not. The gate
//! compiles patterns and parses paths with the same code the resolver uses,
//! so a set that passes here cannot fail differently at render time.

use std::collections::HashSet;

use serde::Serialize;

use petal_mapping::path::SourcePath;
use petal_mapping::transform::compile;
use petal_schemas::{FieldDefinition, FieldType};

use crate::FieldSetError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldIssue {
    /// Position in the merged list; ids may be empty or duplicated.
    pub index: usize,
    pub field_id: String,
    pub severity: IssueSeverity,
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishReport {
    pub publishable: bool,
    pub field_count: usize,
    pub issues: Vec<FieldIssue>,
}

impl PublishReport {
    pub fn errors(&self) -> impl Iterator<Item = &FieldIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &FieldIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Warning)
    }
}

struct Collector<'a> {
    index: usize,
    field: &'a FieldDefinition,
    out: &'a mut Vec<FieldIssue>,
}

impl Collector<'_> {
    fn push(&mut self, severity: IssueSeverity, code: &'static str, message: String) {
        self.out.push(FieldIssue {
            index: self.index,
            field_id: self.field.id.clone(),
            severity,
            code,
            message,
        });
    }
}

pub fn validate_field_set(fields: &[FieldDefinition]) -> PublishReport {
    let mut issues = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for (index, field) in fields.iter().enumerate() {
        let mut c = Collector {
            index,
            field,
            out: &mut issues,
        };

        let id = field.id.trim();
        if id.is_empty() {
            c.push(IssueSeverity::Error, "EMPTY_ID", "field id is empty".into());
        } else if !seen.insert(id) {
            c.push(
                IssueSeverity::Error,
                "DUPLICATE_ID",
                format!("field id '{id}' is defined more than once"),
            );
        }

        if field.label.trim().is_empty() {
            c.push(IssueSeverity::Error, "EMPTY_LABEL", "field label is empty".into());
        }

        for (i, raw) in field.source_paths.iter().enumerate() {
            if let Err(e) = SourcePath::parse(raw) {
                c.push(
                    IssueSeverity::Error,
                    "MALFORMED_PATH",
                    format!("source path #{i}: {e}"),
                );
            }
        }

        if field.transformation.is_extract() {
            match field.transformation.pattern.as_deref() {
                None | Some("") => c.push(
                    IssueSeverity::Warning,
                    "EXTRACT_WITHOUT_PATTERN",
                    "extract has no pattern; the whole value is used".into(),
                ),
                Some(p) => {
                    if compile(p).is_none() {
                        c.push(
                            IssueSeverity::Error,
                            "INVALID_PATTERN",
                            format!("pattern '{p}' does not compile"),
                        );
                    }
                }
            }
        }

        if field.lookup.is_some() && field.field_type != FieldType::Select {
            c.push(
                IssueSeverity::Warning,
                "LOOKUP_ON_NON_SELECT",
                format!(
                    "lookup is set on a '{}' field; only select fields usually map ids",
                    field.field_type.as_str()
                ),
            );
        }

        if field.source_paths.is_empty() {
            c.push(
                IssueSeverity::Warning,
                "NO_SOURCE_PATHS",
                "no source paths; the field is empty for every upstream order".into(),
            );
        }
    }

    let publishable = !issues.iter().any(|i| i.severity == IssueSeverity::Error);
    PublishReport {
        publishable,
        field_count: fields.len(),
        issues,
    }
}

/// `Err(FieldSetError::Invalid)` unless the report is publishable.
pub fn require_publishable(report: &PublishReport) -> Result<(), FieldSetError> {
    if report.publishable {
        return Ok(());
    }
    let first: Vec<String> = report
        .errors()
        .take(8)
        .map(|i| format!("{}[{}]: {}", i.code, i.field_id, i.message))
        .collect();
    Err(FieldSetError::Invalid {
        errors: report.errors().count(),
        first,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use petal_schemas::LabelKind;

    fn codes(report: &PublishReport) -> Vec<&'static str> {
        report.issues.iter().map(|i| i.code).collect()
    }

    #[test]
    fn clean_set_is_publishable() {
        let fields = vec![FieldDefinition::new("city", "City").with_paths(["shipping_address.city"])];
        let r = validate_field_set(&fields);
        assert!(r.publishable);
        assert!(r.issues.is_empty());
        assert!(require_publishable(&r).is_ok());
    }

    #[test]
    fn blocking_issues() {
        let fields = vec![
            FieldDefinition::new("a", "A").with_paths(["x"]),
            FieldDefinition::new("a", "A again").with_paths(["y"]),
            FieldDefinition::new(" ", "").with_paths(["a..b"]),
            FieldDefinition::new("re", "Re").with_paths(["z"]).with_extract("["),
        ];
        let r = validate_field_set(&fields);
        assert!(!r.publishable);
        assert_eq!(
            codes(&r),
            vec![
                "DUPLICATE_ID",
                "EMPTY_ID",
                "EMPTY_LABEL",
                "MALFORMED_PATH",
                "INVALID_PATTERN"
            ]
        );
        let err = require_publishable(&r).unwrap_err();
        assert!(err.to_string().starts_with("FIELDSET_INVALID: 5 blocking"));
    }

    #[test]
    fn warnings_do_not_block() {
        let mut extract_no_pattern = FieldDefinition::new("n", "N").with_paths(["note"]);
        extract_no_pattern.transformation.kind = petal_schemas::TransformKind::Extract;
        let fields = vec![
            extract_no_pattern,
            FieldDefinition::new("who", "Who")
                .with_paths(["x"])
                .with_lookup(LabelKind::Florist),
            FieldDefinition::new("local", "Local"),
        ];
        let r = validate_field_set(&fields);
        assert!(r.publishable);
        assert_eq!(
            codes(&r),
            vec![
                "EXTRACT_WITHOUT_PATTERN",
                "LOOKUP_ON_NON_SELECT",
                "NO_SOURCE_PATHS"
            ]
        );
        assert_eq!(r.warnings().count(), 3);
    }
}
