//! Id → display-name/color lookup over the three curated label tables.
//!
//! Built once per render call from read-only snapshots. Lookups try the id
//! first, then a case-insensitive name match, so label names carried in the
//! product bag (`"Hard"`) resolve to their color as well.

use std::collections::HashMap;

use serde::Serialize;

use petal_schemas::{LabelEntry, LabelKind, LabelTables};

pub const DEFAULT_FLORIST_NAME: &str = "Unassigned";
pub const DEFAULT_FLORIST_COLOR: &str = "#9CA3AF";
pub const DEFAULT_DIFFICULTY_NAME: &str = "Easy";
pub const DEFAULT_DIFFICULTY_COLOR: &str = "#22C55E";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLabel {
    pub name: String,
    pub color: String,
    /// `false` when the fallback label was used.
    pub matched: bool,
}

#[derive(Debug, Default)]
struct LabelTable {
    by_id: HashMap<String, LabelEntry>,
    id_by_name: HashMap<String, String>,
}

impl LabelTable {
    fn build(entries: &[LabelEntry]) -> Self {
        let mut t = LabelTable::default();
        for e in entries {
            // First entry wins on duplicate ids and names.
            t.by_id.entry(e.id.clone()).or_insert_with(|| e.clone());
            t.id_by_name
                .entry(e.name.to_lowercase())
                .or_insert_with(|| e.id.clone());
        }
        t
    }

    fn find(&self, key: &str) -> Option<&LabelEntry> {
        self.by_id.get(key).or_else(|| {
            self.id_by_name
                .get(&key.to_lowercase())
                .and_then(|id| self.by_id.get(id))
        })
    }
}

#[derive(Debug, Default)]
pub struct LabelIndex {
    florists: LabelTable,
    difficulty: LabelTable,
    product_types: LabelTable,
}

impl LabelIndex {
    pub fn build(tables: &LabelTables) -> Self {
        Self {
            florists: LabelTable::build(&tables.florists),
            difficulty: LabelTable::build(&tables.difficulty),
            product_types: LabelTable::build(&tables.product_types),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    fn table(&self, kind: LabelKind) -> &LabelTable {
        match kind {
            LabelKind::Florist => &self.florists,
            LabelKind::Difficulty => &self.difficulty,
            LabelKind::ProductType => &self.product_types,
        }
    }

    /// Resolve `id` (or a label name) in the `kind` table; absent, blank or
    /// unmatched ids get the kind's fallback label.
    pub fn resolve_label(&self, kind: LabelKind, id: Option<&str>) -> ResolvedLabel {
        let key = id.map(str::trim).filter(|k| !k.is_empty());
        match key.and_then(|k| self.table(kind).find(k)) {
            Some(entry) => ResolvedLabel {
                name: entry.name.clone(),
                color: entry.color.clone(),
                matched: true,
            },
            None => Self::fallback(kind),
        }
    }

    pub fn fallback(kind: LabelKind) -> ResolvedLabel {
        let (name, color) = match kind {
            LabelKind::Florist => (DEFAULT_FLORIST_NAME, DEFAULT_FLORIST_COLOR),
            LabelKind::Difficulty => (DEFAULT_DIFFICULTY_NAME, DEFAULT_DIFFICULTY_COLOR),
            LabelKind::ProductType => ("", ""),
        };
        ResolvedLabel {
            name: name.to_string(),
            color: color.to_string(),
            matched: false,
        }
    }
}
