use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Label tables
// ---------------------------------------------------------------------------

/// One row of a curated lookup table (florists, difficulty, product type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: String,
}

impl LabelEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
        }
    }
}

/// Which lookup table a field's value is resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LabelKind {
    Florist,
    Difficulty,
    ProductType,
}

impl LabelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelKind::Florist => "florist",
            LabelKind::Difficulty => "difficulty",
            LabelKind::ProductType => "productType",
        }
    }
}

/// The three label tables supplied with every render call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelTables {
    #[serde(default)]
    pub florists: Vec<LabelEntry>,
    #[serde(default)]
    pub difficulty: Vec<LabelEntry>,
    #[serde(default)]
    pub product_types: Vec<LabelEntry>,
}

// ---------------------------------------------------------------------------
// Local product label bag
// ---------------------------------------------------------------------------

/// Category of a label attached to the local product bag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LabelCategory {
    Difficulty,
    ProductType,
    Other(String),
}

impl From<String> for LabelCategory {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "difficulty" => LabelCategory::Difficulty,
            "productType" => LabelCategory::ProductType,
            _ => LabelCategory::Other(raw),
        }
    }
}

impl From<LabelCategory> for String {
    fn from(c: LabelCategory) -> Self {
        match c {
            LabelCategory::Difficulty => "difficulty".to_string(),
            LabelCategory::ProductType => "productType".to_string(),
            LabelCategory::Other(s) => s,
        }
    }
}

/// A named label with its category, replacing the index-aligned
/// `labelNames` / `labelCategories` arrays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductLabel {
    pub name: String,
    pub category: LabelCategory,
}

impl ProductLabel {
    pub fn new(name: impl Into<String>, category: LabelCategory) -> Self {
        Self {
            name: name.into(),
            category,
        }
    }
}

/// Returned when legacy parallel label arrays cannot be paired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelBagError {
    /// `labelNames` and `labelCategories` have different lengths. Which name
    /// belongs to which category is unknowable, so nothing is paired.
    LengthMismatch { names: usize, categories: usize },
}

impl std::fmt::Display for LabelBagError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LabelBagError::LengthMismatch { names, categories } => write!(
                f,
                "LABEL_BAG_MISALIGNED: {names} label name(s) but {categories} categor(ies)"
            ),
        }
    }
}

impl std::error::Error for LabelBagError {}

/// Pair legacy index-aligned arrays into [`ProductLabel`]s.
///
/// Refuses mismatched lengths instead of truncating.
pub fn labels_from_parallel(
    names: &[String],
    categories: &[String],
) -> Result<Vec<ProductLabel>, LabelBagError> {
    if names.len() != categories.len() {
        return Err(LabelBagError::LengthMismatch {
            names: names.len(),
            categories: categories.len(),
        });
    }
    Ok(names
        .iter()
        .zip(categories)
        .map(|(n, c)| ProductLabel::new(n.clone(), LabelCategory::from(c.clone())))
        .collect())
}
