use serde::{Deserialize, Serialize};

use crate::LabelKind;

// ---------------------------------------------------------------------------
// FieldType
// ---------------------------------------------------------------------------

/// Governs post-transform coercion only; never which source path is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Date,
    Select,
    Textarea,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Date => "date",
            FieldType::Select => "select",
            FieldType::Textarea => "textarea",
        }
    }
}

// ---------------------------------------------------------------------------
// Transformation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformKind {
    #[default]
    None,
    Extract,
}

/// Optional regex-extract step applied after path resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transformation {
    #[serde(default, alias = "type")]
    pub kind: TransformKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl Transformation {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn extract(pattern: impl Into<String>) -> Self {
        Self {
            kind: TransformKind::Extract,
            pattern: Some(pattern.into()),
        }
    }

    pub fn is_extract(&self) -> bool {
        self.kind == TransformKind::Extract
    }
}

// ---------------------------------------------------------------------------
// FieldIcon
// ---------------------------------------------------------------------------

/// Closed set of icons the rendering layer knows how to draw.
///
/// Authored configs name icons as free strings (`"map-pin"`, `"MapPin"`,
/// `"map_pin"` are all accepted). Anything unrecognised becomes `Generic`
/// rather than failing the whole field set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldIcon {
    Calendar,
    Clock,
    User,
    Phone,
    Mail,
    MapPin,
    Truck,
    Package,
    Gift,
    Tag,
    Flower,
    Message,
    FileText,
    Hash,
    Dollar,
    Star,
    #[default]
    Generic,
}

impl FieldIcon {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldIcon::Calendar => "calendar",
            FieldIcon::Clock => "clock",
            FieldIcon::User => "user",
            FieldIcon::Phone => "phone",
            FieldIcon::Mail => "mail",
            FieldIcon::MapPin => "map-pin",
            FieldIcon::Truck => "truck",
            FieldIcon::Package => "package",
            FieldIcon::Gift => "gift",
            FieldIcon::Tag => "tag",
            FieldIcon::Flower => "flower",
            FieldIcon::Message => "message",
            FieldIcon::FileText => "file-text",
            FieldIcon::Hash => "hash",
            FieldIcon::Dollar => "dollar",
            FieldIcon::Star => "star",
            FieldIcon::Generic => "generic",
        }
    }

    pub fn from_name(raw: &str) -> Self {
        let key: String = raw
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "calendar" | "calendardays" => FieldIcon::Calendar,
            "clock" | "time" => FieldIcon::Clock,
            "user" | "person" => FieldIcon::User,
            "phone" => FieldIcon::Phone,
            "mail" | "email" => FieldIcon::Mail,
            "mappin" | "address" | "location" => FieldIcon::MapPin,
            "truck" | "delivery" => FieldIcon::Truck,
            "package" | "box" => FieldIcon::Package,
            "gift" => FieldIcon::Gift,
            "tag" | "label" => FieldIcon::Tag,
            "flower" | "flower2" => FieldIcon::Flower,
            "message" | "messagesquare" | "messagecircle" => FieldIcon::Message,
            "filetext" | "file" | "note" => FieldIcon::FileText,
            "hash" => FieldIcon::Hash,
            "dollar" | "dollarsign" | "price" => FieldIcon::Dollar,
            "star" => FieldIcon::Star,
            _ => FieldIcon::Generic,
        }
    }
}

impl From<String> for FieldIcon {
    fn from(raw: String) -> Self {
        FieldIcon::from_name(&raw)
    }
}

impl From<FieldIcon> for String {
    fn from(icon: FieldIcon) -> Self {
        icon.as_str().to_string()
    }
}

// ---------------------------------------------------------------------------
// FieldDefinition
// ---------------------------------------------------------------------------

/// Configuration describing how to locate and present one order attribute.
///
/// `source_paths` is a fallback chain evaluated left to right against the
/// upstream payload; the first defined, non-null hit wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub category: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub source_paths: Vec<String>,
    #[serde(default)]
    pub transformation: Transformation,
    #[serde(default)]
    pub icon: FieldIcon,
    /// Label table the resolved value is an id (or name) in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lookup: Option<LabelKind>,
    /// Overrides the generic "not set" text for this field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

fn default_visible() -> bool {
    true
}

impl FieldDefinition {
    /// Minimal visible text field with no source paths.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            category: String::new(),
            visible: true,
            field_type: FieldType::Text,
            source_paths: Vec::new(),
            transformation: Transformation::none(),
            icon: FieldIcon::Generic,
            lookup: None,
            placeholder: None,
        }
    }

    pub fn with_type(mut self, field_type: FieldType) -> Self {
        self.field_type = field_type;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_extract(mut self, pattern: impl Into<String>) -> Self {
        self.transformation = Transformation::extract(pattern);
        self
    }

    pub fn with_icon(mut self, icon: FieldIcon) -> Self {
        self.icon = icon;
        self
    }

    pub fn with_lookup(mut self, kind: LabelKind) -> Self {
        self.lookup = Some(kind);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}
