//! Deterministic sample data shared by scenario tests.

use serde_json::{json, Value};

use petal_schemas::{
    FieldDefinition, FieldIcon, FieldType, LabelCategory, LabelEntry, LabelKind, LabelTables,
    OrderRecord, ProductLabel,
};

pub const FLORIST_MARTA: &str = "U42";
pub const FLORIST_JOAO: &str = "U7";

/// A commerce-platform order as it arrives from the webhook feed.
pub fn upstream_payload() -> Value {
    json!({
        "id": 5_550_001_042u64,
        "name": "#1042",
        "email": "ana.lima@example.com",
        "tags": ["rush", "vip"],
        "note": "Please deliver on 25/12/2024 before noon",
        "customer": { "first_name": "Ana", "last_name": "Lima", "phone": "+351 912 000 111" },
        "shipping_address": {
            "name": "Rita Lima",
            "address1": "Rua das Flores 12",
            "city": "Porto",
            "zip": "4050-262",
            "phone": null
        },
        "note_attributes": [
            { "name": "Card Message", "value": "Feliz Natal!" },
            { "name": "Delivery Date", "value": "2024-12-25" }
        ],
        "line_items": [
            { "title": "Winter Peony Bouquet", "variant_title": "Large", "quantity": 1 },
            { "title": "Glass Vase", "variant_title": null, "quantity": 1 }
        ]
    })
}

/// Order carrying [`upstream_payload`], plus stale sample values under the
/// same ids the field set uses.
pub fn upstream_order(id: &str) -> OrderRecord {
    let mut order = sample_order(id).with_upstream(upstream_payload());
    order.labels = vec![
        ProductLabel::new("Hard", LabelCategory::Difficulty),
        ProductLabel::new("Bouquet", LabelCategory::ProductType),
    ];
    order
}

/// Order with local / sample values only.
pub fn sample_order(id: &str) -> OrderRecord {
    let mut order = OrderRecord::new(id)
        .with_local("recipientName", json!("Sample Recipient"))
        .with_local("deliveryCity", json!("Sample City"))
        .with_local("orderNumber", json!("#0000"))
        .with_local("deliveryDate", json!("2000-01-01"))
        .with_local("cardMessage", json!("Sample message"))
        .with_local("tags", json!(["sample", "demo"]));
    order.notes = Some("sample notes".into());
    order
}

/// A field set touching every path strategy and transformation.
pub fn delivery_fields() -> Vec<FieldDefinition> {
    vec![
        FieldDefinition::new("recipientName", "Recipient")
            .with_category("Delivery")
            .with_icon(FieldIcon::User)
            .with_paths(["shipping_address.name", "customer.first_name"]),
        FieldDefinition::new("deliveryCity", "City")
            .with_category("Delivery")
            .with_icon(FieldIcon::MapPin)
            .with_paths(["shipping_address.city"]),
        FieldDefinition::new("recipientPhone", "Phone")
            .with_category("Delivery")
            .with_icon(FieldIcon::Phone)
            .with_paths(["shipping_address.phone", "customer.phone"]),
        FieldDefinition::new("deliveryDate", "Delivery date")
            .with_category("Delivery")
            .with_type(FieldType::Date)
            .with_paths(["note"])
            .with_extract(r"(\d{2}/\d{2}/\d{4})"),
        FieldDefinition::new("orderNumber", "Order #")
            .with_category("Order")
            .with_icon(FieldIcon::Hash)
            .with_paths(["name"])
            .with_extract(r"#(\d+)"),
        FieldDefinition::new("product", "Product")
            .with_category("Order")
            .with_icon(FieldIcon::Flower)
            .with_paths(["line_items.title"]),
        FieldDefinition::new("size", "Size")
            .with_category("Order")
            .with_paths(["line_items.variant_title"]),
        FieldDefinition::new("tags", "Tags")
            .with_category("Order")
            .with_icon(FieldIcon::Tag)
            .with_paths(["tags"]),
        FieldDefinition::new("difficulty", "Difficulty")
            .with_category("Production")
            .with_type(FieldType::Select)
            .with_paths(["product:difficultyLabel"])
            .with_lookup(LabelKind::Difficulty),
        FieldDefinition::new("productType", "Type")
            .with_category("Production")
            .with_type(FieldType::Select)
            .with_paths(["product:productTypeLabel"])
            .with_lookup(LabelKind::ProductType),
        FieldDefinition::new("cardMessage", "Card message")
            .with_category("Production")
            .with_type(FieldType::Textarea)
            .with_paths(["note_attributes.0.value"]),
        FieldDefinition::new("customerEmail", "Email")
            .with_category("Customer")
            .with_icon(FieldIcon::Mail)
            .with_paths(["email"])
            .hidden(),
    ]
}

pub fn label_tables() -> LabelTables {
    LabelTables {
        florists: vec![
            LabelEntry::new(FLORIST_MARTA, "Marta", "#F472B6"),
            LabelEntry::new(FLORIST_JOAO, "João", "#60A5FA"),
        ],
        difficulty: vec![
            LabelEntry::new("d1", "Easy", "#22C55E"),
            LabelEntry::new("d2", "Medium", "#EAB308"),
            LabelEntry::new("d3", "Hard", "#EF4444"),
        ],
        product_types: vec![
            LabelEntry::new("p1", "Bouquet", "#A78BFA"),
            LabelEntry::new("p2", "Arrangement", "#FB923C"),
        ],
    }
}

/// Minimal YAML field-set layer, for loader tests.
pub const FIELDS_YAML_BASE: &str = r##"
fields:
  - id: recipientName
    label: Recipient
    category: Delivery
    icon: user
    sourcePaths: [shipping_address.name, customer.first_name]
  - id: orderNumber
    label: "Order #"
    category: Order
    sourcePaths: [name]
    transformation: { type: extract, pattern: "#(\\d+)" }
"##;

/// Overlay replacing `orderNumber` and adding `deliveryCity`.
pub const FIELDS_YAML_OVERLAY: &str = r##"
fields:
  - id: orderNumber
    label: Order number
    category: Order
    sourcePaths: [order_number, name]
  - id: deliveryCity
    label: City
    category: Delivery
    sourcePaths: [shipping_address.city]
"##;
