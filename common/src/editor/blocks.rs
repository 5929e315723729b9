//! Insertable block presets offered by the blocks panel, plus the variables the
//! variables panel can insert into text nodes.

use crate::model::component::{
    attributes, clone_subtree, styles, AttributeMap, Component, ComponentType, StyleMap,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Text,
    Heading,
    Image,
    Button,
    Divider,
    Spacer,
    Container,
    TwoColumns,
    OneThirdSection,
    Header,
    Footer,
}

impl BlockKind {
    pub const ALL: [BlockKind; 11] = [
        BlockKind::Text,
        BlockKind::Heading,
        BlockKind::Image,
        BlockKind::Button,
        BlockKind::Divider,
        BlockKind::Spacer,
        BlockKind::Container,
        BlockKind::TwoColumns,
        BlockKind::OneThirdSection,
        BlockKind::Header,
        BlockKind::Footer,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BlockKind::Text => "Text",
            BlockKind::Heading => "Heading",
            BlockKind::Image => "Image",
            BlockKind::Button => "Button",
            BlockKind::Divider => "Divider",
            BlockKind::Spacer => "Spacer",
            BlockKind::Container => "Container",
            BlockKind::TwoColumns => "2 Columns",
            BlockKind::OneThirdSection => "1/3 Section",
            BlockKind::Header => "Header",
            BlockKind::Footer => "Footer",
        }
    }

    /// A new instance of the block; every node in it carries a fresh id.
    pub fn instantiate(self) -> Component {
        clone_subtree(&self.prototype())
    }

    fn prototype(self) -> Component {
        match self {
            BlockKind::Text => leaf(
                ComponentType::Text,
                "Click to edit text",
                styles([
                    ("fontSize", "16px"),
                    ("color", "#333333"),
                    ("padding", "10px"),
                    ("lineHeight", "1.5"),
                    ("marginBottom", "15px"),
                ]),
            ),
            BlockKind::Heading => leaf(
                ComponentType::Text,
                "Your Heading Here",
                styles([
                    ("fontSize", "28px"),
                    ("fontWeight", "bold"),
                    ("color", "#333333"),
                    ("padding", "10px"),
                    ("lineHeight", "1.2"),
                    ("marginBottom", "15px"),
                ]),
            ),
            BlockKind::Image => Component {
                attributes: attributes([
                    ("src", "https://via.placeholder.com/300x200?text=Image"),
                    ("alt", "Image"),
                ]),
                ..leaf(
                    ComponentType::Image,
                    "",
                    styles([
                        ("width", "100%"),
                        ("maxWidth", "300px"),
                        ("height", "auto"),
                        ("display", "block"),
                        ("marginBottom", "15px"),
                    ]),
                )
            },
            BlockKind::Button => Component {
                attributes: attributes([("href", "#")]),
                ..leaf(
                    ComponentType::Button,
                    "Click me",
                    styles([
                        ("backgroundColor", "#3b82f6"),
                        ("color", "white"),
                        ("padding", "12px 24px"),
                        ("borderRadius", "6px"),
                        ("border", "none"),
                        ("fontSize", "16px"),
                        ("cursor", "pointer"),
                        ("textDecoration", "none"),
                        ("display", "inline-block"),
                        ("marginBottom", "15px"),
                    ]),
                )
            },
            BlockKind::Divider => leaf(
                ComponentType::Divider,
                "",
                styles([
                    ("borderTop", "1px dotted #e5e7eb"),
                    ("margin", "20px 0"),
                    ("height", "0"),
                    ("width", "100%"),
                    ("backgroundColor", "transparent"),
                    ("display", "block"),
                ]),
            ),
            BlockKind::Spacer => leaf(
                ComponentType::Spacer,
                "",
                styles([
                    ("height", "40px"),
                    ("backgroundColor", "transparent"),
                    ("border", "none"),
                    ("width", "100%"),
                    ("display", "block"),
                ]),
            ),
            BlockKind::Container => parent(
                ComponentType::Container,
                styles([
                    ("padding", "20px"),
                    ("backgroundColor", "#f9fafb"),
                    ("border", "1px solid #e5e7eb"),
                    ("borderRadius", "6px"),
                    ("minHeight", "100px"),
                    ("height", "auto"),
                    ("width", "100%"),
                    ("boxSizing", "border-box"),
                ]),
                Vec::new(),
            ),
            BlockKind::TwoColumns => parent(
                ComponentType::Row,
                styles([("display", "flex"), ("gap", "10px"), ("width", "100%")]),
                vec![flex_column(), flex_column()],
            ),
            BlockKind::OneThirdSection => parent(
                ComponentType::Row,
                styles([("gap", "15px"), ("width", "100%")]),
                vec![section_column("33%"), section_column("67%")],
            ),
            BlockKind::Header => parent(
                ComponentType::Container,
                styles([
                    ("backgroundColor", "#1e40af"),
                    ("padding", "20px"),
                    ("color", "white"),
                    ("textAlign", "center"),
                    ("marginBottom", "20px"),
                    ("width", "100%"),
                    ("boxSizing", "border-box"),
                ]),
                vec![
                    leaf(
                        ComponentType::Text,
                        "Your Company Name",
                        styles([
                            ("color", "white"),
                            ("textAlign", "center"),
                            ("margin", "0"),
                            ("fontSize", "32px"),
                            ("fontWeight", "bold"),
                        ]),
                    ),
                    leaf(
                        ComponentType::Text,
                        "Welcome to our newsletter",
                        styles([
                            ("color", "white"),
                            ("textAlign", "center"),
                            ("margin", "10px 0 0 0"),
                            ("fontSize", "16px"),
                            ("opacity", "0.9"),
                        ]),
                    ),
                ],
            ),
            BlockKind::Footer => parent(
                ComponentType::Container,
                styles([
                    ("backgroundColor", "#374151"),
                    ("padding", "20px"),
                    ("color", "white"),
                    ("textAlign", "center"),
                    ("marginTop", "20px"),
                    ("fontSize", "14px"),
                    ("width", "100%"),
                    ("boxSizing", "border-box"),
                ]),
                vec![
                    leaf(
                        ComponentType::Text,
                        "© Your Company Name. All rights reserved.",
                        styles([
                            ("color", "white"),
                            ("textAlign", "center"),
                            ("fontSize", "14px"),
                            ("margin", "0 0 10px 0"),
                        ]),
                    ),
                    leaf(
                        ComponentType::Text,
                        "123 Main Street, City, State 12345 | contact@yourcompany.com",
                        styles([
                            ("color", "white"),
                            ("textAlign", "center"),
                            ("fontSize", "12px"),
                            ("margin", "0"),
                        ]),
                    ),
                ],
            ),
        }
    }
}

fn leaf(component_type: ComponentType, content: &str, styles: StyleMap) -> Component {
    Component {
        id: String::new(),
        component_type,
        content: content.to_string(),
        styles,
        attributes: AttributeMap::new(),
        children: Vec::new(),
    }
}

fn parent(component_type: ComponentType, styles: StyleMap, children: Vec<Component>) -> Component {
    Component {
        children,
        ..leaf(component_type, "", styles)
    }
}

fn flex_column() -> Component {
    parent(
        ComponentType::Column,
        styles([
            ("flex", "1"),
            ("padding", "10px"),
            ("backgroundColor", "#f9fafb"),
            ("border", "1px dashed #d1d5db"),
            ("minHeight", "100px"),
        ]),
        Vec::new(),
    )
}

fn section_column(width: &str) -> Component {
    parent(
        ComponentType::Column,
        styles([
            ("width", width),
            ("padding", "15px"),
            ("backgroundColor", "#f3f4f6"),
            ("border", "1px dashed #d1d5db"),
            ("minHeight", "120px"),
        ]),
        Vec::new(),
    )
}

/// A variable the editor offers for insertion as `{{key}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TemplateVariable {
    pub key: &'static str,
    pub label: &'static str,
    pub example: &'static str,
}

/// Variables every dispatch supplies for each recipient.
pub const TEMPLATE_VARIABLES: [TemplateVariable; 4] = [
    TemplateVariable {
        key: "name",
        label: "Recipient Name",
        example: "John Doe",
    },
    TemplateVariable {
        key: "email",
        label: "Recipient Email",
        example: "john@example.com",
    },
    TemplateVariable {
        key: "role",
        label: "Recipient Role",
        example: "Manager",
    },
    TemplateVariable {
        key: "company",
        label: "Company Name",
        example: "Acme Corp",
    },
];
