//! # Component Tree Model
//!
//! The layout of an email is a tree of [`Component`] nodes. Root-level nodes are kept in a
//! plain `Vec<Component>`; container-like nodes (`container`, `row`, `column`) own their
//! children exclusively, so there is never a back-reference from a child to its parent.
//!
//! The serialized form is the JSON document persisted in a template's `body` column:
//!
//! ```json
//! [{ "id": "component_…", "type": "text", "content": "Hi {{name}}",
//!    "styles": { "fontSize": "16px" }, "attributes": {} }]
//! ```
//!
//! Identifiers are generated at creation and never reused. Cloning a subtree with
//! [`clone_subtree`] regenerates the identifier of every node in the copy.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Ordered style declarations, keyed by camelCase property name (e.g. `fontSize`).
pub type StyleMap = IndexMap<String, StyleValue>;

/// Ordered node-specific attributes (`src`/`alt` for images, `href` for buttons).
pub type AttributeMap = IndexMap<String, String>;

/// The closed set of node kinds the editor can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    Text,
    Image,
    Button,
    Container,
    Row,
    Column,
    Divider,
    Spacer,
}

impl ComponentType {
    /// Whether nodes of this type may own children.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            ComponentType::Container | ComponentType::Row | ComponentType::Column
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ComponentType::Text => "text",
            ComponentType::Image => "image",
            ComponentType::Button => "button",
            ComponentType::Container => "container",
            ComponentType::Row => "row",
            ComponentType::Column => "column",
            ComponentType::Divider => "divider",
            ComponentType::Spacer => "spacer",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single style value. The editor stores most values as strings (`"16px"`) but
/// numeric values (`opacity: 0.9`, `flex: 1`) are accepted as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Text(String),
    Number(f64),
}

impl StyleValue {
    /// Returns the value as a string slice when it was stored as text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            StyleValue::Text(s) => Some(s),
            StyleValue::Number(_) => None,
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Text(s) => f.write_str(s),
            StyleValue::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        StyleValue::Text(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        StyleValue::Text(value)
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        StyleValue::Number(value)
    }
}

/// A node in the layout tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Opaque identifier, unique across the whole tree.
    pub id: String,

    /// Node kind. Never changes after creation.
    #[serde(rename = "type")]
    pub component_type: ComponentType,

    /// Text or inline HTML for `text`/`button`; empty for structural types.
    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub styles: StyleMap,

    #[serde(default)]
    pub attributes: AttributeMap,

    /// Ordered children. Only meaningful for container-like types.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Component>,
}

impl Component {
    /// Returns the style value stored under `key`, if any.
    pub fn style(&self, key: &str) -> Option<&StyleValue> {
        self.styles.get(key)
    }

    /// Returns the attribute stored under `key`, if any.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn is_container(&self) -> bool {
        self.component_type.is_container()
    }
}

/// Generates a fresh component identifier.
pub fn generate_id() -> String {
    format!("component_{}", Uuid::new_v4().simple())
}

/// Creates a node with a fresh identifier.
///
/// Children are dropped for leaf types; container-like types default to an empty list.
pub fn create_node(
    component_type: ComponentType,
    content: impl Into<String>,
    styles: StyleMap,
    attributes: AttributeMap,
    children: Option<Vec<Component>>,
) -> Component {
    let children = if component_type.is_container() {
        children.unwrap_or_default()
    } else {
        Vec::new()
    };

    Component {
        id: generate_id(),
        component_type,
        content: content.into(),
        styles,
        attributes,
        children,
    }
}

/// Deep copy of `node` where every identifier in the result is freshly generated.
pub fn clone_subtree(node: &Component) -> Component {
    Component {
        id: generate_id(),
        component_type: node.component_type,
        content: node.content.clone(),
        styles: node.styles.clone(),
        attributes: node.attributes.clone(),
        children: node.children.iter().map(clone_subtree).collect(),
    }
}

/// Builds a [`StyleMap`] from `(key, value)` pairs, preserving their order.
pub fn styles<I, K, V>(pairs: I) -> StyleMap
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<StyleValue>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Builds an [`AttributeMap`] from `(key, value)` pairs, preserving their order.
pub fn attributes<I, K, V>(pairs: I) -> AttributeMap
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
