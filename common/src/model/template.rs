//! Persisted template record and the interpretation of its `body` column.
//!
//! A template's `body` is ambiguous per record: newer records store the serialized
//! component tree (a JSON array), older ones store raw HTML. [`EmailBody::parse`] tries
//! the tree form first and falls back to HTML, which [`EmailBody::into_components`] wraps
//! in a single synthetic text node so the rest of the system only ever sees a tree.

use crate::model::component::{create_node, styles, AttributeMap, Component, ComponentType};
use crate::model::recipient::RecipientSelector;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Publication state of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateStatus {
    #[default]
    Draft,
    Published,
}

impl TemplateStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateStatus::Draft => "draft",
            TemplateStatus::Published => "published",
        }
    }

    /// Parses the stored column value. Anything unknown is treated as a draft.
    pub fn from_db(value: &str) -> Self {
        match value {
            "published" => TemplateStatus::Published,
            _ => TemplateStatus::Draft,
        }
    }
}

impl fmt::Display for TemplateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A template record as exchanged with the storage layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailTemplate {
    /// Database identifier; `None` until the record is inserted.
    #[serde(default)]
    pub id: Option<i64>,
    pub template_name: String,
    #[serde(default)]
    pub created_by: String,
    pub subject: String,
    /// Serialized component tree, or raw HTML for legacy records.
    pub body: String,
    /// Compiled markup wrapped in the email container, refreshed on every save.
    #[serde(default)]
    pub email_body: Option<String>,
    #[serde(default)]
    pub email_css: Option<String>,
    #[serde(default)]
    pub recipients: Vec<RecipientSelector>,
    #[serde(default)]
    pub status: TemplateStatus,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl EmailTemplate {
    /// Interprets `body` as a component tree, falling back to a synthetic HTML node.
    pub fn components(&self) -> Vec<Component> {
        EmailBody::parse(&self.body).into_components()
    }
}

/// The two shapes a persisted `body` may take.
#[derive(Debug, Clone, PartialEq)]
pub enum EmailBody {
    Components(Vec<Component>),
    Html(String),
}

impl EmailBody {
    /// Attempts tree deserialization first; a value that is not valid JSON, is not an
    /// array, or does not describe components is kept as literal HTML.
    pub fn parse(body: &str) -> Self {
        match serde_json::from_str::<serde_json::Value>(body) {
            Ok(value @ serde_json::Value::Array(_)) => {
                match serde_json::from_value::<Vec<Component>>(value) {
                    Ok(components) => EmailBody::Components(components),
                    Err(_) => EmailBody::Html(body.to_string()),
                }
            }
            _ => EmailBody::Html(body.to_string()),
        }
    }

    pub fn into_components(self) -> Vec<Component> {
        match self {
            EmailBody::Components(components) => components,
            EmailBody::Html(html) => vec![html_fallback_node(&html)],
        }
    }
}

/// Wraps legacy HTML in one text node, dropping any `<body>` open/close tags.
pub fn html_fallback_node(html: &str) -> Component {
    create_node(
        ComponentType::Text,
        strip_body_tags(html),
        styles([
            ("fontSize", "16px"),
            ("color", "#333333"),
            ("padding", "20px"),
            ("fontFamily", "Arial, sans-serif"),
            ("lineHeight", "1.6"),
        ]),
        AttributeMap::new(),
        None,
    )
}

fn strip_body_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    loop {
        let next = [rest.find("<body"), rest.find("</body>")]
            .into_iter()
            .flatten()
            .min();
        let Some(start) = next else { break };
        out.push_str(&rest[..start]);
        rest = match rest[start..].find('>') {
            Some(end) => &rest[start + end + 1..],
            None => "",
        };
    }
    out.push_str(rest);
    out
}
