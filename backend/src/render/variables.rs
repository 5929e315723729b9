//! `{{variable}}` substitution for bodies and subject lines.

use handlebars::Handlebars;
use serde::Serialize;
use std::collections::BTreeMap;

/// Values a single recipient's copy is personalised with.
///
/// `extra` entries are flattened next to the fixed fields, so `{{company}}` resolves
/// from `extra["company"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecipientData {
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl RecipientData {
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            role: role.into(),
            extra: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Renders handlebars expressions. Unknown variables render as empty text.
pub struct VariableRenderer {
    markup: Handlebars<'static>,
    plain: Handlebars<'static>,
}

impl VariableRenderer {
    pub fn new() -> Self {
        let markup = Handlebars::new();
        let mut plain = Handlebars::new();
        plain.register_escape_fn(handlebars::no_escape);
        Self { markup, plain }
    }

    /// Renders markup; substituted values are HTML-escaped.
    pub fn render_html(
        &self,
        template: &str,
        data: &RecipientData,
    ) -> Result<String, handlebars::RenderError> {
        self.markup.render_template(template, data)
    }

    /// Renders plain text such as a subject line; values are inserted verbatim.
    pub fn render_text(
        &self,
        template: &str,
        data: &RecipientData,
    ) -> Result<String, handlebars::RenderError> {
        self.plain.render_template(template, data)
    }
}

impl Default for VariableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> RecipientData {
        RecipientData::new("Ada & Co", "ada@example.com", "admin").with("company", "Analytical")
    }

    #[test]
    fn substitutes_known_and_blanks_unknown() {
        let renderer = VariableRenderer::new();
        let out = renderer
            .render_html("<p>{{role}} at {{company}}{{missing}}</p>", &ada())
            .unwrap();
        assert_eq!(out, "<p>admin at Analytical</p>");
    }

    #[test]
    fn escapes_only_in_markup() {
        let renderer = VariableRenderer::new();
        assert_eq!(renderer.render_html("{{name}}", &ada()).unwrap(), "Ada &amp; Co");
        assert_eq!(renderer.render_text("Hi {{name}}", &ada()).unwrap(), "Hi Ada & Co");
    }

    #[test]
    fn malformed_template_is_an_error() {
        let renderer = VariableRenderer::new();
        assert!(renderer.render_html("{{#if name}}unclosed", &ada()).is_err());
    }
}
