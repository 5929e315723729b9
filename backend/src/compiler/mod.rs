//! # Markup Compiler
//!
//! Turns a component tree into email-safe markup plus a fixed companion style sheet.
//! Compilation is pure: the same tree always yields byte-identical output.
//!
//! - `html`: node emission and style layering.
//! - `css`: the client resets and the responsive media block.
//! - `styles`: camelCase to CSS conversion and ordered style merging.
//! - `preview`: full preview pages for the editor.

pub mod css;
pub mod html;
pub mod preview;
pub mod styles;

use common::model::component::Component;
use serde::Serialize;

pub use preview::preview_document;

/// Compiled markup and style sheet of one tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledMarkup {
    pub html: String,
    pub css: String,
}

impl CompiledMarkup {
    pub fn compile(tree: &[Component]) -> Self {
        Self {
            html: html::generate_html(tree),
            css: css::generate_css(),
        }
    }

    /// The markup inside the 600px email container, as persisted in `email_body`.
    pub fn wrapped_html(&self) -> String {
        format!("<div class=\"email-container\">{}</div>", self.html)
    }
}
