//! Tree to markup emitter.
//!
//! Each node becomes exactly one element with `id` and an inline `style` attribute.
//! Styles are layered: structural defaults first, then the node's own styles, then the
//! few properties a type always imposes (inline-level images and buttons, block-level
//! structural nodes). Siblings are joined with `\n`.

use super::styles::{extend, set, style_declarations, value_or};
use common::model::component::{Component, ComponentType, StyleMap, StyleValue};

/// Emits the markup for `tree`. Pure and deterministic.
pub fn generate_html(tree: &[Component]) -> String {
    tree.iter().map(render_node).collect::<Vec<_>>().join("\n")
}

fn render_node(node: &Component) -> String {
    let mut styles = base_styles(node);
    match node.component_type {
        ComponentType::Text => element("div", node, &styles, &node.content),
        ComponentType::Image => {
            set(&mut styles, "display", "inline-block");
            set(&mut styles, "verticalAlign", "top");
            format!(
                "<img id=\"{}\" src=\"{}\" alt=\"{}\" style=\"{}\" />",
                escape_attribute(&node.id),
                escape_attribute(node.attribute("src").unwrap_or_default()),
                escape_attribute(node.attribute("alt").unwrap_or_default()),
                escape_attribute(&style_declarations(&styles)),
            )
        }
        ComponentType::Button => {
            set(&mut styles, "display", "inline-block");
            set(&mut styles, "textDecoration", "none");
            set(&mut styles, "cursor", "pointer");
            set(&mut styles, "verticalAlign", "top");
            format!(
                "<a id=\"{}\" href=\"{}\" style=\"{}\">{}</a>",
                escape_attribute(&node.id),
                escape_attribute(node.attribute("href").unwrap_or("#")),
                escape_attribute(&style_declarations(&styles)),
                node.content,
            )
        }
        ComponentType::Container => {
            set(&mut styles, "display", "block");
            element("div", node, &styles, &inner_markup(node))
        }
        ComponentType::Row => {
            let display = match node.style("display").and_then(StyleValue::as_text) {
                Some("flex") => "flex",
                _ => "block",
            };
            set(&mut styles, "display", display);
            set(&mut styles, "width", "100%");
            set(&mut styles, "gap", value_or(node, "gap", "0"));
            element("div", node, &styles, &inner_markup(node))
        }
        ComponentType::Column => {
            if node.style("flex").is_some() {
                set(&mut styles, "display", "block");
                set(&mut styles, "verticalAlign", "unset");
                set(&mut styles, "minWidth", "0");
            } else {
                set(&mut styles, "display", "inline-block");
                set(&mut styles, "verticalAlign", "top");
                set(&mut styles, "minWidth", "200px");
            }
            set(&mut styles, "width", value_or(node, "width", "auto"));
            element("div", node, &styles, &inner_markup(node))
        }
        ComponentType::Divider => {
            let mut styles = divider_defaults();
            extend(&mut styles, &node.styles);
            set(&mut styles, "display", "block");
            set(&mut styles, "height", "0");
            element("div", node, &styles, "")
        }
        ComponentType::Spacer => {
            set(&mut styles, "display", "block");
            set(&mut styles, "width", "100%");
            set(&mut styles, "height", value_or(node, "height", "40px"));
            element("div", node, &styles, "")
        }
    }
}

/// Defaults every element starts from, overlaid with the node's own styles.
fn base_styles(node: &Component) -> StyleMap {
    let mut styles = StyleMap::new();
    set(&mut styles, "boxSizing", "border-box");
    let display = if node.component_type == ComponentType::Image {
        StyleValue::from("inline-block")
    } else {
        value_or(node, "display", "inline-block")
    };
    set(&mut styles, "display", display);
    set(&mut styles, "margin", value_or(node, "margin", "0px"));
    set(&mut styles, "maxWidth", value_or(node, "maxWidth", "100%"));
    set(&mut styles, "verticalAlign", value_or(node, "verticalAlign", "top"));
    extend(&mut styles, &node.styles);
    styles
}

fn divider_defaults() -> StyleMap {
    let mut styles = StyleMap::new();
    set(&mut styles, "boxSizing", "border-box");
    set(&mut styles, "display", "block");
    set(&mut styles, "width", "100%");
    set(&mut styles, "height", "0");
    set(&mut styles, "borderTop", "1px dotted #e5e7eb");
    set(&mut styles, "margin", "20px 0");
    styles
}

/// Children when there are any, otherwise the node's own content.
fn inner_markup(node: &Component) -> String {
    if node.children.is_empty() {
        node.content.clone()
    } else {
        generate_html(&node.children)
    }
}

fn element(tag: &str, node: &Component, styles: &StyleMap, inner: &str) -> String {
    format!(
        "<{tag} id=\"{}\" style=\"{}\">{}</{tag}>",
        escape_attribute(&node.id),
        escape_attribute(&style_declarations(styles)),
        inner,
    )
}

/// Escapes a value for use inside a double-quoted attribute.
pub fn escape_attribute(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::component::{attributes, styles, AttributeMap};
    use pretty_assertions::assert_eq;

    fn node(
        id: &str,
        component_type: ComponentType,
        content: &str,
        style: StyleMap,
        attrs: AttributeMap,
        children: Vec<Component>,
    ) -> Component {
        Component {
            id: id.to_string(),
            component_type,
            content: content.to_string(),
            styles: style,
            attributes: attrs,
            children,
        }
    }

    #[test]
    fn text_merges_defaults_then_own_styles() {
        let tree = vec![node(
            "t1",
            ComponentType::Text,
            "Hi {{name}}",
            styles([("fontSize", "16px"), ("margin", "4px")]),
            AttributeMap::new(),
            vec![],
        )];
        assert_eq!(
            generate_html(&tree),
            "<div id=\"t1\" style=\"box-sizing: border-box; display: inline-block; margin: 4px; \
             max-width: 100%; vertical-align: top; font-size: 16px\">Hi {{name}}</div>"
        );
    }

    #[test]
    fn image_is_always_inline_level() {
        let tree = vec![node(
            "i1",
            ComponentType::Image,
            "",
            styles([("display", "block"), ("width", "100%")]),
            attributes([("src", "/uploads/photo.png"), ("alt", "A \"quoted\" photo")]),
            vec![],
        )];
        let html = generate_html(&tree);
        assert!(html.starts_with("<img id=\"i1\" src=\"/uploads/photo.png\""));
        assert!(html.contains("alt=\"A &quot;quoted&quot; photo\""));
        assert!(html.contains("display: inline-block"));
        assert!(!html.contains("display: block"));
        assert!(html.contains("width: 100%"));
        assert!(html.ends_with(" />"));
    }

    #[test]
    fn button_defaults_href_and_drops_underline() {
        let tree = vec![node(
            "b1",
            ComponentType::Button,
            "Go",
            styles([("textDecoration", "underline")]),
            AttributeMap::new(),
            vec![],
        )];
        let html = generate_html(&tree);
        assert!(html.starts_with("<a id=\"b1\" href=\"#\""));
        assert!(html.contains("text-decoration: none"));
        assert!(html.contains("cursor: pointer"));
        assert!(html.ends_with(">Go</a>"));
    }

    #[test]
    fn flex_row_keeps_flex_and_columns_stack_children() {
        let text = node(
            "t1",
            ComponentType::Text,
            "left",
            StyleMap::new(),
            AttributeMap::new(),
            vec![],
        );
        let column = node(
            "c1",
            ComponentType::Column,
            "",
            styles([("flex", "1")]),
            AttributeMap::new(),
            vec![text],
        );
        let row = node(
            "r1",
            ComponentType::Row,
            "",
            styles([("display", "flex"), ("gap", "10px")]),
            AttributeMap::new(),
            vec![column],
        );
        let html = generate_html(&[row]);
        assert!(html.starts_with("<div id=\"r1\" style=\"box-sizing: border-box; display: flex;"));
        assert!(html.contains("gap: 10px"));
        assert!(html.contains("<div id=\"c1\""));
        assert!(html.contains("min-width: 0"));
        assert!(html.contains("width: auto"));
        assert!(html.contains(">left</div>"));
    }

    #[test]
    fn non_flex_row_is_block_and_fixed_columns_are_inline() {
        let column = node(
            "c1",
            ComponentType::Column,
            "",
            styles([("width", "33%")]),
            AttributeMap::new(),
            vec![],
        );
        let row = node(
            "r1",
            ComponentType::Row,
            "",
            StyleMap::new(),
            AttributeMap::new(),
            vec![column],
        );
        let html = generate_html(&[row]);
        assert!(html.contains("id=\"r1\" style=\"box-sizing: border-box; display: block;"));
        assert!(html.contains("gap: 0"));
        assert!(html.contains("min-width: 200px"));
        assert!(html.contains("width: 33%"));
        assert!(html.contains("display: inline-block"));
    }

    #[test]
    fn divider_and_spacer_defaults() {
        let tree = vec![
            node(
                "d1",
                ComponentType::Divider,
                "",
                StyleMap::new(),
                AttributeMap::new(),
                vec![],
            ),
            node(
                "s1",
                ComponentType::Spacer,
                "",
                StyleMap::new(),
                AttributeMap::new(),
                vec![],
            ),
        ];
        let html = generate_html(&tree);
        let lines: Vec<&str> = html.split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("border-top: 1px dotted #e5e7eb"));
        assert!(lines[0].contains("margin: 20px 0"));
        assert!(lines[0].contains("height: 0"));
        assert!(lines[1].contains("height: 40px"));
        assert!(lines[1].ends_with("></div>"));
    }

    #[test]
    fn empty_tree_is_empty_markup() {
        assert_eq!(generate_html(&[]), "");
    }
}
