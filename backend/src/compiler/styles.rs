//! Style-map helpers shared by the markup emitter.

use common::model::component::{Component, StyleMap, StyleValue};

/// Converts a camelCase property name to its CSS form (`fontSize` -> `font-size`).
///
/// Every uppercase letter becomes `-` plus its lowercase form, so vendor keys such as
/// `WebkitTextSizeAdjust` come out as `-webkit-text-size-adjust`.
pub fn css_property_name(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Serializes a style map as an inline declaration list: `k: v; k: v`.
pub fn style_declarations(styles: &StyleMap) -> String {
    styles
        .iter()
        .map(|(key, value)| format!("{}: {}", css_property_name(key), value))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Sets `key` to `value`. An existing key keeps its position.
pub fn set(styles: &mut StyleMap, key: &str, value: impl Into<StyleValue>) {
    styles.insert(key.to_string(), value.into());
}

/// The node's value for `key`, or `default`.
pub fn value_or(node: &Component, key: &str, default: &str) -> StyleValue {
    node.style(key)
        .cloned()
        .unwrap_or_else(|| StyleValue::from(default))
}

/// Copies every entry of `overrides` into `styles`, later keys winning.
pub fn extend(styles: &mut StyleMap, overrides: &StyleMap) {
    for (key, value) in overrides {
        styles.insert(key.clone(), value.clone());
    }
}
