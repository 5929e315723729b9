//! The companion style sheet saved next to every compiled template.
//!
//! It does not depend on the tree. The desktop part carries client resets and the
//! 600px container. The `max-width: 600px` media block targets the inline styles the
//! emitter writes, through attribute selectors, and collapses multi-column layouts into
//! a single column on small screens.

/// Client resets and the centred email container.
const BASE_RULES: &str = r#"body, table, td, a { -webkit-text-size-adjust: 100%; -ms-text-size-adjust: 100%; }
table, td { mso-table-lspace: 0pt; mso-table-rspace: 0pt; }
img { -ms-interpolation-mode: bicubic; border: 0; height: auto; line-height: 100%; outline: none; text-decoration: none; max-width: 100%; }
table { border-collapse: collapse !important; }
body { margin: 0 !important; padding: 0 !important; width: 100% !important; min-width: 100% !important; font-family: Arial, Helvetica, sans-serif; }
.email-container { max-width: 600px; margin: 0 auto; background-color: #ffffff; font-family: Arial, Helvetica, sans-serif; }
div[style*="display: inline-block"] { vertical-align: top; }"#;

/// Single-column stacking for narrow viewports.
const MOBILE_RULES: &str = r#"div[style*="display: flex"] { display: block !important; width: 100% !important; }
div[style*="flex:"] { display: block !important; width: 100% !important; max-width: 100% !important; min-width: 0 !important; margin-bottom: 10px !important; }
div[style*="display: inline-block"] { display: block !important; width: 100% !important; max-width: 100% !important; min-width: 0 !important; }
a[style*="display: inline-block"] { display: inline-block !important; width: auto !important; }
img { width: 100% !important; max-width: 100% !important; height: auto !important; }
div[style*="width:"][style*="px"] { max-width: 100% !important; }
div[style*="font-size: 48px"] { font-size: 32px !important; }
div[style*="font-size: 40px"] { font-size: 28px !important; }
div[style*="font-size: 36px"] { font-size: 26px !important; }
div[style*="font-size: 32px"] { font-size: 24px !important; }
div[style*="font-size: 28px"] { font-size: 22px !important; }
div[style*="font-size: 24px"] { font-size: 20px !important; }
div[style*="padding: 40px"] { padding: 20px !important; }
div[style*="padding: 30px"] { padding: 15px !important; }
div[style*="padding: 20px"] { padding: 12px !important; }
div[style*="margin: 20px 0"] { margin: 12px 0 !important; }
a, button { min-height: 44px; min-width: 44px; }"#;

/// The full style sheet: resets, container and the responsive block.
pub fn generate_css() -> String {
    format!(
        "{}\n@media only screen and (max-width: 600px) {{\n{}\n}}",
        BASE_RULES,
        indent(MOBILE_RULES)
    )
}

/// The responsive rules without their media query, applied unconditionally by the mobile
/// preview.
pub fn mobile_rules() -> &'static str {
    MOBILE_RULES
}

fn indent(rules: &str) -> String {
    rules
        .lines()
        .map(|line| format!("  {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_sheet_is_constant() {
        assert_eq!(generate_css(), generate_css());
    }

    #[test]
    fn contains_container_and_responsive_block() {
        let css = generate_css();
        assert!(css.contains(".email-container { max-width: 600px; margin: 0 auto;"));
        assert!(css.contains("@media only screen and (max-width: 600px) {"));
        assert!(css.contains("  a, button { min-height: 44px; min-width: 44px; }"));
        assert!(css.trim_end().ends_with('}'));
    }

    #[test]
    fn font_steps_only_shrink() {
        for line in mobile_rules().lines().filter(|l| l.contains("font-size: ")) {
            let sizes: Vec<u32> = line
                .match_indices("font-size: ")
                .filter_map(|(i, _)| {
                    line[i + 11..]
                        .split("px")
                        .next()
                        .and_then(|n| n.parse().ok())
                })
                .collect();
            assert_eq!(sizes.len(), 2, "{}", line);
            assert!(sizes[1] < sizes[0], "{}", line);
        }
    }
}
