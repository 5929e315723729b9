//! The full HTML document a message body is delivered in.

use css_inline::CSSInliner;
use std::fmt;

/// Wraps personalised content in a complete email document and inlines its styles.
///
/// The `<style>` element is kept after inlining for clients that honour it (media
/// queries cannot be inlined). If inlining fails the un-inlined document is returned.
pub fn build_email_document(content: &str, css: Option<&str>) -> String {
    let document = wrap_document(content, css);
    let inlined = inline_styles(&document);
    inlined_or_original(document, inlined)
}

fn inlined_or_original<E: fmt::Display>(document: String, inlined: Result<String, E>) -> String {
    match inlined {
        Ok(inlined) => inlined,
        Err(e) => {
            log::error!("Error inlining CSS, sending document as is: {}", e);
            document
        }
    }
}

fn inline_styles(document: &str) -> Result<String, css_inline::InlineError> {
    let inliner = CSSInliner::options().keep_style_tags(true).build();
    inliner.inline(document)
}

/// The document shell: client resets, the custom CSS and a full-width backdrop.
pub fn wrap_document(content: &str, css: Option<&str>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<meta http-equiv="X-UA-Compatible" content="IE=edge">
<title>Email Template</title>
<!--[if mso]>
<noscript>
<xml>
<o:OfficeDocumentSettings>
<o:PixelsPerInch>96</o:PixelsPerInch>
</o:OfficeDocumentSettings>
</xml>
</noscript>
<![endif]-->
<style type="text/css">
body, table, td, p, a, li, blockquote {{ -webkit-text-size-adjust: 100%; -ms-text-size-adjust: 100%; }}
table, td {{ mso-table-lspace: 0pt; mso-table-rspace: 0pt; }}
img {{ -ms-interpolation-mode: bicubic; border: 0; height: auto; line-height: 100%; outline: none; text-decoration: none; max-width: 100%; }}
table {{ border-collapse: collapse !important; }}
body {{ margin: 0 !important; padding: 0 !important; width: 100% !important; height: 100% !important; }}
body, td, p, a {{ font-family: 'Inter', Arial, sans-serif; font-size: 14px; line-height: 1.4; }}
{css}
</style>
</head>
<body style="margin: 0; padding: 0; width: 100%; height: 100%; background-color: #f8f9fa; font-family: 'Inter', Arial, sans-serif;">
<div style="width: 100%; background-color: #f8f9fa; padding: 20px 0;">
{content}
</div>
</body>
</html>"#,
        css = css.unwrap_or_default(),
        content = content,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_carries_css_and_content() {
        let doc = wrap_document("<p>Hi</p>", Some(".x { color: red; }"));
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<!--[if mso]>"));
        assert!(doc.contains(".x { color: red; }"));
        assert!(doc.contains("<p>Hi</p>"));
        assert!(!wrap_document("", None).contains("None"));
    }

    #[test]
    fn inliner_failure_keeps_the_original_document() {
        let document = wrap_document("<p>Hi</p>", Some(".x { color: red; }"));
        let result = inlined_or_original(document.clone(), Err::<String, _>("unexpected token"));
        assert_eq!(result, document);

        let result = inlined_or_original(document, Ok::<_, String>("<p>inlined</p>".into()));
        assert_eq!(result, "<p>inlined</p>");
    }

    #[test]
    fn inlines_rules_and_keeps_style_element() {
        let doc = build_email_document(
            r#"<div class="x">Hi</div>"#,
            Some(".x { color: red; }"),
        );
        assert!(doc.contains("<style"));
        assert!(doc.contains("color: red"));
        let div_start = doc.find("<div class=\"x\"").unwrap();
        let div_tag_end = div_start + doc[div_start..].find('>').unwrap();
        assert!(doc[div_start..div_tag_end].contains("color: red"));
        assert!(doc.contains(">Hi</div>"));
    }
}
