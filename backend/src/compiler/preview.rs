//! Standalone preview pages for the editor's desktop and mobile views.

use super::css::mobile_rules;
use super::CompiledMarkup;
use common::model::component::Component;
use common::requests::PreviewViewport;

const MOBILE_WIDTH: &str = "375px";

/// Builds a complete HTML page previewing `tree`.
///
/// The mobile variant frames the email at phone width and applies the responsive rules
/// unconditionally, so the stacked layout shows even in a wide browser window.
pub fn preview_document(tree: &[Component], viewport: PreviewViewport) -> String {
    let compiled = CompiledMarkup::compile(tree);
    let (frame_width, extra_css) = match viewport {
        PreviewViewport::Desktop => ("100%", String::new()),
        PreviewViewport::Mobile => (MOBILE_WIDTH, mobile_rules().to_string()),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Email Preview</title>
<style>
{css}
{extra_css}
.preview-frame {{ width: {frame_width}; max-width: 100%; margin: 0 auto; background-color: #f4f4f4; }}
</style>
</head>
<body>
<div class="preview-frame">
{body}
</div>
</body>
</html>"#,
        css = compiled.css,
        extra_css = extra_css,
        frame_width = frame_width,
        body = compiled.wrapped_html(),
    )
}
