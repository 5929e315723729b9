//! Strips editor-only artefacts from markup before it is mailed.

use regex::Regex;
use std::sync::LazyLock;

/// Attribute patterns removed outright, applied in order.
static EDITOR_ATTRIBUTES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r#"data-gjs-[^=]*="[^"]*""#,
        r#"class="[^"]*gjs[^"]*""#,
        r#"draggable="[^"]*""#,
        r#"contenteditable="[^"]*""#,
        r#"spellcheck="[^"]*""#,
        r#"\s+class="""#,
        r#"\s+style="""#,
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("editor attribute pattern is valid"))
    .collect()
});

static WHITESPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("whitespace pattern is valid"));

/// Removes editor attributes, empty `class`/`style` attributes and runs of whitespace.
///
/// Idempotent: cleaning already-clean markup returns it unchanged. A removal can splice
/// text into a new match for a pattern that already ran, so the patterns are applied
/// until the markup stops changing.
pub fn clean_html_for_email(html: &str) -> String {
    let mut cleaned = html.to_string();
    loop {
        let next = strip_editor_attributes(&cleaned);
        if next == cleaned {
            break;
        }
        cleaned = next;
    }
    WHITESPACE_RUNS
        .replace_all(&cleaned, " ")
        .trim()
        .to_string()
}

fn strip_editor_attributes(html: &str) -> String {
    EDITOR_ATTRIBUTES
        .iter()
        .fold(html.to_string(), |acc, pattern| {
            pattern.replace_all(&acc, "").into_owned()
        })
}
