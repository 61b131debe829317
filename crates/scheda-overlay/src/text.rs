//! Text processing for authored cells: escaping, paragraph collapsing,
//! warning markers and the ordered pattern substitutions loaded from the
//! configuration sheet.

use regex::{Captures, Regex};

use crate::error::{OverlayError, Result};

/// Literal marker authors drop into a cell to flag unreviewed text.
pub const WARNING_MARKER: &str = "???";

/// One compiled pattern substitution. Rules run in registration order;
/// a css class wraps every match in a styling span.
#[derive(Debug, Clone)]
pub struct TextRule {
    pub pattern: Regex,
    pub replacement: String,
    pub css_class: Option<String>,
}

impl TextRule {
    pub fn compile(pattern: &str, replacement: &str, css_class: Option<&str>) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|source| OverlayError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            pattern,
            replacement: replacement.to_string(),
            css_class: css_class.map(str::to_string),
        })
    }
}

/// Escape a raw cell value for embedding in markup. Runs before any
/// generated markup is injected, so spans and breaks survive while
/// authored angle brackets do not.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Collapse paragraph breaks to line breaks when a cell holds more than
/// one paragraph; single-paragraph cells pass through trimmed.
pub fn collapse_paragraphs(text: &str) -> String {
    let paragraphs: Vec<&str> = text
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if paragraphs.len() > 1 {
        paragraphs.join("<br/>")
    } else {
        text.trim().to_string()
    }
}

/// Wrap cells carrying the `???` marker in a visual warning treatment.
pub fn warning_wrap(text: &str) -> String {
    if text.contains(WARNING_MARKER) {
        format!("<span class=\"warning\">{text}</span>")
    } else {
        text.to_string()
    }
}

/// Apply every rule in registration order. Replacements may reference
/// capture groups (`$1`); a rule's css class wraps the expanded match.
pub fn apply_rules(text: &str, rules: &[TextRule]) -> String {
    let mut out = text.to_string();
    for rule in rules {
        out = rule
            .pattern
            .replace_all(&out, |caps: &Captures<'_>| {
                let mut expanded = String::new();
                caps.expand(&rule.replacement, &mut expanded);
                match &rule.css_class {
                    Some(class) => format!("<span class=\"{class}\">{expanded}</span>"),
                    None => expanded,
                }
            })
            .into_owned();
    }
    out
}

/// Full cell pipeline: escape, collapse paragraphs, warning treatment,
/// ordered substitutions.
pub fn render_cell(text: &str, rules: &[TextRule]) -> String {
    let escaped = escape_html(text);
    let collapsed = collapse_paragraphs(&escaped);
    let warned = warning_wrap(&collapsed);
    apply_rules(&warned, rules)
}
