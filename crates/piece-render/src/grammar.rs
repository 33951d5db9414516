//! The view directive grammar and the embed splice.
//!
//! Views and templates share exactly two markers:
//!
//! | Marker | Appears in | Meaning |
//! |--------|-----------|---------|
//! | `@template('<ref>');` | view | names the layout this view renders into |
//! | `@embed;` | template | where the view body is inserted |
//!
//! `<ref>` is restricted to ASCII letters, `.` and `/`. Digits, underscores
//! and backslashes are not accepted; existing view files depend on that.
//!
//! Whitespace directly after the directive belongs to the directive. The
//! body is everything after it, taken literally up to the end of the view
//! output. Text before the directive is dropped.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::RenderError;

/// The literal a template uses to mark where the view body goes.
pub const EMBED_MARKER: &str = "@embed;";

// Whitespace class limited to the ASCII set views have always used.
static TEMPLATE_DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"@template\('([a-zA-Z./]+)'\);[\t\n\x0B\x0C\r ]*")
        .expect("template directive pattern is valid")
});

/// A view's output split into its layout reference and its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedView {
    /// The layout name from the `@template` directive, never empty.
    pub template_ref: String,
    /// Everything after the directive, possibly empty.
    pub body: String,
}

/// Splits executed view output at its first `@template('...');` directive.
///
/// Returns `None` when the content has no valid directive; every view must
/// name a template.
///
/// ```rust
/// use piece_render::parse_view;
///
/// let parsed = parse_view("@template('layout');\n<p>Hi</p>").unwrap();
/// assert_eq!(parsed.template_ref, "layout");
/// assert_eq!(parsed.body, "<p>Hi</p>");
/// ```
pub fn parse_view(content: &str) -> Option<ParsedView> {
    let captures = TEMPLATE_DIRECTIVE.captures(content)?;
    let directive = captures.get(0)?;
    let template_ref = captures.get(1)?.as_str();

    Some(ParsedView {
        template_ref: template_ref.to_string(),
        body: content[directive.end()..].to_string(),
    })
}

/// Replaces every [`EMBED_MARKER`] in `template` with `body`.
///
/// The body is inserted verbatim. A template without markers comes back
/// unchanged.
///
/// # Errors
///
/// Returns [`RenderError::Render`] when the result is empty or is exactly
/// `"0"`. Either means the page carries no usable markup.
pub fn splice_body(template: &str, body: &str) -> Result<String, RenderError> {
    let html = template.replace(EMBED_MARKER, body);
    if is_blank_page(&html) {
        return Err(RenderError::Render(format!(
            "template produced no usable output after embedding the view body (got {:?})",
            html
        )));
    }
    Ok(html)
}

fn is_blank_page(html: &str) -> bool {
    html.is_empty() || html == "0"
}
