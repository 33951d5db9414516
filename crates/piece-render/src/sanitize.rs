//! HTML entity escaping of render parameters.
//!
//! Parameters are escaped once per render call, before either file is
//! executed, so both passes see identical values and the template backend can
//! run with auto-escaping turned off.
//!
//! | Character | Entity |
//! |-----------|--------|
//! | `&` | `&amp;` |
//! | `<` | `&lt;` |
//! | `>` | `&gt;` |
//! | `"` | `&quot;` |
//! | `'` | `&apos;` |
//!
//! String leaves and the keys of nested objects are escaped, so a composite
//! value printed whole (`{{ obj }}`) carries no raw markup either. Numbers,
//! booleans and null cannot carry markup and pass through unchanged, keeping
//! them usable in template logic. Top-level parameter names are not escaped;
//! they name bindings and never reach the output themselves.

use serde_json::Value;

/// Escapes the five HTML-significant characters in `input`.
///
/// ```rust
/// use piece_render::escape_html;
///
/// assert_eq!(escape_html("<b>\"Al\" & 'Bo'</b>"),
///     "&lt;b&gt;&quot;Al&quot; &amp; &apos;Bo&apos;&lt;/b&gt;");
/// ```
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escapes raw bytes, substituting U+FFFD for invalid UTF-8 sequences.
pub fn escape_html_bytes(input: &[u8]) -> String {
    escape_html(&String::from_utf8_lossy(input))
}

/// Recursively escapes every string leaf and object key of `value`.
pub fn sanitize_value(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(escape_html(&s)),
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize_value).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (escape_html(&key), sanitize_value(value)))
                .collect(),
        ),
        scalar => scalar,
    }
}
