//! Substitution-only template engine.
//!
//! This module provides [`SimpleEngine`], a lightweight engine that only
//! replaces `{{ name }}` expressions with binding values. It suits views
//! that never need loops or conditionals and should not pay for a full
//! template language.
//!
//! # Syntax
//!
//! - `{{ name }}` - Simple variable substitution
//! - `{{ user.name }}` - Nested property access via dot notation
//! - `{{ items.0 }}` - Array index access
//!
//! Anything else, including `{% ... %}` blocks, is copied through untouched.
//!
//! # Example
//!
//! ```rust
//! use piece_render::{Bindings, SimpleEngine, TemplateEngine};
//! use serde_json::json;
//!
//! let engine = SimpleEngine::new();
//! let bindings = Bindings::from_params(&json!({"user": {"email": "a@example.com"}})).unwrap();
//!
//! let output = engine.execute("t", "Contact: {{ user.email }}", &bindings).unwrap();
//! assert_eq!(output, "Contact: a@example.com");
//! ```

use serde_json::Value;

use crate::context::Bindings;
use crate::error::RenderError;

use super::TemplateEngine;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// A lightweight engine using `{{ path }}` substitution.
///
/// Unknown names render as an empty string, the same as in
/// [`MiniJinjaEngine`](super::MiniJinjaEngine).
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleEngine;

impl SimpleEngine {
    /// Creates a new SimpleEngine.
    pub fn new() -> Self {
        Self
    }

    /// Formats a JSON value as a string for output.
    fn format_value(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => String::new(),
            // For arrays and objects, use JSON representation
            Value::Array(_) | Value::Object(_) => value.to_string(),
        }
    }
}

impl TemplateEngine for SimpleEngine {
    fn execute(
        &self,
        name: &str,
        source: &str,
        bindings: &Bindings,
    ) -> Result<String, RenderError> {
        let mut capture = String::with_capacity(source.len());
        let mut rest = source;

        while let Some(start) = rest.find(OPEN) {
            capture.push_str(&rest[..start]);
            let after_open = &rest[start + OPEN.len()..];

            let end = after_open.find(CLOSE).ok_or_else(|| {
                RenderError::Template(format!(
                    "{}: unclosed expression starting at `{}`",
                    name,
                    rest[start..].chars().take(20).collect::<String>()
                ))
            })?;

            let path = after_open[..end].trim();
            if path.is_empty() {
                return Err(RenderError::Template(format!(
                    "{}: empty expression `{{{{}}}}`",
                    name
                )));
            }

            if let Some(value) = bindings.lookup(path) {
                capture.push_str(&Self::format_value(value));
            }
            rest = &after_open[end + CLOSE.len()..];
        }

        capture.push_str(rest);
        Ok(capture)
    }

    fn name(&self) -> &'static str {
        "simple"
    }
}
