//! Template engine abstraction.
//!
//! This module defines the [`TemplateEngine`] trait, the step that "executes"
//! a view or template source with the caller's bindings in scope. The default
//! implementation is [`MiniJinjaEngine`].

use minijinja::{AutoEscape, Environment, Value};

use crate::context::Bindings;
use crate::error::RenderError;

/// Executes view and template sources.
///
/// Each call gets a fresh scope holding only `bindings`; nothing carries over
/// between calls. Output is captured into a buffer owned by the call and
/// returned as a whole, so a failed execution never leaves partial output
/// behind.
///
/// Bindings arrive already HTML-escaped. Engines must insert them as-is and
/// must not escape a second time.
pub trait TemplateEngine: Send + Sync {
    /// Executes `source` with `bindings` bound as top-level variables.
    ///
    /// `name` identifies the source in error messages.
    fn execute(&self, name: &str, source: &str, bindings: &Bindings)
        -> Result<String, RenderError>;

    /// Short identifier for logs and diagnostics.
    fn name(&self) -> &'static str;
}

/// MiniJinja-based template engine.
///
/// This is the default engine, providing:
/// - `{{ name }}` and `{{ user.name }}` interpolation
/// - Loops, conditionals, macros and the built-in filters
///
/// Auto-escaping is disabled and trailing newlines are kept, so a source
/// renders byte for byte apart from its template expressions.
///
/// # Example
///
/// ```rust
/// use piece_render::{Bindings, MiniJinjaEngine, Params, TemplateEngine};
///
/// let engine = MiniJinjaEngine::new();
/// let bindings = Bindings::from_params(&Params::new().with("name", "<World>")).unwrap();
///
/// let output = engine.execute("hello", "Hello, {{ name }}!", &bindings).unwrap();
/// assert_eq!(output, "Hello, &lt;World&gt;!");
/// ```
pub struct MiniJinjaEngine {
    env: Environment<'static>,
}

impl MiniJinjaEngine {
    /// Creates a new MiniJinja engine configured for pre-escaped bindings.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_name| AutoEscape::None);
        env.set_keep_trailing_newline(true);
        register_filters(&mut env);
        Self { env }
    }

    /// Returns a reference to the underlying MiniJinja environment.
    pub fn environment(&self) -> &Environment<'static> {
        &self.env
    }

    /// Returns a mutable reference to the underlying MiniJinja environment.
    ///
    /// This allows registering custom filters, functions or globals. Globals
    /// are shadowed by parameters of the same name.
    pub fn environment_mut(&mut self) -> &mut Environment<'static> {
        &mut self.env
    }
}

impl Default for MiniJinjaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine for MiniJinjaEngine {
    fn execute(
        &self,
        name: &str,
        source: &str,
        bindings: &Bindings,
    ) -> Result<String, RenderError> {
        let ctx = Value::from_serialize(bindings);
        Ok(self.env.render_named_str(name, source, ctx)?)
    }

    fn name(&self) -> &'static str {
        "minijinja"
    }
}

fn register_filters(env: &mut Environment<'static>) {
    use minijinja::{Error, ErrorKind};

    // Parameters are escaped before execution; escaping again would
    // double-encode entities.
    env.add_filter("escape_html", |_value: Value| -> Result<String, Error> {
        Err(Error::new(
            ErrorKind::InvalidOperation,
            "parameters are already HTML-escaped; use {{ value }} directly",
        ))
    });
}
