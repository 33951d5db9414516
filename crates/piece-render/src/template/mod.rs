//! Execution of view and template sources.
//!
//! Rendering a view runs two sources through the same engine: first the view,
//! then the layout it names. Both see the same sanitized bindings.
//!
//! ## Engines
//!
//! | Engine | Syntax | Use When |
//! |--------|--------|----------|
//! | [`MiniJinjaEngine`] | Full Jinja: `{{ x }}`, `{% for %}`, filters | Default |
//! | [`SimpleEngine`] | `{{ x }}` / `{{ a.b }}` substitution only | Views with no logic |
//!
//! Neither engine escapes output; bindings are escaped before execution.
//! Custom backends implement [`TemplateEngine`] and are passed to
//! [`ViewRenderer::with_engine`](crate::ViewRenderer::with_engine).

mod engine;
mod simple;

pub use engine::{MiniJinjaEngine, TemplateEngine};
pub use simple::SimpleEngine;
