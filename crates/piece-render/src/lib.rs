//! # Piece Render - Views Rendered Into Layouts
//!
//! `piece-render` turns a view name and a set of parameters into markup. A
//! view names its layout with a directive at the top; the layout marks where
//! the view goes.
//!
//! ```text
//! views/home.tpl
//! ─────────────────────────────────────────────
//! @template('layout');
//! <h1>{{ title }}</h1>
//!
//! views/layout.tpl
//! ─────────────────────────────────────────────
//! <html><body>@embed;</body></html>
//! ```
//!
//! ## Core Concepts
//!
//! - [`ViewRenderer`]: runs the view pass, the directive split, the template
//!   pass and the embed splice
//! - [`Settings`]: views folder and file extension, validated once
//! - [`FileStore`]: where sources come from ([`FsStore`], [`MemoryStore`])
//! - [`TemplateEngine`]: executes a source with bindings
//!   ([`MiniJinjaEngine`], [`SimpleEngine`])
//! - [`Bindings`]: parameters after HTML escaping, shared by both passes
//! - [`OutputSink`]: optional delivery of the result with a status code
//!
//! ## Quick Start
//!
//! ```rust
//! use piece_render::{MemoryStore, Params, Settings, ViewRenderer};
//!
//! let store = MemoryStore::new()
//!     .with_file("/views/home.tpl", "@template('layout');\n<h1>{{ title }}</h1>")
//!     .with_file("/views/layout.tpl", "<html><body>@embed;</body></html>");
//!
//! let renderer = ViewRenderer::with_store(Settings::new("/views", ".tpl"), store);
//! let html = renderer
//!     .render("home", &Params::new().with("title", "Fish & Chips"))
//!     .unwrap();
//!
//! assert_eq!(html, "<html><body><h1>Fish &amp; Chips</h1></body></html>");
//! ```
//!
//! ## Escaping
//!
//! Every string parameter is HTML-escaped (`& < > " '`) once, before the view
//! runs. Templates therefore interpolate with plain `{{ value }}` and the
//! engines never escape again.
//!
//! ## Errors
//!
//! All operations return [`RenderError`]. A failure anywhere aborts the
//! render; there is no partial output.

pub mod context;
mod error;
pub mod grammar;
pub mod output;
pub mod prelude;
mod renderer;
pub mod sanitize;
pub mod settings;
pub mod store;
pub mod template;

// Error type
pub use error::{FileKind, RenderError};

// Per-call data
pub use context::{Bindings, Params, RenderRequest, RESERVED_BINDINGS};

// Grammar
pub use grammar::{parse_view, splice_body, ParsedView, EMBED_MARKER};

// Escaping
pub use sanitize::{escape_html, escape_html_bytes, sanitize_value};

// Settings
pub use settings::{Settings, SettingsError, FILE_EXTENSION_KEY, VIEWS_FOLDER_KEY};

// File stores
pub use store::{FileStore, FsStore, MemoryStore};

// Template engines
pub use template::{MiniJinjaEngine, SimpleEngine, TemplateEngine};

// Output sinks
pub use output::{BufferedResponse, OutputSink, WriterSink, DEFAULT_STATUS};

// Renderer
pub use renderer::{RenderedOutput, ViewRenderer};
