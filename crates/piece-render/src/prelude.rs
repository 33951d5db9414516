//! Prelude for convenient imports.
//!
//! Re-exports what a typical caller needs to configure a renderer and render
//! views, in one line:
//!
//! ```rust
//! use piece_render::prelude::*;
//!
//! let renderer = ViewRenderer::with_store(
//!     Settings::new("/views", ".tpl"),
//!     MemoryStore::new(),
//! );
//! assert!(matches!(
//!     renderer.render("home", &Params::new()),
//!     Err(RenderError::NotFound { .. })
//! ));
//! ```

// Renderer and configuration
pub use crate::{Settings, ViewRenderer};

// Per-call data
pub use crate::{Params, RenderRequest};

// Stores and engines
pub use crate::{FileStore, FsStore, MemoryStore, MiniJinjaEngine, SimpleEngine, TemplateEngine};

// Output and errors
pub use crate::{BufferedResponse, OutputSink, RenderError, WriterSink};
