//! The view renderer.
//!
//! [`ViewRenderer`] runs the whole pipeline for one view:
//!
//! 1. Resolve the view name to a file and check that it exists
//! 2. Escape the parameters once into [`Bindings`]
//! 3. Execute the view and split its output at the `@template('...');`
//!    directive
//! 4. Resolve and execute the named template with the same bindings
//! 5. Replace every `@embed;` in the template output with the view body
//!
//! ```text
//! views/home.tpl:    @template('layout');<p>Hi {{ name }}</p>
//! views/layout.tpl:  <html>@embed;</html>
//!
//! render("home", {name: "<b>Al</b>")
//!   -> <html><p>Hi &lt;b&gt;Al&lt;/b&gt;</p></html>
//! ```
//!
//! The renderer keeps no per-call state. One instance can serve concurrent
//! requests from several threads.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::context::{Bindings, RenderRequest};
use crate::error::{FileKind, RenderError};
use crate::grammar::{parse_view, splice_body};
use crate::output::OutputSink;
use crate::settings::Settings;
use crate::store::{FileStore, FsStore};
use crate::template::{MiniJinjaEngine, TemplateEngine};

/// The result of a successful render, with the files that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedOutput {
    /// Final markup.
    pub html: String,
    /// Resolved path of the view file.
    pub view_path: PathBuf,
    /// Template name as written in the view's directive.
    pub template_ref: String,
    /// Resolved path of the template file.
    pub template_path: PathBuf,
}

/// Renders views into their templates.
///
/// # Example
///
/// ```rust
/// use piece_render::{MemoryStore, Params, Settings, ViewRenderer};
///
/// let store = MemoryStore::new()
///     .with_file("/views/home.tpl", "@template('layout');<p>Hi {{ name }}</p>")
///     .with_file("/views/layout.tpl", "<html>@embed;</html>");
///
/// let renderer = ViewRenderer::with_store(Settings::new("/views", ".tpl"), store);
/// let html = renderer
///     .render("home", &Params::new().with("name", "<b>Al</b>"))
///     .unwrap();
///
/// assert_eq!(html, "<html><p>Hi &lt;b&gt;Al&lt;/b&gt;</p></html>");
/// ```
pub struct ViewRenderer {
    settings: Settings,
    store: Box<dyn FileStore>,
    engine: Box<dyn TemplateEngine>,
}

impl ViewRenderer {
    /// Creates a renderer reading from disk with the MiniJinja engine.
    pub fn new(settings: Settings) -> Self {
        Self::with_store(settings, FsStore::new())
    }

    /// Creates a renderer over a custom file store.
    pub fn with_store(settings: Settings, store: impl FileStore + 'static) -> Self {
        Self {
            settings,
            store: Box::new(store),
            engine: Box::new(MiniJinjaEngine::new()),
        }
    }

    /// Creates a disk-backed renderer from a host application's settings map.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Config`] if `viewsFolder` or `fileExtension`
    /// is missing.
    pub fn from_config(config: &HashMap<String, String>) -> Result<Self, RenderError> {
        Ok(Self::new(Settings::from_map(config)?))
    }

    /// Replaces the template engine.
    pub fn with_engine(mut self, engine: impl TemplateEngine + 'static) -> Self {
        self.engine = Box::new(engine);
        self
    }

    /// The settings this renderer was created with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The active template engine.
    pub fn engine(&self) -> &dyn TemplateEngine {
        self.engine.as_ref()
    }

    /// Renders `view` with `params` and returns the final markup.
    ///
    /// `params` may be any value that serializes to a map (a struct,
    /// [`Params`](crate::Params), a `HashMap`, `serde_json::json!({...})`) or
    /// `()` for none.
    ///
    /// # Errors
    ///
    /// - [`RenderError::InvalidInput`]: view name that is empty or only
    ///   whitespace, non-map params or a reserved parameter name
    /// - [`RenderError::NotFound`]: view or template file missing
    /// - [`RenderError::Parse`]: view output has no `@template` directive
    /// - [`RenderError::Render`]: the spliced output is empty or exactly `"0"`
    /// - [`RenderError::Template`] / [`RenderError::Io`]: executing or reading
    ///   a file failed
    pub fn render<P: Serialize + ?Sized>(
        &self,
        view: &str,
        params: &P,
    ) -> Result<String, RenderError> {
        Ok(self.render_view(view, params)?.html)
    }

    /// Renders `view` and also reports which files were used.
    pub fn render_view<P: Serialize + ?Sized>(
        &self,
        view: &str,
        params: &P,
    ) -> Result<RenderedOutput, RenderError> {
        if view.trim().is_empty() {
            return Err(RenderError::InvalidInput(
                "view name must contain a non-whitespace character".to_string(),
            ));
        }

        let view_path = self.locate(FileKind::View, view)?;
        let bindings = Bindings::from_params(params)?;

        let view_output = self.execute(&view_path, &bindings)?;
        let parsed = parse_view(&view_output).ok_or_else(|| {
            RenderError::Parse(format!(
                "{} has no @template('<name>'); directive",
                view_path.display()
            ))
        })?;
        tracing::trace!(
            view = %view,
            template = %parsed.template_ref,
            body_len = parsed.body.len(),
            "parsed view"
        );

        let template_path = self.locate(FileKind::Template, &parsed.template_ref)?;
        let template_output = self.execute(&template_path, &bindings)?;
        let html = splice_body(&template_output, &parsed.body)?;

        tracing::debug!(
            view = %view,
            template = %parsed.template_ref,
            bytes = html.len(),
            "rendered view"
        );

        Ok(RenderedOutput {
            html,
            view_path,
            template_ref: parsed.template_ref,
            template_path,
        })
    }

    /// Renders a [`RenderRequest`].
    pub fn render_request(&self, request: &RenderRequest) -> Result<String, RenderError> {
        self.render(&request.view_name, &request.params)
    }

    /// Renders a request and hands the markup and status to `sink`.
    ///
    /// Nothing reaches the sink when rendering fails.
    pub fn render_to(
        &self,
        request: &RenderRequest,
        sink: &mut dyn OutputSink,
    ) -> Result<(), RenderError> {
        let html = self.render_request(request)?;
        sink.write_response(request.status_code, &html)
    }

    /// Resolves a name and checks that the file exists.
    fn locate(&self, kind: FileKind, name: &str) -> Result<PathBuf, RenderError> {
        let path = self.settings.resolve(name);
        if !self.store.exists(&path) {
            tracing::debug!(%kind, name, path = %path.display(), "file not found");
            return Err(RenderError::not_found(kind, path));
        }
        tracing::trace!(%kind, name, path = %path.display(), "resolved file");
        Ok(path)
    }

    /// Reads a file and executes it with `bindings` in scope.
    fn execute(&self, path: &Path, bindings: &Bindings) -> Result<String, RenderError> {
        let source = self.store.read(path)?;
        let name = path.to_string_lossy();
        self.engine.execute(&name, &source, bindings)
    }
}

impl std::fmt::Debug for ViewRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewRenderer")
            .field("settings", &self.settings)
            .field("engine", &self.engine.name())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Params;
    use crate::output::BufferedResponse;
    use crate::store::MemoryStore;
    use crate::template::SimpleEngine;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn renderer(files: &[(&str, &str)]) -> ViewRenderer {
        let store = files
            .iter()
            .fold(MemoryStore::new(), |store, (path, content)| {
                store.with_file(*path, *content)
            });
        ViewRenderer::with_store(Settings::new("/views", ".tpl"), store)
    }

    /// Counts reads so tests can check that nothing was executed.
    struct CountingStore {
        inner: MemoryStore,
        reads: Arc<AtomicUsize>,
    }

    impl FileStore for CountingStore {
        fn exists(&self, path: &Path) -> bool {
            self.inner.exists(path)
        }

        fn read(&self, path: &Path) -> Result<String, RenderError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.read(path)
        }
    }

    #[test]
    fn test_render_example_page() {
        let r = renderer(&[
            ("/views/home.tpl", "@template('layout.tpl');<p>Hi {{name}}</p>"),
            ("/views/layout.tpl", "<html>@embed;</html>"),
        ]);
        let html = r.render("home", &json!({"name": "<b>Al</b>"})).unwrap();
        assert_eq!(html, "<html><p>Hi &lt;b&gt;Al&lt;/b&gt;</p></html>");
    }

    #[test]
    fn test_render_template_sees_params() {
        let r = renderer(&[
            ("/views/home.tpl", "@template('layout');body"),
            ("/views/layout.tpl", "<title>{{ title }}</title>@embed;"),
        ]);
        let html = r
            .render("home", &Params::new().with("title", "Tom & Jerry"))
            .unwrap();
        assert_eq!(html, "<title>Tom &amp; Jerry</title>body");
    }

    #[test]
    fn test_render_view_reports_paths() {
        let r = renderer(&[
            ("/views/pages/home.tpl", "@template('layouts/base');x"),
            ("/views/layouts/base.tpl", "@embed;"),
        ]);
        let out = r.render_view("/pages/home", &()).unwrap();
        assert_eq!(out.html, "x");
        assert_eq!(out.view_path, PathBuf::from("/views/pages/home.tpl"));
        assert_eq!(out.template_ref, "layouts/base");
        assert_eq!(out.template_path, PathBuf::from("/views/layouts/base.tpl"));
    }

    #[test]
    fn test_render_blank_view_name() {
        let r = renderer(&[]);
        for name in ["", "  ", "\t\n"] {
            assert!(matches!(
                r.render(name, &()),
                Err(RenderError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_render_missing_view_executes_nothing() {
        let reads = Arc::new(AtomicUsize::new(0));
        let store = CountingStore {
            inner: MemoryStore::new().with_file("/views/layout.tpl", "@embed;"),
            reads: Arc::clone(&reads),
        };
        let r = ViewRenderer::with_store(Settings::new("/views", ".tpl"), store);

        let err = r.render("missing", &()).unwrap_err();
        assert!(matches!(
            err,
            RenderError::NotFound {
                kind: FileKind::View,
                ..
            }
        ));
        assert_eq!(reads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_render_missing_template() {
        let r = renderer(&[("/views/home.tpl", "@template('nowhere');x")]);
        let err = r.render("home", &()).unwrap_err();
        match err {
            RenderError::NotFound { kind, path } => {
                assert_eq!(kind, FileKind::Template);
                assert_eq!(path, PathBuf::from("/views/nowhere.tpl"));
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_render_view_without_directive() {
        let r = renderer(&[("/views/home.tpl", "<p>no layout</p>")]);
        assert!(matches!(r.render("home", &()), Err(RenderError::Parse(_))));
    }

    #[test]
    fn test_render_directive_produced_by_view_logic() {
        let r = renderer(&[
            (
                "/views/home.tpl",
                "@template('{{ layout }}');<p>x</p>",
            ),
            ("/views/admin.tpl", "<admin>@embed;</admin>"),
        ]);
        let html = r.render("home", &json!({"layout": "admin"})).unwrap();
        assert_eq!(html, "<admin><p>x</p></admin>");
    }

    #[test]
    fn test_render_template_without_marker_and_empty_body() {
        let r = renderer(&[
            ("/views/home.tpl", "@template('static');"),
            ("/views/static.tpl", "<p>{{ n }} static</p>"),
        ]);
        assert_eq!(r.render("home", &json!({"n": 1})).unwrap(), "<p>1 static</p>");
    }

    #[test]
    fn test_render_empty_template_output_is_error() {
        let r = renderer(&[
            ("/views/home.tpl", "@template('empty');"),
            ("/views/empty.tpl", "{% if false %}x{% endif %}"),
        ]);
        assert!(matches!(r.render("home", &()), Err(RenderError::Render(_))));
    }

    #[test]
    fn test_render_rejects_non_map_params() {
        let r = renderer(&[
            ("/views/home.tpl", "@template('layout');x"),
            ("/views/layout.tpl", "@embed;"),
        ]);
        assert!(matches!(
            r.render("home", &"just a string"),
            Err(RenderError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_render_rejects_reserved_param() {
        let r = renderer(&[
            ("/views/home.tpl", "@template('layout');x"),
            ("/views/layout.tpl", "@embed;"),
        ]);
        assert!(matches!(
            r.render("home", &json!({"loop": 1})),
            Err(RenderError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_render_with_simple_engine() {
        let r = renderer(&[
            ("/views/home.tpl", "@template('layout');Hi {{ user.name }}"),
            ("/views/layout.tpl", "<main>@embed;</main>"),
        ])
        .with_engine(SimpleEngine::new());
        let html = r
            .render("home", &json!({"user": {"name": "O'Neil"}}))
            .unwrap();
        assert_eq!(html, "<main>Hi O&apos;Neil</main>");
    }

    #[test]
    fn test_render_to_sink_applies_status() {
        let r = renderer(&[
            ("/views/404.tpl", "@template('layout');gone"),
            ("/views/layout.tpl", "<p>@embed;</p>"),
        ]);
        let mut response = BufferedResponse::new();
        let request = RenderRequest::new("404").with_status(404);
        r.render_to(&request, &mut response).unwrap();
        assert_eq!(response.status, 404);
        assert_eq!(response.body, "<p>gone</p>");
    }

    #[test]
    fn test_render_to_sink_untouched_on_error() {
        let r = renderer(&[]);
        let mut response = BufferedResponse::new();
        let result = r.render_to(&RenderRequest::new("nope").with_status(500), &mut response);
        assert!(result.is_err());
        assert_eq!(response, BufferedResponse::new());
    }

    #[test]
    fn test_from_config_missing_key() {
        let mut config = HashMap::new();
        config.insert("viewsFolder".to_string(), "/views".to_string());
        let err = ViewRenderer::from_config(&config).unwrap_err();
        assert!(matches!(err, RenderError::Config(_)));
        assert!(err.to_string().contains("fileExtension"));
    }

    #[test]
    fn test_renderer_is_shareable_across_threads() {
        let r = Arc::new(renderer(&[
            ("/views/home.tpl", "@template('layout');{{ n }}"),
            ("/views/layout.tpl", "[@embed;]"),
        ]));

        let handles: Vec<_> = (0..4)
            .map(|n| {
                let r = Arc::clone(&r);
                std::thread::spawn(move || r.render("home", &json!({"n": n})).unwrap())
            })
            .collect();

        let outputs: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(outputs, vec!["[0]", "[1]", "[2]", "[3]"]);
    }
}
