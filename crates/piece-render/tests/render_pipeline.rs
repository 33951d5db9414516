//! End-to-end rendering against views on disk.
//!
//! Each test writes a small views folder into a temp directory and renders
//! through the default filesystem store and MiniJinja engine.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use piece_render::{
    FileKind, Params, RenderError, RenderRequest, Settings, SimpleEngine, ViewRenderer,
    WriterSink,
};
use serde::Serialize;
use tempfile::TempDir;

fn views(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, content) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
    dir
}

fn renderer_for(dir: &Path) -> ViewRenderer {
    ViewRenderer::new(Settings::new(dir, ".tpl"))
}

// ============================================================================
// The documented example
// ============================================================================

#[test]
fn example_page_renders_escaped_name() {
    let dir = views(&[
        ("home.tpl", "@template('layout.tpl');<p>Hi {{name}}</p>"),
        ("layout.tpl", "<html>@embed;</html>"),
    ]);

    let html = renderer_for(dir.path())
        .render("home", &Params::new().with("name", "<b>Al</b>"))
        .unwrap();

    assert_eq!(html, "<html><p>Hi &lt;b&gt;Al&lt;/b&gt;</p></html>");
}

#[test]
fn trailing_separator_in_views_folder_is_normalized() {
    let dir = views(&[
        ("home.tpl", "@template('layout');x"),
        ("layout.tpl", "<p>@embed;</p>"),
    ]);
    let folder = format!("{}//", dir.path().display());

    let html = ViewRenderer::new(Settings::new(folder, ".tpl"))
        .render("home", &())
        .unwrap();
    assert_eq!(html, "<p>x</p>");
}

#[cfg(unix)]
#[test]
fn non_utf8_views_folder_is_resolved_byte_for_byte() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let root = tempfile::tempdir().unwrap();
    let folder = root.path().join(OsStr::from_bytes(b"v\xFFs"));
    fs::create_dir(&folder).unwrap();
    fs::write(folder.join("home.tpl"), "@template('layout');x").unwrap();
    fs::write(folder.join("layout.tpl"), "<p>@embed;</p>").unwrap();

    let html = renderer_for(&folder).render("home", &()).unwrap();
    assert_eq!(html, "<p>x</p>");
}

// ============================================================================
// A realistic page: nested views, struct params, loops in both passes
// ============================================================================

#[derive(Serialize)]
struct Inbox {
    user: User,
    messages: Vec<Message>,
    unread: usize,
}

#[derive(Serialize)]
struct User {
    name: String,
}

#[derive(Serialize)]
struct Message {
    sender: String,
    subject: String,
}

#[test]
fn struct_params_flow_into_view_and_template() {
    let dir = views(&[
        (
            "mail/inbox.tpl",
            "@template('layouts/app');\n\
             <ul>\n\
             {% for m in messages %}<li>{{ m.sender }}: {{ m.subject }}</li>\n\
             {% endfor %}</ul>\n",
        ),
        (
            "layouts/app.tpl",
            "<header>{{ user.name }} ({{ unread }})</header>\n@embed;<footer/>\n",
        ),
    ]);

    let data = Inbox {
        user: User {
            name: "Ann \"A\"".into(),
        },
        messages: vec![
            Message {
                sender: "bob@example.com".into(),
                subject: "Q&A".into(),
            },
            Message {
                sender: "eve".into(),
                subject: "<script>".into(),
            },
        ],
        unread: 2,
    };

    let html = renderer_for(dir.path()).render("mail/inbox", &data).unwrap();

    assert_eq!(
        html,
        "<header>Ann &quot;A&quot; (2)</header>\n\
         <ul>\n\
         <li>bob@example.com: Q&amp;A</li>\n\
         <li>eve: &lt;script&gt;</li>\n\
         </ul>\n\
         <footer/>\n"
    );
}

#[test]
fn hashmap_params_are_accepted() {
    let dir = views(&[
        ("home.tpl", "@template('layout');{{ greeting }}"),
        ("layout.tpl", "@embed;"),
    ]);
    let mut params = HashMap::new();
    params.insert("greeting", "it's");

    let html = renderer_for(dir.path()).render("home", &params).unwrap();
    assert_eq!(html, "it&apos;s");
}

#[test]
fn simple_engine_renders_from_disk() {
    let dir = views(&[
        ("home.tpl", "@template('layout');Hello {{ who }}"),
        ("layout.tpl", "<b>@embed;</b>"),
    ]);

    let html = renderer_for(dir.path())
        .with_engine(SimpleEngine::new())
        .render("home", &Params::new().with("who", "A&B"))
        .unwrap();
    assert_eq!(html, "<b>Hello A&amp;B</b>");
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn missing_view_is_not_found() {
    let dir = views(&[("layout.tpl", "@embed;")]);

    let err = renderer_for(dir.path()).render("ghost", &()).unwrap_err();
    match err {
        RenderError::NotFound { kind, path } => {
            assert_eq!(kind, FileKind::View);
            assert!(path.ends_with("ghost.tpl"));
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn missing_template_is_not_found() {
    let dir = views(&[("home.tpl", "@template('gone');x")]);

    let err = renderer_for(dir.path()).render("home", &()).unwrap_err();
    assert!(matches!(
        err,
        RenderError::NotFound {
            kind: FileKind::Template,
            ..
        }
    ));
}

#[test]
fn view_without_directive_is_parse_error() {
    let dir = views(&[("home.tpl", "<p>I forgot my layout</p>")]);

    let err = renderer_for(dir.path()).render("home", &()).unwrap_err();
    assert!(matches!(err, RenderError::Parse(_)));
    assert!(err.to_string().contains("home.tpl"));
}

#[test]
fn view_syntax_error_is_template_error() {
    let dir = views(&[("home.tpl", "@template('layout');{% for %}")]);

    let err = renderer_for(dir.path()).render("home", &()).unwrap_err();
    assert!(matches!(err, RenderError::Template(_)));
}

#[test]
fn page_rendering_to_zero_is_render_error() {
    let dir = views(&[
        ("home.tpl", "@template('layout');0"),
        ("layout.tpl", "@embed;"),
    ]);

    let err = renderer_for(dir.path()).render("home", &()).unwrap_err();
    assert!(matches!(err, RenderError::Render(_)));
}

#[test]
fn directory_named_like_view_is_not_found() {
    let dir = views(&[("layout.tpl", "@embed;")]);
    fs::create_dir(dir.path().join("folder.tpl")).unwrap();

    let err = renderer_for(dir.path()).render("folder", &()).unwrap_err();
    assert!(matches!(err, RenderError::NotFound { .. }));
}

// ============================================================================
// Properties of the pipeline
// ============================================================================

#[test]
fn template_without_marker_is_returned_unchanged() {
    let dir = views(&[
        ("home.tpl", "@template('plain');"),
        ("plain.tpl", "<p>{{ x }} only</p>\n"),
    ]);

    let html = renderer_for(dir.path())
        .render("home", &Params::new().with("x", 7))
        .unwrap();
    assert_eq!(html, "<p>7 only</p>\n");
}

#[test]
fn rendering_twice_is_byte_identical() {
    let dir = views(&[
        ("home.tpl", "@template('layout');{% for i in range(3) %}{{ i }}{% endfor %} {{ v }}"),
        ("layout.tpl", "<div>@embed;</div><div>@embed;</div>"),
    ]);
    let renderer = renderer_for(dir.path());
    let params = Params::new().with("v", "<&>");

    let first = renderer.render("home", &params).unwrap();
    let second = renderer.render("home", &params).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, "<div>012 &lt;&amp;&gt;</div><div>012 &lt;&amp;&gt;</div>");
}

#[test]
fn edits_on_disk_are_picked_up() {
    let dir = views(&[
        ("home.tpl", "@template('layout');v1"),
        ("layout.tpl", "@embed;"),
    ]);
    let renderer = renderer_for(dir.path());
    assert_eq!(renderer.render("home", &()).unwrap(), "v1");

    fs::write(dir.path().join("home.tpl"), "@template('layout');v2").unwrap();
    assert_eq!(renderer.render("home", &()).unwrap(), "v2");
}

#[test]
fn render_to_writer_with_cgi_headers() {
    let dir = views(&[
        ("missing.tpl", "@template('layout');Nothing here"),
        ("layout.tpl", "<p>@embed;</p>"),
    ]);
    let request = RenderRequest::new("missing").with_status(404);
    let mut sink = WriterSink::with_headers(Vec::new());

    renderer_for(dir.path())
        .render_to(&request, &mut sink)
        .unwrap();

    let out = String::from_utf8(sink.into_inner()).unwrap();
    assert_eq!(
        out,
        "Status: 404\r\nContent-Type: text/html; charset=UTF-8\r\n\r\n<p>Nothing here</p>"
    );
}

#[test]
fn settings_file_drives_renderer() {
    let dir = views(&[
        ("site/views/home.html", "@template('base');<h1>{{ t }}</h1>"),
        ("site/views/base.html", "<body>@embed;</body>"),
        (
            "site/piece.yaml",
            "viewsFolder: views/\nfileExtension: .html\n",
        ),
    ]);

    let settings = Settings::from_file(dir.path().join("site/piece.yaml")).unwrap();
    let html = ViewRenderer::new(settings)
        .render("home", &Params::new().with("t", "Hi"))
        .unwrap();
    assert_eq!(html, "<body><h1>Hi</h1></body>");
}
