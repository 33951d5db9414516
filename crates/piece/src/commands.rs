//! Command implementations.

use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use piece_render::{
    MiniJinjaEngine, Params, RenderRequest, Settings, SimpleEngine, ViewRenderer, WriterSink,
};

use crate::{EngineChoice, ViewArgs};

/// Renders a view and writes the markup (and optionally CGI headers) to `out`.
pub fn render(
    config: &Path,
    input: &ViewArgs,
    status: Option<u16>,
    cgi: bool,
    out: impl Write,
) -> Result<()> {
    let renderer = build_renderer(config, input.engine)?;
    let mut request = RenderRequest::new(&input.view).with_params(load_params(input)?);
    request.status_code = status;

    let mut sink = if cgi {
        WriterSink::with_headers(out)
    } else {
        WriterSink::new(out)
    };
    renderer
        .render_to(&request, &mut sink)
        .with_context(|| format!("failed to render view '{}'", input.view))?;
    Ok(())
}

/// Renders a view and reports which files were used.
pub fn check(config: &Path, input: &ViewArgs, mut out: impl Write) -> Result<()> {
    let renderer = build_renderer(config, input.engine)?;
    let params = load_params(input)?;

    let rendered = renderer
        .render_view(&input.view, &params)
        .with_context(|| format!("view '{}' failed to render", input.view))?;

    writeln!(out, "view:     {}", rendered.view_path.display())?;
    writeln!(
        out,
        "template: {} ({})",
        rendered.template_ref,
        rendered.template_path.display()
    )?;
    writeln!(out, "output:   {} bytes", rendered.html.len())?;
    Ok(())
}

fn build_renderer(config: &Path, engine: EngineChoice) -> Result<ViewRenderer> {
    let settings = Settings::from_file(config)
        .with_context(|| format!("failed to load settings from {}", config.display()))?;
    tracing::info!(
        views = %settings.views_folder().display(),
        extension = settings.file_extension(),
        "loaded settings"
    );

    let renderer = ViewRenderer::new(settings);
    Ok(match engine {
        EngineChoice::Minijinja => renderer.with_engine(MiniJinjaEngine::new()),
        EngineChoice::Simple => renderer.with_engine(SimpleEngine::new()),
    })
}

fn load_params(input: &ViewArgs) -> Result<Params> {
    let text = match (&input.params, &input.params_file) {
        (Some(inline), _) => inline.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read params file {}", path.display()))?,
        (None, None) => return Ok(Params::new()),
    };

    let value: serde_json::Value =
        serde_json::from_str(&text).context("parameters are not valid JSON")?;
    match value {
        serde_json::Value::Object(map) => Ok(Params::from(map)),
        serde_json::Value::Null => Ok(Params::new()),
        _ => bail!("parameters must be a JSON object"),
    }
}
