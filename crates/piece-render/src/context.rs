//! Per-call render data.
//!
//! Nothing in this module outlives a single render call. The renderer itself
//! only holds immutable settings; everything that varies between calls flows
//! through the types below.
//!
//! - [`Params`]: caller-side builder for view parameters
//! - [`Bindings`]: the sanitized execution scope shared by the view and the
//!   template pass
//! - [`RenderRequest`]: a view name, its parameters and an optional status
//!   code for the output sink

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::RenderError;
use crate::sanitize::sanitize_value;

/// Names the execution scope defines itself.
///
/// A parameter with one of these names would shadow or be shadowed by the
/// template backend's own variables, so it is rejected up front.
pub const RESERVED_BINDINGS: &[&str] = &["loop", "self", "super", "caller", "varargs", "kwargs"];

/// Builder for view parameters.
///
/// Any `Serialize` value can be passed to
/// [`ViewRenderer::render`](crate::ViewRenderer::render); `Params` is a
/// convenience for building a parameter object inline.
///
/// ```rust
/// use piece_render::Params;
///
/// let params = Params::new()
///     .with("title", "Inbox")
///     .with("unread", 3);
/// assert_eq!(params.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Params(Map<String, Value>);

impl Params {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, replacing any previous value under the same name.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Inserts a parameter in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    /// Inserts raw bytes of unknown encoding as text.
    ///
    /// Invalid UTF-8 sequences are replaced with U+FFFD; the text is escaped
    /// at render time like any other string parameter.
    pub fn insert_bytes(&mut self, name: impl Into<String>, bytes: &[u8]) {
        self.0
            .insert(name.into(), Value::String(String::from_utf8_lossy(bytes).into_owned()));
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no parameters have been added.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// The sanitized variables visible to a view or template while it executes.
///
/// Built once per render call and passed by reference to both passes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings(Map<String, Value>);

impl Bindings {
    /// Builds bindings from arbitrary serializable parameters.
    ///
    /// # Errors
    ///
    /// - [`RenderError::Serialization`] if `params` cannot be serialized
    /// - [`RenderError::InvalidInput`] if `params` is not a map (or unit/null)
    ///   or uses a name from [`RESERVED_BINDINGS`]
    pub fn from_params<P: Serialize + ?Sized>(params: &P) -> Result<Self, RenderError> {
        match serde_json::to_value(params)? {
            Value::Null => Ok(Self::default()),
            Value::Object(map) => Self::from_map(map),
            other => Err(RenderError::InvalidInput(format!(
                "view parameters must be a map of names to values, got {}",
                json_kind(&other)
            ))),
        }
    }

    fn from_map(map: Map<String, Value>) -> Result<Self, RenderError> {
        if let Some(reserved) = map.keys().find(|k| RESERVED_BINDINGS.contains(&k.as_str())) {
            return Err(RenderError::InvalidInput(format!(
                "parameter name `{}` is reserved by the template scope",
                reserved
            )));
        }
        Ok(Self(
            map.into_iter()
                .map(|(name, value)| (name, sanitize_value(value)))
                .collect(),
        ))
    }

    /// Looks up a binding by dotted path (`user.name`, `items.0`).
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.0.get(parts.next()?)?;

        for part in parts {
            current = match current {
                Value::Object(map) => map.get(part)?,
                Value::Array(arr) => {
                    let index: usize = part.parse().ok()?;
                    arr.get(index)?
                }
                _ => return None,
            };
        }

        Some(current)
    }

    /// The bindings as a JSON map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Whether there are no bindings.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Bindings {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a map",
    }
}

/// A complete render request: which view, with what, and the status to report.
///
/// The status code is not used by rendering itself; it is handed to the
/// [`OutputSink`](crate::output::OutputSink) together with the markup.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    /// View name, resolved against the configured folder and extension.
    pub view_name: String,
    /// Parameters, always a JSON object.
    pub params: Params,
    /// Response status for the sink, if the caller wants one applied.
    pub status_code: Option<u16>,
}

impl RenderRequest {
    /// Creates a request for `view_name` with no parameters.
    pub fn new(view_name: impl Into<String>) -> Self {
        Self {
            view_name: view_name.into(),
            params: Params::new(),
            status_code: None,
        }
    }

    /// Sets the parameters.
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Sets the status code handed to the output sink.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status_code = Some(status);
        self
    }
}
