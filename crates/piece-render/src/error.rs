//! Error types for view rendering.
//!
//! This module provides [`RenderError`], the error type returned by every
//! public rendering operation. It hides the template backend's own error type
//! so callers match on a stable set of failure kinds.

use std::fmt;
use std::path::PathBuf;

/// Which of the two files in a render call an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// The view file named by the caller.
    View,
    /// The layout template named by the view's `@template` directive.
    Template,
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::View => f.write_str("view"),
            FileKind::Template => f.write_str("template"),
        }
    }
}

/// Error type for view rendering operations.
///
/// Every failure aborts the whole render call; there is no partial output.
#[derive(Debug)]
pub enum RenderError {
    /// Settings are missing a required key or could not be loaded.
    Config(String),

    /// The caller passed an unusable view name or parameter set.
    InvalidInput(String),

    /// The resolved view or template file does not exist.
    NotFound {
        /// Whether the view or the template was missing.
        kind: FileKind,
        /// The fully resolved path that was checked.
        path: PathBuf,
    },

    /// The view output has no `@template('...');` directive.
    Parse(String),

    /// Splicing the view body into the template produced no output.
    Render(String),

    /// The template backend rejected or failed to evaluate a file.
    Template(String),

    /// Parameters could not be converted into bindings.
    Serialization(String),

    /// I/O error while reading a view or template.
    Io(std::io::Error),
}

impl RenderError {
    pub(crate) fn not_found(kind: FileKind, path: impl Into<PathBuf>) -> Self {
        RenderError::NotFound {
            kind,
            path: path.into(),
        }
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Config(msg) => write!(f, "configuration error: {}", msg),
            RenderError::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            RenderError::NotFound { kind, path } => {
                write!(f, "{} not found: {}", kind, path.display())
            }
            RenderError::Parse(msg) => write!(f, "view parse error: {}", msg),
            RenderError::Render(msg) => write!(f, "render error: {}", msg),
            RenderError::Template(msg) => write!(f, "template error: {}", msg),
            RenderError::Serialization(msg) => write!(f, "serialization error: {}", msg),
            RenderError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        RenderError::Io(err)
    }
}

impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        RenderError::Serialization(err.to_string())
    }
}

impl From<crate::settings::SettingsError> for RenderError {
    fn from(err: crate::settings::SettingsError) -> Self {
        RenderError::Config(err.to_string())
    }
}

// Backend errors all surface as template failures, except serialization of
// bindings which is the caller's data.
impl From<minijinja::Error> for RenderError {
    fn from(err: minijinja::Error) -> Self {
        use minijinja::ErrorKind;

        match err.kind() {
            ErrorKind::BadSerialization => RenderError::Serialization(err.to_string()),
            _ => RenderError::Template(err.to_string()),
        }
    }
}
