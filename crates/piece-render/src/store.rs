//! Where view and template sources come from.
//!
//! The renderer never touches the filesystem directly. It asks a
//! [`FileStore`] whether a resolved path exists and for its contents:
//!
//! - [`FsStore`]: reads from disk on every call, so edits show up on the
//!   next render without restarting
//! - [`MemoryStore`]: a fixed map of paths to sources, for tests and for
//!   applications that embed their views in the binary

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::RenderError;

/// Source of view and template files.
///
/// Implementations must be shareable across threads; the renderer may be
/// used from several request handlers at once.
pub trait FileStore: Send + Sync {
    /// Whether a file exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Reads the file at `path` as text.
    fn read(&self, path: &Path) -> Result<String, RenderError>;
}

/// Filesystem-backed store.
///
/// Files are decoded as UTF-8; invalid sequences are replaced with U+FFFD
/// instead of failing the render.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStore;

impl FsStore {
    /// Creates a filesystem store.
    pub fn new() -> Self {
        Self
    }
}

impl FileStore for FsStore {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read(&self, path: &Path) -> Result<String, RenderError> {
        let bytes = std::fs::read(path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// In-memory store keyed by resolved path.
///
/// # Example
///
/// ```rust
/// use piece_render::{FileStore, MemoryStore};
/// use std::path::Path;
///
/// let store = MemoryStore::new().with_file("/views/home.tpl", "@template('layout');hi");
/// assert!(store.exists(Path::new("/views/home.tpl")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    files: HashMap<PathBuf, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file and returns the store, for chained construction.
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    /// Adds or replaces a file.
    pub fn insert(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    /// Number of files held.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the store holds no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FileStore for MemoryStore {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn read(&self, path: &Path) -> Result<String, RenderError> {
        self.files.get(path).cloned().ok_or_else(|| {
            RenderError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no such file in memory store: {}", path.display()),
            ))
        })
    }
}
