//! Renderer settings and file-name resolution.
//!
//! [`Settings`] carries the two values every render call needs: the folder
//! views and templates live in, and the extension appended to their names.
//! Settings are validated once and never change afterwards.
//!
//! # Sources
//!
//! | Source | Constructor |
//! |--------|-------------|
//! | Plain string map | [`Settings::from_map`] |
//! | JSON value | [`Settings::from_value`] |
//! | YAML text | [`Settings::from_yaml`] |
//! | JSON text | [`Settings::from_json`] |
//! | `.yaml` / `.yml` / `.json` file | [`Settings::from_file`] |
//!
//! All of them expect the keys `viewsFolder` and `fileExtension`:
//!
//! ```yaml
//! viewsFolder: ./views
//! fileExtension: .tpl
//! ```

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf, MAIN_SEPARATOR_STR};

use serde::{Deserialize, Serialize};

/// Settings key naming the folder views and templates are read from.
pub const VIEWS_FOLDER_KEY: &str = "viewsFolder";

/// Settings key naming the extension appended to view and template names.
pub const FILE_EXTENSION_KEY: &str = "fileExtension";

const SEPARATORS: &[char] = &['/', '\\'];

/// Errors raised while loading or validating settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// A required key is absent.
    #[error("missing required setting `{0}`")]
    MissingKey(&'static str),

    /// The settings file could not be read.
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file extension is not one we know how to parse.
    #[error("unsupported settings format for {0} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(PathBuf),

    /// YAML settings failed to parse.
    #[error("invalid YAML settings: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON settings failed to parse.
    #[error("invalid JSON settings: {0}")]
    Json(#[from] serde_json::Error),
}

/// Raw, possibly incomplete settings as they appear in a file.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSettings {
    views_folder: Option<PathBuf>,
    file_extension: Option<String>,
}

impl RawSettings {
    fn validate(self) -> Result<Settings, SettingsError> {
        let views_folder = self
            .views_folder
            .ok_or(SettingsError::MissingKey(VIEWS_FOLDER_KEY))?;
        let file_extension = self
            .file_extension
            .ok_or(SettingsError::MissingKey(FILE_EXTENSION_KEY))?;
        Ok(Settings {
            views_folder,
            file_extension,
        })
    }
}

/// Validated renderer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    views_folder: PathBuf,
    file_extension: String,
}

impl Settings {
    /// Creates settings from already known values.
    pub fn new(views_folder: impl Into<PathBuf>, file_extension: impl Into<String>) -> Self {
        Self {
            views_folder: views_folder.into(),
            file_extension: file_extension.into(),
        }
    }

    /// Builds settings from a string map, as handed over by a host application.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingKey`] naming the first absent key.
    pub fn from_map(map: &HashMap<String, String>) -> Result<Self, SettingsError> {
        RawSettings {
            views_folder: map.get(VIEWS_FOLDER_KEY).map(PathBuf::from),
            file_extension: map.get(FILE_EXTENSION_KEY).cloned(),
        }
        .validate()
    }

    /// Builds settings from a JSON object.
    pub fn from_value(value: serde_json::Value) -> Result<Self, SettingsError> {
        let raw: RawSettings = serde_json::from_value(value)?;
        raw.validate()
    }

    /// Parses settings from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self, SettingsError> {
        let raw: RawSettings = serde_yaml::from_str(text)?;
        raw.validate()
    }

    /// Parses settings from JSON text.
    pub fn from_json(text: &str) -> Result<Self, SettingsError> {
        let raw: RawSettings = serde_json::from_str(text)?;
        raw.validate()
    }

    /// Loads settings from a file, choosing the parser by extension.
    ///
    /// A relative `viewsFolder` is taken relative to the settings file's
    /// directory, so a settings file can sit next to its views.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut settings = match ext.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml(&text)?,
            Some("json") => Self::from_json(&text)?,
            _ => return Err(SettingsError::UnsupportedFormat(path.to_path_buf())),
        };

        if settings.views_folder.is_relative() {
            if let Some(parent) = path.parent() {
                settings.views_folder = parent.join(&settings.views_folder);
            }
        }
        Ok(settings)
    }

    /// The configured views folder, as given.
    pub fn views_folder(&self) -> &Path {
        &self.views_folder
    }

    /// The configured file extension.
    pub fn file_extension(&self) -> &str {
        &self.file_extension
    }

    /// The views folder with trailing separators collapsed to exactly one.
    ///
    /// Folders that are not valid UTF-8 keep their raw bytes.
    pub fn views_dir(&self) -> PathBuf {
        let mut dir: OsString = match self.views_folder.to_str() {
            Some(folder) => folder.trim_end_matches(SEPARATORS).into(),
            None => self
                .views_folder
                .components()
                .collect::<PathBuf>()
                .into_os_string(),
        };
        dir.push(MAIN_SEPARATOR_STR);
        PathBuf::from(dir)
    }

    /// Turns a view or template name into a file name.
    ///
    /// Leading separators are stripped and the configured extension is
    /// appended unless the name already carries it.
    pub fn file_name(&self, name: &str) -> String {
        let name = name.trim_start_matches(SEPARATORS);
        if name.ends_with(self.file_extension.as_str()) {
            name.to_string()
        } else {
            format!("{}{}", name, self.file_extension)
        }
    }

    /// Resolves a view or template name to its full path.
    pub fn resolve(&self, name: &str) -> PathBuf {
        let mut path = self.views_dir().into_os_string();
        path.push(self.file_name(name));
        PathBuf::from(path)
    }
}
