//! Exclusion settings file and per-invocation search configuration

use crate::backend::SearchBackend;
use crate::error::{RefViewError, Result};
use crate::filters::ExclusionPolicy;
use crate::project::ProjectLayout;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name looked up next to the installed executable
pub const SETTINGS_FILE_NAME: &str = "exclude_settings.json";

/// Persisted exclusion lists.
///
/// Extension exclusions matter most for the content-index backend, which can
/// match binary files; large formats also speed up grep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExcludeSettings {
    pub exclude_extensions: Vec<String>,
    /// Project-relative globs, only passed to tools with native exclusion
    pub exclude_files: Vec<String>,
}

impl Default for ExcludeSettings {
    fn default() -> Self {
        let extensions = [
            // Scripts
            ".cs", ".js",
            // Textures
            ".png", ".tga", ".psd",
            // Models
            ".fbx", ".obj",
            // Audio
            ".wav", ".ogg", ".mp3",
            // Fonts
            ".otf", ".ttf",
            // Movies
            ".mp4", ".3gp", ".usm",
        ];
        Self {
            exclude_extensions: extensions.iter().map(|e| e.to_string()).collect(),
            exclude_files: vec!["Assets/StreamingAssets/*".to_string()],
        }
    }
}

impl ExcludeSettings {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| RefViewError::settings_io(path, e))?;
        serde_json::from_str(&content).map_err(|e| {
            RefViewError::configuration(format!(
                "Invalid exclude settings {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Load settings for one invocation.
    ///
    /// An explicit path must load. Otherwise the file next to the executable is
    /// used when present, and the built-in defaults when it is not.
    pub fn locate(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match installed_settings_path() {
            Some(path) if path.is_file() => {
                log::debug!("Loading exclude settings from {}", path.display());
                Self::load(&path)
            }
            _ => {
                log::info!("No {} found, using default exclusions", SETTINGS_FILE_NAME);
                Ok(Self::default())
            }
        }
    }

    pub fn to_policy(&self) -> ExclusionPolicy {
        ExclusionPolicy::new(&self.exclude_extensions, &self.exclude_files)
    }
}

/// `exclude_settings.json` in the directory of the running executable
pub fn installed_settings_path() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    Some(exe.parent()?.join(SETTINGS_FILE_NAME))
}

/// Everything the driver needs for one search; built once and passed in.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub backend: SearchBackend,
    pub layout: ProjectLayout,
    pub exclusions: ExclusionPolicy,
    /// Replaces the backend's executable name (e.g. an absolute path)
    pub executable: Option<String>,
    /// Upper bound for one tool run. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl SearchConfig {
    pub fn new(backend: SearchBackend, layout: ProjectLayout) -> Self {
        Self {
            backend,
            layout,
            exclusions: ExclusionPolicy::empty(),
            executable: None,
            timeout: None,
        }
    }

    pub fn with_exclusions(mut self, exclusions: ExclusionPolicy) -> Self {
        self.exclusions = exclusions;
        self
    }

    pub fn with_executable(mut self, executable: impl Into<String>) -> Self {
        self.executable = Some(executable.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
