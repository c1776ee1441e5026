//! Host environment: identifier/path resolution and entity lookup
//!
//! The search pipeline only talks to the [`PathResolver`] and
//! [`EntityResolver`] traits. [`FsProject`] implements both for a Unity-style
//! project on disk, where every asset has a `.meta` sidecar carrying its GUID.

use crate::error::{RefViewError, Result};
use crate::parsers::paths::{strip_sidecar, SIDECAR_EXTENSION};
use crate::types::EntityHandle;
use ignore::WalkBuilder;
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

/// Directory under the project dir that holds the assets
pub const DEFAULT_DATA_DIR: &str = "Assets";

/// Resolves opaque selection identifiers to project paths and back.
///
/// Paths are project-relative with forward slashes (`Assets/A.png`).
#[cfg_attr(test, mockall::automock)]
pub trait PathResolver {
    fn path_of(&self, identifier: &str) -> Option<String>;
    fn identifier_of(&self, path: &str) -> Option<String>;
    fn is_directory(&self, path: &str) -> bool;
    /// Every file below `directory`, recursively, excluding sidecar files
    fn list_files(&self, directory: &str) -> Vec<String>;
}

/// Resolves a project path to a loaded entity; `None` means missing.
#[cfg_attr(test, mockall::automock)]
pub trait EntityResolver {
    fn resolve(&self, path: &str) -> Option<EntityHandle>;
}

/// Where the project lives on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    project_dir: PathBuf,
    data_dir_name: String,
}

impl ProjectLayout {
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            data_dir_name: DEFAULT_DATA_DIR.to_string(),
        }
    }

    pub fn with_data_dir_name(mut self, name: impl Into<String>) -> Self {
        self.data_dir_name = name.into();
        self
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// The search root handed to the external tools
    pub fn data_dir(&self) -> PathBuf {
        self.project_dir.join(&self.data_dir_name)
    }

    pub fn data_dir_name(&self) -> &str {
        &self.data_dir_name
    }

    pub fn to_absolute(&self, relative: &str) -> PathBuf {
        self.project_dir.join(relative)
    }

    /// The same layout with the project dir resolved through symlinks and `..`.
    ///
    /// Tools such as mdfind report resolved absolute paths, which only strip
    /// back to project-relative paths against a resolved project dir.
    pub fn canonicalized(&self) -> Result<Self> {
        let project_dir = fs::canonicalize(&self.project_dir).map_err(|e| {
            RefViewError::configuration(format!(
                "Project directory {} is not accessible: {}",
                self.project_dir.display(),
                e
            ))
        })?;
        Ok(Self {
            project_dir: strip_verbatim_prefix(project_dir),
            data_dir_name: self.data_dir_name.clone(),
        })
    }

    /// Project-relative forward-slash path of `path`, if it is inside the project
    pub fn to_relative(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.project_dir).ok()?;
        let parts: Vec<String> = relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("/"))
        }
    }
}

// canonicalize は Windows で `\\?\C:\...` を返すが、外部ツールは扱えない
#[cfg(windows)]
fn strip_verbatim_prefix(path: PathBuf) -> PathBuf {
    let stripped = path
        .to_str()
        .and_then(|text| text.strip_prefix(r"\\?\"))
        .filter(|rest| !rest.starts_with(r"UNC\"))
        .map(PathBuf::from);
    stripped.unwrap_or(path)
}

#[cfg(not(windows))]
fn strip_verbatim_prefix(path: PathBuf) -> PathBuf {
    path
}

/// A Unity-style project on the local filesystem.
///
/// Asset identifiers are the `guid:` values of `.meta` sidecars. Directories
/// without a sidecar (such as `Assets` itself) are identified by their path.
pub struct FsProject {
    layout: ProjectLayout,
    guid_index: OnceLock<HashMap<String, String>>,
}

impl FsProject {
    pub fn new(layout: ProjectLayout) -> Self {
        Self {
            layout,
            guid_index: OnceLock::new(),
        }
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    /// Walk `root`, yielding regular files the editor would show
    fn walk_files(root: &Path) -> impl Iterator<Item = PathBuf> {
        let walk_root = root.to_path_buf();
        WalkBuilder::new(root)
            .standard_filters(false)
            .hidden(true) // dot files are never imported
            .follow_links(false)
            .build()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::debug!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
            .map(|entry| entry.into_path())
            // "Folder~" and "file~" are editor-ignored
            .filter(move |path| {
                !path
                    .strip_prefix(&walk_root)
                    .unwrap_or(path)
                    .components()
                    .any(|part| part.as_os_str().to_string_lossy().ends_with('~'))
            })
    }

    fn guid_index(&self) -> &HashMap<String, String> {
        self.guid_index.get_or_init(|| {
            let mut index = HashMap::new();
            for meta_path in Self::walk_files(&self.layout.data_dir()) {
                let Some(relative) = self.layout.to_relative(&meta_path) else {
                    continue;
                };
                let Some(asset_path) = strip_sidecar(&relative) else {
                    continue;
                };
                if let Some(guid) = read_guid(&meta_path) {
                    index.insert(guid, asset_path.to_string());
                }
            }
            log::debug!("Indexed {} asset identifiers", index.len());
            index
        })
    }
}

/// `guid:` value of a `.meta` sidecar
fn read_guid(meta_path: &Path) -> Option<String> {
    let content = fs::read_to_string(meta_path).ok()?;
    content
        .lines()
        .find_map(|line| line.trim().strip_prefix("guid:"))
        .map(|guid| guid.trim().to_string())
        .filter(|guid| !guid.is_empty())
}

impl PathResolver for FsProject {
    fn path_of(&self, identifier: &str) -> Option<String> {
        if let Some(path) = self.guid_index().get(identifier) {
            return Some(path.clone());
        }
        if self.is_directory(identifier) {
            return Some(identifier.trim_end_matches('/').to_string());
        }
        None
    }

    fn identifier_of(&self, path: &str) -> Option<String> {
        let meta_path = self.layout.to_absolute(&format!("{}{}", path, SIDECAR_EXTENSION));
        match read_guid(&meta_path) {
            Some(guid) => Some(guid),
            None if self.is_directory(path) => Some(path.to_string()),
            None => None,
        }
    }

    fn is_directory(&self, path: &str) -> bool {
        !path.is_empty() && self.layout.to_absolute(path).is_dir()
    }

    fn list_files(&self, directory: &str) -> Vec<String> {
        let mut files: Vec<String> = Self::walk_files(&self.layout.to_absolute(directory))
            .filter_map(|path| self.layout.to_relative(&path))
            .filter(|path| strip_sidecar(path).is_none())
            .collect();
        files.sort();
        files
    }
}

impl EntityResolver for FsProject {
    fn resolve(&self, path: &str) -> Option<EntityHandle> {
        let absolute = self.layout.to_absolute(path);
        if !absolute.exists() {
            return None;
        }
        let display_name = absolute
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string());
        Some(EntityHandle {
            path: path.to_string(),
            display_name,
        })
    }
}
