//! External search tool backends
//!
//! Each backend is a tag that selects a [`CommandDescriptor`] from the
//! registry and one of the two output parsers. Nothing here spawns processes;
//! see [`crate::driver`] for that.

mod registry;

pub use registry::{
    descriptor_for, extra_arguments, split_arguments, CommandDescriptor, RelativeBase,
    PLATFORM_NEWLINE,
};

use serde::{Deserialize, Serialize};
use which::which;

/// Output layout produced by a backend's tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One matching file path per record
    PathList,
    /// `drive:path:line:content` per record, possibly repeated per file
    LineIndexed,
}

/// The external search tool used for one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchBackend {
    /// macOS Spotlight index (`mdfind`)
    ContentIndexSearch,
    /// `grep -rl`
    GrepSearch,
    /// `git grep` on posix systems
    GrepWithVersionControl,
    /// Windows `findstr.exe`
    LineIndexSearch,
    /// `git.exe grep` on Windows
    VersionControlGrepWindows,
}

impl SearchBackend {
    /// Every backend, in the order they are offered to the user
    pub fn all() -> [SearchBackend; 5] {
        [
            SearchBackend::ContentIndexSearch,
            SearchBackend::GrepSearch,
            SearchBackend::GrepWithVersionControl,
            SearchBackend::LineIndexSearch,
            SearchBackend::VersionControlGrepWindows,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            SearchBackend::ContentIndexSearch => "spotlight",
            SearchBackend::GrepSearch => "grep",
            SearchBackend::GrepWithVersionControl => "git-grep",
            SearchBackend::LineIndexSearch => "findstr",
            SearchBackend::VersionControlGrepWindows => "git-grep-win",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SearchBackend::ContentIndexSearch => "Spotlight content index (mdfind), macOS",
            SearchBackend::GrepSearch => "grep recursive file listing",
            SearchBackend::GrepWithVersionControl => "git grep over tracked files",
            SearchBackend::LineIndexSearch => "findstr line search, Windows",
            SearchBackend::VersionControlGrepWindows => "git grep over tracked files, Windows",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_lowercase();
        Self::all().into_iter().find(|backend| backend.name() == lower)
    }

    pub fn output_format(&self) -> OutputFormat {
        match self {
            SearchBackend::LineIndexSearch => OutputFormat::LineIndexed,
            _ => OutputFormat::PathList,
        }
    }

    /// Backends whose tool reports Windows paths (backslashes, drive letters)
    pub fn is_windows_style(&self) -> bool {
        matches!(
            self,
            SearchBackend::LineIndexSearch | SearchBackend::VersionControlGrepWindows
        )
    }

    /// Whether the backend runs on the current platform
    pub fn is_supported_platform(&self) -> bool {
        match self {
            SearchBackend::ContentIndexSearch => cfg!(target_os = "macos"),
            SearchBackend::GrepSearch | SearchBackend::GrepWithVersionControl => !cfg!(windows),
            SearchBackend::LineIndexSearch | SearchBackend::VersionControlGrepWindows => {
                cfg!(windows)
            }
        }
    }

    /// The backend the menu offers first on this platform
    pub fn platform_default() -> Self {
        if cfg!(target_os = "macos") {
            SearchBackend::ContentIndexSearch
        } else if cfg!(windows) {
            SearchBackend::LineIndexSearch
        } else {
            SearchBackend::GrepSearch
        }
    }

    /// Whether the backend's executable can be found on PATH
    pub fn is_available(&self) -> bool {
        match descriptor_for(*self) {
            Ok(descriptor) => which(&descriptor.executable).is_ok(),
            Err(_) => false,
        }
    }

    /// Pick the platform default if its tool is installed, otherwise the first
    /// supported backend whose tool is installed
    pub fn detect() -> Option<Self> {
        let preferred = Self::platform_default();
        if preferred.is_available() {
            return Some(preferred);
        }
        let fallback = Self::all()
            .into_iter()
            .filter(|backend| backend.is_supported_platform())
            .find(|backend| backend.is_available());
        if let Some(backend) = fallback {
            log::info!(
                "{} is not installed, falling back to {}",
                preferred.name(),
                backend.name()
            );
        }
        fallback
    }
}

impl std::fmt::Display for SearchBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
