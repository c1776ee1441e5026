//! Command-line front end

use crate::backend::SearchBackend;
use crate::config::{ExcludeSettings, SearchConfig};
use crate::display::{detect_color_support, to_json, TreeFormatter};
use crate::driver::{find_references, PROGRESS_TITLE};
use crate::progress::{CancelToken, ConsoleProgress};
use crate::project::{FsProject, PathResolver, ProjectLayout, DEFAULT_DATA_DIR};
use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use log::{debug, warn};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// refview - find every file in a project that references the selected assets
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Assets or folders to search references of (absolute, cwd- or project-relative)
    pub paths: Vec<PathBuf>,

    /// Project directory (defaults to current directory)
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Directory under the project dir that the tools search
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: String,

    /// Search backend: spotlight, grep, git-grep, findstr, git-grep-win or auto
    #[arg(short, long, default_value = "auto")]
    pub backend: String,

    /// Exclude settings file (defaults to exclude_settings.json next to the executable)
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Use this executable instead of the backend's default tool
    #[arg(long)]
    pub executable: Option<String>,

    /// Kill a search tool that runs longer than this
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// List references of every asset instead of only their counts
    #[arg(short, long)]
    pub expand: bool,

    /// Show available search backends information
    #[arg(long)]
    pub backends: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// バックエンド名の解決
pub fn select_backend(name: &str) -> Result<SearchBackend> {
    if name.eq_ignore_ascii_case("auto") {
        return SearchBackend::detect()
            .ok_or_else(|| anyhow!("No search tool is installed for this platform"));
    }
    SearchBackend::from_name(name).ok_or_else(|| {
        let names: Vec<&str> = SearchBackend::all().iter().map(|b| b.name()).collect();
        anyhow!("Unknown backend '{}' (expected one of: {}, auto)", name, names.join(", "))
    })
}

/// Map a command-line path to a project-relative path.
///
/// Absolute paths must lie inside the project. Relative paths are tried
/// against the project dir first and then the current directory. Paths
/// reached through symlinks are resolved before giving up.
pub fn to_project_path(layout: &ProjectLayout, cwd: &Path, path: &Path) -> Option<String> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else if layout.to_absolute(&path.to_string_lossy()).exists() {
        layout.project_dir().join(path)
    } else {
        cwd.join(path)
    };
    layout.to_relative(&absolute).or_else(|| {
        let resolved = fs::canonicalize(&absolute).ok()?;
        layout.to_relative(&resolved)
    })
}

/// CLI実行エントリーポイント
pub fn run(cli: Cli) -> Result<()> {
    if cli.backends {
        show_backend_info();
        return Ok(());
    }

    let cwd = env::current_dir().context("Failed to read current directory")?;
    let project_dir = match &cli.directory {
        Some(dir) if dir.is_absolute() => dir.clone(),
        Some(dir) => cwd.join(dir),
        None => cwd.clone(),
    };
    let layout = ProjectLayout::new(project_dir)
        .with_data_dir_name(cli.data_dir.as_str())
        .canonicalized()?;
    debug!("Project directory: {}", layout.project_dir().display());
    if !layout.data_dir().is_dir() {
        bail!(
            "{} has no '{}' directory (see --data-dir)",
            layout.project_dir().display(),
            layout.data_dir_name()
        );
    }

    let project = FsProject::new(layout.clone());

    let mut selection = Vec::new();
    for path in &cli.paths {
        let Some(relative) = to_project_path(&layout, &cwd, path) else {
            warn!("{} is outside the project, skipping", path.display());
            continue;
        };
        match project.identifier_of(&relative) {
            Some(identifier) => selection.push(identifier),
            None => warn!("{} has no identifier (missing .meta?), skipping", relative),
        }
    }

    let settings = ExcludeSettings::locate(cli.settings.as_deref())?;
    let backend = select_backend(&cli.backend)?;
    let mut config = SearchConfig::new(backend, layout).with_exclusions(settings.to_policy());
    if let Some(executable) = &cli.executable {
        config = config.with_executable(executable.clone());
    }
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    let cancel = CancelToken::new();
    if let Err(e) = cancel.cancel_on_interrupt() {
        warn!("Ctrl-C will not cancel the search: {}", e);
    }
    let mut progress = ConsoleProgress::new(PROGRESS_TITLE, cancel);
    let mut result = find_references(&config, &project, &selection, &mut progress)?;
    if cli.expand {
        result.set_all_expanded(true);
    }

    if cli.json {
        println!("{}", to_json(&result).context("Failed to serialize result")?);
    } else {
        println!("{}", TreeFormatter::new(detect_color_support()).format(&result));
    }
    Ok(())
}

/// バックエンド情報の表示
fn show_backend_info() {
    println!("Search Backend Information");
    println!("==========================");

    let default = SearchBackend::platform_default();
    for backend in SearchBackend::all() {
        let marker = if backend == default { "→" } else { " " };
        let status = match (backend.is_supported_platform(), backend.is_available()) {
            (true, true) => "available",
            (true, false) => "not installed",
            (false, _) => "unsupported platform",
        };
        println!(
            "  {} {:<13} {:<22} {}",
            marker,
            backend.name(),
            status,
            backend.description()
        );
    }
}
