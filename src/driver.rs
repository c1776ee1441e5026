//! Search driver: one external tool run per target, strictly in order

use crate::backend::{descriptor_for, CommandDescriptor, RelativeBase};
use crate::config::SearchConfig;
use crate::error::Result;
use crate::parsers::{parse_output, ParseRequest};
use crate::process::{run_captured, CapturedOutput};
use crate::progress::{progress_label, ProgressReporter};
use crate::project::{EntityResolver, PathResolver};
use crate::resolver::resolve_targets;
use crate::types::{AssetReferenceRecord, ReferenceEntry, SearchCompletion, SearchResult, SearchTarget};
use std::path::PathBuf;

/// Title shown with progress output
pub const PROGRESS_TITLE: &str = "Find References In Project";

/// Runs a configured backend over a list of targets.
///
/// Processes are launched one at a time on the calling thread. Cancellation
/// is checked before each target; a tool that has started always runs to
/// completion (or to the configured timeout).
pub struct SearchDriver<'a, H: ?Sized> {
    config: &'a SearchConfig,
    host: &'a H,
    descriptor: CommandDescriptor,
    project_dir: String,
    search_root: PathBuf,
}

impl<'a, H> SearchDriver<'a, H>
where
    H: EntityResolver + ?Sized,
{
    pub fn new(config: &'a SearchConfig, host: &'a H) -> Result<Self> {
        let mut descriptor = descriptor_for(config.backend)?;
        if let Some(executable) = &config.executable {
            descriptor = descriptor.with_executable(executable.clone());
        }
        let layout = config.layout.canonicalized()?;
        Ok(Self {
            config,
            host,
            descriptor,
            project_dir: layout.project_dir().to_string_lossy().into_owned(),
            search_root: layout.data_dir(),
        })
    }

    pub fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }

    /// Search every target and aggregate one record per target, in order.
    ///
    /// Returns the partial result, marked cancelled, when `progress` asks to
    /// stop. Any failure to run a tool aborts the whole search.
    pub fn run(&self, targets: &[SearchTarget], progress: &mut dyn ProgressReporter) -> Result<SearchResult> {
        let mut result = SearchResult::new(self.config.backend);
        let count = targets.len();
        log::info!(
            "Searching references of {} assets with {}",
            count,
            self.config.backend
        );

        for (index, target) in targets.iter().enumerate() {
            let fraction = index as f32 / count as f32;
            if progress.report(fraction, &progress_label(fraction, target.file_name())) {
                log::info!("Search cancelled after {} of {} assets", index, count);
                progress.clear();
                result.completion = SearchCompletion::Cancelled;
                return Ok(result);
            }

            let references = match self.search_target(target) {
                Ok(references) => references,
                Err(e) => {
                    log::error!("Reference search for {} failed: {}", target.path, e);
                    progress.clear();
                    return Err(e);
                }
            };
            result.push(self.aggregate(target, references));
        }

        progress.clear();
        log::info!(
            "Search completed: {} references across {} assets",
            result.total_references(),
            result.assets().len()
        );
        Ok(result)
    }

    /// Run the tool for one target and parse its output into reference paths
    pub fn search_target(&self, target: &SearchTarget) -> Result<Vec<String>> {
        let root = self.search_root.to_string_lossy();
        let args = self
            .descriptor
            .build_arguments(&root, &target.identifier, &self.config.exclusions);
        log::debug!("Executing: {}", self.descriptor.command_line(&args));

        let output = run_captured(
            &self.descriptor.executable,
            &args,
            &self.search_root,
            self.config.timeout,
        )?;
        self.log_status(&output);

        let base_dir = match self.descriptor.relative_to {
            RelativeBase::ProjectDir => self.project_dir.clone(),
            RelativeBase::SearchRoot => root.into_owned(),
        };
        let request = ParseRequest {
            separator: self.descriptor.record_separator,
            project_dir: &self.project_dir,
            base_dir: &base_dir,
            target_path: &target.path,
            exclusions: &self.config.exclusions,
            ignore_case: self.config.backend.is_windows_style(),
        };
        let references = parse_output(
            self.config.backend.output_format(),
            &output.stdout_lossy(),
            &request,
        );
        log::debug!("{}: {} references", target.path, references.len());
        Ok(references)
    }

    fn log_status(&self, output: &CapturedOutput) {
        if output.status.success() || output.is_no_match() {
            return;
        }
        // 出力は壊れていても解析を続ける
        log::warn!(
            "{} exited with {}: {}",
            self.descriptor.executable,
            output.status,
            output.stderr_lossy()
        );
    }

    /// Wrap parsed paths into a record, resolving every entity.
    ///
    /// Unresolvable references stay in the list, marked missing.
    fn aggregate(&self, target: &SearchTarget, references: Vec<String>) -> AssetReferenceRecord {
        let mut record = AssetReferenceRecord::new(target.clone(), self.host.resolve(&target.path));
        for path in references {
            let entity = self.host.resolve(&path);
            if entity.is_none() {
                log::debug!("Reference {} does not resolve, keeping it as missing", path);
            }
            record.add_reference(ReferenceEntry { path, entity });
        }
        record.finish();
        record
    }
}

/// Resolve `selection` and search references of every resulting target
pub fn find_references<H>(
    config: &SearchConfig,
    host: &H,
    selection: &[String],
    progress: &mut dyn ProgressReporter,
) -> Result<SearchResult>
where
    H: PathResolver + EntityResolver + ?Sized,
{
    let driver = SearchDriver::new(config, host)?;
    let targets = resolve_targets(host, selection)?;
    driver.run(&targets, progress)
}
