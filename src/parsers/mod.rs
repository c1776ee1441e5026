//! Parsers turning raw tool output into project-relative reference paths
//!
//! Both parsers are pure: they see only the captured output and the
//! [`ParseRequest`]. Malformed records are skipped, never reported.

mod line_indexed;
mod path_list;
pub mod paths;

pub use line_indexed::parse_line_indexed;
pub use path_list::parse_path_list;

use crate::backend::OutputFormat;
use crate::filters::ExclusionPolicy;
use std::collections::HashSet;

/// Everything a parser needs besides the raw output
#[derive(Debug, Clone, Copy)]
pub struct ParseRequest<'a> {
    /// Delimiter between records (NUL or newline)
    pub separator: &'a str,
    /// Prefix stripped from every path (the directory containing `Assets/`)
    pub project_dir: &'a str,
    /// Directory relative records are joined onto
    pub base_dir: &'a str,
    /// Path of the target being searched, for self-reference suppression
    pub target_path: &'a str,
    pub exclusions: &'a ExclusionPolicy,
    /// Compare the project prefix case-insensitively (Windows tools)
    pub ignore_case: bool,
}

impl<'a> ParseRequest<'a> {
    /// Apply the shared record rules and return the reference path to keep.
    ///
    /// Sidecar metadata records are reattributed to the asset they describe
    /// and dropped when that asset is the target itself; the sidecar rule
    /// runs before extension exclusion.
    fn accept(&self, record: &str) -> Option<String> {
        let normalized = paths::strip_project_prefix(
            &paths::join(self.base_dir, record),
            self.project_dir,
            self.ignore_case,
        );
        if self.exclusions.excludes_path(&normalized) {
            return None;
        }

        if let Some(asset_path) = paths::strip_sidecar(&normalized) {
            if paths::same_path_ignore_case(asset_path, self.target_path) {
                return None;
            }
            return Some(asset_path.to_string());
        }

        if self.exclusions.excludes_extension(&paths::extension(&normalized)) {
            return None;
        }
        Some(normalized)
    }
}

/// Dispatch to the parser for `format`
pub fn parse_output(format: OutputFormat, raw: &str, request: &ParseRequest<'_>) -> Vec<String> {
    match format {
        OutputFormat::PathList => parse_path_list(raw, request),
        OutputFormat::LineIndexed => parse_line_indexed(raw, request),
    }
}

/// Records split by `separator`, with line terminators and blank records removed
fn records<'r>(raw: &'r str, separator: &'r str) -> impl Iterator<Item = &'r str> + 'r {
    let pieces: Box<dyn Iterator<Item = &'r str> + 'r> = if separator.is_empty() {
        Box::new(std::iter::once(raw))
    } else {
        Box::new(raw.split(separator))
    };
    pieces
        .map(|record| record.trim_matches(|c| c == '\r' || c == '\n'))
        .filter(|record| !record.trim().is_empty())
}

/// Keeps first-seen order while dropping repeats
#[derive(Default)]
struct UniquePaths {
    seen: HashSet<String>,
    ordered: Vec<String>,
}

impl UniquePaths {
    fn push(&mut self, path: String) {
        if self.seen.insert(path.clone()) {
            self.ordered.push(path);
        }
    }

    fn into_vec(self) -> Vec<String> {
        self.ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_split_and_trim() {
        let split: Vec<&str> = records("a\0b\r\n\0\0 \0c", "\0").collect();
        assert_eq!(split, vec!["a", "b", "c"]);

        let split: Vec<&str> = records("x\r\ny\r\n", "\n").collect();
        assert_eq!(split, vec!["x", "y"]);
    }

    #[test]
    fn test_parse_output_dispatch() {
        let exclusions = ExclusionPolicy::empty();
        let request = ParseRequest {
            separator: "\n",
            project_dir: "C:\\Proj",
            base_dir: "C:\\Proj\\Assets",
            target_path: "Assets/A.png",
            exclusions: &exclusions,
            ignore_case: true,
        };
        let raw = "C:\\Proj\\Assets\\X.prefab:1:guid\nC:\\Proj\\Assets\\X.prefab:2:guid\n";
        assert_eq!(
            parse_output(OutputFormat::LineIndexed, raw, &request),
            vec!["Assets/X.prefab"]
        );
    }
}
