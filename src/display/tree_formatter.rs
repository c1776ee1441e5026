use super::utils::{paint, Color};
use crate::backend::SearchBackend;
use crate::types::{AssetReferenceRecord, References, SearchResult};

pub const HEADER_TITLE: &str = "【Find References In Project - Result】";

pub const CONTENT_INDEX_NOTE: &str = "Spotlight may not find every reference, for example when \
files under the assets directory have not been indexed yet. Use the grep backend for an exact search.";

/// Renders a search result as a collapsible text tree.
///
/// Collapsed records show only their reference count; expanded records list
/// each reference, with unresolvable ones marked `(Missing)`.
pub struct TreeFormatter {
    enable_colors: bool,
}

impl TreeFormatter {
    pub fn new(enable_colors: bool) -> Self {
        Self { enable_colors }
    }

    pub fn format(&self, result: &SearchResult) -> String {
        let mut lines = vec![format!("{} ({})", HEADER_TITLE, result.backend)];

        for record in result.assets() {
            // 削除済みのアセットは表示しない
            if record.entity.is_none() {
                continue;
            }
            self.format_record(record, &mut lines);
        }

        if result.is_cancelled() {
            lines.push(String::new());
            lines.push(paint(
                &format!("Search cancelled after {} assets; results are partial.", result.assets().len()),
                Color::Yellow,
                self.enable_colors,
            ));
        }
        if result.backend == SearchBackend::ContentIndexSearch {
            lines.push(String::new());
            lines.push(paint(CONTENT_INDEX_NOTE, Color::Gray, self.enable_colors));
        }
        lines.join("\n")
    }

    fn format_record(&self, record: &AssetReferenceRecord, lines: &mut Vec<String>) {
        let name = record
            .entity
            .as_ref()
            .map(|entity| entity.display_name.as_str())
            .unwrap_or(record.target.file_name());
        let label = format!("{} {}", name, paint(&record.target.path, Color::Gray, self.enable_colors));

        match record.references() {
            References::NotSearched | References::Empty => {
                lines.push(format!("  {} (No References)", label));
            }
            References::Found(entries) => {
                let marker = if record.is_expanded { "▼" } else { "▶" };
                lines.push(format!("{} {} ({})", marker, label, entries.len()));
                if !record.is_expanded {
                    return;
                }
                for entry in entries {
                    match &entry.entity {
                        Some(entity) => lines.push(format!(
                            "    {} {}",
                            entity.display_name,
                            paint(&entry.path, Color::Blue, self.enable_colors)
                        )),
                        None => lines.push(format!(
                            "    {} {}",
                            paint("(Missing)", Color::Red, self.enable_colors),
                            entry.path
                        )),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AssetReferenceRecord, EntityHandle, ReferenceEntry, SearchTarget};

    fn entity(path: &str, name: &str) -> Option<EntityHandle> {
        Some(EntityHandle {
            path: path.to_string(),
            display_name: name.to_string(),
        })
    }

    fn sample_result(backend: SearchBackend) -> SearchResult {
        let mut result = SearchResult::new(backend);

        let mut found = AssetReferenceRecord::new(
            SearchTarget::new("a", "Assets/A.png"),
            entity("Assets/A.png", "A"),
        );
        found.add_reference(ReferenceEntry {
            path: "Assets/B.prefab".to_string(),
            entity: entity("Assets/B.prefab", "B"),
        });
        found.add_reference(ReferenceEntry {
            path: "Assets/Gone.prefab".to_string(),
            entity: None,
        });
        found.finish();
        result.push(found);

        let mut empty = AssetReferenceRecord::new(
            SearchTarget::new("c", "Assets/C.png"),
            entity("Assets/C.png", "C"),
        );
        empty.finish();
        result.push(empty);

        let mut deleted = AssetReferenceRecord::new(SearchTarget::new("d", "Assets/D.png"), None);
        deleted.finish();
        result.push(deleted);
        result
    }

    #[test]
    fn test_collapsed_output() {
        let output = TreeFormatter::new(false).format(&sample_result(SearchBackend::GrepSearch));
        assert!(output.starts_with(HEADER_TITLE));
        assert!(output.contains("▶ A Assets/A.png (2)"));
        assert!(output.contains("C Assets/C.png (No References)"));
        assert!(!output.contains("Assets/B.prefab"));
        assert!(!output.contains("Assets/D.png"));
        assert!(!output.contains(CONTENT_INDEX_NOTE));
    }

    #[test]
    fn test_expanded_output_marks_missing() {
        let mut result = sample_result(SearchBackend::ContentIndexSearch);
        result.set_all_expanded(true);
        let output = TreeFormatter::new(false).format(&result);
        assert!(output.contains("▼ A Assets/A.png (2)"));
        assert!(output.contains("    B Assets/B.prefab"));
        assert!(output.contains("    (Missing) Assets/Gone.prefab"));
        assert!(output.contains(CONTENT_INDEX_NOTE));
    }

    #[test]
    fn test_cancelled_note() {
        let mut result = sample_result(SearchBackend::GrepSearch);
        result.completion = crate::types::SearchCompletion::Cancelled;
        let output = TreeFormatter::new(false).format(&result);
        assert!(output.contains("Search cancelled after 3 assets"));
    }
}
