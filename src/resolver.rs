//! Expands a selection into the sorted list of files to search

use crate::error::{RefViewError, Result};
use crate::parsers::paths::{strip_sidecar, to_forward_slashes};
use crate::project::PathResolver;
use crate::types::SearchTarget;

/// Resolve selected identifiers into search targets.
///
/// Files become targets directly; directories contribute every file below
/// them (sidecars excluded) and never appear themselves. The result is
/// deduplicated by path and sorted in ordinal path order, which is the order
/// the project browser lists assets in.
pub fn resolve_targets<R>(resolver: &R, selection: &[String]) -> Result<Vec<SearchTarget>>
where
    R: PathResolver + ?Sized,
{
    if selection.is_empty() {
        return Err(RefViewError::SelectionEmpty);
    }

    let mut targets = Vec::new();
    for identifier in selection {
        let Some(path) = resolver.path_of(identifier) else {
            log::warn!("Selected entry '{}' does not resolve to a path, skipping", identifier);
            continue;
        };
        let path = to_forward_slashes(&path);

        if !resolver.is_directory(&path) {
            targets.push(SearchTarget::new(identifier.clone(), path));
            continue;
        }

        // ディレクトリ選択時は中のファイルを全て対象にする
        for file in resolver.list_files(&path) {
            let file = to_forward_slashes(&file);
            if strip_sidecar(&file).is_some() {
                continue;
            }
            match resolver.identifier_of(&file) {
                Some(file_identifier) => targets.push(SearchTarget::new(file_identifier, file)),
                None => log::debug!("No identifier for {}, skipping", file),
            }
        }
    }

    targets.sort();
    targets.dedup();

    if targets.is_empty() {
        return Err(RefViewError::SelectionEmpty);
    }
    log::debug!("Resolved {} selected entries into {} targets", selection.len(), targets.len());
    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::MockPathResolver;
    use mockall::predicate::eq;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn file_resolver() -> MockPathResolver {
        let mut resolver = MockPathResolver::new();
        resolver
            .expect_path_of()
            .returning(|id| Some(format!("Assets/{}.png", id)));
        resolver.expect_is_directory().returning(|_| false);
        resolver
    }

    #[test]
    fn test_empty_selection_is_rejected() {
        let resolver = MockPathResolver::new();
        let err = resolve_targets(&resolver, &[]).unwrap_err();
        assert!(matches!(err, RefViewError::SelectionEmpty));
    }

    #[test]
    fn test_files_are_sorted_and_deduplicated() {
        let resolver = file_resolver();
        let targets = resolve_targets(&resolver, &ids(&["c", "a", "b", "a"])).unwrap();
        let paths: Vec<&str> = targets.iter().map(|t| t.path.as_str()).collect();
        assert_eq!(paths, vec!["Assets/a.png", "Assets/b.png", "Assets/c.png"]);
        assert_eq!(targets[0].identifier, "a");
    }

    #[test]
    fn test_directory_expands_to_files_only() {
        let mut resolver = MockPathResolver::new();
        resolver
            .expect_path_of()
            .with(eq("dir-guid"))
            .returning(|_| Some("Assets/Textures".to_string()));
        resolver
            .expect_path_of()
            .with(eq("z-guid"))
            .returning(|_| Some("Assets/Textures/Sub/Z.png".to_string()));
        resolver
            .expect_is_directory()
            .returning(|path| path == "Assets/Textures");
        resolver.expect_list_files().with(eq("Assets/Textures")).returning(|_| {
            vec![
                "Assets/Textures/B.png".to_string(),
                "Assets/Textures/B.png.meta".to_string(),
                "Assets/Textures/Sub/Z.png".to_string(),
                "Assets/Textures/A.png".to_string(),
                "Assets/Textures/NoGuid.txt".to_string(),
            ]
        });
        resolver
            .expect_identifier_of()
            .returning(|path| match path {
                "Assets/Textures/NoGuid.txt" => None,
                other => Some(format!("id:{}", other)),
            });

        let targets = resolve_targets(&resolver, &ids(&["dir-guid", "z-guid"])).unwrap();
        let paths: Vec<&str> = targets.iter().map(|t| t.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "Assets/Textures/A.png",
                "Assets/Textures/B.png",
                "Assets/Textures/Sub/Z.png",
            ]
        );
        assert!(!paths.contains(&"Assets/Textures"));
    }

    #[test]
    fn test_unresolvable_selection_is_empty() {
        let mut resolver = MockPathResolver::new();
        resolver.expect_path_of().returning(|_| None);
        let err = resolve_targets(&resolver, &ids(&["gone"])).unwrap_err();
        assert!(matches!(err, RefViewError::SelectionEmpty));
    }

    #[test]
    fn test_backslash_paths_are_normalized() {
        let mut resolver = MockPathResolver::new();
        resolver
            .expect_path_of()
            .returning(|_| Some("Assets\\Models\\M.fbx".to_string()));
        resolver.expect_is_directory().returning(|_| false);
        let targets = resolve_targets(&resolver, &ids(&["m"])).unwrap();
        assert_eq!(targets[0].path, "Assets/Models/M.fbx");
    }
}
