use super::{records, ParseRequest, UniquePaths};

/// Parse output of tools that print one matching file per record
/// (mdfind, grep -l, git grep -l).
pub fn parse_path_list(raw: &str, request: &ParseRequest<'_>) -> Vec<String> {
    let mut references = UniquePaths::default();
    for record in records(raw, request.separator) {
        if let Some(path) = request.accept(record) {
            references.push(path);
        }
    }
    references.into_vec()
}
