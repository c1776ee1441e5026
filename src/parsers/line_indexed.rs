use super::paths::has_drive_prefix;
use super::{records, ParseRequest, UniquePaths};

/// Parse `drive:path:line:content` output (findstr).
///
/// A tool prints one record per matching line, so the same file repeats;
/// every path is kept once, in first-seen order.
pub fn parse_line_indexed(raw: &str, request: &ParseRequest<'_>) -> Vec<String> {
    let mut references = UniquePaths::default();
    for record in records(raw, request.separator) {
        let Some(path) = matched_path(record) else {
            continue;
        };
        if let Some(path) = request.accept(path) {
            references.push(path);
        }
    }
    references.into_vec()
}

/// File part of a record: everything before the colon that follows the drive
/// separator. Records without line information (`findstr /M`) are the path
/// itself.
fn matched_path(record: &str) -> Option<&str> {
    let search_from = if has_drive_prefix(record) { 2 } else { 0 };
    let path = match record[search_from..].find(':') {
        Some(offset) => &record[..search_from + offset],
        None => record,
    };
    let path = path.trim();
    if path.is_empty() || (has_drive_prefix(path) && path.len() == 2) {
        return None;
    }
    Some(path)
}
