//! Path normalization shared by every output parser.
//!
//! Tool output is handled as plain strings: a Windows tool's output may be
//! parsed on any host, so `std::path` semantics of the current platform do
//! not apply.

/// Extension of the sidecar metadata file kept next to every asset
pub const SIDECAR_EXTENSION: &str = ".meta";

pub fn to_forward_slashes(path: &str) -> String {
    path.replace('\\', "/")
}

/// Rooted posix path, UNC/backslash-rooted path, or drive-letter path
pub fn is_absolute(path: &str) -> bool {
    if path.starts_with('/') || path.starts_with('\\') {
        return true;
    }
    has_drive_prefix(path)
}

/// `C:` style prefix
pub fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Join `relative` onto `base` unless it is already absolute
pub fn join(base: &str, relative: &str) -> String {
    if is_absolute(relative) || base.is_empty() {
        return relative.to_string();
    }
    let relative = relative.strip_prefix("./").unwrap_or(relative);
    let relative = relative.strip_prefix(".\\").unwrap_or(relative);
    format!("{}/{}", base.trim_end_matches(['/', '\\']), relative)
}

/// Strip `project_dir` from the front of `path`, leaving a project-relative
/// forward-slash path. Paths outside the project are returned unchanged
/// (separators still normalized).
pub fn strip_project_prefix(path: &str, project_dir: &str, ignore_case: bool) -> String {
    let path = to_forward_slashes(path);
    let mut prefix = to_forward_slashes(project_dir);
    if prefix.is_empty() {
        return path;
    }
    if !prefix.ends_with('/') {
        prefix.push('/');
    }

    let matches = match path.get(..prefix.len()) {
        Some(head) if ignore_case => head.to_lowercase() == prefix.to_lowercase(),
        Some(head) => head == prefix,
        None => false,
    };
    if matches {
        path[prefix.len()..].to_string()
    } else {
        path
    }
}

/// Lowercase extension of the final path component including the dot,
/// or an empty string
pub fn extension(path: &str) -> String {
    let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    match file_name.rfind('.') {
        Some(index) if index + 1 < file_name.len() => file_name[index..].to_lowercase(),
        _ => String::new(),
    }
}

/// Asset path described by a sidecar metadata path
pub fn strip_sidecar(path: &str) -> Option<&str> {
    let split = path.len().checked_sub(SIDECAR_EXTENSION.len())?;
    let suffix = path.get(split..)?;
    if suffix.eq_ignore_ascii_case(SIDECAR_EXTENSION) {
        Some(&path[..split])
    } else {
        None
    }
}

pub fn same_path_ignore_case(a: &str, b: &str) -> bool {
    a.len() == b.len() && a.to_lowercase() == b.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_absolute() {
        assert!(is_absolute("/Users/me/Proj/Assets/A.png"));
        assert!(is_absolute("C:\\Proj\\Assets\\A.png"));
        assert!(is_absolute("c:/Proj"));
        assert!(is_absolute("\\\\server\\share"));
        assert!(!is_absolute("Assets/A.png"));
        assert!(!is_absolute("A.png"));
    }

    #[test]
    fn test_join() {
        assert_eq!(join("/Proj", "Assets/B.prefab"), "/Proj/Assets/B.prefab");
        assert_eq!(join("/Proj/", "./Assets/B.prefab"), "/Proj/Assets/B.prefab");
        assert_eq!(join("/Proj", "/Other/B.prefab"), "/Other/B.prefab");
        assert_eq!(join("C:\\Proj\\Assets\\", "Sub\\X.prefab"), "C:\\Proj\\Assets/Sub\\X.prefab");
        assert_eq!(join("", "Assets/B.prefab"), "Assets/B.prefab");
    }

    #[test]
    fn test_strip_project_prefix() {
        assert_eq!(strip_project_prefix("/Proj/Assets/B.prefab", "/Proj", false), "Assets/B.prefab");
        assert_eq!(strip_project_prefix("/Proj/Assets/B.prefab", "/Proj/", false), "Assets/B.prefab");
        assert_eq!(
            strip_project_prefix("C:\\Proj\\Assets\\X.prefab", "C:\\Proj\\", true),
            "Assets/X.prefab"
        );
        assert_eq!(
            strip_project_prefix("c:\\proj\\Assets\\X.prefab", "C:\\Proj", true),
            "Assets/X.prefab"
        );
        // Case matters on posix style backends
        assert_eq!(strip_project_prefix("/proj/Assets/B.prefab", "/Proj", false), "/proj/Assets/B.prefab");
        // Outside the project
        assert_eq!(strip_project_prefix("/Elsewhere/B.prefab", "/Proj", false), "/Elsewhere/B.prefab");
    }

    #[test]
    fn test_extension() {
        assert_eq!(extension("Assets/A.png.meta"), ".meta");
        assert_eq!(extension("Assets/A.PNG"), ".png");
        assert_eq!(extension("Assets/Makefile"), "");
        assert_eq!(extension("Assets.d/Makefile"), "");
        assert_eq!(extension("C:\\Proj\\Assets\\X.prefab"), ".prefab");
        assert_eq!(extension("Assets/trailing."), "");
    }

    #[test]
    fn test_strip_sidecar() {
        assert_eq!(strip_sidecar("Assets/A.png.meta"), Some("Assets/A.png"));
        assert_eq!(strip_sidecar("Assets/A.png.META"), Some("Assets/A.png"));
        assert_eq!(strip_sidecar("Assets/A.png"), None);
        assert_eq!(strip_sidecar("meta"), None);
    }

    #[test]
    fn test_same_path_ignore_case() {
        assert!(same_path_ignore_case("Assets/A.png", "assets/a.PNG"));
        assert!(!same_path_ignore_case("Assets/A.png", "Assets/B.png"));
    }
}
