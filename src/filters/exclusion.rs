use glob::Pattern;

/// Extension and path exclusions applied to search output.
///
/// Extensions are stored lowercase with a leading dot (`.png`). Path globs are
/// stored with a leading `*` so a project-relative pattern such as
/// `Assets/StreamingAssets/*` also matches an absolute path.
#[derive(Debug, Clone, Default)]
pub struct ExclusionPolicy {
    extensions: Vec<String>,
    path_globs: Vec<String>,
    compiled_globs: Vec<Pattern>,
}

impl ExclusionPolicy {
    /// Policy that excludes nothing
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new<E, G>(extensions: E, path_globs: G) -> Self
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        G: IntoIterator,
        G::Item: AsRef<str>,
    {
        let mut policy = Self::default();
        for extension in extensions {
            if let Some(normalized) = normalize_extension(extension.as_ref()) {
                if !policy.extensions.contains(&normalized) {
                    policy.extensions.push(normalized);
                }
            }
        }
        for glob in path_globs {
            let glob = glob.as_ref().trim();
            if glob.is_empty() {
                continue;
            }
            let anchored = if glob.starts_with('*') {
                glob.to_string()
            } else {
                format!("*{}", glob)
            };
            if policy.path_globs.contains(&anchored) {
                continue;
            }
            match Pattern::new(&anchored) {
                Ok(pattern) => policy.compiled_globs.push(pattern),
                Err(e) => log::warn!("Ignoring invalid exclude pattern '{}': {}", anchored, e),
            }
            policy.path_globs.push(anchored);
        }
        policy
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn path_globs(&self) -> &[String] {
        &self.path_globs
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty() && self.path_globs.is_empty()
    }

    /// `extension` is compared lowercase and must carry its leading dot
    pub fn excludes_extension(&self, extension: &str) -> bool {
        !extension.is_empty()
            && self
                .extensions
                .iter()
                .any(|excluded| excluded.eq_ignore_ascii_case(extension))
    }

    pub fn excludes_path(&self, path: &str) -> bool {
        self.compiled_globs.iter().any(|glob| glob.matches(path))
    }

    /// Patterns for tools with a native exclude flag: every extension as a
    /// `*.ext` glob, followed by the path globs.
    pub fn native_exclude_patterns(&self) -> Vec<String> {
        self.extensions
            .iter()
            .map(|extension| format!("*{}", extension))
            .chain(self.path_globs.iter().cloned())
            .collect()
    }
}

fn normalize_extension(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "." {
        return None;
    }
    let lower = trimmed.to_lowercase();
    if lower.starts_with('.') {
        Some(lower)
    } else {
        Some(format!(".{}", lower))
    }
}
