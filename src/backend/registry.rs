use super::SearchBackend;
use crate::error::{RefViewError, Result};
use crate::filters::ExclusionPolicy;

/// Newline the line-oriented Windows tools terminate records with
#[cfg(windows)]
pub const PLATFORM_NEWLINE: &str = "\r\n";
#[cfg(not(windows))]
pub const PLATFORM_NEWLINE: &str = "\n";

const NUL: &str = "\0";

const ROOT_PLACEHOLDER: &str = "{root}";
const TOKEN_PLACEHOLDER: &str = "{token}";
const EXCLUDE_PLACEHOLDER: &str = "{exclude}";

/// Directory a tool's relative output paths are relative to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeBase {
    /// The project directory (parent of the search root)
    ProjectDir,
    /// The directory substituted for `{root}`, which is also the working directory
    SearchRoot,
}

/// How to invoke one external search tool.
///
/// The argument template uses shell-style quoting and the placeholders
/// `{root}`, `{token}` and `{exclude}`. It is tokenized before substitution,
/// so a root path containing spaces stays a single argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    pub backend: SearchBackend,
    pub executable: String,
    pub argument_template: &'static str,
    pub record_separator: &'static str,
    pub relative_to: RelativeBase,
}

impl CommandDescriptor {
    /// Same descriptor with a different executable (e.g. an absolute path)
    pub fn with_executable(&self, executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            ..self.clone()
        }
    }

    /// Render the argument vector for one target.
    ///
    /// Exclusion arguments replace `{exclude}` when the template has one and
    /// are appended otherwise.
    pub fn build_arguments(&self, root: &str, token: &str, exclusions: &ExclusionPolicy) -> Vec<String> {
        let extra = split_arguments(&extra_arguments(self.backend, exclusions));
        let mut args = Vec::new();
        let mut spliced = false;

        for part in split_arguments(self.argument_template) {
            if part == EXCLUDE_PLACEHOLDER {
                args.extend(extra.iter().cloned());
                spliced = true;
                continue;
            }
            args.push(
                part.replace(ROOT_PLACEHOLDER, root)
                    .replace(TOKEN_PLACEHOLDER, token),
            );
        }
        if !spliced {
            args.extend(extra);
        }
        args
    }

    /// Human readable command line for logs
    pub fn command_line(&self, args: &[String]) -> String {
        std::iter::once(self.executable.as_str())
            .chain(args.iter().map(String::as_str))
            .map(|part| {
                if part.is_empty() || part.contains(char::is_whitespace) {
                    format!("'{}'", part)
                } else {
                    part.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

struct DescriptorEntry {
    backend: SearchBackend,
    executable: &'static str,
    argument_template: &'static str,
    record_separator: &'static str,
    relative_to: RelativeBase,
}

const DESCRIPTORS: &[DescriptorEntry] = &[
    DescriptorEntry {
        backend: SearchBackend::ContentIndexSearch,
        executable: "mdfind",
        argument_template: "-onlyin '{root}' -0 {token}",
        record_separator: NUL,
        relative_to: RelativeBase::ProjectDir,
    },
    DescriptorEntry {
        backend: SearchBackend::GrepSearch,
        executable: "grep",
        argument_template: "{exclude} {token} -rl --null '{root}'",
        record_separator: NUL,
        relative_to: RelativeBase::ProjectDir,
    },
    DescriptorEntry {
        backend: SearchBackend::GrepWithVersionControl,
        executable: "git",
        argument_template: "-C '{root}' grep -z -l {token}",
        record_separator: NUL,
        relative_to: RelativeBase::SearchRoot,
    },
    DescriptorEntry {
        backend: SearchBackend::LineIndexSearch,
        executable: "findstr.exe",
        argument_template: "/M /S {token} *",
        record_separator: PLATFORM_NEWLINE,
        relative_to: RelativeBase::SearchRoot,
    },
    DescriptorEntry {
        backend: SearchBackend::VersionControlGrepWindows,
        executable: "git.exe",
        argument_template: "-C \"{root}\" grep -z -l {token}",
        record_separator: NUL,
        relative_to: RelativeBase::SearchRoot,
    },
];

/// Look up the command descriptor registered for `backend`
pub fn descriptor_for(backend: SearchBackend) -> Result<CommandDescriptor> {
    DESCRIPTORS
        .iter()
        .find(|entry| entry.backend == backend)
        .map(|entry| CommandDescriptor {
            backend: entry.backend,
            executable: entry.executable.to_string(),
            argument_template: entry.argument_template,
            record_separator: entry.record_separator,
            relative_to: entry.relative_to,
        })
        .ok_or_else(|| {
            RefViewError::configuration(format!("No command registered for backend '{}'", backend))
        })
}

/// Native exclusion flags for tools that support them.
///
/// Only grep takes exclusions on its command line; every other backend
/// relies on post-filtering and gets an empty string.
pub fn extra_arguments(backend: SearchBackend, exclusions: &ExclusionPolicy) -> String {
    match backend {
        SearchBackend::GrepSearch => exclusions
            .native_exclude_patterns()
            .iter()
            .map(|pattern| format!("--exclude='{}'", pattern))
            .collect::<Vec<_>>()
            .join(" "),
        _ => String::new(),
    }
}

/// Split a command string into arguments, honouring single and double quotes.
///
/// Quotes group characters and are removed; there are no escape sequences, so
/// Windows paths pass through untouched.
pub fn split_arguments(command: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;

    for c in command.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '\'' || c == '"' => {
                quote = Some(c);
                in_token = true;
            }
            None if c.is_whitespace() => {
                if in_token {
                    args.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if in_token {
        args.push(current);
    }
    args
}
