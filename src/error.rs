//! Error types shared by the reference search pipeline

use std::path::Path;
use std::time::Duration;

/// Failures that abort a reference search.
///
/// Cancellation is not represented here: a cancelled search returns the
/// partial result it has accumulated.
#[derive(Debug, thiserror::Error)]
pub enum RefViewError {
    /// Exclusion settings could not be loaded or a backend has no descriptor
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The selection resolved to no searchable targets
    #[error("Nothing to search: the selection is empty")]
    SelectionEmpty,

    /// The external tool could not be started or its output could not be read
    #[error("Failed to run '{executable}': {source}")]
    ProcessLaunch {
        executable: String,
        #[source]
        source: std::io::Error,
    },

    /// The external tool did not exit within the configured timeout
    #[error("'{executable}' did not finish within {timeout:?}")]
    TimedOut { executable: String, timeout: Duration },
}

impl RefViewError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub(crate) fn settings_io(path: &Path, err: std::io::Error) -> Self {
        Self::Configuration(format!(
            "Failed to load exclude settings {}: {}",
            path.display(),
            err
        ))
    }
}

pub type Result<T> = std::result::Result<T, RefViewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = RefViewError::configuration("no descriptor");
        assert_eq!(err.to_string(), "Configuration error: no descriptor");

        let err = RefViewError::ProcessLaunch {
            executable: "mdfind".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("mdfind"));
        assert!(std::error::Error::source(&err).is_some());

        let err = RefViewError::TimedOut {
            executable: "grep".to_string(),
            timeout: Duration::from_secs(3),
        };
        assert!(err.to_string().contains("3s"));
    }
}
