pub mod backend;
pub mod cli;
pub mod config;
pub mod display;
pub mod driver;
pub mod error;
pub mod filters;
pub mod parsers;
pub mod process;
pub mod progress;
pub mod project;
pub mod resolver;
pub mod types;

// 公開API
pub use backend::{CommandDescriptor, OutputFormat, SearchBackend};
pub use config::{ExcludeSettings, SearchConfig};
pub use driver::{find_references, SearchDriver};
pub use error::{RefViewError, Result};
pub use filters::ExclusionPolicy;
pub use progress::{CancelToken, ConsoleProgress, ProgressReporter};
pub use project::{EntityResolver, FsProject, PathResolver, ProjectLayout};
pub use resolver::resolve_targets;
pub use types::*;
