//! refview - Find References In Project
//!
//! Command-line usage:
//!   refview Assets/Textures/A.png          - Files referencing one asset
//!   refview Assets/Textures --expand       - Every asset in a folder, listed in full
//!   refview Assets/A.png --backend git-grep --json
//!   refview --backends                     - Installed search tools

use clap::Parser;
use refview::cli::{run, Cli};

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
