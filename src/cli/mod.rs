pub mod commands;
pub mod context;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Validate, template and ship a folder tree of application configurations.
#[derive(Parser, Debug)]
#[command(name = "acs", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode: only show errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to alternative config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the configuration service API
    #[arg(long, global = true, env = "ACS_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Bearer token for the configuration service
    #[arg(long, global = true, env = "ACS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that a configuration tree is well formed
    Validate {
        /// Root folder: <root>/<application>/<environment>/<file>
        root: PathBuf,
    },

    /// Render the infrastructure template for a configuration tree
    Build {
        /// Root folder of the configuration tree
        root: PathBuf,
        /// Folder the template is written to (created if missing)
        output: PathBuf,
        /// Handlebars template to render instead of the built-in one
        #[arg(long)]
        template: Option<PathBuf>,
    },

    /// Upload changed configuration files as new hosted versions
    Sync {
        /// Root folder of the configuration tree
        root: PathBuf,
    },

    /// Deploy the latest hosted versions that are not live yet
    Deploy {
        /// Only deploy the applications found in this tree
        root: Option<PathBuf>,
    },
}
