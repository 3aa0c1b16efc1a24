use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command-line client for the iControl REST control plane.
#[derive(Debug, Parser)]
#[command(name = "icontrol", version, about)]
pub struct Cli {
    /// TOML connection settings; defaults to the platform config dir.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log everything, including each request.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Also write plain-text logs to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// GET a path relative to the endpoint, e.g. /mgmt/tm/ltm/virtual/~Common~v1
    Get {
        path: String,
        /// Resolve top-level *Reference fields.
        #[arg(long)]
        expand: bool,
    },

    /// List LTM pools.
    Pools {
        #[arg(long)]
        expand_subcollections: bool,
    },

    /// Run a JSON array of {method, path, body} operations in one transaction.
    Apply { file: PathBuf },

    /// Delete a transaction by id.
    Rollback { id: String },
}
