//! Command-line definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "fstore")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Store, fetch and search named items in a sharded directory tree")]
pub(crate) struct Cli {
    /// Configuration file. Defaults to an optional `fstore.*` in the working directory.
    #[arg(long, short, global = true)]
    pub(crate) config: Option<PathBuf>,

    /// Storage root, overriding `storage.root_path`.
    #[arg(long, global = true)]
    pub(crate) root: Option<PathBuf>,

    /// Shard depth, overriding `storage.imbrication_level`.
    #[arg(long, global = true)]
    pub(crate) imbrication_level: Option<usize>,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Store the content of FILE under a new NAME
    Create { name: String, file: PathBuf },
    /// Write the content of NAME to stdout or a file
    Read {
        name: String,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Replace the content of an existing NAME with FILE
    Update { name: String, file: PathBuf },
    /// Remove NAME
    Delete { name: String },
    /// Print the number of stored items
    Count,
    /// Print every name fully matching PATTERN, one per line
    Scan { pattern: String },
}
