//! Command-line definition.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Project context memory shared with AI coding assistants.
#[derive(Parser, Debug)]
#[command(name = "aictx", version, about, arg_required_else_help = true)]
pub struct Cli {
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Append a timestamped entry to the context log and sync providers.
    Store {
        /// Entry category, e.g. `architecture`.
        category: String,
        /// Entry text; multiple words are joined with spaces.
        #[arg(required = true, num_args = 1..)]
        content: Vec<String>,
        /// Store even if the entry looks like it contains a credential.
        #[arg(long)]
        allow_secrets: bool,
    },

    /// Record a documentation file's modification time and size.
    Doc {
        /// File to record.
        path: PathBuf,
        /// What the file documents.
        description: Option<String>,
        /// Store even if the description looks like it contains a credential.
        #[arg(long)]
        allow_secrets: bool,
    },

    /// List documentation files modified recently.
    RecentDocs {
        /// Look-back window in days.
        days: Option<u32>,
    },

    /// Print the context log, or only entries matching a filter.
    Retrieve {
        /// Case-insensitive text to look for.
        filter: Option<String>,
    },

    /// Show entry count, provider files, and safety checks.
    Status,

    /// Point every provider file at the context log.
    Sync,

    /// Copy existing provider file content into the log, then sync.
    Import,
}
