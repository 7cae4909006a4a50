//! CLI command definitions using clap.
//!
//! - serve: run the HTTP server (default)
//! - export: dump one owner's checklists as JSON
//! - sessions purge: delete expired sessions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Ticklist - personal checklists behind a JSON API
#[derive(Parser, Debug)]
#[command(name = "ticklist")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        /// Address to listen on, overriding server.bind
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Print every checklist of one owner as JSON
    Export {
        /// Owner (user id) whose checklists to export
        #[arg(short, long)]
        owner: String,
    },

    /// Session maintenance
    Sessions {
        #[command(subcommand)]
        command: SessionCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum SessionCommands {
    /// Delete expired sessions
    Purge,
}
