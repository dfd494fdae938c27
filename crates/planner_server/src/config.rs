//! Command-line and environment configuration.

use clap::{Args, Parser, Subcommand};
use planner_core::{default_log_level, LogTarget, PhaseId};
use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "planner", version, about = "Study planner API server")]
pub struct Cli {
    /// SQLite database file.
    #[arg(long, env = "PLANNER_DB", default_value = "planner.sqlite3", global = true)]
    pub db: PathBuf,

    /// trace|debug|info|warn|error; defaults by build mode.
    #[arg(long, env = "PLANNER_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Absolute directory for rotating log files; stderr when unset.
    #[arg(long, env = "PLANNER_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the HTTP API.
    Serve(ServeArgs),
    /// Load a curriculum JSON document.
    Seed(SeedArgs),
    /// Print the curriculum tree.
    Phases,
    /// Delete one phase with its subjects, tasks and notes.
    DeletePhase {
        /// Phase id (not number).
        id: PhaseId,
    },
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    #[arg(long, env = "PLANNER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "PLANNER_PORT", default_value_t = 8000)]
    pub port: u16,
}

#[derive(Debug, Args)]
pub struct SeedArgs {
    /// Path to the curriculum document.
    pub file: PathBuf,

    /// Replace phases whose number already exists instead of failing.
    #[arg(long)]
    pub replace: bool,
}

impl Cli {
    pub fn effective_log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(default_log_level())
    }

    pub fn log_target(&self) -> LogTarget {
        match &self.log_dir {
            Some(dir) => LogTarget::Directory(dir.clone()),
            None => LogTarget::Stderr,
        }
    }
}

impl ServeArgs {
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}
