//! CLI argument definitions for Taskmate.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Long version string with build metadata.
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("TASKMATE_GIT_COMMIT"),
    "\nbuilt: ",
    env!("TASKMATE_BUILD_TIMESTAMP"),
);

/// Taskmate - a small server-rendered task tracker.
///
/// Run `taskmate init` once, seed statuses with `taskmate status create`,
/// then start the web server with `taskmate serve`.
#[derive(Parser, Debug)]
#[command(name = "taskmate")]
#[command(author, version, long_version = LONG_VERSION, about = "A server-rendered task tracker", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Config file to read instead of ~/.config/taskmate/config.kdl
    #[arg(long, global = true, env = "TASKMATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// SQLite database file (overrides the config file)
    #[arg(long, global = true, env = "TASKMATE_DATABASE")]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the database and its schema
    Init,

    /// Run the web server
    Serve {
        /// Host address to bind to (use 0.0.0.0 for network access)
        #[arg(long, env = "TASKMATE_HOST")]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long, env = "TASKMATE_PORT")]
        port: Option<u16>,
    },

    /// User management commands
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Status management commands
    Status {
        #[command(subcommand)]
        command: CatalogCommands,
    },

    /// Label management commands
    Label {
        #[command(subcommand)]
        command: CatalogCommands,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// User subcommands
#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Register a user
    Create(UserCreateArgs),

    /// List users
    List,
}

#[derive(Args, Debug)]
pub struct UserCreateArgs {
    /// Login name (letters, digits and @/./+/-/_)
    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    /// Password (prefer the TASKMATE_PASSWORD environment variable)
    #[arg(long, env = "TASKMATE_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// Status and label subcommands
#[derive(Subcommand, Debug)]
pub enum CatalogCommands {
    /// Add an entry
    Create {
        /// Unique name
        name: String,
    },

    /// List entries
    List,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the resolved configuration and where each value came from
    Show,
}
