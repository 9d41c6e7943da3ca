//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the gerritapi binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::pagination::DEFAULT_MAX_PAGES;

/// Gerrit API command-line interface.
#[derive(Parser, Debug)]
#[command(name = "gerritapi", about = "Gerrit REST API CLI", version)]
pub struct Cli {
    /// Gerrit server name/IP or base URL.
    #[arg(short = 's', long = "servername", env = "GERRIT_SERVER")]
    pub server: String,

    /// Gerrit login username.
    #[arg(short = 'u', long = "user", env = "GERRIT_USERNAME")]
    pub user: Option<String>,

    /// Gerrit login password.
    #[arg(short = 'p', long, env = "GERRIT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Verify the server's TLS certificate.
    #[arg(long, global = true)]
    pub verify_tls: bool,

    /// Maximum number of pages fetched per query.
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_PAGES)]
    pub max_pages: u32,

    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Log requests and responses.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Export the changes of a recent period to CSV.
    Changes {
        /// Period to fetch: Minutes, Hours, Days or Months, e.g. 120Minutes, 48Hours, 2Days, 1Month.
        #[arg(short = 'd', long, default_value = "24Hours")]
        duration: String,

        /// CSV file to write.
        #[arg(short = 'o', long, default_value = "new_commits.csv")]
        output: PathBuf,
    },

    /// Export every change of one repository to CSV.
    RepoChanges {
        /// Repository name.
        repo: String,

        /// CSV file to write.
        #[arg(short = 'o', long, default_value = "repo_commits.csv")]
        output: PathBuf,
    },

    /// List projects.
    Projects {
        /// Only list active projects.
        #[arg(long)]
        active: bool,
    },

    /// Show a single project.
    Project {
        /// Project name.
        name: String,
    },

    /// List active accounts with their details.
    Accounts,
}
