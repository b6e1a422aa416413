use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::Verbosity;
use tvshows_client::store::FileStore;

/// Log in to a TV show server and make authenticated requests against it
#[derive(Parser)]
pub struct Args {
    /// The URL of the server, without the trailing /api
    #[arg(long, short, env = "TVSHOWS_SERVER", global = true)]
    server: Option<String>,

    /// Where the access token and remembered credentials are kept.
    /// Defaults to the platform's local data directory.
    #[arg(long, env = "TVSHOWS_STORE", global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub verbose: Verbosity,
}

#[derive(Subcommand)]
pub enum Command {
    /// Log in and store the access token
    Login {
        /// The email to log in with. Falls back to remembered credentials.
        #[arg(long, short)]
        email: Option<String>,

        /// The password to log in with. It is discouraged to provide the
        /// password through the command line - by omitting it, it will be
        /// requested on execution.
        #[arg(long, short)]
        password: Option<String>,

        /// Remember the email and password for next time
        #[arg(long)]
        remember: bool,

        /// Delete any remembered email and password
        #[arg(long, conflicts_with = "remember")]
        forget: bool,
    },

    /// Remove the stored access token and credentials
    Logout,

    /// Send an authenticated GET request and print the JSON response
    Get {
        /// Path relative to the API root, e.g. shows/popular
        #[arg(index = 1)]
        path: String,
    },

    /// List the registered image assets
    Assets,
}

impl Args {
    /// API root derived from `--server`.
    pub fn base_url(&self) -> anyhow::Result<String> {
        let server = self
            .server
            .as_deref()
            .context("No server given, pass --server or set TVSHOWS_SERVER")?;
        Ok(format!("{}/api", server.trim_end_matches('/')))
    }

    pub fn store_path(&self) -> PathBuf {
        self.store.clone().unwrap_or_else(FileStore::default_path)
    }
}
