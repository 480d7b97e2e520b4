use std::path::PathBuf;

use clap::Parser;

/// Address the server always listens on.
pub const LISTEN_ADDR: &str = "127.0.0.1:4221";

/// Minimal HTTP/1.1 server with echo, user-agent and file endpoints
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory files are read from and written to
    #[arg(long)]
    pub directory: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub directory: PathBuf,
    pub listen_addr: String,
}

impl Config {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            listen_addr: LISTEN_ADDR.to_string(),
        }
    }

    /// Parse the command line into a configuration; exits on bad arguments.
    pub fn load() -> Self {
        Self::from(Cli::parse())
    }
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Self::new(cli.directory)
    }
}
