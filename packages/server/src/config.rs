//! Command-line configuration for the server binary.

use std::path::PathBuf;

use clap::Parser;

use crate::usecase::ValidationPolicy;

#[derive(Parser, Debug, Clone)]
#[command(name = "justone-server")]
#[command(about = "Room coordinator for a cooperative word-clue party game", long_about = None)]
pub struct ServerConfig {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    pub port: u16,

    /// Newline-separated secret word list (built-in list when omitted)
    #[arg(short = 'w', long)]
    pub wordlist: Option<PathBuf>,

    /// Reject events whose preconditions do not hold instead of applying them
    #[arg(long)]
    pub strict: bool,

    /// Default log level when RUST_LOG is not set
    #[arg(short = 'l', long, default_value = "debug")]
    pub log_level: String,
}

impl ServerConfig {
    pub fn validation_policy(&self) -> ValidationPolicy {
        ValidationPolicy::from_strict_flag(self.strict)
    }
}
