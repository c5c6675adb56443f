//! CLI module - Command-line interface for Reelbox
//!
//! This module provides a structured CLI using clap for argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Reelbox - in-memory movie catalogue over HTTP
#[derive(Debug, Parser)]
#[command(name = "reelbox")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to read instead of the default search paths
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Port to listen on (overrides config and PORT)
    #[arg(short, long, global = true)]
    pub port: Option<u16>,

    /// Seed dataset to load instead of the embedded one
    #[arg(long, global = true)]
    pub seed: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP server (default)
    #[command(alias = "s")]
    Serve,

    /// Print the seed catalogue
    #[command(alias = "ls", alias = "l")]
    List {
        /// Only movies tagged with this genre (case-insensitive)
        #[arg(short, long)]
        genre: Option<String>,
    },

    /// Write a default config.toml in the current directory
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_no_subcommand() {
        let cli = Cli::try_parse_from(["reelbox"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.port.is_none());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["reelbox", "serve", "--port", "8080"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Serve)));
        assert_eq!(cli.port, Some(8080));
    }

    #[test]
    fn test_list_genre() {
        let cli = Cli::try_parse_from(["reelbox", "ls", "-g", "drama"]).unwrap();
        match cli.command {
            Some(Commands::List { genre }) => assert_eq!(genre.as_deref(), Some("drama")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_invalid_port() {
        assert!(Cli::try_parse_from(["reelbox", "--port", "70000"]).is_err());
    }
}
