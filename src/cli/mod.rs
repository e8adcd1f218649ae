//! CLI module - Command-line interface for movie-trends
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// movie-trends - counts movie searches and serves the trending list
#[derive(Parser)]
#[command(name = "movie-trends")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP API (default)
    #[command(alias = "daemon")]
    Serve,

    /// Print the current trending list
    #[command(alias = "t")]
    Trending,

    /// Create default config file
    Init,
}

pub use commands::*;
