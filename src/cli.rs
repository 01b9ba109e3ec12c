//! Command-line interface definition for Parlor
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for interactive chat and configuration inspection.

use clap::{Parser, Subcommand};

/// Parlor - Interactive chat session CLI
///
/// Manage chat sessions against mock AI and search backends from an
/// interactive terminal prompt.
#[derive(Parser, Debug, Clone)]
#[command(name = "parlor")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/parlor.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Parlor
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the interactive chat prompt
    Chat {
        /// Sign in as this email before the prompt starts
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Print the effective configuration as YAML
    Config,
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
