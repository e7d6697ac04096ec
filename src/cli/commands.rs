//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Solidafy Pager CLI
#[derive(Parser, Debug)]
#[command(name = "solidafy-pager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Listing definition file (YAML)
    #[arg(short, long, global = true)]
    pub listing: Option<PathBuf>,

    /// Override a query variable (key=value, value parsed as JSON when possible)
    #[arg(long = "var", global = true, value_parser = parse_key_value)]
    pub vars: Vec<(String, String)>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Jump to a page
    Page {
        /// Page number
        #[arg(short, long, default_value = "1")]
        page: u32,
    },

    /// Jump to a page, then load further pages onto it
    More {
        /// First page
        #[arg(long, default_value = "1")]
        from: u32,

        /// Number of pages to load after the first one
        #[arg(long, default_value = "1")]
        pages: u32,
    },

    /// Validate listing definition
    Validate,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Human-readable output
    Pretty,
}

/// Parse a `key=value` pair
fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}
