//! CLI interface for the job hunter

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "job-hunter")]
#[command(about = "Find, score and apply to internships with tailored resumes and cover letters")]
#[command(long_about = "Discovers job postings, scores them against your profile, tailors a resume and cover letter for each match, tracks applications and sends a digest")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline once
    Run {
        /// Search query (repeatable); defaults to the configured queries
        #[arg(short, long = "query")]
        queries: Vec<String>,

        /// Discover and score only: nothing is generated, tracked or sent
        #[arg(long)]
        dry_run: bool,

        /// Skip semantic scoring (keywords only)
        #[arg(long)]
        no_embeddings: bool,

        /// Minimum relevance score (0-100) overriding the configuration
        #[arg(short, long, value_parser = parse_threshold)]
        threshold: Option<f64>,

        /// Extra JSON posting file to search (repeatable)
        #[arg(short, long = "postings")]
        postings: Vec<PathBuf>,
    },

    /// Score postings from a JSON file and show every component
    Score {
        /// JSON array of postings
        #[arg(short, long)]
        postings: PathBuf,

        /// Minimum relevance score (0-100) overriding the configuration
        #[arg(short, long, value_parser = parse_threshold)]
        threshold: Option<f64>,

        /// Skip semantic scoring (keywords only)
        #[arg(long)]
        no_embeddings: bool,
    },

    /// Summarise tracked applications by status
    Status,

    /// Run now, then at every configured daily time
    Schedule {
        /// Skip semantic scoring (keywords only)
        #[arg(long)]
        no_embeddings: bool,
    },

    /// Embedding model management
    Models {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ModelAction {
    /// List available embedding models
    List,

    /// Download an embedding model
    Download {
        /// Model id or HuggingFace repo ID
        model: String,

        /// Force re-download if model exists
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Parse a relevance threshold within 0-100
pub fn parse_threshold(value: &str) -> Result<f64, String> {
    let threshold: f64 = value
        .parse()
        .map_err(|_| format!("Invalid threshold: {}", value))?;
    if (0.0..=100.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(format!("Threshold must be between 0 and 100, got {}", threshold))
    }
}
