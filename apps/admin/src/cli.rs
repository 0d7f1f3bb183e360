//! Command-line interface

use clap::{Args, Parser, Subcommand};
use marquee_catalog_client::MediaType;

#[derive(Debug, Parser)]
#[command(name = "marquee-admin", version, about = "Marquee catalog administration")]
pub struct Cli {
    /// Catalog base URL (overrides MARQUEE_API_URL)
    #[arg(long, global = true, env = "MARQUEE_API_URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the status of the current import job
    Status,
    /// Show catalog totals
    Stats,
    /// Import one category and follow the job until it finishes
    Import {
        /// movie, series, book or audiobook
        media_type: MediaType,
        #[command(flatten)]
        size: SizeArg,
    },
    /// Import movies, then series
    ImportAll {
        #[command(flatten)]
        size: SizeArg,
    },
    /// Stop the running import job
    Stop,
    /// Follow an import job that is already running
    Watch,
    /// Read or edit intro markers
    Intro {
        #[command(subcommand)]
        action: IntroAction,
    },
}

#[derive(Debug, Args)]
pub struct SizeArg {
    /// Size parameter sent with the start request (defaults to MARQUEE_IMPORT_SIZE)
    #[arg(long)]
    pub size: Option<u32>,
}

#[derive(Debug, Subcommand)]
pub enum IntroAction {
    /// Print the intro marker of an episode
    Get { episode: String },
    /// Save an intro marker
    Set {
        episode: String,
        /// Intro start in seconds
        #[arg(long)]
        start: f64,
        /// Intro end in seconds
        #[arg(long)]
        end: f64,
    },
    /// Remove the intro marker of an episode
    Clear { episode: String },
}

impl Command {
    /// Short name used in log fields
    pub fn name(&self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Stats => "stats",
            Self::Import { .. } => "import",
            Self::ImportAll { .. } => "import-all",
            Self::Stop => "stop",
            Self::Watch => "watch",
            Self::Intro { .. } => "intro",
        }
    }
}
