use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "altnet")]
#[command(author, version, about = "Browse a generated alternative internet", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a single page (or image) for a path
    Browse {
        path: String,

        /// Scenario to browse in (default from settings)
        #[arg(short = 's', long)]
        scenario: Option<String>,

        /// Also generate every image the page references
        #[arg(short = 'p', long)]
        prefetch: bool,

        /// Parallel image generations when prefetching
        #[arg(long, default_value = "4")]
        concurrency: usize,
    },

    /// Navigate path after path in one session
    Interactive {
        #[arg(short = 's', long)]
        scenario: Option<String>,
    },

    /// Manage stored scenarios
    Scenarios {
        #[command(subcommand)]
        command: ScenarioCommands,
    },

    /// Fetch an image from the cache, generating it on a miss
    Image {
        identifier: String,

        /// Print a data URI instead of the cached file path
        #[arg(short, long)]
        inline: bool,
    },
}

#[derive(Subcommand)]
pub enum ScenarioCommands {
    /// List scenario names and descriptions
    List,

    /// Print one scenario in full
    Show { name: String },

    /// Add or replace a scenario
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        description: String,

        /// Full scenario text
        #[arg(long)]
        scenario: String,
    },
}
