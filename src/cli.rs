use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Terminal front end for browsing the catalog
#[derive(Parser)]
#[command(name = "tribune")]
#[command(about = "Browse the Sportschau media catalog", long_about = None)]
pub struct Cli {
    /// Optional TOML settings file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the root menu categories
    Root,
    /// List one category page: subcategory links and playable items
    Category {
        /// Category URL taken from the root menu
        url: String,
    },
    /// List one flat page
    Page {
        /// Page URL taken from a category listing
        url: String,
    },
}
