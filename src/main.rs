mod cli;

use anyhow::{Context, Result};
use clap::Parser;

use cli::{Cli, Commands};
use tribune::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let settings = match &cli.config {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    }
    .with_env();
    let catalog = Catalog::open(settings).context("opening catalog")?;

    match cli.command {
        Commands::Root => {
            for node in catalog.root().await.context("loading root menu")? {
                println!(
                    "{:<24} {}",
                    node.name.as_deref().unwrap_or("-"),
                    node.href.as_deref().unwrap_or("-")
                );
            }
        }
        Commands::Category { url } => {
            render_entries(catalog.subcategory(&url).await.context("loading category")?)
        }
        Commands::Page { url } => {
            render_entries(catalog.page(&url).await.context("loading page")?)
        }
    }
    Ok(())
}

fn render_entries(entries: Vec<PageEntry>) {
    for entry in entries {
        match entry {
            PageEntry::Category(c) => println!("[dir]   {:<40} {}", c.name, c.href),
            PageEntry::Playable(r) => {
                let name = match &r.group_title {
                    Some(group) => format!("({group}) {}", r.name),
                    None => r.name.clone(),
                };
                println!("[video] {:<40} {:>5}s  {}", name, r.duration_secs, r.playback_url);
            }
        }
    }
}
