use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};

use feedmeta::{
    entries_by_date, normalize_entry, parse_document, parse_feed, AlternateLinkFinder,
    ExtractorConfig,
};

/// Largest document the inspector will read (20 MB).
const MAX_DOCUMENT_SIZE: u64 = 20 * 1024 * 1024;

#[derive(Parser, Debug)]
#[command(
    name = "feedmeta",
    about = "Inspect feed metadata in local RSS/Atom and HTML documents"
)]
struct Args {
    /// Extractor options (TOML)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Discover alternate feed links in a saved page or feed
    Links {
        /// Document to scan
        file: PathBuf,

        /// URL the document was fetched from, used to resolve relative links
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,
    },
    /// Print normalized entries of a saved RSS/Atom document, newest first
    Entries {
        /// Feed document
        file: PathBuf,

        /// Maximum number of entries to print
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Serialize)]
struct LinksReport<'a> {
    title: Option<&'a str>,
    structured: Vec<String>,
    links: Vec<String>,
}

fn read_document(path: &Path) -> Result<Vec<u8>> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Failed to read document: {}", path.display()))?;
    if !metadata.is_file() {
        anyhow::bail!("Document path must be a regular file: {}", path.display());
    }
    if metadata.len() > MAX_DOCUMENT_SIZE {
        anyhow::bail!(
            "Document is {} bytes (max {} bytes): {}",
            metadata.len(),
            MAX_DOCUMENT_SIZE,
            path.display()
        );
    }
    std::fs::read(path).with_context(|| format!("Failed to read document: {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ExtractorConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => ExtractorConfig::default(),
    };

    match args.command {
        Command::Links { file, base_url } => {
            let bytes = read_document(&file)?;
            let finder = AlternateLinkFinder::from_config(&config);
            let base_url = base_url.as_deref();

            let document = parse_document(&bytes, base_url);
            if let Err(e) = &document {
                tracing::warn!(file = %file.display(), error = %e, "Structured parse failed");
            }
            let document = document.ok();

            let report = LinksReport {
                title: document.as_ref().and_then(|d| d.title.as_deref()),
                structured: document
                    .as_ref()
                    .map(|d| finder.search_alternate_links(d))
                    .unwrap_or_default(),
                links: finder.find_alternate_links_in(document.as_ref(), &bytes, base_url),
            };
            print_json(&report)
        }
        Command::Entries { file, limit } => {
            let bytes = read_document(&file)?;
            let entries = parse_feed(&bytes)
                .with_context(|| format!("Failed to parse feed: {}", file.display()))?;
            tracing::info!(entries = entries.len(), file = %file.display(), "Parsed feed");

            let normalized: Vec<_> = entries_by_date(entries, limit)
                .iter()
                .map(|entry| normalize_entry(entry, &config))
                .collect();
            print_json(&normalized)
        }
    }
}
