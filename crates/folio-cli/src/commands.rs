use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use folio_index::{CollisionPolicy, IndexConfig, Library};
use folio_store::{InMemoryTrackStore, StoredTrack};
use folio_types::Listing;
use tracing::{debug, info};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let base = match &cli.config {
        Some(path) => IndexConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => IndexConfig::default(),
    };
    debug!(config = ?cli.config, format = ?cli.format, "starting");
    match cli.command {
        Command::Scan(args) => cmd_scan(apply(base, &args.library), cli.format),
        Command::Browse(args) => cmd_browse(apply(base, &args.library), &args.ids, cli.format),
        Command::Tracks(args) => cmd_tracks(apply(base, &args.library), cli.format),
    }
}

/// Layer command-line overrides over the loaded configuration.
fn apply(mut config: IndexConfig, args: &LibraryArgs) -> IndexConfig {
    if let Some(root) = &args.root {
        config.root = root.clone();
    }
    if let Some(title) = &args.root_title {
        config.root_title = title.clone();
    }
    if let Some(len) = args.id_length {
        config.id_length = len;
    }
    if args.parallel {
        config.parallel = true;
    }
    if !args.extensions.is_empty() {
        config.extensions = args.extensions.clone();
    }
    if args.strict {
        config.collision = CollisionPolicy::Reject;
    }
    config
}

fn open(config: IndexConfig) -> anyhow::Result<Library> {
    let root = config.root.clone();
    let library = Library::open(config, Arc::new(InMemoryTrackStore::new()))
        .with_context(|| format!("indexing {}", root.display()))?;
    let tree = library.snapshot();
    info!(
        root = %root.display(),
        directories = tree.directory_count(),
        files = tree.track_count(),
        "library ready"
    );
    Ok(library)
}

fn cmd_scan(config: IndexConfig, format: OutputFormat) -> anyhow::Result<()> {
    let library = open(config)?;
    let tree = library.snapshot();
    let directories = tree.directory_count();
    let files = tree.track_count();
    let unique = library.tracks().len();
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({
                "root": library.root_path().display().to_string(),
                "directories": directories,
                "files": files,
                "tracks": unique,
            })
        ),
        OutputFormat::Text => {
            println!(
                "{} Indexed {}",
                "✓".green().bold(),
                library.root_path().display().to_string().bold()
            );
            println!("  Directories: {}", directories.to_string().cyan());
            println!("  Files: {}", files.to_string().cyan());
            println!("  Distinct tracks: {}", unique.to_string().cyan());
        }
    }
    Ok(())
}

fn cmd_browse(config: IndexConfig, ids: &[String], format: OutputFormat) -> anyhow::Result<()> {
    let library = open(config)?;
    let listing = library.browse_str(ids)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&listing)?),
        OutputFormat::Text => print!("{}", render_listing(&listing)),
    }
    Ok(())
}

fn cmd_tracks(config: IndexConfig, format: OutputFormat) -> anyhow::Result<()> {
    let library = open(config)?;
    let tracks: Vec<StoredTrack> = library.tracks();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&tracks)?),
        OutputFormat::Text => {
            for track in &tracks {
                println!("{} {}", track.id.short_hex().yellow(), track.path.display());
            }
            println!("{} distinct tracks", tracks.len().to_string().bold());
        }
    }
    Ok(())
}

fn render_listing(listing: &Listing) -> String {
    let mut out = String::new();
    let trail: Vec<&str> = listing.parents.iter().map(|p| p.title.as_str()).collect();
    if trail.is_empty() {
        out.push_str(&format!("{}\n", listing.title.bold()));
    } else {
        out.push_str(&format!("{}\n", trail.join(" / ").bold()));
    }
    for album in &listing.albums {
        out.push_str(&format!("  {} {}/\n", album.id.to_string().dimmed(), album.title.blue()));
    }
    for track in &listing.tracks {
        out.push_str(&format!(
            "  {} {} {}\n",
            track.id.to_string().dimmed(),
            track.title,
            format_duration(track.duration).dimmed()
        ));
    }
    if listing.is_empty() {
        out.push_str("  (empty)\n");
    }
    out
}

fn format_duration(secs: f64) -> String {
    if secs <= 0.0 {
        return "--:--".to_string();
    }
    let total = secs.round() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
