use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "folio",
    about = "Folio: content-addressed music library browser",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Index a library root and print a summary
    Scan(ScanArgs),
    /// List a directory by its identifier path
    Browse(BrowseArgs),
    /// List every distinct track handed to the metadata store
    Tracks(TracksArgs),
}

/// Overrides applied on top of the configuration file.
#[derive(Args, Clone, Debug, Default)]
pub struct LibraryArgs {
    /// Library root to scan
    #[arg(short, long)]
    pub root: Option<PathBuf>,
    /// Title of the top-level directory
    #[arg(long)]
    pub root_title: Option<String>,
    /// Name identifier length in hex characters
    #[arg(long)]
    pub id_length: Option<usize>,
    /// Hash files on all cores
    #[arg(long)]
    pub parallel: bool,
    /// Only index files with these extensions
    #[arg(short, long = "ext")]
    pub extensions: Vec<String>,
    /// Fail the scan on identifier collisions instead of overwriting
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args)]
pub struct ScanArgs {
    #[command(flatten)]
    pub library: LibraryArgs,
}

#[derive(Args)]
pub struct BrowseArgs {
    #[command(flatten)]
    pub library: LibraryArgs,
    /// Directory identifiers from the root down; none lists the root
    pub ids: Vec<String>,
}

#[derive(Args)]
pub struct TracksArgs {
    #[command(flatten)]
    pub library: LibraryArgs,
}
