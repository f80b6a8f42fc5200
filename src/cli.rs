use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Search(SearchArgs),
    Catalog {
        #[command(subcommand)]
        command: CatalogCommand,
    },
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Search phrase sent to the remote book lookup.
    #[arg(long)]
    pub query: String,

    /// Restrict hits to one category (empty matches everything).
    #[arg(long, default_value = "")]
    pub category: String,

    /// Restrict hits to one language code (empty matches everything).
    #[arg(long, default_value = "")]
    pub language: String,

    /// Result ordering requested from the backend.
    #[arg(long, default_value = "relevance")]
    pub sort: String,

    /// Print type filter (all, books, magazines).
    #[arg(long, default_value = "all")]
    pub print_type: String,

    /// Pages to fetch: the first page plus this many minus one load-more rounds.
    #[arg(long, default_value_t = 1)]
    pub pages: u32,

    /// Backend base URL (falls back to BOOKBUDDY_BASE_URL).
    #[arg(long)]
    pub base_url: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum CatalogCommand {
    List(CatalogListArgs),
    Filter(CatalogFilterArgs),
}

#[derive(Debug, Args)]
pub struct CatalogListArgs {
    /// Backend base URL (falls back to BOOKBUDDY_BASE_URL).
    #[arg(long)]
    pub base_url: Option<String>,
}

#[derive(Debug, Args)]
pub struct CatalogFilterArgs {
    /// Category to match exactly (empty matches everything).
    #[arg(long, default_value = "")]
    pub category: String,

    /// Case-insensitive substring matched against title, author, and description.
    #[arg(long, default_value = "")]
    pub query: String,

    /// Keep reading query lines from stdin and re-filter after 300ms of quiet.
    #[arg(long)]
    pub watch: bool,

    /// Backend base URL (falls back to BOOKBUDDY_BASE_URL).
    #[arg(long)]
    pub base_url: Option<String>,
}
