//! CLI argument definitions using clap
//!
//! Commands:
//! - docquery page --config <path> --data <docs.json> --query <qs>
//! - docquery count --config <path> --data <docs.json> --query <qs>
//! - docquery keygen

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// docquery - filter, sort and page JSON documents
#[derive(Parser, Debug)]
#[command(name = "docquery")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print one page of matching documents as JSON
    Page(QueryArgs),

    /// Print how many documents match
    Count(QueryArgs),

    /// Print a fresh random cursor key
    Keygen,
}

/// Inputs shared by the query commands
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Path to configuration file
    #[arg(long, default_value = "./docquery.json")]
    pub config: PathBuf,

    /// JSON array of documents to query
    #[arg(long)]
    pub data: PathBuf,

    /// URL query string, e.g. "tags[in]=vip,lead&sort=-createdAt&limit=2"
    #[arg(long, default_value = "")]
    pub query: String,

    /// Cast a parameter before filtering, as key=type (e.g. age[gte]=integer)
    #[arg(long = "cast", value_name = "KEY=TYPE")]
    pub casts: Vec<String>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
