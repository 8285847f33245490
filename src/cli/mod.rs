//! CLI module for docquery
//!
//! Provides command-line interface for:
//! - page: one page of documents from a JSON file
//! - count: number of matching documents
//! - keygen: a new cursor key

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, QueryArgs};
pub use commands::{count, keygen, page, run, run_command};
pub use errors::{CliError, CliResult};
pub use io::{read_documents, write_json};
