//! JSON file input and output for the CLI

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Read a JSON array of documents
pub fn read_documents(path: &Path) -> CliResult<Vec<Value>> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::Data(format!("{}: {}", path.display(), e)))?;

    match serde_json::from_str(&content)? {
        Value::Array(documents) => Ok(documents),
        _ => Err(CliError::Data(format!(
            "{}: expected a JSON array of documents",
            path.display()
        ))),
    }
}

/// Write a value as pretty JSON followed by a newline
pub fn write_json<T: Serialize>(out: &mut dyn Write, value: &T) -> CliResult<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
