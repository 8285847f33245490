//! CLI command implementations

use std::future::Future;
use std::io::{self, Write};

use serde_json::json;

use crate::config::QueryConfig;
use crate::cursor::CursorCodec;
use crate::logging::init_logging;
use crate::params::{ParamTypes, QueryParams};
use crate::repository::Repository;
use crate::store::MemoryStore;

use super::args::{Cli, Command, QueryArgs};
use super::errors::CliResult;
use super::io::{read_documents, write_json};

/// Main CLI entry point
///
/// Parses arguments and writes command output to stdout.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_command(cli.command, &mut out)
}

/// Run one command, writing its output to `out`
pub fn run_command(cmd: Command, out: &mut dyn Write) -> CliResult<()> {
    match cmd {
        Command::Page(args) => page(&args, out),
        Command::Count(args) => count(&args, out),
        Command::Keygen => keygen(out),
    }
}

/// Print one page for the query string
pub fn page(args: &QueryArgs, out: &mut dyn Write) -> CliResult<()> {
    let (repository, params) = prepare(args)?;
    let page = block_on(repository.paginate_params(&params))??;
    write_json(out, &page)
}

/// Print the number of documents matching the query string's filters
pub fn count(args: &QueryArgs, out: &mut dyn Write) -> CliResult<()> {
    let (repository, params) = prepare(args)?;
    let filter = params.to_filter()?;
    let total = block_on(repository.count(&filter))??;
    write_json(out, &json!({ "total": total }))
}

/// Print a new cursor key
pub fn keygen(out: &mut dyn Write) -> CliResult<()> {
    writeln!(out, "{}", CursorCodec::generate_key_hex())?;
    Ok(())
}

/// Load config and documents, then parse the query string
fn prepare(args: &QueryArgs) -> CliResult<(Repository<MemoryStore>, QueryParams)> {
    let config = QueryConfig::load(&args.config)?;
    init_logging(&config.log_level);

    let documents = read_documents(&args.data)?;
    tracing::debug!(count = documents.len(), path = %args.data.display(), "loaded documents");
    let repository = config.repository(MemoryStore::from_documents(documents)?)?;

    let mut types = ParamTypes::new();
    for declaration in &args.casts {
        let (key, param_type) = ParamTypes::parse_declaration(declaration)?;
        types.insert(key, param_type);
    }
    let params = QueryParams::parse_query_string(&args.query, &types)?;

    Ok((repository, params))
}

fn block_on<F: Future>(future: F) -> CliResult<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(future))
}

#[cfg(test)]
mod tests {
    use super::super::errors::CliError;
    use super::*;
    use serde_json::Value;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const KEY: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

    fn setup(temp_dir: &TempDir) -> (PathBuf, PathBuf) {
        let config_path = temp_dir.path().join("docquery.json");
        fs::write(&config_path, json!({ "cursor_key": KEY }).to_string()).unwrap();

        let data_path = temp_dir.path().join("docs.json");
        let docs = json!([
            {"_id": "1", "tags": ["vip"], "createdAt": "2024-01-01T00:00:00.000Z"},
            {"_id": "2", "tags": ["lead"], "createdAt": "2024-01-02T00:00:00.000Z"},
            {"_id": "3", "tags": ["cold"], "createdAt": "2024-01-03T00:00:00.000Z"}
        ]);
        fs::write(&data_path, docs.to_string()).unwrap();

        (config_path, data_path)
    }

    fn args(config: PathBuf, data: PathBuf, query: &str) -> QueryArgs {
        QueryArgs {
            config,
            data,
            query: query.to_string(),
            casts: Vec::new(),
        }
    }

    #[test]
    fn test_page_command() {
        let temp_dir = TempDir::new().unwrap();
        let (config, data) = setup(&temp_dir);

        let mut out = Vec::<u8>::new();
        let query = "tags[in]=vip,lead&sort=-createdAt&limit=1";
        run_command(Command::Page(args(config, data, query)), &mut out).unwrap();

        let page: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(page["total"], json!(2));
        assert_eq!(page["hasMore"], json!(true));
        assert_eq!(page["data"][0]["_id"], json!("2"));
    }

    #[test]
    fn test_count_command() {
        let temp_dir = TempDir::new().unwrap();
        let (config, data) = setup(&temp_dir);

        let mut out = Vec::<u8>::new();
        run_command(Command::Count(args(config, data, "tags=cold")), &mut out).unwrap();

        let result: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(result, json!({"total": 1}));
    }

    #[test]
    fn test_keygen_command() {
        let mut out = Vec::<u8>::new();
        run_command(Command::Keygen, &mut out).unwrap();

        let key = String::from_utf8(out).unwrap();
        assert!(CursorCodec::from_hex(key.trim()).is_ok());
    }

    #[test]
    fn test_bad_query_reports_validation() {
        let temp_dir = TempDir::new().unwrap();
        let (config, data) = setup(&temp_dir);

        let mut out = Vec::<u8>::new();
        let result = run_command(Command::Page(args(config, data, "limit=0")), &mut out);

        let err = result.unwrap_err();
        assert!(matches!(err, CliError::Query(_)));
        assert_eq!(err.code(), "QUERY_VALIDATION");
    }

    #[test]
    fn test_data_must_be_array() {
        let temp_dir = TempDir::new().unwrap();
        let (config, data) = setup(&temp_dir);
        fs::write(&data, "{}").unwrap();

        let result = run_command(Command::Count(args(config, data, "")), &mut Vec::<u8>::new());
        assert!(matches!(result, Err(CliError::Data(_))));
    }
}
