//! Command implementations for the sarissa-sync CLI.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::sync::Arc;
use std::time::Instant;

use log::info;
use serde_json::Value;

use crate::bulk::BulkIndexer;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::Settings;
use crate::connection::NdjsonConnection;
use crate::error::{Result, SyncError};
use crate::indexable::JsonRecordKind;
use crate::search::{MultiSearch, QuerySource, SearchOptions};

/// Execute a CLI command.
pub fn execute_command(args: SyncArgs) -> Result<()> {
    let settings = match &args.config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };

    match &args.command {
        Command::Bulk(bulk_args) => bulk_index(bulk_args.clone(), &settings, &args),
        Command::MultiSearch(msearch_args) => plan_multi_search(msearch_args.clone(), &settings),
        Command::Hosts => show_hosts(&settings, &args),
    }
}

/// Build the bulk-index payload for a record file.
fn bulk_index(args: BulkArgs, settings: &Settings, cli_args: &SyncArgs) -> Result<()> {
    let mut indexing = settings.indexing.clone();
    if let Some(limit) = args.bulk_limit {
        indexing.bulk_index_limit = limit;
    }
    if let Some(limit) = args.query_limit {
        indexing.query_limit = limit;
    }
    indexing.validate()?;

    let mut kind = JsonRecordKind::new(args.index, args.doc_type)
        .with_id_field(args.id_field)
        .with_settings(indexing)
        .with_path(&args.records_file);
    if let Some(field) = args.exclude_field {
        kind = kind.with_exclude_field(field);
    }
    if let Some(field) = args.routing_field {
        kind = kind.with_routing_field(field);
    }

    let start_time = Instant::now();
    match &args.output {
        Some(path) => {
            let writer = BufWriter::new(File::create(path)?);
            let connection = Arc::new(NdjsonConnection::new(writer));
            let report = BulkIndexer::new(kind, connection.clone()).bulk_index_all("")?;
            connection.flush()?;

            output_result(
                "Bulk payload written",
                &BulkResult {
                    records_file: args.records_file.to_string_lossy().to_string(),
                    output: path.to_string_lossy().to_string(),
                    records_seen: report.records_seen,
                    documents_indexed: report.documents_indexed,
                    records_skipped: report.records_skipped,
                    batches: report.batches_submitted,
                    duration_ms: start_time.elapsed().as_millis() as u64,
                },
                cli_args,
            )?;
        }
        None => {
            // Stdout carries the payload, so the summary only goes to the log.
            let connection = Arc::new(NdjsonConnection::new(io::stdout()));
            let report = BulkIndexer::new(kind, connection.clone()).bulk_index_all("")?;
            connection.flush()?;
            info!(
                "{} documents in {} batches ({} skipped) in {:?}",
                report.documents_indexed,
                report.batches_submitted,
                report.records_skipped,
                start_time.elapsed()
            );
        }
    }

    Ok(())
}

/// Print the multi-search payload for a query file without dispatching it.
fn plan_multi_search(args: MultiSearchArgs, settings: &Settings) -> Result<()> {
    // Planning only: the accumulator is never dispatched.
    let connection = Arc::new(NdjsonConnection::new(io::sink()));
    let mut multi =
        MultiSearch::new(connection).with_default_page_size(settings.indexing.default_page_size);

    let reader = BufReader::new(File::open(&args.queries_file)?);
    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let query: Value = serde_json::from_str(&line).map_err(|e| {
            SyncError::invalid_argument(format!("line {}: {e}", line_num + 1))
        })?;
        let mut options = SearchOptions::new()
            .index(args.index.as_str())
            .doc_type(args.doc_type.as_str())
            .page(args.page);
        if let Some(page_size) = args.page_size {
            options = options.page_size(page_size);
        }
        multi.add_search(QuerySource::try_from(query)?, options)?;
    }

    info!("planned {} queries", multi.len());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in multi.payload() {
        serde_json::to_writer(&mut out, &line)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    multi.reset();

    Ok(())
}

/// Show the hosts a connection would be built from.
fn show_hosts(settings: &Settings, cli_args: &SyncArgs) -> Result<()> {
    let hosts = settings
        .connection
        .host_addrs()?
        .iter()
        .map(ToString::to_string)
        .collect();

    output_result(
        "Configured hosts",
        &HostsResult {
            hosts,
            transport: settings.connection.transport.clone(),
        },
        cli_args,
    )
}
