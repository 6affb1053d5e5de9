//! Integration tests for the CLI commands.

use std::fs;

use clap::Parser;
use serde_json::{Value, json};

use sarissa_sync::cli::{SyncArgs, execute_command};
use sarissa_sync::error::{Result, SyncError};

#[test]
fn test_bulk_command_writes_ndjson() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let records = dir.path().join("posts.jsonl");
    let output = dir.path().join("bulk.ndjson");

    let mut lines = vec![r#"{"id": 1, "title": "draft post", "draft": true}"#.to_string()];
    for id in 2..=10 {
        lines.push(format!(r#"{{"id": {id}, "title": "post {id}", "blog_id": 7}}"#));
    }
    fs::write(&records, lines.join("\n"))?;

    let args = SyncArgs::try_parse_from([
        "sarissa-sync",
        "--quiet",
        "--format",
        "json",
        "bulk",
        records.to_str().unwrap(),
        "--index",
        "blog",
        "--type",
        "posts",
        "--exclude-field",
        "draft",
        "--routing-field",
        "blog_id",
        "--bulk-limit",
        "5",
        "--output",
        output.to_str().unwrap(),
    ])
    .map_err(|e| SyncError::invalid_argument(e.to_string()))?;
    execute_command(args)?;

    let written = fs::read_to_string(&output)?;
    let written: Vec<Value> = written
        .lines()
        .map(serde_json::from_str)
        .collect::<std::result::Result<_, _>>()?;

    assert_eq!(written.len(), 18);
    assert_eq!(
        written[0],
        json!({"index": {"_index": "blog", "_type": "posts", "_id": "2", "routing": "7"}})
    );
    assert_eq!(written[1]["title"], json!("post 2"));
    assert!(written.iter().all(|line| line.get("draft").is_none()));
    Ok(())
}

#[test]
fn test_bulk_command_rejects_zero_limit() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let records = dir.path().join("posts.jsonl");
    fs::write(&records, "{\"id\": 1}\n")?;

    let args = SyncArgs::try_parse_from([
        "sarissa-sync",
        "bulk",
        records.to_str().unwrap(),
        "-i",
        "blog",
        "-t",
        "posts",
        "--bulk-limit",
        "0",
        "--output",
        dir.path().join("out.ndjson").to_str().unwrap(),
    ])
    .map_err(|e| SyncError::invalid_argument(e.to_string()))?;

    assert!(matches!(execute_command(args), Err(SyncError::Config(_))));
    Ok(())
}

#[test]
fn test_hosts_command_reads_config_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = dir.path().join("settings.json");
    fs::write(
        &config,
        r#"{"connection": {"hosts": ["search.example.com:9201"], "sniffer_timeout": 15}}"#,
    )?;

    let args = SyncArgs::try_parse_from([
        "sarissa-sync",
        "--format",
        "json",
        "--config",
        config.to_str().unwrap(),
        "hosts",
    ])
    .map_err(|e| SyncError::invalid_argument(e.to_string()))?;

    execute_command(args)
}

#[test]
fn test_missing_config_file_fails() {
    let args = SyncArgs::try_parse_from([
        "sarissa-sync",
        "--config",
        "/nonexistent/settings.json",
        "hosts",
    ])
    .unwrap();

    assert!(matches!(execute_command(args), Err(SyncError::Io(_))));
}

#[test]
fn test_msearch_command_plans_queries() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let queries = dir.path().join("queries.jsonl");
    fs::write(
        &queries,
        "{\"query\": {\"match_all\": {}}}\n\n{\"query\": {\"match\": {\"title\": \"rust\"}}}\n",
    )?;

    let args = SyncArgs::try_parse_from([
        "sarissa-sync",
        "-vv",
        "msearch",
        queries.to_str().unwrap(),
        "--index",
        "blog",
        "--page",
        "2",
    ])
    .map_err(|e| SyncError::invalid_argument(e.to_string()))?;

    execute_command(args)
}

#[test]
fn test_msearch_command_rejects_page_zero() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let queries = dir.path().join("queries.jsonl");
    fs::write(&queries, "{\"query\": {\"match_all\": {}}}\n")?;

    let args = SyncArgs::try_parse_from([
        "sarissa-sync",
        "msearch",
        queries.to_str().unwrap(),
        "--page",
        "0",
    ])
    .map_err(|e| SyncError::invalid_argument(e.to_string()))?;

    assert!(matches!(
        execute_command(args),
        Err(SyncError::InvalidArgument(_))
    ));
    Ok(())
}
