use anyhow::{Context, Result};
use std::path::PathBuf;

use mztab::parser::{parse_file, ParserConfig};

/// Summaries never stop on accumulated errors
fn summary_config() -> ParserConfig {
    ParserConfig {
        max_errors: usize::MAX,
        validate_integrity: false,
        ..Default::default()
    }
}

/// Display information about an mzTab file
pub fn run(file: PathBuf, json: bool) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let parsed = parse_file(&file, &summary_config())
        .with_context(|| format!("Failed to parse {}", file.display()))?;
    let metadata = &parsed.metadata;

    if json {
        let json = metadata
            .to_json()
            .context("Failed to serialize metadata")?;
        println!("{}", json);
        return Ok(());
    }

    println!("mzTab File Information");
    println!("======================");
    println!("File: {}", file.display());
    println!();

    println!("Metadata:");
    println!(
        "  Version: {}",
        metadata.version.as_deref().unwrap_or("<not set>")
    );
    println!("  Mode: {}", metadata.mode());
    println!("  Type: {}", metadata.file_type());
    if let Some(title) = &metadata.title {
        println!("  Title: {}", title);
    }
    println!("  MS runs: {}", metadata.ms_runs.len());
    println!("  Samples: {}", metadata.samples.len());
    println!("  Assays: {}", metadata.assays.len());
    println!("  Study variables: {}", metadata.study_variables.len());
    for (section, scores) in &metadata.search_engine_scores {
        println!(
            "  {} search engine scores: {}",
            section.table_name(),
            scores.len()
        );
    }
    println!();

    println!("Tables:");
    for (section, table) in parsed.tables() {
        println!(
            "  {:15} {:4} columns ({:3} optional) {:8} rows",
            section.table_name(),
            table.factory.len(),
            table.factory.optional_columns().count(),
            table.records.len()
        );
    }
    if parsed.tables().next().is_none() {
        println!("  <none>");
    }

    if !parsed.comments.is_empty() {
        println!();
        println!("Comments: {}", parsed.comments.len());
    }

    Ok(())
}
