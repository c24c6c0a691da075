use std::io::{self, Read, Write};
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use header_dedup::config::{parse_bool, Config};
use header_dedup::observability::HeaderMetrics;
use header_dedup::{logging, CanonicalHeaders, HeaderDeduplicationService, RawHeaders};

/// One output slot per input block.
#[derive(Serialize)]
#[serde(untagged)]
enum BlockOutput {
    Headers(CanonicalHeaders),
    Failed { error: String },
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::from_env()?;
    logging::init(&config.logging)?;

    info!("Starting {}", header_dedup::VERSION);
    config.log_summary();

    let want_metrics = flag("HEADER_METRICS");
    let want_suggestions = flag("HEADER_SUGGEST");

    let mut service = HeaderDeduplicationService::new(config.dedup);
    let metrics = if want_metrics {
        let metrics = Arc::new(HeaderMetrics::new().map_err(|e| e.to_string())?);
        service = service.with_metrics(Arc::clone(&metrics));
        Some(metrics)
    } else {
        None
    };

    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    let blocks = parse_blocks(&input);

    let output: Vec<BlockOutput> = service
        .batch_deduplicate_headers(&blocks)
        .into_iter()
        .map(|result| match result {
            Ok(headers) => BlockOutput::Headers(headers),
            Err(err) => BlockOutput::Failed {
                error: err.to_string(),
            },
        })
        .collect();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &output)?;
    writeln!(out)?;

    service.log_summary();

    if let Some(metrics) = metrics {
        eprint!("{}", metrics.export());
    }

    if want_suggestions {
        let suggestions = service.optimization_suggestions();
        eprintln!("{}", serde_json::to_string_pretty(&suggestions)?);
    }

    Ok(())
}

fn flag(key: &str) -> bool {
    std::env::var(key)
        .ok()
        .and_then(|v| parse_bool(&v))
        .unwrap_or(false)
}

/// Split `Name: value` lines into blocks separated by blank lines.
fn parse_blocks(input: &str) -> Vec<RawHeaders> {
    let mut blocks = Vec::new();
    let mut current = RawHeaders::new();

    for (lineno, line) in input.lines().enumerate() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
            continue;
        }

        match line.split_once(':') {
            Some((name, value)) => current.push(name, value.trim()),
            None => warn!(line = lineno + 1, "ignoring line without ':'"),
        }
    }

    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}
