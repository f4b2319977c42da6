//! tickcalc: tiered ticket sales pacing.
//!
//! Entry point. Loads configuration, initialises structured logging,
//! prints the scenario analysis, then reads one batch of sales per line
//! from stdin and prints the updated report and next-batch suggestion.

use anyhow::{bail, Context, Result};
use std::io::{self, BufRead, Write};
use tracing::{error, info, warn};

use tickcalc::config::AppConfig;
use tickcalc::report::{SalesReport, ScenarioAnalysis};
use tickcalc::AllocationEngine;

const BANNER: &str = "Ticket Sales Dynamic Allocation Calculator";

fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    init_logging();

    let path = AppConfig::resolve_path(std::env::args().nth(1));
    let cfg = AppConfig::load(&path)?;

    println!("{BANNER}\n");
    info!(config = %path, tiers = cfg.event.tier_count(), "tickcalc starting up");

    for finding in cfg.event.validate() {
        warn!(%finding, "Configuration check");
        println!("Warning: {finding}");
    }

    let mut engine = cfg.build_engine()?;
    println!("{}\n", ScenarioAnalysis::new(&engine));

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while !engine.is_complete() {
        print!(
            "Batch {} of {}: tickets sold per tier ({} values, 'q' to stop): ",
            engine.batch_count() + 1,
            engine.config().num_batches,
            engine.config().tier_count()
        );
        io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next() else {
            println!();
            info!("End of input");
            break;
        };
        let line = line.context("Failed to read batch from stdin")?;
        if line.trim().eq_ignore_ascii_case("q") {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let sales = match parse_sales_line(&line, engine.config().tier_count()) {
            Ok(sales) => sales,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        run_batch(&mut engine, &sales);
    }

    if engine.is_complete() {
        println!("\nReached the specified total number of batches.");
    }

    println!("\nFinal Report:\n{}", SalesReport::new(&engine));
    info!(
        batches = engine.batch_count(),
        revenue = format!("${:.2}", engine.cumulative_revenue()),
        remaining = format!("${:.2}", engine.remaining_revenue()),
        "tickcalc finished"
    );

    Ok(())
}

/// Record one batch, print the report and, if batches remain, the next suggestion.
fn run_batch(engine: &mut AllocationEngine, sales: &[u64]) {
    match engine.add_batch(sales) {
        Ok(batch) => println!("\nBatch added with revenue: ${:.2}", batch.batch_revenue),
        Err(e) => {
            println!("{e}");
            return;
        }
    }

    println!("\n{}", SalesReport::new(engine));

    if engine.is_complete() {
        return;
    }

    match engine.dynamic_allocation_suggestion() {
        Ok(suggestion) => {
            println!("\n{suggestion}");
            println!("Adjust your next batch based on these suggestions.\n");
        }
        Err(e) => {
            error!(error = %e, "No suggestion for next batch");
            println!("\nNo allocation suggestion: {e}\n");
        }
    }
}

/// Parse a line of per-tier sales counts separated by commas and/or spaces.
fn parse_sales_line(line: &str, tier_count: usize) -> Result<Vec<u64>> {
    let sales = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u64>()
                .with_context(|| format!("Not a ticket count: {s:?}"))
        })
        .collect::<Result<Vec<_>>>()?;

    if sales.len() != tier_count {
        bail!("Expected {tier_count} values, got {}", sales.len());
    }
    Ok(sales)
}

/// Initialise the `tracing` subscriber.
///
/// Logs go to stderr so they do not interleave with the report on stdout.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tickcalc=info"));

    let json_logging = std::env::var("TICKCALC_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(io::stderr)
            .init();
    }
}
