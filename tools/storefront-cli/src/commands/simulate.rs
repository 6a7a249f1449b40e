//! Run the chunked calculation on its own.

use anyhow::Result;
use serde::Serialize;
use shop_executor::{drive, run_to_completion, ChunkedWorkload, TokioScheduler};

use super::SimulateArgs;
use crate::context::Context;
use crate::output::{format_count, format_duration};

#[derive(Serialize)]
struct SimulationReport {
    total_units: u64,
    chunk_size: u64,
    chunks: u32,
    processed: u64,
    max_units_per_turn: u64,
    elapsed_ms: f64,
}

/// Run the simulate command.
pub async fn run(args: SimulateArgs, ctx: &Context) -> Result<()> {
    let mut config = ctx.config.workload.clone();
    if let Some(total) = args.total {
        config.total_units = total;
    }
    if let Some(chunk) = args.chunk {
        config.chunk_size = chunk;
    }

    let mut workload = ChunkedWorkload::from_config(&config)?;

    ctx.output.header("Simulating heavy calculation");
    ctx.output.kv("total units", &format_count(workload.total()));
    ctx.output.kv("chunk size", &format_count(workload.chunk_size()));
    ctx.output
        .kv("expected chunks", &workload.expected_chunks().to_string());

    let pb = ctx.output.progress(workload.total(), "units");
    let summary = if args.sync {
        run_to_completion(&mut workload, |report| pb.inc(report.units()))
    } else {
        drive(&mut workload, &TokioScheduler, |report| pb.inc(report.units())).await
    };
    pb.finish_and_clear();

    if ctx.output.is_json() {
        ctx.output.json(&SimulationReport {
            total_units: workload.total(),
            chunk_size: workload.chunk_size(),
            chunks: summary.chunks,
            processed: summary.processed,
            max_units_per_turn: summary.max_units_per_turn,
            elapsed_ms: summary.elapsed.as_secs_f64() * 1000.0,
        });
        return Ok(());
    }

    ctx.output.success(&format!(
        "Processed {} units in {} chunks",
        format_count(summary.processed),
        summary.chunks
    ));
    ctx.output.kv(
        "max units per turn",
        &format_count(summary.max_units_per_turn),
    );
    ctx.output.kv("elapsed", &format_duration(summary.elapsed));

    Ok(())
}
