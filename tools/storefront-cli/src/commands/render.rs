//! Render the storefront page.

use std::fs;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use shop_core::LoadId;
use shop_data::{FetchClient, HttpTransport, ReqwestTransport, StaticTransport};
use shop_executor::TokioScheduler;
use storefront::PageLoader;

use super::RenderArgs;
use crate::context::Context;
use crate::output::{format_bytes, format_duration};

/// Run the render command.
pub async fn run(args: RenderArgs, ctx: &Context) -> Result<()> {
    let mut config = ctx.config.clone();
    if let Some(endpoint) = args.endpoint {
        config.catalog.endpoint = endpoint;
    }
    if let Some(mode) = args.errors {
        config.errors.mode = mode;
    }
    config.validate()?;

    let transport: Arc<dyn HttpTransport> = match &args.products {
        Some(path) => {
            let path = ctx.resolve_path(path);
            let body = fs::read(&path)
                .with_context(|| format!("Failed to read products from {}", path.display()))?;
            ctx.output
                .debug(&format!("Serving {} from {}", config.catalog.endpoint, path.display()));
            Arc::new(StaticTransport::new().with_body(config.catalog.endpoint.clone(), body))
        }
        None => Arc::new(ReqwestTransport::new()),
    };

    let load_id = LoadId::generate();
    ctx.output.debug(&format!("Load ID: {}", load_id));
    let client = FetchClient::new(load_id.clone(), transport);
    let loader = PageLoader::new(config, client, ctx.logger(load_id));

    let spinner = ctx.output.spinner("Loading page...");
    let load = loader
        .load(&TokioScheduler, |report| {
            spinner.set_message(format!("Calculating... chunk {}", report.index + 1));
        })
        .await;
    spinner.finish_and_clear();

    let html = load.html();
    match &args.output {
        Some(path) => {
            let path = ctx.resolve_path(path);
            fs::write(&path, &html)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            ctx.output.success(&format!(
                "Wrote {} ({})",
                path.display(),
                format_bytes(html.len() as u64)
            ));
        }
        None => print!("{}", html),
    }

    let failed = load.failed_sections();
    if !failed.is_empty() {
        ctx.output
            .warn(&format!("{} section(s) failed to populate:", failed.len()));
        for section in &failed {
            ctx.output.list_item(section);
        }
    }

    // stdout carries the page unless it went to a file
    if ctx.output.is_json() && args.output.is_some() {
        ctx.output.json(&load.metrics);
    } else if ctx.output.is_verbose() {
        eprintln!("\n{}", load.metrics.to_summary());
        ctx.output.debug(&format!(
            "Finished in {}",
            format_duration(load.timing.elapsed())
        ));
    }

    Ok(())
}
