//! Build and dist command handler

use anyhow::{bail, Context as _, Result};
use serde::Serialize;

use assetry::{PairReport, RunReport, Variant};

use super::{display_path, Context};

/// NDJSON events of a one-shot run
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum BuildEvent<'a> {
    Cleaned {
        deleted: usize,
        missing: usize,
    },
    TaskComplete {
        task: String,
        app: &'a str,
        variant: Variant,
        stage: assetry::Stage,
        output: Option<String>,
        files: usize,
        elapsed_ms: u64,
        error: Option<String>,
    },
    RunComplete {
        plan: &'a str,
        succeeded: usize,
        failed: usize,
    },
}

/// Run `variants` for every application, or only `app`.
pub async fn cmd_build(ctx: &Context, variants: &[Variant], app: Option<&str>) -> Result<()> {
    let plan = ctx
        .orchestrator
        .plan(variants, app, ctx.dest.as_deref())?;
    let report = ctx
        .orchestrator
        .run(&plan)
        .await
        .with_context(|| format!("'{}' aborted while cleaning", plan.name))?;

    if ctx.json {
        print_json(&report);
    } else {
        print_human(ctx, &report);
    }

    let failed = report.pairs.len() - report.succeeded();
    if failed > 0 {
        bail!(
            "'{}' failed: {} of {} tasks failed",
            report.plan,
            failed,
            report.pairs.len()
        );
    }
    Ok(())
}

fn print_json(report: &RunReport) {
    let events = std::iter::once(BuildEvent::Cleaned {
        deleted: report.cleaned.deleted.len(),
        missing: report.cleaned.missing.len(),
    })
    .chain(report.pairs.iter().map(task_event))
    .chain(std::iter::once(BuildEvent::RunComplete {
        plan: &report.plan,
        succeeded: report.succeeded(),
        failed: report.pairs.len() - report.succeeded(),
    }));
    for event in events {
        println!(
            "{}",
            serde_json::to_string(&event).unwrap_or_else(|_| "{}".to_string())
        );
    }
}

fn task_event(pair: &PairReport) -> BuildEvent<'_> {
    let output = pair.outcome.as_ref().ok();
    BuildEvent::TaskComplete {
        task: pair.task.name(),
        app: &pair.task.app,
        variant: pair.task.variant,
        stage: pair.stage(),
        output: output.map(|o| o.output_dir.display().to_string()),
        files: output.map_or(0, |o| o.files.len()),
        elapsed_ms: pair.elapsed.as_millis() as u64,
        error: pair.error().map(ToString::to_string),
    }
}

fn print_human(ctx: &Context, report: &RunReport) {
    let root = ctx.layout().src().parent().unwrap_or(ctx.layout().src());
    for pair in &report.pairs {
        match &pair.outcome {
            Ok(output) => println!(
                "  ok  {:<24} {} ({} files, {} ms)",
                pair.task.name(),
                display_path(&output.output_dir, root),
                output.files.len(),
                pair.elapsed.as_millis()
            ),
            Err(e) => println!("  FAILED {:<21} {}", pair.task.name(), e),
        }
    }
    println!(
        "{}: {} succeeded, {} failed",
        report.plan,
        report.succeeded(),
        report.pairs.len() - report.succeeded()
    );
}
