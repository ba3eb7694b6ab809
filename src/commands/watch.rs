use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context as _, Result};

use assetry::watcher::{watch, WatchEvent, WatchOptions};
use assetry::Variant;

use super::Context;

pub async fn cmd_watch(ctx: &Context, variants: Vec<Variant>) -> Result<()> {
    let options = WatchOptions {
        source: ctx.layout().src().to_path_buf(),
        variants,
        dest: ctx.dest.clone(),
    };

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .context("failed to set the Ctrl+C handler")?;

    let json = ctx.json;
    watch(ctx.orchestrator.clone(), options, running, |event| {
        if json {
            println!("{}", event.to_json());
        } else {
            println!("[{}] {}", timestamp(), describe(&event));
        }
    })
    .await
    .context("watch stopped")?;
    Ok(())
}

fn describe(event: &WatchEvent) -> String {
    match event {
        WatchEvent::WatchStarted { source, tasks } => {
            format!("watching {source} ({tasks} tasks, Ctrl+C to stop)")
        }
        WatchEvent::FileChanged { path } => format!("changed: {path}"),
        WatchEvent::RebuildStarted { plan, changes: 0 } => format!("building {plan}..."),
        WatchEvent::RebuildStarted { plan, changes } => {
            format!("rebuilding {plan} ({changes} changed)...")
        }
        WatchEvent::RebuildComplete { succeeded, failed } => {
            format!("rebuilt: {succeeded} succeeded, {failed} failed")
        }
        WatchEvent::Error { message } => format!("error: {message}"),
        WatchEvent::Shutdown => "stopped".to_string(),
    }
}

fn timestamp() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| {
            let secs = d.as_secs() % 86_400;
            format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
        })
        .unwrap_or_else(|_| "00:00:00".to_string())
}
