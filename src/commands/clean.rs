//! Clean command handler
//!
//! Removes every configured output root and the `--dest` override.

use anyhow::{Context as _, Result};

use super::{display_path, Context};

pub async fn cmd_clean(ctx: &Context) -> Result<()> {
    let result = ctx
        .orchestrator
        .clean(ctx.dest.as_deref())
        .await
        .context("clean failed")?;

    if ctx.json {
        let event = serde_json::json!({
            "event": "clean_complete",
            "deleted": result.deleted,
            "missing": result.missing,
        });
        println!("{event}");
        return Ok(());
    }

    let root = ctx.layout().src().parent().unwrap_or(ctx.layout().src());
    for path in &result.deleted {
        println!("  deleted {}", display_path(path, root));
    }
    println!(
        "clean: {} deleted, {} already absent",
        result.deleted.len(),
        result.missing.len()
    );
    Ok(())
}
