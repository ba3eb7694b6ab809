//! Tasks command handler

use anyhow::Result;

use assetry::TaskTable;

use super::{display_path, Context};

pub fn cmd_tasks(ctx: &Context) -> Result<()> {
    let table = TaskTable::from_layout(ctx.layout(), ctx.dest.as_deref());

    if ctx.json {
        println!("{}", serde_json::to_string(&table)?);
        return Ok(());
    }

    let root = ctx.layout().src().parent().unwrap_or(ctx.layout().src());
    let width = table
        .tasks
        .iter()
        .map(|row| row.task.len())
        .chain(table.aggregates.iter().map(|row| row.task.len()))
        .max()
        .unwrap_or(0);

    println!("Tasks:");
    for row in &table.tasks {
        println!(
            "  {:<width$}  -> {}",
            row.task,
            display_path(&row.output, root)
        );
    }
    println!();
    println!("Aggregates:");
    for row in &table.aggregates {
        println!("  {:<width$}  = clean + {}", row.task, row.runs.join(", "));
    }
    Ok(())
}
