//! `plan` - preview what apply would change

use anyhow::Result;
use colored::Colorize;
use declarative::{Change, Plan, PlannedResource};
use mgmtkit::backend::default_transport;
use std::collections::BTreeMap;

use crate::Context;
use crate::cli::PlanArgs;
use crate::commands::build_plan;
use crate::ui;

pub fn run(ctx: &Context, args: PlanArgs) -> Result<()> {
    let transport = default_transport();
    let (plan, _) = build_plan(ctx, args.target.as_deref(), &transport)?;
    display_plan(&plan, ctx.verbose > 0);
    Ok(())
}

/// Display a plan grouped by server
///
/// Unchanged and skipped resources are only listed when `all` is set.
pub fn display_plan(plan: &Plan, all: bool) {
    if plan.change_count() == 0 {
        println!();
        println!("  {} No changes needed", "✓".green());
        if !all {
            return;
        }
    }

    let mut by_server: BTreeMap<&str, Vec<&PlannedResource>> = BTreeMap::new();
    for entry in &plan.entries {
        if all || entry.needs_change() {
            by_server
                .entry(entry.resource.server.as_str())
                .or_default()
                .push(entry);
        }
    }

    println!();
    println!(
        "┌─ {} ─────────────────────────────────────────┐",
        "Plan".bold()
    );
    println!("│");

    for (server, entries) in &by_server {
        println!("│ {}", server.bold());

        for entry in entries {
            let symbol = if entry.is_skipped() {
                "·".dimmed()
            } else {
                ui::change_symbol(&entry.change)
            };

            println!(
                "│   {} {:<30} {}",
                symbol,
                entry.resource.name,
                describe(entry).dimmed()
            );

            for op in &entry.ops {
                println!("│       {}", op.to_string().yellow());
            }
        }
        println!("│");
    }

    let count = |f: fn(&Change) -> bool| plan.changes().filter(|e| f(&e.change)).count();
    let created = count(|c| matches!(c, Change::Create));
    let updated = count(|c| matches!(c, Change::UpdateAttributes(_)));
    let removed = count(|c| matches!(c, Change::Destroy));
    let skipped = plan.entries.iter().filter(|e| e.is_skipped()).count();

    println!("├─────────────────────────────────────────────────────┤");
    println!(
        "│ Summary: {} to create, {} to update, {} to remove, {} skipped",
        created.to_string().green(),
        updated.to_string().yellow(),
        removed.to_string().red(),
        skipped
    );
    println!(
        "│ {} read(s) of {} resource(s)",
        plan.prefetch_count(),
        plan.len()
    );
    println!("└─────────────────────────────────────────────────────┘");
}

fn describe(entry: &PlannedResource) -> String {
    if entry.is_skipped() {
        return "(noop)".to_string();
    }
    match &entry.change {
        Change::Create => format!("{} (not present)", entry.resource.address),
        Change::Destroy => format!("{} (will remove)", entry.resource.address),
        Change::UpdateAttributes(_) => format!(
            "{} ({} attribute change(s))",
            entry.resource.address,
            entry.ops.len()
        ),
        Change::NoOp => format!("{} (in sync)", entry.resource.address),
    }
}
