//! `apply` - converge servers to the manifest

use anyhow::{Result, bail};
use colored::Colorize;
use declarative::{
    ApplyResult, Change, ConfirmCallback, Error, ExecuteSummary, ProgressCallback, ThreadSleeper,
    execute,
};
use mgmtkit::backend::default_transport;
use std::time::Duration;

use crate::Context;
use crate::cli::ApplyArgs;
use crate::commands::{build_plan, plan};
use crate::ui;

pub fn run(ctx: &Context, args: ApplyArgs) -> Result<()> {
    let transport = default_transport();
    let (plan, endpoints) = build_plan(ctx, args.target.as_deref(), &transport)?;

    if plan.change_count() == 0 {
        ui::success("Everything is up to date");
        return Ok(());
    }

    if !ctx.quiet {
        plan::display_plan(&plan, false);
    }

    let mut progress = ApplyProgress { quiet: ctx.quiet };
    let mut prompt = Prompt { assume_yes: args.yes };
    let summary = execute(
        &plan,
        &endpoints,
        &transport,
        &ThreadSleeper,
        &mut progress,
        &mut prompt,
    )?;

    print_summary(&summary);

    if !summary.is_success() {
        bail!("{} resource(s) failed", summary.failed);
    }
    Ok(())
}

/// Asks once on the terminal unless `--yes` was given
struct Prompt {
    assume_yes: bool,
}

impl ConfirmCallback for Prompt {
    fn confirm(&mut self, prompt: &str) -> std::io::Result<bool> {
        use dialoguer::Confirm;

        if self.assume_yes {
            return Ok(true);
        }

        println!();
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| std::io::Error::other(e.to_string()))
    }
}

/// Prints one line per applied resource
struct ApplyProgress {
    quiet: bool,
}

impl ProgressCallback for ApplyProgress {
    fn on_resource_start(&mut self, name: &str, change: &Change) {
        if !self.quiet {
            println!("  {} {} ({change})", ui::change_symbol(change), name.bold());
        }
    }

    fn on_retry(&mut self, name: &str, attempt: u32, tries: u32, error: &Error, delay: Duration) {
        if let Some(notice) = self.retry_notice(name, attempt, tries, error, delay) {
            ui::warn(&notice);
        }
    }

    fn on_resource_complete(&mut self, name: &str, result: &ApplyResult) {
        match result {
            ApplyResult::Failed { error } => ui::error(&format!("{name}: {error}")),
            ApplyResult::Created => self.done(name, "created"),
            ApplyResult::Modified => self.done(name, "updated"),
            ApplyResult::Removed => self.done(name, "removed"),
            ApplyResult::NoChange => self.done(name, "already in sync"),
            ApplyResult::Skipped { reason } => ui::dim(&format!("{name}: skipped ({reason})")),
        }
    }
}

impl ApplyProgress {
    fn retry_notice(
        &self,
        name: &str,
        attempt: u32,
        tries: u32,
        error: &Error,
        delay: Duration,
    ) -> Option<String> {
        (!self.quiet).then(|| {
            format!(
                "{name}: attempt {attempt}/{tries} failed: {error}; retrying in {}",
                ui::format_seconds(delay)
            )
        })
    }

    fn done(&self, name: &str, what: &str) {
        if !self.quiet {
            println!("    {} {name} {what}", "✓".green());
        }
    }
}

/// Print final summary
fn print_summary(summary: &ExecuteSummary) {
    println!();
    if summary.is_success() {
        println!(
            "  {} Configuration applied successfully!",
            "✓".green().bold()
        );
    } else {
        println!(
            "  {} Configuration applied with errors",
            "⚠".yellow().bold()
        );
    }

    if summary.created > 0 {
        println!("    • {} resources created", summary.created);
    }
    if summary.modified > 0 {
        println!("    • {} resources modified", summary.modified);
    }
    if summary.removed > 0 {
        println!("    • {} resources removed", summary.removed);
    }
    if summary.skipped > 0 {
        println!("    • {} resources skipped", summary.skipped);
    }
    if summary.failed > 0 {
        println!("    • {} {} failed", summary.failed, "resources".red());
    }
}
