//! `validate` - check the manifest without contacting any server

use anyhow::Result;
use colored::Colorize;

use crate::Context;
use crate::commands::load;
use crate::ui;

pub fn run(ctx: &Context) -> Result<()> {
    let loaded = load(ctx)?;

    ui::header("Manifest");
    ui::kv("path", &loaded.path.display().to_string());
    ui::kv("servers", &loaded.endpoints.len().to_string());
    ui::kv("resources", &loaded.manifest.resources.len().to_string());

    if ctx.verbose > 0 {
        ui::header("Servers");
        for (name, endpoint) in &loaded.endpoints {
            println!(
                "  {} {} via {}",
                name.bold(),
                endpoint.controller,
                endpoint.cli.display().to_string().dimmed()
            );
        }
    }

    for (name, endpoint) in &loaded.endpoints {
        if !endpoint.cli.exists() {
            ui::warn(&format!(
                "CLI for server '{name}' not found at {}",
                endpoint.cli.display()
            ));
        }
    }

    println!();
    ui::success("Manifest is valid");
    Ok(())
}
