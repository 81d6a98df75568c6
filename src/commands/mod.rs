// Reconciliation commands
pub mod apply;
pub mod plan;

// Inspection commands
pub mod read;
pub mod validate;

use anyhow::{Result, bail};
use declarative::{Endpoints, Plan, filter_resources};
use mgmtkit::backend::Transport;
use std::path::PathBuf;

use crate::Context;
use crate::config::Manifest;
use crate::paths;
use crate::ui;

/// A validated manifest and the endpoints it declares
pub struct Loaded {
    pub path: PathBuf,
    pub manifest: Manifest,
    pub endpoints: Endpoints,
}

/// Load and validate the manifest, then build its endpoints
pub fn load(ctx: &Context) -> Result<Loaded> {
    let path = paths::manifest_path(ctx.manifest.as_deref())?;
    log::debug!("Loading manifest {}", path.display());
    let manifest = Manifest::load(&path)?;

    let problems = manifest.validate();
    if !problems.is_empty() {
        for problem in &problems {
            ui::error(problem);
        }
        bail!(
            "Manifest {} has {} problem(s)",
            path.display(),
            problems.len()
        );
    }

    let endpoints = manifest.endpoints(paths::jboss_home().as_deref())?;
    Ok(Loaded {
        path,
        manifest,
        endpoints,
    })
}

/// Load the manifest and plan the resources matching `target`
pub fn build_plan<T>(ctx: &Context, target: Option<&str>, transport: &T) -> Result<(Plan, Endpoints)>
where
    T: Transport + ?Sized,
{
    let loaded = load(ctx)?;
    let resources = filter_resources(loaded.manifest.resources, target);
    if resources.is_empty() {
        if let Some(t) = target {
            ui::warn(&format!("No resources match '{t}'"));
        }
        return Ok((Plan::default(), loaded.endpoints));
    }

    let plan = Plan::build(&resources, &loaded.endpoints, transport).map_err(explain)?;
    Ok((plan, loaded.endpoints))
}

/// Show what went wrong and how to fix it, then hand the error on
pub fn explain(err: declarative::Error) -> anyhow::Error {
    if let declarative::Error::Cli(cli) = &err {
        let category = cli.category();
        ui::error(category.description());
        ui::dim(category.advice());
    }
    anyhow::Error::new(err)
}
