//! `read` - show a resource as the server reports it

use anyhow::{Context as _, Result};
use declarative::{PrefetchCache, resolve};
use mgmtkit::ResourceAddress;
use mgmtkit::backend::default_transport;

use crate::Context;
use crate::cli::ReadArgs;
use crate::config::Manifest;
use crate::commands::explain;
use crate::paths;
use crate::ui;

pub fn run(ctx: &Context, args: ReadArgs) -> Result<()> {
    let path = paths::manifest_path(ctx.manifest.as_deref())?;
    let manifest = if path.exists() {
        Manifest::load(&path)?
    } else {
        log::debug!("No manifest at {}, using the default server", path.display());
        Manifest::from_toml("")?
    };

    let server = manifest
        .servers
        .get(&args.server)
        .with_context(|| format!("Unknown server '{}'", args.server))?;
    let endpoint = server.to_endpoint(&args.server, paths::jboss_home().as_deref())?;

    let address = ResourceAddress::parse(&args.address)
        .map_err(|e| explain(declarative::Error::Cli(e)))?;

    let transport = default_transport();
    let mut cache = PrefetchCache::new();
    let tree = cache.get_or_fetch(&endpoint, &transport).map_err(explain)?;
    let current = resolve(&address, tree);

    if current.is_present() {
        println!("{}", serde_json::to_string_pretty(&current.options)?);
    } else {
        ui::info(&format!("{address} is absent on '{}'", args.server));
    }
    Ok(())
}
