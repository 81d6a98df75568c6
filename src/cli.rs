use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "jconverge")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Converge JBoss/WildFly management resources to a declared state", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Manifest file (default: $JCONVERGE_MANIFEST or ~/.config/jconverge/manifest.toml)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub manifest: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show what apply would change
    Plan(PlanArgs),

    /// Converge servers to the manifest
    Apply(ApplyArgs),

    /// Show a resource as the server reports it
    Read(ReadArgs),

    /// Check the manifest for errors
    Validate,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// Plan / Apply
// ============================================================================

#[derive(Parser)]
pub struct PlanArgs {
    /// Only resources matching: name, server: or server:name
    #[arg(short, long)]
    pub target: Option<String>,
}

#[derive(Parser)]
pub struct ApplyArgs {
    /// Only resources matching: name, server: or server:name
    #[arg(short, long)]
    pub target: Option<String>,

    /// Apply without asking for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

// ============================================================================
// Read
// ============================================================================

#[derive(Parser)]
pub struct ReadArgs {
    /// Resource address, e.g. subsystem/datasources/data-source/ExampleDS
    pub address: String,

    /// Server to read from
    #[arg(short, long, default_value = declarative::DEFAULT_SERVER)]
    pub server: String,
}
