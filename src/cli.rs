use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nxtype")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Validate, canonicalize and diff declarative NX-OS resource manifests", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List resource types, or describe one
    Types(TypesArgs),

    /// Compile a manifest and print canonical instances
    Check(CheckArgs),

    /// Compare a manifest against a live snapshot
    Diff(DiffArgs),

    /// Print dependency hints between declared resources
    Deps(DepsArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// Types
// ============================================================================

#[derive(Args)]
pub struct TypesArgs {
    /// Type to describe (e.g. cisco_bgp)
    pub name: Option<String>,
}

// ============================================================================
// Check / Diff / Deps
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Args)]
pub struct CompileArgs {
    /// Manifest file (TOML, [[resource]] tables)
    pub manifest: PathBuf,

    /// Report every problem of a resource instead of the first
    #[arg(long)]
    pub batch: bool,

    /// Number of parallel build jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub compile: CompileArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct DiffArgs {
    #[command(flatten)]
    pub compile: CompileArgs,

    /// Live snapshot (JSON array of {type, title, ensure, properties})
    #[arg(short, long)]
    pub live: PathBuf,

    /// Only diff a type or one resource: "cisco_vlan" or "cisco_vlan.100"
    #[arg(short, long)]
    pub target: Option<String>,
}

#[derive(Args)]
pub struct DepsArgs {
    #[command(flatten)]
    pub compile: CompileArgs,

    /// Hide dependencies on resources not declared in the manifest
    #[arg(long)]
    pub resolved_only: bool,
}
