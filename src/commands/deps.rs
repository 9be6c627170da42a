//! `nxtype deps` - dependency hints between declared resources

use anyhow::{Result, bail};
use colored::Colorize;

use crate::Context;
use crate::cli::DepsArgs;
use crate::commands::{compile_manifest, report_failures};
use crate::ui;

pub fn run(ctx: &Context, args: &DepsArgs) -> Result<()> {
    let (registry, outcome) = compile_manifest(ctx, &args.compile)?;
    if !outcome.is_success() {
        report_failures(&outcome.failures);
        bail!("Manifest has errors");
    }

    let edges = outcome.catalog.dependencies(&registry);
    ui::header("Dependencies");

    let shown: Vec<_> = edges
        .iter()
        .filter(|edge| edge.resolved || !args.resolved_only)
        .collect();
    if shown.is_empty() {
        ui::info("No dependencies");
        return Ok(());
    }

    for edge in &shown {
        let target = if edge.resolved {
            edge.target.to_string().normal()
        } else {
            format!("{} (from device)", edge.target).dimmed()
        };
        println!("  {} {} {}", edge.source.to_string().bold(), "→".cyan(), target);
    }

    if !ctx.quiet {
        let unresolved = shown.iter().filter(|edge| !edge.resolved).count();
        println!();
        ui::dim(&format!(
            "{}, {} not declared",
            ui::count(shown.len(), "edge"),
            unresolved
        ));
    }
    Ok(())
}
