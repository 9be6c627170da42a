//! `nxtype diff` - compare declared state with a live snapshot

use anyhow::{Result, bail};
use colored::Colorize;
use declarative::{DiffSummary, ResourceDiff, compute_diffs, group_by_type};

use crate::Context;
use crate::cli::DiffArgs;
use crate::commands::{compile_manifest, report_failures};
use crate::manifest;
use crate::ui;

pub fn run(ctx: &Context, args: &DiffArgs) -> Result<()> {
    let (registry, outcome) = compile_manifest(ctx, &args.compile)?;
    if !outcome.is_success() {
        report_failures(&outcome.failures);
        bail!("Manifest has errors; nothing to diff");
    }

    let live = manifest::load_snapshot(&args.live, &registry)?;
    log::info!("Loaded {} from live snapshot", ui::count(live.len(), "resource"));

    let catalog = outcome.catalog.filter_by_target(args.target.as_deref());
    if catalog.is_empty() {
        ui::warn("No declarations match the target");
        return Ok(());
    }

    let diffs = compute_diffs(&registry, &catalog, &live);
    let summary = DiffSummary::from_diffs(&diffs);

    ui::header("Diff");
    if !summary.has_changes() {
        ui::success(&format!(
            "{} in sync",
            ui::count(catalog.len(), "resource")
        ));
        return Ok(());
    }

    for (type_name, group) in group_by_type(&diffs) {
        ui::section(&type_name);
        for diff in group {
            show_diff(ctx, diff);
        }
    }

    println!();
    ui::kv("To add", &summary.additions.to_string());
    ui::kv("To remove", &summary.removals.to_string());
    ui::kv("To modify", &summary.modifications.to_string());
    ui::kv("Property changes", &summary.property_changes.to_string());
    Ok(())
}

fn show_diff(ctx: &Context, diff: &ResourceDiff) {
    let (marker, verb) = if diff.is_addition() {
        ("+".green(), "create")
    } else if diff.is_removal() {
        ("-".red(), "remove")
    } else {
        ("~".yellow(), "update")
    };
    println!(
        "  {} {} {}",
        marker,
        diff.title.bold(),
        format!("({verb})").dimmed()
    );

    if ctx.quiet || diff.is_removal() {
        return;
    }
    for change in &diff.changes {
        println!(
            "      {}: {} {} {}",
            change.name,
            ui::format_live(change.live.as_ref()).red(),
            "→".dimmed(),
            ui::format_value(&change.desired).green()
        );
    }
}
