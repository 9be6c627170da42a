//! `nxtype check` - compile a manifest and show canonical instances

use anyhow::{Result, bail};
use colored::Colorize;
use declarative::{ResourceInstance, ValidationMode};

use crate::Context;
use crate::cli::{CheckArgs, OutputFormat};
use crate::commands::{compile_manifest, report_failures};
use crate::ui;

pub fn run(ctx: &Context, args: &CheckArgs) -> Result<()> {
    let (_, outcome) = compile_manifest(ctx, &args.compile)?;

    match args.format {
        OutputFormat::Json => {
            let instances: Vec<&ResourceInstance> = outcome.catalog.iter().collect();
            println!("{}", serde_json::to_string_pretty(&instances)?);
        }
        OutputFormat::Text => {
            ui::header(&format!("Checking {}", args.compile.manifest.display()));
            if ctx.settings.compile_options(args.compile.batch, None).mode == ValidationMode::Batch {
                ui::dim("Batch validation: every problem is reported");
            }
            for instance in outcome.catalog.iter() {
                show_instance(ctx, instance);
            }
        }
    }

    report_failures(&outcome.failures);

    if !outcome.is_success() {
        bail!(
            "{} of {} failed",
            ui::count(outcome.failures.len(), "declaration"),
            outcome.total()
        );
    }
    if args.format == OutputFormat::Text && !ctx.quiet {
        println!();
        ui::success(&format!("{} valid", ui::count(outcome.catalog.len(), "declaration")));
    }
    Ok(())
}

fn show_instance(ctx: &Context, instance: &ResourceInstance) {
    let identity = if instance.identity() == instance.title() {
        String::new()
    } else {
        format!("→ {}", instance.identity())
    };
    println!(
        "  {} {} {} {}",
        "✓".green(),
        instance.resource().to_string().bold(),
        identity.dimmed(),
        format!("({})", instance.ensure()).dimmed()
    );

    if ctx.quiet {
        return;
    }
    for (name, value) in instance.parameters() {
        ui::kv(&format!("  {name}"), &ui::format_value(value).dimmed().to_string());
    }
    for (name, value) in instance.properties() {
        ui::kv(&format!("  {name}"), &ui::format_value(value));
    }
}
