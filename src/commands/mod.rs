//! Subcommands
//!
//! `check`, `diff` and `deps` all start by compiling a manifest into a
//! catalog; [`compile_manifest`] does that once for all of them.

pub mod check;
pub mod deps;
pub mod diff;
pub mod types;

use anyhow::Result;
use colored::Colorize;
use declarative::{compile, CompileOutcome, Error, ProgressCallback, Registry, ResourceRef};

use crate::Context;
use crate::cli::CompileArgs;
use crate::manifest;
use crate::ui;

/// Prints failures as they happen when running verbosely
struct Reporter {
    verbose: bool,
}

impl ProgressCallback for Reporter {
    fn on_start(&mut self, count: usize) {
        log::info!("Compiling {}", ui::count(count, "declaration"));
    }

    fn on_resource_complete(&mut self, resource: &ResourceRef, error: Option<&Error>) {
        if !self.verbose {
            return;
        }
        match error {
            None => println!("  {} {}", "·".dimmed(), resource.to_string().dimmed()),
            Some(_) => println!("  {} {}", "✗".red(), resource),
        }
    }

    fn on_complete(&mut self, compiled: usize, failed: usize) {
        log::info!("{compiled} compiled, {failed} failed");
    }
}

/// Compile a manifest against the NX-OS registry
pub fn compile_manifest(ctx: &Context, args: &CompileArgs) -> Result<(Registry, CompileOutcome)> {
    let registry = nxkit::registry()?;
    let requests = manifest::load_manifest(&args.manifest)?;
    let opts = ctx.settings.compile_options(args.batch, args.jobs);
    let mut reporter = Reporter {
        verbose: ctx.verbose > 0 && !ctx.quiet,
    };
    let outcome = compile(&registry, &requests, &opts, &mut reporter)?;
    Ok((registry, outcome))
}

/// Print every failed declaration with its category and advice
pub fn report_failures(failures: &[Error]) {
    if failures.is_empty() {
        return;
    }
    ui::section("Errors");
    for failure in failures {
        let problems = failure.problems();
        match failure.resource() {
            Some(resource) if problems.len() > 1 => {
                ui::error(&format!("{resource}: {} problems", problems.len()));
                for problem in problems {
                    eprintln!("    {} {problem}", "-".red());
                }
            }
            _ => ui::error(&failure.to_string()),
        }
        eprintln!("    {}", failure.category().advice().dimmed());
    }
}
