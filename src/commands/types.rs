//! `nxtype types` - browse the resource type registry

use anyhow::{Result, anyhow};
use colored::Colorize;
use declarative::{PropertyDescriptor, ResourceDescriptor};

use crate::Context;
use crate::ui;

pub fn run(ctx: &Context, name: Option<&str>) -> Result<()> {
    let registry = nxkit::registry()?;

    match name {
        Some(name) => {
            let descriptor = registry
                .get(name)
                .ok_or_else(|| anyhow!("Unknown resource type '{name}'. Run 'nxtype types' to list them."))?;
            describe(ctx, descriptor);
        }
        None => {
            ui::header(&format!("{} registered", ui::count(registry.len(), "resource type")));
            for descriptor in registry.iter() {
                let summary = descriptor.doc().lines().next().unwrap_or_default();
                println!("  {:<40} {}", descriptor.name().bold(), summary.dimmed());
                if ctx.verbose > 0 {
                    ui::dim(&format!("    keys: {}", descriptor.key_fields().join(", ")));
                }
            }
        }
    }
    Ok(())
}

fn describe(ctx: &Context, descriptor: &ResourceDescriptor) {
    ui::header(descriptor.name());
    if !descriptor.doc().is_empty() {
        println!("{}", descriptor.doc());
    }

    ui::section("Identity");
    ui::kv("Keys", &descriptor.key_fields().join(", "));
    for pattern in descriptor.patterns().iter() {
        ui::kv("Title pattern", pattern.source());
    }
    ui::kv("Ensurable", yes_no(descriptor.is_ensurable()));
    if descriptor.is_singleton() {
        ui::kv("Singleton", "yes");
    }

    let parameters: Vec<_> = descriptor.parameters().collect();
    if !parameters.is_empty() {
        ui::section("Parameters");
        for attribute in parameters {
            show_attribute(ctx, attribute);
        }
    }

    let properties: Vec<_> = descriptor.properties().collect();
    if !properties.is_empty() {
        ui::section("Properties");
        for attribute in properties {
            show_attribute(ctx, attribute);
        }
    }

    if !descriptor.rules().is_empty() {
        ui::section("Rules");
        for rule in descriptor.rules() {
            println!("  {}", rule.name());
        }
    }

    if !descriptor.autorequires().is_empty() {
        ui::section("Autorequires");
        for autorequire in descriptor.autorequires() {
            println!("  {}", autorequire.target());
        }
    }
}

fn show_attribute(ctx: &Context, attribute: &PropertyDescriptor) {
    let mut tags = Vec::new();
    if attribute.is_list() {
        tags.push("list".to_string());
    }
    if attribute.is_property() {
        tags.push(attribute.comparison_strategy().name().to_string());
    }
    if attribute.deprecation().is_some() {
        tags.push("deprecated".yellow().to_string());
    }
    println!("  {} {}", attribute.name().bold(), format!("({})", tags.join(", ")).dimmed());

    if !ctx.quiet && !attribute.doc_str().is_empty() {
        ui::dim(&format!("  {}", attribute.doc_str()));
    }
    if !attribute.allowed_literals().is_empty() {
        ui::kv("  literals", &attribute.allowed_literals().join(", "));
    }
    if let Some(value) = attribute.default() {
        ui::kv("  default", &ui::format_value(value));
    }
    if let Some(value) = attribute.device_default_value() {
        ui::kv("  device default", &ui::format_value(value));
    }
    if let Some(note) = attribute.deprecation() {
        ui::warn(&format!("  {} is deprecated: {note}", attribute.name()));
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}
