use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::json;
use tracing::{info, warn};
use webscale_stack::wiring::{self, Severity};
use webscale_stack::{Program, Stack, StackVariant};

use crate::cli::{Format, Output, StackArgs, Variant};
use crate::commands::{warn_admin_password, StackContext};
use crate::config::Config;

pub fn run_render(
    config: &Config,
    args: StackArgs,
    variant: Variant,
    format: Format,
    out: Option<PathBuf>,
) -> Result<()> {
    let context = StackContext::load(config, &args)?;
    let (settings, stack) = context.declare(StackVariant::from(variant))?;
    warn_admin_password(&settings, &context);

    for issue in wiring::check(&stack) {
        warn!("Wiring issue in rendered program: {}", issue);
    }

    let text = Program::new(&stack)
        .render(format.into())
        .context("Failed to render program")?;

    match out {
        Some(path) => {
            std::fs::write(&path, &text)
                .with_context(|| format!("Failed to write program to {}", path.display()))?;
            info!("Wrote program for {} to {}", context.config.stack, path.display());
            eprintln!("✓ Program written to {}", path.display());
        }
        None => print!("{text}"),
    }

    Ok(())
}

pub fn run_resources(
    config: &Config,
    args: StackArgs,
    variant: Variant,
    output: Output,
) -> Result<()> {
    let context = StackContext::load(config, &args)?;
    let (_, stack) = context.declare(StackVariant::from(variant))?;

    match output {
        Output::Json => {
            println!("{}", serde_json::to_string_pretty(&resources_json(&stack))?);
        }
        Output::Table => {
            println!("{:<15} {:<28} {:<52} {}", "KEY", "NAME", "TYPE", "REFERENCES");
            println!("{}", "-".repeat(120));

            for resource in &stack.resources {
                let references = stack.dependencies(&resource.key);
                let references = if references.is_empty() {
                    "-".to_string()
                } else {
                    references.into_iter().collect::<Vec<_>>().join(", ")
                };
                println!(
                    "{:<15} {:<28} {:<52} {}",
                    resource.key,
                    resource.name,
                    resource.kind().type_token(),
                    references
                );
            }

            println!();
            println!("{} resource(s) declared", stack.resources.len());
            for (name, reference) in &stack.outputs {
                println!("output {name} = {reference}");
            }
        }
    }

    Ok(())
}

fn resources_json(stack: &Stack) -> serde_json::Value {
    let resources: Vec<serde_json::Value> = stack
        .resources
        .iter()
        .map(|resource| {
            json!({
                "key": resource.key,
                "name": resource.name,
                "type": resource.kind().type_token(),
                "references": stack.dependencies(&resource.key),
            })
        })
        .collect();
    let outputs: serde_json::Map<String, serde_json::Value> = stack
        .outputs
        .iter()
        .map(|(name, reference)| (name.clone(), json!(reference.to_string())))
        .collect();

    json!({ "resources": resources, "outputs": outputs })
}

pub fn run_check(config: &Config, args: StackArgs, variant: Variant) -> Result<()> {
    let context = StackContext::load(config, &args)?;
    let (settings, stack) = context.declare(StackVariant::from(variant))?;
    warn_admin_password(&settings, &context);

    let issues = wiring::check(&stack);
    if issues.is_empty() {
        println!("✓ {} resource(s), wiring is consistent", stack.resources.len());
        return Ok(());
    }

    for issue in &issues {
        println!("{issue}");
    }
    let errors = issues
        .iter()
        .filter(|issue| issue.severity == Severity::Error)
        .count();
    println!();
    println!("{} issue(s), {} error(s)", issues.len(), errors);

    if wiring::has_errors(&issues) {
        anyhow::bail!("Wiring check failed with {} error(s)", errors);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use webscale_stack::{declare, StackSettings};

    #[test]
    fn test_resources_json_lists_references() {
        let stack = declare("azure-cs-vmss", &StackSettings::default());
        let value = resources_json(&stack);

        let resources = value["resources"].as_array().unwrap();
        assert_eq!(resources.len(), 7);
        assert_eq!(resources[0]["key"], "resourceGroup");
        assert_eq!(resources[0]["references"], json!([]));
        assert_eq!(resources[4]["key"], "publicIp");
        assert_eq!(resources[4]["name"], "webScaleSet-pip");
        assert_eq!(resources[4]["references"], json!(["resourceGroup"]));
        assert_eq!(value["outputs"]["publicUrl"], "${publicIp.fqdn}");
    }
}
