use anyhow::{Context, Result};
use tracing::info;
use webscale_stack::config::ConfigValue;
use webscale_stack::names::config_keys;
use webscale_stack::scaffold::render_stack_config;
use webscale_stack::{RawConfig, SecretState, StackSettings, StackVariant};

use crate::cli::StackArgs;
use crate::commands::StackContext;
use crate::config::Config;

pub fn run_config(config: &Config, args: StackArgs, show_secrets: bool) -> Result<()> {
    let context = StackContext::load(config, &args)?;
    let settings = context.settings(StackVariant::Configured)?;

    println!(
        "Stack: {}/{} ({})",
        context.config.project,
        context.config.stack,
        context.config.stack_file_path().display()
    );
    println!("{}", "=".repeat(70));
    println!();
    println!("{:<20} {:<30} {}", "KEY", "VALUE", "SOURCE");
    println!("{}", "-".repeat(70));

    for (key, value) in settings_rows(&settings, show_secrets) {
        println!("{:<20} {:<30} {}", key, value, source(&context.raw, key));
    }

    Ok(())
}

fn settings_rows(settings: &StackSettings, show_secrets: bool) -> Vec<(&'static str, String)> {
    let admin_password = match &settings.admin_password {
        SecretState::Unset => "(not set)".to_string(),
        SecretState::Encrypted => "[encrypted]".to_string(),
        SecretState::Plain(value) if show_secrets => value.clone(),
        SecretState::Plain(_) => "********".to_string(),
    };

    vec![
        (config_keys::REGION, settings.region.clone()),
        (config_keys::ADDRESS_SPACE, settings.address_space.join(",")),
        (config_keys::PRIVATE_SUBNET, settings.private_subnet_prefix.clone()),
        (config_keys::PUBLIC_SUBNET, settings.public_subnet_prefix.clone()),
        (config_keys::DNS_PREFIX, settings.dns_prefix.clone()),
        (config_keys::BACKEND_PORT, settings.backend_port.to_string()),
        (config_keys::BACKEND_PROTOCOL, settings.backend_protocol.clone()),
        (config_keys::FRONTEND_PORT, settings.frontend_port.to_string()),
        (config_keys::FRONTEND_PROTOCOL, settings.frontend_protocol.clone()),
        (config_keys::INSTANCE_COUNT, settings.instance_count.to_string()),
        (config_keys::ZONES, settings.zones.join(",")),
        (config_keys::INSTANCE_SIZE, settings.instance_size.clone()),
        (config_keys::INSTANCE_NAME_PREFIX, settings.instance_name_prefix.clone()),
        (config_keys::ADMIN_USER, settings.admin_user.clone()),
        (config_keys::ADMIN_PASSWORD, admin_password),
    ]
}

fn source(raw: &RawConfig, key: &str) -> &'static str {
    match raw.raw(key) {
        Some(ConfigValue::Secure(_)) => "stack (secure)",
        Some(ConfigValue::Plain(_)) => "stack",
        None if key == config_keys::FRONTEND_PORT => "default (backendPort)",
        None if key == config_keys::FRONTEND_PROTOCOL => "default (backendProtocol)",
        None => "default",
    }
}

/// Write the scaffold without reading the existing file
pub fn run_init(config: &Config, args: StackArgs, force: bool) -> Result<()> {
    let config = config.clone().with_args(&args);
    let path = config.stack_file_path();

    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists, pass --force to overwrite it",
            path.display()
        );
    }

    let text = render_stack_config(&config.project, &config.stack)
        .context("Failed to render stack config")?;
    std::fs::write(&path, text)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!("Wrote stack config scaffold to {}", path.display());
    eprintln!("✓ Stack config written to {}", path.display());
    Ok(())
}
