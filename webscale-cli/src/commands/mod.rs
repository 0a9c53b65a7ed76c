use anyhow::{Context, Result};
use tracing::warn;
use webscale_stack::{declare, RawConfig, SecretState, Stack, StackSettings, StackVariant};

use crate::cli::StackArgs;
use crate::config::Config;

pub mod program;
pub mod stack;

/// Everything a command needs about the selected stack
pub struct StackContext {
    pub config: Config,
    pub raw: RawConfig,
}

impl StackContext {
    pub fn load(config: &Config, args: &StackArgs) -> Result<Self> {
        let config = config.clone().with_args(args);
        let raw = config.raw_config(&args.overrides)?;
        Ok(Self { config, raw })
    }

    pub fn settings(&self, variant: StackVariant) -> Result<StackSettings> {
        variant
            .settings(&self.raw)
            .context("Failed to resolve stack settings")
    }

    /// Resolve settings and declare the graph
    pub fn declare(&self, variant: StackVariant) -> Result<(StackSettings, Stack)> {
        let settings = self.settings(variant)?;
        let stack = declare(&self.config.project, &settings);
        Ok((settings, stack))
    }
}

/// What the engine will reject about the admin password, if anything
fn admin_password_problem(settings: &StackSettings, stack: &str) -> Option<String> {
    let hint = format!("run: pulumi config set --secret adminPassword <password> --stack {stack}");
    match &settings.admin_password {
        SecretState::Encrypted => None,
        SecretState::Unset => Some(format!("adminPassword is not set; {hint}")),
        SecretState::Plain(_) => Some(format!(
            "adminPassword is stored in plain text but the program declares it secret; {hint}"
        )),
    }
}

/// The engine fails at apply time on a missing or unencrypted password; say so up front
pub fn warn_admin_password(settings: &StackSettings, context: &StackContext) {
    if let Some(problem) = admin_password_problem(settings, &context.config.stack) {
        warn!("{}", problem);
        eprintln!("⚠ {problem}");
    }
}
