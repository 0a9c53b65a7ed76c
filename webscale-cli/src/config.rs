use std::path::PathBuf;

use anyhow::{Context, Result};
use webscale_stack::scaffold::stack_config_file_name;
use webscale_stack::RawConfig;

use crate::cli::StackArgs;

/// Config namespace of existing stack files for this program
pub const DEFAULT_PROJECT: &str = "azure-cs-vmss";

#[derive(Debug, Clone)]
pub struct Config {
    pub project: String,
    pub stack: String,
    pub stack_file: Option<PathBuf>,
    pub log_dir: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());

        Ok(Self {
            project: std::env::var("WEBSCALE_PROJECT")
                .unwrap_or_else(|_| DEFAULT_PROJECT.to_string()),
            stack: std::env::var("WEBSCALE_STACK").unwrap_or_else(|_| "dev".to_string()),
            stack_file: std::env::var("WEBSCALE_STACK_FILE").ok().map(PathBuf::from),
            log_dir: std::env::var("WEBSCALE_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(home).join(".webscale")),
        })
    }

    /// Command-line flags take precedence over the environment
    pub fn with_args(mut self, args: &StackArgs) -> Self {
        if let Some(project) = &args.project {
            self.project = project.clone();
        }
        if let Some(stack) = &args.stack {
            self.stack = stack.clone();
            // a stack picked on the command line implies its own file
            self.stack_file = None;
        }
        if let Some(stack_file) = &args.stack_file {
            self.stack_file = Some(stack_file.clone());
        }
        self
    }

    pub fn stack_file_path(&self) -> PathBuf {
        self.stack_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(stack_config_file_name(&self.stack)))
    }

    /// Stack config file values with the command-line overrides applied
    pub fn raw_config(&self, overrides: &[String]) -> Result<RawConfig> {
        let path = self.stack_file_path();
        let mut raw = RawConfig::load(self.project.as_str(), &path)
            .with_context(|| format!("Failed to load stack config {}", path.display()))?;
        for assignment in overrides {
            raw.apply_override(assignment)
                .with_context(|| format!("Invalid --set value '{assignment}'"))?;
        }
        Ok(raw)
    }
}
