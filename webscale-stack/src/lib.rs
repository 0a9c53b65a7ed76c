//! Webscale Stack - declaration of the web scale set topology on Azure
//!
//! Reads stack configuration, declares the resource graph, and renders it as a
//! Pulumi YAML program for the provisioning engine to apply.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use webscale_stack::config::RawConfig;
//! use webscale_stack::program::Program;
//! use webscale_stack::topology::{declare, StackVariant};
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = RawConfig::load("azure-cs-vmss", Path::new("Pulumi.dev.yaml"))?;
//! let settings = StackVariant::Configured.settings(&config)?;
//! let stack = declare("azure-cs-vmss", &settings);
//! println!("{}", Program::new(&stack).to_yaml()?);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod names;
pub mod program;
pub mod scaffold;
pub mod topology;
pub mod wiring;

pub use config::{RawConfig, SecretState, StackSettings};
pub use error::{ConfigError, RenderError};
pub use program::{Program, ProgramFormat};
pub use topology::{declare, Stack, StackVariant};
