use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use webscale_stack::{ProgramFormat, StackVariant};

/// Webscale - IIS scale set behind an application gateway, as a Pulumi program
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub mode: Mode,
}

/// Options selecting the project, stack, and config values
#[derive(clap::Args, Debug, Clone, Default)]
pub struct StackArgs {
    /// Project name, also the config namespace (default: $WEBSCALE_PROJECT or "azure-cs-vmss")
    #[arg(long)]
    pub project: Option<String>,

    /// Stack name (default: $WEBSCALE_STACK or "dev")
    #[arg(short, long)]
    pub stack: Option<String>,

    /// Stack config file (default: Pulumi.<stack>.yaml)
    #[arg(long)]
    pub stack_file: Option<PathBuf>,

    /// Override a config value, may be repeated (e.g. --set instanceCount=4)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub overrides: Vec<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Variant {
    /// Values from stack config, with defaults
    #[default]
    Configured,
    /// Hard-coded values, stack config ignored
    Fixed,
}

impl From<Variant> for StackVariant {
    fn from(variant: Variant) -> Self {
        match variant {
            Variant::Configured => StackVariant::Configured,
            Variant::Fixed => StackVariant::Fixed,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Yaml,
    Json,
}

impl From<Format> for ProgramFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Yaml => ProgramFormat::Yaml,
            Format::Json => ProgramFormat::Json,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Output {
    #[default]
    Table,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Mode {
    /// Render the Pulumi program for the stack
    Render {
        #[command(flatten)]
        stack: StackArgs,

        /// Which rendition of the topology to declare
        #[arg(long, value_enum, default_value_t = Variant::Configured)]
        variant: Variant,

        /// Program syntax
        #[arg(short, long, value_enum, default_value_t = Format::Yaml)]
        format: Format,

        /// Write to a file instead of stdout (e.g. Pulumi.yaml)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Show resolved configuration values
    Config {
        #[command(flatten)]
        stack: StackArgs,

        /// Show plain-text secret values (use with caution)
        #[arg(long)]
        show_secrets: bool,
    },

    /// List declared resources and what they reference
    Resources {
        #[command(flatten)]
        stack: StackArgs,

        #[arg(long, value_enum, default_value_t = Variant::Configured)]
        variant: Variant,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Output::Table)]
        output: Output,
    },

    /// Check cross-resource wiring before handing the program to the engine
    Check {
        #[command(flatten)]
        stack: StackArgs,

        #[arg(long, value_enum, default_value_t = Variant::Configured)]
        variant: Variant,
    },

    /// Write a starter stack config file listing every key and its default
    Init {
        #[command(flatten)]
        stack: StackArgs,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_render_arguments() {
        let args = Args::try_parse_from([
            "webscale",
            "render",
            "--stack",
            "prod",
            "--set",
            "instanceCount=4",
            "--set",
            "zones=1,2,3",
            "--variant",
            "fixed",
            "-f",
            "json",
        ])
        .unwrap();

        match args.mode {
            Mode::Render {
                stack,
                variant,
                format,
                out,
            } => {
                assert_eq!(stack.stack.as_deref(), Some("prod"));
                assert_eq!(stack.overrides, vec!["instanceCount=4", "zones=1,2,3"]);
                assert_eq!(variant, Variant::Fixed);
                assert_eq!(format, Format::Json);
                assert!(out.is_none());
            }
            other => panic!("unexpected mode: {other:?}"),
        }
    }

    #[test]
    fn test_defaults_for_check() {
        let args = Args::try_parse_from(["webscale", "check"]).unwrap();
        match args.mode {
            Mode::Check { stack, variant } => {
                assert!(stack.project.is_none());
                assert!(stack.overrides.is_empty());
                assert_eq!(variant, Variant::Configured);
            }
            other => panic!("unexpected mode: {other:?}"),
        }
    }
}
