use crate::commands::ConfigSource;
use crate::config::StaticContributions;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "autofactory")]
#[command(about = "Factory interface generator for PHP dependency injection containers", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase verbosity level (can be repeated: -v, -vv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Configuration file (defaults to the nearest autofactory.toml)
    #[arg(short, long, env = "AUTOFACTORY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Set a %parameter% value (can be repeated)
    #[arg(short = 'p', long = "parameter", value_name = "KEY=VALUE", value_parser = parse_parameter)]
    pub parameters: Vec<(String, String)>,

    /// Additional class or interface to scan for
    #[arg(long = "scan-for", value_name = "TYPE")]
    pub scan_for: Vec<String>,

    /// Additional source directory to index
    #[arg(long = "source-dir", value_name = "DIR")]
    pub source_dirs: Vec<String>,
}

impl From<ConfigArgs> for ConfigSource {
    fn from(args: ConfigArgs) -> Self {
        Self {
            config: args.config,
            parameters: args.parameters,
            contributions: StaticContributions {
                scan_for: args.scan_for,
                source_dirs: args.source_dirs,
            },
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate factory interfaces and the container manifest
    Generate {
        #[command(flatten)]
        config: ConfigArgs,

        /// Regenerate even if nothing changed
        #[arg(long)]
        force: bool,
    },

    /// Resolve a type through the generated proxy loader
    Resolve {
        /// Fully qualified type name
        #[arg(value_name = "TYPE")]
        type_name: String,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// List indexed classes, marking the ones that get a factory
    Index {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Initialize an autofactory.toml in the current directory
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

/// Parse a `key=value` parameter override.
pub fn parse_parameter(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
