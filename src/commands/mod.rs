//! CLI command implementations.
//!
//! - **generate**: Run factory generation and write the container manifest
//! - **resolve**: Resolve a type through the runtime proxy loader
//! - **index**: List the classes discovered in the source directories
//! - **init**: Write a starter configuration file

pub mod generate;
pub mod index;
pub mod init;
pub mod resolve;

pub use generate::{handle_generate, GenerateConfig};
pub use index::handle_index;
pub use init::init_config;
pub use resolve::handle_resolve;

use crate::config::{load_config, LoadedConfig, Parameters, Providers, ResolvedConfig, StaticContributions};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Options shared by every command that reads the configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigSource {
    pub config: Option<PathBuf>,
    pub parameters: Vec<(String, String)>,
    pub contributions: StaticContributions,
}

impl ConfigSource {
    /// Load, merge and resolve the configuration.
    pub fn resolve(&self) -> Result<(LoadedConfig, Parameters, ResolvedConfig)> {
        let loaded = load_config(self.config.as_deref()).context("Failed to load configuration")?;
        let parameters = loaded.parameters(&self.parameters);
        let providers = Providers::new().with_provider(self.contributions.clone());
        let resolved = loaded
            .config
            .resolve(&loaded.base_dir(), &parameters, &providers)
            .with_context(|| format!("Invalid configuration in {}", loaded.path.display()))?;
        Ok((loaded, parameters, resolved))
    }
}
