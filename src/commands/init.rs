use crate::config::CONFIG_FILE_NAME;
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_CONFIG: &str = r#"# autofactory configuration

# Classes and interfaces whose instantiable subtypes get a factory
scan_for = []

# Directories indexed for candidate classes
source_dirs = ["%appDir%"]

proxy_namespace = "AutoFactory\\Proxies"
proxy_dir = "%appDir%/../temp/proxies"

exclude = [
    "**/tests/**",
]

[parameters]
"#;

pub fn init_config(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!("Created {CONFIG_FILE_NAME} configuration file");

    Ok(())
}
