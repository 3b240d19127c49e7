use super::ConfigSource;
use crate::container::{ContainerBuilder, MANIFEST_FILE_NAME};
use crate::generator::{generate, is_fresh};
use anyhow::{Context, Result};

#[derive(Debug, Clone, Default)]
pub struct GenerateConfig {
    pub source: ConfigSource,
    /// Regenerate even when nothing changed since the last run
    pub force: bool,
}

pub fn handle_generate(config: GenerateConfig) -> Result<()> {
    let (_, parameters, resolved) = config.source.resolve()?;
    let manifest_path = resolved.proxy_dir.join(MANIFEST_FILE_NAME);

    if !config.force {
        if let Some(previous) = ContainerBuilder::load(&manifest_path)? {
            if is_fresh(&resolved, &previous)? {
                println!(
                    "Factories in {} are up to date",
                    resolved.proxy_dir.display()
                );
                return Ok(());
            }
        }
    }

    let mut builder = ContainerBuilder::new().with_parameters(parameters);
    let report = generate(&resolved, &mut builder).context("Factory generation failed")?;
    builder
        .save(&manifest_path)
        .context("Failed to write container manifest")?;

    for factory in &report.factories {
        println!(
            "{} -> {}",
            factory.class_name.as_deref().unwrap_or_default(),
            factory.qualified_name
        );
    }
    println!(
        "Generated {} factories from {} classes in {} files ({})",
        report.definitions,
        report.indexed_classes,
        report.scanned_files,
        resolved.proxy_dir.display()
    );

    Ok(())
}
