use std::fs;
use std::path::{Path, PathBuf};

use super::expand::Parameters;
use super::AutoFactoryConfig;
use crate::errors::{Error, Result};

pub const CONFIG_FILE_NAME: &str = "autofactory.toml";

/// Parameter naming the application root; defaults to the config file's directory.
pub const APP_DIR_PARAMETER: &str = "appDir";

/// A parsed configuration file and where it was found.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub path: PathBuf,
    pub config: AutoFactoryConfig,
}

impl LoadedConfig {
    /// Directory relative paths in the configuration are resolved against.
    pub fn base_dir(&self) -> PathBuf {
        self.path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }

    /// Parameters from the file plus `appDir`, then `overrides` on top.
    pub fn parameters(&self, overrides: &[(String, String)]) -> Parameters {
        let mut parameters = self.config.parameters.clone();
        parameters
            .entry(APP_DIR_PARAMETER.to_string())
            .or_insert_with(|| self.base_dir().to_string_lossy().into_owned());
        for (key, value) in overrides {
            parameters.insert(key.clone(), value.clone());
        }
        parameters
    }
}

pub fn read_config_file(path: &Path) -> Result<LoadedConfig> {
    let contents = fs::read_to_string(path).map_err(|e| {
        Error::configuration(format!("Cannot read {}: {}", path.display(), e))
    })?;
    let config = AutoFactoryConfig::from_toml(&contents)?;
    tracing::debug!("Loaded config from {}", path.display());

    let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    Ok(LoadedConfig { path, config })
}

/// Pure function to generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Load `explicit`, or search the current directory and its ancestors for
/// `autofactory.toml`.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    const MAX_TRAVERSAL_DEPTH: usize = 10;

    if let Some(path) = explicit {
        return read_config_file(path);
    }

    let current = std::env::current_dir()?;
    directory_ancestors(current, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|path| path.is_file())
        .map(|path| read_config_file(&path))
        .unwrap_or_else(|| {
            Err(Error::configuration(format!(
                "No {CONFIG_FILE_NAME} found after checking {MAX_TRAVERSAL_DEPTH} directories"
            )))
        })
}
