//! Generator configuration.
//!
//! [`AutoFactoryConfig`] is the raw `autofactory.toml` content. Resolution
//! merges provider contributions, expands `%name%` parameters, normalizes
//! the proxy namespace and anchors relative paths, producing the
//! [`ResolvedConfig`] the generator consumes.

pub mod expand;
pub mod loader;
pub mod providers;

use crate::codegen::naming::DEFAULT_PROXY_NAMESPACE;
use crate::errors::{Error, Result};
use crate::index::names::trim_separators;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use expand::{expand, Parameters};
pub use loader::{load_config, LoadedConfig, CONFIG_FILE_NAME};
pub use providers::{Providers, ScanForProvider, SourceDirsProvider, StaticContributions};

pub const DEFAULT_PROXY_DIR: &str = "%appDir%/../temp/proxies";

/// A configuration value given either as a single string or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Self::One(value) => vec![value.clone()],
            Self::Many(values) => values.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AutoFactoryConfig {
    /// Types whose instantiable subtypes receive a factory
    #[serde(default, alias = "scanFor")]
    pub scan_for: Option<OneOrMany>,

    /// Directories indexed for candidate classes
    #[serde(default, alias = "sourceDirs")]
    pub source_dirs: Option<OneOrMany>,

    #[serde(default = "default_proxy_namespace", alias = "proxyNamespace")]
    pub proxy_namespace: String,

    #[serde(default = "default_proxy_dir", alias = "proxyDir")]
    pub proxy_dir: String,

    /// Glob patterns of source files to leave out of the index
    #[serde(default)]
    pub exclude: Vec<String>,

    #[serde(default)]
    pub parameters: Parameters,
}

fn default_proxy_namespace() -> String {
    DEFAULT_PROXY_NAMESPACE.to_string()
}

fn default_proxy_dir() -> String {
    DEFAULT_PROXY_DIR.to_string()
}

impl Default for AutoFactoryConfig {
    fn default() -> Self {
        Self {
            scan_for: None,
            source_dirs: None,
            proxy_namespace: default_proxy_namespace(),
            proxy_dir: default_proxy_dir(),
            exclude: Vec::new(),
            parameters: Parameters::new(),
        }
    }
}

/// Fully resolved settings for one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedConfig {
    pub scan_for: Vec<String>,
    pub source_dirs: Vec<PathBuf>,
    pub proxy_namespace: String,
    pub proxy_dir: PathBuf,
    pub exclude: Vec<String>,
}

impl AutoFactoryConfig {
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| Error::configuration(format!("Failed to parse {CONFIG_FILE_NAME}: {e}")))
    }

    /// Resolve against `parameters` and provider contributions. Relative
    /// paths are anchored at `base_dir`.
    pub fn resolve(
        &self,
        base_dir: &Path,
        parameters: &Parameters,
        providers: &Providers,
    ) -> Result<ResolvedConfig> {
        let proxy_dir = anchor(base_dir, &expand(&self.proxy_dir, parameters)?);

        let mut source_dirs = required(&self.source_dirs, "source_dirs")?;
        source_dirs.extend(providers.contributed_source_dirs());
        let source_dirs = source_dirs
            .iter()
            .map(|dir| expand(dir, parameters).map(|dir| anchor(base_dir, &dir)))
            .collect::<Result<Vec<_>>>()?;

        let mut scan_for = required(&self.scan_for, "scan_for")?;
        scan_for.extend(providers.contributed_scan_for());

        Ok(ResolvedConfig {
            scan_for,
            source_dirs,
            proxy_namespace: trim_separators(self.proxy_namespace.trim()).to_string(),
            proxy_dir,
            exclude: self.exclude.clone(),
        })
    }
}

fn required(value: &Option<OneOrMany>, key: &str) -> Result<Vec<String>> {
    value.as_ref().map(OneOrMany::to_vec).ok_or_else(|| {
        Error::configuration(format!(
            "The option '{key}' expects a string or an array of strings, none given"
        ))
    })
}

fn anchor(base_dir: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}
