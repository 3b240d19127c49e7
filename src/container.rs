//! Host container model.
//!
//! The generator only needs a small slice of a dependency injection
//! container: named definitions with tags, build dependencies, parameters,
//! and initialization steps that run when the compiled container starts.
//! The builder serializes to a JSON manifest the host consumes.

use crate::dependencies::DependencySet;
use crate::errors::{Error, Result};
use crate::loader::{Autoloader, ProxyLoader};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Tag carried by every generated factory definition.
pub const FACTORY_TAG: &str = "autofactory";

/// File name of the serialized container next to the artifacts.
pub const MANIFEST_FILE_NAME: &str = "container.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactoryDefinition {
    /// Fully-qualified name of the interface the container implements
    pub implement: String,
    pub tags: BTreeMap<String, Vec<String>>,
}

impl FactoryDefinition {
    pub fn set_implement(&mut self, interface: impl Into<String>) -> &mut Self {
        self.implement = interface.into();
        self
    }

    pub fn add_tag(&mut self, tag: impl Into<String>, metadata: Vec<String>) -> &mut Self {
        self.tags.insert(tag.into(), metadata);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedDefinition {
    pub name: String,
    pub definition: FactoryDefinition,
}

/// Step executed when the compiled container initializes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Initializer {
    RegisterProxyLoader { dir: PathBuf, namespace: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerBuilder {
    parameters: BTreeMap<String, String>,
    definitions: Vec<NamedDefinition>,
    dependencies: DependencySet,
    initializers: Vec<Initializer>,
}

impl ContainerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parameters(mut self, parameters: BTreeMap<String, String>) -> Self {
        self.parameters = parameters;
        self
    }

    /// Add an empty definition under a unique name.
    pub fn add_definition(&mut self, name: impl Into<String>) -> Result<&mut FactoryDefinition> {
        let name = name.into();
        if self.has_definition(&name) {
            return Err(Error::configuration(format!(
                "Service '{name}' has already been added"
            )));
        }
        self.definitions.push(NamedDefinition {
            name,
            definition: FactoryDefinition::default(),
        });
        let added = self.definitions.len() - 1;
        Ok(&mut self.definitions[added].definition)
    }

    pub fn has_definition(&self, name: &str) -> bool {
        self.definitions.iter().any(|d| d.name == name)
    }

    pub fn definition(&self, name: &str) -> Option<&FactoryDefinition> {
        self.definitions
            .iter()
            .find(|d| d.name == name)
            .map(|d| &d.definition)
    }

    pub fn definitions(&self) -> &[NamedDefinition] {
        &self.definitions
    }

    /// Definition names carrying `tag`, with the tag metadata, in
    /// registration order.
    pub fn find_by_tag(&self, tag: &str) -> Vec<(&str, &[String])> {
        self.definitions
            .iter()
            .filter_map(|d| {
                d.definition
                    .tags
                    .get(tag)
                    .map(|metadata| (d.name.as_str(), metadata.as_slice()))
            })
            .collect()
    }

    pub fn add_dependencies(&mut self, dependencies: DependencySet) {
        self.dependencies.extend(dependencies);
    }

    pub fn dependencies(&self) -> &DependencySet {
        &self.dependencies
    }

    /// Run `initializer` before every initializer added so far.
    pub fn prepend_initializer(&mut self, initializer: Initializer) {
        if !self.initializers.contains(&initializer) {
            self.initializers.insert(0, initializer);
        }
    }

    pub fn initializers(&self) -> &[Initializer] {
        &self.initializers
    }

    /// Execute the initializers against the process's type-resolution host.
    pub fn initialize(&self, host: &mut Autoloader) -> Result<()> {
        for initializer in &self.initializers {
            match initializer {
                Initializer::RegisterProxyLoader { dir, namespace } => {
                    ProxyLoader::register(host, dir, namespace)?;
                }
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?).map_err(|source| Error::ArtifactWrite {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a previously saved manifest, `None` when it does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        match fs::read_to_string(path) {
            Ok(json) => Self::from_json(&json).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
