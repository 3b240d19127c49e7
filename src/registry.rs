//! Persistence of generated artifacts in the proxy directory.
//!
//! The registry owns the mapping from artifact name to file path; the
//! runtime loader derives paths through [`artifact_path`] as well.

use crate::codegen::naming::SOURCE_EXTENSION;
use crate::codegen::GeneratedArtifact;
use crate::dependencies::DependencySet;
use crate::errors::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// `{dir}/{name}.php`
pub fn artifact_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.{SOURCE_EXTENSION}"))
}

/// An artifact that has been written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedArtifact {
    pub name: String,
    pub qualified_name: String,
    pub class_name: Option<String>,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ArtifactRegistry {
    dir: PathBuf,
}

impl ArtifactRegistry {
    /// Open the proxy directory, creating it when absent.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if let Err(source) = fs::create_dir_all(&dir) {
            if !dir.is_dir() {
                return Err(Error::ProxyDirectory { path: dir, source });
            }
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        artifact_path(&self.dir, name)
    }

    /// Write one artifact, replacing any previous file.
    pub fn persist(&self, artifact: &GeneratedArtifact) -> Result<PersistedArtifact> {
        let path = self.path_for(&artifact.name);
        fs::write(&path, artifact.source()).map_err(|source| Error::ArtifactWrite {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(artifact = %artifact.name, path = %path.display(), "Artifact written");

        Ok(PersistedArtifact {
            name: artifact.name.clone(),
            qualified_name: artifact.qualified_name(),
            class_name: artifact.class_name.clone(),
            path,
        })
    }

    /// Write every artifact, stopping at the first failure. Build
    /// dependencies are recorded only once all writes succeeded.
    pub fn persist_all(
        &self,
        artifacts: &[GeneratedArtifact],
        dependencies: &mut DependencySet,
    ) -> Result<Vec<PersistedArtifact>> {
        let persisted = artifacts
            .iter()
            .map(|artifact| self.persist(artifact))
            .collect::<Result<Vec<_>>>()?;

        for file in artifacts.iter().flat_map(|a| a.dependencies.iter()) {
            dependencies.add_file(file)?;
        }
        for artifact in &persisted {
            dependencies.add_artifact(&artifact.path);
        }

        Ok(persisted)
    }
}
