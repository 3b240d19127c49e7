//! Build dependency tracking for change detection.
//!
//! Every file a generated artifact was derived from is recorded with its
//! SHA-256 digest, together with the digest of every scanned file and the
//! paths of the written artifacts. A later run compares them against the
//! file system to decide whether regeneration is needed.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencySet {
    files: BTreeMap<PathBuf, String>,
    scanned: BTreeMap<PathBuf, String>,
    /// Generated files that must still exist
    #[serde(default)]
    artifacts: Vec<PathBuf>,
    /// Digest of the settings the artifacts were generated with
    #[serde(default)]
    fingerprint: String,
}

impl DependencySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `path` with its current content digest.
    pub fn add_file(&mut self, path: &Path) -> io::Result<()> {
        if !self.files.contains_key(path) {
            let digest = digest_file(path)?;
            self.files.insert(path.to_path_buf(), digest);
        }
        Ok(())
    }

    /// Record the digest of every scanned file, selected or not.
    pub fn set_scanned(&mut self, files: &[PathBuf]) -> io::Result<()> {
        self.scanned = files
            .iter()
            .map(|path| digest_file(path).map(|digest| (path.clone(), digest)))
            .collect::<io::Result<_>>()?;
        Ok(())
    }

    pub fn add_artifact(&mut self, path: &Path) {
        if !self.artifacts.iter().any(|existing| existing == path) {
            self.artifacts.push(path.to_path_buf());
        }
    }

    pub fn artifacts(&self) -> &[PathBuf] {
        &self.artifacts
    }

    pub fn set_fingerprint(&mut self, fingerprint: impl Into<String>) {
        self.fingerprint = fingerprint.into();
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.files.keys().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Merge another set into this one; entries already present win.
    pub fn extend(&mut self, other: DependencySet) {
        for (path, digest) in other.files {
            self.files.entry(path).or_insert(digest);
        }
        if !other.scanned.is_empty() {
            self.scanned = other.scanned;
        }
        for artifact in &other.artifacts {
            self.add_artifact(artifact);
        }
        if !other.fingerprint.is_empty() {
            self.fingerprint = other.fingerprint;
        }
    }

    /// True when a recorded or scanned file changed or vanished, the set of
    /// files a fresh scan would see differs from the recorded one, or a
    /// generated artifact is missing.
    pub fn is_expired(&self, current_scan: &[PathBuf]) -> bool {
        let mut current = current_scan.to_vec();
        current.sort();
        current.dedup();
        if !current.iter().eq(self.scanned.keys()) {
            return true;
        }

        if let Some(missing) = self.artifacts.iter().find(|path| !path.is_file()) {
            tracing::debug!(artifact = %missing.display(), "Generated artifact is missing");
            return true;
        }

        self.scanned
            .iter()
            .chain(self.files.iter())
            .any(|(path, recorded)| match digest_file(path) {
                Ok(digest) => &digest != recorded,
                Err(_) => true,
            })
    }
}

/// Hex-encoded SHA-256 of a file's contents.
pub fn digest_file(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(digest_bytes(&bytes))
}

pub fn digest_bytes(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}
