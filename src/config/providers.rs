//! Contributions from collaborating providers.
//!
//! Providers extend the configured scan targets and source directories.
//! Their contributions are appended after the configured values, in
//! registration order, before any scanning happens.

use std::sync::Arc;

/// Contributes additional scan target type names.
pub trait ScanForProvider: Send + Sync {
    fn scan_for(&self) -> Vec<String>;
}

/// Contributes additional source directories (may contain `%name%` parameters).
pub trait SourceDirsProvider: Send + Sync {
    fn source_dirs(&self) -> Vec<String>;
}

#[derive(Clone, Default)]
pub struct Providers {
    scan_for: Vec<Arc<dyn ScanForProvider>>,
    source_dirs: Vec<Arc<dyn SourceDirsProvider>>,
}

impl Providers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scan_for(mut self, provider: Arc<dyn ScanForProvider>) -> Self {
        self.scan_for.push(provider);
        self
    }

    pub fn with_source_dirs(mut self, provider: Arc<dyn SourceDirsProvider>) -> Self {
        self.source_dirs.push(provider);
        self
    }

    /// Register a provider implementing both capabilities.
    pub fn with_provider<P>(self, provider: P) -> Self
    where
        P: ScanForProvider + SourceDirsProvider + 'static,
    {
        let provider = Arc::new(provider);
        self.with_scan_for(provider.clone()).with_source_dirs(provider)
    }

    pub fn contributed_scan_for(&self) -> Vec<String> {
        self.scan_for.iter().flat_map(|p| p.scan_for()).collect()
    }

    pub fn contributed_source_dirs(&self) -> Vec<String> {
        self.source_dirs.iter().flat_map(|p| p.source_dirs()).collect()
    }
}

/// Fixed contributions, e.g. from command line flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticContributions {
    pub scan_for: Vec<String>,
    pub source_dirs: Vec<String>,
}

impl ScanForProvider for StaticContributions {
    fn scan_for(&self) -> Vec<String> {
        self.scan_for.clone()
    }
}

impl SourceDirsProvider for StaticContributions {
    fn source_dirs(&self) -> Vec<String> {
        self.source_dirs.clone()
    }
}
