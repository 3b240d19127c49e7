//! One generation run: index, select, classify, generate, persist, register.
//!
//! The run is all-or-nothing with respect to the container: definitions are
//! added only after every artifact has been written.

use crate::classifier::classify_class;
use crate::codegen::{generate_factory, generate_marker, GeneratedArtifact};
use crate::config::ResolvedConfig;
use crate::container::{ContainerBuilder, Initializer};
use crate::dependencies::{digest_bytes, DependencySet};
use crate::emitter::emit_definitions;
use crate::errors::Result;
use crate::index::walker::find_source_files;
use crate::index::ClassIndex;
use crate::registry::{ArtifactRegistry, PersistedArtifact};
use crate::selector::{select, TargetTypes};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// Factory artifacts written, in definition order
    pub factories: Vec<PersistedArtifact>,
    pub definitions: usize,
    pub indexed_classes: usize,
    pub scanned_files: usize,
}

/// Run generation for `config`, registering results in `builder`.
pub fn generate(config: &ResolvedConfig, builder: &mut ContainerBuilder) -> Result<GenerationReport> {
    let registry = ArtifactRegistry::open(&config.proxy_dir)?;
    let index = ClassIndex::build(&config.source_dirs, &config.exclude)?;
    let targets = TargetTypes::resolve(&index, &config.scan_for)?;

    let artifacts = build_artifacts(&index, &targets, &config.proxy_namespace);

    let mut dependencies = DependencySet::new();
    let persisted = registry.persist_all(&artifacts, &mut dependencies)?;
    dependencies.set_scanned(index.files())?;
    dependencies.set_fingerprint(fingerprint(config)?);

    let definitions = emit_definitions(builder, &persisted)?;
    builder.add_dependencies(dependencies);
    builder.prepend_initializer(Initializer::RegisterProxyLoader {
        dir: registry.dir().to_path_buf(),
        namespace: config.proxy_namespace.clone(),
    });

    let factories: Vec<PersistedArtifact> = persisted
        .into_iter()
        .filter(|artifact| artifact.class_name.is_some())
        .collect();
    tracing::info!(
        factories = factories.len(),
        dir = %registry.dir().display(),
        "Generated factory interfaces"
    );

    Ok(GenerationReport {
        factories,
        definitions,
        indexed_classes: index.len(),
        scanned_files: index.files().len(),
    })
}

/// The marker interface followed by one factory per selected class, in
/// index order.
pub fn build_artifacts(index: &ClassIndex, targets: &TargetTypes, namespace: &str) -> Vec<GeneratedArtifact> {
    let factories = select(index, targets).into_iter().map(|class| {
        let classified = classify_class(index, class);
        tracing::debug!(
            class = %class.name,
            builtin = classified.builtin.len(),
            delegated = classified.delegated.len(),
            "Classified constructor parameters"
        );
        generate_factory(class, &classified.builtin, namespace, index.ancestry_files(class))
    });

    std::iter::once(generate_marker(namespace))
        .chain(factories)
        .collect()
}

/// True when `previous` was generated from the same settings and none of
/// its recorded dependencies or the set of scanned files changed since.
pub fn is_fresh(config: &ResolvedConfig, previous: &ContainerBuilder) -> Result<bool> {
    if previous.dependencies().fingerprint() != fingerprint(config)? {
        return Ok(false);
    }
    let current = find_source_files(&config.source_dirs, &config.exclude)?;
    Ok(!previous.dependencies().is_expired(&current))
}

/// Digest of the resolved settings, stored with the build dependencies.
pub fn fingerprint(config: &ResolvedConfig) -> Result<String> {
    Ok(digest_bytes(&serde_json::to_vec(config)?))
}
