//! Build-time generation of factory interfaces for PHP dependency injection
//! containers.
//!
//! A run indexes the configured source directories, selects every
//! instantiable subtype of the configured scan targets, and writes one
//! factory interface per class. Each factory exposes a `create` method taking
//! only the constructor's builtin-typed parameters; everything else is left to
//! the container. The generated interfaces are registered as tagged factory
//! definitions, and [`loader::ProxyLoader`] resolves them at run time.

pub mod classifier;
pub mod cli;
pub mod codegen;
pub mod commands;
pub mod config;
pub mod container;
pub mod dependencies;
pub mod emitter;
pub mod errors;
pub mod generator;
pub mod index;
pub mod loader;
pub mod registry;
pub mod selector;

pub use crate::classifier::{classify_class, classify_parameters, ClassifiedParameters, ParameterRole};
pub use crate::codegen::{generate_factory, generate_marker, GeneratedArtifact};
pub use crate::config::{AutoFactoryConfig, ResolvedConfig};
pub use crate::container::{ContainerBuilder, FactoryDefinition, Initializer};
pub use crate::errors::{Error, Result};
pub use crate::generator::{generate, GenerationReport};
pub use crate::index::{ClassIndex, ClassInfo, ClassKind};
pub use crate::loader::{Autoloader, ProxyLoader, TypeResolver};
pub use crate::registry::{ArtifactRegistry, PersistedArtifact};
pub use crate::selector::{select, TargetTypes};
