//! Shared error types for the generator and the runtime loader

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for autofactory operations
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid, missing, or wrongly typed configuration values
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A scan target names a type the class index does not know
    #[error("Class or interface {0} does not exist")]
    UnknownScanTarget(String),

    /// The proxy directory neither exists nor could be created
    #[error("Cannot create proxy directory {}", path.display())]
    ProxyDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A generated artifact could not be persisted
    #[error("Cannot create file {}", path.display())]
    ArtifactWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The same class is declared in more than one scanned file
    #[error("Ambiguous class {class} resolution; defined in {} and in {}", first.display(), second.display())]
    AmbiguousClass {
        class: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// Source files that cannot be read or parsed at all
    #[error("Parse error in {}: {message}", file.display())]
    Parse { file: PathBuf, message: String },

    /// The host cannot install type-resolution hooks
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a parse error for a source file
    pub fn parse(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            file: file.into(),
            message: message.into(),
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;
