use crate::codegen::naming::SOURCE_EXTENSION;
use crate::errors::{Error, Result};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Collects PHP source files below a set of source directories.
pub struct FileWalker {
    roots: Vec<PathBuf>,
    ignore_patterns: Vec<String>,
}

impl FileWalker {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            ignore_patterns: vec![],
        }
    }

    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    /// Walk every root and return the matching files, sorted and deduplicated.
    pub fn walk(&self) -> Result<Vec<PathBuf>> {
        let patterns = self.compile_patterns()?;
        let mut files = Vec::new();

        for root in &self.roots {
            if !root.is_dir() {
                return Err(Error::configuration(format!(
                    "Source directory {} does not exist",
                    root.display()
                )));
            }

            // Scanned directories are indexed as-is, vendor code included.
            let walker = WalkBuilder::new(root)
                .standard_filters(false)
                .follow_links(true)
                .build();

            for entry in walker {
                let entry = entry.map_err(|e| Error::configuration(e.to_string()))?;
                let path = entry.path();

                if path.is_file() && self.should_process(path, &patterns) {
                    files.push(path.to_path_buf());
                }
            }
        }

        files.sort();
        files.dedup();
        Ok(files)
    }

    fn compile_patterns(&self) -> Result<Vec<glob::Pattern>> {
        self.ignore_patterns
            .iter()
            .map(|pattern| {
                glob::Pattern::new(pattern).map_err(|e| {
                    Error::configuration(format!("Invalid exclude pattern {pattern}: {e}"))
                })
            })
            .collect()
    }

    fn should_process(&self, path: &Path, patterns: &[glob::Pattern]) -> bool {
        let matches_extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(SOURCE_EXTENSION))
            .unwrap_or(false);
        if !matches_extension {
            return false;
        }

        let path_str = path.to_string_lossy();
        !patterns.iter().any(|p| p.matches(&path_str))
    }
}

pub fn find_source_files(roots: &[PathBuf], ignore_patterns: &[String]) -> Result<Vec<PathBuf>> {
    FileWalker::new(roots.to_vec())
        .with_ignore_patterns(ignore_patterns.to_vec())
        .walk()
}
