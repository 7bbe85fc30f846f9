//! Document source collaborator.
//!
//! Documents are registered up front (name -> text source) and are static
//! for the process lifetime. The pipeline only ever sees extracted text;
//! turning PDFs or other formats into text happens outside this system.

use crate::types::DocumentName;
use askdocs_core::{AppError, AppResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Collaborator that resolves a document name to its raw text.
#[async_trait::async_trait]
pub trait DocumentSource: Send + Sync {
    /// All registered document names, sorted.
    fn names(&self) -> Vec<DocumentName>;

    /// Fetch the raw text of a document.
    ///
    /// Fails with `DocumentNotFound` for unregistered names or unreadable
    /// sources.
    async fn fetch(&self, name: &DocumentName) -> AppResult<String>;
}

/// Filesystem-backed document source.
///
/// Each registered document points at a UTF-8 text file.
pub struct FsDocumentSource {
    paths: BTreeMap<DocumentName, PathBuf>,
}

impl FsDocumentSource {
    pub fn new(paths: BTreeMap<DocumentName, PathBuf>) -> Self {
        Self { paths }
    }

    /// Build from the configuration registry (name -> path).
    pub fn from_registry(registry: &BTreeMap<String, PathBuf>) -> Self {
        let paths = registry
            .iter()
            .map(|(name, path)| (DocumentName::from(name.as_str()), path.clone()))
            .collect();
        Self { paths }
    }

    fn path_for(&self, name: &DocumentName) -> AppResult<&Path> {
        self.paths
            .get(name)
            .map(PathBuf::as_path)
            .ok_or_else(|| AppError::DocumentNotFound(name.to_string()))
    }
}

#[async_trait::async_trait]
impl DocumentSource for FsDocumentSource {
    fn names(&self) -> Vec<DocumentName> {
        self.paths.keys().cloned().collect()
    }

    async fn fetch(&self, name: &DocumentName) -> AppResult<String> {
        let path = self.path_for(name)?;
        tracing::debug!(document = %name, path = %path.display(), "reading document text");

        tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::DocumentNotFound(format!("{} ({}): {}", name, path.display(), e))
        })
    }
}

/// In-memory document source.
///
/// Holds the document texts directly; used by tests and small embedded
/// deployments where the corpus ships with the binary.
#[derive(Debug, Default)]
pub struct StaticDocumentSource {
    docs: BTreeMap<DocumentName, String>,
}

impl StaticDocumentSource {
    pub fn new(docs: impl IntoIterator<Item = (DocumentName, String)>) -> Self {
        Self {
            docs: docs.into_iter().collect(),
        }
    }
}

#[async_trait::async_trait]
impl DocumentSource for StaticDocumentSource {
    fn names(&self) -> Vec<DocumentName> {
        self.docs.keys().cloned().collect()
    }

    async fn fetch(&self, name: &DocumentName) -> AppResult<String> {
        self.docs
            .get(name)
            .cloned()
            .ok_or_else(|| AppError::DocumentNotFound(name.to_string()))
    }
}
