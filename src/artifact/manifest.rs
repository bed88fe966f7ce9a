//! Artifact manifests and publish drafts.

use super::reference::ArtifactRef;
use crate::error::{PipelineError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// One file inside a published artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Logical file name inside the artifact.
    pub path: String,
    /// Content digest, `sha256:<hex>`.
    pub digest: String,
    /// File size in bytes.
    pub size: u64,
}

/// Immutable description of a published artifact version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub name: String,
    pub version: u32,
    #[serde(rename = "type")]
    pub artifact_type: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    pub files: Vec<ManifestEntry>,

    /// Aliases currently pointing at this version. Filled on resolve; the
    /// alias table is the source of truth, so this is never persisted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl ArtifactManifest {
    /// Reference that pins exactly this version.
    pub fn reference(&self) -> ArtifactRef {
        ArtifactRef::version(&self.name, self.version)
    }

    /// The only file of a single-file artifact.
    pub fn single_file(&self) -> Result<&ManifestEntry> {
        match self.files.as_slice() {
            [entry] => Ok(entry),
            files => Err(PipelineError::ArtifactError(format!(
                "artifact '{}' has {} files, expected exactly one ({})",
                self.reference(),
                files.len(),
                files
                    .iter()
                    .map(|f| f.path.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }

    /// Whether this version holds exactly the given (path, digest) pairs.
    pub fn same_content(&self, entries: &[ManifestEntry]) -> bool {
        self.files.len() == entries.len()
            && self
                .files
                .iter()
                .zip(entries)
                .all(|(a, b)| a.path == b.path && a.digest == b.digest)
    }
}

/// An artifact about to be published.
#[derive(Debug, Clone)]
pub struct ArtifactDraft {
    pub name: String,
    pub artifact_type: String,
    pub description: String,
    pub metadata: Map<String, Value>,
    pub files: Vec<PathBuf>,
}

impl ArtifactDraft {
    pub fn new(
        name: impl Into<String>,
        artifact_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            artifact_type: artifact_type.into(),
            description: description.into(),
            metadata: Map::new(),
            files: Vec::new(),
        }
    }

    /// Add a local file; its file name becomes the logical path.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.files.push(path.as_ref().to_path_buf());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}
