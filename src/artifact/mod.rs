//! Artifact store: named, versioned, immutable file sets.
//!
//! Stages talk to the store only through the [`ArtifactStore`] trait. The
//! tracking service owns real storage; [`FsArtifactStore`] is the local,
//! content-addressed stand-in used by the CLI and the tests.

mod fs_store;
mod manifest;
mod reference;

#[cfg(test)]
mod tests;

use crate::error::Result;
use std::path::{Path, PathBuf};

pub use fs_store::FsArtifactStore;
pub use manifest::{ArtifactDraft, ArtifactManifest, ManifestEntry};
pub use reference::{
    ArtifactRef, LATEST_ALIAS, VersionSelector, validate_alias, validate_artifact_name,
};

/// Operations the pipeline needs from an artifact/tracking backend.
pub trait ArtifactStore {
    /// Resolve a reference to the manifest of a concrete version.
    fn resolve(&self, reference: &ArtifactRef) -> Result<ArtifactManifest>;

    /// Materialize the files of `manifest` under `dest` and return `dest`.
    fn download(&self, manifest: &ArtifactManifest, dest: &Path) -> Result<PathBuf>;

    /// Publish a new version, or return the latest one if its content is identical.
    fn publish(&self, draft: &ArtifactDraft) -> Result<ArtifactManifest>;

    /// All versions of all artifacts, sorted by name then version.
    fn list(&self) -> Result<Vec<ArtifactManifest>>;

    /// Point `alias` at the version `reference` resolves to.
    fn set_alias(&self, reference: &ArtifactRef, alias: &str) -> Result<ArtifactManifest>;

    /// Directory where run records for this store live.
    fn runs_dir(&self) -> PathBuf;
}
