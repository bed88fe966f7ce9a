//! Filesystem-backed artifact store.
//!
//! Layout under the store root:
//!
//! ```text
//! blobs/sha256/<aa>/<bb>/<hex>            content-addressed file bodies
//! artifacts/<name>/v<N>/manifest.json     one immutable manifest per version
//! artifacts/<name>/aliases.json           alias -> version table
//! runs/<run_id>/                          run records (see `context`)
//! ```

use super::manifest::{ArtifactDraft, ArtifactManifest, ManifestEntry};
use super::reference::{
    ArtifactRef, LATEST_ALIAS, VersionSelector, validate_alias, validate_artifact_name,
};
use super::ArtifactStore;
use crate::error::{PipelineError, Result};
use crate::fs::{atomic_copy, atomic_write};
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashSet};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

type AliasTable = BTreeMap<String, u32>;

/// Artifact store rooted at a local directory.
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    /// Open a store rooted at `root`. Directories are created lazily on publish.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn artifact_dir(&self, name: &str) -> PathBuf {
        self.root.join("artifacts").join(name)
    }

    fn manifest_path(&self, name: &str, version: u32) -> PathBuf {
        self.artifact_dir(name)
            .join(format!("v{}", version))
            .join("manifest.json")
    }

    fn aliases_path(&self, name: &str) -> PathBuf {
        self.artifact_dir(name).join("aliases.json")
    }

    fn blob_path(&self, digest: &str) -> Result<PathBuf> {
        let hex = digest
            .strip_prefix("sha256:")
            .filter(|h| h.len() == 64 && h.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| {
                PipelineError::ArtifactError(format!("malformed digest '{}'", digest))
            })?;
        Ok(self
            .root
            .join("blobs")
            .join("sha256")
            .join(&hex[0..2])
            .join(&hex[2..4])
            .join(hex))
    }

    /// Published versions of `name`, ascending.
    fn versions(&self, name: &str) -> Result<Vec<u32>> {
        let dir = self.artifact_dir(name);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&dir).map_err(|e| io_error("read", &dir, e))?;
        let mut versions: Vec<u32> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let file_name = entry.file_name();
                let version = file_name.to_str()?.strip_prefix('v')?.parse().ok()?;
                entry.path().join("manifest.json").exists().then_some(version)
            })
            .collect();
        versions.sort_unstable();
        Ok(versions)
    }

    fn read_manifest(&self, name: &str, version: u32) -> Result<ArtifactManifest> {
        let path = self.manifest_path(name, version);
        let content = fs::read_to_string(&path).map_err(|e| io_error("read", &path, e))?;
        serde_json::from_str(&content).map_err(|e| {
            PipelineError::ArtifactError(format!(
                "corrupt manifest '{}': {}",
                path.display(),
                e
            ))
        })
    }

    fn read_aliases(&self, name: &str) -> Result<AliasTable> {
        let path = self.aliases_path(name);
        if !path.exists() {
            return Ok(AliasTable::new());
        }
        let content = fs::read_to_string(&path).map_err(|e| io_error("read", &path, e))?;
        serde_json::from_str(&content).map_err(|e| {
            PipelineError::ArtifactError(format!(
                "corrupt alias table '{}': {}",
                path.display(),
                e
            ))
        })
    }

    fn write_aliases(&self, name: &str, aliases: &AliasTable) -> Result<()> {
        let path = self.aliases_path(name);
        let json = serde_json::to_string_pretty(aliases).map_err(|e| {
            PipelineError::ArtifactError(format!("failed to serialize alias table: {}", e))
        })?;
        atomic_write(&path, json.as_bytes()).map_err(|e| io_error("write", &path, e))
    }

    fn with_aliases(&self, mut manifest: ArtifactManifest) -> Result<ArtifactManifest> {
        let aliases = self.read_aliases(&manifest.name)?;
        manifest.aliases = aliases
            .into_iter()
            .filter(|(_, v)| *v == manifest.version)
            .map(|(alias, _)| alias)
            .collect();
        Ok(manifest)
    }

    fn describe_available(&self, name: &str) -> Result<String> {
        let versions = self.versions(name)?;
        let aliases = self.read_aliases(name)?;
        let mut parts: Vec<String> = versions.iter().map(|v| format!("v{}", v)).collect();
        parts.extend(aliases.keys().cloned());
        Ok(parts.join(", "))
    }

    fn stage_entries(&self, draft: &ArtifactDraft) -> Result<Vec<ManifestEntry>> {
        if draft.files.is_empty() {
            return Err(PipelineError::UserError(format!(
                "artifact '{}' has no files to publish",
                draft.name
            )));
        }

        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(draft.files.len());
        for file in &draft.files {
            let logical = file
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| {
                    PipelineError::UserError(format!("invalid file path '{}'", file.display()))
                })?
                .to_string();
            if !seen.insert(logical.clone()) {
                return Err(PipelineError::UserError(format!(
                    "artifact '{}' lists file name '{}' twice",
                    draft.name, logical
                )));
            }

            let (digest, size) = digest_file(file)?;
            entries.push(ManifestEntry {
                path: logical,
                digest,
                size,
            });
        }
        Ok(entries)
    }
}

impl ArtifactStore for FsArtifactStore {
    fn resolve(&self, reference: &ArtifactRef) -> Result<ArtifactManifest> {
        let version = match &reference.selector {
            VersionSelector::Version(v) => Some(*v),
            VersionSelector::Alias(alias) => {
                let aliases = self.read_aliases(&reference.name)?;
                match aliases.get(alias) {
                    Some(v) => Some(*v),
                    None if alias == LATEST_ALIAS => self.versions(&reference.name)?.last().copied(),
                    None => None,
                }
            }
        };

        let version = version
            .filter(|v| self.manifest_path(&reference.name, *v).exists())
            .ok_or_else(|| {
                let available = self.describe_available(&reference.name).unwrap_or_default();
                PipelineError::ArtifactError(if available.is_empty() {
                    format!("artifact '{}' not found in store", reference)
                } else {
                    format!(
                        "artifact '{}' not found. Available: {}",
                        reference, available
                    )
                })
            })?;

        debug!(artifact = %reference, version, "resolved artifact");
        self.with_aliases(self.read_manifest(&reference.name, version)?)
    }

    fn download(&self, manifest: &ArtifactManifest, dest: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dest).map_err(|e| io_error("create", dest, e))?;

        for entry in &manifest.files {
            let blob = self.blob_path(&entry.digest)?;
            if !blob.exists() {
                return Err(PipelineError::ArtifactError(format!(
                    "blob for '{}' in '{}' is missing from the store",
                    entry.path,
                    manifest.reference()
                )));
            }

            let target = dest.join(&entry.path);
            atomic_copy(&blob, &target).map_err(|e| io_error("download", &target, e))?;

            let (digest, _) = digest_file(&target)?;
            if digest != entry.digest {
                return Err(PipelineError::ArtifactError(format!(
                    "downloaded '{}' does not match its manifest digest (expected {}, got {})",
                    target.display(),
                    entry.digest,
                    digest
                )));
            }
        }

        Ok(dest.to_path_buf())
    }

    fn publish(&self, draft: &ArtifactDraft) -> Result<ArtifactManifest> {
        validate_artifact_name(&draft.name)?;
        if draft.artifact_type.trim().is_empty() {
            return Err(PipelineError::UserError(format!(
                "artifact '{}' needs a non-empty type",
                draft.name
            )));
        }

        let entries = self.stage_entries(draft)?;
        let versions = self.versions(&draft.name)?;

        if let Some(&latest) = versions.last() {
            let current = self.read_manifest(&draft.name, latest)?;
            if current.same_content(&entries) {
                info!(artifact = %current.reference(), "content unchanged, reusing existing version");
                return self.with_aliases(current);
            }
        }

        for (file, entry) in draft.files.iter().zip(&entries) {
            let blob = self.blob_path(&entry.digest)?;
            if !blob.exists() {
                atomic_copy(file, &blob).map_err(|e| io_error("store", &blob, e))?;
            }
        }

        let manifest = ArtifactManifest {
            name: draft.name.clone(),
            version: versions.last().map_or(1, |v| v + 1),
            artifact_type: draft.artifact_type.clone(),
            description: draft.description.clone(),
            created_at: Utc::now(),
            metadata: draft.metadata.clone(),
            files: entries,
            aliases: Vec::new(),
        };

        let path = self.manifest_path(&manifest.name, manifest.version);
        let json = serde_json::to_string_pretty(&manifest).map_err(|e| {
            PipelineError::ArtifactError(format!("failed to serialize manifest: {}", e))
        })?;
        atomic_write(&path, json.as_bytes()).map_err(|e| io_error("write", &path, e))?;

        let mut aliases = self.read_aliases(&manifest.name)?;
        aliases.insert(LATEST_ALIAS.to_string(), manifest.version);
        self.write_aliases(&manifest.name, &aliases)?;

        info!(artifact = %manifest.reference(), "published artifact");
        self.with_aliases(manifest)
    }

    fn list(&self) -> Result<Vec<ArtifactManifest>> {
        let dir = self.root.join("artifacts");
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&dir).map_err(|e| io_error("read", &dir, e))?;
        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .collect();
        names.sort();

        let mut manifests = Vec::new();
        for name in names {
            for version in self.versions(&name)? {
                manifests.push(self.with_aliases(self.read_manifest(&name, version)?)?);
            }
        }
        Ok(manifests)
    }

    fn set_alias(&self, reference: &ArtifactRef, alias: &str) -> Result<ArtifactManifest> {
        validate_alias(alias)?;
        let manifest = self.resolve(reference)?;

        let mut aliases = self.read_aliases(&manifest.name)?;
        aliases.insert(alias.to_string(), manifest.version);
        self.write_aliases(&manifest.name, &aliases)?;

        info!(artifact = %manifest.reference(), alias, "moved alias");
        self.with_aliases(manifest)
    }

    fn runs_dir(&self) -> PathBuf {
        self.root.join("runs")
    }
}

/// Stream a file through SHA-256, returning (`sha256:<hex>`, size).
fn digest_file(path: &Path) -> Result<(String, u64)> {
    let mut file = File::open(path).map_err(|e| io_error("open", path, e))?;
    let mut hasher = Sha256::new();
    let size = io::copy(&mut file, &mut hasher).map_err(|e| io_error("hash", path, e))?;
    Ok((format!("sha256:{}", hex::encode(hasher.finalize())), size))
}

fn io_error(action: &str, path: &Path, e: io::Error) -> PipelineError {
    PipelineError::ArtifactError(format!("failed to {} '{}': {}", action, path.display(), e))
}
