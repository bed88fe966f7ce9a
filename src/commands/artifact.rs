//! Implementation of the `listings artifact` subcommands.

use super::CommandEnv;
use crate::artifact::{ArtifactDraft, ArtifactManifest, ArtifactRef, ArtifactStore};
use crate::cli::{ArtifactAliasArgs, ArtifactListArgs, ArtifactPutArgs, ArtifactRefArgs};
use crate::error::{PipelineError, Result};
use globset::{Glob, GlobMatcher};
use std::path::{Path, PathBuf};

/// Publish a local file as an artifact.
pub fn cmd_put(env: &CommandEnv, args: ArtifactPutArgs) -> Result<()> {
    if !args.file.is_file() {
        return Err(PipelineError::UserError(format!(
            "'{}' is not a file",
            args.file.display()
        )));
    }

    let name = match args.name {
        Some(name) => name,
        None => args
            .file
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                PipelineError::UserError(format!(
                    "cannot derive an artifact name from '{}'; pass --name",
                    args.file.display()
                ))
            })?,
    };

    let store = env.store();
    let draft =
        ArtifactDraft::new(name, args.artifact_type, args.description).with_file(&args.file);
    let mut manifest = store.publish(&draft)?;

    for alias in &args.alias {
        manifest = store.set_alias(&manifest.reference(), alias)?;
    }

    println!("{}", format_manifest_line(&manifest));
    Ok(())
}

/// List artifact versions, optionally filtered by a name glob.
pub fn cmd_list(env: &CommandEnv, args: ArtifactListArgs) -> Result<()> {
    let matcher = args.filter.as_deref().map(compile_filter).transpose()?;
    let manifests = filter_manifests(env.store().list()?, matcher.as_ref());

    if manifests.is_empty() {
        println!("No artifacts.");
        return Ok(());
    }

    for manifest in &manifests {
        println!("{}", format_manifest_line(manifest));
    }
    Ok(())
}

/// Print the manifest of one artifact version as JSON.
pub fn cmd_show(env: &CommandEnv, args: ArtifactRefArgs) -> Result<()> {
    let reference = ArtifactRef::parse(&args.reference)?;
    let manifest = env.store().resolve(&reference)?;

    let json = serde_json::to_string_pretty(&manifest).map_err(|e| {
        PipelineError::ArtifactError(format!("failed to render manifest: {}", e))
    })?;
    println!("{}", json);
    Ok(())
}

/// Download an artifact and confirm it holds exactly one CSV file.
pub fn cmd_check(env: &CommandEnv, args: ArtifactRefArgs) -> Result<()> {
    let reference = ArtifactRef::parse(&args.reference)?;
    let store = env.store();
    let manifest = store.resolve(&reference)?;

    let dest = env
        .store_root
        .join("downloads")
        .join(format!("{}-v{}", manifest.name, manifest.version));
    let dir = store.download(&manifest, &dest)?;
    println!("Artifact downloaded to: {}", dir.display());

    let csv = single_csv(&dir, &manifest)?;
    println!("CSV file found: {}", csv.display());
    Ok(())
}

/// Point an alias at an artifact version.
pub fn cmd_alias(env: &CommandEnv, args: ArtifactAliasArgs) -> Result<()> {
    let reference = ArtifactRef::parse(&args.reference)?;
    let manifest = env.store().set_alias(&reference, &args.alias)?;

    println!("{}", format_manifest_line(&manifest));
    Ok(())
}

fn compile_filter(pattern: &str) -> Result<GlobMatcher> {
    Glob::new(pattern)
        .map(|glob| glob.compile_matcher())
        .map_err(|e| PipelineError::UserError(format!("invalid --filter glob '{}': {}", pattern, e)))
}

fn filter_manifests(
    manifests: Vec<ArtifactManifest>,
    matcher: Option<&GlobMatcher>,
) -> Vec<ArtifactManifest> {
    match matcher {
        None => manifests,
        Some(matcher) => manifests
            .into_iter()
            .filter(|m| matcher.is_match(&m.name))
            .collect(),
    }
}

fn single_csv(dir: &Path, manifest: &ArtifactManifest) -> Result<PathBuf> {
    let csv_files: Vec<&str> = manifest
        .files
        .iter()
        .map(|f| f.path.as_str())
        .filter(|p| p.ends_with(".csv"))
        .collect();

    match csv_files.as_slice() {
        [only] => Ok(dir.join(only)),
        other => Err(PipelineError::ArtifactError(format!(
            "expected exactly one CSV file in '{}', found {}: [{}]",
            manifest.reference(),
            other.len(),
            other.join(", ")
        ))),
    }
}

fn format_manifest_line(manifest: &ArtifactManifest) -> String {
    let aliases = if manifest.aliases.is_empty() {
        String::new()
    } else {
        format!(" [{}]", manifest.aliases.join(", "))
    };
    format!(
        "{:<32} {:<16} {}{}",
        manifest.reference().to_string(),
        manifest.artifact_type,
        manifest.created_at.format("%Y-%m-%d %H:%M:%S"),
        aliases
    )
}
