//! Run context for pipeline stages.
//!
//! A `RunContext` is the explicit handle a stage receives instead of a
//! process-wide tracking session. It is created with [`RunContext::init`] at
//! stage start, records everything the stage consumes and produces in the
//! run's event log, and is closed with [`RunContext::finish`].
//!
//! Run records live under the store's runs directory:
//!
//! ```text
//! runs/<run_id>/events.ndjson          append-only run history
//! runs/<run_id>/config.json            typed stage configuration
//! runs/<run_id>/artifacts/<name>-vN/   downloaded inputs
//! ```

use crate::artifact::{ArtifactDraft, ArtifactManifest, ArtifactRef, ArtifactStore};
use crate::error::{PipelineError, Result};
use crate::events::{Event, EventAction, append_event};
use crate::fs::atomic_write_file;
use crate::validate::CheckResult;
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::info;

static RUN_SEQUENCE: AtomicU32 = AtomicU32::new(0);

/// Identity of a run: which project it belongs to and what kind of job it is.
#[derive(Debug, Clone, Serialize)]
pub struct RunSettings {
    pub project: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    pub group: String,
    pub job_type: String,
}

impl RunSettings {
    pub fn new(project: impl Into<String>, group: impl Into<String>, job_type: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            entity: None,
            group: group.into(),
            job_type: job_type.into(),
        }
    }

    pub fn with_entity(mut self, entity: Option<String>) -> Self {
        self.entity = entity;
        self
    }
}

/// Handle to one stage run.
pub struct RunContext {
    id: String,
    run_dir: PathBuf,
    settings: RunSettings,
    store: Box<dyn ArtifactStore>,
    used: Vec<String>,
    logged: Vec<String>,
}

impl RunContext {
    /// Start a run: allocate an id and directory, and record `run_started`.
    pub fn init(store: Box<dyn ArtifactStore>, settings: RunSettings) -> Result<Self> {
        let id = format!(
            "{}-{}-{}",
            Utc::now().format("%Y%m%dT%H%M%S%3f"),
            std::process::id(),
            RUN_SEQUENCE.fetch_add(1, Ordering::Relaxed)
        );
        let run_dir = store.runs_dir().join(&id);

        let ctx = Self {
            id,
            run_dir,
            settings,
            store,
            used: Vec::new(),
            logged: Vec::new(),
        };

        ctx.record(
            EventAction::RunStarted,
            serde_json::to_value(&ctx.settings).unwrap_or_default(),
        )?;
        info!(
            run = %ctx.id,
            project = %ctx.settings.project,
            job_type = %ctx.settings.job_type,
            "run started"
        );
        Ok(ctx)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    pub fn store(&self) -> &dyn ArtifactStore {
        self.store.as_ref()
    }

    /// Record the typed stage configuration (`config.json` plus an event).
    pub fn update_config<T: Serialize>(&mut self, config: &T) -> Result<()> {
        let value = serde_json::to_value(config).map_err(|e| {
            PipelineError::UserError(format!("failed to serialize run configuration: {}", e))
        })?;

        let path = self.run_dir.join("config.json");
        let pretty = serde_json::to_string_pretty(&value).unwrap_or_default();
        atomic_write_file(&path, &pretty).map_err(|e| {
            PipelineError::ArtifactError(format!(
                "failed to write run configuration '{}': {}",
                path.display(),
                e
            ))
        })?;

        self.record(EventAction::ConfigUpdated, value)
    }

    /// Resolve and download a single-file artifact, returning the local file path.
    pub fn use_artifact(&mut self, reference: &str) -> Result<PathBuf> {
        let reference = ArtifactRef::parse(reference)?;
        let manifest = self.store.resolve(&reference)?;
        let entry = manifest.single_file()?.clone();

        let dest = self
            .run_dir
            .join("artifacts")
            .join(format!("{}-v{}", manifest.name, manifest.version));
        let dir = self.store.download(&manifest, &dest)?;

        let pinned = manifest.reference().to_string();
        self.record(
            EventAction::ArtifactUsed,
            json!({
                "requested": reference.to_string(),
                "resolved": pinned,
                "digest": entry.digest,
            }),
        )?;
        info!(requested = %reference, resolved = %pinned, "using artifact");
        self.used.push(pinned);

        Ok(dir.join(entry.path))
    }

    /// Publish an artifact produced by this run.
    pub fn log_artifact(&mut self, draft: &ArtifactDraft) -> Result<ArtifactManifest> {
        let mut draft = draft.clone();
        draft
            .metadata
            .entry("run")
            .or_insert_with(|| json!(self.id));
        let manifest = self.store.publish(&draft)?;

        let pinned = manifest.reference().to_string();
        self.record(
            EventAction::ArtifactLogged,
            json!({
                "artifact": pinned,
                "type": manifest.artifact_type,
                "files": manifest.files.iter().map(|f| &f.path).collect::<Vec<_>>(),
            }),
        )?;
        self.logged.push(pinned);

        Ok(manifest)
    }

    /// Record the outcome of one validation check.
    pub fn log_check(&mut self, result: &CheckResult) -> Result<()> {
        let value = serde_json::to_value(result).unwrap_or_default();
        self.record(EventAction::CheckCompleted, value)
    }

    /// Close the run.
    pub fn finish(self, success: bool) -> Result<()> {
        self.record(
            EventAction::RunFinished,
            json!({
                "success": success,
                "used": self.used,
                "logged": self.logged,
            }),
        )?;
        info!(run = %self.id, success, "run finished");
        Ok(())
    }

    fn record(&self, action: EventAction, details: serde_json::Value) -> Result<()> {
        let event = Event::new(action, &self.id).with_details(details);
        append_event(&self.run_dir, &event)
    }
}

impl std::fmt::Debug for RunContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunContext")
            .field("id", &self.id)
            .field("run_dir", &self.run_dir)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
