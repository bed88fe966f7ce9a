//! Run event log.
//!
//! Every stage run appends events to `runs/<run_id>/events.ndjson` in the
//! artifact store: one JSON object per line, never rewritten. The log is the
//! run's history: configuration, artifacts consumed and produced, check
//! outcomes, and how the run ended.
//!
//! # Event Format
//!
//! - `ts`: RFC3339 timestamp
//! - `action`: what happened (`run_started`, `artifact_used`, ...)
//! - `actor`: `user@HOST`
//! - `run`: run identifier
//! - `details`: action-specific object

use crate::error::{PipelineError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Actions that can be logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// Run initialized
    RunStarted,
    /// Typed run configuration recorded
    ConfigUpdated,
    /// Input artifact resolved and downloaded
    ArtifactUsed,
    /// Output artifact published
    ArtifactLogged,
    /// One validation check finished
    CheckCompleted,
    /// Run closed
    RunFinished,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::RunStarted => write!(f, "run_started"),
            EventAction::ConfigUpdated => write!(f, "config_updated"),
            EventAction::ArtifactUsed => write!(f, "artifact_used"),
            EventAction::ArtifactLogged => write!(f, "artifact_logged"),
            EventAction::CheckCompleted => write!(f, "check_completed"),
            EventAction::RunFinished => write!(f, "run_finished"),
        }
    }
}

/// An event record for the run log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// RFC3339 timestamp when the event occurred.
    pub ts: DateTime<Utc>,

    /// The action that was performed.
    pub action: EventAction,

    /// The actor who performed the action (e.g., `user@HOST`).
    pub actor: String,

    /// Run the event belongs to.
    pub run: String,

    /// Freeform details object with action-specific information.
    pub details: Value,
}

impl Event {
    /// Create a new event for `run`, stamped now with the current actor.
    pub fn new(action: EventAction, run: impl Into<String>) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: get_actor_string(),
            run: run.into(),
            details: Value::Object(serde_json::Map::new()),
        }
    }

    /// Set the details object for this event.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| {
            PipelineError::ArtifactError(format!("failed to serialize event to JSON: {}", e))
        })
    }
}

/// Get the actor string for event metadata.
fn get_actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Path to the events file of a run directory.
pub fn events_file_path(run_dir: &Path) -> PathBuf {
    run_dir.join("events.ndjson")
}

/// Append an event as one JSON line, creating the run directory if needed.
pub fn append_event(run_dir: &Path, event: &Event) -> Result<()> {
    let events_file = events_file_path(run_dir);
    let json_line = event.to_ndjson_line()?;

    if !run_dir.exists() {
        fs::create_dir_all(run_dir).map_err(|e| {
            PipelineError::ArtifactError(format!(
                "failed to create run directory '{}': {}",
                run_dir.display(),
                e
            ))
        })?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&events_file)
        .map_err(|e| {
            PipelineError::ArtifactError(format!(
                "failed to open events file '{}': {}",
                events_file.display(),
                e
            ))
        })?;

    writeln!(file, "{}", json_line).map_err(|e| {
        PipelineError::ArtifactError(format!(
            "failed to write event to '{}': {}",
            events_file.display(),
            e
        ))
    })?;

    file.sync_all().map_err(|e| {
        PipelineError::ArtifactError(format!(
            "failed to sync events file '{}': {}",
            events_file.display(),
            e
        ))
    })?;

    Ok(())
}

/// Read back all events of a run, in append order.
pub fn read_events(run_dir: &Path) -> Result<Vec<Event>> {
    let events_file = events_file_path(run_dir);
    let content = fs::read_to_string(&events_file).map_err(|e| {
        PipelineError::ArtifactError(format!(
            "failed to read events file '{}': {}",
            events_file.display(),
            e
        ))
    })?;

    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(i, line)| {
            serde_json::from_str(line).map_err(|e| {
                PipelineError::ArtifactError(format!(
                    "malformed event on line {} of '{}': {}",
                    i + 1,
                    events_file.display(),
                    e
                ))
            })
        })
        .collect()
}
