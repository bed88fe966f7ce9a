//! Artifact reference parsing (`<name>:<version-or-alias>`).

use crate::error::{PipelineError, Result};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Alias that always points at the most recently published version.
pub const LATEST_ALIAS: &str = "latest";

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("valid name regex"));

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v([0-9]+)$").expect("valid version regex"));

/// Which version of an artifact a reference points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSelector {
    /// An explicit 1-based version number (`v3`).
    Version(u32),
    /// A named alias (`latest`, `reference`, ...).
    Alias(String),
}

/// A parsed artifact reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRef {
    pub name: String,
    pub selector: VersionSelector,
}

impl ArtifactRef {
    /// Parse `name:vN`, `name:alias` or a bare `name` (meaning `name:latest`).
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        let (name, tag) = match input.rsplit_once(':') {
            Some((name, tag)) => (name, Some(tag)),
            None => (input, None),
        };

        validate_artifact_name(name)?;

        let selector = match tag {
            None => VersionSelector::Alias(LATEST_ALIAS.to_string()),
            Some(tag) => parse_selector(tag).map_err(|detail| {
                PipelineError::UserError(format!(
                    "invalid artifact reference '{}': {}",
                    input, detail
                ))
            })?,
        };

        Ok(Self {
            name: name.to_string(),
            selector,
        })
    }

    /// Reference to an explicit version.
    pub fn version(name: impl Into<String>, version: u32) -> Self {
        Self {
            name: name.into(),
            selector: VersionSelector::Version(version),
        }
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.selector {
            VersionSelector::Version(v) => write!(f, "{}:v{}", self.name, v),
            VersionSelector::Alias(alias) => write!(f, "{}:{}", self.name, alias),
        }
    }
}

fn parse_selector(tag: &str) -> std::result::Result<VersionSelector, String> {
    if let Some(caps) = VERSION_RE.captures(tag) {
        let version: u32 = caps[1]
            .parse()
            .map_err(|_| format!("version '{}' is out of range", tag))?;
        if version == 0 {
            return Err("versions start at v1".to_string());
        }
        return Ok(VersionSelector::Version(version));
    }

    if NAME_RE.is_match(tag) {
        Ok(VersionSelector::Alias(tag.to_string()))
    } else {
        Err(format!(
            "'{}' is neither a version (vN) nor a valid alias",
            tag
        ))
    }
}

/// Check that an artifact name uses only `[A-Za-z0-9._-]` and starts alphanumeric.
pub fn validate_artifact_name(name: &str) -> Result<()> {
    if NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(PipelineError::UserError(format!(
            "invalid artifact name '{}'.\n\n\
             Names may contain letters, digits, '.', '_' and '-', and must start \
             with a letter or digit (e.g. clean_sample.csv).",
            name
        )))
    }
}

/// Check that an alias is usable: valid name syntax and not shaped like a version.
pub fn validate_alias(alias: &str) -> Result<()> {
    if VERSION_RE.is_match(alias) || !NAME_RE.is_match(alias) {
        return Err(PipelineError::UserError(format!(
            "invalid alias '{}': aliases use [A-Za-z0-9._-] and must not look like a version (vN)",
            alias
        )));
    }
    Ok(())
}
