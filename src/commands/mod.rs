//! Command implementations for listings.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, plus the environment every command shares: the resolved
//! config and the artifact store root.

mod artifact;
mod clean;
mod validate_cmd;

use crate::artifact::FsArtifactStore;
use crate::cli::{ArtifactAction, Cli, Command};
use crate::config::Config;
use crate::error::Result;
use std::path::PathBuf;
use tracing::debug;

/// Resolved settings shared by all commands.
#[derive(Debug, Clone)]
pub struct CommandEnv {
    pub config: Config,
    pub store_root: PathBuf,
}

impl CommandEnv {
    /// Resolve config and store root from the global flags.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config = Config::resolve(cli.config.as_deref())?;
        let store_root = cli
            .store
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.store_root));
        debug!(store = %store_root.display(), project = %config.project, "resolved environment");
        Ok(Self { config, store_root })
    }

    pub fn store(&self) -> FsArtifactStore {
        FsArtifactStore::new(&self.store_root)
    }
}

/// Dispatch a command to its implementation.
///
/// This is the main entry point for command execution. Each command
/// is routed to its handler function.
pub fn dispatch(cli: Cli) -> Result<()> {
    let env = CommandEnv::from_cli(&cli)?;

    match cli.command {
        Command::Clean(args) => clean::cmd_clean(&env, args),
        Command::Validate(args) => validate_cmd::cmd_validate(&env, args),
        Command::Artifact(cmd) => match cmd.action {
            ArtifactAction::Put(args) => artifact::cmd_put(&env, args),
            ArtifactAction::List(args) => artifact::cmd_list(&env, args),
            ArtifactAction::Show(args) => artifact::cmd_show(&env, args),
            ArtifactAction::Check(args) => artifact::cmd_check(&env, args),
            ArtifactAction::Alias(args) => artifact::cmd_alias(&env, args),
        },
    }
}
