//! The fixed-point driver.
//!
//! This module ties the pieces together:
//! - `walker`: pre-order traversal that runs the enabled detectors
//! - `pass`: one parse → walk → apply step over a [`PassState`]
//! - `project`: lockstep passes over every file of a project
//! - [`Upgrader`] and [`upgrade`]: the caller-facing entry points

mod pass;
mod project;
mod walker;

pub use pass::{run_pass, AppliedEdit, PassState};
pub use project::{FileReport, ProjectReport};

use crate::checker::{CheckError, ProgramSnapshot};
use crate::cst::{CstParser, ParseError};
use crate::features::{FeatureSet, Options};
use crate::fix::RewriteError;
use crate::utils::DiscoveryOptions;
use crate::version::TypeScriptVersion;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a file could not be upgraded.
#[derive(Debug, Error)]
pub enum UpgradeError {
    /// The text (original or after a pass) does not parse.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// A type checker query failed.
    #[error(transparent)]
    Check(#[from] CheckError),
    /// Accepted edits could not be applied.
    #[error(transparent)]
    Rewrite(#[from] RewriteError),
    /// Proposals kept being deferred.
    #[error("no fixed point reached after {passes} passes")]
    PassLimitExceeded {
        /// Passes that were run
        passes: usize,
    },
    /// Reading a source file failed.
    #[error("failed to read {}", path.display())]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Upgrade a single source text to `target`.
///
/// # Errors
/// See [`UpgradeError`].
pub fn upgrade(
    source: &str,
    target: TypeScriptVersion,
    options: &Options,
) -> Result<String, UpgradeError> {
    Upgrader::new(target, options.clone()).upgrade_source(source)
}

/// Configured upgrade run.
#[derive(Clone)]
pub struct Upgrader {
    /// Version the output may rely on.
    pub target: TypeScriptVersion,
    /// Rule overrides and the pass limit.
    pub options: Options,
    /// Which files project mode collects.
    pub discovery: DiscoveryOptions,
    /// Progress bar ticked once per finished file (thread-safe).
    pub progress_bar: Option<std::sync::Arc<indicatif::ProgressBar>>,
    features: FeatureSet,
}

impl Upgrader {
    /// Creates an upgrader; the feature set is resolved here, once.
    #[must_use]
    pub fn new(target: TypeScriptVersion, options: Options) -> Self {
        Self {
            features: FeatureSet::resolve(target, &options),
            target,
            options,
            discovery: DiscoveryOptions::default(),
            progress_bar: None,
        }
    }

    /// Builder-style method to set file discovery options.
    #[must_use]
    pub fn with_discovery(mut self, discovery: DiscoveryOptions) -> Self {
        self.discovery = discovery;
        self
    }

    /// Builder-style method to attach a progress bar.
    #[must_use]
    pub fn with_progress_bar(mut self, bar: std::sync::Arc<indicatif::ProgressBar>) -> Self {
        self.progress_bar = Some(bar);
        self
    }

    /// The resolved feature set.
    #[must_use]
    pub fn features(&self) -> &FeatureSet {
        &self.features
    }

    /// Upgrade a standalone source text.
    ///
    /// # Errors
    /// See [`UpgradeError`].
    pub fn upgrade_source(&self, source: &str) -> Result<String, UpgradeError> {
        self.drive(source, Path::new("<stdin>"), None)
            .map(|state| state.text)
    }

    /// Run passes until the text converges or the pass limit is hit.
    pub(crate) fn drive(
        &self,
        source: &str,
        file: &Path,
        snapshot: Option<&ProgramSnapshot>,
    ) -> Result<PassState, UpgradeError> {
        let mut parser = CstParser::for_path(file)?;
        let mut state = PassState::new(source);
        while !state.is_converged() {
            self.check_pass_limit(&state)?;
            state = run_pass(state, &mut parser, file, &self.features, snapshot)?;
        }
        Ok(state)
    }

    fn check_pass_limit(&self, state: &PassState) -> Result<(), UpgradeError> {
        if state.pass >= self.options.max_passes {
            return Err(UpgradeError::PassLimitExceeded { passes: state.pass });
        }
        Ok(())
    }
}
