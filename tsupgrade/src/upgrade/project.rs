//! Project mode: every file advances one pass at a time against a shared
//! snapshot of the whole project.

use super::{run_pass, AppliedEdit, PassState, UpgradeError, Upgrader};
use crate::checker::ProgramSnapshot;
use crate::cst::CstParser;
use crate::features::FeatureRule;
use crate::utils::collect_typescript_files;
use anyhow::{bail, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome for one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// File as discovered on disk.
    pub path: PathBuf,
    /// Passes run on this file.
    pub passes: usize,
    /// Whether the upgraded text differs from the original.
    pub changed: bool,
    /// Applied edits per rule.
    pub rules: BTreeMap<FeatureRule, usize>,
    /// Every applied edit, in pass order.
    pub edits: Vec<AppliedEdit>,
    /// Set when the file could not be upgraded; its text is then left as is.
    pub error: Option<String>,
    /// Text read from disk.
    #[serde(skip)]
    pub original: String,
    /// Text after the last pass; equal to `original` on error.
    #[serde(skip)]
    pub upgraded: String,
}

impl FileReport {
    fn new(path: PathBuf, original: String, state: PassState, error: Option<&UpgradeError>) -> Self {
        let (upgraded, edits) = match error {
            Some(_) => (original.clone(), Vec::new()),
            None => (state.text, state.applied),
        };
        let mut rules = BTreeMap::new();
        for edit in &edits {
            *rules.entry(edit.rule).or_insert(0) += 1;
        }
        Self {
            changed: upgraded != original,
            passes: state.pass,
            rules,
            edits,
            error: error.map(ToString::to_string),
            path,
            original,
            upgraded,
        }
    }

    /// Whether the file failed.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Write the upgraded text back if it changed.
    ///
    /// # Errors
    /// Returns the I/O error of the write.
    pub fn write(&self) -> std::io::Result<bool> {
        if !self.changed || self.is_error() {
            return Ok(false);
        }
        fs::write(&self.path, &self.upgraded)?;
        Ok(true)
    }
}

/// Outcome for a whole project.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectReport {
    /// Lockstep rounds run.
    pub passes: usize,
    /// One report per discovered file, sorted by path.
    pub files: Vec<FileReport>,
}

impl ProjectReport {
    /// Files whose text changed.
    pub fn changed(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| f.changed)
    }

    /// Files that failed.
    pub fn failed(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| f.is_error())
    }

    /// Applied edits per rule across every file.
    #[must_use]
    pub fn rule_totals(&self) -> BTreeMap<FeatureRule, usize> {
        let mut totals = BTreeMap::new();
        for (rule, count) in self.files.iter().flat_map(|f| &f.rules) {
            *totals.entry(*rule).or_insert(0) += count;
        }
        totals
    }

    /// Applied edits across every file.
    #[must_use]
    pub fn total_edits(&self) -> usize {
        self.files.iter().map(|f| f.edits.len()).sum()
    }
}

/// A file in flight.
struct Tracked {
    path: PathBuf,
    original: String,
    state: PassState,
    error: Option<UpgradeError>,
}

impl Tracked {
    fn is_pending(&self) -> bool {
        self.error.is_none() && !self.state.is_converged()
    }
}

impl Upgrader {
    /// Collect the TypeScript files under `paths`, sorted and deduplicated.
    ///
    /// # Errors
    /// Fails when a path does not exist.
    pub fn collect_files(&self, paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for path in paths {
            if !path.exists() {
                bail!("path does not exist: {}", path.display());
            }
            let (found, _) = collect_typescript_files(path, &self.discovery);
            files.extend(found);
        }
        files.sort();
        files.dedup();
        Ok(files)
    }

    /// Discover, read and upgrade every file under `paths`.
    ///
    /// Nothing is written; see [`FileReport::write`].
    ///
    /// # Errors
    /// Fails when a path does not exist. Per-file failures are reported in
    /// the returned [`ProjectReport`] instead.
    pub fn upgrade_project(&self, paths: &[PathBuf]) -> Result<ProjectReport> {
        let files = self.collect_files(paths)?;
        Ok(self.upgrade_files(&files))
    }

    /// Read and upgrade an explicit list of files.
    #[must_use]
    pub fn upgrade_files(&self, files: &[PathBuf]) -> ProjectReport {
        let sources = files
            .iter()
            .map(|path| {
                let text = fs::read_to_string(path).map_err(|source| UpgradeError::Io {
                    path: path.clone(),
                    source,
                });
                (path.clone(), text)
            })
            .collect();
        self.upgrade_sources(sources)
    }

    /// Upgrade in-memory files in lockstep.
    ///
    /// Every round builds one [`ProgramSnapshot`] from the current texts of
    /// all files, then runs one pass on each unconverged file in parallel.
    #[must_use]
    pub fn upgrade_sources(
        &self,
        sources: Vec<(PathBuf, Result<String, UpgradeError>)>,
    ) -> ProjectReport {
        let mut files: Vec<Tracked> = sources
            .into_iter()
            .map(|(path, text)| match text {
                Ok(text) => Tracked {
                    path,
                    original: text.clone(),
                    state: PassState::new(text),
                    error: None,
                },
                Err(error) => Tracked {
                    path,
                    original: String::new(),
                    state: PassState::default(),
                    error: Some(error),
                },
            })
            .collect();

        let mut rounds = 0;
        while files.iter().any(Tracked::is_pending) {
            rounds += 1;
            let texts: Vec<(&Path, &str)> = files
                .iter()
                .map(|f| (f.path.as_path(), f.state.text.as_str()))
                .collect();
            tracing::debug!(round = rounds, files = texts.len(), "building snapshot");
            let snapshot = ProgramSnapshot::build(&texts);

            files
                .par_iter_mut()
                .filter(|f| f.is_pending())
                .for_each(|file| self.step(file, &snapshot));
        }

        let files = files
            .into_iter()
            .map(|f| FileReport::new(f.path, f.original, f.state, f.error.as_ref()))
            .collect();
        ProjectReport {
            passes: rounds,
            files,
        }
    }

    fn step(&self, file: &mut Tracked, snapshot: &ProgramSnapshot) {
        let outcome = self.check_pass_limit(&file.state).and_then(|()| {
            let mut parser = CstParser::for_path(&file.path)?;
            let state = std::mem::take(&mut file.state);
            run_pass(state, &mut parser, &file.path, self.features(), Some(snapshot))
        });
        match outcome {
            Ok(state) => {
                file.state = state;
                if file.state.is_converged() {
                    tracing::info!(
                        file = %file.path.display(),
                        passes = file.state.pass,
                        edits = file.state.applied.len(),
                        "file converged"
                    );
                    self.tick();
                }
            }
            Err(error) => {
                tracing::warn!(file = %file.path.display(), %error, "upgrade failed");
                file.error = Some(error);
                self.tick();
            }
        }
    }

    fn tick(&self) {
        if let Some(bar) = &self.progress_bar {
            bar.inc(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::Options;
    use crate::version::TypeScriptVersion;

    fn sources(files: &[(&str, &str)]) -> Vec<(PathBuf, Result<String, UpgradeError>)> {
        files
            .iter()
            .map(|(p, t)| (PathBuf::from(p), Ok((*t).to_owned())))
            .collect()
    }

    #[test]
    fn test_imported_enum_resolved_across_files() {
        let upgrader = Upgrader::new(TypeScriptVersion::V3_4, Options::default());
        let report = upgrader.upgrade_sources(sources(&[
            ("src/colors.ts", "export enum Color { Red = \"red\" }\n"),
            ("src/use.ts", "import { Color } from \"./colors\";\nconst c = Color.Red as Color.Red;\n"),
        ]));
        let used = &report.files[1];
        assert_eq!(
            used.upgraded,
            "import { Color } from \"./colors\";\nconst c = Color.Red as const;\n"
        );
        assert_eq!(used.rules.get(&FeatureRule::ConstAssertion), Some(&1));
        assert!(!report.files[0].changed);
    }

    #[test]
    fn test_failures_isolated_per_file() {
        let upgrader = Upgrader::new(TypeScriptVersion::V3_7, Options::default());
        let report = upgrader.upgrade_sources(sources(&[
            ("a.ts", "const x = a != null ? a : 1;\n"),
            ("b.ts", "const = ;\n"),
        ]));
        assert!(report.files[0].changed);
        assert!(report.files[1].is_error());
        assert_eq!(report.failed().count(), 1);
        assert_eq!(report.files[1].upgraded, "const = ;\n");
    }

    #[test]
    fn test_rounds_follow_slowest_file() {
        let upgrader = Upgrader::new(TypeScriptVersion::V3_7, Options::default());
        let report = upgrader.upgrade_sources(sources(&[
            ("a.ts", "x = a != null ? a : b != null ? b : 1;\n"),
            ("b.ts", "y = b;\n"),
        ]));
        assert_eq!(report.passes, 2);
        assert_eq!(report.files[0].passes, 2);
        assert_eq!(report.files[1].passes, 1);
        assert_eq!(report.total_edits(), 2);
        assert_eq!(report.rule_totals().get(&FeatureRule::NullishCoalesce), Some(&2));
    }
}
