//! One step of the fixed-point loop: parse, walk, apply.

use super::{walker, UpgradeError};
use crate::checker::{ProgramChecker, ProgramSnapshot};
use crate::cst::CstParser;
use crate::features::{FeatureRule, FeatureSet};
use crate::fix::{ByteRangeRewriter, EditTracker};
use crate::utils::LineIndex;
use serde::Serialize;
use std::path::Path;

/// An edit that made it into the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedEdit {
    /// Rule that produced it.
    pub rule: FeatureRule,
    /// Pass it was applied in (1-based).
    pub pass: usize,
    /// Line of the edit in the text of that pass (1-based).
    pub line: usize,
    /// Text that was replaced.
    pub before: String,
    /// Text that replaced it.
    pub after: String,
}

/// State threaded from one pass to the next.
#[derive(Debug, Clone, Default)]
pub struct PassState {
    /// Current text of the file.
    pub text: String,
    /// Number of passes run so far.
    pub pass: usize,
    /// Whether the last walk deferred a proposal.
    pub needs_another_pass: bool,
    /// Every edit applied so far, in pass order.
    pub applied: Vec<AppliedEdit>,
}

impl PassState {
    /// Initial state; at least one pass is always run.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            pass: 0,
            needs_another_pass: true,
            applied: Vec::new(),
        }
    }

    /// Whether the loop has reached its fixed point.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        !self.needs_another_pass
    }
}

/// Run one pass over `state.text`.
///
/// With a snapshot, enums imported from other project files are resolved
/// through it; otherwise the file is checked on its own.
///
/// # Errors
/// Fails when the text does not parse, a checker query fails, or the
/// accepted edits cannot be applied.
pub fn run_pass(
    state: PassState,
    parser: &mut CstParser,
    file: &Path,
    features: &FeatureSet,
    snapshot: Option<&ProgramSnapshot>,
) -> Result<PassState, UpgradeError> {
    let tree = parser.parse(&state.text)?;
    let checker = match snapshot {
        Some(snapshot) => ProgramChecker::with_snapshot(&tree, file, snapshot),
        None => ProgramChecker::new(&tree),
    };

    let mut tracker = EditTracker::new();
    walker::walk(&tree, file, features, &checker, &mut tracker)?;
    let summary = tracker.finish();

    let pass = state.pass + 1;
    tracing::debug!(
        file = %file.display(),
        pass,
        accepted = summary.records.len(),
        deferred = summary.deferred,
        "pass finished"
    );

    let lines = LineIndex::new(&state.text);
    let mut applied = state.applied;
    let needs_another_pass = summary.needs_another_pass();
    let mut rewriter = ByteRangeRewriter::new(state.text);
    for record in summary.records {
        applied.push(AppliedEdit {
            rule: record.proposal.rule,
            pass,
            line: lines.line_index(record.span.start),
            before: tree.slice(record.span).to_owned(),
            after: record.proposal.replacement.clone(),
        });
        rewriter.add_edit(record.proposal.into());
    }

    Ok(PassState {
        text: rewriter.apply()?,
        pass,
        needs_another_pass,
        applied,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::Options;
    use crate::version::TypeScriptVersion;

    fn step(state: PassState) -> PassState {
        let features = FeatureSet::resolve(TypeScriptVersion::V3_8, &Options::default());
        let mut parser = CstParser::new().unwrap();
        run_pass(state, &mut parser, Path::new("a.ts"), &features, None).unwrap()
    }

    #[test]
    fn test_single_pass_converges() {
        let state = step(PassState::new("const x = a != null ? a : 1;\n"));
        assert_eq!(state.text, "const x = a ?? 1;\n");
        assert_eq!(state.pass, 1);
        assert!(state.is_converged());
        assert_eq!(state.applied.len(), 1);
        assert_eq!(state.applied[0].line, 1);
        assert_eq!(state.applied[0].before, "a != null ? a : 1");
    }

    #[test]
    fn test_deferred_edit_needs_second_pass() {
        let first = step(PassState::new("x = a != null ? a : b != null ? b : 1;"));
        assert_eq!(first.text, "x = a ?? (b != null ? b : 1);");
        assert!(!first.is_converged());

        let second = step(first);
        assert_eq!(second.text, "x = a ?? (b ?? 1);");
        assert!(second.is_converged());
        assert_eq!(second.pass, 2);
        assert_eq!(second.applied.len(), 2);
        assert_eq!(second.applied[1].pass, 2);
    }

    #[test]
    fn test_parse_error_surfaces() {
        let features = FeatureSet::resolve(TypeScriptVersion::V3_8, &Options::default());
        let mut parser = CstParser::new().unwrap();
        let result = run_pass(
            PassState::new("const = ;"),
            &mut parser,
            Path::new("a.ts"),
            &features,
            None,
        );
        assert!(matches!(result, Err(UpgradeError::Parse(_))));
    }
}
