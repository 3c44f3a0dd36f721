//! Per-pass bookkeeping of accepted and deferred proposals.

use crate::cst::Span;
use crate::rules::RewriteProposal;
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};

/// Outcome of registering a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Scheduled for this pass.
    Accepted,
    /// Overlaps an accepted edit; retried on the next pass.
    Deferred,
}

/// An accepted proposal, bound to the file it edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRecord {
    /// File the edit applies to.
    pub file: PathBuf,
    /// Byte range replaced in that file.
    pub span: Span,
    /// Proposal that was accepted.
    pub proposal: RewriteProposal,
}

/// What a pass ended with.
#[derive(Debug, Clone, Default)]
pub struct TrackerSummary {
    /// Accepted edits, ordered by file and then by span.
    pub records: Vec<EditRecord>,
    /// Number of proposals (or proposal groups) pushed to the next pass.
    pub deferred: usize,
}

impl TrackerSummary {
    /// Another pass is needed when anything was deferred.
    #[must_use]
    pub fn needs_another_pass(&self) -> bool {
        self.deferred > 0
    }
}

/// Accumulates proposals during one walk and rejects overlapping ones.
///
/// Proposals are accepted first-come: the walk is pre-order, so an outer
/// rewrite always wins over the inner rewrites it contains.
#[derive(Debug, Default)]
pub struct EditTracker {
    accepted: FxHashMap<PathBuf, Vec<EditRecord>>,
    deferred: usize,
}

impl EditTracker {
    /// Empty tracker for one pass.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a single proposal for `file`.
    pub fn propose(&mut self, file: &Path, proposal: RewriteProposal) -> Decision {
        self.propose_group(file, vec![proposal])
    }

    /// Register proposals that must be applied together.
    ///
    /// If any member overlaps an accepted edit the whole group is deferred.
    pub fn propose_group(&mut self, file: &Path, group: Vec<RewriteProposal>) -> Decision {
        if group.is_empty() {
            return Decision::Accepted;
        }
        let records = self.accepted.entry(file.to_path_buf()).or_default();
        let conflict = group.iter().find_map(|proposal| {
            records
                .iter()
                .find(|record| record.span.overlaps(proposal.span))
                .map(|record| (proposal.span, record.span))
        });
        if let Some((span, existing)) = conflict {
            tracing::trace!(file = %file.display(), %span, %existing, "proposal deferred");
            self.deferred += 1;
            return Decision::Deferred;
        }
        for proposal in group {
            tracing::trace!(
                file = %file.display(),
                span = %proposal.span,
                rule = proposal.rule.id(),
                "proposal accepted"
            );
            records.push(EditRecord {
                file: file.to_path_buf(),
                span: proposal.span,
                proposal,
            });
        }
        Decision::Accepted
    }

    /// Close the pass.
    #[must_use]
    pub fn finish(self) -> TrackerSummary {
        let mut records: Vec<EditRecord> = self.accepted.into_values().flatten().collect();
        records.sort_by(|a, b| a.file.cmp(&b.file).then(a.span.cmp(&b.span)));
        TrackerSummary {
            records,
            deferred: self.deferred,
        }
    }
}
