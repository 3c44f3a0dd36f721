//! Idiom detectors.
//!
//! Each detector is a pure function from a node to zero or more
//! [`RewriteProposal`]s. Detectors never fail on a non-match; only checker
//! queries can return an error.

use crate::cst::Span;
use crate::features::FeatureRule;
use serde::Serialize;

/// Rewrites a guarded access chain into an optional chain.
pub mod optional_chain;
/// Rewrites a nullish-guard ternary into `??`.
pub mod nullish;
/// Rewrites a literal type assertion into `as const`.
pub mod const_assertion;
/// Fuses a namespace import and a named export into `export * as ns`.
pub mod export_namespace;

/// A candidate edit produced by a detector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewriteProposal {
    /// Exact byte range being replaced (empty for insertions).
    pub span: Span,
    /// Replacement text.
    pub replacement: String,
    /// Detector that produced the proposal.
    pub rule: FeatureRule,
}

impl RewriteProposal {
    /// Replace `span` with `replacement`.
    #[must_use]
    pub fn replace(span: Span, replacement: impl Into<String>, rule: FeatureRule) -> Self {
        Self {
            span,
            replacement: replacement.into(),
            rule,
        }
    }

    /// Insert `text` before byte `offset`.
    #[must_use]
    pub fn insert(offset: usize, text: impl Into<String>, rule: FeatureRule) -> Self {
        Self::replace(Span::empty(offset), text, rule)
    }

    /// Delete `span`.
    #[must_use]
    pub fn delete(span: Span, rule: FeatureRule) -> Self {
        Self::replace(span, String::new(), rule)
    }
}
