//! Byte-range safe code rewriter.
//!
//! Applies a batch of non-overlapping edits to a source string, leaving every
//! byte outside the edited ranges untouched.
//!
//! # Usage
//!
//! ```
//! use tsupgrade::cst::Span;
//! use tsupgrade::fix::{ByteRangeRewriter, Edit};
//!
//! let source = "a != null ? a : b";
//! let mut rewriter = ByteRangeRewriter::new(source);
//! rewriter.add_edit(Edit::new(Span::new(0, source.len()), "a ?? b"));
//! let fixed = rewriter.apply().expect("should apply");
//! assert_eq!(fixed, "a ?? b");
//! ```

use crate::cst::Span;
use crate::rules::RewriteProposal;
use thiserror::Error;

/// A single edit operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// Replaced byte range; empty for an insertion
    pub span: Span,
    /// Replacement content
    pub replacement: String,
    /// Rule that produced the edit, for logging
    pub description: Option<String>,
}

impl Edit {
    /// Create a new edit
    #[must_use]
    pub fn new(span: Span, replacement: impl Into<String>) -> Self {
        Self {
            span,
            replacement: replacement.into(),
            description: None,
        }
    }

    /// Create an edit with description
    #[must_use]
    pub fn with_description(
        span: Span,
        replacement: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            span,
            replacement: replacement.into(),
            description: Some(description.into()),
        }
    }

    /// Check if this edit overlaps with another
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.span.overlaps(other.span)
    }
}

impl From<RewriteProposal> for Edit {
    fn from(proposal: RewriteProposal) -> Self {
        Self::with_description(proposal.span, proposal.replacement, proposal.rule.id())
    }
}

/// Error during rewriting
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteError {
    /// Two edits replace overlapping ranges
    #[error("Overlapping edits at {first} and {second}")]
    OverlappingEdits {
        /// Range of the first overlapping edit
        first: Span,
        /// Range of the second overlapping edit
        second: Span,
    },
    /// Edit range is out of bounds
    #[error("Edit {span} out of bounds: source length {source_len}")]
    OutOfBounds {
        /// Range of the bad edit
        span: Span,
        /// Length of the source
        source_len: usize,
    },
    /// Edit boundary falls inside a multi-byte character
    #[error("Edit {span} does not start and end on character boundaries")]
    NotCharBoundary {
        /// Range of the bad edit
        span: Span,
    },
}

/// Safe code rewriter using byte ranges
///
/// This rewriter applies edits in reverse order to preserve byte positions,
/// and validates that edits don't overlap.
#[derive(Debug, Clone)]
pub struct ByteRangeRewriter {
    /// Original source code
    source: String,
    /// Pending edits
    edits: Vec<Edit>,
}

impl ByteRangeRewriter {
    /// Create a new rewriter for the given source
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            edits: Vec::new(),
        }
    }

    /// Add an edit to the pending list
    pub fn add_edit(&mut self, edit: Edit) {
        self.edits.push(edit);
    }

    /// Validate edits without applying them
    ///
    /// # Errors
    /// Returns error if edits overlap, are out of bounds, or split a character
    pub fn validate(&self) -> Result<(), RewriteError> {
        for edit in &self.edits {
            let span = edit.span;
            if span.end > self.source.len() || span.start > span.end {
                return Err(RewriteError::OutOfBounds {
                    span,
                    source_len: self.source.len(),
                });
            }
            if !self.source.is_char_boundary(span.start) || !self.source.is_char_boundary(span.end) {
                return Err(RewriteError::NotCharBoundary { span });
            }
        }

        for (i, first) in self.edits.iter().enumerate() {
            if let Some(second) = self.edits[i + 1..].iter().find(|e| first.overlaps(e)) {
                return Err(RewriteError::OverlappingEdits {
                    first: first.span,
                    second: second.span,
                });
            }
        }

        Ok(())
    }

    /// Apply all edits and return the modified source
    ///
    /// Edits are applied from the end of the source towards the start. An
    /// insertion at the same offset where a replacement begins is applied
    /// after it, so the inserted text ends up in front of the replacement.
    ///
    /// # Errors
    /// Returns error if edits overlap, are out of bounds, or split a character
    pub fn apply(self) -> Result<String, RewriteError> {
        self.validate()?;

        let mut result = self.source;
        let mut sorted_edits = self.edits;

        sorted_edits.sort_by(|a, b| {
            b.span
                .start
                .cmp(&a.span.start)
                .then(b.span.end.cmp(&a.span.end))
        });

        for edit in sorted_edits {
            tracing::trace!(
                span = %edit.span,
                rule = edit.description.as_deref().unwrap_or("-"),
                "applying edit"
            );
            result.replace_range(edit.span.start..edit.span.end, &edit.replacement);
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureRule;

    #[test]
    fn test_simple_replacement() {
        let source = "x = a != null ? a : 1;";
        let start = source.find('a').expect("should find a");
        let mut rewriter = ByteRangeRewriter::new(source);
        rewriter.add_edit(Edit::new(Span::new(start, source.len() - 1), "a ?? 1"));

        let result = rewriter.apply().expect("should apply");
        assert_eq!(result, "x = a ?? 1;");
    }

    #[test]
    fn test_multiple_non_overlapping_edits() {
        let source = "aaa bbb ccc";
        let mut rewriter = ByteRangeRewriter::new(source);
        rewriter.add_edit(Edit::new(Span::new(0, 3), "AAA"));
        rewriter.add_edit(Edit::new(Span::new(8, 11), "CCC"));

        let result = rewriter.apply().expect("should apply");
        assert_eq!(result, "AAA bbb CCC");
    }

    #[test]
    fn test_overlapping_edits_error() {
        let mut rewriter = ByteRangeRewriter::new("hello world");
        rewriter.add_edit(Edit::new(Span::new(0, 8), "hi"));
        rewriter.add_edit(Edit::new(Span::new(5, 10), "there"));

        let result = rewriter.apply();
        assert!(matches!(result, Err(RewriteError::OverlappingEdits { .. })));
    }

    #[test]
    fn test_nested_edits_error() {
        let mut rewriter = ByteRangeRewriter::new("(a as 1) as 1");
        rewriter.add_edit(Edit::new(Span::new(0, 13), "x"));
        rewriter.add_edit(Edit::new(Span::new(1, 7), "y"));

        assert!(matches!(
            rewriter.apply(),
            Err(RewriteError::OverlappingEdits { .. })
        ));
    }

    #[test]
    fn test_out_of_bounds_error() {
        let mut rewriter = ByteRangeRewriter::new("short");
        rewriter.add_edit(Edit::new(Span::new(0, 100), "long"));

        let result = rewriter.apply();
        assert!(matches!(result, Err(RewriteError::OutOfBounds { .. })));
    }

    #[test]
    fn test_char_boundary_error() {
        let mut rewriter = ByteRangeRewriter::new("\"é\"");
        rewriter.add_edit(Edit::new(Span::new(0, 2), ""));

        assert!(matches!(
            rewriter.apply(),
            Err(RewriteError::NotCharBoundary { .. })
        ));
    }

    #[test]
    fn test_deletion() {
        let source = "import * as A from './a';\nexport * as A from './a';";
        let mut rewriter = ByteRangeRewriter::new(source);
        let end = source.find("export").expect("should find export");
        rewriter.add_edit(Edit::new(Span::new(0, end), ""));

        let result = rewriter.apply().expect("should apply");
        assert_eq!(result, "export * as A from './a';");
    }

    #[test]
    fn test_insertion() {
        let mut rewriter = ByteRangeRewriter::new("export { B };");
        rewriter.add_edit(Edit::new(Span::empty(0), "export * as A from './a';\n"));

        let result = rewriter.apply().expect("should apply");
        assert_eq!(result, "export * as A from './a';\nexport { B };");
    }

    #[test]
    fn test_insertion_before_replacement_at_same_offset() {
        let mut rewriter = ByteRangeRewriter::new("abc");
        rewriter.add_edit(Edit::new(Span::new(0, 3), "XYZ"));
        rewriter.add_edit(Edit::new(Span::empty(0), ">"));

        let result = rewriter.apply().expect("should apply");
        assert_eq!(result, ">XYZ");
    }

    #[test]
    fn test_insertion_at_end_of_deletion() {
        let source = "import * as A from './a';\nexport { A, B };";
        let export = source.find("export").expect("should find export");
        let clause = source.find('{').expect("should find clause");
        let mut rewriter = ByteRangeRewriter::new(source);
        rewriter.add_edit(Edit::new(Span::new(0, export), ""));
        rewriter.add_edit(Edit::new(Span::empty(export), "export * as A from './a';\n"));
        rewriter.add_edit(Edit::new(Span::new(clause, source.len() - 1), "{ B }"));

        let result = rewriter.apply().expect("should apply");
        assert_eq!(result, "export * as A from './a';\nexport { B };");
    }

    #[test]
    fn test_preserves_formatting() {
        let source = "function f() {\n    // important comment\n    return a && a.b;\n}\n";
        let pos = source.find("a && a.b").expect("should find chain");
        let mut rewriter = ByteRangeRewriter::new(source);
        rewriter.add_edit(Edit::new(Span::new(pos, pos + 8), "a?.b"));

        let result = rewriter.apply().expect("should apply");
        assert!(result.contains("// important comment"));
        assert!(result.contains("return a?.b;"));
    }

    #[test]
    fn test_empty_edits() {
        let source = "hello world";
        let rewriter = ByteRangeRewriter::new(source);
        let result = rewriter.apply().expect("should apply");
        assert_eq!(result, source);
    }

    #[test]
    fn test_adjacent_non_overlapping_edits() {
        let mut rewriter = ByteRangeRewriter::new("abcdef");
        rewriter.add_edit(Edit::new(Span::new(0, 3), "XXX"));
        rewriter.add_edit(Edit::new(Span::new(3, 6), "YYY"));

        let result = rewriter.apply().expect("should apply");
        assert_eq!(result, "XXXYYY");
    }

    #[test]
    fn test_from_proposal_keeps_rule_id() {
        let proposal =
            RewriteProposal::replace(Span::new(0, 1), "x", FeatureRule::NullishCoalesce);
        let edit = Edit::from(proposal);
        assert_eq!(edit.description.as_deref(), Some("nullish-coalesce"));
        assert_eq!(edit.span, Span::new(0, 1));
    }
}
