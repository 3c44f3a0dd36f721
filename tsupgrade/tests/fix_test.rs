//! Tests for the fix module (ByteRangeRewriter and EditTracker).
#![allow(clippy::unwrap_used)]

use std::path::Path;
use tsupgrade::cst::Span;
use tsupgrade::features::FeatureRule;
use tsupgrade::fix::{ByteRangeRewriter, Decision, Edit, EditTracker, RewriteError};
use tsupgrade::rules::RewriteProposal;

#[test]
fn test_multiple_non_overlapping_edits() {
    let source = "a && a.b; c && c.d;";
    let mut rewriter = ByteRangeRewriter::new(source);
    rewriter.add_edit(Edit::new(Span::new(0, 8), "a?.b"));
    rewriter.add_edit(Edit::new(Span::new(10, 18), "c?.d"));
    assert_eq!(rewriter.apply().unwrap(), "a?.b; c?.d;");
}

#[test]
fn test_overlapping_edits_error() {
    let mut rewriter = ByteRangeRewriter::new("hello world");
    rewriter.add_edit(Edit::new(Span::new(0, 8), "hi"));
    rewriter.add_edit(Edit::new(Span::new(5, 10), "there"));
    assert!(matches!(rewriter.apply(), Err(RewriteError::OverlappingEdits { .. })));
}

#[test]
fn test_out_of_bounds_error() {
    let mut rewriter = ByteRangeRewriter::new("short");
    rewriter.add_edit(Edit::new(Span::new(0, 100), "x"));
    assert!(matches!(rewriter.apply(), Err(RewriteError::OutOfBounds { .. })));
}

#[test]
fn test_insert_before_replacement_at_same_offset() {
    let mut rewriter = ByteRangeRewriter::new("{ a }");
    rewriter.add_edit(Edit::new(Span::new(0, 5), "{ b }"));
    rewriter.add_edit(Edit::new(Span::empty(0), "export * as a from 'a';\n"));
    assert_eq!(rewriter.apply().unwrap(), "export * as a from 'a';\n{ b }");
}

#[test]
fn test_tracker_defers_overlaps_and_keeps_groups_atomic() {
    let file = Path::new("a.ts");
    let mut tracker = EditTracker::new();
    let outer = RewriteProposal::replace(Span::new(0, 20), "outer", FeatureRule::NullishCoalesce);
    let inner = RewriteProposal::replace(Span::new(5, 10), "inner", FeatureRule::NullishCoalesce);
    assert_eq!(tracker.propose(file, outer), Decision::Accepted);
    assert_eq!(tracker.propose(file, inner), Decision::Deferred);

    let group = vec![
        RewriteProposal::replace(Span::new(30, 35), "x", FeatureRule::ExportAsNamespace),
        RewriteProposal::delete(Span::new(15, 25), FeatureRule::ExportAsNamespace),
    ];
    assert_eq!(tracker.propose_group(file, group), Decision::Deferred);

    // Other files never conflict.
    let other = RewriteProposal::replace(Span::new(5, 10), "inner", FeatureRule::NullishCoalesce);
    assert_eq!(tracker.propose(Path::new("b.ts"), other), Decision::Accepted);

    let summary = tracker.finish();
    assert!(summary.needs_another_pass());
    assert_eq!(summary.deferred, 2);
    assert_eq!(summary.records.len(), 2);
    assert_eq!(summary.records[0].span, Span::new(0, 20));
}
