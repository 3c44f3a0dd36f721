//! Edit scheduling and application.
//!
//! Detectors only produce proposals. The [`EditTracker`] decides which of
//! them survive a pass, and the [`ByteRangeRewriter`] splices the survivors
//! into the source text without touching anything else.

mod rewriter;
mod tracker;

pub use rewriter::{ByteRangeRewriter, Edit, RewriteError};
pub use tracker::{Decision, EditRecord, EditTracker, TrackerSummary};
