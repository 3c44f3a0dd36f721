//! CST (Concrete Syntax Tree) module: the read-only view over parsed TypeScript.
//!
//! This module provides Tree-sitter based CST parsing for:
//! - Precise byte-range extraction for every node
//! - A closed [`NodeKind`] enum so detectors match shapes exhaustively
//! - Parent/child/field navigation without ever mutating the tree
//!
//! # Design Principles
//!
//! - **Tree-sitter decides the shape, we only read it**: nodes are never edited
//!   in place, rewrites are expressed as byte-range edits elsewhere
//! - **Byte-range anchored**: every node exposes a [`Span`] into the source text
//! - **Broken input is an error**: a tree containing `ERROR` or `MISSING` nodes is
//!   rejected with a [`ParseError`] instead of being rewritten

mod kind;
mod parser;

pub use kind::{BinaryOperator, NodeKind};
pub use parser::{CstParser, Descendants, ParseError, Point, Span, SyntaxNode, SyntaxTree};
