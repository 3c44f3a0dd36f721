//! Tree-sitter based CST parser for TypeScript source code.
//!
//! Provides precise byte-range information for safe code rewriting.

use super::kind::{BinaryOperator, NodeKind};
use crate::constants::TSX_EXTENSION;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use tree_sitter::{Language, Node, Parser, Tree};

/// A point in source code (row, column)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    /// Zero-indexed row number
    pub row: usize,
    /// Zero-indexed column (byte offset within line)
    pub column: usize,
}

impl From<tree_sitter::Point> for Point {
    fn from(p: tree_sitter::Point) -> Self {
        Self {
            row: p.row,
            column: p.column,
        }
    }
}

/// Half-open byte range `[start, end)` into a source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl Span {
    /// Create a span.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width span at `offset`, used for insertions.
    #[must_use]
    pub const fn empty(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    /// Number of bytes covered.
    #[must_use]
    pub const fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether this is a zero-width span.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start >= self.end
    }

    /// Check if this span overlaps with another.
    ///
    /// Adjacent spans and zero-width spans touching a boundary do not overlap.
    #[must_use]
    pub const fn overlaps(self, other: Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Check if `other` lies entirely within this span.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Error during CST parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Failed to create parser
    #[error("failed to create TypeScript parser: {0}")]
    ParserCreation(String),
    /// The parser gave up without producing a tree
    #[error("failed to parse source as TypeScript")]
    ParseFailed,
    /// The tree contains error-recovery nodes
    #[error("syntax error at {line}:{column}: unexpected `{snippet}`")]
    Syntax {
        /// One-based line of the first error node
        line: usize,
        /// One-based column of the first error node
        column: usize,
        /// Source text of the error node (truncated)
        snippet: String,
    },
}

/// Tree-sitter based CST parser
pub struct CstParser {
    parser: Parser,
}

impl CstParser {
    /// Create a new CST parser for TypeScript
    ///
    /// # Errors
    /// Returns error if parser creation fails
    pub fn new() -> Result<Self, ParseError> {
        Self::with_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
    }

    /// Create a parser for the file at `path`: `.tsx` files get the TSX
    /// grammar, everything else plain TypeScript.
    ///
    /// # Errors
    /// Returns error if parser creation fails
    pub fn for_path(path: &Path) -> Result<Self, ParseError> {
        if is_tsx(path) {
            Self::with_language(&tree_sitter_typescript::LANGUAGE_TSX.into())
        } else {
            Self::new()
        }
    }

    fn with_language(language: &Language) -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(language)
            .map_err(|e| ParseError::ParserCreation(e.to_string()))?;
        Ok(Self { parser })
    }

    /// Parse source code into a CST
    ///
    /// # Errors
    /// Returns error if parsing fails or the tree contains syntax errors
    pub fn parse(&mut self, source: &str) -> Result<SyntaxTree, ParseError> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or(ParseError::ParseFailed)?;

        let syntax = SyntaxTree {
            tree,
            source: source.to_owned(),
        };
        if let Some(error) = syntax.first_error() {
            return Err(error);
        }
        Ok(syntax)
    }
}

fn is_tsx(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(TSX_EXTENSION))
}

/// A parsed, error-free CST together with the text it was parsed from.
pub struct SyntaxTree {
    tree: Tree,
    source: String,
}

impl fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("len", &self.source.len())
            .finish_non_exhaustive()
    }
}

impl SyntaxTree {
    /// Parse `source` with a fresh parser.
    ///
    /// # Errors
    /// Returns error if the parser cannot be created or the source does not parse.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        CstParser::new()?.parse(source)
    }

    /// Parse `source` with the grammar that matches `path`.
    ///
    /// # Errors
    /// Returns error if the parser cannot be created or the source does not parse.
    pub fn parse_path(path: &Path, source: &str) -> Result<Self, ParseError> {
        CstParser::for_path(path)?.parse(source)
    }

    /// Root (`program`) node.
    #[must_use]
    pub fn root(&self) -> SyntaxNode<'_> {
        SyntaxNode {
            node: self.tree.root_node(),
            source: &self.source,
        }
    }

    /// Original source code
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Extract a slice of source code by byte range
    #[must_use]
    pub fn slice(&self, span: Span) -> &str {
        &self.source[span.start..span.end]
    }

    /// Top-level statements of the program.
    #[must_use]
    pub fn statements(&self) -> Vec<SyntaxNode<'_>> {
        self.root().named_children()
    }

    fn first_error(&self) -> Option<ParseError> {
        if !self.tree.root_node().has_error() {
            return None;
        }
        let mut stack = vec![self.root()];
        while let Some(node) = stack.pop() {
            if node.node.is_error() || node.node.is_missing() {
                let point = node.start_point();
                let snippet: String = node.text().chars().take(40).collect();
                return Some(ParseError::Syntax {
                    line: point.row + 1,
                    column: point.column + 1,
                    snippet,
                });
            }
            if node.node.has_error() {
                stack.extend(node.children().into_iter().rev());
            }
        }
        // has_error() said yes but no node claimed it; report the root.
        Some(ParseError::Syntax {
            line: 1,
            column: 1,
            snippet: String::new(),
        })
    }
}

/// Read-only handle to a node of a [`SyntaxTree`].
#[derive(Clone, Copy)]
pub struct SyntaxNode<'t> {
    node: Node<'t>,
    source: &'t str,
}

impl fmt::Debug for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} {:?}", self.node.kind(), self.span(), self.text())
    }
}

impl PartialEq for SyntaxNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.node.id() == other.node.id()
    }
}

impl Eq for SyntaxNode<'_> {}

impl<'t> SyntaxNode<'t> {
    fn wrap(&self, node: Node<'t>) -> Self {
        Self {
            node,
            source: self.source,
        }
    }

    /// Typed kind of this node.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        NodeKind::from_ts_kind(self.node.kind())
    }

    /// Raw tree-sitter kind (also the token text for anonymous nodes).
    #[must_use]
    pub fn raw_kind(&self) -> &'static str {
        self.node.kind()
    }

    /// Byte range of the node.
    #[must_use]
    pub fn span(&self) -> Span {
        Span::new(self.node.start_byte(), self.node.end_byte())
    }

    /// Start point (row, column)
    #[must_use]
    pub fn start_point(&self) -> Point {
        self.node.start_position().into()
    }

    /// Source text covered by the node.
    #[must_use]
    pub fn text(&self) -> &'t str {
        &self.source[self.node.start_byte()..self.node.end_byte()]
    }

    /// Full source text of the tree this node belongs to.
    #[must_use]
    pub fn source(&self) -> &'t str {
        self.source
    }

    /// Whether this is a named node (vs anonymous like punctuation)
    #[must_use]
    pub fn is_named(&self) -> bool {
        self.node.is_named()
    }

    /// All children, named and anonymous, in source order.
    #[must_use]
    pub fn children(&self) -> Vec<Self> {
        let mut cursor = self.node.walk();
        self.node
            .children(&mut cursor)
            .map(|child| self.wrap(child))
            .collect()
    }

    /// Named children in source order.
    #[must_use]
    pub fn named_children(&self) -> Vec<Self> {
        let mut cursor = self.node.walk();
        self.node
            .named_children(&mut cursor)
            .map(|child| self.wrap(child))
            .collect()
    }

    /// First named child, if any.
    #[must_use]
    pub fn first_named_child(&self) -> Option<Self> {
        self.named_children().into_iter().next()
    }

    /// Child stored under a grammar field name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<Self> {
        self.node
            .child_by_field_name(name)
            .map(|child| self.wrap(child))
    }

    /// Parent node (lookup only).
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.node.parent().map(|parent| self.wrap(parent))
    }

    /// Whether an anonymous child token with the given text is present
    /// (e.g. `const`, `type`, `readonly`).
    #[must_use]
    pub fn has_token(&self, token: &str) -> bool {
        self.children()
            .iter()
            .any(|child| !child.is_named() && child.raw_kind() == token)
    }

    /// Operator of a binary expression.
    #[must_use]
    pub fn binary_operator(&self) -> Option<BinaryOperator> {
        if self.kind() != NodeKind::BinaryExpression {
            return None;
        }
        self.field("operator")
            .map(|op| BinaryOperator::from_token(op.raw_kind()))
    }

    /// Operator token of a unary expression (`-`, `+`, `!`, `void`, ...).
    #[must_use]
    pub fn unary_operator(&self) -> Option<&'static str> {
        if self.kind() != NodeKind::UnaryExpression {
            return None;
        }
        self.field("operator").map(|op| op.raw_kind())
    }

    /// Whether this is an identifier with the given name.
    #[must_use]
    pub fn is_identifier_named(&self, name: &str) -> bool {
        self.kind() == NodeKind::Identifier && self.text() == name
    }

    /// Iterate over this node and all its descendants in pre-order.
    #[must_use]
    pub fn descendants(&self) -> Descendants<'t> {
        Descendants { stack: vec![*self] }
    }
}

/// Pre-order iterator over a subtree, driven by an explicit stack so deep
/// expression chains cannot overflow the call stack.
pub struct Descendants<'t> {
    stack: Vec<SyntaxNode<'t>>,
}

impl<'t> Iterator for Descendants<'t> {
    type Item = SyntaxNode<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.named_children().into_iter().rev());
        Some(node)
    }
}
