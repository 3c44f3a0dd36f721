//! Type and symbol queries consumed by the detectors.
//!
//! The detectors never look at types directly; they go through
//! [`TypeChecker`]. [`ProgramChecker`] is the shipped implementation: it
//! derives literal types from syntax and resolves enums declared in the file
//! or imported from another file of the same [`ProgramSnapshot`].

mod enums;
mod program;
mod types;

pub use enums::{EnumInfo, EnumTable};
pub use program::{ProgramChecker, ProgramSnapshot};
pub use types::{property_name, Member, Primitive, Type};

use crate::cst::{Span, SyntaxNode};

/// Error raised by a checker query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckError {
    /// The node was not produced from the text this checker was built for.
    #[error("node at {span} does not belong to the checked source")]
    ForeignNode {
        /// Span of the offending node
        span: Span,
    },
    /// The node is not a type node.
    #[error("expected a type, found `{kind}` at {span}")]
    NotAType {
        /// Raw kind of the node
        kind: &'static str,
        /// Span of the node
        span: Span,
    },
}

/// Queries the detectors need from a type checker.
pub trait TypeChecker {
    /// Type of an expression in its current context.
    fn type_of(&self, node: SyntaxNode<'_>) -> Result<Type, CheckError>;

    /// Type denoted by a type node.
    fn type_from_type_node(&self, node: SyntaxNode<'_>) -> Result<Type, CheckError>;

    /// Render a type as it would appear in a diagnostic.
    fn render(&self, ty: &Type) -> String {
        ty.to_string()
    }

    /// Whether `source` is assignable to `target`.
    fn is_assignable(&self, source: &Type, target: &Type) -> bool {
        source.is_assignable_to(target)
    }

    /// Run `query` while `node` is treated as the operand of `as const`.
    ///
    /// The context is released when `query` returns or unwinds.
    fn with_narrowing<R>(&self, node: SyntaxNode<'_>, query: impl FnOnce(&Self) -> R) -> R
    where
        Self: Sized;

    /// Whether `name`, as seen from the checked file, is a literal enum.
    fn is_literal_enum(&self, name: &str) -> bool;

    /// Spans of every reference to `name` in the checked file, declarations included.
    fn find_references(&self, name: &str) -> Vec<Span>;
}
