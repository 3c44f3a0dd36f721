//! Expression equivalence used to validate multi-part pattern matches.
//!
//! Two expressions are considered the same value when they have the same
//! node kind and either name the same identifier or have identical source
//! text once leading and trailing whitespace is trimmed. This is a syntactic
//! check: it does not prove that evaluating either side is side-effect free.

use crate::cst::{NodeKind, SyntaxNode};

/// Unwrap any number of `( … )` layers around an expression.
#[must_use]
pub fn skip_parens(node: SyntaxNode<'_>) -> SyntaxNode<'_> {
    let mut current = node;
    while current.kind() == NodeKind::ParenthesizedExpression {
        match current.first_named_child() {
            Some(inner) => current = inner,
            None => break,
        }
    }
    current
}

/// Whether `a` and `b` denote the same value for rewrite purposes.
#[must_use]
pub fn equivalent(a: SyntaxNode<'_>, b: SyntaxNode<'_>) -> bool {
    if a.kind() != b.kind() || a.raw_kind() != b.raw_kind() {
        return false;
    }
    if a.kind() == NodeKind::Identifier {
        return a.text() == b.text();
    }
    a.text().trim() == b.text().trim()
}

/// [`equivalent`] after unwrapping parentheses on both sides.
#[must_use]
pub fn equivalent_ignoring_parens(a: SyntaxNode<'_>, b: SyntaxNode<'_>) -> bool {
    equivalent(skip_parens(a), skip_parens(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::SyntaxTree;

    fn binary_operands(tree: &SyntaxTree) -> (SyntaxNode<'_>, SyntaxNode<'_>) {
        let binary = tree
            .root()
            .descendants()
            .find(|n| n.kind() == NodeKind::BinaryExpression)
            .unwrap();
        (binary.field("left").unwrap(), binary.field("right").unwrap())
    }

    #[test]
    fn test_identifiers_by_name() {
        let tree = SyntaxTree::parse("a + a;").unwrap();
        let (left, right) = binary_operands(&tree);
        assert!(equivalent(left, right));
    }

    #[test]
    fn test_different_identifiers() {
        let tree = SyntaxTree::parse("a + b;").unwrap();
        let (left, right) = binary_operands(&tree);
        assert!(!equivalent(left, right));
    }

    #[test]
    fn test_member_text_equality() {
        let tree = SyntaxTree::parse("a.b.c + a.b.c;").unwrap();
        let (left, right) = binary_operands(&tree);
        assert!(equivalent(left, right));
    }

    #[test]
    fn test_kind_mismatch() {
        let tree = SyntaxTree::parse("(a) + a;").unwrap();
        let (left, right) = binary_operands(&tree);
        assert!(!equivalent(left, right));
        assert!(equivalent_ignoring_parens(left, right));
    }

    #[test]
    fn test_skip_nested_parens() {
        let tree = SyntaxTree::parse("((a.b)) + 1;").unwrap();
        let (left, _) = binary_operands(&tree);
        let inner = skip_parens(left);
        assert_eq!(inner.kind(), NodeKind::MemberExpression);
        assert_eq!(inner.text(), "a.b");
    }
}
