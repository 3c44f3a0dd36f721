//! `E == null ? fallback : E` → `E ?? fallback`
//!
//! The condition must be a nullable test over `E`: a comparison of `E`
//! against `null` (loose or strict), against `undefined` or a `void`
//! expression (strict only), or two such tests over the same `E` joined by
//! `||` (both equality) or `&&` (both inequality). Operands may appear on
//! either side of the comparison.

use super::RewriteProposal;
use crate::cst::{BinaryOperator, NodeKind, SyntaxNode};
use crate::equivalence::{equivalent, skip_parens};
use crate::features::FeatureRule;
use std::borrow::Cow;

/// Which branch holds `E` when the condition is true.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Polarity {
    /// `==`, `===`, `||`: true means nullish, the alternative is `E`.
    NullishWhenTrue,
    /// `!=`, `!==`, `&&`: true means defined, the consequence is `E`.
    DefinedWhenTrue,
}

#[derive(Debug, Clone, Copy)]
struct NullableTest<'t> {
    target: SyntaxNode<'t>,
    polarity: Polarity,
}

/// Propose `E ?? fallback` for a nullish-guard ternary.
#[must_use]
pub fn detect(node: SyntaxNode<'_>) -> Option<RewriteProposal> {
    if node.kind() != NodeKind::TernaryExpression {
        return None;
    }
    let test = condition_test(node.field("condition")?)?;
    let consequence = node.field("consequence")?;
    let alternative = node.field("alternative")?;
    let (value, fallback) = match test.polarity {
        Polarity::NullishWhenTrue => (alternative, consequence),
        Polarity::DefinedWhenTrue => (consequence, alternative),
    };
    if !equivalent(skip_parens(value), test.target) {
        return None;
    }
    let replacement = format!("{} ?? {}", operand_text(test.target), operand_text(fallback));
    Some(RewriteProposal::replace(
        node.span(),
        replacement,
        FeatureRule::NullishCoalesce,
    ))
}

fn condition_test(condition: SyntaxNode<'_>) -> Option<NullableTest<'_>> {
    let condition = skip_parens(condition);
    if let Some(test) = nullable_test(condition) {
        return Some(test);
    }
    let polarity = match condition.binary_operator()? {
        BinaryOperator::Or => Polarity::NullishWhenTrue,
        BinaryOperator::And => Polarity::DefinedWhenTrue,
        _ => return None,
    };
    let left = nullable_test(skip_parens(condition.field("left")?))?;
    let right = nullable_test(skip_parens(condition.field("right")?))?;
    let agrees = left.polarity == polarity && right.polarity == polarity;
    (agrees && equivalent(left.target, right.target)).then_some(NullableTest {
        target: left.target,
        polarity,
    })
}

fn nullable_test(node: SyntaxNode<'_>) -> Option<NullableTest<'_>> {
    let operator = node.binary_operator()?;
    let (polarity, strict) = match operator {
        BinaryOperator::LooseEq => (Polarity::NullishWhenTrue, false),
        BinaryOperator::StrictEq => (Polarity::NullishWhenTrue, true),
        BinaryOperator::LooseNe => (Polarity::DefinedWhenTrue, false),
        BinaryOperator::StrictNe => (Polarity::DefinedWhenTrue, true),
        _ => return None,
    };
    let left = skip_parens(node.field("left")?);
    let right = skip_parens(node.field("right")?);
    let target = if is_nullish_sentinel(right, strict) {
        left
    } else if is_nullish_sentinel(left, strict) {
        right
    } else {
        return None;
    };
    Some(NullableTest { target, polarity })
}

/// `null`, or with strict comparison `undefined` / `void expr`.
fn is_nullish_sentinel(node: SyntaxNode<'_>, strict: bool) -> bool {
    match node.kind() {
        NodeKind::Null => true,
        NodeKind::Undefined => strict,
        NodeKind::Identifier => strict && node.text() == "undefined",
        NodeKind::UnaryExpression => strict && node.unary_operator() == Some("void"),
        _ => false,
    }
}

/// Operand text, parenthesized when it binds at or below `??`.
fn operand_text<'t>(node: SyntaxNode<'t>) -> Cow<'t, str> {
    let needs_parens = node
        .binary_operator()
        .is_some_and(BinaryOperator::is_logical)
        || node.kind().binds_looser_than_coalesce();
    if needs_parens {
        Cow::Owned(format!("({})", node.text()))
    } else {
        Cow::Borrowed(node.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::SyntaxTree;

    fn rewrite(source: &str) -> Option<String> {
        let tree = SyntaxTree::parse(source).unwrap();
        let ternary = tree
            .root()
            .descendants()
            .find(|n| n.kind() == NodeKind::TernaryExpression)?;
        detect(ternary).map(|p| p.replacement)
    }

    #[test]
    fn test_loose_null() {
        assert_eq!(rewrite("a == null ? 1 : a;").as_deref(), Some("a ?? 1"));
        assert_eq!(rewrite("a != null ? a : 1;").as_deref(), Some("a ?? 1"));
    }

    #[test]
    fn test_commuted_operands() {
        assert_eq!(rewrite("null === a ? 1 : a;").as_deref(), Some("a ?? 1"));
        assert_eq!(rewrite("undefined !== a.b ? a.b : c;").as_deref(), Some("a.b ?? c"));
    }

    #[test]
    fn test_parenthesized_target() {
        assert_eq!(rewrite("(a) == null ? 1 : a;").as_deref(), Some("a ?? 1"));
        assert_eq!(rewrite("a !== void 0 ? (a) : 1;").as_deref(), Some("a ?? 1"));
    }

    #[test]
    fn test_loose_undefined_declined() {
        assert_eq!(rewrite("a == undefined ? 1 : a;"), None);
    }

    #[test]
    fn test_wrong_polarity_declined() {
        assert_eq!(rewrite("a == null ? a : 1;"), None);
        assert_eq!(rewrite("a !== null || a !== undefined ? 1 : a;"), None);
    }

    #[test]
    fn test_combined_tests() {
        assert_eq!(
            rewrite("a === null || a === undefined ? 1 : a;").as_deref(),
            Some("a ?? 1")
        );
        assert_eq!(
            rewrite("a !== null && a !== undefined ? a : 1;").as_deref(),
            Some("a ?? 1")
        );
        assert_eq!(rewrite("a === null || b === undefined ? 1 : a;"), None);
    }

    #[test]
    fn test_fallback_parenthesized_when_needed() {
        assert_eq!(
            rewrite("a != null ? a : b || c;").as_deref(),
            Some("a ?? (b || c)")
        );
        assert_eq!(
            rewrite("a != null ? a : (b || c);").as_deref(),
            Some("a ?? (b || c)")
        );
    }

    #[test]
    fn test_non_nullable_condition_declined() {
        assert_eq!(rewrite("a ? a : 1;"), None);
        assert_eq!(rewrite("a > 0 ? 1 : a;"), None);
    }
}
