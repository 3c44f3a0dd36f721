//! `"foo" as "foo"` → `"foo" as const`

use super::RewriteProposal;
use crate::checker::{CheckError, TypeChecker};
use crate::cst::{NodeKind, SyntaxNode};
use crate::equivalence::skip_parens;
use crate::features::FeatureRule;

/// Propose `<operand> as const` for an assertion that spells out the
/// operand's own literal type.
///
/// The operand's type must render exactly like the asserted type, and the
/// asserted type must be assignable to the operand's type under `as const`.
pub fn detect<C: TypeChecker>(
    node: SyntaxNode<'_>,
    checker: &C,
) -> Result<Option<RewriteProposal>, CheckError> {
    if node.kind() != NodeKind::AsExpression || node.has_token("const") {
        return Ok(None);
    }
    let mut parts = node
        .named_children()
        .into_iter()
        .filter(|child| child.raw_kind() != "comment");
    let (Some(expression), Some(asserted_node)) = (parts.next(), parts.next()) else {
        return Ok(None);
    };
    let operand = skip_parens(expression);
    if !is_valid_argument(operand, checker) {
        return Ok(None);
    }

    let operand_type = checker.type_of(operand)?;
    let asserted = checker.type_from_type_node(asserted_node)?;
    let replaceable = checker.with_narrowing(operand, |narrowing| {
        let narrowed = narrowing.type_of(operand)?;
        Ok::<_, CheckError>(
            narrowing.render(&operand_type) == narrowing.render(&asserted)
                && narrowing.is_assignable(&asserted, &narrowed),
        )
    })?;
    if !replaceable {
        return Ok(None);
    }

    Ok(Some(RewriteProposal::replace(
        node.span(),
        format!("{} as const", operand.text()),
        FeatureRule::ConstAssertion,
    )))
}

/// Expressions `as const` accepts.
fn is_valid_argument<C: TypeChecker>(node: SyntaxNode<'_>, checker: &C) -> bool {
    match node.kind() {
        NodeKind::String
        | NodeKind::Number
        | NodeKind::True
        | NodeKind::False
        | NodeKind::Array
        | NodeKind::Object => true,
        NodeKind::TemplateString => !node
            .named_children()
            .iter()
            .any(|c| c.kind() == NodeKind::TemplateSubstitution),
        NodeKind::UnaryExpression => {
            let Some(argument) = node.field("argument") else {
                return false;
            };
            let is_bigint = argument.text().ends_with('n');
            match node.unary_operator() {
                Some("-") => argument.kind() == NodeKind::Number,
                Some("+") => argument.kind() == NodeKind::Number && !is_bigint,
                _ => false,
            }
        }
        NodeKind::MemberExpression | NodeKind::SubscriptExpression => node
            .field("object")
            .is_some_and(|object| {
                object.kind() == NodeKind::Identifier && checker.is_literal_enum(object.text())
            }),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::ProgramChecker;
    use crate::cst::SyntaxTree;

    fn rewrite(source: &str) -> Option<String> {
        let tree = SyntaxTree::parse(source).unwrap();
        let checker = ProgramChecker::new(&tree);
        let assertion = tree
            .root()
            .descendants()
            .find(|n| n.kind() == NodeKind::AsExpression)?;
        detect(assertion, &checker).unwrap().map(|p| p.replacement)
    }

    #[test]
    fn test_literals() {
        assert_eq!(rewrite("true as true").as_deref(), Some("true as const"));
        assert_eq!(rewrite("\"foo\" as \"foo\"").as_deref(), Some("\"foo\" as const"));
        assert_eq!(rewrite("`foo` as \"foo\"").as_deref(), Some("`foo` as const"));
        assert_eq!(rewrite("-1 as -1").as_deref(), Some("-1 as const"));
        assert_eq!(rewrite("10n as 10n").as_deref(), Some("10n as const"));
    }

    #[test]
    fn test_parenthesized_operand_unwrapped() {
        assert_eq!(rewrite("((1)) as 1").as_deref(), Some("1 as const"));
    }

    #[test]
    fn test_structured_literals() {
        assert_eq!(
            rewrite("({ a: \"123\" } as { a: \"123\" })").as_deref(),
            Some("{ a: \"123\" } as const")
        );
        assert_eq!(rewrite("([1, 2, 3] as [1, 2, 3])").as_deref(), Some("[1, 2, 3] as const"));
    }

    #[test]
    fn test_widened_types_declined() {
        assert_eq!(rewrite("([1, 2, 3] as number[])"), None);
        assert_eq!(rewrite("([1, 2, 3] as [number, number, number])"), None);
        assert_eq!(rewrite("\"foo\" as string"), None);
    }

    #[test]
    fn test_non_literal_operands_declined() {
        assert_eq!(rewrite("x as \"foo\""), None);
        assert_eq!(rewrite("(1 + 1) as 2"), None);
        assert_eq!(rewrite("`a${b}` as \"a\""), None);
    }

    #[test]
    fn test_already_const() {
        assert_eq!(rewrite("\"foo\" as const"), None);
    }

    #[test]
    fn test_enum_members() {
        assert_eq!(rewrite("enum A { f }\nA.f as A.f;").as_deref(), Some("A.f as const"));
        assert_eq!(
            rewrite("enum A { f = \"f\" }\nA[\"f\"] as A.f;").as_deref(),
            Some("A[\"f\"] as const")
        );
        assert_eq!(rewrite("enum B { f = g() }\nB.f as B.f;"), None);
    }
}
