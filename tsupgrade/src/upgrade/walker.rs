//! Pre-order traversal that feeds detector output to the edit tracker.

use crate::checker::{CheckError, TypeChecker};
use crate::cst::{BinaryOperator, NodeKind, SyntaxNode, SyntaxTree};
use crate::features::{FeatureRule, FeatureSet};
use crate::fix::EditTracker;
use crate::rules::{const_assertion, export_namespace, nullish, optional_chain};
use std::path::Path;

/// Visit every node of `tree` once, outer nodes before the nodes they contain.
///
/// Children are always visited, whether or not their parent matched; an
/// inner proposal that collides with an accepted outer one is deferred by
/// the tracker.
///
/// # Errors
/// Returns the first checker failure.
pub(crate) fn walk<C: TypeChecker>(
    tree: &SyntaxTree,
    file: &Path,
    features: &FeatureSet,
    checker: &C,
    tracker: &mut EditTracker,
) -> Result<(), CheckError> {
    let mut stack = vec![tree.root()];
    while let Some(node) = stack.pop() {
        visit(node, file, features, checker, tracker)?;
        stack.extend(node.named_children().into_iter().rev());
    }
    Ok(())
}

fn visit<C: TypeChecker>(
    node: SyntaxNode<'_>,
    file: &Path,
    features: &FeatureSet,
    checker: &C,
    tracker: &mut EditTracker,
) -> Result<(), CheckError> {
    match node.kind() {
        NodeKind::Program if features.is_enabled(FeatureRule::ExportAsNamespace) => {
            for group in export_namespace::detect(&node.named_children(), checker) {
                tracker.propose_group(file, group);
            }
        }
        NodeKind::TernaryExpression if features.is_enabled(FeatureRule::NullishCoalesce) => {
            if let Some(proposal) = nullish::detect(node) {
                tracker.propose(file, proposal);
            }
        }
        NodeKind::BinaryExpression
            if features.is_enabled(FeatureRule::OptionalChains)
                && node.binary_operator() == Some(BinaryOperator::And) =>
        {
            if let Some(proposal) = optional_chain::detect(node) {
                tracker.propose(file, proposal);
            }
        }
        NodeKind::AsExpression if features.is_enabled(FeatureRule::ConstAssertion) => {
            if let Some(proposal) = const_assertion::detect(node, checker)? {
                tracker.propose(file, proposal);
            }
        }
        _ => {}
    }
    Ok(())
}
