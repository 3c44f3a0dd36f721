//! `a && a.b && a.b.c` → `a?.b?.c`
//!
//! The last operand of a left-associated `&&` chain is decomposed into its
//! root and access steps. Every earlier operand must equal a strictly longer
//! prefix of that decomposition than the one before it; the step that
//! follows each guarded prefix becomes `?.`, every other step is copied as
//! written. `a && a.b.c && a.b.c.d` therefore becomes `a?.b.c?.d`.

use super::RewriteProposal;
use crate::cst::{BinaryOperator, NodeKind, SyntaxNode};
use crate::equivalence::{equivalent, skip_parens};
use crate::features::FeatureRule;
use smallvec::SmallVec;

/// Propose a single optional chain for an `&&` conjunction.
///
/// Returns `None` for the inner `&&` nodes of a chain whose outermost
/// conjunction already matches, so a chain is proposed once.
#[must_use]
pub fn detect(node: SyntaxNode<'_>) -> Option<RewriteProposal> {
    if let Some(parent) = node.parent() {
        let is_left_operand = parent.binary_operator() == Some(BinaryOperator::And)
            && parent.field("left") == Some(node);
        if is_left_operand && rewrite_chain(parent).is_some() {
            return None;
        }
    }
    let replacement = rewrite_chain(node)?;
    Some(RewriteProposal::replace(
        node.span(),
        replacement,
        FeatureRule::OptionalChains,
    ))
}

/// Operands of a left-associated `&&` chain, leftmost first.
fn conjunction_operands(node: SyntaxNode<'_>) -> Option<SmallVec<[SyntaxNode<'_>; 4]>> {
    let mut operands = SmallVec::new();
    let mut current = node;
    while current.binary_operator() == Some(BinaryOperator::And) {
        operands.push(current.field("right")?);
        current = current.field("left")?;
    }
    operands.push(current);
    operands.reverse();
    (operands.len() >= 2).then_some(operands)
}

/// Prefixes of an access chain, root first: `a`, `a.b`, `a.b[c]`, `a.b[c]()`.
///
/// `None` when the chain touches a private name.
fn access_prefixes(node: SyntaxNode<'_>) -> Option<SmallVec<[SyntaxNode<'_>; 8]>> {
    let mut prefixes = SmallVec::new();
    let mut current = node;
    loop {
        prefixes.push(current);
        let receiver = match current.kind() {
            NodeKind::MemberExpression => {
                if current
                    .field("property")
                    .is_some_and(|p| p.kind() == NodeKind::PrivatePropertyIdentifier)
                {
                    return None;
                }
                current.field("object")
            }
            NodeKind::SubscriptExpression => current.field("object"),
            NodeKind::CallExpression => {
                // A tagged template cannot take `?.`.
                let is_tagged = current
                    .field("arguments")
                    .is_some_and(|args| args.kind() == NodeKind::TemplateString);
                if is_tagged {
                    None
                } else {
                    current.field("function")
                }
            }
            _ => None,
        };
        match receiver {
            Some(next) => current = next,
            None => break,
        }
    }
    prefixes.reverse();
    Some(prefixes)
}

fn rewrite_chain(node: SyntaxNode<'_>) -> Option<String> {
    let operands = conjunction_operands(node)?;
    let (last, guards) = operands.split_last()?;
    let prefixes = access_prefixes(skip_parens(*last))?;
    let steps = prefixes.len() - 1;
    if steps == 0 {
        return None;
    }

    // guarded[j] is true when step j (producing prefixes[j + 1]) must short-circuit.
    let mut guarded: SmallVec<[bool; 8]> = SmallVec::from_elem(false, steps);
    let mut next_depth = 0;
    for guard in guards {
        let guard = skip_parens(*guard);
        let depth = (next_depth..steps).find(|&k| equivalent(guard, prefixes[k]))?;
        guarded[depth] = true;
        next_depth = depth + 1;
    }

    let source = node.source();
    let mut out = String::with_capacity(node.span().len());
    out.push_str(prefixes[0].text());
    for (j, is_guarded) in guarded.iter().enumerate() {
        let step = &source[prefixes[j].span().end..prefixes[j + 1].span().end];
        if *is_guarded {
            out.push_str(&optional_step(step)?);
        } else {
            out.push_str(step);
        }
    }
    Some(out)
}

/// Turn the text of one access step into its short-circuiting form.
fn optional_step(step: &str) -> Option<String> {
    let trimmed = step.trim_start();
    let lead = &step[..step.len() - trimmed.len()];
    if trimmed.starts_with("?.") {
        return Some(step.to_owned());
    }
    match trimmed.chars().next()? {
        '.' => Some(format!("{lead}?{trimmed}")),
        '[' | '(' | '<' => Some(format!("{lead}?.{trimmed}")),
        _ => None,
    }
}
