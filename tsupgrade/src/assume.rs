//! Minimum TypeScript version a source already depends on.

use crate::cst::{BinaryOperator, NodeKind, SyntaxNode, SyntaxTree};
use crate::upgrade::UpgradeError;
use crate::version::TypeScriptVersion;
use std::path::Path;

/// The newest version required by any idiom in `source`, or
/// [`TypeScriptVersion::Before2_0`] when none of the known idioms is used.
///
/// # Errors
/// Fails when `source` does not parse.
pub fn assume_version(source: &str) -> Result<TypeScriptVersion, UpgradeError> {
    Ok(newest_required(&SyntaxTree::parse(source)?))
}

/// Like [`assume_version`], parsing `source` with the grammar matching `file`
/// so `.tsx` files with JSX are understood.
///
/// # Errors
/// Fails when `source` does not parse.
pub fn assume_file_version(file: &Path, source: &str) -> Result<TypeScriptVersion, UpgradeError> {
    Ok(newest_required(&SyntaxTree::parse_path(file, source)?))
}

fn newest_required(tree: &SyntaxTree) -> TypeScriptVersion {
    tree
        .root()
        .descendants()
        .filter_map(required_version)
        .max()
        .unwrap_or(TypeScriptVersion::Before2_0)
}

fn required_version(node: SyntaxNode<'_>) -> Option<TypeScriptVersion> {
    match node.kind() {
        NodeKind::NamespaceExport => Some(TypeScriptVersion::V3_8),
        NodeKind::OptionalChain | NodeKind::Asserts => Some(TypeScriptVersion::V3_7),
        NodeKind::BinaryExpression => {
            (node.binary_operator() == Some(BinaryOperator::Coalesce)).then_some(TypeScriptVersion::V3_7)
        }
        NodeKind::MemberExpression | NodeKind::SubscriptExpression | NodeKind::CallExpression => {
            node.has_token("?.").then_some(TypeScriptVersion::V3_7)
        }
        NodeKind::AsExpression => node.has_token("const").then_some(TypeScriptVersion::V3_4),
        _ => None,
    }
}
