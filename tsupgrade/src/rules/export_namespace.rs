//! `import * as A from "m"; export { A };` → `export * as A from "m";`
//!
//! Runs once per file over the top-level statements. Every specifier of a
//! local `export { … }` whose name is bound by exactly one top-level
//! namespace import is turned into its own `export * as … from` line. The
//! namespace binding is dropped from the import only when nothing else in
//! the file refers to it.

use super::RewriteProposal;
use crate::checker::TypeChecker;
use crate::cst::{NodeKind, Span, SyntaxNode};
use crate::features::FeatureRule;
use rustc_hash::FxHashMap;

const RULE: FeatureRule = FeatureRule::ExportAsNamespace;

/// `import [Default,] * as Name from "m"`
#[derive(Debug, Clone, Copy)]
struct NamespaceImport<'t> {
    statement: SyntaxNode<'t>,
    binding: SyntaxNode<'t>,
    namespace: SyntaxNode<'t>,
    default: Option<SyntaxNode<'t>>,
    source: SyntaxNode<'t>,
}

/// Edits for one file; applied together or not at all.
///
/// Each inner vector is one independent group: an export statement's
/// rewrite, or the removal of one import binding.
pub fn detect<C: TypeChecker>(statements: &[SyntaxNode<'_>], checker: &C) -> Vec<Vec<RewriteProposal>> {
    let imports: Vec<NamespaceImport<'_>> = statements.iter().filter_map(|s| namespace_import(*s)).collect();
    if imports.is_empty() {
        return Vec::new();
    }

    let mut groups = Vec::new();
    // Spans of rewritten specifier names, per import index.
    let mut consumed: FxHashMap<usize, Vec<Span>> = FxHashMap::default();

    for statement in statements.iter().copied().filter(|s| is_local_named_export(*s)) {
        let Some(clause) = statement
            .named_children()
            .into_iter()
            .find(|c| c.kind() == NodeKind::ExportClause)
        else {
            continue;
        };
        let specifiers: Vec<SyntaxNode<'_>> = clause
            .named_children()
            .into_iter()
            .filter(|c| c.kind() == NodeKind::ExportSpecifier)
            .collect();

        let mut new_lines = Vec::new();
        let mut remaining = Vec::new();
        for specifier in &specifiers {
            match matching_import(*specifier, &imports) {
                Some((index, name)) => {
                    let import = imports[index];
                    let exported = specifier.field("alias").unwrap_or(name);
                    new_lines.push(format!(
                        "export * as {} from {};",
                        exported.text(),
                        import.source.text()
                    ));
                    consumed.entry(index).or_default().push(name.span());
                }
                None => remaining.push(specifier.text()),
            }
        }
        if new_lines.is_empty() {
            continue;
        }

        let group = if remaining.is_empty() {
            vec![RewriteProposal::replace(statement.span(), new_lines.join("\n"), RULE)]
        } else {
            let mut inserted = new_lines.join("\n");
            inserted.push('\n');
            vec![
                RewriteProposal::insert(statement.span().start, inserted, RULE),
                RewriteProposal::replace(clause.span(), format!("{{ {} }}", remaining.join(", ")), RULE),
            ]
        };
        groups.push(group);
    }

    let mut removals: Vec<_> = consumed.into_iter().collect();
    removals.sort_by_key(|(index, _)| *index);
    for (index, rewritten) in removals {
        let import = imports[index];
        let references = checker.find_references(import.binding.text());
        let only_rewritten = references
            .iter()
            .all(|span| *span == import.binding.span() || rewritten.contains(span));
        if only_rewritten {
            groups.push(vec![remove_namespace(import)]);
        }
    }
    groups
}

fn namespace_import(statement: SyntaxNode<'_>) -> Option<NamespaceImport<'_>> {
    if statement.kind() != NodeKind::ImportStatement || statement.has_token("type") {
        return None;
    }
    let clause = statement
        .named_children()
        .into_iter()
        .find(|c| c.kind() == NodeKind::ImportClause)?;
    let bindings = clause.named_children();
    let namespace = bindings
        .iter()
        .copied()
        .find(|c| c.kind() == NodeKind::NamespaceImport)?;
    let binding = namespace
        .named_children()
        .into_iter()
        .find(|c| c.kind() == NodeKind::Identifier)?;
    let default = bindings
        .iter()
        .copied()
        .find(|c| c.kind() == NodeKind::Identifier);
    Some(NamespaceImport {
        statement,
        binding,
        namespace,
        default,
        source: statement.field("source")?,
    })
}

/// `export { … };` without a `from` clause and not `export type`.
fn is_local_named_export(statement: SyntaxNode<'_>) -> bool {
    statement.kind() == NodeKind::ExportStatement
        && statement.field("source").is_none()
        && !statement.has_token("type")
        && statement
            .named_children()
            .iter()
            .any(|c| c.kind() == NodeKind::ExportClause)
}

/// Index of the single namespace import binding the specifier's local name.
fn matching_import<'t>(specifier: SyntaxNode<'t>, imports: &[NamespaceImport<'_>]) -> Option<(usize, SyntaxNode<'t>)> {
    if specifier.has_token("type") {
        return None;
    }
    let name = specifier.field("name")?;
    if name.kind() != NodeKind::Identifier {
        return None;
    }
    let mut matches = imports
        .iter()
        .enumerate()
        .filter(|(_, import)| import.binding.text() == name.text());
    let (index, _) = matches.next()?;
    // Two imports binding the same name are ambiguous.
    matches.next().is_none().then_some((index, name))
}

fn remove_namespace(import: NamespaceImport<'_>) -> RewriteProposal {
    match import.default {
        // `import D, * as X from "m"` → `import D from "m"`
        Some(default) => RewriteProposal::delete(Span::new(default.span().end, import.namespace.span().end), RULE),
        None => {
            let span = import.statement.span();
            let rest = &import.statement.source()[span.end..];
            let blank = rest.len() - rest.trim_start_matches([' ', '\t']).len();
            let rest = &rest[blank..];
            let line_break = if rest.starts_with("\r\n") {
                2
            } else {
                usize::from(rest.starts_with('\n'))
            };
            RewriteProposal::delete(Span::new(span.start, span.end + blank + line_break), RULE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::ProgramChecker;
    use crate::cst::SyntaxTree;
    use crate::fix::ByteRangeRewriter;

    fn rewrite(source: &str) -> String {
        let tree = SyntaxTree::parse(source).unwrap();
        let checker = ProgramChecker::new(&tree);
        let groups = detect(&tree.statements(), &checker);
        let mut rewriter = ByteRangeRewriter::new(source);
        for proposal in groups.into_iter().flatten() {
            rewriter.add_edit(proposal.into());
        }
        rewriter.apply().unwrap()
    }

    #[test]
    fn test_simple_case() {
        assert_eq!(
            rewrite("import * as A from \"./a.js\";\nexport { A };"),
            "export * as A from \"./a.js\";"
        );
    }

    #[test]
    fn test_same_line_leaves_no_indent() {
        assert_eq!(
            rewrite("import * as A from \"a\"; export { A };"),
            "export * as A from \"a\";"
        );
        assert_eq!(
            rewrite("import * as A from 'a';  \t\nexport { A, B };"),
            "export * as A from 'a';\nexport { B };"
        );
    }

    #[test]
    fn test_default_import_kept() {
        assert_eq!(
            rewrite("import A, * as B from './a.js';\nexport { B };"),
            "import A from './a.js';\nexport * as B from './a.js';"
        );
    }

    #[test]
    fn test_multiple_named_exports() {
        assert_eq!(
            rewrite("import * as A from './a.js';\nexport { A, B as C, D };"),
            "export * as A from './a.js';\nexport { B as C, D };"
        );
    }

    #[test]
    fn test_alias_becomes_namespace_name() {
        assert_eq!(
            rewrite("import * as A from './a.js';\nexport { A as B };"),
            "export * as B from './a.js';"
        );
    }

    #[test]
    fn test_multiple_imports() {
        assert_eq!(
            rewrite("import * as A from './a.js';\nimport * as B from './b.js';\nexport {A, B};"),
            "export * as A from './a.js';\nexport * as B from './b.js';"
        );
    }

    #[test]
    fn test_referenced_import_preserved() {
        assert_eq!(
            rewrite("import * as A from './a.js';\nexport { A, x };\nA.run();"),
            "import * as A from './a.js';\nexport * as A from './a.js';\nexport { x };\nA.run();"
        );
    }

    #[test]
    fn test_ambiguous_import_untouched() {
        let source = "import * as A from './a.js';\nimport * as A from './b.js';\nexport { A };";
        assert_eq!(rewrite(source), source);
    }

    #[test]
    fn test_re_export_and_type_export_untouched() {
        let source = "import * as A from './a.js';\nexport { A } from './c.js';\nexport type { A };";
        assert_eq!(rewrite(source), source);
    }
}
