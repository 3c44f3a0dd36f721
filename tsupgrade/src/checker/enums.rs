//! Enum declarations and their literal-ness.
//!
//! An enum is *literal* when every member has a literal value: no
//! initializer (outside ambient context), a string or numeric literal, a
//! negated numeric literal, or a reference to another member of the same
//! enum. A single string-valued member makes the whole enum literal.

use crate::cst::{NodeKind, SyntaxNode, SyntaxTree};
use rustc_hash::FxHashMap;

/// What the checker knows about one enum name (all merged declarations).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumInfo {
    /// Member names across all declarations.
    pub members: Vec<String>,
    /// Whether the enum is a literal enum.
    pub literal: bool,
    /// Whether any declaration is exported.
    pub exported: bool,
}

impl EnumInfo {
    /// Whether `name` is a member.
    #[must_use]
    pub fn has_member(&self, name: &str) -> bool {
        self.members.iter().any(|m| m == name)
    }
}

/// Enums declared at any level of one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumTable {
    enums: FxHashMap<String, EnumInfo>,
}

/// One member as written.
struct RawMember<'t> {
    name: String,
    initializer: Option<SyntaxNode<'t>>,
}

impl EnumTable {
    /// Collect every enum declaration of `tree`.
    #[must_use]
    pub fn from_tree(tree: &SyntaxTree) -> Self {
        let mut grouped: FxHashMap<String, Vec<(SyntaxNode<'_>, bool)>> = FxHashMap::default();
        for node in tree.root().descendants() {
            if node.kind() != NodeKind::EnumDeclaration {
                continue;
            }
            let Some(name) = node.field("name") else {
                continue;
            };
            let ambient = has_ancestor(node, NodeKind::AmbientDeclaration);
            grouped
                .entry(name.text().to_owned())
                .or_default()
                .push((node, ambient));
        }

        let enums = grouped
            .into_iter()
            .map(|(name, declarations)| (name, describe(&declarations)))
            .collect();
        Self { enums }
    }

    /// Look up an enum by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&EnumInfo> {
        self.enums.get(name)
    }
}

fn has_ancestor(node: SyntaxNode<'_>, kind: NodeKind) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        if parent.kind() == kind {
            return true;
        }
        current = parent.parent();
    }
    false
}

fn members_of(declaration: SyntaxNode<'_>) -> Vec<RawMember<'_>> {
    let Some(body) = declaration.field("body") else {
        return Vec::new();
    };
    body.named_children()
        .into_iter()
        .filter_map(|member| match member.kind() {
            NodeKind::EnumAssignment => member.field("name").map(|name| RawMember {
                name: member_name(name),
                initializer: member.field("value"),
            }),
            NodeKind::PropertyIdentifier | NodeKind::String | NodeKind::Number => Some(RawMember {
                name: member_name(member),
                initializer: None,
            }),
            _ => None,
        })
        .collect()
}

fn member_name(node: SyntaxNode<'_>) -> String {
    let text = node.text();
    if node.kind() == NodeKind::String {
        text.get(1..text.len().saturating_sub(1)).unwrap_or(text).to_owned()
    } else {
        text.to_owned()
    }
}

fn describe(declarations: &[(SyntaxNode<'_>, bool)]) -> EnumInfo {
    let exported = declarations.iter().any(|(decl, _)| {
        decl.parent()
            .is_some_and(|p| p.kind() == NodeKind::ExportStatement)
    });
    let per_declaration: Vec<(Vec<RawMember<'_>>, bool)> = declarations
        .iter()
        .map(|(decl, ambient)| (members_of(*decl), *ambient))
        .collect();
    let members: Vec<String> = per_declaration
        .iter()
        .flat_map(|(members, _)| members.iter().map(|m| m.name.clone()))
        .collect();

    let mut literal = true;
    'outer: for (raw_members, ambient) in &per_declaration {
        for member in raw_members {
            if member.initializer.is_some_and(is_string_like) {
                literal = true;
                break 'outer;
            }
            if !is_literal_member(member, *ambient, &members) {
                literal = false;
            }
        }
    }

    EnumInfo {
        members,
        literal,
        exported,
    }
}

fn is_string_like(node: SyntaxNode<'_>) -> bool {
    match node.kind() {
        NodeKind::String => true,
        NodeKind::TemplateString => !node
            .named_children()
            .iter()
            .any(|c| c.kind() == NodeKind::TemplateSubstitution),
        _ => false,
    }
}

fn is_literal_member(member: &RawMember<'_>, ambient: bool, siblings: &[String]) -> bool {
    let Some(init) = member.initializer else {
        return !ambient;
    };
    match init.kind() {
        NodeKind::String | NodeKind::Number => true,
        NodeKind::TemplateString => is_string_like(init),
        NodeKind::UnaryExpression => {
            init.unary_operator() == Some("-")
                && init
                    .field("argument")
                    .is_some_and(|arg| arg.kind() == NodeKind::Number)
        }
        NodeKind::Identifier => siblings.iter().any(|s| s == init.text()),
        _ => false,
    }
}
