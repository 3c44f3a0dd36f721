//! Syntax-driven checker over one file of an immutable program snapshot.

use super::enums::{EnumInfo, EnumTable};
use super::types::{property_name, Member, Primitive, Type};
use super::{CheckError, TypeChecker};
use crate::cst::{NodeKind, Span, SyntaxNode, SyntaxTree};
use crate::utils::paths::normalize_lexically;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// Read-only view of every file of a project at the start of one pass.
///
/// Rebuilt (never mutated) between passes so that all files of a pass are
/// checked against the same state.
#[derive(Debug, Default)]
pub struct ProgramSnapshot {
    files: FxHashMap<PathBuf, EnumTable>,
}

impl ProgramSnapshot {
    /// Parse every file and record its enums. Files that fail to parse
    /// contribute nothing; their own pass reports the error.
    #[must_use]
    pub fn build<P, S>(files: &[(P, S)]) -> Self
    where
        P: AsRef<Path> + Sync,
        S: AsRef<str> + Sync,
    {
        let files = files
            .par_iter()
            .map(|(path, text)| {
                let enums = SyntaxTree::parse_path(path.as_ref(), text.as_ref())
                    .map(|tree| EnumTable::from_tree(&tree))
                    .unwrap_or_default();
                (normalize_lexically(path.as_ref()), enums)
            })
            .collect();
        Self { files }
    }

    /// Resolve a relative module specifier written in `from` to a snapshot file.
    #[must_use]
    pub fn resolve_module(&self, from: &Path, specifier: &str) -> Option<&EnumTable> {
        if !specifier.starts_with('.') {
            return None;
        }
        let base = normalize_lexically(&from.parent().unwrap_or(Path::new("")).join(specifier));
        module_candidates(&base)
            .into_iter()
            .find_map(|candidate| self.files.get(&candidate))
    }
}

fn module_candidates(base: &Path) -> Vec<PathBuf> {
    let mut candidates = Vec::with_capacity(5);
    match base.extension().and_then(|e| e.to_str()) {
        Some("js") => {
            candidates.push(base.with_extension("ts"));
            candidates.push(base.with_extension("tsx"));
        }
        Some("mjs") => candidates.push(base.with_extension("mts")),
        Some("cjs") => candidates.push(base.with_extension("cts")),
        Some("ts" | "tsx" | "mts" | "cts") => candidates.push(base.to_path_buf()),
        _ => {
            let text = base.as_os_str().to_string_lossy();
            candidates.push(PathBuf::from(format!("{text}.ts")));
            candidates.push(PathBuf::from(format!("{text}.tsx")));
            candidates.push(base.join("index.ts"));
            candidates.push(base.join("index.tsx"));
        }
    }
    candidates
}

/// [`TypeChecker`] for a single parsed file.
pub struct ProgramChecker<'a> {
    tree: &'a SyntaxTree,
    local: EnumTable,
    imported: FxHashMap<String, EnumInfo>,
    narrowing: RefCell<Vec<Span>>,
}

impl<'a> ProgramChecker<'a> {
    /// Checker for a standalone source text.
    #[must_use]
    pub fn new(tree: &'a SyntaxTree) -> Self {
        Self {
            tree,
            local: EnumTable::from_tree(tree),
            imported: FxHashMap::default(),
            narrowing: RefCell::new(Vec::new()),
        }
    }

    /// Checker for `path`, resolving named imports against `snapshot`.
    #[must_use]
    pub fn with_snapshot(tree: &'a SyntaxTree, path: &Path, snapshot: &ProgramSnapshot) -> Self {
        let mut checker = Self::new(tree);
        checker.imported = imported_enums(tree, path, snapshot);
        checker
    }

    fn enum_info(&self, name: &str) -> Option<&EnumInfo> {
        self.local.get(name).or_else(|| self.imported.get(name))
    }

    fn ensure_local(&self, node: SyntaxNode<'_>) -> Result<(), CheckError> {
        if std::ptr::eq(node.source(), self.tree.source()) {
            Ok(())
        } else {
            Err(CheckError::ForeignNode { span: node.span() })
        }
    }

    fn is_narrowed(&self, node: SyntaxNode<'_>) -> bool {
        let span = node.span();
        self.narrowing.borrow().iter().any(|s| s.contains(span))
    }

    fn enum_member(&self, object: SyntaxNode<'_>, member: &str) -> Option<Type> {
        if object.kind() != NodeKind::Identifier {
            return None;
        }
        let info = self.enum_info(object.text())?;
        (info.literal && info.has_member(member)).then(|| Type::EnumMember {
            enumeration: object.text().to_owned(),
            member: member.to_owned(),
        })
    }

    fn expression_type(&self, node: SyntaxNode<'_>, narrowed: bool) -> Type {
        match node.kind() {
            NodeKind::String => Type::String(unquote(node.text()).to_owned()),
            NodeKind::TemplateString => {
                if node
                    .named_children()
                    .iter()
                    .any(|c| c.kind() == NodeKind::TemplateSubstitution)
                {
                    Type::Primitive(Primitive::String)
                } else {
                    Type::String(unquote(node.text()).to_owned())
                }
            }
            NodeKind::Number => number_type(node.text(), false),
            NodeKind::True => Type::Boolean(true),
            NodeKind::False => Type::Boolean(false),
            NodeKind::Null => Type::Null,
            NodeKind::Undefined => Type::Undefined,
            NodeKind::UnaryExpression => unary_type(node),
            NodeKind::ParenthesizedExpression | NodeKind::SatisfiesExpression | NodeKind::NonNullExpression => node
                .first_named_child()
                .map_or(Type::Unresolved, |inner| self.expression_type(inner, narrowed)),
            NodeKind::Array => {
                let elements = node
                    .named_children()
                    .into_iter()
                    .map(|element| match element.kind() {
                        NodeKind::SpreadElement => Type::Unresolved,
                        _ => self.expression_type(element, narrowed),
                    })
                    .collect();
                Type::Tuple {
                    elements,
                    readonly: narrowed,
                }
            }
            NodeKind::Object => self.object_type(node, narrowed),
            NodeKind::MemberExpression => node
                .field("object")
                .zip(node.field("property"))
                .filter(|(_, property)| property.kind() == NodeKind::PropertyIdentifier)
                .and_then(|(object, property)| self.enum_member(object, property.text()))
                .unwrap_or(Type::Unresolved),
            NodeKind::SubscriptExpression => node
                .field("object")
                .zip(node.field("index"))
                .filter(|(_, index)| index.kind() == NodeKind::String)
                .and_then(|(object, index)| self.enum_member(object, unquote(index.text())))
                .unwrap_or(Type::Unresolved),
            NodeKind::AsExpression => {
                let children = node.named_children();
                match (children.first(), children.get(1)) {
                    (Some(operand), None) if node.has_token("const") => {
                        self.expression_type(*operand, true)
                    }
                    (Some(_), Some(ty)) => self
                        .type_from_type_node(*ty)
                        .unwrap_or(Type::Unresolved),
                    _ => Type::Unresolved,
                }
            }
            _ => Type::Unresolved,
        }
    }

    fn object_type(&self, node: SyntaxNode<'_>, narrowed: bool) -> Type {
        let members = node
            .named_children()
            .into_iter()
            .map(|child| {
                let resolved = (child.kind() == NodeKind::Pair)
                    .then(|| child.field("key").zip(child.field("value")))
                    .flatten()
                    .and_then(|(key, value)| {
                        key_name(key).map(|name| (name, self.expression_type(value, narrowed)))
                    });
                let (name, ty) = resolved.unwrap_or_else(|| (child.text().to_owned(), Type::Unresolved));
                Member {
                    name,
                    ty,
                    readonly: narrowed,
                }
            })
            .collect();
        Type::Object { members }
    }
}

impl TypeChecker for ProgramChecker<'_> {
    fn type_of(&self, node: SyntaxNode<'_>) -> Result<Type, CheckError> {
        self.ensure_local(node)?;
        Ok(self.expression_type(node, self.is_narrowed(node)))
    }

    fn type_from_type_node(&self, node: SyntaxNode<'_>) -> Result<Type, CheckError> {
        self.ensure_local(node)?;
        if !node.is_named() {
            return Err(CheckError::NotAType {
                kind: node.raw_kind(),
                span: node.span(),
            });
        }
        let inner = |n: SyntaxNode<'_>| -> Result<Type, CheckError> {
            n.first_named_child()
                .map_or(Ok(Type::Unresolved), |child| self.type_from_type_node(child))
        };
        Ok(match node.kind() {
            NodeKind::TypeAnnotation | NodeKind::ParenthesizedType => inner(node)?,
            NodeKind::LiteralType => node
                .first_named_child()
                .map_or(Type::Unresolved, |lit| self.expression_type(lit, false)),
            NodeKind::PredefinedType => match node.text() {
                "null" => Type::Null,
                "undefined" => Type::Undefined,
                keyword => Primitive::from_keyword(keyword)
                    .map_or_else(|| Type::Named(keyword.to_owned()), Type::Primitive),
            },
            NodeKind::Null => Type::Null,
            NodeKind::Undefined => Type::Undefined,
            NodeKind::TupleType => Type::Tuple {
                elements: node
                    .named_children()
                    .into_iter()
                    .map(|element| self.type_from_type_node(element))
                    .collect::<Result<_, _>>()?,
                readonly: false,
            },
            NodeKind::ArrayType => Type::Array {
                element: Box::new(inner(node)?),
                readonly: false,
            },
            NodeKind::ReadonlyType => inner(node)?.into_readonly(),
            NodeKind::ObjectType => self.object_type_node(node)?,
            NodeKind::GenericType => self.generic_type(node)?,
            NodeKind::TypeIdentifier => match self.enum_info(node.text()) {
                Some(_) => Type::Enum(node.text().to_owned()),
                None => Type::Named(node.text().to_owned()),
            },
            NodeKind::NestedTypeIdentifier => node
                .field("module")
                .zip(node.field("name"))
                .and_then(|(module, name)| self.enum_member(module, name.text()))
                .unwrap_or_else(|| Type::Named(collapse_whitespace(node.text()))),
            _ => Type::Named(collapse_whitespace(node.text())),
        })
    }

    fn with_narrowing<R>(&self, node: SyntaxNode<'_>, query: impl FnOnce(&Self) -> R) -> R {
        self.narrowing.borrow_mut().push(node.span());
        let _scope = NarrowingScope {
            stack: &self.narrowing,
        };
        query(self)
    }

    fn is_literal_enum(&self, name: &str) -> bool {
        self.enum_info(name).is_some_and(|info| info.literal)
    }

    fn find_references(&self, name: &str) -> Vec<Span> {
        self.tree
            .root()
            .descendants()
            .filter(|node| {
                matches!(
                    node.kind(),
                    NodeKind::Identifier
                        | NodeKind::TypeIdentifier
                        | NodeKind::ShorthandPropertyIdentifier
                        | NodeKind::ShorthandPropertyIdentifierPattern
                ) && node.text() == name
            })
            .map(|node| node.span())
            .collect()
    }
}

impl ProgramChecker<'_> {
    fn object_type_node(&self, node: SyntaxNode<'_>) -> Result<Type, CheckError> {
        let mut members = Vec::new();
        for child in node.named_children() {
            if child.kind() != NodeKind::PropertySignature {
                // Methods, index and call signatures are not modelled.
                return Ok(Type::Named(collapse_whitespace(node.text())));
            }
            let Some(name) = child.field("name").and_then(key_name) else {
                return Ok(Type::Named(collapse_whitespace(node.text())));
            };
            let ty = match child.field("type") {
                Some(annotation) => self.type_from_type_node(annotation)?,
                None => Type::Primitive(Primitive::Any),
            };
            members.push(Member {
                name,
                ty,
                readonly: child.has_token("readonly"),
            });
        }
        Ok(Type::Object { members })
    }

    fn generic_type(&self, node: SyntaxNode<'_>) -> Result<Type, CheckError> {
        let name = node.field("name").map(|n| n.text());
        let arguments = node
            .field("type_arguments")
            .map(|args| args.named_children())
            .unwrap_or_default();
        let readonly = match (name, arguments.as_slice()) {
            (Some("Array"), [_]) => false,
            (Some("ReadonlyArray"), [_]) => true,
            _ => return Ok(Type::Named(collapse_whitespace(node.text()))),
        };
        Ok(Type::Array {
            element: Box::new(self.type_from_type_node(arguments[0])?),
            readonly,
        })
    }
}

/// Pops the narrowing stack when dropped.
struct NarrowingScope<'c> {
    stack: &'c RefCell<Vec<Span>>,
}

impl Drop for NarrowingScope<'_> {
    fn drop(&mut self) {
        self.stack.borrow_mut().pop();
    }
}

fn imported_enums(tree: &SyntaxTree, path: &Path, snapshot: &ProgramSnapshot) -> FxHashMap<String, EnumInfo> {
    let mut imported = FxHashMap::default();
    for statement in tree.statements() {
        if statement.kind() != NodeKind::ImportStatement || statement.has_token("type") {
            continue;
        }
        let Some(source) = statement.field("source") else {
            continue;
        };
        let Some(table) = snapshot.resolve_module(path, unquote(source.text())) else {
            continue;
        };
        let specifiers = statement
            .named_children()
            .into_iter()
            .filter(|c| c.kind() == NodeKind::ImportClause)
            .flat_map(|clause| clause.named_children())
            .filter(|c| c.kind() == NodeKind::NamedImports)
            .flat_map(|named| named.named_children())
            .filter(|c| c.kind() == NodeKind::ImportSpecifier && !c.has_token("type"));
        for specifier in specifiers {
            let Some(name) = specifier.field("name") else {
                continue;
            };
            let local = specifier.field("alias").unwrap_or(name);
            if let Some(info) = table.get(name.text()).filter(|info| info.exported) {
                imported.insert(local.text().to_owned(), info.clone());
            }
        }
    }
    imported
}

/// Strip the surrounding quotes or backticks of a string literal.
pub(crate) fn unquote(text: &str) -> &str {
    let mut chars = text.chars();
    match (chars.next(), chars.next_back()) {
        (Some(open @ ('"' | '\'' | '`')), Some(close)) if open == close && text.len() >= 2 => &text[1..text.len() - 1],
        _ => text,
    }
}

fn key_name(key: SyntaxNode<'_>) -> Option<String> {
    match key.kind() {
        NodeKind::PropertyIdentifier | NodeKind::Identifier => Some(key.text().to_owned()),
        NodeKind::String => Some(property_name(unquote(key.text()))),
        NodeKind::Number => Some(normalize_number(key.text())),
        _ => None,
    }
}

fn unary_type(node: SyntaxNode<'_>) -> Type {
    let argument = node.field("argument");
    match (node.unary_operator(), argument) {
        (Some("-"), Some(arg)) if arg.kind() == NodeKind::Number => number_type(arg.text(), true),
        (Some("+"), Some(arg)) if arg.kind() == NodeKind::Number && !arg.text().ends_with('n') => {
            number_type(arg.text(), false)
        }
        (Some("!" | "delete"), _) => Type::Primitive(Primitive::Boolean),
        (Some("typeof"), _) => Type::Primitive(Primitive::String),
        (Some("void"), _) => Type::Undefined,
        _ => Type::Primitive(Primitive::Number),
    }
}

fn number_type(text: &str, negative: bool) -> Type {
    let sign = if negative { "-" } else { "" };
    match text.strip_suffix('n') {
        Some(digits) => Type::BigInt(format!("{sign}{}", digits.replace('_', ""))),
        None => {
            let value = normalize_number(text);
            if negative && value == "0" {
                Type::Number("0".to_owned())
            } else {
                Type::Number(format!("{sign}{value}"))
            }
        }
    }
}

/// Canonical decimal spelling of a numeric literal (`0x10` → `16`, `1.50` → `1.5`).
fn normalize_number(text: &str) -> String {
    let cleaned = text.replace('_', "");
    let lower = cleaned.to_ascii_lowercase();
    let parse_radix = |digits: &str, radix: u32| u64::from_str_radix(digits, radix).ok().map(|v| v as f64);
    let value = if let Some(hex) = lower.strip_prefix("0x") {
        parse_radix(hex, 16)
    } else if let Some(oct) = lower.strip_prefix("0o") {
        parse_radix(oct, 8)
    } else if let Some(bin) = lower.strip_prefix("0b") {
        parse_radix(bin, 2)
    } else {
        lower.parse::<f64>().ok()
    };
    match value {
        Some(v) if v.is_finite() && v.fract().abs() < f64::EPSILON && v.abs() < 1e21 => format!("{v:.0}"),
        Some(v) if v.is_finite() => format!("{v}"),
        _ => cleaned,
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
