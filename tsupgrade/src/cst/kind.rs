//! Typed node kinds for the subset of the TypeScript grammar the rewriter inspects.

/// Kind of a syntax node.
///
/// Tree-sitter exposes kinds as strings; they are mapped once into this enum so
/// that detectors can `match` on them. Kinds the rewriter never looks at
/// collapse into [`NodeKind::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Root of a source file.
    Program,
    /// `expr;`
    ExpressionStatement,
    /// `import ... from "m";`
    ImportStatement,
    /// Bindings of an import statement.
    ImportClause,
    /// `* as ns`
    NamespaceImport,
    /// `{ a, b as c }` in an import.
    NamedImports,
    /// `a` or `a as b` inside named imports.
    ImportSpecifier,
    /// `export ...`
    ExportStatement,
    /// `{ a, b as c }` in an export.
    ExportClause,
    /// `a` or `a as b` inside an export clause.
    ExportSpecifier,
    /// `* as ns` in an export.
    NamespaceExport,
    /// `cond ? a : b`
    TernaryExpression,
    /// `a op b`
    BinaryExpression,
    /// `op a`
    UnaryExpression,
    /// `(a)`
    ParenthesizedExpression,
    /// `a.b` / `a?.b`
    MemberExpression,
    /// `a[b]` / `a?.[b]`
    SubscriptExpression,
    /// `f(x)` / `f?.(x)`
    CallExpression,
    /// `new C()`
    NewExpression,
    /// `expr as T`
    AsExpression,
    /// `expr satisfies T`
    SatisfiesExpression,
    /// `expr!`
    NonNullExpression,
    /// The `?.` token.
    OptionalChain,
    /// `a = b`
    AssignmentExpression,
    /// `a += b`
    AugmentedAssignmentExpression,
    /// `(x) => y`
    ArrowFunction,
    /// `yield x`
    YieldExpression,
    /// `a, b`
    SequenceExpression,
    /// Plain identifier in expression position.
    Identifier,
    /// Property name after `.`.
    PropertyIdentifier,
    /// `#name`
    PrivatePropertyIdentifier,
    /// `{ a }` shorthand in an object literal.
    ShorthandPropertyIdentifier,
    /// `{ a }` shorthand in a destructuring pattern.
    ShorthandPropertyIdentifierPattern,
    /// Identifier in type position.
    TypeIdentifier,
    /// `"..."` / `'...'`
    String,
    /// `` `...` ``
    TemplateString,
    /// `${...}` inside a template string.
    TemplateSubstitution,
    /// Numeric or bigint literal.
    Number,
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,
    /// `undefined`
    Undefined,
    /// `[a, b]`
    Array,
    /// `{ a: b }`
    Object,
    /// `key: value` inside an object literal.
    Pair,
    /// `...x`
    SpreadElement,
    /// Argument list of a call.
    Arguments,
    /// `<T>` in a call or generic type.
    TypeArguments,
    /// `enum E { ... }`
    EnumDeclaration,
    /// Body of an enum declaration.
    EnumBody,
    /// `A = value` inside an enum body.
    EnumAssignment,
    /// `declare ...`
    AmbientDeclaration,
    /// Literal in type position (`"a"`, `1`, `-1`, `true`, ...).
    LiteralType,
    /// `[A, B]` in type position.
    TupleType,
    /// `T[]`
    ArrayType,
    /// `readonly T`
    ReadonlyType,
    /// `{ a: T }` in type position.
    ObjectType,
    /// `a: T` inside an object type.
    PropertySignature,
    /// `: T`
    TypeAnnotation,
    /// `number`, `string`, ...
    PredefinedType,
    /// `A.B` in type position.
    NestedTypeIdentifier,
    /// `(T)`
    ParenthesizedType,
    /// `Array<T>`
    GenericType,
    /// `asserts x` / `asserts x is T`
    Asserts,
    /// Tree-sitter error recovery node.
    Error,
    /// Any other kind.
    Other,
}

impl NodeKind {
    /// Map a tree-sitter kind string onto a [`NodeKind`].
    #[must_use]
    pub fn from_ts_kind(kind: &str) -> Self {
        match kind {
            "program" => Self::Program,
            "expression_statement" => Self::ExpressionStatement,
            "import_statement" => Self::ImportStatement,
            "import_clause" => Self::ImportClause,
            "namespace_import" => Self::NamespaceImport,
            "named_imports" => Self::NamedImports,
            "import_specifier" => Self::ImportSpecifier,
            "export_statement" => Self::ExportStatement,
            "export_clause" => Self::ExportClause,
            "export_specifier" => Self::ExportSpecifier,
            "namespace_export" => Self::NamespaceExport,
            "ternary_expression" => Self::TernaryExpression,
            "binary_expression" => Self::BinaryExpression,
            "unary_expression" => Self::UnaryExpression,
            "parenthesized_expression" => Self::ParenthesizedExpression,
            "member_expression" => Self::MemberExpression,
            "subscript_expression" => Self::SubscriptExpression,
            "call_expression" => Self::CallExpression,
            "new_expression" => Self::NewExpression,
            "as_expression" => Self::AsExpression,
            "satisfies_expression" => Self::SatisfiesExpression,
            "non_null_expression" => Self::NonNullExpression,
            "optional_chain" => Self::OptionalChain,
            "assignment_expression" => Self::AssignmentExpression,
            "augmented_assignment_expression" => Self::AugmentedAssignmentExpression,
            "arrow_function" => Self::ArrowFunction,
            "yield_expression" => Self::YieldExpression,
            "sequence_expression" => Self::SequenceExpression,
            "identifier" => Self::Identifier,
            "property_identifier" => Self::PropertyIdentifier,
            "private_property_identifier" => Self::PrivatePropertyIdentifier,
            "shorthand_property_identifier" => Self::ShorthandPropertyIdentifier,
            "shorthand_property_identifier_pattern" => Self::ShorthandPropertyIdentifierPattern,
            "type_identifier" => Self::TypeIdentifier,
            "string" => Self::String,
            "template_string" => Self::TemplateString,
            "template_substitution" => Self::TemplateSubstitution,
            "number" => Self::Number,
            "true" => Self::True,
            "false" => Self::False,
            "null" => Self::Null,
            "undefined" => Self::Undefined,
            "array" => Self::Array,
            "object" => Self::Object,
            "pair" => Self::Pair,
            "spread_element" => Self::SpreadElement,
            "arguments" => Self::Arguments,
            "type_arguments" => Self::TypeArguments,
            "enum_declaration" => Self::EnumDeclaration,
            "enum_body" => Self::EnumBody,
            "enum_assignment" => Self::EnumAssignment,
            "ambient_declaration" => Self::AmbientDeclaration,
            "literal_type" => Self::LiteralType,
            "tuple_type" => Self::TupleType,
            "array_type" => Self::ArrayType,
            "readonly_type" => Self::ReadonlyType,
            "object_type" => Self::ObjectType,
            "property_signature" => Self::PropertySignature,
            "type_annotation" => Self::TypeAnnotation,
            "predefined_type" => Self::PredefinedType,
            "nested_type_identifier" => Self::NestedTypeIdentifier,
            "parenthesized_type" => Self::ParenthesizedType,
            "generic_type" => Self::GenericType,
            "asserts" => Self::Asserts,
            "ERROR" => Self::Error,
            _ => Self::Other,
        }
    }

    /// Whether an expression of this kind binds looser than (or as loose as) `??`,
    /// i.e. needs parentheses to appear as an operand of `??`.
    ///
    /// Logical binary operators are handled by [`BinaryOperator::is_logical`].
    #[must_use]
    pub fn binds_looser_than_coalesce(self) -> bool {
        matches!(
            self,
            Self::TernaryExpression
                | Self::AssignmentExpression
                | Self::AugmentedAssignmentExpression
                | Self::ArrowFunction
                | Self::YieldExpression
                | Self::SequenceExpression
        )
    }
}

/// Operator of a `binary_expression`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    /// `==`
    LooseEq,
    /// `!=`
    LooseNe,
    /// `===`
    StrictEq,
    /// `!==`
    StrictNe,
    /// `&&`
    And,
    /// `||`
    Or,
    /// `??`
    Coalesce,
    /// Arithmetic, bitwise, relational, `in`, `instanceof`.
    Other,
}

impl BinaryOperator {
    /// Map the text of an operator token.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        match token {
            "==" => Self::LooseEq,
            "!=" => Self::LooseNe,
            "===" => Self::StrictEq,
            "!==" => Self::StrictNe,
            "&&" => Self::And,
            "||" => Self::Or,
            "??" => Self::Coalesce,
            _ => Self::Other,
        }
    }

    /// `&&`, `||` and `??` cannot be mixed with `??` without parentheses.
    #[must_use]
    pub const fn is_logical(self) -> bool {
        matches!(self, Self::And | Self::Or | Self::Coalesce)
    }
}
