//! Structural type model produced by the checker.
//!
//! Only the shapes needed to decide whether an explicit literal assertion can
//! be replaced by `as const` are modelled; everything else is carried as
//! [`Type::Named`] (type positions) or [`Type::Unresolved`] (expressions).

use std::fmt::{self, Write as _};

/// Built-in keyword types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// `any`
    Any,
    /// `unknown`
    Unknown,
    /// `never`
    Never,
    /// `void`
    Void,
    /// `string`
    String,
    /// `number`
    Number,
    /// `bigint`
    BigInt,
    /// `boolean`
    Boolean,
    /// `symbol`
    Symbol,
    /// `object`
    Object,
}

impl Primitive {
    /// Keyword spelling.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Unknown => "unknown",
            Self::Never => "never",
            Self::Void => "void",
            Self::String => "string",
            Self::Number => "number",
            Self::BigInt => "bigint",
            Self::Boolean => "boolean",
            Self::Symbol => "symbol",
            Self::Object => "object",
        }
    }

    /// Parse a keyword.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "any" => Self::Any,
            "unknown" => Self::Unknown,
            "never" => Self::Never,
            "void" => Self::Void,
            "string" => Self::String,
            "number" => Self::Number,
            "bigint" => Self::BigInt,
            "boolean" => Self::Boolean,
            "symbol" => Self::Symbol,
            "object" => Self::Object,
            _ => return None,
        })
    }
}

/// A property of an object type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Rendered property name.
    pub name: String,
    /// Property type.
    pub ty: Type,
    /// Whether the property is `readonly`.
    pub readonly: bool,
}

/// A type as seen by the checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    /// `true` / `false`
    Boolean(bool),
    /// String literal type; holds the unquoted contents.
    String(String),
    /// Numeric literal type in normalised decimal form.
    Number(String),
    /// Bigint literal type, digits only.
    BigInt(String),
    /// `null`
    Null,
    /// `undefined`
    Undefined,
    /// Keyword type.
    Primitive(Primitive),
    /// `[A, B]` / `readonly [A, B]`
    Tuple {
        /// Element types.
        elements: Vec<Type>,
        /// `readonly` modifier.
        readonly: bool,
    },
    /// `T[]` / `readonly T[]`
    Array {
        /// Element type.
        element: Box<Type>,
        /// `readonly` modifier.
        readonly: bool,
    },
    /// `{ a: T; }`
    Object {
        /// Properties in declaration order.
        members: Vec<Member>,
    },
    /// Literal enum member type `E.m`.
    EnumMember {
        /// Enum name.
        enumeration: String,
        /// Member name.
        member: String,
    },
    /// The enum type `E` itself.
    Enum(String),
    /// A type reference the checker does not model; compared by text.
    Named(String),
    /// Expression whose type could not be determined.
    Unresolved,
}

impl Type {
    /// Whether this type or any type nested in it is [`Type::Unresolved`].
    #[must_use]
    pub fn is_unresolved(&self) -> bool {
        match self {
            Self::Unresolved => true,
            Self::Tuple { elements, .. } => elements.iter().any(Self::is_unresolved),
            Self::Array { element, .. } => element.is_unresolved(),
            Self::Object { members } => members.iter().any(|m| m.ty.is_unresolved()),
            _ => false,
        }
    }

    /// The `readonly` form of an array-like type; other types are returned unchanged.
    #[must_use]
    pub fn into_readonly(self) -> Self {
        match self {
            Self::Tuple { elements, .. } => Self::Tuple {
                elements,
                readonly: true,
            },
            Self::Array { element, .. } => Self::Array {
                element,
                readonly: true,
            },
            other => other,
        }
    }

    /// Whether a value of type `self` can be assigned to `target`.
    #[must_use]
    pub fn is_assignable_to(&self, target: &Self) -> bool {
        if self.is_unresolved() || target.is_unresolved() {
            return false;
        }
        if self == target {
            return true;
        }
        match (self, target) {
            (Self::Primitive(Primitive::Any), _)
            | (_, Self::Primitive(Primitive::Any | Primitive::Unknown)) => true,
            (Self::Primitive(Primitive::Never), _) => true,
            (Self::String(_), Self::Primitive(Primitive::String))
            | (Self::Number(_), Self::Primitive(Primitive::Number))
            | (Self::BigInt(_), Self::Primitive(Primitive::BigInt))
            | (Self::Boolean(_), Self::Primitive(Primitive::Boolean)) => true,
            (
                Self::Tuple {
                    elements: from,
                    readonly: from_ro,
                },
                Self::Tuple {
                    elements: to,
                    readonly: to_ro,
                },
            ) => {
                readonly_compatible(*from_ro, *to_ro)
                    && from.len() == to.len()
                    && from.iter().zip(to).all(|(f, t)| f.is_assignable_to(t))
            }
            (
                Self::Tuple {
                    elements: from,
                    readonly: from_ro,
                },
                Self::Array {
                    element: to,
                    readonly: to_ro,
                },
            ) => readonly_compatible(*from_ro, *to_ro) && from.iter().all(|f| f.is_assignable_to(to)),
            (
                Self::Array {
                    element: from,
                    readonly: from_ro,
                },
                Self::Array {
                    element: to,
                    readonly: to_ro,
                },
            ) => readonly_compatible(*from_ro, *to_ro) && from.is_assignable_to(to),
            (Self::Object { members: from }, Self::Object { members: to }) => to.iter().all(|want| {
                from.iter()
                    .find(|have| have.name == want.name)
                    .is_some_and(|have| have.ty.is_assignable_to(&want.ty))
            }),
            (Self::Object { .. } | Self::Tuple { .. } | Self::Array { .. }, Self::Primitive(Primitive::Object)) => true,
            (Self::EnumMember { enumeration, .. }, Self::Enum(name)) => enumeration == name,
            _ => false,
        }
    }
}

/// A mutable array can be used where a readonly one is expected, not vice versa.
const fn readonly_compatible(from_readonly: bool, to_readonly: bool) -> bool {
    !from_readonly || to_readonly
}

fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// Render a property name the way type listings print it.
#[must_use]
pub fn property_name(raw: &str) -> String {
    if is_identifier_name(raw) || raw.parse::<f64>().is_ok() {
        raw.to_owned()
    } else {
        format!("\"{raw}\"")
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(value) => write!(f, "{value}"),
            Self::String(value) => write!(f, "\"{value}\""),
            Self::Number(value) | Self::Named(value) | Self::Enum(value) => f.write_str(value),
            Self::BigInt(value) => write!(f, "{value}n"),
            Self::Null => f.write_str("null"),
            Self::Undefined => f.write_str("undefined"),
            Self::Primitive(p) => f.write_str(p.keyword()),
            // Error types print as `any`.
            Self::Unresolved => f.write_str("any"),
            Self::Tuple { elements, readonly } => {
                if *readonly {
                    f.write_str("readonly ")?;
                }
                f.write_char('[')?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{element}")?;
                }
                f.write_char(']')
            }
            Self::Array { element, readonly } => {
                if *readonly {
                    f.write_str("readonly ")?;
                }
                write!(f, "{element}[]")
            }
            Self::Object { members } => {
                if members.is_empty() {
                    return f.write_str("{}");
                }
                f.write_str("{ ")?;
                for member in members {
                    if member.readonly {
                        f.write_str("readonly ")?;
                    }
                    write!(f, "{}: {}; ", member.name, member.ty)?;
                }
                f.write_char('}')
            }
            Self::EnumMember {
                enumeration,
                member,
            } => write!(f, "{enumeration}.{member}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuple(elements: Vec<Type>, readonly: bool) -> Type {
        Type::Tuple { elements, readonly }
    }

    #[test]
    fn test_render_literals() {
        assert_eq!(Type::String("foo".into()).to_string(), "\"foo\"");
        assert_eq!(Type::BigInt("10".into()).to_string(), "10n");
        assert_eq!(
            tuple(vec![Type::Number("1".into()), Type::Number("2".into())], true).to_string(),
            "readonly [1, 2]"
        );
    }

    #[test]
    fn test_render_object() {
        let object = Type::Object {
            members: vec![Member {
                name: "a".into(),
                ty: Type::String("123".into()),
                readonly: true,
            }],
        };
        assert_eq!(object.to_string(), "{ readonly a: \"123\"; }");
    }

    #[test]
    fn test_mutable_tuple_assignable_to_readonly() {
        let one = || Type::Number("1".into());
        assert!(tuple(vec![one()], false).is_assignable_to(&tuple(vec![one()], true)));
        assert!(!tuple(vec![one()], true).is_assignable_to(&tuple(vec![one()], false)));
    }

    #[test]
    fn test_widened_element_not_assignable_to_literal() {
        let wide = tuple(vec![Type::Primitive(Primitive::Number)], false);
        let narrow = tuple(vec![Type::Number("1".into())], true);
        assert!(!wide.is_assignable_to(&narrow));
        assert!(narrow.is_assignable_to(&Type::Array {
            element: Box::new(Type::Primitive(Primitive::Number)),
            readonly: true,
        }));
    }

    #[test]
    fn test_unresolved_never_assignable() {
        assert!(!Type::Unresolved.is_assignable_to(&Type::Unresolved));
        assert!(!Type::Primitive(Primitive::Any).is_assignable_to(&tuple(vec![Type::Unresolved], true)));
    }

    #[test]
    fn test_property_names() {
        assert_eq!(property_name("a"), "a");
        assert_eq!(property_name("a-b"), "\"a-b\"");
        assert_eq!(property_name("1"), "1");
    }
}
