//! Type representation for emitted Swift code.
//!
//! `SwiftType` is what intentions, known types and resolved expressions are
//! typed with. Names are kept as written (`CInt`, `NSString`); there is no
//! interning and no inference state.

use std::fmt;

/// A Swift type.
///
/// - `TypeName`: a nominal type (`Int`, `NSObject`)
/// - `Generic`: a nominal type applied to arguments (`Set<Int>`)
/// - `Optional` / `ImplicitlyUnwrapped`: `T?` / `T!`
/// - `Array` / `Dictionary`: `[T]` / `[K: V]`
/// - `ProtocolComposition`: `A & B`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SwiftType {
    TypeName(String),
    Generic {
        name: String,
        parameters: Vec<SwiftType>,
    },
    Optional(Box<SwiftType>),
    ImplicitlyUnwrapped(Box<SwiftType>),
    Array(Box<SwiftType>),
    Dictionary {
        key: Box<SwiftType>,
        value: Box<SwiftType>,
    },
    ProtocolComposition(Vec<SwiftType>),
}

impl SwiftType {
    pub fn type_name(name: impl Into<String>) -> SwiftType {
        SwiftType::TypeName(name.into())
    }

    pub fn int() -> SwiftType {
        SwiftType::type_name("Int")
    }

    pub fn double() -> SwiftType {
        SwiftType::type_name("Double")
    }

    pub fn bool() -> SwiftType {
        SwiftType::type_name("Bool")
    }

    pub fn string() -> SwiftType {
        SwiftType::type_name("String")
    }

    pub fn void() -> SwiftType {
        SwiftType::type_name("Void")
    }

    pub fn any_object() -> SwiftType {
        SwiftType::type_name("AnyObject")
    }

    /// `T?`
    pub fn optional(inner: SwiftType) -> SwiftType {
        SwiftType::Optional(Box::new(inner))
    }

    /// `T!`
    pub fn implicitly_unwrapped(inner: SwiftType) -> SwiftType {
        SwiftType::ImplicitlyUnwrapped(Box::new(inner))
    }

    pub fn array(element: SwiftType) -> SwiftType {
        SwiftType::Array(Box::new(element))
    }

    pub fn dictionary(key: SwiftType, value: SwiftType) -> SwiftType {
        SwiftType::Dictionary {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn generic(name: impl Into<String>, parameters: Vec<SwiftType>) -> SwiftType {
        SwiftType::Generic {
            name: name.into(),
            parameters,
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, SwiftType::Optional(_) | SwiftType::ImplicitlyUnwrapped(_))
    }

    /// Strip every level of optionality.
    pub fn deep_unwrapped(&self) -> &SwiftType {
        match self {
            SwiftType::Optional(inner) | SwiftType::ImplicitlyUnwrapped(inner) => inner.deep_unwrapped(),
            other => other,
        }
    }

    /// The nominal name, if this is a plain or generic nominal type.
    pub fn nominal_name(&self) -> Option<&str> {
        match self {
            SwiftType::TypeName(name) | SwiftType::Generic { name, .. } => Some(name),
            _ => None,
        }
    }
}

impl From<&str> for SwiftType {
    fn from(name: &str) -> Self {
        SwiftType::type_name(name)
    }
}

impl fmt::Display for SwiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwiftType::TypeName(name) => write!(f, "{name}"),
            SwiftType::Generic { name, parameters } => {
                write!(f, "{name}<")?;
                for (i, param) in parameters.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{param}")?;
                }
                write!(f, ">")
            }
            SwiftType::Optional(inner) => write_wrapped(f, inner, "?"),
            SwiftType::ImplicitlyUnwrapped(inner) => write_wrapped(f, inner, "!"),
            SwiftType::Array(element) => write!(f, "[{element}]"),
            SwiftType::Dictionary { key, value } => write!(f, "[{key}: {value}]"),
            SwiftType::ProtocolComposition(types) => {
                for (i, ty) in types.iter().enumerate() {
                    if i > 0 {
                        write!(f, " & ")?;
                    }
                    write!(f, "{ty}")?;
                }
                Ok(())
            }
        }
    }
}

/// `A & B` needs parentheses before a `?`/`!` suffix.
fn write_wrapped(f: &mut fmt::Formatter<'_>, inner: &SwiftType, suffix: &str) -> fmt::Result {
    if matches!(inner, SwiftType::ProtocolComposition(_)) {
        write!(f, "({inner}){suffix}")
    } else {
        write!(f, "{inner}{suffix}")
    }
}
