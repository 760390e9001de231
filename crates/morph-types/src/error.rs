//! Errors raised while registering types.

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeSystemError {
    /// A type with this name is already registered.
    DuplicateType(String),
    /// Registering the type would make its supertype chain loop back to
    /// itself. `chain` lists the names walked, starting at the new type.
    SupertypeCycle { type_name: String, chain: Vec<String> },
}

impl fmt::Display for TypeSystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSystemError::DuplicateType(name) => {
                write!(f, "type `{}` is already registered", name)
            }
            TypeSystemError::SupertypeCycle { type_name, chain } => {
                write!(
                    f,
                    "supertype chain of `{}` forms a cycle: {}",
                    type_name,
                    chain.join(" -> ")
                )
            }
        }
    }
}

impl std::error::Error for TypeSystemError {}
