//! Resolved, immutable views of nominal types.

use std::sync::Arc;

use crate::signature::{FunctionSignature, KnownConstructor, KnownProperty};

/// Reference to a supertype: either a name to be resolved through a type
/// system, or the resolved type itself. Both forms name the same entity.
#[derive(Clone, Debug, PartialEq)]
pub enum KnownSupertype {
    TypeName(String),
    Known(Arc<KnownType>),
}

impl KnownSupertype {
    pub fn name(&self) -> &str {
        match self {
            KnownSupertype::TypeName(name) => name,
            KnownSupertype::Known(ty) => &ty.type_name,
        }
    }
}

/// A nominal type with everything known about its members.
///
/// Built by [`crate::builder::KnownTypeBuilder`]; never mutated afterwards.
/// Property names are unique and methods are unique per selector.
#[derive(Clone, Debug, PartialEq)]
pub struct KnownType {
    pub type_name: String,
    pub supertype: Option<KnownSupertype>,
    pub protocols: Vec<String>,
    pub properties: Vec<KnownProperty>,
    pub constructors: Vec<KnownConstructor>,
    pub methods: Vec<FunctionSignature>,
}

impl KnownType {
    pub fn property(&self, name: &str) -> Option<&KnownProperty> {
        self.properties.iter().find(|prop| prop.name == name)
    }

    /// First method called `name` taking `arity` arguments.
    pub fn method(&self, name: &str, arity: usize) -> Option<&FunctionSignature> {
        self.methods
            .iter()
            .find(|method| method.name == name && method.arity() == arity)
    }

    pub fn conforms_to(&self, protocol: &str) -> bool {
        self.protocols.iter().any(|name| name == protocol)
    }

    pub fn supertype_name(&self) -> Option<&str> {
        self.supertype.as_ref().map(KnownSupertype::name)
    }
}
