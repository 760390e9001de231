//! Member descriptors: parameters, function signatures, property storage.

use std::fmt;

use morph_ast::SwiftType;

/// One parameter of a function or constructor.
///
/// `label` is the external argument label; `_` means unlabeled.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParameterSignature {
    pub label: String,
    pub name: String,
    pub ty: SwiftType,
}

impl ParameterSignature {
    pub fn new(label: impl Into<String>, name: impl Into<String>, ty: SwiftType) -> Self {
        Self {
            label: label.into(),
            name: name.into(),
            ty,
        }
    }

    pub fn unlabeled(name: impl Into<String>, ty: SwiftType) -> Self {
        Self::new("_", name, ty)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionSignature {
    pub name: String,
    pub parameters: Vec<ParameterSignature>,
    pub return_type: SwiftType,
    pub is_static: bool,
}

impl FunctionSignature {
    pub fn new(name: impl Into<String>, parameters: Vec<ParameterSignature>, return_type: SwiftType) -> Self {
        Self {
            name: name.into(),
            parameters,
            return_type,
            is_static: false,
        }
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    /// `name(label:label:)`, e.g. `setObject(_:forKey:)`.
    pub fn selector(&self) -> String {
        let mut selector = format!("{}(", self.name);
        for param in &self.parameters {
            selector.push_str(&param.label);
            selector.push(':');
        }
        selector.push(')');
        selector
    }
}

impl fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_static {
            write!(f, "static ")?;
        }
        write!(f, "func {}(", self.name)?;
        for (i, param) in self.parameters.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            if param.label == param.name {
                write!(f, "{}: {}", param.name, param.ty)?;
            } else {
                write!(f, "{} {}: {}", param.label, param.name, param.ty)?;
            }
        }
        write!(f, ")")?;
        if self.return_type != SwiftType::void() {
            write!(f, " -> {}", self.return_type)?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Ownership {
    #[default]
    Strong,
    Weak,
    UnownedSafe,
    UnownedUnsafe,
}

/// How a property or variable holds its value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ValueStorage {
    pub ty: SwiftType,
    pub ownership: Ownership,
    /// `let` rather than `var`.
    pub is_constant: bool,
}

impl ValueStorage {
    pub fn variable(ty: SwiftType) -> Self {
        Self {
            ty,
            ownership: Ownership::Strong,
            is_constant: false,
        }
    }

    pub fn constant(ty: SwiftType) -> Self {
        Self {
            ty,
            ownership: Ownership::Strong,
            is_constant: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KnownProperty {
    pub name: String,
    pub storage: ValueStorage,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct KnownConstructor {
    pub parameters: Vec<ParameterSignature>,
}
