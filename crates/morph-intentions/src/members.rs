//! Member intentions: properties, methods and initializers.

use morph_ast::SwiftType;
use morph_types::{FunctionSignature, ParameterSignature, ValueStorage};

use crate::history::IntentionHistory;
use crate::Provenance;

/// Attribute listed in an `@property (...)` declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PropertyAttribute {
    /// A bare attribute such as `nonatomic`, `copy`, `readonly`.
    Attribute(String),
    /// `getter=name`
    Getter(String),
    /// `setter=name:`
    Setter(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct PropertyIntention {
    pub name: String,
    pub storage: ValueStorage,
    pub attributes: Vec<PropertyAttribute>,
    /// Declared in an `@optional` protocol section.
    pub is_optional: bool,
    /// Set once accessor methods have been folded into this property.
    pub has_merged_accessors: bool,
    pub source: Option<Provenance>,
    pub history: IntentionHistory,
}

impl PropertyIntention {
    pub fn new(name: impl Into<String>, storage: ValueStorage) -> Self {
        Self {
            name: name.into(),
            storage,
            attributes: Vec::new(),
            is_optional: false,
            has_merged_accessors: false,
            source: None,
            history: IntentionHistory::new(),
        }
    }

    pub fn ty(&self) -> &SwiftType {
        &self.storage.ty
    }

    pub fn is_readonly(&self) -> bool {
        self.attributes
            .iter()
            .any(|attr| matches!(attr, PropertyAttribute::Attribute(name) if name == "readonly"))
    }

    pub fn is_class_property(&self) -> bool {
        self.attributes
            .iter()
            .any(|attr| matches!(attr, PropertyAttribute::Attribute(name) if name == "class"))
    }

    /// Name of the getter: `getter=` if given, else the property name.
    pub fn getter_name(&self) -> &str {
        self.attributes
            .iter()
            .find_map(|attr| match attr {
                PropertyAttribute::Getter(name) => Some(name.as_str()),
                _ => None,
            })
            .unwrap_or(self.name.as_str())
    }

    /// Name of the setter method without the trailing colon: `setter=` if
    /// given, else `set` followed by the capitalized property name.
    pub fn setter_name(&self) -> String {
        for attr in &self.attributes {
            if let PropertyAttribute::Setter(name) = attr {
                return name.trim_end_matches(':').to_string();
            }
        }
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => format!("set{}{}", first.to_uppercase(), chars.as_str()),
            None => "set".to_string(),
        }
    }

    /// `Owner.name: Type`
    pub fn describe(&self, owner: &str) -> String {
        format!("{}.{}: {}", owner, self.name, self.storage.ty)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MethodIntention {
    pub signature: FunctionSignature,
    pub is_optional: bool,
    pub source: Option<Provenance>,
    pub history: IntentionHistory,
}

impl MethodIntention {
    pub fn new(signature: FunctionSignature) -> Self {
        Self {
            signature,
            is_optional: false,
            source: None,
            history: IntentionHistory::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.signature.name
    }

    pub fn is_static(&self) -> bool {
        self.signature.is_static
    }

    /// `Owner.name(_ value: Bool) -> Int`
    pub fn describe(&self, owner: &str) -> String {
        format!("{}.{}", owner, describe_signature(&self.signature))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct InitIntention {
    pub parameters: Vec<ParameterSignature>,
    /// `init?`
    pub is_failable: bool,
    pub source: Option<Provenance>,
    pub history: IntentionHistory,
}

impl InitIntention {
    pub fn new(parameters: Vec<ParameterSignature>) -> Self {
        Self {
            parameters,
            is_failable: false,
            source: None,
            history: IntentionHistory::new(),
        }
    }
}

/// `name(label name: Type, ...) -> Return`, with `-> Void` omitted.
pub fn describe_signature(signature: &FunctionSignature) -> String {
    let params = signature
        .parameters
        .iter()
        .map(|param| {
            if param.label == param.name {
                format!("{}: {}", param.name, param.ty)
            } else {
                format!("{} {}: {}", param.label, param.name, param.ty)
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    let mut text = format!("{}({})", signature.name, params);
    if signature.return_type != SwiftType::void() {
        text.push_str(&format!(" -> {}", signature.return_type));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessor_names() {
        let mut prop = PropertyIntention::new("value", ValueStorage::variable(SwiftType::bool()));
        assert_eq!(prop.getter_name(), "value");
        assert_eq!(prop.setter_name(), "setValue");
        prop.attributes.push(PropertyAttribute::Getter("isValue".into()));
        prop.attributes.push(PropertyAttribute::Setter("updateValue:".into()));
        assert_eq!(prop.getter_name(), "isValue");
        assert_eq!(prop.setter_name(), "updateValue");
    }

    #[test]
    fn method_description() {
        let method = MethodIntention::new(FunctionSignature::new(
            "setValue",
            vec![ParameterSignature::unlabeled("value", SwiftType::bool())],
            SwiftType::void(),
        ));
        assert_eq!(method.describe("MyClass"), "MyClass.setValue(_ value: Bool)");
        let getter = MethodIntention::new(FunctionSignature::new("value", Vec::new(), SwiftType::bool()));
        assert_eq!(getter.describe("MyClass"), "MyClass.value() -> Bool");
    }
}
