//! Type intentions: classes, extensions and protocols.

use morph_types::{
    FunctionSignature, KnownSupertype, KnownType, KnownTypeBuilder, ParameterSignature, ValueStorage,
};

use crate::history::IntentionHistory;
use crate::members::{InitIntention, MethodIntention, PropertyIntention};
use crate::Provenance;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeIntentionKind {
    Class,
    /// Members added to a class declared elsewhere.
    Extension,
    Protocol,
}

/// A type declaration the rewriter intends to emit.
///
/// Several intentions may share a `type_name` (a class and its
/// extensions); type systems merge them on lookup.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeIntention {
    pub kind: TypeIntentionKind,
    pub type_name: String,
    pub supertype: Option<String>,
    pub protocols: Vec<String>,
    pub properties: Vec<PropertyIntention>,
    pub methods: Vec<MethodIntention>,
    pub constructors: Vec<InitIntention>,
    pub source: Option<Provenance>,
    pub history: IntentionHistory,
}

impl TypeIntention {
    pub fn new(kind: TypeIntentionKind, type_name: impl Into<String>) -> Self {
        Self {
            kind,
            type_name: type_name.into(),
            supertype: None,
            protocols: Vec::new(),
            properties: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            source: None,
            history: IntentionHistory::new(),
        }
    }

    pub fn class(type_name: impl Into<String>) -> Self {
        Self::new(TypeIntentionKind::Class, type_name)
    }

    pub fn extension(type_name: impl Into<String>) -> Self {
        Self::new(TypeIntentionKind::Extension, type_name)
    }

    pub fn protocol(type_name: impl Into<String>) -> Self {
        Self::new(TypeIntentionKind::Protocol, type_name)
    }

    pub fn is_class(&self) -> bool {
        self.kind == TypeIntentionKind::Class
    }

    pub fn is_extension(&self) -> bool {
        self.kind == TypeIntentionKind::Extension
    }

    pub fn is_protocol(&self) -> bool {
        self.kind == TypeIntentionKind::Protocol
    }

    /// No members and no protocol conformances.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
            && self.methods.is_empty()
            && self.constructors.is_empty()
            && self.protocols.is_empty()
    }

    pub fn add_property(&mut self, property: PropertyIntention) {
        self.properties.push(property);
    }

    pub fn add_method(&mut self, method: MethodIntention) {
        self.methods.push(method);
    }

    pub fn add_constructor(&mut self, constructor: InitIntention) {
        self.constructors.push(constructor);
    }

    pub fn add_protocol(&mut self, protocol: impl Into<String>) {
        let protocol = protocol.into();
        if !self.protocols.contains(&protocol) {
            self.protocols.push(protocol);
        }
    }

    pub fn property(&self, name: &str) -> Option<&PropertyIntention> {
        self.properties.iter().find(|prop| prop.name == name)
    }

    pub fn property_mut(&mut self, name: &str) -> Option<&mut PropertyIntention> {
        self.properties.iter_mut().find(|prop| prop.name == name)
    }

    pub fn method(&self, name: &str, arity: usize) -> Option<&MethodIntention> {
        self.methods
            .iter()
            .find(|method| method.name() == name && method.signature.arity() == arity)
    }

    /// Remove every method matching `predicate`, returning them in their
    /// original order.
    pub fn remove_methods(&mut self, mut predicate: impl FnMut(&MethodIntention) -> bool) -> Vec<MethodIntention> {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.methods.len());
        for method in self.methods.drain(..) {
            if predicate(&method) {
                removed.push(method);
            } else {
                kept.push(method);
            }
        }
        self.methods = kept;
        removed
    }

    /// This intention alone, as a known type. Member order is kept;
    /// duplicates are absorbed by the builder.
    pub fn to_known_type(&self) -> KnownType {
        let mut builder = KnownTypeBuilder::new(self.type_name.as_str());
        if let Some(supertype) = &self.supertype {
            builder = builder.setting_supertype(KnownSupertype::TypeName(supertype.clone()));
        }
        for protocol in &self.protocols {
            builder = builder.adding_protocol_conformance(protocol.as_str());
        }
        for property in &self.properties {
            builder = builder.adding_property(property.name.as_str(), property.storage.clone());
        }
        for constructor in &self.constructors {
            builder = builder.adding_constructor(constructor.parameters.clone());
        }
        for method in &self.methods {
            builder = builder.adding_method(method.signature.clone());
        }
        builder.build()
    }
}

/// Free function declared at file scope.
#[derive(Clone, Debug, PartialEq)]
pub struct GlobalFunctionIntention {
    pub signature: FunctionSignature,
    pub source: Option<Provenance>,
    pub history: IntentionHistory,
}

impl GlobalFunctionIntention {
    pub fn new(signature: FunctionSignature) -> Self {
        Self {
            signature,
            source: None,
            history: IntentionHistory::new(),
        }
    }

    pub fn parameters(&self) -> &[ParameterSignature] {
        &self.signature.parameters
    }
}

/// Variable or constant declared at file scope.
#[derive(Clone, Debug, PartialEq)]
pub struct GlobalVariableIntention {
    pub name: String,
    pub storage: ValueStorage,
    pub initial_value: Option<morph_ast::Expression>,
    /// Type of `initial_value`, once the resolver has run.
    pub initial_value_type: Option<morph_ast::SwiftType>,
    pub source: Option<Provenance>,
    pub history: IntentionHistory,
}

impl GlobalVariableIntention {
    pub fn new(name: impl Into<String>, storage: ValueStorage) -> Self {
        Self {
            name: name.into(),
            storage,
            initial_value: None,
            initial_value_type: None,
            source: None,
            history: IntentionHistory::new(),
        }
    }

    pub fn with_initial_value(mut self, expression: morph_ast::Expression) -> Self {
        self.initial_value = Some(expression);
        self
    }
}
