//! Builder for [`KnownType`]s.
//!
//! Every `adding_*` method keeps the first registration of a key: a
//! property name, a protocol name or a method selector registered twice is
//! absorbed silently. This is what merging partial declarations relies on.

use std::sync::Arc;

use morph_ast::SwiftType;

use crate::known::{KnownSupertype, KnownType};
use crate::signature::{
    FunctionSignature, KnownConstructor, KnownProperty, ParameterSignature, ValueStorage,
};

#[derive(Clone, Debug)]
pub struct KnownTypeBuilder {
    ty: KnownType,
}

impl KnownTypeBuilder {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            ty: KnownType {
                type_name: type_name.into(),
                supertype: None,
                protocols: Vec::new(),
                properties: Vec::new(),
                constructors: Vec::new(),
                methods: Vec::new(),
            },
        }
    }

    pub fn has_supertype(&self) -> bool {
        self.ty.supertype.is_some()
    }

    pub fn setting_supertype_name(self, name: impl Into<String>) -> Self {
        self.setting_supertype(KnownSupertype::TypeName(name.into()))
    }

    pub fn setting_supertype(mut self, supertype: KnownSupertype) -> Self {
        self.ty.supertype = Some(supertype);
        self
    }

    pub fn setting_known_supertype(self, supertype: Arc<KnownType>) -> Self {
        self.setting_supertype(KnownSupertype::Known(supertype))
    }

    pub fn adding_protocol_conformance(mut self, protocol: impl Into<String>) -> Self {
        let protocol = protocol.into();
        if !self.ty.conforms_to(&protocol) {
            self.ty.protocols.push(protocol);
        }
        self
    }

    pub fn adding_property(mut self, name: impl Into<String>, storage: ValueStorage) -> Self {
        let name = name.into();
        if self.ty.property(&name).is_none() {
            self.ty.properties.push(KnownProperty { name, storage });
        }
        self
    }

    pub fn adding_property_of_type(self, name: impl Into<String>, ty: SwiftType) -> Self {
        self.adding_property(name, ValueStorage::variable(ty))
    }

    pub fn adding_constructor(mut self, parameters: Vec<ParameterSignature>) -> Self {
        self.ty.constructors.push(KnownConstructor { parameters });
        self
    }

    pub fn adding_method(mut self, signature: FunctionSignature) -> Self {
        let selector = signature.selector();
        let is_static = signature.is_static;
        if !self
            .ty
            .methods
            .iter()
            .any(|method| method.is_static == is_static && method.selector() == selector)
        {
            self.ty.methods.push(signature);
        }
        self
    }

    pub fn build(self) -> KnownType {
        self.ty
    }
}
