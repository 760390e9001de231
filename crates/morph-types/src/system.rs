//! The `TypeSystem` trait and the built-in registry.

use std::sync::Arc;

use morph_ast::SwiftType;
use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::builder::KnownTypeBuilder;
use crate::error::TypeSystemError;
use crate::known::{KnownSupertype, KnownType};
use crate::signature::{FunctionSignature, ParameterSignature};

// ── Scalar classification ───────────────────────────────────────────────

const INTEGER_TYPES: &[&str] = &[
    "Int",
    "UInt",
    "Int8",
    "Int16",
    "Int32",
    "Int64",
    "UInt8",
    "UInt16",
    "UInt32",
    "UInt64",
    "CInt",
    "CUnsignedInt",
    "CShort",
    "CUnsignedShort",
    "CLong",
    "CUnsignedLong",
    "CLongLong",
    "CUnsignedLongLong",
    "CChar",
    "CSignedChar",
    "CUnsignedChar",
];

const FLOATING_TYPES: &[&str] = &["Float", "Double", "Float80", "CGFloat", "CFloat", "CDouble"];

pub fn is_integer_type(ty: &SwiftType) -> bool {
    match ty {
        SwiftType::TypeName(name) => INTEGER_TYPES.contains(&name.as_str()),
        _ => false,
    }
}

pub fn is_floating_type(ty: &SwiftType) -> bool {
    match ty {
        SwiftType::TypeName(name) => FLOATING_TYPES.contains(&name.as_str()),
        _ => false,
    }
}

pub fn is_numeric_type(ty: &SwiftType) -> bool {
    is_integer_type(ty) || is_floating_type(ty)
}

// ── Trait ───────────────────────────────────────────────────────────────

/// Answers questions about named types.
///
/// Implementations are shared across resolver worker threads.
pub trait TypeSystem: Send + Sync {
    fn known_type_with_name(&self, name: &str) -> Option<Arc<KnownType>>;

    fn is_numeric(&self, ty: &SwiftType) -> bool {
        is_numeric_type(ty)
    }

    fn is_integer(&self, ty: &SwiftType) -> bool {
        is_integer_type(ty)
    }

    /// Whether `type_name` is `subtype_of` or inherits from it.
    ///
    /// Both names must resolve through this type system; an unresolved name
    /// is never a subtype of anything, itself included. Supertype edges are
    /// resolved before comparing, and a chain that revisits a name stops there.
    fn is_type(&self, type_name: &str, subtype_of: &str) -> bool {
        let Some(target) = self.known_type_with_name(subtype_of) else {
            return false;
        };
        let mut visited = FxHashSet::default();
        let mut current = self.known_type_with_name(type_name);
        while let Some(ty) = current {
            if ty.type_name == target.type_name {
                return true;
            }
            if !visited.insert(ty.type_name.clone()) {
                return false;
            }
            current = match &ty.supertype {
                None => None,
                Some(KnownSupertype::TypeName(name)) => self.known_type_with_name(name),
                Some(KnownSupertype::Known(known)) => self
                    .known_type_with_name(&known.type_name)
                    .or_else(|| Some(Arc::clone(known))),
            };
        }
        false
    }
}

// ── Default registry ────────────────────────────────────────────────────

#[derive(Default)]
struct Registry {
    types: Vec<Arc<KnownType>>,
    by_name: FxHashMap<String, usize>,
}

impl Registry {
    fn get(&self, name: &str) -> Option<&Arc<KnownType>> {
        self.by_name.get(name).map(|&index| &self.types[index])
    }

    /// Names walked from `ty`'s supertype, returning the chain if it comes
    /// back to `ty` itself.
    fn cycle_through(&self, ty: &KnownType) -> Option<Vec<String>> {
        let mut chain = vec![ty.type_name.clone()];
        let mut seen = FxHashSet::default();
        seen.insert(ty.type_name.clone());
        let mut next = ty.supertype.clone();
        while let Some(supertype) = next {
            let name = supertype.name().to_string();
            chain.push(name.clone());
            if name == ty.type_name {
                return Some(chain);
            }
            if !seen.insert(name.clone()) {
                // A loop that does not involve `ty` is already registered;
                // it cannot be extended from here.
                return None;
            }
            next = match supertype {
                KnownSupertype::Known(known) => self
                    .get(&known.type_name)
                    .map(|registered| registered.supertype.clone())
                    .unwrap_or_else(|| known.supertype.clone()),
                KnownSupertype::TypeName(name) => self.get(&name).and_then(|t| t.supertype.clone()),
            };
        }
        None
    }
}

/// Registry of built-in Objective-C/Foundation types.
///
/// Reads and writes can happen from any thread; registration takes the
/// write lock.
pub struct DefaultTypeSystem {
    registry: RwLock<Registry>,
}

impl DefaultTypeSystem {
    /// A registry pre-populated with the Foundation built-ins.
    pub fn new() -> Self {
        let system = Self::empty();
        for ty in builtin_types() {
            if let Err(err) = system.add_type(ty) {
                panic!("built-in type registration failed: {}", err);
            }
        }
        system
    }

    pub fn empty() -> Self {
        Self {
            registry: RwLock::new(Registry::default()),
        }
    }

    pub fn add_type(&self, ty: KnownType) -> Result<Arc<KnownType>, TypeSystemError> {
        let mut registry = self.registry.write();
        if registry.by_name.contains_key(&ty.type_name) {
            return Err(TypeSystemError::DuplicateType(ty.type_name));
        }
        if let Some(chain) = registry.cycle_through(&ty) {
            return Err(TypeSystemError::SupertypeCycle {
                type_name: ty.type_name,
                chain,
            });
        }
        let ty = Arc::new(ty);
        let index = registry.types.len();
        registry.by_name.insert(ty.type_name.clone(), index);
        registry.types.push(Arc::clone(&ty));
        tracing::trace!(type_name = %ty.type_name, "registered known type");
        Ok(ty)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.registry.read_recursive().by_name.contains_key(name)
    }

    pub fn type_names(&self) -> Vec<String> {
        self.registry
            .read_recursive()
            .types
            .iter()
            .map(|ty| ty.type_name.clone())
            .collect()
    }
}

impl Default for DefaultTypeSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeSystem for DefaultTypeSystem {
    fn known_type_with_name(&self, name: &str) -> Option<Arc<KnownType>> {
        self.registry.read_recursive().get(name).cloned()
    }
}

fn builtin_types() -> Vec<KnownType> {
    let ns_object = KnownTypeBuilder::new("NSObject")
        .adding_constructor(Vec::new())
        .build();

    let ns_array = KnownTypeBuilder::new("NSArray")
        .setting_supertype_name("NSObject")
        .adding_property_of_type("count", SwiftType::int())
        .build();

    let ns_mutable_array = KnownTypeBuilder::new("NSMutableArray")
        .setting_supertype_name("NSArray")
        .adding_method(FunctionSignature::new(
            "addObject",
            vec![ParameterSignature::unlabeled("anObject", SwiftType::any_object())],
            SwiftType::void(),
        ))
        .build();

    let ns_dictionary = KnownTypeBuilder::new("NSDictionary")
        .setting_supertype_name("NSObject")
        .adding_property_of_type("count", SwiftType::int())
        .build();

    let ns_mutable_dictionary = KnownTypeBuilder::new("NSMutableDictionary")
        .setting_supertype_name("NSDictionary")
        .adding_method(FunctionSignature::new(
            "setObject",
            vec![
                ParameterSignature::unlabeled("anObject", SwiftType::any_object()),
                ParameterSignature::new("forKey", "aKey", SwiftType::any_object()),
            ],
            SwiftType::void(),
        ))
        .build();

    let ns_string = KnownTypeBuilder::new("NSString")
        .setting_supertype_name("NSObject")
        .adding_protocol_conformance("NSCopying")
        .adding_property_of_type("length", SwiftType::int())
        .build();

    let ns_number = KnownTypeBuilder::new("NSNumber")
        .setting_supertype_name("NSObject")
        .adding_property_of_type("intValue", SwiftType::type_name("CInt"))
        .adding_property_of_type("doubleValue", SwiftType::double())
        .adding_property_of_type("boolValue", SwiftType::bool())
        .build();

    vec![
        ns_object,
        ns_array,
        ns_mutable_array,
        ns_dictionary,
        ns_mutable_dictionary,
        ns_string,
        ns_number,
    ]
}
