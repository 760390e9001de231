//! Type system backed by the built-ins plus the program's own intentions.

use std::sync::Arc;

use morph_intentions::IntentionCollection;
use morph_types::{DefaultTypeSystem, KnownSupertype, KnownType, KnownTypeBuilder, TypeSystem};
use parking_lot::RwLock;

/// Resolves names against the built-in registry first, then against every
/// type intention of the collection with that name.
///
/// A class declared across several intentions (the class itself plus
/// extensions, possibly in different files) is merged into one known type
/// on every lookup:
/// - the first declared supertype wins;
/// - protocol conformances are unioned;
/// - properties and methods keep the first declaration of each key;
/// - every constructor is kept.
pub struct IntentionCollectionTypeSystem {
    builtins: DefaultTypeSystem,
    intentions: Arc<RwLock<IntentionCollection>>,
}

impl IntentionCollectionTypeSystem {
    pub fn new(intentions: Arc<RwLock<IntentionCollection>>) -> Self {
        Self::with_builtins(DefaultTypeSystem::new(), intentions)
    }

    pub fn with_builtins(builtins: DefaultTypeSystem, intentions: Arc<RwLock<IntentionCollection>>) -> Self {
        Self { builtins, intentions }
    }

    pub fn intentions(&self) -> &Arc<RwLock<IntentionCollection>> {
        &self.intentions
    }

    pub fn builtins(&self) -> &DefaultTypeSystem {
        &self.builtins
    }

    fn merged_intention_type(&self, name: &str) -> Option<KnownType> {
        let intentions = self.intentions.read_recursive();
        let types = intentions.type_intentions_named(name);
        if types.is_empty() {
            return None;
        }

        let mut builder = KnownTypeBuilder::new(name);
        for ty in types {
            if let Some(supertype) = &ty.supertype {
                if !builder.has_supertype() {
                    let supertype = match self.builtins.known_type_with_name(supertype) {
                        Some(known) => KnownSupertype::Known(known),
                        None => KnownSupertype::TypeName(supertype.clone()),
                    };
                    builder = builder.setting_supertype(supertype);
                }
            }
            for protocol in &ty.protocols {
                builder = builder.adding_protocol_conformance(protocol.as_str());
            }
            for property in &ty.properties {
                builder = builder.adding_property(property.name.as_str(), property.storage.clone());
            }
            for constructor in &ty.constructors {
                builder = builder.adding_constructor(constructor.parameters.clone());
            }
            for method in &ty.methods {
                builder = builder.adding_method(method.signature.clone());
            }
        }
        Some(builder.build())
    }
}

impl TypeSystem for IntentionCollectionTypeSystem {
    fn known_type_with_name(&self, name: &str) -> Option<Arc<KnownType>> {
        if let Some(known) = self.builtins.known_type_with_name(name) {
            return Some(known);
        }
        self.merged_intention_type(name).map(Arc::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use morph_ast::SwiftType;
    use morph_intentions::{FileIntention, MethodIntention, PropertyIntention, TypeIntention};
    use morph_types::{FunctionSignature, ValueStorage};

    fn property(name: &str, ty: SwiftType) -> PropertyIntention {
        PropertyIntention::new(name, ValueStorage::variable(ty))
    }

    fn system(types: Vec<TypeIntention>) -> IntentionCollectionTypeSystem {
        let mut file = FileIntention::new("A.h", "A.swift");
        for ty in types {
            file.add_type(ty);
        }
        let mut collection = IntentionCollection::new();
        collection.add_intention(file);
        IntentionCollectionTypeSystem::new(Arc::new(RwLock::new(collection)))
    }

    #[test]
    fn disjoint_properties_are_unioned() {
        let mut class = TypeIntention::class("A");
        class.add_property(property("a", SwiftType::int()));
        let mut ext = TypeIntention::extension("A");
        ext.add_property(property("b", SwiftType::string()));

        let system = system(vec![class, ext]);
        let known = system.known_type_with_name("A").unwrap();
        let names: Vec<_> = known.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn duplicate_property_keeps_first_declaration() {
        let mut class = TypeIntention::class("A");
        class.add_property(property("p", SwiftType::int()));
        let mut ext = TypeIntention::extension("A");
        ext.add_property(property("p", SwiftType::string()));

        let system = system(vec![class, ext]);
        let known = system.known_type_with_name("A").unwrap();
        assert_eq!(known.properties.len(), 1);
        assert_eq!(known.property("p").unwrap().storage.ty, SwiftType::int());
    }

    #[test]
    fn first_supertype_wins_and_builtins_resolve() {
        let mut class = TypeIntention::class("A");
        class.supertype = Some("NSObject".into());
        let mut ext = TypeIntention::extension("A");
        ext.supertype = Some("NSArray".into());
        ext.add_protocol("NSCopying");
        ext.add_method(MethodIntention::new(FunctionSignature::new(
            "reset",
            Vec::new(),
            SwiftType::void(),
        )));

        let system = system(vec![class, ext]);
        let known = system.known_type_with_name("A").unwrap();
        assert!(matches!(known.supertype, Some(KnownSupertype::Known(_))));
        assert_eq!(known.supertype_name(), Some("NSObject"));
        assert!(known.conforms_to("NSCopying"));
        assert!(known.method("reset", 0).is_some());
        assert!(system.is_type("A", "NSObject"));
        assert!(!system.is_type("A", "NSArray"));
    }

    #[test]
    fn builtins_shadow_intentions() {
        let mut fake = TypeIntention::class("NSObject");
        fake.add_property(property("fake", SwiftType::int()));
        let system = system(vec![fake]);
        let known = system.known_type_with_name("NSObject").unwrap();
        assert!(known.property("fake").is_none());
    }

    #[test]
    fn intention_chains_resolve_through_names() {
        let mut a = TypeIntention::class("A");
        a.supertype = Some("B".into());
        let mut b = TypeIntention::class("B");
        b.supertype = Some("NSObject".into());
        let system = system(vec![a, b]);
        assert!(system.is_type("A", "B"));
        assert!(system.is_type("A", "NSObject"));
        assert!(!system.is_type("B", "A"));
        assert!(system.known_type_with_name("Missing").is_none());
    }

    #[test]
    fn lookups_see_later_additions() {
        let system = system(Vec::new());
        assert!(system.known_type_with_name("Late").is_none());
        system.intentions().write().file_intentions_mut()[0].add_type(TypeIntention::class("Late"));
        assert!(system.known_type_with_name("Late").is_some());
    }
}
