use std::sync::Arc;
use std::thread;

use morph_ast::SwiftType;
use morph_types::{DefaultTypeSystem, KnownTypeBuilder, TypeSystem, TypeSystemError};

fn chain_system() -> DefaultTypeSystem {
    let system = DefaultTypeSystem::empty();
    system
        .add_type(KnownTypeBuilder::new("C").build())
        .unwrap();
    system
        .add_type(KnownTypeBuilder::new("B").setting_supertype_name("C").build())
        .unwrap();
    system
        .add_type(KnownTypeBuilder::new("A").setting_supertype_name("B").build())
        .unwrap();
    system
}

#[test]
fn subtype_chain_is_transitive() {
    let system = chain_system();
    assert!(system.is_type("A", "A"));
    assert!(system.is_type("A", "B"));
    assert!(system.is_type("A", "C"));
    assert!(system.is_type("B", "C"));
    assert!(!system.is_type("C", "A"));
    assert!(!system.is_type("B", "A"));
}

#[test]
fn unresolved_names_are_never_subtypes() {
    let system = chain_system();
    assert!(system.is_type("A", "A"));
    assert!(!system.is_type("Z", "Z"));
    assert!(!system.is_type("Z", "C"));
    assert!(!system.is_type("A", "Z"));
}

#[test]
fn unregistered_supertype_name_does_not_match() {
    let system = DefaultTypeSystem::empty();
    system
        .add_type(KnownTypeBuilder::new("A").setting_supertype_name("Ghost").build())
        .unwrap();
    assert!(!system.is_type("A", "Ghost"));
    assert!(system.is_type("A", "A"));
}

#[test]
fn known_supertype_reference_resolves_like_a_name() {
    let system = DefaultTypeSystem::empty();
    let base = system.add_type(KnownTypeBuilder::new("Base").build()).unwrap();
    let middle = system
        .add_type(KnownTypeBuilder::new("Middle").setting_known_supertype(base).build())
        .unwrap();
    system
        .add_type(
            KnownTypeBuilder::new("Leaf")
                .setting_known_supertype(Arc::clone(&middle))
                .build(),
        )
        .unwrap();
    assert!(system.is_type("Leaf", "Middle"));
    assert!(system.is_type("Leaf", "Base"));
}

#[test]
fn unregistered_known_supertype_is_still_walked() {
    let system = DefaultTypeSystem::empty();
    let root = system.add_type(KnownTypeBuilder::new("Root").build()).unwrap();
    let hidden = Arc::new(
        KnownTypeBuilder::new("Hidden")
            .setting_known_supertype(root)
            .build(),
    );
    system
        .add_type(KnownTypeBuilder::new("Visible").setting_known_supertype(hidden).build())
        .unwrap();
    assert!(system.is_type("Visible", "Root"));
    assert!(!system.is_type("Visible", "Hidden"));
}

#[test]
fn duplicate_names_are_rejected() {
    let system = chain_system();
    let err = system.add_type(KnownTypeBuilder::new("B").build()).unwrap_err();
    assert_eq!(err, TypeSystemError::DuplicateType("B".into()));
    assert_eq!(err.to_string(), "type `B` is already registered");
}

#[test]
fn supertype_cycles_are_rejected() {
    let system = DefaultTypeSystem::empty();
    system
        .add_type(KnownTypeBuilder::new("B").setting_supertype_name("A").build())
        .unwrap();
    let err = system
        .add_type(KnownTypeBuilder::new("A").setting_supertype_name("B").build())
        .unwrap_err();
    assert_eq!(
        err,
        TypeSystemError::SupertypeCycle {
            type_name: "A".into(),
            chain: vec!["A".into(), "B".into(), "A".into()],
        }
    );
    assert!(!system.contains("A"));
}

#[test]
fn self_inheritance_is_a_cycle() {
    let system = DefaultTypeSystem::empty();
    let err = system
        .add_type(KnownTypeBuilder::new("A").setting_supertype_name("A").build())
        .unwrap_err();
    assert!(matches!(err, TypeSystemError::SupertypeCycle { .. }));
}

#[test]
fn concurrent_reads_see_registered_types() {
    let system = Arc::new(DefaultTypeSystem::new());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let system = Arc::clone(&system);
            thread::spawn(move || {
                if i == 0 {
                    system
                        .add_type(
                            KnownTypeBuilder::new("MyView")
                                .setting_supertype_name("NSObject")
                                .adding_property_of_type("frame", SwiftType::type_name("CGRect"))
                                .build(),
                        )
                        .unwrap();
                }
                system.is_type("NSMutableArray", "NSObject")
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
    assert!(system.is_type("MyView", "NSObject"));
    let view = system.known_type_with_name("MyView").unwrap();
    assert_eq!(view.property("frame").unwrap().storage.ty.to_string(), "CGRect");
}
