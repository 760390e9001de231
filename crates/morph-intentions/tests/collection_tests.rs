use morph_ast::SwiftType;
use morph_intentions::{
    FileIntention, GlobalVariableIntention, IntentionCollection, PropertyIntention, TypeIntention,
};
use morph_types::ValueStorage;

fn collection() -> IntentionCollection {
    let mut a = FileIntention::new("A.h", "A.swift");
    a.add_type(TypeIntention::class("A"));
    a.add_type(TypeIntention::protocol("ADelegate"));

    let mut b = FileIntention::new("B.h", "B.swift");
    b.add_type(TypeIntention::class("B"));
    b.add_type(TypeIntention::extension("A"));

    let mut collection = IntentionCollection::new();
    collection.add_intention(a);
    collection.add_intention(b);
    collection
}

#[test]
fn queries_flatten_in_insertion_order() {
    let collection = collection();
    let names: Vec<_> = collection
        .type_intentions()
        .into_iter()
        .map(|ty| ty.type_name.as_str())
        .collect();
    assert_eq!(names, ["A", "ADelegate", "B", "A"]);
    assert_eq!(collection.class_intentions().len(), 2);
    assert_eq!(collection.extension_intentions().len(), 1);
    assert_eq!(collection.protocol_intentions().len(), 1);
    assert_eq!(collection.type_intentions_named("A").len(), 2);
}

#[test]
fn queries_reflect_later_mutation() {
    let mut collection = collection();
    assert_eq!(collection.extension_intentions().len(), 1);
    collection
        .intention_for_mut("B.h")
        .unwrap()
        .remove_types(TypeIntention::is_extension);
    assert!(collection.extension_intentions().is_empty());
    assert_eq!(collection.type_intentions().len(), 3);
}

#[test]
fn lookup_by_path_returns_first_match() {
    let mut collection = collection();
    let mut duplicate = FileIntention::new("A.h", "Other.swift");
    duplicate.add_global_variable(GlobalVariableIntention::new(
        "x",
        ValueStorage::variable(SwiftType::int()),
    ));
    collection.add_intention(duplicate);
    assert_eq!(collection.intention_for("A.h").unwrap().target_path, "A.swift");
    assert!(collection.intention_for("C.h").is_none());
}

#[test]
fn remove_first_or_all_matching_files() {
    let mut collection = collection();
    collection.add_intention(FileIntention::new("A.h", "A2.swift"));

    let removed = collection.remove_intention(|file| file.source_path == "A.h").unwrap();
    assert_eq!(removed.target_path, "A.swift");
    assert_eq!(collection.file_intentions().len(), 2);

    collection.add_intention(FileIntention::new("A.h", "A3.swift"));
    assert_eq!(collection.remove_intentions(|file| file.source_path == "A.h"), 2);
    assert_eq!(collection.file_intentions().len(), 1);
    assert!(collection.remove_intention(|file| file.source_path == "A.h").is_none());
}

#[test]
fn members_are_reachable_through_the_collection() {
    let mut collection = collection();
    let file = collection.intention_for_mut("A.h").unwrap();
    file.type_intentions_mut()[0].add_property(PropertyIntention::new(
        "name",
        ValueStorage::variable(SwiftType::string()),
    ));
    let a = collection.class_intentions()[0];
    assert_eq!(a.property("name").unwrap().ty(), &SwiftType::string());
}
