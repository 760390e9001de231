use std::sync::Arc;

use morph_ast::{Expression, SwiftOperator, SwiftType};
use morph_intentions::{FileIntention, GlobalVariableIntention, IntentionCollection};
use morph_rewriter::{
    ArrayDefinitionsSource, DefaultTypeResolverInvoker, DirectiveConversion,
    IntentionCollectionTypeSystem, PreprocessorDirectiveConverter,
};
use morph_types::ValueStorage;
use parking_lot::RwLock;

struct Fixture {
    intentions: Arc<RwLock<IntentionCollection>>,
    invoker: Arc<DefaultTypeResolverInvoker>,
    converter: PreprocessorDirectiveConverter,
}

impl Fixture {
    fn new() -> Self {
        let mut collection = IntentionCollection::new();
        collection.add_intention(FileIntention::for_header("A.h"));
        let intentions = Arc::new(RwLock::new(collection));
        let type_system = Arc::new(IntentionCollectionTypeSystem::new(Arc::clone(&intentions)));
        let invoker = Arc::new(DefaultTypeResolverInvoker::new(
            Arc::new(ArrayDefinitionsSource::default()),
            type_system,
            1,
        ));
        let converter = PreprocessorDirectiveConverter::new(Arc::clone(&invoker));
        Self {
            intentions,
            invoker,
            converter,
        }
    }

    fn convert(&self, directive: &str) -> Option<DirectiveConversion> {
        let intentions = self.intentions.read();
        self.converter.convert(directive, intentions.intention_for("A.h").unwrap())
    }

    fn converted(&self, directive: &str) -> (SwiftType, Expression) {
        let conversion = self
            .convert(directive)
            .unwrap_or_else(|| panic!("`{directive}` did not convert"));
        assert_eq!(conversion.name, "CONSTANT");
        (conversion.ty, conversion.expression)
    }
}

// ── Converted ──────────────────────────────────────────────────────────

#[test]
fn integer_constant() {
    let fixture = Fixture::new();
    assert_eq!(
        fixture.converted("#define CONSTANT 1"),
        (SwiftType::int(), Expression::int(1))
    );
}

#[test]
fn boolean_constant() {
    let fixture = Fixture::new();
    assert_eq!(
        fixture.converted("#define CONSTANT true"),
        (SwiftType::bool(), Expression::constant(true))
    );
}

#[test]
fn string_constant() {
    let fixture = Fixture::new();
    assert_eq!(
        fixture.converted("#define CONSTANT \"abc\""),
        (SwiftType::string(), Expression::constant("abc"))
    );
}

#[test]
fn arithmetic_expression() {
    let fixture = Fixture::new();
    assert_eq!(
        fixture.converted("#define CONSTANT 1 + 1"),
        (
            SwiftType::int(),
            Expression::binary(Expression::int(1), SwiftOperator::Add, Expression::int(1))
        )
    );
}

#[test]
fn scalar_cast() {
    let fixture = Fixture::new();
    let target = SwiftType::type_name("CUnsignedInt");
    assert_eq!(
        fixture.converted("#define CONSTANT (unsigned int)1"),
        (
            SwiftType::optional(target.clone()),
            Expression::cast(Expression::int(1), target)
        )
    );
}

#[test]
fn sizeof_scalar_type() {
    let fixture = Fixture::new();
    assert_eq!(
        fixture.converted("#define CONSTANT sizeof(int)"),
        (
            SwiftType::int(),
            Expression::sizeof_type(SwiftType::type_name("CInt"))
        )
    );
}

#[test]
fn nil_is_an_optional_object() {
    let fixture = Fixture::new();
    assert_eq!(
        fixture.converted("#define CONSTANT nil"),
        (SwiftType::optional(SwiftType::any_object()), Expression::nil())
    );
}

#[test]
fn reference_to_a_file_global() {
    let fixture = Fixture::new();
    fixture
        .intentions
        .write()
        .intention_for_mut("A.h")
        .unwrap()
        .add_global_variable(GlobalVariableIntention::new(
            "symbol",
            ValueStorage::variable(SwiftType::int()),
        ));
    fixture.invoker.refresh_intention_globals();

    assert_eq!(
        fixture.converted("#define CONSTANT symbol"),
        (SwiftType::int(), Expression::identifier("symbol"))
    );
}

#[test]
fn line_continuations_join_the_body() {
    let fixture = Fixture::new();
    assert_eq!(
        fixture.converted("#define CONSTANT 1 + \\\n 1").0,
        SwiftType::int()
    );
}

// ── Not converted ──────────────────────────────────────────────────────

#[test]
fn unbalanced_parenthesis() {
    assert_eq!(Fixture::new().convert("#define CONSTANT (1"), None);
}

#[test]
fn unresolved_symbol() {
    assert_eq!(Fixture::new().convert("#define CONSTANT SYMBOL"), None);
}

#[test]
fn mismatched_operand_types() {
    assert_eq!(Fixture::new().convert("#define CONSTANT \"1\" + 1"), None);
}

#[test]
fn function_like_macro() {
    assert_eq!(Fixture::new().convert("#define MACRO(c) 1"), None);
}

#[test]
fn cast_to_unknown_type() {
    assert_eq!(Fixture::new().convert("#define CONSTANT (UnknownType)1"), None);
}

#[test]
fn empty_body_and_other_directives() {
    let fixture = Fixture::new();
    assert_eq!(fixture.convert("#define CONSTANT"), None);
    assert_eq!(fixture.convert("#import <Foundation/Foundation.h>"), None);
}
