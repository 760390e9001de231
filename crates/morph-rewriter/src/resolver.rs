//! Expression typing.
//!
//! Typing is deliberately shallow: literals, global definitions, members
//! and methods of known types, and the operator rules of C constants. Any
//! expression outside those rules has no type.

use std::sync::Arc;

use morph_ast::expr::{
    BinaryExpression, OperatorCategory, PostfixExpression, SizeofExpression, TernaryExpression,
    UnaryExpression,
};
use morph_ast::{Constant, Expression, Postfix, SwiftOperator, SwiftType};
use morph_types::{is_floating_type, KnownSupertype, KnownType, TypeSystem};
use rustc_hash::FxHashSet;

use crate::definitions::DefinitionsSource;

pub struct ExpressionTypeResolver<'a> {
    type_system: &'a dyn TypeSystem,
    definitions: &'a dyn DefinitionsSource,
}

impl<'a> ExpressionTypeResolver<'a> {
    pub fn new(type_system: &'a dyn TypeSystem, definitions: &'a dyn DefinitionsSource) -> Self {
        Self {
            type_system,
            definitions,
        }
    }

    pub fn resolve_type(&self, exp: &Expression) -> Option<SwiftType> {
        match exp {
            Expression::Constant(constant) => Some(constant_type(constant)),
            Expression::Identifier(name) => {
                let ty = self
                    .definitions
                    .variable_named(name)
                    .and_then(|def| def.variable_type())
                    .cloned();
                if ty.is_none() {
                    tracing::trace!(identifier = %name, "unresolved identifier");
                }
                ty
            }
            Expression::Parens(inner) => self.resolve_type(inner),
            Expression::Cast(cast) => {
                self.resolve_type(&cast.exp)?;
                Some(SwiftType::optional(cast.ty.clone()))
            }
            Expression::Sizeof(SizeofExpression::Type(_)) => Some(SwiftType::int()),
            Expression::Sizeof(SizeofExpression::Expression(inner)) => {
                self.resolve_type(inner)?;
                Some(SwiftType::int())
            }
            Expression::Unary(unary) => self.unary(unary),
            Expression::Binary(binary) => self.binary(binary),
            Expression::Assignment(assignment) => {
                self.resolve_type(&assignment.lhs)?;
                self.resolve_type(&assignment.rhs)?;
                Some(SwiftType::void())
            }
            Expression::Ternary(ternary) => self.ternary(ternary),
            Expression::Postfix(postfix) => self.postfix(postfix),
            Expression::Block(_) => None,
        }
    }

    fn unary(&self, unary: &UnaryExpression) -> Option<SwiftType> {
        let ty = self.resolve_type(&unary.exp)?;
        let ok = match unary.op {
            SwiftOperator::Subtract | SwiftOperator::Add => self.type_system.is_numeric(&ty),
            SwiftOperator::BitwiseNot => self.type_system.is_integer(&ty),
            SwiftOperator::Negate => ty == SwiftType::bool(),
            _ => false,
        };
        ok.then_some(ty)
    }

    fn binary(&self, binary: &BinaryExpression) -> Option<SwiftType> {
        let lhs = self.resolve_type(&binary.lhs)?;
        let rhs = self.resolve_type(&binary.rhs)?;
        let ts = self.type_system;
        match binary.op.category() {
            OperatorCategory::Arithmetic => {
                if binary.op == SwiftOperator::Add && lhs == SwiftType::string() && rhs == SwiftType::string() {
                    return Some(lhs);
                }
                if binary.op == SwiftOperator::Mod {
                    return (ts.is_integer(&lhs) && lhs == rhs).then_some(lhs);
                }
                if !ts.is_numeric(&lhs) || !ts.is_numeric(&rhs) {
                    return None;
                }
                widened(lhs, rhs)
            }
            OperatorCategory::Bitwise => {
                if !ts.is_integer(&lhs) || !ts.is_integer(&rhs) {
                    return None;
                }
                match binary.op {
                    SwiftOperator::BitwiseShiftLeft | SwiftOperator::BitwiseShiftRight => Some(lhs),
                    _ => (lhs == rhs).then_some(lhs),
                }
            }
            OperatorCategory::Comparison => {
                let comparable = (ts.is_numeric(&lhs) && ts.is_numeric(&rhs))
                    || lhs == rhs
                    || (is_nil_type(&lhs) && rhs.is_optional())
                    || (is_nil_type(&rhs) && lhs.is_optional());
                comparable.then(SwiftType::bool)
            }
            OperatorCategory::Logical => {
                (lhs == SwiftType::bool() && rhs == SwiftType::bool()).then(SwiftType::bool)
            }
            OperatorCategory::NullCoalesce => match lhs {
                SwiftType::Optional(inner) | SwiftType::ImplicitlyUnwrapped(inner) => Some(*inner),
                _ => None,
            },
            OperatorCategory::Assignment => None,
        }
    }

    fn ternary(&self, ternary: &TernaryExpression) -> Option<SwiftType> {
        if self.resolve_type(&ternary.condition)? != SwiftType::bool() {
            return None;
        }
        let if_true = self.resolve_type(&ternary.if_true)?;
        let if_false = self.resolve_type(&ternary.if_false)?;
        if if_true == if_false {
            return Some(if_true);
        }
        if self.type_system.is_numeric(&if_true) && self.type_system.is_numeric(&if_false) {
            return widened(if_true, if_false);
        }
        None
    }

    fn postfix(&self, postfix: &PostfixExpression) -> Option<SwiftType> {
        match &postfix.op {
            Postfix::Member(name) => {
                let base = self.resolve_type(&postfix.exp)?;
                self.through_optional(&base, |ty| {
                    self.find_member(ty, |known| known.property(name).map(|p| p.storage.ty.clone()))
                })
            }
            Postfix::FunctionCall(args) => match postfix.exp.as_ref() {
                Expression::Postfix(PostfixExpression {
                    exp: receiver,
                    op: Postfix::Member(method),
                }) => {
                    let base = self.resolve_type(receiver)?;
                    self.through_optional(&base, |ty| {
                        self.find_member(ty, |known| {
                            known.method(method, args.len()).map(|m| m.return_type.clone())
                        })
                    })
                }
                Expression::Identifier(name) => self
                    .definitions
                    .functions_named(name)
                    .into_iter()
                    .filter_map(|def| def.as_function())
                    .find(|sig| sig.arity() == args.len())
                    .map(|sig| sig.return_type.clone()),
                _ => None,
            },
            Postfix::Subscript(_) => {
                let base = self.resolve_type(&postfix.exp)?;
                match base.deep_unwrapped() {
                    SwiftType::Array(element) => Some(element.as_ref().clone()),
                    SwiftType::Dictionary { value, .. } => Some(SwiftType::optional(value.as_ref().clone())),
                    _ => None,
                }
            }
        }
    }

    /// Apply `f` to the unwrapped base; an optional base makes the result
    /// optional.
    fn through_optional(&self, base: &SwiftType, f: impl FnOnce(&SwiftType) -> Option<SwiftType>) -> Option<SwiftType> {
        match base {
            SwiftType::Optional(inner) => f(inner.deep_unwrapped()).map(|ty| {
                if ty.is_optional() {
                    ty
                } else {
                    SwiftType::optional(ty)
                }
            }),
            SwiftType::ImplicitlyUnwrapped(inner) => f(inner.deep_unwrapped()),
            other => f(other),
        }
    }

    /// Search `ty` and its supertypes for a member.
    fn find_member<T>(&self, ty: &SwiftType, mut lookup: impl FnMut(&KnownType) -> Option<T>) -> Option<T> {
        let mut visited = FxHashSet::default();
        let mut current = self.type_system.known_type_with_name(ty.nominal_name()?);
        while let Some(known) = current {
            if !visited.insert(known.type_name.clone()) {
                return None;
            }
            if let Some(found) = lookup(known.as_ref()) {
                return Some(found);
            }
            current = match &known.supertype {
                Some(KnownSupertype::TypeName(name)) => self.type_system.known_type_with_name(name),
                Some(KnownSupertype::Known(supertype)) => Some(Arc::clone(supertype)),
                None => None,
            };
        }
        None
    }
}

fn constant_type(constant: &Constant) -> SwiftType {
    match constant {
        Constant::Int(_) | Constant::Binary(_) | Constant::Octal(_) | Constant::Hexadecimal(_) => SwiftType::int(),
        Constant::Float(_) => SwiftType::double(),
        Constant::Boolean(_) => SwiftType::bool(),
        Constant::String(_) => SwiftType::string(),
        Constant::Nil => nil_type(),
    }
}

fn nil_type() -> SwiftType {
    SwiftType::optional(SwiftType::any_object())
}

fn is_nil_type(ty: &SwiftType) -> bool {
    *ty == nil_type()
}

/// Common type of two numeric operands: equal types stay, a single
/// floating operand wins, anything else has no common type.
fn widened(lhs: SwiftType, rhs: SwiftType) -> Option<SwiftType> {
    if lhs == rhs {
        return Some(lhs);
    }
    match (is_floating_type(&lhs), is_floating_type(&rhs)) {
        (true, false) => Some(lhs),
        (false, true) => Some(rhs),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::{ArrayDefinitionsSource, CodeDefinition};
    use morph_ast::FunctionArgument;
    use morph_types::{DefaultTypeSystem, FunctionSignature, ParameterSignature, ValueStorage};

    fn definitions() -> ArrayDefinitionsSource {
        ArrayDefinitionsSource::new(vec![
            CodeDefinition::variable("count", ValueStorage::variable(SwiftType::int())),
            CodeDefinition::variable("ratio", ValueStorage::variable(SwiftType::double())),
            CodeDefinition::variable("flag", ValueStorage::variable(SwiftType::bool())),
            CodeDefinition::variable(
                "items",
                ValueStorage::variable(SwiftType::type_name("NSMutableArray")),
            ),
            CodeDefinition::variable(
                "maybeString",
                ValueStorage::variable(SwiftType::optional(SwiftType::type_name("NSString"))),
            ),
            CodeDefinition::variable("names", ValueStorage::variable(SwiftType::array(SwiftType::string()))),
            CodeDefinition::function(FunctionSignature::new(
                "makeCount",
                vec![ParameterSignature::unlabeled("seed", SwiftType::int())],
                SwiftType::int(),
            )),
        ])
    }

    fn resolve(exp: &Expression) -> Option<SwiftType> {
        let system = DefaultTypeSystem::new();
        let defs = definitions();
        ExpressionTypeResolver::new(&system, &defs).resolve_type(exp)
    }

    fn id(name: &str) -> Expression {
        Expression::identifier(name)
    }

    #[test]
    fn arithmetic_widens_to_the_floating_operand() {
        let exp = Expression::binary(id("count"), SwiftOperator::Multiply, id("ratio"));
        assert_eq!(resolve(&exp), Some(SwiftType::double()));
        let exp = Expression::binary(id("count"), SwiftOperator::Add, Expression::int(1));
        assert_eq!(resolve(&exp), Some(SwiftType::int()));
    }

    #[test]
    fn mismatched_operands_have_no_type() {
        let exp = Expression::binary(Expression::constant("1"), SwiftOperator::Add, Expression::int(1));
        assert_eq!(resolve(&exp), None);
        let exp = Expression::binary(id("flag"), SwiftOperator::And, id("count"));
        assert_eq!(resolve(&exp), None);
        let exp = Expression::binary(id("ratio"), SwiftOperator::BitwiseAnd, Expression::int(1));
        assert_eq!(resolve(&exp), None);
    }

    #[test]
    fn string_concatenation() {
        let exp = Expression::binary(Expression::constant("a"), SwiftOperator::Add, Expression::constant("b"));
        assert_eq!(resolve(&exp), Some(SwiftType::string()));
    }

    #[test]
    fn comparisons_and_logic_are_bool() {
        let lt = Expression::binary(id("count"), SwiftOperator::LessThan, id("ratio"));
        assert_eq!(resolve(&lt), Some(SwiftType::bool()));
        let and = Expression::binary(lt, SwiftOperator::And, id("flag"));
        assert_eq!(resolve(&and), Some(SwiftType::bool()));
        let nil_check = Expression::binary(id("maybeString"), SwiftOperator::Unequals, Expression::nil());
        assert_eq!(resolve(&nil_check), Some(SwiftType::bool()));
    }

    #[test]
    fn unary_rules() {
        let neg = Expression::unary(SwiftOperator::Subtract, id("ratio"));
        assert_eq!(resolve(&neg), Some(SwiftType::double()));
        let not = Expression::unary(SwiftOperator::Negate, id("count"));
        assert_eq!(resolve(&not), None);
        let inv = Expression::unary(SwiftOperator::BitwiseNot, Expression::int(0));
        assert_eq!(resolve(&inv), Some(SwiftType::int()));
    }

    #[test]
    fn members_and_methods_of_known_types() {
        let call = id("items").dot("addObject").call(vec![FunctionArgument::unlabeled(id("count"))]);
        assert_eq!(resolve(&call), Some(SwiftType::void()));
        // `count` is declared on NSArray, the supertype.
        assert_eq!(resolve(&id("items").dot("count")), Some(SwiftType::int()));
        assert_eq!(resolve(&id("items").dot("missing")), None);
        assert_eq!(
            resolve(&id("maybeString").dot("length")),
            Some(SwiftType::optional(SwiftType::int()))
        );
    }

    #[test]
    fn global_functions_and_subscripts() {
        let call = id("makeCount").call(vec![FunctionArgument::unlabeled(Expression::int(1))]);
        assert_eq!(resolve(&call), Some(SwiftType::int()));
        assert_eq!(resolve(&id("makeCount").call(Vec::new())), None);
        assert_eq!(resolve(&id("names").sub(Expression::int(0))), Some(SwiftType::string()));
    }

    #[test]
    fn ternary_branches_must_agree() {
        let exp = Expression::ternary(id("flag"), Expression::int(1), Expression::int(2));
        assert_eq!(resolve(&exp), Some(SwiftType::int()));
        let exp = Expression::ternary(id("flag"), Expression::int(1), Expression::constant("x"));
        assert_eq!(resolve(&exp), None);
        let exp = Expression::ternary(id("count"), Expression::int(1), Expression::int(2));
        assert_eq!(resolve(&exp), None);
    }
}
