//! Expression-shaped matchers: identifiers, member/call/subscript chains,
//! operators and nil-guard idioms.

use crate::expr::{
    AssignmentExpression, BinaryExpression, Constant, Expression, FunctionArgument, Postfix,
    PostfixExpression, SwiftOperator, UnaryExpression,
};
use crate::postfix::{PostfixChain, PostfixChainInverter};
use crate::sequence::ExpressionSequence;

use super::{Captures, MatchRule, ValueMatcher};

/// `name`
pub fn ident(name: impl Into<MatchRule<String>>) -> ValueMatcher<Expression> {
    ValueMatcher::new().narrow(Expression::as_identifier, name)
}

/// `lhs op rhs`
pub fn binary(
    lhs: impl Into<MatchRule<Expression>>,
    op: impl Into<MatchRule<SwiftOperator>>,
    rhs: impl Into<MatchRule<Expression>>,
) -> ValueMatcher<Expression> {
    let binary = ValueMatcher::new()
        .field(|b: &BinaryExpression| b.lhs.as_ref(), lhs)
        .field(|b: &BinaryExpression| &b.op, op)
        .field(|b: &BinaryExpression| b.rhs.as_ref(), rhs);
    ValueMatcher::new().narrow(Expression::as_binary, binary)
}

/// `op exp`
pub fn unary(
    op: impl Into<MatchRule<SwiftOperator>>,
    exp: impl Into<MatchRule<Expression>>,
) -> ValueMatcher<Expression> {
    let unary = ValueMatcher::new()
        .field(|u: &UnaryExpression| &u.op, op)
        .field(|u: &UnaryExpression| u.exp.as_ref(), exp);
    ValueMatcher::new().narrow(Expression::as_unary, unary)
}

/// The `nil` literal.
pub fn nil_literal() -> ValueMatcher<Expression> {
    ValueMatcher::new().narrow(Expression::as_constant, MatchRule::Equals(Constant::Nil))
}

/// Any spelling of "`value` is not nil": `value != nil`, `nil != value`, or
/// bare `value`.
pub fn nil_check(against: &Expression) -> ValueMatcher<Expression> {
    let forms = [
        Expression::binary(against.clone(), SwiftOperator::Unequals, Expression::nil()),
        Expression::binary(Expression::nil(), SwiftOperator::Unequals, against.clone()),
        against.clone(),
    ];
    ValueMatcher::new().matching(move |exp: &Expression| forms.contains(exp))
}

/// Any spelling of "`value` is nil": `value == nil`, `nil == value`, or
/// `!value`.
pub fn nil_compare(against: &Expression) -> ValueMatcher<Expression> {
    let forms = [
        Expression::binary(against.clone(), SwiftOperator::Equals, Expression::nil()),
        Expression::binary(Expression::nil(), SwiftOperator::Equals, against.clone()),
        Expression::unary(SwiftOperator::Negate, against.clone()),
    ];
    ValueMatcher::new().matching(move |exp: &Expression| forms.contains(exp))
}

/// Matches when the subject or any expression nested in it satisfies
/// `matcher`. Block bodies are not searched.
pub fn find_any(matcher: ValueMatcher<Expression>) -> ValueMatcher<Expression> {
    ValueMatcher::new().with_rule(move |exp: &Expression, captures: &mut Captures| {
        ExpressionSequence::new(exp, false).any(|candidate| match matcher.match_captures(candidate) {
            Some(found) => {
                captures.merge(found);
                true
            }
            None => false,
        })
    })
}

/// Matchers for one operation of a [`PostfixChain`].
pub struct PostfixMatcher;

impl PostfixMatcher {
    pub fn is_member_access() -> ValueMatcher<Postfix> {
        ValueMatcher::new().matching(|op: &Postfix| matches!(op, Postfix::Member(_)))
    }

    pub fn is_function_call() -> ValueMatcher<Postfix> {
        ValueMatcher::new().matching(|op: &Postfix| matches!(op, Postfix::FunctionCall(_)))
    }

    pub fn is_subscript() -> ValueMatcher<Postfix> {
        ValueMatcher::new().matching(|op: &Postfix| matches!(op, Postfix::Subscript(_)))
    }

    pub fn member_named(name: impl Into<MatchRule<String>>) -> ValueMatcher<Postfix> {
        ValueMatcher::new().narrow(Postfix::as_member, name)
    }
}

impl ValueMatcher<PostfixChain> {
    /// The innermost, non-postfix operand.
    pub fn base(self, rule: impl Into<MatchRule<Expression>>) -> Self {
        self.field(|chain: &PostfixChain| &chain.base, rule)
    }

    /// The operation at `index`, counting from the base outward.
    pub fn op(self, index: usize, rule: impl Into<MatchRule<Postfix>>) -> Self {
        self.narrow(move |chain: &PostfixChain| chain.ops.get(index), rule)
    }

    pub fn op_count(self, count: usize) -> Self {
        self.matching(move |chain| chain.ops.len() == count)
    }
}

impl ValueMatcher<Expression> {
    /// `<self>.member`
    pub fn dot(self, member: impl Into<MatchRule<String>>) -> ValueMatcher<Expression> {
        let postfix = ValueMatcher::new()
            .field(|p: &PostfixExpression| p.exp.as_ref(), self)
            .narrow(|p: &PostfixExpression| p.op.as_member(), member);
        ValueMatcher::new().narrow(Expression::as_postfix, postfix)
    }

    /// `<self>(args)` with exactly these arguments.
    pub fn call(self, args: Vec<FunctionArgument>) -> ValueMatcher<Expression> {
        let postfix = ValueMatcher::new()
            .field(|p: &PostfixExpression| p.exp.as_ref(), self)
            .narrow(|p: &PostfixExpression| p.op.as_function_call(), MatchRule::Equals(args));
        ValueMatcher::new().narrow(Expression::as_postfix, postfix)
    }

    /// `<self>.method()`
    pub fn call_method(self, method: impl Into<MatchRule<String>>) -> ValueMatcher<Expression> {
        self.dot(method).call(Vec::new())
    }

    /// `<self>[index]`
    pub fn subscript(self, index: impl Into<MatchRule<Expression>>) -> ValueMatcher<Expression> {
        let postfix = ValueMatcher::new()
            .field(|p: &PostfixExpression| p.exp.as_ref(), self)
            .narrow(|p: &PostfixExpression| p.op.as_subscript(), index);
        ValueMatcher::new().narrow(Expression::as_postfix, postfix)
    }

    /// `<self> op rhs`
    pub fn binary(
        self,
        op: impl Into<MatchRule<SwiftOperator>>,
        rhs: impl Into<MatchRule<Expression>>,
    ) -> ValueMatcher<Expression> {
        binary(self, op, rhs)
    }

    /// `<self> op= rhs`
    pub fn assignment(
        self,
        op: impl Into<MatchRule<SwiftOperator>>,
        rhs: impl Into<MatchRule<Expression>>,
    ) -> ValueMatcher<Expression> {
        let assignment = ValueMatcher::new()
            .field(|a: &AssignmentExpression| a.lhs.as_ref(), self)
            .field(|a: &AssignmentExpression| &a.op, op)
            .field(|a: &AssignmentExpression| a.rhs.as_ref(), rhs);
        ValueMatcher::new().narrow(Expression::as_assignment, assignment)
    }

    /// Match a postfix subject by its left-to-right operation list.
    pub fn inverted(
        self,
        build: impl FnOnce(ValueMatcher<PostfixChain>) -> ValueMatcher<PostfixChain>,
    ) -> ValueMatcher<Expression> {
        let chain_matcher = build(ValueMatcher::new());
        self.with_rule(move |exp, captures: &mut Captures| {
            if exp.as_postfix().is_none() {
                return false;
            }
            let chain = PostfixChainInverter::invert(exp);
            chain_matcher.evaluate(&chain, captures)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::BlockExpression;
    use crate::types::SwiftType;

    fn a() -> Expression {
        Expression::identifier("a")
    }

    #[test]
    fn ident_matches_name() {
        assert!(ident("a").matches(&a()));
        assert!(!ident("b").matches(&a()));
        assert!(!ident("a").matches(&Expression::int(1)));
    }

    #[test]
    fn member_and_method_calls() {
        let exp = a().dot("b").call(Vec::new());
        assert!(ident("a").call_method("b").matches(&exp));
        assert!(ident("a").dot("b").matches(&a().dot("b")));
        assert!(!ident("a").dot("c").matches(&a().dot("b")));
        assert!(!ident("a").call_method("b").matches(&a().dot("b")));
    }

    #[test]
    fn call_compares_arguments() {
        let args = vec![FunctionArgument::unlabeled(Expression::int(1))];
        let exp = a().call(args.clone());
        assert!(ident("a").call(args).matches(&exp));
        assert!(!ident("a").call(Vec::new()).matches(&exp));
    }

    #[test]
    fn subscript_with_nested_matcher() {
        let exp = a().sub(Expression::identifier("i"));
        assert!(ident("a").subscript(ident("i")).matches(&exp));
        assert!(!ident("a").subscript(Expression::int(0)).matches(&exp));
    }

    #[test]
    fn binary_unary_and_assignment() {
        let sum = Expression::binary(a(), SwiftOperator::Add, Expression::int(1));
        assert!(ident("a").binary(SwiftOperator::Add, Expression::int(1)).matches(&sum));
        assert!(binary(MatchRule::Any, SwiftOperator::Add, MatchRule::Any).matches(&sum));
        assert!(!binary(MatchRule::Any, SwiftOperator::Subtract, MatchRule::Any).matches(&sum));

        let neg = Expression::unary(SwiftOperator::Negate, a());
        assert!(unary(SwiftOperator::Negate, ident("a")).matches(&neg));

        let assign = Expression::assignment(a(), SwiftOperator::Assign, Expression::nil());
        assert!(ident("a").assignment(SwiftOperator::Assign, nil_literal()).matches(&assign));
    }

    #[test]
    fn nil_check_forms() {
        let matcher = nil_check(&a());
        assert!(matcher.matches(&Expression::binary(a(), SwiftOperator::Unequals, Expression::nil())));
        assert!(matcher.matches(&Expression::binary(Expression::nil(), SwiftOperator::Unequals, a())));
        assert!(matcher.matches(&a()));
        assert!(!matcher.matches(&Expression::binary(a(), SwiftOperator::Equals, Expression::nil())));
    }

    #[test]
    fn nil_compare_forms() {
        let matcher = nil_compare(&a());
        assert!(matcher.matches(&Expression::binary(a(), SwiftOperator::Equals, Expression::nil())));
        assert!(matcher.matches(&Expression::binary(Expression::nil(), SwiftOperator::Equals, a())));
        assert!(matcher.matches(&Expression::unary(SwiftOperator::Negate, a())));
        assert!(!matcher.matches(&a()));
    }

    #[test]
    fn find_any_searches_descendants_but_not_blocks() {
        let nested = Expression::binary(
            Expression::int(1),
            SwiftOperator::Add,
            Expression::parens(a().dot("count")),
        );
        assert!(find_any(ident("a")).matches(&nested));
        assert!(!find_any(ident("b")).matches(&nested));

        let block = Expression::Block(BlockExpression {
            parameters: Vec::new(),
            return_type: SwiftType::void(),
            body: vec![a()],
        });
        assert!(!find_any(ident("a")).matches(&block));
    }

    #[test]
    fn find_any_returns_captures() {
        let exp = Expression::parens(a());
        let captures = find_any(ident("a").bind("found")).match_captures(&exp).unwrap();
        assert_eq!(captures.expression("found"), Some(&a()));
    }

    #[test]
    fn inverted_chain_matching() {
        let exp = a().dot("b").call(Vec::new()).sub(Expression::int(0));
        let matcher = ValueMatcher::<Expression>::new().inverted(|chain| {
            chain
                .base(ident("a"))
                .op_count(3)
                .op(0, PostfixMatcher::member_named("b"))
                .op(1, PostfixMatcher::is_function_call())
                .op(2, PostfixMatcher::is_subscript())
        });
        assert!(matcher.matches(&exp));
        assert!(!matcher.matches(&a()));

        let wrong = ValueMatcher::<Expression>::new()
            .inverted(|chain| chain.op(0, PostfixMatcher::is_subscript()));
        assert!(!wrong.matches(&exp));
    }

    #[test]
    fn bind_on_nested_matcher() {
        let exp = a().dot("b");
        let postfix = ValueMatcher::new().field(
            |p: &PostfixExpression| p.exp.as_ref(),
            ValueMatcher::new().bind("base"),
        );
        let matcher = ValueMatcher::<Expression>::new().narrow(Expression::as_postfix, postfix);
        let captures = matcher.match_captures(&exp).unwrap();
        assert_eq!(captures.expression("base"), Some(&a()));
    }
}
