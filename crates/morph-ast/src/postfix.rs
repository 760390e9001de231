//! Postfix-chain inversion.
//!
//! `a.b().c[0]` is stored right-associated, as
//! `Subscript(Member(Call(Member(a, b)), c), 0)`. Passes that ask "is this
//! a call of `b` on `a`, followed by ..." want the operations in the order
//! they are written. [`PostfixChainInverter::invert`] produces exactly that
//! and [`PostfixChain::recompose`] undoes it.

use crate::expr::{Expression, Postfix};

/// A postfix expression flattened into its base and left-to-right
/// operations.
#[derive(Clone, Debug, PartialEq)]
pub struct PostfixChain {
    pub base: Expression,
    pub ops: Vec<Postfix>,
}

impl PostfixChain {
    /// Rebuild the right-associated expression.
    pub fn recompose(&self) -> Expression {
        self.ops
            .iter()
            .cloned()
            .fold(self.base.clone(), |exp, op| exp.postfix(op))
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

pub struct PostfixChainInverter;

impl PostfixChainInverter {
    /// Flatten `expression`. A non-postfix expression becomes a chain with
    /// no operations.
    pub fn invert(expression: &Expression) -> PostfixChain {
        let mut ops = Vec::new();
        let mut current = expression;
        while let Expression::Postfix(postfix) = current {
            ops.push(postfix.op.clone());
            current = postfix.exp.as_ref();
        }
        ops.reverse();
        PostfixChain {
            base: current.clone(),
            ops,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::FunctionArgument;

    #[test]
    fn operations_are_in_source_order() {
        let exp = Expression::identifier("a")
            .dot("b")
            .call(vec![FunctionArgument::unlabeled(Expression::int(1))])
            .sub(Expression::int(0));
        let chain = PostfixChainInverter::invert(&exp);
        assert_eq!(chain.base, Expression::identifier("a"));
        assert_eq!(chain.ops.len(), 3);
        assert_eq!(chain.ops[0], Postfix::Member("b".into()));
        assert!(matches!(chain.ops[1], Postfix::FunctionCall(_)));
        assert!(matches!(chain.ops[2], Postfix::Subscript(_)));
    }

    #[test]
    fn non_postfix_is_its_own_base() {
        let exp = Expression::int(1);
        let chain = PostfixChainInverter::invert(&exp);
        assert!(chain.is_empty());
        assert_eq!(chain.recompose(), exp);
    }

    #[test]
    fn postfix_under_parens_stays_in_the_base() {
        let inner = Expression::identifier("a").dot("b");
        let exp = Expression::parens(inner).dot("c");
        let chain = PostfixChainInverter::invert(&exp);
        assert_eq!(chain.ops, vec![Postfix::Member("c".into())]);
        assert!(matches!(chain.base, Expression::Parens(_)));
    }
}
