//! Swift expression tree.
//!
//! Every expression kind is its own struct wrapped by a variant of
//! [`Expression`], so a matcher can narrow to exactly one kind with an
//! `as_*` accessor and then inspect that kind's fields.

use std::fmt;

use crate::types::SwiftType;

// ── Operators ──────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SwiftOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Mod,
    AddAssign,
    SubtractAssign,
    MultiplyAssign,
    DivideAssign,
    /// Logical `!`.
    Negate,
    And,
    Or,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    BitwiseNot,
    BitwiseShiftLeft,
    BitwiseShiftRight,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Assign,
    Equals,
    Unequals,
    NullCoalesce,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperatorCategory {
    Arithmetic,
    Logical,
    Bitwise,
    Comparison,
    Assignment,
    NullCoalesce,
}

impl SwiftOperator {
    pub fn category(self) -> OperatorCategory {
        use SwiftOperator::*;
        match self {
            Add | Subtract | Multiply | Divide | Mod => OperatorCategory::Arithmetic,
            Negate | And | Or => OperatorCategory::Logical,
            BitwiseAnd | BitwiseOr | BitwiseXor | BitwiseNot | BitwiseShiftLeft
            | BitwiseShiftRight => OperatorCategory::Bitwise,
            LessThan | LessThanOrEqual | GreaterThan | GreaterThanOrEqual | Equals | Unequals => {
                OperatorCategory::Comparison
            }
            Assign | AddAssign | SubtractAssign | MultiplyAssign | DivideAssign => {
                OperatorCategory::Assignment
            }
            NullCoalesce => OperatorCategory::NullCoalesce,
        }
    }

    pub fn symbol(self) -> &'static str {
        use SwiftOperator::*;
        match self {
            Add => "+",
            Subtract => "-",
            Multiply => "*",
            Divide => "/",
            Mod => "%",
            AddAssign => "+=",
            SubtractAssign => "-=",
            MultiplyAssign => "*=",
            DivideAssign => "/=",
            Negate => "!",
            And => "&&",
            Or => "||",
            BitwiseAnd => "&",
            BitwiseOr => "|",
            BitwiseXor => "^",
            BitwiseNot => "~",
            BitwiseShiftLeft => "<<",
            BitwiseShiftRight => ">>",
            LessThan => "<",
            LessThanOrEqual => "<=",
            GreaterThan => ">",
            GreaterThanOrEqual => ">=",
            Assign => "=",
            Equals => "==",
            Unequals => "!=",
            NullCoalesce => "??",
        }
    }
}

impl fmt::Display for SwiftOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

// ── Constants ──────────────────────────────────────────────────────────

/// A literal value. Integer variants remember the base they were written in.
#[derive(Clone, Debug, PartialEq)]
pub enum Constant {
    Int(u64),
    Binary(u64),
    Octal(u64),
    Hexadecimal(u64),
    Float(f64),
    Boolean(bool),
    String(String),
    Nil,
}

impl Constant {
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Constant::Int(_) | Constant::Binary(_) | Constant::Octal(_) | Constant::Hexadecimal(_)
        )
    }
}

impl From<bool> for Constant {
    fn from(value: bool) -> Self {
        Constant::Boolean(value)
    }
}

impl From<&str> for Constant {
    fn from(value: &str) -> Self {
        Constant::String(value.to_string())
    }
}

impl From<String> for Constant {
    fn from(value: String) -> Self {
        Constant::String(value)
    }
}

impl From<f64> for Constant {
    fn from(value: f64) -> Self {
        Constant::Float(value)
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Int(value) => write!(f, "{value}"),
            Constant::Binary(value) => write!(f, "0b{value:b}"),
            Constant::Octal(value) => write!(f, "0o{value:o}"),
            Constant::Hexadecimal(value) => write!(f, "0x{value:X}"),
            Constant::Float(value) if value.fract() == 0.0 && value.is_finite() => {
                write!(f, "{value:.1}")
            }
            Constant::Float(value) => write!(f, "{value}"),
            Constant::Boolean(value) => write!(f, "{value}"),
            Constant::String(value) => write!(f, "{value:?}"),
            Constant::Nil => write!(f, "nil"),
        }
    }
}

// ── Expression kinds ───────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionArgument {
    pub label: Option<String>,
    pub expression: Expression,
}

impl FunctionArgument {
    pub fn unlabeled(expression: Expression) -> Self {
        Self {
            label: None,
            expression,
        }
    }

    pub fn labeled(label: impl Into<String>, expression: Expression) -> Self {
        Self {
            label: Some(label.into()),
            expression,
        }
    }
}

/// The operation half of a postfix expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Postfix {
    Member(String),
    FunctionCall(Vec<FunctionArgument>),
    Subscript(Box<Expression>),
}

impl Postfix {
    pub fn as_member(&self) -> Option<&String> {
        match self {
            Postfix::Member(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_function_call(&self) -> Option<&Vec<FunctionArgument>> {
        match self {
            Postfix::FunctionCall(args) => Some(args),
            _ => None,
        }
    }

    pub fn as_subscript(&self) -> Option<&Expression> {
        match self {
            Postfix::Subscript(index) => Some(index.as_ref()),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PostfixExpression {
    pub exp: Box<Expression>,
    pub op: Postfix,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BinaryExpression {
    pub lhs: Box<Expression>,
    pub op: SwiftOperator,
    pub rhs: Box<Expression>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnaryExpression {
    pub op: SwiftOperator,
    pub exp: Box<Expression>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AssignmentExpression {
    pub lhs: Box<Expression>,
    pub op: SwiftOperator,
    pub rhs: Box<Expression>,
}

/// `exp as? ty`
#[derive(Clone, Debug, PartialEq)]
pub struct CastExpression {
    pub exp: Box<Expression>,
    pub ty: SwiftType,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SizeofExpression {
    /// `MemoryLayout<T>.size`
    Type(SwiftType),
    /// `MemoryLayout.size(ofValue: exp)`
    Expression(Box<Expression>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct TernaryExpression {
    pub condition: Box<Expression>,
    pub if_true: Box<Expression>,
    pub if_false: Box<Expression>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BlockParameter {
    pub name: String,
    pub ty: SwiftType,
}

/// A closure literal. Its body is a list of expression statements.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockExpression {
    pub parameters: Vec<BlockParameter>,
    pub return_type: SwiftType,
    pub body: Vec<Expression>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    Constant(Constant),
    Identifier(String),
    Postfix(PostfixExpression),
    Binary(BinaryExpression),
    Unary(UnaryExpression),
    Assignment(AssignmentExpression),
    Parens(Box<Expression>),
    Cast(CastExpression),
    Sizeof(SizeofExpression),
    Ternary(TernaryExpression),
    Block(BlockExpression),
}

// ── Construction ───────────────────────────────────────────────────────

impl Expression {
    pub fn constant(constant: impl Into<Constant>) -> Expression {
        Expression::Constant(constant.into())
    }

    pub fn int(value: u64) -> Expression {
        Expression::Constant(Constant::Int(value))
    }

    pub fn nil() -> Expression {
        Expression::Constant(Constant::Nil)
    }

    pub fn identifier(name: impl Into<String>) -> Expression {
        Expression::Identifier(name.into())
    }

    pub fn binary(lhs: Expression, op: SwiftOperator, rhs: Expression) -> Expression {
        Expression::Binary(BinaryExpression {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        })
    }

    pub fn unary(op: SwiftOperator, exp: Expression) -> Expression {
        Expression::Unary(UnaryExpression {
            op,
            exp: Box::new(exp),
        })
    }

    pub fn assignment(lhs: Expression, op: SwiftOperator, rhs: Expression) -> Expression {
        Expression::Assignment(AssignmentExpression {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        })
    }

    pub fn parens(exp: Expression) -> Expression {
        Expression::Parens(Box::new(exp))
    }

    pub fn cast(exp: Expression, ty: SwiftType) -> Expression {
        Expression::Cast(CastExpression {
            exp: Box::new(exp),
            ty,
        })
    }

    pub fn sizeof_type(ty: SwiftType) -> Expression {
        Expression::Sizeof(SizeofExpression::Type(ty))
    }

    pub fn sizeof_expression(exp: Expression) -> Expression {
        Expression::Sizeof(SizeofExpression::Expression(Box::new(exp)))
    }

    pub fn ternary(condition: Expression, if_true: Expression, if_false: Expression) -> Expression {
        Expression::Ternary(TernaryExpression {
            condition: Box::new(condition),
            if_true: Box::new(if_true),
            if_false: Box::new(if_false),
        })
    }

    pub fn postfix(self, op: Postfix) -> Expression {
        Expression::Postfix(PostfixExpression {
            exp: Box::new(self),
            op,
        })
    }

    /// `self.member`
    pub fn dot(self, member: impl Into<String>) -> Expression {
        self.postfix(Postfix::Member(member.into()))
    }

    /// `self(args)`
    pub fn call(self, args: Vec<FunctionArgument>) -> Expression {
        self.postfix(Postfix::FunctionCall(args))
    }

    /// `self[index]`
    pub fn sub(self, index: Expression) -> Expression {
        self.postfix(Postfix::Subscript(Box::new(index)))
    }

    // ── Narrowing ──────────────────────────────────────────────────────

    pub fn as_constant(&self) -> Option<&Constant> {
        match self {
            Expression::Constant(constant) => Some(constant),
            _ => None,
        }
    }

    pub fn as_identifier(&self) -> Option<&String> {
        match self {
            Expression::Identifier(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_postfix(&self) -> Option<&PostfixExpression> {
        match self {
            Expression::Postfix(postfix) => Some(postfix),
            _ => None,
        }
    }

    pub fn as_binary(&self) -> Option<&BinaryExpression> {
        match self {
            Expression::Binary(binary) => Some(binary),
            _ => None,
        }
    }

    pub fn as_unary(&self) -> Option<&UnaryExpression> {
        match self {
            Expression::Unary(unary) => Some(unary),
            _ => None,
        }
    }

    pub fn as_assignment(&self) -> Option<&AssignmentExpression> {
        match self {
            Expression::Assignment(assignment) => Some(assignment),
            _ => None,
        }
    }

    pub fn as_cast(&self) -> Option<&CastExpression> {
        match self {
            Expression::Cast(cast) => Some(cast),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<&BlockExpression> {
        match self {
            Expression::Block(block) => Some(block),
            _ => None,
        }
    }

    /// Direct subexpressions in source order. Block bodies are included
    /// only when `inspect_blocks` is set.
    pub fn sub_expressions(&self, inspect_blocks: bool) -> Vec<&Expression> {
        match self {
            Expression::Constant(_) | Expression::Identifier(_) => Vec::new(),
            Expression::Postfix(postfix) => {
                let mut out = vec![postfix.exp.as_ref()];
                match &postfix.op {
                    Postfix::Member(_) => {}
                    Postfix::FunctionCall(args) => out.extend(args.iter().map(|arg| &arg.expression)),
                    Postfix::Subscript(index) => out.push(index.as_ref()),
                }
                out
            }
            Expression::Binary(BinaryExpression { lhs, rhs, .. })
            | Expression::Assignment(AssignmentExpression { lhs, rhs, .. }) => {
                vec![lhs.as_ref(), rhs.as_ref()]
            }
            Expression::Unary(unary) => vec![unary.exp.as_ref()],
            Expression::Parens(inner) => vec![inner.as_ref()],
            Expression::Cast(cast) => vec![cast.exp.as_ref()],
            Expression::Sizeof(SizeofExpression::Type(_)) => Vec::new(),
            Expression::Sizeof(SizeofExpression::Expression(exp)) => vec![exp.as_ref()],
            Expression::Ternary(ternary) => {
                vec![
                    ternary.condition.as_ref(),
                    ternary.if_true.as_ref(),
                    ternary.if_false.as_ref(),
                ]
            }
            Expression::Block(block) if inspect_blocks => block.body.iter().collect(),
            Expression::Block(_) => Vec::new(),
        }
    }
}

impl From<Constant> for Expression {
    fn from(constant: Constant) -> Self {
        Expression::Constant(constant)
    }
}

// ── Rendering ──────────────────────────────────────────────────────────

impl fmt::Display for FunctionArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{label}: {}", self.expression),
            None => write!(f, "{}", self.expression),
        }
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Constant(constant) => write!(f, "{constant}"),
            Expression::Identifier(name) => write!(f, "{name}"),
            Expression::Postfix(postfix) => {
                write!(f, "{}", postfix.exp)?;
                match &postfix.op {
                    Postfix::Member(name) => write!(f, ".{name}"),
                    Postfix::FunctionCall(args) => {
                        write!(f, "(")?;
                        write_list(f, args)?;
                        write!(f, ")")
                    }
                    Postfix::Subscript(index) => write!(f, "[{index}]"),
                }
            }
            Expression::Binary(binary) => write!(f, "{} {} {}", binary.lhs, binary.op, binary.rhs),
            Expression::Unary(unary) => write!(f, "{}{}", unary.op, unary.exp),
            Expression::Assignment(assignment) => {
                write!(f, "{} {} {}", assignment.lhs, assignment.op, assignment.rhs)
            }
            Expression::Parens(inner) => write!(f, "({inner})"),
            Expression::Cast(cast) => write!(f, "{} as? {}", cast.exp, cast.ty),
            Expression::Sizeof(SizeofExpression::Type(ty)) => write!(f, "MemoryLayout<{ty}>.size"),
            Expression::Sizeof(SizeofExpression::Expression(exp)) => {
                write!(f, "MemoryLayout.size(ofValue: {exp})")
            }
            Expression::Ternary(ternary) => write!(
                f,
                "{} ? {} : {}",
                ternary.condition, ternary.if_true, ternary.if_false
            ),
            Expression::Block(block) => {
                write!(f, "{{ (")?;
                for (i, param) in block.parameters.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", param.name, param.ty)?;
                }
                write!(f, ") -> {} in", block.return_type)?;
                for exp in &block.body {
                    write!(f, " {exp};")?;
                }
                write!(f, " }}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_postfix_chain() {
        let exp = Expression::identifier("a")
            .dot("b")
            .call(vec![FunctionArgument::labeled("forKey", Expression::constant("k"))])
            .sub(Expression::int(0));
        assert_eq!(exp.to_string(), r#"a.b(forKey: "k")[0]"#);
    }

    #[test]
    fn renders_constants_in_their_base() {
        assert_eq!(Constant::Hexadecimal(31).to_string(), "0x1F");
        assert_eq!(Constant::Octal(8).to_string(), "0o10");
        assert_eq!(Constant::Binary(5).to_string(), "0b101");
        assert_eq!(Constant::Float(1.0).to_string(), "1.0");
        assert_eq!(Constant::Float(1.5).to_string(), "1.5");
    }

    #[test]
    fn renders_cast_and_sizeof() {
        let cast = Expression::cast(Expression::int(1), SwiftType::type_name("CUnsignedInt"));
        assert_eq!(cast.to_string(), "1 as? CUnsignedInt");
        let sizeof = Expression::sizeof_type(SwiftType::type_name("CInt"));
        assert_eq!(sizeof.to_string(), "MemoryLayout<CInt>.size");
    }

    #[test]
    fn operator_categories() {
        assert_eq!(SwiftOperator::Add.category(), OperatorCategory::Arithmetic);
        assert_eq!(SwiftOperator::BitwiseShiftLeft.category(), OperatorCategory::Bitwise);
        assert_eq!(SwiftOperator::Unequals.category(), OperatorCategory::Comparison);
        assert_eq!(SwiftOperator::AddAssign.category(), OperatorCategory::Assignment);
    }

    #[test]
    fn block_bodies_are_opt_in_children() {
        let block = Expression::Block(BlockExpression {
            parameters: Vec::new(),
            return_type: SwiftType::void(),
            body: vec![Expression::identifier("x")],
        });
        assert!(block.sub_expressions(false).is_empty());
        assert_eq!(block.sub_expressions(true).len(), 1);
    }
}
