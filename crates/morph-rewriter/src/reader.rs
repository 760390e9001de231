//! Objective-C expression to Swift expression conversion.

use morph_ast::{Constant, Expression, FunctionArgument, SwiftOperator};
use morph_parser::ast::expr::{ObjcAssignOp, ObjcBinaryOp, ObjcLiteral, ObjcUnaryOp};
use morph_parser::ObjcExpr;

use crate::type_mapper::TypeMapper;

/// Reads parsed C/Objective-C expressions as Swift expressions.
///
/// Message sends become method calls (`[a setObject:x forKey:k]` reads as
/// `a.setObject(x, forKey: k)`); `->` becomes member access; cast and
/// `sizeof` types go through the [`TypeMapper`].
#[derive(Clone, Debug, Default)]
pub struct SwiftExprReader {
    mapper: TypeMapper,
}

impl SwiftExprReader {
    pub fn new(mapper: TypeMapper) -> Self {
        Self { mapper }
    }

    /// `None` for literals that have no Swift spelling, such as an
    /// out-of-range integer.
    pub fn read(&self, expr: &ObjcExpr) -> Option<Expression> {
        let exp = match expr {
            ObjcExpr::Literal(literal) => Expression::Constant(read_literal(literal)?),
            ObjcExpr::Ident(name) => Expression::identifier(name.as_str()),
            ObjcExpr::Paren(inner) => Expression::parens(self.read(inner)?),
            ObjcExpr::Cast { ty, expr } => Expression::cast(self.read(expr)?, self.mapper.unwrapped(ty)),
            ObjcExpr::SizeofType(ty) => Expression::sizeof_type(self.mapper.unwrapped(ty)),
            ObjcExpr::SizeofExpr(inner) => Expression::sizeof_expression(self.read(inner)?),
            ObjcExpr::Unary { op, expr } => Expression::unary(unary_operator(*op), self.read(expr)?),
            ObjcExpr::Binary { op, lhs, rhs } => {
                Expression::binary(self.read(lhs)?, binary_operator(*op), self.read(rhs)?)
            }
            ObjcExpr::Assign { op, lhs, rhs } => {
                Expression::assignment(self.read(lhs)?, assignment_operator(*op), self.read(rhs)?)
            }
            ObjcExpr::Ternary {
                condition,
                then,
                otherwise,
            } => Expression::ternary(self.read(condition)?, self.read(then)?, self.read(otherwise)?),
            ObjcExpr::Member { base, member, .. } => self.read(base)?.dot(member.as_str()),
            ObjcExpr::Call { callee, args } => {
                let args = args
                    .iter()
                    .map(|arg| self.read(arg).map(FunctionArgument::unlabeled))
                    .collect::<Option<Vec<_>>>()?;
                self.read(callee)?.call(args)
            }
            ObjcExpr::Subscript { base, index } => self.read(base)?.sub(self.read(index)?),
            ObjcExpr::Message {
                receiver,
                selector,
                args,
            } => {
                let method = selector.split(':').next().filter(|name| !name.is_empty())?;
                let args = args
                    .iter()
                    .map(|arg| {
                        let value = self.read(&arg.value)?;
                        Some(match &arg.label {
                            Some(label) => FunctionArgument::labeled(label.as_str(), value),
                            None => FunctionArgument::unlabeled(value),
                        })
                    })
                    .collect::<Option<Vec<_>>>()?;
                self.read(receiver)?.dot(method).call(args)
            }
        };
        Some(exp)
    }
}

fn read_literal(literal: &ObjcLiteral) -> Option<Constant> {
    let constant = match literal {
        ObjcLiteral::Int(text) => read_integer(text)?,
        ObjcLiteral::Float(text) => {
            let digits = text.trim_end_matches(&['f', 'F', 'd', 'D', 'l', 'L'][..]);
            Constant::Float(digits.parse().ok()?)
        }
        ObjcLiteral::Bool(value) => Constant::Boolean(*value),
        ObjcLiteral::String(value) => Constant::String(value.clone()),
        ObjcLiteral::Char(value) => Constant::Int(u64::from(read_char(value)?)),
        ObjcLiteral::Nil => Constant::Nil,
    };
    Some(constant)
}

fn read_integer(text: &str) -> Option<Constant> {
    let digits = text.trim_end_matches(&['u', 'U', 'l', 'L'][..]);
    if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16).ok().map(Constant::Hexadecimal);
    }
    if let Some(bin) = digits.strip_prefix("0b").or_else(|| digits.strip_prefix("0B")) {
        return u64::from_str_radix(bin, 2).ok().map(Constant::Binary);
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return u64::from_str_radix(&digits[1..], 8).ok().map(Constant::Octal);
    }
    digits.parse().ok().map(Constant::Int)
}

/// Code of a one-character literal body, with the common escapes.
fn read_char(body: &str) -> Option<u32> {
    let mut chars = body.chars();
    let code = match (chars.next()?, chars.next()) {
        ('\\', Some(escaped)) => match escaped {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            '\\' => '\\',
            '\'' => '\'',
            '"' => '"',
            _ => return None,
        },
        (c, None) => c,
        _ => return None,
    };
    if chars.next().is_some() {
        return None;
    }
    Some(code as u32)
}

fn unary_operator(op: ObjcUnaryOp) -> SwiftOperator {
    match op {
        ObjcUnaryOp::Neg => SwiftOperator::Subtract,
        ObjcUnaryOp::Plus => SwiftOperator::Add,
        ObjcUnaryOp::Not => SwiftOperator::Negate,
        ObjcUnaryOp::BitNot => SwiftOperator::BitwiseNot,
    }
}

fn binary_operator(op: ObjcBinaryOp) -> SwiftOperator {
    match op {
        ObjcBinaryOp::Add => SwiftOperator::Add,
        ObjcBinaryOp::Sub => SwiftOperator::Subtract,
        ObjcBinaryOp::Mul => SwiftOperator::Multiply,
        ObjcBinaryOp::Div => SwiftOperator::Divide,
        ObjcBinaryOp::Rem => SwiftOperator::Mod,
        ObjcBinaryOp::Shl => SwiftOperator::BitwiseShiftLeft,
        ObjcBinaryOp::Shr => SwiftOperator::BitwiseShiftRight,
        ObjcBinaryOp::Lt => SwiftOperator::LessThan,
        ObjcBinaryOp::Gt => SwiftOperator::GreaterThan,
        ObjcBinaryOp::LtEq => SwiftOperator::LessThanOrEqual,
        ObjcBinaryOp::GtEq => SwiftOperator::GreaterThanOrEqual,
        ObjcBinaryOp::Eq => SwiftOperator::Equals,
        ObjcBinaryOp::NotEq => SwiftOperator::Unequals,
        ObjcBinaryOp::BitAnd => SwiftOperator::BitwiseAnd,
        ObjcBinaryOp::BitXor => SwiftOperator::BitwiseXor,
        ObjcBinaryOp::BitOr => SwiftOperator::BitwiseOr,
        ObjcBinaryOp::And => SwiftOperator::And,
        ObjcBinaryOp::Or => SwiftOperator::Or,
    }
}

fn assignment_operator(op: ObjcAssignOp) -> SwiftOperator {
    match op {
        ObjcAssignOp::Assign => SwiftOperator::Assign,
        ObjcAssignOp::AddAssign => SwiftOperator::AddAssign,
        ObjcAssignOp::SubAssign => SwiftOperator::SubtractAssign,
        ObjcAssignOp::MulAssign => SwiftOperator::MultiplyAssign,
        ObjcAssignOp::DivAssign => SwiftOperator::DivideAssign,
    }
}
