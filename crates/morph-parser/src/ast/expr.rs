//! C / Objective-C expressions, as found in `#define` bodies.

use std::fmt;

use super::ObjcType;

#[derive(Debug, Clone, PartialEq)]
pub enum ObjcLiteral {
    /// Integer spelling with base prefix and suffixes, e.g. `0x1Fu`.
    Int(String),
    /// Floating spelling with suffix, e.g. `1.5f`.
    Float(String),
    /// `true`, `false`, `YES`, `NO`
    Bool(bool),
    /// String contents without quotes or the `@` prefix.
    String(String),
    /// Character contents without quotes.
    Char(String),
    /// `nil`, `Nil`, `NULL`
    Nil,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjcUnaryOp {
    Neg,
    Plus,
    Not,
    BitNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjcBinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Shl,
    Shr,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Eq,
    NotEq,
    BitAnd,
    BitXor,
    BitOr,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjcAssignOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
}

/// An argument of a message send.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageArgument {
    /// `None` for the first keyword (it names the selector) and for extra
    /// comma-separated variadic arguments.
    pub label: Option<String>,
    pub value: ObjcExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjcExpr {
    Literal(ObjcLiteral),
    Ident(String),
    Paren(Box<ObjcExpr>),
    Cast {
        ty: ObjcType,
        expr: Box<ObjcExpr>,
    },
    SizeofType(ObjcType),
    SizeofExpr(Box<ObjcExpr>),
    Unary {
        op: ObjcUnaryOp,
        expr: Box<ObjcExpr>,
    },
    Binary {
        op: ObjcBinaryOp,
        lhs: Box<ObjcExpr>,
        rhs: Box<ObjcExpr>,
    },
    Assign {
        op: ObjcAssignOp,
        lhs: Box<ObjcExpr>,
        rhs: Box<ObjcExpr>,
    },
    Ternary {
        condition: Box<ObjcExpr>,
        then: Box<ObjcExpr>,
        otherwise: Box<ObjcExpr>,
    },
    /// `base.member`, or `base->member` when `arrow` is set.
    Member {
        base: Box<ObjcExpr>,
        member: String,
        arrow: bool,
    },
    Call {
        callee: Box<ObjcExpr>,
        args: Vec<ObjcExpr>,
    },
    Subscript {
        base: Box<ObjcExpr>,
        index: Box<ObjcExpr>,
    },
    /// `[receiver selector]` or `[receiver selector:arg label:arg, extra]`.
    Message {
        receiver: Box<ObjcExpr>,
        selector: String,
        args: Vec<MessageArgument>,
    },
}

impl ObjcExpr {
    /// Visit this expression and every subexpression, pre-order.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a ObjcExpr)) {
        f(self);
        match self {
            ObjcExpr::Literal(_) | ObjcExpr::Ident(_) | ObjcExpr::SizeofType(_) => {}
            ObjcExpr::Paren(inner)
            | ObjcExpr::Cast { expr: inner, .. }
            | ObjcExpr::SizeofExpr(inner)
            | ObjcExpr::Unary { expr: inner, .. }
            | ObjcExpr::Member { base: inner, .. } => inner.walk(f),
            ObjcExpr::Binary { lhs, rhs, .. } | ObjcExpr::Assign { lhs, rhs, .. } => {
                lhs.walk(f);
                rhs.walk(f);
            }
            ObjcExpr::Ternary {
                condition,
                then,
                otherwise,
            } => {
                condition.walk(f);
                then.walk(f);
                otherwise.walk(f);
            }
            ObjcExpr::Call { callee, args } => {
                callee.walk(f);
                for arg in args {
                    arg.walk(f);
                }
            }
            ObjcExpr::Subscript { base, index } => {
                base.walk(f);
                index.walk(f);
            }
            ObjcExpr::Message { receiver, args, .. } => {
                receiver.walk(f);
                for arg in args {
                    arg.value.walk(f);
                }
            }
        }
    }
}

impl fmt::Display for ObjcBinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ObjcBinaryOp::Add => "+",
            ObjcBinaryOp::Sub => "-",
            ObjcBinaryOp::Mul => "*",
            ObjcBinaryOp::Div => "/",
            ObjcBinaryOp::Rem => "%",
            ObjcBinaryOp::Shl => "<<",
            ObjcBinaryOp::Shr => ">>",
            ObjcBinaryOp::Lt => "<",
            ObjcBinaryOp::Gt => ">",
            ObjcBinaryOp::LtEq => "<=",
            ObjcBinaryOp::GtEq => ">=",
            ObjcBinaryOp::Eq => "==",
            ObjcBinaryOp::NotEq => "!=",
            ObjcBinaryOp::BitAnd => "&",
            ObjcBinaryOp::BitXor => "^",
            ObjcBinaryOp::BitOr => "|",
            ObjcBinaryOp::And => "&&",
            ObjcBinaryOp::Or => "||",
        };
        write!(f, "{s}")
    }
}
