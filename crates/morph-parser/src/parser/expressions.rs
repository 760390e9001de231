//! Pratt parser for C / Objective-C expressions found in macro bodies.
//!
//! Covers literals, identifiers, grouping, casts, `sizeof`, prefix
//! operators, the C binary operator ladder, assignment, the ternary,
//! postfix member/call/subscript and `[receiver selector:...]` message sends.

use morph_common::token::TokenKind;

use crate::ast::expr::{
    MessageArgument, ObjcAssignOp, ObjcBinaryOp, ObjcExpr, ObjcLiteral, ObjcUnaryOp,
};
use crate::ast::TypeNameNode;
use crate::error::SyntaxError;

use super::Parser;

// ── Binding Power Tables ───────────────────────────────────────────────

/// Returns (left_bp, right_bp) for infix operators.
///
/// Left < right means left-associative.
/// Left > right means right-associative.
fn infix_binding_power(op: TokenKind) -> Option<(u8, u8)> {
    match op {
        // Assignment: right-associative
        TokenKind::Eq
        | TokenKind::PlusEq
        | TokenKind::MinusEq
        | TokenKind::StarEq
        | TokenKind::SlashEq => Some((2, 1)),

        // Ternary: right-associative
        TokenKind::Question => Some((4, 3)),

        TokenKind::PipePipe => Some((5, 6)),
        TokenKind::AmpAmp => Some((7, 8)),
        TokenKind::Pipe => Some((9, 10)),
        TokenKind::Caret => Some((11, 12)),
        TokenKind::Amp => Some((13, 14)),
        TokenKind::EqEq | TokenKind::NotEq => Some((15, 16)),
        TokenKind::Lt | TokenKind::Gt | TokenKind::LtEq | TokenKind::GtEq => Some((17, 18)),
        TokenKind::Shl | TokenKind::Shr => Some((19, 20)),
        TokenKind::Plus | TokenKind::Minus => Some((21, 22)),
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Some((23, 24)),

        _ => None,
    }
}

fn prefix_binding_power(op: TokenKind) -> Option<((), u8)> {
    match op {
        TokenKind::Minus | TokenKind::Plus | TokenKind::Bang | TokenKind::Tilde => Some(((), 25)),
        _ => None,
    }
}

/// Postfix operations (call, member access, subscript) bind tighter than
/// every prefix and infix operator.
const POSTFIX_BP: u8 = 27;

/// Operand binding power of casts and `sizeof expr`.
const CAST_BP: u8 = 25;

/// Type words after which `(T)-x` reads as a cast rather than a subtraction.
const SCALAR_KEYWORDS: &[&str] = &[
    "char", "short", "int", "long", "float", "double", "signed", "unsigned", "void", "bool",
    "_Bool", "BOOL", "id",
];

fn binary_op(kind: TokenKind) -> Option<ObjcBinaryOp> {
    let op = match kind {
        TokenKind::Plus => ObjcBinaryOp::Add,
        TokenKind::Minus => ObjcBinaryOp::Sub,
        TokenKind::Star => ObjcBinaryOp::Mul,
        TokenKind::Slash => ObjcBinaryOp::Div,
        TokenKind::Percent => ObjcBinaryOp::Rem,
        TokenKind::Shl => ObjcBinaryOp::Shl,
        TokenKind::Shr => ObjcBinaryOp::Shr,
        TokenKind::Lt => ObjcBinaryOp::Lt,
        TokenKind::Gt => ObjcBinaryOp::Gt,
        TokenKind::LtEq => ObjcBinaryOp::LtEq,
        TokenKind::GtEq => ObjcBinaryOp::GtEq,
        TokenKind::EqEq => ObjcBinaryOp::Eq,
        TokenKind::NotEq => ObjcBinaryOp::NotEq,
        TokenKind::Amp => ObjcBinaryOp::BitAnd,
        TokenKind::Caret => ObjcBinaryOp::BitXor,
        TokenKind::Pipe => ObjcBinaryOp::BitOr,
        TokenKind::AmpAmp => ObjcBinaryOp::And,
        TokenKind::PipePipe => ObjcBinaryOp::Or,
        _ => return None,
    };
    Some(op)
}

fn assign_op(kind: TokenKind) -> Option<ObjcAssignOp> {
    let op = match kind {
        TokenKind::Eq => ObjcAssignOp::Assign,
        TokenKind::PlusEq => ObjcAssignOp::AddAssign,
        TokenKind::MinusEq => ObjcAssignOp::SubAssign,
        TokenKind::StarEq => ObjcAssignOp::MulAssign,
        TokenKind::SlashEq => ObjcAssignOp::DivAssign,
        _ => return None,
    };
    Some(op)
}

fn unary_op(kind: TokenKind) -> Option<ObjcUnaryOp> {
    let op = match kind {
        TokenKind::Minus => ObjcUnaryOp::Neg,
        TokenKind::Plus => ObjcUnaryOp::Plus,
        TokenKind::Bang => ObjcUnaryOp::Not,
        TokenKind::Tilde => ObjcUnaryOp::BitNot,
        _ => return None,
    };
    Some(op)
}

/// Tokens that can start the operand of a cast.
fn starts_operand(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Ident
            | TokenKind::IntLiteral
            | TokenKind::FloatLiteral
            | TokenKind::StringLiteral
            | TokenKind::CharLiteral
            | TokenKind::LParen
            | TokenKind::LBracket
            | TokenKind::Bang
            | TokenKind::Tilde
    )
}

/// Whether `(ty)` followed by a sign must be a cast: `(int)-1` is, while
/// `(x)-1` is a subtraction.
fn casts_signed_operand(ty: &TypeNameNode) -> bool {
    let name = ty.ty.base_name();
    ty.ty.is_pointer() || name.contains(' ') || SCALAR_KEYWORDS.contains(&name)
}

/// Strip quotes (and an `@` prefix) from a string or char literal.
fn literal_contents(text: &str) -> &str {
    let text = text.strip_prefix('@').unwrap_or(text);
    if text.len() >= 2 {
        &text[1..text.len() - 1]
    } else {
        ""
    }
}

// ── Expression Entry Point ─────────────────────────────────────────────

impl<'src> Parser<'src> {
    pub(crate) fn expression(&mut self) -> Result<ObjcExpr, SyntaxError> {
        self.expr_bp(0)
    }

    /// Core Pratt loop: parse a prefix form, then fold postfix and infix
    /// operators while their binding power is at least `min_bp`.
    fn expr_bp(&mut self, min_bp: u8) -> Result<ObjcExpr, SyntaxError> {
        let mut lhs = self.lhs()?;

        loop {
            let current = self.current();

            // ── Postfix: call ──
            if current == TokenKind::LParen && POSTFIX_BP >= min_bp {
                let args = self.call_arguments()?;
                lhs = ObjcExpr::Call {
                    callee: Box::new(lhs),
                    args,
                };
                continue;
            }

            // ── Postfix: member access ──
            if matches!(current, TokenKind::Dot | TokenKind::Arrow) && POSTFIX_BP >= min_bp {
                self.advance();
                let member = self.identifier("Expected member name")?;
                lhs = ObjcExpr::Member {
                    base: Box::new(lhs),
                    member: member.name,
                    arrow: current == TokenKind::Arrow,
                };
                continue;
            }

            // ── Postfix: subscript ──
            if current == TokenKind::LBracket && POSTFIX_BP >= min_bp {
                self.advance();
                let index = self.expr_bp(0)?;
                self.expect(TokenKind::RBracket, "Expected ']' to close subscript")?;
                lhs = ObjcExpr::Subscript {
                    base: Box::new(lhs),
                    index: Box::new(index),
                };
                continue;
            }

            // ── Infix operators ──
            let Some((l_bp, r_bp)) = infix_binding_power(current) else {
                break;
            };
            if l_bp < min_bp {
                break;
            }
            self.advance();

            lhs = if current == TokenKind::Question {
                let then = self.expr_bp(0)?;
                self.expect(TokenKind::Colon, "Expected ':' in ternary expression")?;
                let otherwise = self.expr_bp(r_bp)?;
                ObjcExpr::Ternary {
                    condition: Box::new(lhs),
                    then: Box::new(then),
                    otherwise: Box::new(otherwise),
                }
            } else if let Some(op) = assign_op(current) {
                let rhs = self.expr_bp(r_bp)?;
                ObjcExpr::Assign {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                }
            } else {
                let rhs = self.expr_bp(r_bp)?;
                let op = binary_op(current).ok_or_else(|| self.error_here("Expected operator"))?;
                ObjcExpr::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                }
            };
        }

        Ok(lhs)
    }

    // ── Prefix forms ───────────────────────────────────────────────────

    fn lhs(&mut self) -> Result<ObjcExpr, SyntaxError> {
        let current = self.current();

        if let Some(((), r_bp)) = prefix_binding_power(current) {
            self.advance();
            let expr = self.expr_bp(r_bp)?;
            let op = unary_op(current).ok_or_else(|| self.error_here("Expected operator"))?;
            return Ok(ObjcExpr::Unary {
                op,
                expr: Box::new(expr),
            });
        }

        match current {
            TokenKind::IntLiteral => {
                let text = self.current_text().to_string();
                self.advance();
                Ok(ObjcExpr::Literal(ObjcLiteral::Int(text)))
            }
            TokenKind::FloatLiteral => {
                let text = self.current_text().to_string();
                self.advance();
                Ok(ObjcExpr::Literal(ObjcLiteral::Float(text)))
            }
            TokenKind::StringLiteral => {
                // "a" "b" concatenates
                let mut contents = String::new();
                while self.at(TokenKind::StringLiteral) {
                    contents.push_str(literal_contents(self.current_text()));
                    self.advance();
                }
                Ok(ObjcExpr::Literal(ObjcLiteral::String(contents)))
            }
            TokenKind::CharLiteral => {
                let contents = literal_contents(self.current_text()).to_string();
                self.advance();
                Ok(ObjcExpr::Literal(ObjcLiteral::Char(contents)))
            }
            TokenKind::Ident => self.identifier_expr(),
            TokenKind::LParen => self.paren_or_cast(),
            TokenKind::LBracket => self.message_send(),
            _ => Err(self.error_here("Expected expression")),
        }
    }

    fn identifier_expr(&mut self) -> Result<ObjcExpr, SyntaxError> {
        let literal = match self.current_text() {
            "true" | "YES" => Some(ObjcLiteral::Bool(true)),
            "false" | "NO" => Some(ObjcLiteral::Bool(false)),
            "nil" | "Nil" | "NULL" => Some(ObjcLiteral::Nil),
            _ => None,
        };
        if let Some(literal) = literal {
            self.advance();
            return Ok(ObjcExpr::Literal(literal));
        }

        if self.at_word("sizeof") {
            return self.sizeof_expr();
        }

        let ident = self.identifier("Expected identifier")?;
        Ok(ObjcExpr::Ident(ident.name))
    }

    /// `sizeof(type)` or `sizeof expr`.
    fn sizeof_expr(&mut self) -> Result<ObjcExpr, SyntaxError> {
        self.advance();

        if self.at(TokenKind::LParen) {
            let ty = self.rewind_on_failure(|p| {
                p.advance();
                let ty = p.type_name("Expected type name")?;
                p.expect(TokenKind::RParen, "Expected ')' after type name")?;
                Ok(ty)
            });
            if let Ok(ty) = ty {
                return Ok(ObjcExpr::SizeofType(ty.ty));
            }
        }

        let expr = self.expr_bp(CAST_BP)?;
        Ok(ObjcExpr::SizeofExpr(Box::new(expr)))
    }

    /// `(type) expr` when the parenthesized tokens read as a type that is
    /// followed by an operand, otherwise `(expr)`.
    fn paren_or_cast(&mut self) -> Result<ObjcExpr, SyntaxError> {
        let cast = self.rewind_on_failure(|p| {
            p.advance();
            let ty = p.type_name("Expected type name")?;
            p.expect(TokenKind::RParen, "Expected ')' after cast type")?;

            let next = p.current();
            let is_cast = starts_operand(next)
                || (matches!(next, TokenKind::Plus | TokenKind::Minus) && casts_signed_operand(&ty));
            if !is_cast {
                return Err(p.error_here("Expected cast operand"));
            }
            Ok(ty)
        });

        if let Ok(ty) = cast {
            let expr = self.expr_bp(CAST_BP)?;
            return Ok(ObjcExpr::Cast {
                ty: ty.ty,
                expr: Box::new(expr),
            });
        }

        self.advance();
        let inner = self.expr_bp(0)?;
        self.expect(
            TokenKind::RParen,
            "Expected ')' to close parenthesized expression",
        )?;
        Ok(ObjcExpr::Paren(Box::new(inner)))
    }

    fn call_arguments(&mut self) -> Result<Vec<ObjcExpr>, SyntaxError> {
        self.expect(TokenKind::LParen, "Expected '('")?;
        let mut args = Vec::new();
        if !self.at(TokenKind::RParen) {
            loop {
                args.push(self.expr_bp(0)?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "Expected ')' to close argument list")?;
        Ok(args)
    }

    /// `[receiver selector]` or `[receiver key:arg key:arg, extra]`.
    fn message_send(&mut self) -> Result<ObjcExpr, SyntaxError> {
        self.expect(TokenKind::LBracket, "Expected '['")?;
        let receiver = self.expr_bp(0)?;
        let first = self.identifier("Expected selector in message send")?;

        let mut selector = first.name;
        let mut args = Vec::new();

        if self.eat(TokenKind::Colon) {
            selector.push(':');
            args.push(MessageArgument {
                label: None,
                value: self.expr_bp(0)?,
            });

            loop {
                if self.at(TokenKind::Ident) && self.nth(1) == TokenKind::Colon {
                    let label = self.identifier("Expected selector keyword")?;
                    self.advance();
                    selector.push_str(&label.name);
                    selector.push(':');
                    args.push(MessageArgument {
                        label: Some(label.name),
                        value: self.expr_bp(0)?,
                    });
                } else if self.eat(TokenKind::Comma) {
                    args.push(MessageArgument {
                        label: None,
                        value: self.expr_bp(0)?,
                    });
                } else {
                    break;
                }
            }
        }

        self.expect(TokenKind::RBracket, "Expected ']' to close message send")?;
        Ok(ObjcExpr::Message {
            receiver: Box::new(receiver),
            selector,
            args,
        })
    }
}

#[cfg(test)]
mod tests {
    use morph_common::diagnostics::Diagnostics;

    use super::*;
    use crate::ast::ObjcType;

    fn expr(source: &str) -> ObjcExpr {
        let mut p = Parser::new(source, Diagnostics::new());
        p.expression().unwrap()
    }

    fn int(text: &str) -> Box<ObjcExpr> {
        Box::new(ObjcExpr::Literal(ObjcLiteral::Int(text.into())))
    }

    #[test]
    fn multiplication_binds_tighter() {
        assert_eq!(
            expr("1 + 2 * 3"),
            ObjcExpr::Binary {
                op: ObjcBinaryOp::Add,
                lhs: int("1"),
                rhs: Box::new(ObjcExpr::Binary {
                    op: ObjcBinaryOp::Mul,
                    lhs: int("2"),
                    rhs: int("3"),
                }),
            }
        );
    }

    #[test]
    fn subtraction_is_left_associative() {
        let ObjcExpr::Binary { lhs, rhs, .. } = expr("1 - 2 - 3") else {
            panic!("expected binary");
        };
        assert!(matches!(*lhs, ObjcExpr::Binary { op: ObjcBinaryOp::Sub, .. }));
        assert_eq!(rhs, int("3"));
    }

    #[test]
    fn scalar_cast_of_negative_operand() {
        assert_eq!(
            expr("(int)-1"),
            ObjcExpr::Cast {
                ty: ObjcType::Struct("int".into()),
                expr: Box::new(ObjcExpr::Unary {
                    op: ObjcUnaryOp::Neg,
                    expr: int("1"),
                }),
            }
        );
    }

    #[test]
    fn parenthesized_identifier_minus_is_subtraction() {
        assert!(matches!(
            expr("(a) - 1"),
            ObjcExpr::Binary { op: ObjcBinaryOp::Sub, .. }
        ));
    }

    #[test]
    fn sizeof_forms() {
        assert_eq!(
            expr("sizeof(unsigned int)"),
            ObjcExpr::SizeofType(ObjcType::Struct("unsigned int".into()))
        );
        assert!(matches!(expr("sizeof 1"), ObjcExpr::SizeofExpr(_)));
    }

    #[test]
    fn ternary_nests_to_the_right() {
        let ObjcExpr::Ternary { otherwise, .. } = expr("a ? 1 : b ? 2 : 3") else {
            panic!("expected ternary");
        };
        assert!(matches!(*otherwise, ObjcExpr::Ternary { .. }));
    }

    #[test]
    fn message_send_with_labels_and_variadic_args() {
        let ObjcExpr::Message { selector, args, .. } =
            expr("[NSString stringWithFormat:@\"%d\", 1]")
        else {
            panic!("expected message send");
        };
        assert_eq!(selector, "stringWithFormat:");
        assert_eq!(args.len(), 2);
        assert_eq!(args[0].label, None);
        assert_eq!(args[1].label, None);

        let ObjcExpr::Message { selector, args, .. } = expr("[dict setObject:a forKey:b]") else {
            panic!("expected message send");
        };
        assert_eq!(selector, "setObject:forKey:");
        assert_eq!(args[1].label.as_deref(), Some("forKey"));
    }

    #[test]
    fn adjacent_strings_concatenate() {
        assert_eq!(
            expr(r#"@"a" "b""#),
            ObjcExpr::Literal(ObjcLiteral::String("ab".into()))
        );
    }

    #[test]
    fn missing_close_paren_fails() {
        let mut p = Parser::new("(1", Diagnostics::new());
        let err = p.expression().unwrap_err();
        assert_eq!(err.message, "Expected ')' to close parenthesized expression");
    }
}
