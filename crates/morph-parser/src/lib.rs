//! Morph parser: Objective-C headers and macro-body expressions.
//!
//! [`parse`] turns a header into a [`Node`] tree rooted at a
//! `GlobalContext`, collecting one diagnostic per malformed construct and
//! recovering so that valid declarations after an error are still parsed.
//! [`parse_expression`] parses a standalone C expression such as the body
//! of `#define NAME body`.

pub mod ast;
pub mod error;
mod parser;

use morph_common::diagnostics::Diagnostics;
use morph_common::token::TokenKind;

pub use ast::debug_tree;
pub use ast::expr::ObjcExpr;
pub use ast::Node;
pub use error::SyntaxError;
pub use parser::Directive;

/// The result of parsing a header.
#[derive(Debug)]
pub struct Parse {
    root: Node,
    errors: Vec<SyntaxError>,
    directives: Vec<Directive>,
}

impl Parse {
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Syntax errors, in the order they were reported.
    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// `#` lines of the source, in order.
    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    pub fn into_root(self) -> Node {
        self.root
    }
}

/// Parse a header, recording errors in a fresh diagnostics sink.
pub fn parse(source: &str) -> Parse {
    parse_with_diagnostics(source, &Diagnostics::new())
}

/// Parse a header, recording errors in `diagnostics`.
pub fn parse_with_diagnostics(source: &str, diagnostics: &Diagnostics) -> Parse {
    let mut p = parser::Parser::new(source, diagnostics.clone());
    p.source_file();
    let (root, errors, directives) = p.finish();
    Parse {
        root,
        errors,
        directives,
    }
}

/// Parse `source` as exactly one expression.
///
/// Fails on empty input and on tokens left over after the expression.
pub fn parse_expression(source: &str) -> Result<ObjcExpr, SyntaxError> {
    let mut p = parser::Parser::new(source, Diagnostics::new());
    if p.at(TokenKind::Eof) {
        return Err(p.error_here("Expected expression"));
    }

    let expr = p.expression()?;
    if !p.at(TokenKind::Eof) {
        return Err(p.error_here("Unexpected token after expression"));
    }
    if let Some(err) = p.errors().first() {
        return Err(err.clone());
    }
    Ok(expr)
}
