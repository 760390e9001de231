//! Recursive-descent parser for Objective-C headers.
//!
//! # Architecture
//!
//! Grammar functions are methods on [`Parser`] that return
//! `Result<_, SyntaxError>`. Nodes are built on the parser's own
//! [`ContextStack`]: a rule acquires its node with [`Parser::with_context`],
//! which pushes the node, runs the rule body and pops the node on every exit
//! path, so the stack depth is the same before and after each rule whether it
//! succeeded or not.
//!
//! Recovery is explicit:
//!
//! - [`Parser::recover`] turns a failed field parse into
//!   [`NodeRef::Invalid`], reports it and skips to a synchronizing token.
//! - [`Parser::rewind_on_failure`] runs a speculative parse and restores the
//!   token cursor and context if it fails (used for casts and `sizeof`).
//! - Loops that can resynchronize report an escaping error once through
//!   [`Parser::report`] and continue.
//!
//! Comments are dropped and `#` lines are set aside as [`Directive`]s before
//! parsing starts, so grammar rules only ever see significant tokens.

pub(crate) mod expressions;
pub(crate) mod interface;
pub(crate) mod types;

use morph_common::diagnostics::Diagnostics;
use morph_common::span::Span;
use morph_common::token::{Token, TokenKind};
use morph_lexer::Lexer;

use crate::ast::context::ContextStack;
use crate::ast::{Identifier, InvalidNode, Node, NodeKind, NodeRef, SourceRange};
use crate::error::SyntaxError;

/// A preprocessor line found while parsing, e.g. `#define CONSTANT 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub text: String,
    pub span: Span,
}

pub(crate) struct Parser<'src> {
    /// Significant tokens only, ending with `Eof`.
    tokens: Vec<Token>,
    pos: usize,
    source: &'src str,
    ctx: ContextStack,
    diagnostics: Diagnostics,
    /// Errors this parser reported, in report order.
    errors: Vec<SyntaxError>,
    directives: Vec<Directive>,
    /// End offset of the last consumed token.
    last_end: u32,
    /// Nesting depth of `rewind_on_failure` calls.
    speculating: u32,
    /// Inside an `@optional` section of a protocol.
    in_optional: bool,
}

impl<'src> Parser<'src> {
    /// Create a parser over `source`. The global context is already open.
    pub(crate) fn new(source: &'src str, diagnostics: Diagnostics) -> Self {
        let mut tokens = Vec::new();
        let mut directives = Vec::new();
        for token in Lexer::new(source) {
            match token.kind {
                TokenKind::Comment => {}
                TokenKind::Directive => directives.push(Directive {
                    text: token.span.slice(source).to_string(),
                    span: token.span,
                }),
                _ => tokens.push(token),
            }
        }

        let mut ctx = ContextStack::new();
        ctx.push_context(NodeKind::GlobalContext);

        Self {
            tokens,
            pos: 0,
            source,
            ctx,
            diagnostics,
            errors: Vec::new(),
            directives,
            last_end: 0,
            speculating: 0,
            in_optional: false,
        }
    }

    // ── Lookahead ──────────────────────────────────────────────────────

    pub(crate) fn nth(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map_or(TokenKind::Eof, |token| token.kind)
    }

    pub(crate) fn current(&self) -> TokenKind {
        self.nth(0)
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.current() == kind
    }

    pub(crate) fn current_span(&self) -> Span {
        match self.tokens.get(self.pos) {
            Some(token) => token.span,
            None => Span::at(self.source.len() as u32),
        }
    }

    pub(crate) fn current_text(&self) -> &'src str {
        match self.tokens.get(self.pos) {
            Some(token) => token.span.slice(self.source),
            None => "",
        }
    }

    /// Whether the current token is the identifier `word`.
    pub(crate) fn at_word(&self, word: &str) -> bool {
        self.at(TokenKind::Ident) && self.current_text() == word
    }

    // ── Token consumption ──────────────────────────────────────────────

    /// Consume the current token. `Eof` is never consumed.
    pub(crate) fn advance(&mut self) -> Span {
        let span = self.current_span();
        if !self.at(TokenKind::Eof) {
            self.last_end = span.end;
            self.pos += 1;
        }
        span
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume a token of `kind`, or fail with `message` at the current token.
    pub(crate) fn expect(&mut self, kind: TokenKind, message: &str) -> Result<Span, SyntaxError> {
        if self.at(kind) {
            Ok(self.advance())
        } else {
            Err(self.error_here(message))
        }
    }

    pub(crate) fn identifier(&mut self, message: &str) -> Result<Identifier, SyntaxError> {
        if !self.at(TokenKind::Ident) {
            return Err(self.error_here(message));
        }
        let name = self.current_text().to_string();
        let span = self.advance();
        Ok(Identifier { name, span })
    }

    /// Split a `>>` token into two `>` so nested generic lists can close.
    pub(crate) fn split_shr(&mut self) {
        if self.at(TokenKind::Shr) {
            let span = self.tokens[self.pos].span;
            self.tokens[self.pos] = Token::new(TokenKind::Gt, span.start, span.start + 1);
            self.tokens
                .insert(self.pos + 1, Token::new(TokenKind::Gt, span.start + 1, span.end));
        }
    }

    /// Advance until `stop` holds for the current token (or input ends).
    pub(crate) fn skip_until(&mut self, stop: impl Fn(TokenKind) -> bool) {
        let from = self.pos;
        while !self.at(TokenKind::Eof) && !stop(self.current()) {
            self.advance();
        }
        if self.pos > from {
            tracing::trace!(skipped = self.pos - from, "recovery skipped tokens");
        }
    }

    /// Skip a balanced `open ... close` group starting at the current token.
    pub(crate) fn skip_balanced(&mut self, open: TokenKind, close: TokenKind) {
        let mut depth = 0usize;
        loop {
            let kind = self.current();
            if kind == TokenKind::Eof {
                return;
            }
            self.advance();
            if kind == open {
                depth += 1;
            } else if kind == close {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return;
                }
            }
        }
    }

    // ── Error reporting ────────────────────────────────────────────────

    pub(crate) fn error_here(&self, message: &str) -> SyntaxError {
        SyntaxError::new(message, self.current_span())
    }

    /// Write `err` to the diagnostics sink unless it already was.
    pub(crate) fn report(&mut self, err: &mut SyntaxError) {
        if err.reported {
            return;
        }
        err.reported = true;
        tracing::debug!(
            message = %err.message,
            start = err.span.start,
            end = err.span.end,
            "syntax error"
        );
        self.diagnostics.error(err.message.clone(), err.span);
        self.errors.push(err.clone());
    }

    // ── Recovery combinators ───────────────────────────────────────────

    /// Parse a field; on failure report once, skip to `sync` and leave an
    /// invalid marker in the slot.
    pub(crate) fn recover<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, SyntaxError>,
        sync: impl Fn(TokenKind) -> bool,
    ) -> NodeRef<T> {
        match parse(self) {
            Ok(value) => NodeRef::Valid(value),
            Err(mut err) => {
                self.report(&mut err);
                self.skip_until(sync);
                NodeRef::Invalid(InvalidNode { at: err.span })
            }
        }
    }

    /// Run a speculative parse. On failure the token cursor and the children
    /// of the active context are restored and the error is returned
    /// unreported.
    pub(crate) fn rewind_on_failure<R>(
        &mut self,
        attempt: impl FnOnce(&mut Self) -> Result<R, SyntaxError>,
    ) -> Result<R, SyntaxError> {
        let pos = self.pos;
        let last_end = self.last_end;
        let checkpoint = self.ctx.checkpoint();

        self.speculating += 1;
        let result = attempt(self);
        self.speculating -= 1;

        if result.is_err() {
            self.pos = pos;
            self.last_end = last_end;
            self.ctx.restore(checkpoint);
        }
        result
    }

    pub(crate) fn is_speculating(&self) -> bool {
        self.speculating > 0
    }

    // ── Node construction ──────────────────────────────────────────────

    /// Run `rule` with a new node of `kind` as the active context.
    ///
    /// The node's range covers the tokens consumed by `rule`; it is attached
    /// to the enclosing context whether `rule` succeeds or fails.
    pub(crate) fn with_context<R>(
        &mut self,
        kind: NodeKind,
        rule: impl FnOnce(&mut Self) -> Result<R, SyntaxError>,
    ) -> Result<R, SyntaxError> {
        let start = self.current_span().start;
        let start_pos = self.pos;
        let depth = self.ctx.depth();

        self.ctx.push_context(kind);
        let result = rule(self);
        assert_eq!(
            self.ctx.depth(),
            depth + 1,
            "grammar rule left the context stack unbalanced"
        );

        let range = if self.pos > start_pos {
            SourceRange::Valid(Span::new(start, self.last_end))
        } else {
            SourceRange::Invalid
        };
        if let Some(node) = self.ctx.current_mut() {
            node.range = range;
        }
        if let Some(orphan) = self.ctx.pop_context() {
            panic!("grammar rule popped the global context ({})", orphan.kind.name());
        }
        result
    }

    /// Replace the payload of the active context node.
    pub(crate) fn set_kind(&mut self, kind: NodeKind) {
        if let Some(node) = self.ctx.current_mut() {
            node.kind = kind;
        }
    }

    /// Attach a leaf node covering `span` to the active context.
    pub(crate) fn leaf(&mut self, kind: NodeKind, span: Span) {
        let mut node = self.ctx.new_node(kind);
        node.range = SourceRange::Valid(span);
        self.ctx.add_child_node(node);
    }

    /// Consume an `@`-keyword and record it as a `Keyword` leaf.
    pub(crate) fn keyword(&mut self, kind: TokenKind, message: &str) -> Result<Span, SyntaxError> {
        let span = self.expect(kind, message)?;
        self.leaf(NodeKind::Keyword(kind), span);
        Ok(span)
    }

    /// Consume a punctuation token and record it as a `Token` leaf.
    pub(crate) fn token_node(&mut self, kind: TokenKind, message: &str) -> Result<Span, SyntaxError> {
        let span = self.expect(kind, message)?;
        self.leaf(NodeKind::Token(kind), span);
        Ok(span)
    }

    /// Close the global context and hand back the finished tree.
    ///
    /// # Panics
    ///
    /// Panics if a grammar rule left a context open.
    pub(crate) fn finish(mut self) -> (Node, Vec<SyntaxError>, Vec<Directive>) {
        let end = self.source.len() as u32;
        if let Some(root) = self.ctx.current_mut() {
            root.range = SourceRange::Valid(Span::new(0, end));
        }
        let Some(root) = self.ctx.pop_context() else {
            panic!("context stack still open at end of parse");
        };
        (root, self.errors, self.directives)
    }

    pub(crate) fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser(source: &str) -> Parser<'_> {
        Parser::new(source, Diagnostics::new())
    }

    #[test]
    fn comments_and_directives_are_set_aside() {
        let p = parser("// c\n#define A 1\n@end");
        assert_eq!(p.current(), TokenKind::AtEnd);
        assert_eq!(p.nth(1), TokenKind::Eof);
        assert_eq!(p.directives.len(), 1);
        assert_eq!(p.directives[0].text, "#define A 1");
    }

    #[test]
    fn advance_stops_at_eof() {
        let mut p = parser("a");
        p.advance();
        assert!(p.at(TokenKind::Eof));
        p.advance();
        assert!(p.at(TokenKind::Eof));
        assert_eq!(p.last_end, 1);
    }

    #[test]
    fn expect_reports_caller_message() {
        let mut p = parser("x");
        let err = p.expect(TokenKind::Semicolon, "Expected ';'").unwrap_err();
        assert_eq!(err.message, "Expected ';'");
        assert_eq!(err.span, Span::new(0, 1));
        assert_eq!(p.pos, 0);
    }

    #[test]
    fn report_is_idempotent() {
        let diagnostics = Diagnostics::new();
        let mut p = Parser::new("x", diagnostics.clone());
        let mut err = p.error_here("Expected type name");
        p.report(&mut err);
        p.report(&mut err);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(p.errors().len(), 1);
    }

    #[test]
    fn rewind_restores_cursor_and_children() {
        let mut p = parser("a b c");
        let result: Result<(), SyntaxError> = p.rewind_on_failure(|p| {
            p.advance();
            p.leaf(NodeKind::Invalid, Span::new(0, 1));
            p.advance();
            Err(p.error_here("no"))
        });
        assert!(result.is_err());
        assert_eq!(p.pos, 0);
        assert_eq!(p.last_end, 0);
        assert!(p.ctx.current().unwrap().children.is_empty());
    }

    #[test]
    fn with_context_pops_on_error() {
        let mut p = parser("@property");
        let result: Result<(), SyntaxError> = p.with_context(NodeKind::PropertyModifierList, |p| {
            p.advance();
            Err(p.error_here("boom"))
        });
        assert!(result.is_err());
        assert_eq!(p.ctx.depth(), 1);
        let (root, _, _) = p.finish();
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].range, SourceRange::Valid(Span::new(0, 9)));
    }

    #[test]
    fn split_shr_yields_two_closers() {
        let mut p = parser(">>");
        p.split_shr();
        assert_eq!(p.current(), TokenKind::Gt);
        assert_eq!(p.nth(1), TokenKind::Gt);
        assert_eq!(p.current_span(), Span::new(0, 1));
    }
}
