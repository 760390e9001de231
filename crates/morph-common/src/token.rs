use serde::Serialize;

use crate::span::Span;

/// A token produced by the Morph lexer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, start: u32, end: u32) -> Self {
        Self {
            kind,
            span: Span::new(start, end),
        }
    }

    /// Whether the parser should look through this token.
    pub fn is_trivia(&self) -> bool {
        self.kind == TokenKind::Comment
    }
}

/// The token vocabulary for Objective-C headers and macro bodies.
///
/// Plain words (`id`, `sizeof`, `YES`, `nonnull`, ...) stay [`TokenKind::Ident`]
/// and are recognized by text in the parser; only `@`-prefixed directives get
/// dedicated kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // ── `@` keywords ───────────────────────────────────────────────────
    AtInterface,
    AtImplementation,
    AtProtocol,
    AtEnd,
    AtProperty,
    AtOptional,
    AtRequired,
    AtClass,
    /// Any other `@word`, e.g. `@synthesize`.
    AtUnknown,

    // ── Operators ──────────────────────────────────────────────────────
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `&`
    Amp,
    /// `&&`
    AmpAmp,
    /// `|`
    Pipe,
    /// `||`
    PipePipe,
    /// `^`
    Caret,
    /// `~`
    Tilde,
    /// `!`
    Bang,
    /// `==`
    EqEq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    LtEq,
    /// `>=`
    GtEq,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `=`
    Eq,
    /// `+=`
    PlusEq,
    /// `-=`
    MinusEq,
    /// `*=`
    StarEq,
    /// `/=`
    SlashEq,
    /// `->`
    Arrow,
    /// `?`
    Question,

    // ── Delimiters and punctuation ─────────────────────────────────────
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Semicolon,
    Colon,
    Dot,

    // ── Literals ───────────────────────────────────────────────────────
    /// Integer literal including any `u`/`l` suffix, e.g. `1ulL`, `0x1F`, `017`.
    IntLiteral,
    /// Floating-point literal including any `f`/`d` suffix, e.g. `1.0e2`, `1f`.
    FloatLiteral,
    /// `"..."` or `@"..."`, quotes included in the span.
    StringLiteral,
    /// `'a'`
    CharLiteral,

    // ── Words, trivia, preprocessor ────────────────────────────────────
    Ident,
    /// `// ...` or `/* ... */`.
    Comment,
    /// A whole `#...` preprocessor line, continuation lines included.
    Directive,

    // ── Special ────────────────────────────────────────────────────────
    Eof,
    /// Input the lexer could not classify.
    Error,
}

impl TokenKind {
    pub fn is_at_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::AtInterface
                | TokenKind::AtImplementation
                | TokenKind::AtProtocol
                | TokenKind::AtEnd
                | TokenKind::AtProperty
                | TokenKind::AtOptional
                | TokenKind::AtRequired
                | TokenKind::AtClass
                | TokenKind::AtUnknown
        )
    }

    /// Source spelling of fixed-text tokens, used in diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::AtInterface => "@interface",
            TokenKind::AtImplementation => "@implementation",
            TokenKind::AtProtocol => "@protocol",
            TokenKind::AtEnd => "@end",
            TokenKind::AtProperty => "@property",
            TokenKind::AtOptional => "@optional",
            TokenKind::AtRequired => "@required",
            TokenKind::AtClass => "@class",
            TokenKind::AtUnknown => "@-directive",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Amp => "&",
            TokenKind::AmpAmp => "&&",
            TokenKind::Pipe => "|",
            TokenKind::PipePipe => "||",
            TokenKind::Caret => "^",
            TokenKind::Tilde => "~",
            TokenKind::Bang => "!",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::LtEq => "<=",
            TokenKind::GtEq => ">=",
            TokenKind::Shl => "<<",
            TokenKind::Shr => ">>",
            TokenKind::Eq => "=",
            TokenKind::PlusEq => "+=",
            TokenKind::MinusEq => "-=",
            TokenKind::StarEq => "*=",
            TokenKind::SlashEq => "/=",
            TokenKind::Arrow => "->",
            TokenKind::Question => "?",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::Dot => ".",
            TokenKind::IntLiteral => "integer literal",
            TokenKind::FloatLiteral => "float literal",
            TokenKind::StringLiteral => "string literal",
            TokenKind::CharLiteral => "character literal",
            TokenKind::Ident => "identifier",
            TokenKind::Comment => "comment",
            TokenKind::Directive => "preprocessor directive",
            TokenKind::Eof => "end of file",
            TokenKind::Error => "invalid token",
        }
    }
}

/// Map the word following `@` to its directive kind.
///
/// Returns `None` for words that are not directives Morph understands; the
/// lexer then emits [`TokenKind::AtUnknown`].
pub fn at_keyword_from_str(word: &str) -> Option<TokenKind> {
    match word {
        "interface" => Some(TokenKind::AtInterface),
        "implementation" => Some(TokenKind::AtImplementation),
        "protocol" => Some(TokenKind::AtProtocol),
        "end" => Some(TokenKind::AtEnd),
        "property" => Some(TokenKind::AtProperty),
        "optional" => Some(TokenKind::AtOptional),
        "required" => Some(TokenKind::AtRequired),
        "class" => Some(TokenKind::AtClass),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_keywords_round_trip_through_describe() {
        for word in [
            "interface",
            "implementation",
            "protocol",
            "end",
            "property",
            "optional",
            "required",
            "class",
        ] {
            let kind = at_keyword_from_str(word).unwrap();
            assert!(kind.is_at_keyword());
            assert_eq!(kind.describe(), format!("@{word}"));
        }
    }

    #[test]
    fn unknown_at_words() {
        assert_eq!(at_keyword_from_str("synthesize"), None);
        assert_eq!(at_keyword_from_str("Interface"), None);
        assert_eq!(at_keyword_from_str(""), None);
    }

    #[test]
    fn only_comments_are_trivia() {
        assert!(Token::new(TokenKind::Comment, 0, 4).is_trivia());
        assert!(!Token::new(TokenKind::Directive, 0, 4).is_trivia());
        assert!(!Token::new(TokenKind::Ident, 0, 4).is_trivia());
    }
}
