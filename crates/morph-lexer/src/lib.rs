// Morph lexer -- tokenizer for Objective-C headers and `#define` bodies.

mod cursor;

use cursor::Cursor;
use morph_common::token::{at_keyword_from_str, Token, TokenKind};

/// The Objective-C lexer. Converts source text into a stream of tokens.
///
/// Comments come out as [`TokenKind::Comment`] and preprocessor lines as a
/// single [`TokenKind::Directive`] each; the parser decides what to do with
/// them. The stream always ends with exactly one `Eof`.
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    emitted_eof: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            emitted_eof: false,
        }
    }

    /// Tokenize the entire source, final `Eof` included.
    pub fn tokenize(source: &str) -> Vec<Token> {
        Lexer::new(source).collect()
    }

    fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.cursor.pos();

        let Some(c) = self.cursor.peek() else {
            return Token::new(TokenKind::Eof, start, start);
        };

        match c {
            // ── Single-character delimiters ───────────────────────────────
            '(' => self.single_char_token(TokenKind::LParen, start),
            ')' => self.single_char_token(TokenKind::RParen, start),
            '[' => self.single_char_token(TokenKind::LBracket, start),
            ']' => self.single_char_token(TokenKind::RBracket, start),
            '{' => self.single_char_token(TokenKind::LBrace, start),
            '}' => self.single_char_token(TokenKind::RBrace, start),
            ',' => self.single_char_token(TokenKind::Comma, start),
            ';' => self.single_char_token(TokenKind::Semicolon, start),
            ':' => self.single_char_token(TokenKind::Colon, start),
            '?' => self.single_char_token(TokenKind::Question, start),
            '~' => self.single_char_token(TokenKind::Tilde, start),
            '^' => self.single_char_token(TokenKind::Caret, start),
            '%' => self.single_char_token(TokenKind::Percent, start),

            // ── Multi-character operators ─────────────────────────────────
            '=' => self.one_or_two(start, TokenKind::Eq, '=', TokenKind::EqEq),
            '!' => self.one_or_two(start, TokenKind::Bang, '=', TokenKind::NotEq),
            '*' => self.one_or_two(start, TokenKind::Star, '=', TokenKind::StarEq),
            '+' => self.one_or_two(start, TokenKind::Plus, '=', TokenKind::PlusEq),
            '&' => self.one_or_two(start, TokenKind::Amp, '&', TokenKind::AmpAmp),
            '|' => self.one_or_two(start, TokenKind::Pipe, '|', TokenKind::PipePipe),
            '<' => self.lex_lt(start),
            '>' => self.lex_gt(start),
            '-' => self.lex_minus(start),
            '.' => self.lex_dot(start),

            // ── Comments ─────────────────────────────────────────────────
            '/' => self.lex_slash(start),

            // ── Preprocessor ─────────────────────────────────────────────
            '#' => self.lex_directive(start),

            // ── `@` directives and `@"..."` strings ───────────────────────
            '@' => self.lex_at(start),

            // ── Literals ─────────────────────────────────────────────────
            '0'..='9' => self.lex_number(start),
            '"' => {
                self.cursor.advance();
                self.lex_string_body(start)
            }
            '\'' => self.lex_char(start),

            // ── Identifiers ──────────────────────────────────────────────
            c if is_ident_start(c) => self.lex_ident(start),

            // ── Unknown character (error recovery) ───────────────────────
            _ => {
                self.cursor.advance();
                Token::new(TokenKind::Error, start, self.cursor.pos())
            }
        }
    }

    // ── Helpers ──────────────────────────────────────────────────────────

    fn skip_whitespace(&mut self) {
        self.cursor.eat_while(|c| c.is_ascii_whitespace());
    }

    fn single_char_token(&mut self, kind: TokenKind, start: u32) -> Token {
        self.cursor.advance();
        Token::new(kind, start, self.cursor.pos())
    }

    /// `c` -> `single`, `c` + `next` -> `double`.
    fn one_or_two(&mut self, start: u32, single: TokenKind, next: char, double: TokenKind) -> Token {
        self.cursor.advance();
        let kind = if self.cursor.eat(next) { double } else { single };
        Token::new(kind, start, self.cursor.pos())
    }

    // ── Operator lexing ──────────────────────────────────────────────────

    /// `<` -> `Lt`, `<=` -> `LtEq`, `<<` -> `Shl`
    fn lex_lt(&mut self, start: u32) -> Token {
        self.cursor.advance();
        let kind = match self.cursor.peek() {
            Some('=') => TokenKind::LtEq,
            Some('<') => TokenKind::Shl,
            _ => return Token::new(TokenKind::Lt, start, self.cursor.pos()),
        };
        self.cursor.advance();
        Token::new(kind, start, self.cursor.pos())
    }

    /// `>` -> `Gt`, `>=` -> `GtEq`, `>>` -> `Shr`
    fn lex_gt(&mut self, start: u32) -> Token {
        self.cursor.advance();
        let kind = match self.cursor.peek() {
            Some('=') => TokenKind::GtEq,
            Some('>') => TokenKind::Shr,
            _ => return Token::new(TokenKind::Gt, start, self.cursor.pos()),
        };
        self.cursor.advance();
        Token::new(kind, start, self.cursor.pos())
    }

    /// `-` -> `Minus`, `-=` -> `MinusEq`, `->` -> `Arrow`
    fn lex_minus(&mut self, start: u32) -> Token {
        self.cursor.advance();
        let kind = match self.cursor.peek() {
            Some('=') => TokenKind::MinusEq,
            Some('>') => TokenKind::Arrow,
            _ => return Token::new(TokenKind::Minus, start, self.cursor.pos()),
        };
        self.cursor.advance();
        Token::new(kind, start, self.cursor.pos())
    }

    /// `.` -> `Dot`, or a float literal such as `.5`.
    fn lex_dot(&mut self, start: u32) -> Token {
        if self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.cursor.advance();
            self.cursor.eat_while(|c| c.is_ascii_digit());
            if matches!(self.cursor.peek(), Some('e' | 'E')) {
                self.lex_exponent();
            }
            self.eat_float_suffix();
            return Token::new(TokenKind::FloatLiteral, start, self.cursor.pos());
        }
        self.single_char_token(TokenKind::Dot, start)
    }

    /// `/` -> `Slash`, `/=` -> `SlashEq`, `//` and `/* */` -> `Comment`
    fn lex_slash(&mut self, start: u32) -> Token {
        if self.cursor.starts_with("//") {
            self.cursor.eat_while(|c| c != '\n');
            return Token::new(TokenKind::Comment, start, self.cursor.pos());
        }
        if self.cursor.starts_with("/*") {
            self.cursor.advance();
            self.cursor.advance();
            loop {
                if self.cursor.starts_with("*/") {
                    self.cursor.advance();
                    self.cursor.advance();
                    return Token::new(TokenKind::Comment, start, self.cursor.pos());
                }
                if self.cursor.advance().is_none() {
                    // Unterminated block comment
                    return Token::new(TokenKind::Error, start, self.cursor.pos());
                }
            }
        }
        self.one_or_two(start, TokenKind::Slash, '=', TokenKind::SlashEq)
    }

    /// A `#` line up to the first newline not escaped with `\`.
    fn lex_directive(&mut self, start: u32) -> Token {
        loop {
            match self.cursor.peek() {
                None | Some('\n') => break,
                Some('\\') if self.cursor.peek_next() == Some('\n') => {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
        Token::new(TokenKind::Directive, start, self.cursor.pos())
    }

    fn lex_at(&mut self, start: u32) -> Token {
        self.cursor.advance(); // consume '@'
        match self.cursor.peek() {
            Some('"') => {
                self.cursor.advance();
                self.lex_string_body(start)
            }
            Some(c) if is_ident_start(c) => {
                let word_start = self.cursor.pos();
                self.cursor.eat_while(is_ident_continue);
                let word = self.cursor.slice(word_start, self.cursor.pos());
                let kind = at_keyword_from_str(word).unwrap_or(TokenKind::AtUnknown);
                Token::new(kind, start, self.cursor.pos())
            }
            _ => Token::new(TokenKind::Error, start, self.cursor.pos()),
        }
    }

    // ── Number literals ──────────────────────────────────────────────────

    /// Decimal, hex (`0x`), binary (`0b`), octal (leading `0`) and floating
    /// literals, with their C suffixes.
    fn lex_number(&mut self, start: u32) -> Token {
        let first = self.cursor.advance();

        if first == Some('0') {
            match self.cursor.peek() {
                Some('x' | 'X') => {
                    self.cursor.advance();
                    self.cursor.eat_while(|c| c.is_ascii_hexdigit());
                    self.eat_int_suffix();
                    return Token::new(TokenKind::IntLiteral, start, self.cursor.pos());
                }
                Some('b' | 'B') if matches!(self.cursor.peek_next(), Some('0' | '1')) => {
                    self.cursor.advance();
                    self.cursor.eat_while(|c| c == '0' || c == '1');
                    self.eat_int_suffix();
                    return Token::new(TokenKind::IntLiteral, start, self.cursor.pos());
                }
                _ => {}
            }
        }

        self.cursor.eat_while(|c| c.is_ascii_digit());

        let mut is_float = false;
        if self.cursor.peek() == Some('.') && self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.cursor.advance(); // consume '.'
            self.cursor.eat_while(|c| c.is_ascii_digit());
            is_float = true;
        }
        if matches!(self.cursor.peek(), Some('e' | 'E')) {
            self.lex_exponent();
            is_float = true;
        }

        // `1f` (and `1d`) are float literals.
        if is_float || matches!(self.cursor.peek(), Some('f' | 'F' | 'd' | 'D')) {
            self.eat_float_suffix();
            return Token::new(TokenKind::FloatLiteral, start, self.cursor.pos());
        }

        self.eat_int_suffix();
        Token::new(TokenKind::IntLiteral, start, self.cursor.pos())
    }

    /// `e`/`E`, an optional sign, then digits.
    fn lex_exponent(&mut self) {
        self.cursor.advance();
        if matches!(self.cursor.peek(), Some('+' | '-')) {
            self.cursor.advance();
        }
        self.cursor.eat_while(|c| c.is_ascii_digit());
    }

    fn eat_int_suffix(&mut self) {
        self.cursor.eat_while(|c| matches!(c, 'u' | 'U' | 'l' | 'L'));
    }

    fn eat_float_suffix(&mut self) {
        if matches!(self.cursor.peek(), Some('f' | 'F' | 'd' | 'D' | 'l' | 'L')) {
            self.cursor.advance();
        }
    }

    // ── String and character literals ────────────────────────────────────

    /// Body of a string literal after its opening `"`. Unterminated strings
    /// (end of line or input) become `Error`.
    fn lex_string_body(&mut self, start: u32) -> Token {
        loop {
            match self.cursor.peek() {
                None | Some('\n') => {
                    return Token::new(TokenKind::Error, start, self.cursor.pos());
                }
                Some('"') => {
                    self.cursor.advance();
                    return Token::new(TokenKind::StringLiteral, start, self.cursor.pos());
                }
                Some('\\') => {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    fn lex_char(&mut self, start: u32) -> Token {
        self.cursor.advance(); // consume opening '\''
        loop {
            match self.cursor.peek() {
                None | Some('\n') => {
                    return Token::new(TokenKind::Error, start, self.cursor.pos());
                }
                Some('\'') => {
                    self.cursor.advance();
                    return Token::new(TokenKind::CharLiteral, start, self.cursor.pos());
                }
                Some('\\') => {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    // ── Identifiers ──────────────────────────────────────────────────────

    fn lex_ident(&mut self, start: u32) -> Token {
        self.cursor.advance();
        self.cursor.eat_while(is_ident_continue);
        Token::new(TokenKind::Ident, start, self.cursor.pos())
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.emitted_eof {
            return None;
        }

        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            self.emitted_eof = true;
        }
        Some(token)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}
