use morph_common::token::TokenKind;
use morph_lexer::Lexer;

/// `(kind, text)` pairs without the trailing `Eof`.
fn tokenize_pairs(source: &str) -> Vec<(TokenKind, String)> {
    Lexer::tokenize(source)
        .into_iter()
        .filter(|tok| tok.kind != TokenKind::Eof)
        .map(|tok| (tok.kind, tok.span.slice(source).to_string()))
        .collect()
}

fn pair(kind: TokenKind, text: &str) -> (TokenKind, String) {
    (kind, text.to_string())
}

// ── Headers ──────────────────────────────────────────────────────────────

#[test]
fn test_interface_header() {
    let source = "@interface MyClass : NSObject <NSCopying, Delegate>\n@end";
    assert_eq!(
        tokenize_pairs(source),
        vec![
            pair(TokenKind::AtInterface, "@interface"),
            pair(TokenKind::Ident, "MyClass"),
            pair(TokenKind::Colon, ":"),
            pair(TokenKind::Ident, "NSObject"),
            pair(TokenKind::Lt, "<"),
            pair(TokenKind::Ident, "NSCopying"),
            pair(TokenKind::Comma, ","),
            pair(TokenKind::Ident, "Delegate"),
            pair(TokenKind::Gt, ">"),
            pair(TokenKind::AtEnd, "@end"),
        ]
    );
}

#[test]
fn test_method_declaration() {
    let source = "- (void)setValue:(id)value forKey:(NSString *)key;";
    let kinds: Vec<_> = tokenize_pairs(source).into_iter().map(|(k, _)| k).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Minus,
            TokenKind::LParen,
            TokenKind::Ident,
            TokenKind::RParen,
            TokenKind::Ident,
            TokenKind::Colon,
            TokenKind::LParen,
            TokenKind::Ident,
            TokenKind::RParen,
            TokenKind::Ident,
            TokenKind::Ident,
            TokenKind::Colon,
            TokenKind::LParen,
            TokenKind::Ident,
            TokenKind::Star,
            TokenKind::RParen,
            TokenKind::Ident,
            TokenKind::Semicolon,
        ]
    );
}

#[test]
fn test_comments_are_tokens() {
    let source = "// line\n@end /* block\n comment */ @class";
    assert_eq!(
        tokenize_pairs(source),
        vec![
            pair(TokenKind::Comment, "// line"),
            pair(TokenKind::AtEnd, "@end"),
            pair(TokenKind::Comment, "/* block\n comment */"),
            pair(TokenKind::AtClass, "@class"),
        ]
    );
}

// ── Macro bodies ─────────────────────────────────────────────────────────

#[test]
fn test_number_literals() {
    let source = "1 1ulL 0123 0x1F 0b101 1.5 1f 1.0e-3 .5";
    assert_eq!(
        tokenize_pairs(source),
        vec![
            pair(TokenKind::IntLiteral, "1"),
            pair(TokenKind::IntLiteral, "1ulL"),
            pair(TokenKind::IntLiteral, "0123"),
            pair(TokenKind::IntLiteral, "0x1F"),
            pair(TokenKind::IntLiteral, "0b101"),
            pair(TokenKind::FloatLiteral, "1.5"),
            pair(TokenKind::FloatLiteral, "1f"),
            pair(TokenKind::FloatLiteral, "1.0e-3"),
            pair(TokenKind::FloatLiteral, ".5"),
        ]
    );
}

#[test]
fn test_string_literals() {
    let source = r#""A constant" @"objc" "esc\"aped" 'c'"#;
    assert_eq!(
        tokenize_pairs(source),
        vec![
            pair(TokenKind::StringLiteral, "\"A constant\""),
            pair(TokenKind::StringLiteral, "@\"objc\""),
            pair(TokenKind::StringLiteral, "\"esc\\\"aped\""),
            pair(TokenKind::CharLiteral, "'c'"),
        ]
    );
}

#[test]
fn test_operators() {
    let source = "+ += - -= -> * *= / /= % & && | || ^ ~ ! != = == < <= << > >= >> ? : .";
    let kinds: Vec<_> = tokenize_pairs(source).into_iter().map(|(k, _)| k).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Plus,
            TokenKind::PlusEq,
            TokenKind::Minus,
            TokenKind::MinusEq,
            TokenKind::Arrow,
            TokenKind::Star,
            TokenKind::StarEq,
            TokenKind::Slash,
            TokenKind::SlashEq,
            TokenKind::Percent,
            TokenKind::Amp,
            TokenKind::AmpAmp,
            TokenKind::Pipe,
            TokenKind::PipePipe,
            TokenKind::Caret,
            TokenKind::Tilde,
            TokenKind::Bang,
            TokenKind::NotEq,
            TokenKind::Eq,
            TokenKind::EqEq,
            TokenKind::Lt,
            TokenKind::LtEq,
            TokenKind::Shl,
            TokenKind::Gt,
            TokenKind::GtEq,
            TokenKind::Shr,
            TokenKind::Question,
            TokenKind::Colon,
            TokenKind::Dot,
        ]
    );
}

#[test]
fn test_directive_lines() {
    let source = "#import <Foundation/Foundation.h>\n#define CONSTANT 1 + 1\n@interface A\n@end";
    let pairs = tokenize_pairs(source);
    assert_eq!(pairs[0], pair(TokenKind::Directive, "#import <Foundation/Foundation.h>"));
    assert_eq!(pairs[1], pair(TokenKind::Directive, "#define CONSTANT 1 + 1"));
    assert_eq!(pairs[2].0, TokenKind::AtInterface);
}

#[test]
fn test_unknown_character_is_error() {
    assert_eq!(
        tokenize_pairs("a ` b"),
        vec![
            pair(TokenKind::Ident, "a"),
            pair(TokenKind::Error, "`"),
            pair(TokenKind::Ident, "b"),
        ]
    );
}
