//! Declarations: `@interface`, `@protocol`, properties and methods.

use morph_common::span::Span;
use morph_common::token::TokenKind;

use crate::ast::{
    ClassInterfaceData, InvalidNode, KeywordArgument, MethodData, MethodSelector, NodeKind,
    NodeRef, PropertyData, PropertyModifierData, ProtocolData, TypeNameNode,
};
use crate::error::SyntaxError;

use super::Parser;

const CLASS_MEMBER_MESSAGE: &str =
    "Expected an ivar list, @property, or method(s) declaration(s) in class";
const PROTOCOL_MEMBER_MESSAGE: &str =
    "Expected @property, method(s) declaration(s), @optional or @required in protocol";

/// Tokens a broken member declaration is skipped up to.
fn is_member_sync(kind: TokenKind) -> bool {
    kind.is_at_keyword() || matches!(kind, TokenKind::Plus | TokenKind::Minus | TokenKind::Eof)
}

/// Tokens that end a declaration body even without `@end`.
fn ends_body(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::AtEnd
            | TokenKind::Eof
            | TokenKind::AtInterface
            | TokenKind::AtProtocol
            | TokenKind::AtImplementation
    )
}

impl<'src> Parser<'src> {
    // ── Source file ────────────────────────────────────────────────────

    /// `sourceFile := (classInterface | protocolDecl)* EOF`
    ///
    /// Anything else at top level (C declarations, `@class` forward
    /// declarations, `@implementation` blocks) is skipped without a
    /// diagnostic.
    pub(crate) fn source_file(&mut self) {
        loop {
            match self.current() {
                TokenKind::Eof => break,
                TokenKind::AtInterface => {
                    let result = self.class_interface();
                    self.recover_declaration(result);
                }
                TokenKind::AtProtocol if self.is_forward_declaration() => {
                    self.skip_declaration();
                }
                TokenKind::AtProtocol => {
                    let result = self.protocol_declaration();
                    self.recover_declaration(result);
                }
                TokenKind::AtClass => self.skip_declaration(),
                TokenKind::AtImplementation => {
                    tracing::trace!("skipping @implementation block");
                    self.skip_until(|kind| kind == TokenKind::AtEnd);
                    self.eat(TokenKind::AtEnd);
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Report an error that escaped a top-level declaration and move to the
    /// next one.
    fn recover_declaration(&mut self, result: Result<(), SyntaxError>) {
        if let Err(mut err) = result {
            self.report(&mut err);
            self.skip_until(ends_body);
            self.eat(TokenKind::AtEnd);
        }
    }

    /// `@protocol A;` / `@protocol A, B;`
    fn is_forward_declaration(&self) -> bool {
        self.nth(1) == TokenKind::Ident && matches!(self.nth(2), TokenKind::Semicolon | TokenKind::Comma)
    }

    fn skip_declaration(&mut self) {
        self.skip_until(|kind| kind == TokenKind::Semicolon);
        self.eat(TokenKind::Semicolon);
    }

    // ── Class interface ────────────────────────────────────────────────

    /// `'@interface' Identifier (':' Identifier)? ('<' protocolList '>')? memberDecl* '@end'`
    pub(crate) fn class_interface(&mut self) -> Result<(), SyntaxError> {
        self.with_context(NodeKind::ClassInterface(ClassInterfaceData::default()), |p| {
            p.keyword(TokenKind::AtInterface, "Expected @interface to start class declaration")?;

            let name = p.identifier("Expected identifier for class name")?;
            p.set_kind(NodeKind::ClassInterface(ClassInterfaceData {
                name: NodeRef::Valid(name),
            }));

            if p.at(TokenKind::Colon) {
                p.token_node(TokenKind::Colon, "Expected ':'")?;
                p.superclass_name()?;
            }

            p.optional_protocol_list();

            // ivar block
            if p.at(TokenKind::LBrace) {
                tracing::trace!("skipping instance variable block");
                p.skip_balanced(TokenKind::LBrace, TokenKind::RBrace);
            }

            p.member_list(CLASS_MEMBER_MESSAGE, false);

            p.keyword(TokenKind::AtEnd, "Expected @end to end class declaration")?;
            Ok(())
        })
    }

    fn superclass_name(&mut self) -> Result<(), SyntaxError> {
        let ident = self.identifier("Expected superclass name")?;
        let span = ident.span;
        self.leaf(NodeKind::SuperclassName(ident), span);
        Ok(())
    }

    /// A protocol list failure never aborts its declaration.
    fn optional_protocol_list(&mut self) {
        if !self.at(TokenKind::Lt) {
            return;
        }
        if let Err(mut err) = self.protocol_reference_list() {
            self.report(&mut err);
            self.skip_until(|kind| kind == TokenKind::Gt || is_member_sync(kind));
            self.eat(TokenKind::Gt);
        }
    }

    /// `'<' Identifier (',' Identifier)* '>'`
    pub(crate) fn protocol_reference_list(&mut self) -> Result<(), SyntaxError> {
        self.with_context(NodeKind::ProtocolReferenceList(Vec::new()), |p| {
            let protocols = p.comma_separated_list(TokenKind::Lt, TokenKind::Gt, true, |p| {
                p.identifier("Expected protocol name")
            })?;
            p.set_kind(NodeKind::ProtocolReferenceList(protocols));
            Ok(())
        })
    }

    /// `memberDecl*`, resynchronizing after every broken member.
    fn member_list(&mut self, unknown_member_message: &str, in_protocol: bool) {
        loop {
            let current = self.current();
            if ends_body(current) {
                break;
            }
            match current {
                TokenKind::AtProperty => {
                    let result = self.property_declaration();
                    self.recover_member(result);
                }
                TokenKind::Plus | TokenKind::Minus => {
                    let result = self.method_declaration();
                    self.recover_member(result);
                }
                TokenKind::AtOptional | TokenKind::AtRequired if in_protocol => {
                    self.in_optional = current == TokenKind::AtOptional;
                    let span = self.advance();
                    self.leaf(NodeKind::Keyword(current), span);
                }
                _ => self.unknown_member(unknown_member_message),
            }
        }
        self.in_optional = false;
    }

    fn recover_member(&mut self, result: Result<(), SyntaxError>) {
        if let Err(mut err) = result {
            self.report(&mut err);
            self.skip_until(is_member_sync);
        }
    }

    /// Report one diagnostic, then skip past the next `;` or up to the next
    /// member start and leave an `Invalid` node over the skipped tokens.
    fn unknown_member(&mut self, message: &str) {
        let mut err = self.error_here(message);
        self.report(&mut err);

        let start = self.advance().start;
        while !self.at_member_start() {
            if self.eat(TokenKind::Semicolon) {
                break;
            }
            self.advance();
        }
        self.leaf(NodeKind::Invalid, Span::new(start, self.last_end));
    }

    /// An `@`-keyword, or a method sign followed by its return type. A bare
    /// sign inside a broken declaration is an operator.
    fn at_member_start(&self) -> bool {
        let kind = self.current();
        kind == TokenKind::Eof
            || kind.is_at_keyword()
            || (matches!(kind, TokenKind::Plus | TokenKind::Minus) && self.nth(1) == TokenKind::LParen)
    }

    // ── Protocol ───────────────────────────────────────────────────────

    /// `'@protocol' Identifier ('<' protocolList '>')? (memberDecl | '@optional' | '@required')* '@end'`
    pub(crate) fn protocol_declaration(&mut self) -> Result<(), SyntaxError> {
        self.with_context(NodeKind::ProtocolDeclaration(ProtocolData::default()), |p| {
            p.keyword(TokenKind::AtProtocol, "Expected @protocol to start protocol declaration")?;

            let name = p.identifier("Expected identifier for protocol name")?;
            p.set_kind(NodeKind::ProtocolDeclaration(ProtocolData {
                name: NodeRef::Valid(name),
            }));

            p.optional_protocol_list();
            p.member_list(PROTOCOL_MEMBER_MESSAGE, true);

            p.keyword(TokenKind::AtEnd, "Expected @end to end protocol declaration")?;
            Ok(())
        })
    }

    // ── Property ───────────────────────────────────────────────────────

    /// `'@property' ('(' modifier (',' modifier)* ')')? typeName Identifier ';'`
    pub(crate) fn property_declaration(&mut self) -> Result<(), SyntaxError> {
        let is_optional = self.in_optional;
        let initial = NodeKind::Property(PropertyData {
            is_optional,
            ..PropertyData::default()
        });

        self.with_context(initial, |p| {
            p.keyword(TokenKind::AtProperty, "Expected @property declaration")?;

            if p.at(TokenKind::LParen) {
                p.property_modifier_list()?;
            }

            let ty = p.recover(
                |p| p.type_name("Expected type name"),
                |kind| kind == TokenKind::Ident || kind == TokenKind::Semicolon || is_member_sync(kind),
            );

            // A failed type that left no name behind is one broken construct.
            let name = if ty.is_invalid() && !p.at(TokenKind::Ident) {
                let at = p.current_span();
                p.skip_until(|kind| kind == TokenKind::Semicolon || is_member_sync(kind));
                NodeRef::Invalid(InvalidNode { at })
            } else {
                p.recover(
                    |p| p.identifier("Expected identifier for property name"),
                    |kind| kind == TokenKind::Semicolon || is_member_sync(kind),
                )
            };

            let recovered = ty.is_invalid() || name.is_invalid();
            p.set_kind(NodeKind::Property(PropertyData {
                ty,
                name,
                is_optional,
            }));

            if recovered && !p.at(TokenKind::Semicolon) {
                return Ok(());
            }
            p.token_node(TokenKind::Semicolon, "Expected ';' to end property declaration")?;
            Ok(())
        })
    }

    fn property_modifier_list(&mut self) -> Result<(), SyntaxError> {
        self.with_context(NodeKind::PropertyModifierList, |p| {
            p.comma_separated_list(TokenKind::LParen, TokenKind::RParen, true, |p| {
                p.property_modifier()
            })?;
            Ok(())
        })
    }

    /// `Identifier ('=' Identifier ':'?)?`
    fn property_modifier(&mut self) -> Result<(), SyntaxError> {
        let name = self.identifier("Expected property modifier")?;
        let start = name.span.start;

        let value = if self.eat(TokenKind::Eq) {
            let mut selector = self.identifier("Expected selector name after '='")?.name;
            if self.eat(TokenKind::Colon) {
                selector.push(':');
            }
            Some(selector)
        } else {
            None
        };

        self.leaf(
            NodeKind::PropertyModifier(PropertyModifierData {
                name: name.name,
                value,
            }),
            Span::new(start, self.last_end),
        );
        Ok(())
    }

    // ── Method ─────────────────────────────────────────────────────────

    /// `('-' | '+') ('(' typeName ')')? selector ';'`
    pub(crate) fn method_declaration(&mut self) -> Result<(), SyntaxError> {
        let initial = MethodData {
            is_class_method: self.at(TokenKind::Plus),
            return_type: None,
            selector: NodeRef::Placeholder,
            is_optional: self.in_optional,
        };

        self.with_context(NodeKind::MethodDeclaration(initial.clone()), |p| {
            let sign = p.current();
            p.token_node(sign, "Expected '-' or '+' to start method declaration")?;

            let return_type = if p.at(TokenKind::LParen) {
                Some(p.parenthesized_type()?)
            } else {
                None
            };

            let selector = p.method_selector()?;
            p.set_kind(NodeKind::MethodDeclaration(MethodData {
                return_type,
                selector: NodeRef::Valid(selector),
                ..initial
            }));

            p.skip_method_attributes();
            p.token_node(TokenKind::Semicolon, "Expected ';' to end method declaration")?;
            Ok(())
        })
    }

    /// `'(' typeName ')'`
    fn parenthesized_type(&mut self) -> Result<TypeNameNode, SyntaxError> {
        self.expect(TokenKind::LParen, "Expected '(' before type name")?;
        let ty = self.type_name("Expected type name")?;
        self.expect(TokenKind::RParen, "Expected ')' after type name")?;
        Ok(ty)
    }

    /// `Identifier | (Identifier? ':' ('(' typeName ')')? Identifier)+`
    fn method_selector(&mut self) -> Result<MethodSelector, SyntaxError> {
        let mut keyword = if self.at(TokenKind::Ident) {
            Some(self.identifier("Expected selector name")?)
        } else {
            None
        };

        if !self.at(TokenKind::Colon) {
            return match keyword {
                Some(ident) => Ok(MethodSelector::Simple(ident)),
                None => Err(self.error_here("Expected selector name in method declaration")),
            };
        }

        let mut arguments = Vec::new();
        loop {
            self.expect(TokenKind::Colon, "Expected ':' in method selector")?;
            let ty = if self.at(TokenKind::LParen) {
                Some(self.parenthesized_type()?)
            } else {
                None
            };
            let name = self.identifier("Expected parameter name")?;
            arguments.push(KeywordArgument {
                keyword: keyword.take(),
                ty,
                name,
            });

            if self.at(TokenKind::Ident) && self.nth(1) == TokenKind::Colon {
                keyword = Some(self.identifier("Expected selector name")?);
            } else if !self.at(TokenKind::Colon) {
                break;
            }
        }

        // variadic `, ...`
        if self.eat(TokenKind::Comma) {
            while self.eat(TokenKind::Dot) {}
        }

        Ok(MethodSelector::Keywords(arguments))
    }

    /// Trailing attribute macros such as `NS_DESIGNATED_INITIALIZER` or
    /// `NS_SWIFT_NAME(make())`.
    fn skip_method_attributes(&mut self) {
        while self.at(TokenKind::Ident) {
            self.advance();
            if self.at(TokenKind::LParen) {
                self.skip_balanced(TokenKind::LParen, TokenKind::RParen);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use morph_common::diagnostics::Diagnostics;

    use super::*;
    use crate::ast::{Node, ObjcType};

    fn parse_file(source: &str) -> (Node, Diagnostics) {
        let diagnostics = Diagnostics::new();
        let mut p = Parser::new(source, diagnostics.clone());
        p.source_file();
        let (root, _, _) = p.finish();
        (root, diagnostics)
    }

    #[test]
    fn class_header_parts() {
        let (root, diags) = parse_file("@interface A : B <P, Q>\n@end");
        assert!(diags.is_empty());
        let (class, data) = root.class_interfaces().next().unwrap();
        assert_eq!(data.name.valid().unwrap().name, "A");
        assert_eq!(class.superclass().unwrap().name, "B");
        assert_eq!(class.protocols(), vec!["P", "Q"]);
    }

    #[test]
    fn keyword_selector_method() {
        let (root, diags) = parse_file("@interface A\n- (void)setValue:(id)value forKey:(NSString *)key;\n@end");
        assert!(diags.is_empty());
        let (class, _) = root.class_interfaces().next().unwrap();
        let (_, method) = class.methods().next().unwrap();
        assert!(!method.is_class_method);
        assert_eq!(method.selector.valid().unwrap().to_string(), "setValue:forKey:");
        let MethodSelector::Keywords(args) = method.selector.valid().unwrap() else {
            panic!("expected keyword selector");
        };
        assert_eq!(args[1].name.name, "key");
        assert_eq!(
            args[1].ty.as_ref().unwrap().ty,
            ObjcType::Pointer(Box::new(ObjcType::Struct("NSString".into())))
        );
    }

    #[test]
    fn class_method_without_return_type() {
        let (root, diags) = parse_file("@interface A\n+ shared NS_SWIFT_NAME(shared());\n@end");
        assert!(diags.is_empty());
        let (class, _) = root.class_interfaces().next().unwrap();
        let (_, method) = class.methods().next().unwrap();
        assert!(method.is_class_method);
        assert!(method.return_type.is_none());
        assert_eq!(method.selector.valid().unwrap().to_string(), "shared");
    }

    #[test]
    fn getter_modifier() {
        let (root, diags) = parse_file("@interface A\n@property (nonatomic, getter=isEnabled) BOOL enabled;\n@end");
        assert!(diags.is_empty());
        let (class, _) = root.class_interfaces().next().unwrap();
        let (property, _) = class.properties().next().unwrap();
        let modifiers = property.property_modifiers();
        assert_eq!(modifiers.len(), 2);
        assert_eq!(modifiers[1].name, "getter");
        assert_eq!(modifiers[1].value.as_deref(), Some("isEnabled"));
    }

    #[test]
    fn missing_end_is_reported_once() {
        let (root, diags) = parse_file("@interface A\n@property int x;\n");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags.snapshot()[0].message, "Expected @end to end class declaration");
        let (class, _) = root.class_interfaces().next().unwrap();
        assert_eq!(class.properties().count(), 1);
    }

    #[test]
    fn missing_end_does_not_swallow_next_class() {
        let (root, diags) = parse_file("@interface A\n@interface B\n@end");
        assert_eq!(diags.len(), 1);
        assert_eq!(root.class_interfaces().count(), 2);
    }

    #[test]
    fn forward_declarations_are_skipped() {
        let (root, diags) = parse_file("@class A, B;\n@protocol P;\n@protocol Q\n@end");
        assert!(diags.is_empty());
        assert_eq!(root.protocol_declarations().count(), 1);
        assert!(root.class_interfaces().next().is_none());
    }
}
