//! Type names: `typeName := nullability? Identifier ('<' ... '>')? '*'*`.

use morph_common::span::Span;
use morph_common::token::TokenKind;

use crate::ast::{Nullability, ObjcType, TypeNameNode};
use crate::error::SyntaxError;

use super::Parser;

/// Qualifiers that do not change how a type maps and are dropped.
const TYPE_QUALIFIERS: &[&str] = &[
    "const",
    "volatile",
    "IBOutlet",
    "__weak",
    "__strong",
    "__unsafe_unretained",
    "__autoreleasing",
    "__kindof",
    "__block",
];

/// Words that may be followed by another scalar word (`unsigned int`).
const SCALAR_MODIFIERS: &[&str] = &["unsigned", "signed", "long", "short"];

/// Words that may follow a scalar modifier.
const SCALAR_WORDS: &[&str] = &["int", "char", "short", "long", "double"];

impl<'src> Parser<'src> {
    /// Parse a full type name. Any failure inside it is reported with
    /// `message` at the point the type stopped making sense.
    pub(crate) fn type_name(&mut self, message: &str) -> Result<TypeNameNode, SyntaxError> {
        let start = self.current_span().start;
        let mut nullability = self.type_qualifiers();

        let ty = self
            .objc_type(&mut nullability)
            .map_err(|err| SyntaxError::new(message, err.span))?;

        Ok(TypeNameNode {
            ty,
            nullability,
            span: Span::new(start, self.last_end),
        })
    }

    /// Consume qualifiers, returning a nullability qualifier if one was seen.
    fn type_qualifiers(&mut self) -> Option<Nullability> {
        let mut nullability = None;
        while self.at(TokenKind::Ident) {
            let word = self.current_text();
            if let Some(found) = Nullability::from_qualifier(word) {
                nullability = Some(found);
            } else if !TYPE_QUALIFIERS.contains(&word) {
                break;
            }
            self.advance();
        }
        nullability
    }

    fn objc_type(&mut self, nullability: &mut Option<Nullability>) -> Result<ObjcType, SyntaxError> {
        let name = self.type_base_name()?;

        let mut ty = if self.at(TokenKind::Lt) {
            if name == "id" {
                let protocols = self.comma_separated_list(TokenKind::Lt, TokenKind::Gt, false, |p| {
                    p.identifier("Expected protocol name").map(|ident| ident.name)
                })?;
                ObjcType::Id { protocols }
            } else {
                let parameters = self.comma_separated_list(TokenKind::Lt, TokenKind::Gt, false, |p| {
                    p.type_qualifiers();
                    let mut inner = None;
                    p.objc_type(&mut inner)
                })?;
                ObjcType::Generic { name, parameters }
            }
        } else if name == "id" {
            ObjcType::Id { protocols: Vec::new() }
        } else {
            ObjcType::Struct(name)
        };

        // '*' : pointer, possibly followed by `const` or a nullability suffix
        while self.eat(TokenKind::Star) {
            ty = ObjcType::Pointer(Box::new(ty));
            if let Some(found) = self.type_qualifiers() {
                *nullability = Some(found);
            }
        }

        Ok(ty)
    }

    /// A base identifier, folding multi-word C scalars into one name.
    fn type_base_name(&mut self) -> Result<String, SyntaxError> {
        if !self.at(TokenKind::Ident) {
            return Err(self.error_here("Expected type name"));
        }
        let mut last = self.current_text();
        let mut name = last.to_string();
        self.advance();

        while SCALAR_MODIFIERS.contains(&last)
            && self.at(TokenKind::Ident)
            && SCALAR_WORDS.contains(&self.current_text())
        {
            last = self.current_text();
            name.push(' ');
            name.push_str(last);
            self.advance();
        }
        Ok(name)
    }

    /// `open item (',' item)* close`.
    ///
    /// A trailing comma before `close` is reported once and ends the list.
    /// When `record_tokens` is set the delimiters are attached as `Token`
    /// leaves of the active context.
    pub(crate) fn comma_separated_list<T>(
        &mut self,
        open: TokenKind,
        close: TokenKind,
        record_tokens: bool,
        mut item: impl FnMut(&mut Self) -> Result<T, SyntaxError>,
    ) -> Result<Vec<T>, SyntaxError> {
        let open_message = format!("Expected '{}'", open.describe());
        let close_message = format!("Expected '{}' to close list", close.describe());

        self.list_token(open, record_tokens, &open_message)?;

        let mut items = Vec::new();
        let mut expects_item = false;
        loop {
            if close == TokenKind::Gt {
                self.split_shr();
            }
            if self.at(close) || self.at(TokenKind::Eof) {
                break;
            }
            items.push(item(self)?);
            expects_item = false;

            if !self.at(TokenKind::Comma) {
                break;
            }
            self.list_token(TokenKind::Comma, record_tokens, "Expected ','")?;
            expects_item = true;
        }

        if expects_item {
            let mut err = self.error_here("Expected item after comma");
            if self.is_speculating() {
                return Err(err);
            }
            self.report(&mut err);
        }

        if close == TokenKind::Gt {
            self.split_shr();
        }
        self.list_token(close, record_tokens, &close_message)?;
        Ok(items)
    }

    fn list_token(&mut self, kind: TokenKind, record: bool, message: &str) -> Result<(), SyntaxError> {
        if record {
            self.token_node(kind, message)?;
        } else {
            self.expect(kind, message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use morph_common::diagnostics::Diagnostics;

    use super::*;

    fn type_of(source: &str) -> Result<TypeNameNode, SyntaxError> {
        let mut p = Parser::new(source, Diagnostics::new());
        p.type_name("Expected type name")
    }

    #[test]
    fn pointer_type() {
        let ty = type_of("NSString *").unwrap();
        assert_eq!(ty.ty, ObjcType::Pointer(Box::new(ObjcType::Struct("NSString".into()))));
        assert_eq!(ty.to_string(), "NSString*");
    }

    #[test]
    fn multi_word_scalar() {
        assert_eq!(type_of("unsigned long long x").unwrap().ty, ObjcType::Struct("unsigned long long".into()));
        assert_eq!(type_of("long x").unwrap().ty, ObjcType::Struct("long".into()));
    }

    #[test]
    fn protocol_qualified_id() {
        let ty = type_of("id<NSCopying, NSCoding>").unwrap();
        assert_eq!(
            ty.ty,
            ObjcType::Id {
                protocols: vec!["NSCopying".into(), "NSCoding".into()]
            }
        );
    }

    #[test]
    fn nested_generics_close_on_shift_token() {
        let ty = type_of("NSArray<NSArray<NSString *>> *").unwrap();
        assert_eq!(ty.to_string(), "NSArray<NSArray<NSString*>>*");
    }

    #[test]
    fn nullability_prefix_and_suffix() {
        let prefix = type_of("nullable NSString *").unwrap();
        assert_eq!(prefix.nullability, Some(Nullability::Nullable));
        let suffix = type_of("NSString * _Nonnull").unwrap();
        assert_eq!(suffix.nullability, Some(Nullability::Nonnull));
        assert_eq!(suffix.to_string(), "nonnull NSString*");
    }

    #[test]
    fn failure_uses_caller_message() {
        let err = type_of(";").unwrap_err();
        assert_eq!(err.message, "Expected type name");
        assert_eq!(err.span.start, 0);
    }
}
