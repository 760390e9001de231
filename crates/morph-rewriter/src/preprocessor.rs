//! Folding of `#define` constants into typed Swift expressions.

use std::sync::Arc;

use morph_ast::{Expression, SwiftType};
use morph_intentions::FileIntention;
use morph_parser::ast::ObjcType;
use morph_parser::{parse_expression, ObjcExpr};

use crate::invoker::DefaultTypeResolverInvoker;
use crate::reader::SwiftExprReader;
use crate::type_mapper::is_scalar;

/// A `#define` that can be emitted as a Swift constant.
#[derive(Clone, Debug, PartialEq)]
pub struct DirectiveConversion {
    pub name: String,
    pub ty: SwiftType,
    pub expression: Expression,
}

/// Converts object-like `#define` directives whose body is a constant
/// expression.
///
/// Function-like macros, bodies that do not parse as exactly one
/// expression, casts to non-scalar types and bodies that do not type-check
/// are all left unconverted.
pub struct PreprocessorDirectiveConverter {
    invoker: Arc<DefaultTypeResolverInvoker>,
    reader: SwiftExprReader,
}

impl PreprocessorDirectiveConverter {
    pub fn new(invoker: Arc<DefaultTypeResolverInvoker>) -> Self {
        Self {
            invoker,
            reader: SwiftExprReader::default(),
        }
    }

    pub fn convert(&self, directive: &str, in_file: &FileIntention) -> Option<DirectiveConversion> {
        let _span = tracing::trace_span!("convert_directive", directive).entered();

        let (name, body) = split_define(directive)?;
        if body.starts_with('(') {
            tracing::trace!(name, "skipping function-like macro");
            return None;
        }
        let body = body.replace("\\\n", " ");
        let body = body.trim();
        if body.is_empty() {
            tracing::trace!(name, "skipping macro with empty body");
            return None;
        }

        let objc = match parse_expression(body) {
            Ok(expr) => expr,
            Err(err) => {
                tracing::trace!(name, error = %err, "macro body is not an expression");
                return None;
            }
        };
        if let Some(ty) = non_scalar_type(&objc) {
            tracing::trace!(name, ty = %ty, "macro casts to a non-scalar type");
            return None;
        }
        let Some(expression) = self.reader.read(&objc) else {
            tracing::trace!(name, "macro body has no Swift equivalent");
            return None;
        };
        let Some(ty) = self.invoker.resolve_expression_type(&expression, in_file) else {
            tracing::trace!(name, "macro body does not type-check");
            return None;
        };

        Some(DirectiveConversion {
            name: name.to_string(),
            ty,
            expression,
        })
    }
}

/// `#define NAME rest` into `("NAME", rest)`. `rest` starts right after the
/// name, so a `(` there marks a function-like macro.
fn split_define(directive: &str) -> Option<(&str, &str)> {
    let rest = directive.trim_start().strip_prefix('#')?.trim_start();
    let rest = rest.strip_prefix("define")?;
    if !rest.starts_with(&[' ', '\t'][..]) {
        return None;
    }
    let rest = rest.trim_start_matches(&[' ', '\t'][..]);
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    let name = &rest[..end];
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    Some((name, &rest[end..]))
}

/// The first cast or `sizeof` type in `expr` that is not a C scalar.
fn non_scalar_type(expr: &ObjcExpr) -> Option<ObjcType> {
    let mut found = None;
    expr.walk(&mut |node| {
        if found.is_some() {
            return;
        }
        match node {
            ObjcExpr::Cast { ty, .. } | ObjcExpr::SizeofType(ty) if !is_scalar(ty) => {
                found = Some(ty.clone());
            }
            _ => {}
        }
    });
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_name_from_body() {
        assert_eq!(split_define("#define A 1"), Some(("A", " 1")));
        assert_eq!(split_define("  #  define\tB_2 (x)"), Some(("B_2", " (x)")));
        assert_eq!(split_define("#define F(x) x"), Some(("F", "(x) x")));
        assert_eq!(split_define("#defineA 1"), None);
        assert_eq!(split_define("#include <a.h>"), None);
        assert_eq!(split_define("#define 1A 1"), None);
    }
}
