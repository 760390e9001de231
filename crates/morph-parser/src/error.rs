//! Syntax error type for the Morph parser.

use std::fmt;

use morph_common::span::Span;

/// A required token or construct was missing.
///
/// The message is supplied by the grammar rule that expected the construct;
/// the span is where the parser was when it noticed.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    pub message: String,
    pub span: Span,
    /// Set once the error has been written to the diagnostics sink, so a
    /// rule that reports and re-raises does not get it reported twice.
    pub reported: bool,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            reported: false,
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SyntaxError {}
