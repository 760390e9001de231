//! Shared building blocks for the Morph Objective-C to Swift rewriter.
//!
//! - [`span`]: byte-offset spans and line/column lookup
//! - [`token`]: the token vocabulary shared by the lexer and parser
//! - [`diagnostics`]: the thread-safe diagnostics sink and its renderer

pub mod diagnostics;
pub mod span;
pub mod token;
