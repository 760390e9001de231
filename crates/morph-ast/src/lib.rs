//! Swift-side syntax for the Morph rewriter.
//!
//! - [`types`]: `SwiftType`
//! - [`expr`]: the expression tree emitted for macro bodies and initializers
//! - [`matcher`]: composable structural matchers over those trees
//! - [`postfix`]: flattening of right-associated postfix chains
//! - [`sequence`]: pre-order descendant traversal

pub mod expr;
pub mod matcher;
pub mod postfix;
pub mod sequence;
pub mod types;

pub use expr::{Constant, Expression, FunctionArgument, Postfix, SwiftOperator};
pub use matcher::{Captures, MatchRule, ValueMatcher};
pub use postfix::{PostfixChain, PostfixChainInverter};
pub use types::SwiftType;
