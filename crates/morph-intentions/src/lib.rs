//! Intentions: the rewriter's plan for the Swift it will emit.
//!
//! An [`IntentionCollection`] holds [`FileIntention`]s; each file holds
//! [`TypeIntention`]s and file-scope functions and variables; each type
//! holds its members. Intentions are created from the parsed AST and then
//! rewritten in place by intention passes, which log what they did in the
//! intention's [`IntentionHistory`].

pub mod collection;
pub mod file;
pub mod history;
pub mod members;
pub mod types;

use morph_parser::ast::{NodeId, SourceRange};

pub use collection::IntentionCollection;
pub use file::FileIntention;
pub use history::{HistoryEntry, IntentionHistory};
pub use members::{InitIntention, MethodIntention, PropertyAttribute, PropertyIntention};
pub use types::{GlobalFunctionIntention, GlobalVariableIntention, TypeIntention, TypeIntentionKind};

/// The AST node an intention was created from.
///
/// A lookup key only: the AST is not kept alive through it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Provenance {
    pub node: NodeId,
    pub range: SourceRange,
}
