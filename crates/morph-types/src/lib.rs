//! Known types and the type systems that answer questions about them.

pub mod builder;
pub mod error;
pub mod known;
pub mod signature;
pub mod system;

pub use builder::KnownTypeBuilder;
pub use error::TypeSystemError;
pub use known::{KnownSupertype, KnownType};
pub use signature::{
    FunctionSignature, KnownConstructor, KnownProperty, Ownership, ParameterSignature, ValueStorage,
};
pub use system::{is_floating_type, is_integer_type, is_numeric_type, DefaultTypeSystem, TypeSystem};
