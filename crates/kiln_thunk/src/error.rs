//! Thunk resolution and invocation errors.

use kiln_ir::{ConstructibleShape, TypeIdentity};

/// Error from resolving, compiling or invoking a thunk.
///
/// Resolution errors leave the factory's slot empty, so a later request with
/// a satisfiable shape still compiles.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ThunkError {
    /// No accessible constructor has exactly the requested parameters.
    #[error("no accessible constructor of `{ty}` matches {shape}")]
    NoMatchingConstructor {
        ty: TypeIdentity,
        shape: ConstructibleShape,
    },
    /// Several constructors match and none is preferred.
    #[error("{candidates} constructors of `{ty}` match {shape}")]
    AmbiguousConstructor {
        ty: TypeIdentity,
        shape: ConstructibleShape,
        candidates: usize,
    },
    /// A thunk is already cached for the type under a different shape.
    #[error("thunk for `{ty}` was compiled for {cached}, requested {requested}")]
    ShapeConflict {
        ty: TypeIdentity,
        cached: ConstructibleShape,
        requested: ConstructibleShape,
    },
    /// The thunk was invoked with the wrong number of arguments.
    #[error("wrong number of arguments: expected {expected}, found {found}")]
    ArgumentCount { expected: usize, found: usize },
    /// An argument does not have the parameter's type.
    #[error("argument {position} is not a `{expected}`")]
    ArgumentType {
        position: usize,
        expected: TypeIdentity,
    },
    /// The constructed instance is not of the requested Rust type.
    #[error("constructed instance is not a `{expected}`")]
    InstanceType { expected: &'static str },
}
