//! Lazily compiled construction thunks, memoized per type.
//!
//! Asking a `ThunkFactory` for a type's thunk looks the type up in a
//! `TypeCache`. On first request the factory asks its `ConstructorResolver`
//! for the constructor matching the requested shape, compiles it into a
//! `CompiledThunk` and stores it in the slot. Every later request is a single
//! cache probe.
//!
//! ```text
//! get_thunk(ty, shape)
//!   -> TypeCache::get_or_insert_ref(ty)
//!        Some(thunk) -> clone
//!        None        -> resolver.resolve(ty, shape) -> compile -> store
//! ```

mod error;
mod factory;
mod metadata;
mod resolver;
mod shared;
mod thunk;

pub use error::ThunkError;
pub use factory::{FactoryStats, ThunkFactory};
pub use metadata::{
    ConstructorBody, ConstructorDescriptor, ConstructorTable, Instance, ParamType,
    TypeConstructors, Visibility,
};
pub use resolver::{ConstructorResolver, MatchPolicy, MetadataResolver};
pub use shared::SharedThunkFactory;
pub use thunk::{Args, CompiledThunk};
