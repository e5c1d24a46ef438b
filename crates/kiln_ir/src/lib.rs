//! Shared vocabulary for Kiln.
//!
//! - `TypeIdentity`: the O(1)-comparable key of every per-type cache
//! - `TypeRegistry`: issues identities and records per-type metadata
//! - `ConstructibleShape`: the constructor signature a caller asks for

mod identity;
mod registry;
mod shape;

pub use identity::TypeIdentity;
pub use registry::{RegistryError, TypeInfo, TypeRegistry};
pub use shape::ConstructibleShape;
