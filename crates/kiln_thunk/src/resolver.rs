//! Constructor resolution.
//!
//! A resolver turns "type plus requested shape" into the one constructor a
//! thunk should be compiled from. The factory only sees the
//! `ConstructorResolver` trait; `MetadataResolver` is the implementation
//! backed by a `TypeRegistry` and a `ConstructorTable`.

use std::sync::Arc;

use kiln_ir::{ConstructibleShape, TypeIdentity, TypeRegistry};
use smallvec::SmallVec;

use crate::metadata::{ConstructorDescriptor, ConstructorTable};
use crate::ThunkError;

/// Source of constructor descriptors.
pub trait ConstructorResolver {
    /// Find the accessible constructor of `ty` whose parameters match `shape`.
    fn resolve(
        &self,
        ty: TypeIdentity,
        shape: &ConstructibleShape,
    ) -> Result<ConstructorDescriptor, ThunkError>;
}

impl<R: ConstructorResolver + ?Sized> ConstructorResolver for &R {
    fn resolve(
        &self,
        ty: TypeIdentity,
        shape: &ConstructibleShape,
    ) -> Result<ConstructorDescriptor, ThunkError> {
        (**self).resolve(ty, shape)
    }
}

impl<R: ConstructorResolver + ?Sized> ConstructorResolver for Arc<R> {
    fn resolve(
        &self,
        ty: TypeIdentity,
        shape: &ConstructibleShape,
    ) -> Result<ConstructorDescriptor, ThunkError> {
        (**self).resolve(ty, shape)
    }
}

/// How requested parameter types are compared with declared ones.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Every position must name the same type.
    #[default]
    Exact,
    /// A requested type also matches a parameter declared as one of its
    /// abstract supertypes. Concrete parameters still need the same type,
    /// since their arguments are checked against that runtime type on
    /// invocation. An exact match is always preferred.
    Assignable,
}

/// Resolver backed by registered metadata.
#[derive(Clone, Debug, Default)]
pub struct MetadataResolver {
    registry: TypeRegistry,
    table: ConstructorTable,
    policy: MatchPolicy,
}

impl MetadataResolver {
    pub fn new(registry: TypeRegistry, table: ConstructorTable) -> Self {
        Self {
            registry,
            table,
            policy: MatchPolicy::Exact,
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn table(&self) -> &ConstructorTable {
        &self.table
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    fn assignable(&self, ctor: &ConstructorDescriptor, shape: &ConstructibleShape) -> bool {
        ctor.params()
            .iter()
            .zip(shape.params())
            .all(|(param, &requested)| {
                param.identity == requested
                    || (param.runtime.is_none()
                        && self.registry.is_assignable(requested, param.identity))
            })
    }
}

impl ConstructorResolver for MetadataResolver {
    #[tracing::instrument(level = "debug", skip_all, fields(ty = %ty, shape = %shape))]
    fn resolve(
        &self,
        ty: TypeIdentity,
        shape: &ConstructibleShape,
    ) -> Result<ConstructorDescriptor, ThunkError> {
        let candidates: SmallVec<[&ConstructorDescriptor; 4]> = self
            .table
            .constructors(ty)
            .iter()
            .filter(|ctor| ctor.is_public() && ctor.arity() == shape.arity())
            .collect();

        let exact: SmallVec<[&ConstructorDescriptor; 2]> = candidates
            .iter()
            .copied()
            .filter(|ctor| ctor.matches_exactly(shape))
            .collect();
        if let Some(found) = single(&exact, ty, shape)? {
            return Ok(found.clone());
        }

        if self.policy == MatchPolicy::Assignable {
            let assignable: SmallVec<[&ConstructorDescriptor; 2]> = candidates
                .iter()
                .copied()
                .filter(|ctor| self.assignable(ctor, shape))
                .collect();
            if let Some(found) = single(&assignable, ty, shape)? {
                return Ok(found.clone());
            }
        }

        tracing::debug!(
            candidates = candidates.len(),
            "no constructor matches the requested shape"
        );
        Err(ThunkError::NoMatchingConstructor {
            ty,
            shape: shape.clone(),
        })
    }
}

/// The only match, `None` when nothing matched, or an ambiguity error.
fn single<'a>(
    matches: &[&'a ConstructorDescriptor],
    ty: TypeIdentity,
    shape: &ConstructibleShape,
) -> Result<Option<&'a ConstructorDescriptor>, ThunkError> {
    match matches {
        [] => Ok(None),
        [found] => Ok(Some(*found)),
        _ => Err(ThunkError::AmbiguousConstructor {
            ty,
            shape: shape.clone(),
            candidates: matches.len(),
        }),
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
