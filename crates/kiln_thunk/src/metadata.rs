//! Constructor metadata.
//!
//! The table plays the part of a reflection layer: for each type it lists the
//! constructors that exist, their parameter types and their visibility.
//! Resolution against a requested shape lives in `resolver`.

use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use kiln_ir::{ConstructibleShape, TypeIdentity, TypeRegistry};
use rustc_hash::FxHashMap;

use crate::{Args, ThunkError};

/// A freshly constructed value.
pub type Instance = Box<dyn Any + Send>;

/// Body of a constructor: builds an instance from checked arguments.
pub type ConstructorBody = Arc<dyn Fn(Args<'_>) -> Result<Instance, ThunkError> + Send + Sync>;

/// Whether a constructor may be resolved.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Public,
    /// Recorded but never resolved.
    Private,
}

/// A declared constructor parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ParamType {
    pub identity: TypeIdentity,
    /// Runtime type arguments are checked against; `None` for abstract types.
    pub runtime: Option<TypeId>,
}

impl ParamType {
    /// Describe a parameter, looking up its runtime type in `registry`.
    pub fn resolve(registry: &TypeRegistry, identity: TypeIdentity) -> Self {
        Self {
            identity,
            runtime: registry.runtime_type(identity),
        }
    }
}

/// One constructor of one type.
#[derive(Clone)]
pub struct ConstructorDescriptor {
    declaring: TypeIdentity,
    params: Vec<ParamType>,
    visibility: Visibility,
    body: ConstructorBody,
}

impl ConstructorDescriptor {
    pub fn new(
        declaring: TypeIdentity,
        params: Vec<ParamType>,
        visibility: Visibility,
        body: impl Fn(Args<'_>) -> Result<Instance, ThunkError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            declaring,
            params,
            visibility,
            body: Arc::new(body),
        }
    }

    pub fn declaring(&self) -> TypeIdentity {
        self.declaring
    }

    pub fn params(&self) -> &[ParamType] {
        &self.params
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Declared parameter types as a shape.
    pub fn signature(&self) -> ConstructibleShape {
        self.params.iter().map(|param| param.identity).collect()
    }

    /// Check whether the declared parameters are exactly `shape`.
    pub fn matches_exactly(&self, shape: &ConstructibleShape) -> bool {
        self.params.len() == shape.arity()
            && self
                .params
                .iter()
                .zip(shape.params())
                .all(|(param, requested)| param.identity == *requested)
    }

    pub(crate) fn body(&self) -> &ConstructorBody {
        &self.body
    }
}

impl fmt::Debug for ConstructorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorDescriptor")
            .field("declaring", &self.declaring)
            .field("signature", &self.signature())
            .field("visibility", &self.visibility)
            .finish_non_exhaustive()
    }
}

/// Constructors of every described type.
#[derive(Clone, Debug, Default)]
pub struct ConstructorTable {
    by_type: FxHashMap<TypeIdentity, Vec<ConstructorDescriptor>>,
}

impl ConstructorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a constructor under its declaring type.
    pub fn add(&mut self, descriptor: ConstructorDescriptor) {
        self.by_type
            .entry(descriptor.declaring())
            .or_default()
            .push(descriptor);
    }

    /// Start describing the constructors of Rust type `T`.
    ///
    /// Registers `T` if it is not registered yet.
    pub fn define<'a, T: Any + Send>(
        &'a mut self,
        registry: &'a mut TypeRegistry,
    ) -> TypeConstructors<'a, T> {
        let declaring = registry.register::<T>();
        TypeConstructors {
            table: self,
            registry,
            declaring,
            marker: PhantomData,
        }
    }

    /// Constructors declared by `ty`, in definition order.
    pub fn constructors(&self, ty: TypeIdentity) -> &[ConstructorDescriptor] {
        self.by_type.get(&ty).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of described types.
    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

/// Builder adding constructors of `T` to a `ConstructorTable`.
pub struct TypeConstructors<'a, T> {
    table: &'a mut ConstructorTable,
    registry: &'a TypeRegistry,
    declaring: TypeIdentity,
    marker: PhantomData<fn() -> T>,
}

impl<T: Any + Send> TypeConstructors<'_, T> {
    /// Identity of `T`.
    pub fn identity(&self) -> TypeIdentity {
        self.declaring
    }

    /// Add a public constructor taking `params`.
    #[must_use]
    pub fn public(
        self,
        params: &[TypeIdentity],
        body: impl Fn(Args<'_>) -> Result<T, ThunkError> + Send + Sync + 'static,
    ) -> Self {
        self.constructor(Visibility::Public, params, body)
    }

    /// Add a private constructor taking `params`.
    #[must_use]
    pub fn private(
        self,
        params: &[TypeIdentity],
        body: impl Fn(Args<'_>) -> Result<T, ThunkError> + Send + Sync + 'static,
    ) -> Self {
        self.constructor(Visibility::Private, params, body)
    }

    /// Add a public parameterless constructor calling `T::default()`.
    #[must_use]
    pub fn with_default(self) -> Self
    where
        T: Default,
    {
        self.public(&[], |_| Ok(T::default()))
    }

    fn constructor(
        self,
        visibility: Visibility,
        params: &[TypeIdentity],
        body: impl Fn(Args<'_>) -> Result<T, ThunkError> + Send + Sync + 'static,
    ) -> Self {
        let params = params
            .iter()
            .map(|&identity| ParamType::resolve(self.registry, identity))
            .collect();
        self.table.add(ConstructorDescriptor::new(
            self.declaring,
            params,
            visibility,
            move |args| body(args).map(|value| Box::new(value) as Instance),
        ));
        self
    }

    /// Finish, returning the identity of `T`.
    pub fn finish(self) -> TypeIdentity {
        self.declaring
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
