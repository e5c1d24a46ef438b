//! Compiled construction thunks.
//!
//! Kiln has no runtime code generation. "Compiling" a constructor means
//! freezing the resolved descriptor together with a marshaling plan: the
//! runtime type expected at each parameter position. Invoking the thunk
//! checks the arguments against the plan and calls the constructor body, with
//! no further metadata lookup.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use kiln_ir::{ConstructibleShape, TypeIdentity};

use crate::metadata::{ConstructorBody, ConstructorDescriptor, Instance, ParamType};
use crate::ThunkError;

/// Checked arguments handed to a constructor body.
#[derive(Copy, Clone)]
pub struct Args<'a> {
    values: &'a [&'a dyn Any],
    params: &'a [ParamType],
}

impl<'a> Args<'a> {
    pub fn new(values: &'a [&'a dyn Any], params: &'a [ParamType]) -> Self {
        Self { values, params }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Borrow the argument at `position` as a `T`.
    pub fn get<T: Any>(&self, position: usize) -> Result<&'a T, ThunkError> {
        self.values
            .get(position)
            .and_then(|value| (*value).downcast_ref::<T>())
            .ok_or_else(|| ThunkError::ArgumentType {
                position,
                expected: self
                    .params
                    .get(position)
                    .map_or(TypeIdentity::UNIT, |param| param.identity),
            })
    }

    /// Clone the argument at `position` as a `T`.
    pub fn cloned<T: Any + Clone>(&self, position: usize) -> Result<T, ThunkError> {
        self.get::<T>(position).cloned()
    }
}

struct ThunkInner {
    declaring: TypeIdentity,
    /// Shape the thunk was compiled for.
    signature: ConstructibleShape,
    /// Declared parameters, one marshaling step per position.
    plan: Vec<ParamType>,
    body: ConstructorBody,
}

/// A compiled, immutable construction routine for one type.
///
/// Cloning shares the compiled routine. Every invocation produces a fresh
/// instance; the thunk itself holds no mutable state and may be invoked from
/// several threads at once.
#[derive(Clone)]
pub struct CompiledThunk {
    inner: Arc<ThunkInner>,
}

impl CompiledThunk {
    /// Compile `descriptor` for its own declared signature.
    pub fn compile(descriptor: &ConstructorDescriptor) -> Self {
        Self::compile_for(descriptor, &descriptor.signature())
    }

    /// Compile `descriptor` for the shape a caller requested.
    ///
    /// `requested` may differ from the declared signature when the resolver
    /// accepted supertype parameters.
    pub fn compile_for(descriptor: &ConstructorDescriptor, requested: &ConstructibleShape) -> Self {
        Self {
            inner: Arc::new(ThunkInner {
                declaring: descriptor.declaring(),
                signature: requested.clone(),
                plan: descriptor.params().to_vec(),
                body: Arc::clone(descriptor.body()),
            }),
        }
    }

    /// Type constructed by this thunk.
    pub fn declaring(&self) -> TypeIdentity {
        self.inner.declaring
    }

    /// Shape this thunk was compiled for.
    pub fn signature(&self) -> &ConstructibleShape {
        &self.inner.signature
    }

    pub fn arity(&self) -> usize {
        self.inner.plan.len()
    }

    /// Check whether both handles share one compiled routine.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Construct an instance through a parameterless thunk.
    #[inline]
    pub fn invoke(&self) -> Result<Instance, ThunkError> {
        self.invoke_with(&[])
    }

    /// Construct an instance from `args`, checked against the plan.
    pub fn invoke_with(&self, args: &[&dyn Any]) -> Result<Instance, ThunkError> {
        let plan = &self.inner.plan;
        if args.len() != plan.len() {
            return Err(ThunkError::ArgumentCount {
                expected: plan.len(),
                found: args.len(),
            });
        }
        for (position, (arg, param)) in args.iter().zip(plan).enumerate() {
            if let Some(expected) = param.runtime {
                if Any::type_id(*arg) != expected {
                    return Err(ThunkError::ArgumentType {
                        position,
                        expected: param.identity,
                    });
                }
            }
        }
        (self.inner.body)(Args::new(args, plan))
    }

    /// Construct a `T` through a parameterless thunk.
    pub fn invoke_as<T: Any>(&self) -> Result<T, ThunkError> {
        self.invoke().and_then(downcast)
    }

    /// Construct a `T` from `args`.
    pub fn invoke_with_as<T: Any>(&self, args: &[&dyn Any]) -> Result<T, ThunkError> {
        self.invoke_with(args).and_then(downcast)
    }
}

fn downcast<T: Any>(instance: Instance) -> Result<T, ThunkError> {
    if (*instance).type_id() != TypeId::of::<T>() {
        return Err(ThunkError::InstanceType {
            expected: std::any::type_name::<T>(),
        });
    }
    instance
        .downcast::<T>()
        .map(|boxed| *boxed)
        .map_err(|_| ThunkError::InstanceType {
            expected: std::any::type_name::<T>(),
        })
}

impl fmt::Debug for CompiledThunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledThunk")
            .field("declaring", &self.inner.declaring)
            .field("signature", &self.inner.signature)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
