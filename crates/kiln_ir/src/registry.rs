//! Type identity registry.
//!
//! Issues one `TypeIdentity` per distinct type and records the metadata the
//! constructor resolver needs: a display name, the runtime `TypeId` used to
//! check arguments, and the direct supertypes used for assignability.
//!
//! Rust types are registered idempotently through [`TypeRegistry::register`].
//! Abstract types (interfaces, base contracts) have no runtime representation
//! and get a fresh identity from [`TypeRegistry::register_abstract`].

use std::any::{Any, TypeId};

use rustc_hash::{FxHashMap, FxHashSet};

use crate::TypeIdentity;

/// Error when issuing a new identity fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The 32-bit handle space is exhausted.
    #[error("type registry exceeded capacity: {count} identities issued")]
    Overflow { count: usize },
}

/// Metadata recorded for one registered type.
#[derive(Debug, Clone)]
pub struct TypeInfo {
    name: String,
    runtime: Option<TypeId>,
    supertypes: Vec<TypeIdentity>,
}

impl TypeInfo {
    fn new(name: impl Into<String>, runtime: Option<TypeId>) -> Self {
        Self {
            name: name.into(),
            runtime,
            supertypes: Vec::new(),
        }
    }

    /// Display name of the type.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runtime type, or `None` for abstract types.
    pub fn runtime(&self) -> Option<TypeId> {
        self.runtime
    }

    /// Direct supertypes, in registration order.
    pub fn supertypes(&self) -> &[TypeIdentity] {
        &self.supertypes
    }
}

/// Issues and describes type identities.
///
/// # Pre-registered Types
/// The primitives `()`, `bool`, `i32`, `i64`, `f64`, `char`, `u8` and `String`
/// are registered at construction with the fixed handles in `TypeIdentity`.
#[derive(Clone, Debug)]
pub struct TypeRegistry {
    /// Indexed by raw handle. Index 0 and the reserved range are `None`.
    infos: Vec<Option<TypeInfo>>,
    by_runtime: FxHashMap<TypeId, TypeIdentity>,
}

impl TypeRegistry {
    /// Create a registry with the primitives pre-registered.
    pub fn new() -> Self {
        let mut registry = Self {
            infos: Vec::with_capacity(64),
            by_runtime: FxHashMap::default(),
        };
        registry
            .infos
            .resize_with(TypeIdentity::FIRST_DYNAMIC as usize, || None);

        registry.preregister::<()>(TypeIdentity::UNIT);
        registry.preregister::<bool>(TypeIdentity::BOOL);
        registry.preregister::<i32>(TypeIdentity::I32);
        registry.preregister::<i64>(TypeIdentity::I64);
        registry.preregister::<f64>(TypeIdentity::F64);
        registry.preregister::<char>(TypeIdentity::CHAR);
        registry.preregister::<u8>(TypeIdentity::U8);
        registry.preregister::<String>(TypeIdentity::STRING);
        registry
    }

    fn preregister<T: Any>(&mut self, ty: TypeIdentity) {
        let name = ty.primitive_name().unwrap_or("<primitive>");
        self.infos[ty.raw() as usize] = Some(TypeInfo::new(name, Some(TypeId::of::<T>())));
        self.by_runtime.insert(TypeId::of::<T>(), ty);
    }

    fn issue(&mut self, info: TypeInfo) -> Result<TypeIdentity, RegistryError> {
        let count = self.infos.len();
        let ty = u32::try_from(count)
            .ok()
            .and_then(TypeIdentity::from_raw)
            .ok_or(RegistryError::Overflow { count })?;
        self.infos.push(Some(info));
        Ok(ty)
    }

    /// Try to register a Rust type, returning its identity.
    ///
    /// Registering the same type again returns the identity issued the
    /// first time.
    pub fn try_register<T: Any>(&mut self) -> Result<TypeIdentity, RegistryError> {
        let runtime = TypeId::of::<T>();
        if let Some(&ty) = self.by_runtime.get(&runtime) {
            return Ok(ty);
        }
        let ty = self.issue(TypeInfo::new(std::any::type_name::<T>(), Some(runtime)))?;
        self.by_runtime.insert(runtime, ty);
        Ok(ty)
    }

    /// Register a Rust type, returning its identity.
    ///
    /// # Panics
    /// Panics if the handle space is exhausted. Use `try_register` for
    /// fallible registration.
    pub fn register<T: Any>(&mut self) -> TypeIdentity {
        self.try_register::<T>().unwrap_or_else(|e| panic!("{e}"))
    }

    /// Try to register an abstract type with no runtime representation.
    ///
    /// Every call issues a fresh identity, even for a repeated name.
    pub fn try_register_abstract(
        &mut self,
        name: impl Into<String>,
    ) -> Result<TypeIdentity, RegistryError> {
        self.issue(TypeInfo::new(name, None))
    }

    /// Register an abstract type with no runtime representation.
    ///
    /// # Panics
    /// Panics if the handle space is exhausted.
    pub fn register_abstract(&mut self, name: impl Into<String>) -> TypeIdentity {
        self.try_register_abstract(name)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    /// Record `sup` as a direct supertype of `ty`.
    ///
    /// Returns `false` if `ty` was not issued by this registry.
    pub fn add_supertype(&mut self, ty: TypeIdentity, sup: TypeIdentity) -> bool {
        match self.infos.get_mut(ty.raw() as usize) {
            Some(Some(info)) => {
                if !info.supertypes.contains(&sup) {
                    info.supertypes.push(sup);
                }
                true
            }
            _ => false,
        }
    }

    /// Check whether a value of type `from` can be passed where `to` is expected.
    ///
    /// Reflexive, and transitive over recorded supertypes.
    pub fn is_assignable(&self, from: TypeIdentity, to: TypeIdentity) -> bool {
        if from == to {
            return true;
        }
        let mut visited = FxHashSet::default();
        let mut stack = vec![from];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            let Some(info) = self.info(current) else {
                continue;
            };
            for &sup in &info.supertypes {
                if sup == to {
                    return true;
                }
                stack.push(sup);
            }
        }
        false
    }

    /// Look up the metadata of an identity.
    pub fn info(&self, ty: TypeIdentity) -> Option<&TypeInfo> {
        self.infos.get(ty.raw() as usize).and_then(Option::as_ref)
    }

    /// Display name of an identity.
    pub fn name(&self, ty: TypeIdentity) -> Option<&str> {
        self.info(ty).map(TypeInfo::name)
    }

    /// Runtime type of an identity, `None` for abstract or unknown types.
    pub fn runtime_type(&self, ty: TypeIdentity) -> Option<TypeId> {
        self.info(ty).and_then(TypeInfo::runtime)
    }

    /// Identity of an already registered Rust type.
    pub fn identity_of<T: Any>(&self) -> Option<TypeIdentity> {
        self.by_runtime.get(&TypeId::of::<T>()).copied()
    }

    /// Number of registered types, primitives included.
    pub fn len(&self) -> usize {
        self.infos.iter().filter(|info| info.is_some()).count()
    }

    /// Always `false`: primitives are registered at construction.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
