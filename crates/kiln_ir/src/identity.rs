//! Type identity handle.
//!
//! `TypeIdentity` is the key of every Kiln cache. It is a 32-bit, never-zero
//! handle issued by [`TypeRegistry`](crate::TypeRegistry).
//!
//! # Design
//!
//! - Equality and hashing use the raw handle only, never a type name
//! - Well-known primitive types have fixed handles (1-8)
//! - `Option<TypeIdentity>` is the same size as `TypeIdentity`

use std::fmt;
use std::num::NonZeroU32;

/// A handle denoting one distinct type.
///
/// Two identities compare equal iff they were issued for the same type by the
/// same registry.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeIdentity(NonZeroU32);

/// Build a handle from a literal known to be non-zero.
const fn fixed(raw: u32) -> TypeIdentity {
    match NonZeroU32::new(raw) {
        Some(handle) => TypeIdentity(handle),
        None => panic!("type identity handles are never zero"),
    }
}

impl TypeIdentity {
    // === Primitive Types (handles 1-8) ===
    // Pre-registered by every `TypeRegistry`.

    /// The unit type `()`.
    pub const UNIT: Self = fixed(1);
    /// `bool`.
    pub const BOOL: Self = fixed(2);
    /// `i32`.
    pub const I32: Self = fixed(3);
    /// `i64`.
    pub const I64: Self = fixed(4);
    /// `f64`.
    pub const F64: Self = fixed(5);
    /// `char`.
    pub const CHAR: Self = fixed(6);
    /// `u8`.
    pub const U8: Self = fixed(7);
    /// `String`.
    pub const STRING: Self = fixed(8);

    // === Reserved Range (9-15) ===

    /// First handle issued for dynamically registered types.
    pub const FIRST_DYNAMIC: u32 = 16;

    /// Number of pre-registered primitive types.
    pub const PRIMITIVE_COUNT: u32 = 8;

    /// Create an identity from a raw handle, or `None` for zero.
    #[inline]
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match NonZeroU32::new(raw) {
            Some(handle) => Some(Self(handle)),
            None => None,
        }
    }

    /// Get the raw handle.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0.get()
    }

    /// Check if this is one of the pre-registered primitives.
    #[inline]
    pub const fn is_primitive(self) -> bool {
        self.0.get() <= Self::PRIMITIVE_COUNT
    }

    /// Get the name of a primitive type.
    ///
    /// Dynamic types need a registry to render their names.
    #[inline]
    pub const fn primitive_name(self) -> Option<&'static str> {
        match self.0.get() {
            1 => Some("()"),
            2 => Some("bool"),
            3 => Some("i32"),
            4 => Some("i64"),
            5 => Some("f64"),
            6 => Some("char"),
            7 => Some("u8"),
            8 => Some("String"),
            _ => None,
        }
    }
}

impl fmt::Debug for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.primitive_name() {
            Some(name) => write!(f, "TypeIdentity({name})"),
            None => write!(f, "TypeIdentity({})", self.raw()),
        }
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.primitive_name() {
            Some(name) => f.write_str(name),
            None => write!(f, "type#{}", self.raw()),
        }
    }
}

// Compile-time size assertions: the handle is 4 bytes, with a niche for `None`
const _: () = assert!(std::mem::size_of::<TypeIdentity>() == 4);
const _: () = assert!(std::mem::size_of::<Option<TypeIdentity>>() == 4);

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
