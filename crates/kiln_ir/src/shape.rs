//! Constructible shapes.
//!
//! A shape is the ordered parameter-type list a caller needs a constructor to
//! accept. The parameterless shape asks for a default constructor.

use std::fmt;

use smallvec::SmallVec;

use crate::TypeIdentity;

/// Ordered parameter types requested from a constructor.
///
/// Most constructors take few parameters, so up to four are stored inline.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct ConstructibleShape {
    params: SmallVec<[TypeIdentity; 4]>,
}

impl ConstructibleShape {
    /// The shape of a parameterless constructor.
    #[inline]
    pub fn parameterless() -> Self {
        Self::default()
    }

    /// A shape with the given parameter types, in order.
    pub fn of(params: &[TypeIdentity]) -> Self {
        Self {
            params: SmallVec::from_slice(params),
        }
    }

    /// Parameter types, in order.
    #[inline]
    pub fn params(&self) -> &[TypeIdentity] {
        &self.params
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    #[inline]
    pub fn is_parameterless(&self) -> bool {
        self.params.is_empty()
    }
}

impl FromIterator<TypeIdentity> for ConstructibleShape {
    fn from_iter<I: IntoIterator<Item = TypeIdentity>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().collect(),
        }
    }
}

impl fmt::Debug for ConstructibleShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConstructibleShape{self}")
    }
}

impl fmt::Display for ConstructibleShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
