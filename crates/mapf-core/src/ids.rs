//! Strongly typed, zero-cost identifier wrappers.
//!
//! `VertexId` is `Copy + Ord + Hash` so it can be used as a map key or sorted
//! collection element without ceremony.  The inner integer is `pub` to allow
//! direct indexing into dense per-vertex `Vec`s via `id.0 as usize`, but
//! callers should prefer the `.index()` helper for clarity.
//!
//! A `VertexId` on a grid is the row-major cell index `y * width + x`.  The
//! index space is dense and includes obstacle cells; whether a given ID is
//! actually traversable is a property of the owning `Grid`, not of the ID.
//!
//! Agents carry no wrapper: an agent *is* its position in the instance's
//! start/goal lists, so plain `usize` indices are used throughout.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID" — equivalent to `u32::MAX`.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Row-major cell index into the grid's vertex space.
    pub struct VertexId(u32);
}
