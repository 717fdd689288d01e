//! Strongly typed identifier wrappers.
//!
//! `StationIdx` and `EdgeIdx` are dense positions into a built `Graph`'s
//! arrays: `Copy + Ord + Hash`, with the inner integer `pub` for direct
//! indexing.  Callers should prefer the `.index()` helper for clarity.
//!
//! Station *ids* (the feed's stable string keys) stay `String`s; only the
//! graph assigns indices.  `LineId` wraps a line's short name.

use std::fmt;

/// Generate a typed index wrapper around a primitive integer.
macro_rules! typed_idx {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid index" (`u32::MAX`).
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized indices are visibly invalid.
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

typed_idx! {
    /// Position of a logical station in a built graph.
    pub struct StationIdx(u32);
}

typed_idx! {
    /// Position of a directed edge in a built graph's CSR arrays.
    pub struct EdgeIdx(u32);
}

// ── LineId ────────────────────────────────────────────────────────────────────

/// A service line identifier, e.g. `"4"` or `"7bis"`.
///
/// Ordered lexicographically so line sets render deterministically.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct LineId(pub String);

impl LineId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LineId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for LineId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::borrow::Borrow<str> for LineId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
