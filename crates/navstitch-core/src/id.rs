//! Strongly-typed local indices, blob identity, and terrain types.
//!
//! Every entity inside a navmesh blob is addressed by a small integer
//! index that is only meaningful relative to its parent: a [`FloorIdx`]
//! names a floor within one cell, a [`HalfEdgeIdx`] names a half-edge
//! within one floor, and so on. Each index type reserves `u32::MAX` as
//! its `INVALID` sentinel, which is out of range for any real parent.

use std::fmt;

macro_rules! local_index {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);

        impl $name {
            /// Sentinel that never names a live entity.
            pub const INVALID: Self = Self(u32::MAX);

            /// Whether this index is anything other than the sentinel.
            ///
            /// This says nothing about bounds; only a parent can tell
            /// whether the index is in range.
            pub fn is_set(self) -> bool {
                self != Self::INVALID
            }

            /// The index as a `usize`, for slice access.
            pub fn as_usize(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_set() {
                    write!(f, "{}", self.0)
                } else {
                    write!(f, "invalid")
                }
            }
        }

        impl From<u32> for $name {
            fn from(v: u32) -> Self {
                Self(v)
            }
        }
    };
}

local_index!(
    /// Index of a cell within its mesh blob.
    CellIdx
);

local_index!(
    /// Index of a floor within its cell.
    ///
    /// A cell holds one floor per connected, same-terrain area; floors
    /// may overlap in 2D when they sit at different altitudes.
    FloorIdx
);

local_index!(
    /// Index of a triangle within its floor.
    ///
    /// Triangle `t` owns half-edges `3t`, `3t + 1` and `3t + 2`.
    TriangleIdx
);

local_index!(
    /// Index of a vertex within its floor.
    VertexIdx
);

local_index!(
    /// Index of a half-edge within its floor.
    HalfEdgeIdx
);

/// Identity of a mesh blob, assigned by the offline pipeline.
///
/// Two blobs with the same guid describe the same region; the stitch
/// manager refuses to load a second copy while the first is resident.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshGuid(pub u64);

impl fmt::Display for MeshGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl From<u64> for MeshGuid {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Terrain type of a floor, as a single bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TerrainType(pub u32);

impl TerrainType {
    /// No terrain; also returned by accessors on invalid handles.
    pub const NONE: Self = Self(0);
    /// Matches every terrain mask.
    pub const ALL: Self = Self(u32::MAX);
}

impl Default for TerrainType {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Display for TerrainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// A set of [`TerrainType`] bits considered traversable by a query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TerrainTypeMask(pub u32);

impl TerrainTypeMask {
    /// Accepts nothing.
    pub const NONE: Self = Self(0);
    /// Accepts every terrain type.
    pub const ALL: Self = Self(u32::MAX);

    /// Whether `terrain` shares at least one bit with this mask.
    pub fn allows(self, terrain: TerrainType) -> bool {
        self.0 & terrain.0 != 0
    }
}

impl Default for TerrainTypeMask {
    fn default() -> Self {
        Self::ALL
    }
}

impl From<TerrainType> for TerrainTypeMask {
    fn from(t: TerrainType) -> Self {
        Self(t.0)
    }
}
