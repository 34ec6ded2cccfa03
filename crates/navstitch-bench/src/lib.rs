//! Benchmark profiles and utilities for navstitch.
//!
//! A profile is a square world of tiles, each tile one blob of
//! `tile_cells × tile_cells` quad cells, stored in a [`MemoryBlobSource`]
//! under [`tile_key`] names:
//!
//! - [`reference_profile`]: 4x4 tiles of 4x4 cells (256 cells)
//! - [`stress_profile`]: 16x16 tiles of 8x8 cells (16K cells)
//! - [`ring_around`]: the tiles a streaming window keeps resident

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use navstitch_core::{CellPos, MemoryBlobSource, NavMeshBlob};
use navstitch_mesh::StitchConfig;
use navstitch_test_utils::grid_mesh;

/// Side length of every cell in the benchmark worlds.
pub const CELL_SIZE: f32 = 8.0;

/// Shape of a tile world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorldProfile {
    /// Tiles along each axis.
    pub tiles: i32,
    /// Cells along each side of a tile.
    pub tile_cells: i32,
    /// Boundary edges per cell side.
    pub subdivisions: u32,
}

impl WorldProfile {
    /// Total number of cells across all tiles.
    pub fn cell_count(&self) -> usize {
        (self.tiles * self.tiles * self.tile_cells * self.tile_cells) as usize
    }

    /// Manager configuration large enough to hold the whole world.
    pub fn config(&self) -> StitchConfig {
        let mut config = StitchConfig::default();
        config.arena.max_meshes = (self.tiles * self.tiles) as u32;
        config
    }
}

/// 4x4 tiles of 4x4 cells, two boundary edges per side.
pub fn reference_profile() -> WorldProfile {
    WorldProfile {
        tiles: 4,
        tile_cells: 4,
        subdivisions: 2,
    }
}

/// 16x16 tiles of 8x8 cells, four boundary edges per side.
pub fn stress_profile() -> WorldProfile {
    WorldProfile {
        tiles: 16,
        tile_cells: 8,
        subdivisions: 4,
    }
}

/// Source key of the tile at `(tx, ty)`.
pub fn tile_key(tx: i32, ty: i32) -> String {
    format!("tile_{tx}_{ty}")
}

/// Build the blob for tile `(tx, ty)`. Guids are unique within a profile.
pub fn tile_blob(profile: &WorldProfile, tx: i32, ty: i32) -> NavMeshBlob {
    let n = profile.tile_cells;
    let positions: Vec<CellPos> = (0..n)
        .flat_map(|y| (0..n).map(move |x| CellPos::new(tx * n + x, ty * n + y)))
        .collect();
    let guid = (ty * profile.tiles + tx) as u64 + 1;
    grid_mesh(guid, &positions, profile.subdivisions, CELL_SIZE)
}

/// Every tile of `profile`, keyed by [`tile_key`].
pub fn tile_world(profile: &WorldProfile) -> MemoryBlobSource {
    let mut source = MemoryBlobSource::new();
    for ty in 0..profile.tiles {
        for tx in 0..profile.tiles {
            source.insert(tile_key(tx, ty), tile_blob(profile, tx, ty));
        }
    }
    source
}

/// Tiles within Chebyshev distance `radius` of `(cx, cy)`, clipped to the world.
pub fn ring_around(profile: &WorldProfile, cx: i32, cy: i32, radius: i32) -> Vec<(i32, i32)> {
    let clip = |c: i32| (c - radius).max(0)..=(c + radius).min(profile.tiles - 1);
    clip(cy)
        .flat_map(|ty| clip(cx).map(move |tx| (tx, ty)))
        .collect()
}
