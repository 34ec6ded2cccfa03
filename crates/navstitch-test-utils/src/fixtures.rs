//! Standard test meshes.
//!
//! - [`quad_cell`]: a cell tiled with an `n × n` grid of quads, `n`
//!   boundary edges per side.
//! - [`layered_cell`]: two floors of different terrain meeting along the
//!   cell's vertical midline.
//! - [`walled_cell`]: a half-height cell whose top edge is a wall.
//! - [`grid_mesh`] / [`row_mesh`]: whole blobs of quad cells.
//!
//! Shared sides of adjacent cells are computed from the same integer
//! expressions, so their vertex coordinates agree bit for bit.

use navstitch_core::{CellPos, NavCell, NavMeshBlob, TerrainType, Vec3};

use crate::builder::{cell_aabb, CellBuilder, MeshBuilder};

/// Terrain used by [`quad_cell`] and floor 0 of [`layered_cell`].
pub const GROUND: TerrainType = TerrainType(0b01);
/// Terrain of floor 1 of [`layered_cell`].
pub const WATER: TerrainType = TerrainType(0b10);

fn lerp_exact(min: f32, max: f32, i: u32, n: u32) -> f32 {
    if i == n {
        max
    } else {
        min + (max - min) * (i as f32 / n as f32)
    }
}

/// A flat cell at altitude 0 with `subdivisions` quads per side.
pub fn quad_cell(pos: CellPos, subdivisions: u32, cell_size: f32) -> NavCell {
    raised_quad_cell(pos, subdivisions, cell_size, 0.0)
}

/// A flat cell at altitude `z` with `subdivisions` quads per side.
pub fn raised_quad_cell(pos: CellPos, subdivisions: u32, cell_size: f32, z: f32) -> NavCell {
    let n = subdivisions.max(1);
    let aabb = cell_aabb(pos, cell_size);
    let mut vertices = Vec::with_capacity(((n + 1) * (n + 1)) as usize);
    for j in 0..=n {
        for i in 0..=n {
            vertices.push(Vec3::new(
                lerp_exact(aabb.min.x, aabb.max.x, i, n),
                lerp_exact(aabb.min.y, aabb.max.y, j, n),
                z,
            ));
        }
    }

    let at = |i: u32, j: u32| j * (n + 1) + i;
    let mut triangles = Vec::with_capacity((n * n * 2) as usize);
    for j in 0..n {
        for i in 0..n {
            let (v00, v10, v11, v01) = (at(i, j), at(i + 1, j), at(i + 1, j + 1), at(i, j + 1));
            triangles.push([v00, v10, v11]);
            triangles.push([v00, v11, v01]);
        }
    }

    CellBuilder::new(pos, cell_size)
        .floor(GROUND, vertices, triangles)
        .build()
}

/// A cell split into a [`GROUND`] floor on the west half and a [`WATER`]
/// floor on the east half.
pub fn layered_cell(pos: CellPos, cell_size: f32) -> NavCell {
    let aabb = cell_aabb(pos, cell_size);
    let (x0, x1, y0, y1) = (aabb.min.x, aabb.max.x, aabb.min.y, aabb.max.y);
    let xm = x0 + cell_size * 0.5;
    let quad = |a: f32, b: f32| {
        vec![
            Vec3::new(a, y0, 0.0),
            Vec3::new(b, y0, 0.0),
            Vec3::new(b, y1, 0.0),
            Vec3::new(a, y1, 0.0),
        ]
    };
    CellBuilder::new(pos, cell_size)
        .floor(GROUND, quad(x0, xm), vec![[0, 1, 2], [0, 2, 3]])
        .floor(WATER, quad(xm, x1), vec![[0, 1, 2], [0, 2, 3]])
        .build()
}

/// A cell whose floor stops halfway up, leaving a wall along the middle
/// and nothing on the north side.
pub fn walled_cell(pos: CellPos, cell_size: f32) -> NavCell {
    let aabb = cell_aabb(pos, cell_size);
    let ym = aabb.min.y + cell_size * 0.5;
    let vertices = vec![
        Vec3::new(aabb.min.x, aabb.min.y, 0.0),
        Vec3::new(aabb.max.x, aabb.min.y, 0.0),
        Vec3::new(aabb.max.x, ym, 0.0),
        Vec3::new(aabb.min.x, ym, 0.0),
    ];
    CellBuilder::new(pos, cell_size)
        .floor(GROUND, vertices, vec![[0, 1, 2], [0, 2, 3]])
        .build()
}

/// A blob of quad cells at `positions`.
pub fn grid_mesh(
    guid: u64,
    positions: &[CellPos],
    subdivisions: u32,
    cell_size: f32,
) -> NavMeshBlob {
    MeshBuilder::new(guid, cell_size)
        .cells(
            positions
                .iter()
                .map(|&pos| quad_cell(pos, subdivisions, cell_size)),
        )
        .build()
}

/// A blob of `count` quad cells in row 0, starting at column `x0`.
pub fn row_mesh(
    guid: u64,
    x0: i32,
    count: i32,
    subdivisions: u32,
    cell_size: f32,
) -> NavMeshBlob {
    let positions: Vec<CellPos> = (x0..x0 + count).map(|x| CellPos::new(x, 0)).collect();
    grid_mesh(guid, &positions, subdivisions, cell_size)
}
