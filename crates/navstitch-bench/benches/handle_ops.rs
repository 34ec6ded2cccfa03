//! Criterion micro-benchmarks for handle resolution and mesh walking.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use navstitch_bench::{reference_profile, tile_world, CELL_SIZE};
use navstitch_core::{CardinalDir, CellPos, FloorIdx, HalfEdgeIdx, TerrainTypeMask};
use navstitch_mesh::{HalfEdgeHandle, StitchManager};

/// Load the whole reference world with every seam stitched.
fn make_world() -> StitchManager {
    let profile = reference_profile();
    let source = tile_world(&profile);
    let mut nav = StitchManager::new(profile.config().with_auto_stitch(true)).unwrap();
    for key in source.keys() {
        nav.load_from(&source, key).unwrap();
    }
    nav
}

/// Benchmark: validity check on a deeply derived handle.
fn bench_half_edge_is_valid(c: &mut Criterion) {
    let nav = make_world();
    let he = nav
        .cell_at(CellPos::new(5, 5))
        .into_floor(FloorIdx(0))
        .into_half_edge(HalfEdgeIdx(0));
    c.bench_function("half_edge_is_valid", |b| {
        b.iter(|| black_box(he.is_valid(black_box(&nav))));
    });
}

/// Benchmark: clone + drop of a mesh handle (holder count round trip).
fn bench_mesh_handle_clone(c: &mut Criterion) {
    let nav = make_world();
    let mesh = nav.cell_at(CellPos::new(0, 0)).mesh().clone();
    c.bench_function("mesh_handle_clone", |b| {
        b.iter(|| {
            let copy = black_box(&mesh).clone();
            black_box(copy.holder_count());
        });
    });
}

/// Benchmark: world position to cell handle.
fn bench_cell_at_position(c: &mut Criterion) {
    let nav = make_world();
    let mut i = 0u32;
    c.bench_function("cell_at_position", |b| {
        b.iter(|| {
            i = i.wrapping_add(7);
            let x = (i % 128) as f32 * CELL_SIZE * 0.125;
            let y = (i % 97) as f32 * CELL_SIZE * 0.125;
            let cell = nav
                .cell_pos_at(x, y)
                .map(|pos| nav.cell_at(pos))
                .unwrap_or_default();
            black_box(cell);
        });
    });
}

/// Benchmark: cross every east boundary edge of a row of cells spanning
/// four tiles.
fn bench_cross_row(c: &mut Criterion) {
    let nav = make_world();
    let seam: Vec<HalfEdgeHandle> = (0..15)
        .flat_map(|x| {
            nav.cell_at(CellPos::new(x, 6))
                .boundary_half_edges(&nav, CardinalDir::East)
        })
        .collect();
    c.bench_function("cross_row_30_edges", |b| {
        b.iter(|| {
            let mut crossed = 0usize;
            for he in &seam {
                if he
                    .crossable_pair(&nav, TerrainTypeMask::ALL)
                    .is_valid(&nav)
                {
                    crossed += 1;
                }
            }
            black_box(crossed);
        });
    });
}

/// Benchmark: walk each triangle of a floor via next/pair.
fn bench_triangle_walk(c: &mut Criterion) {
    let nav = make_world();
    let floor = nav.cell_at(CellPos::new(9, 9)).into_floor(FloorIdx(0));
    let count = floor.half_edge_count(&nav) as u32;
    c.bench_function("triangle_walk", |b| {
        b.iter(|| {
            let mut paired = 0usize;
            for i in 0..count {
                let he = floor.half_edge(HalfEdgeIdx(i));
                let next = he.next(&nav);
                if next.pair_half_edge(&nav).is_valid(&nav) {
                    paired += 1;
                }
            }
            black_box(paired);
        });
    });
}

criterion_group!(
    benches,
    bench_half_edge_is_valid,
    bench_mesh_handle_clone,
    bench_cell_at_position,
    bench_cross_row,
    bench_triangle_walk
);
criterion_main!(benches);
