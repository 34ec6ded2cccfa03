//! Many threads reading through shared handles between mutations.

use std::sync::Arc;
use std::thread;

use navstitch_core::{CardinalDir, CellPos, FloorIdx, HalfEdgeIdx, TerrainTypeMask};
use navstitch_mesh::{HalfEdgeHandle, MeshHandle, StitchConfig, StitchManager};
use navstitch_test_utils::grid_mesh;

const READERS: usize = 8;

fn tiles(nav: &mut StitchManager) -> Vec<MeshHandle> {
    (0..4)
        .map(|i| {
            let positions = [CellPos::new(i, 0), CellPos::new(i, 1)];
            nav.load_mesh(Arc::new(grid_mesh(i as u64 + 1, &positions, 2, 4.0)))
                .unwrap()
        })
        .collect()
}

/// Walk every half-edge of every cell, crossing where possible.
fn walk(nav: &StitchManager, mesh: &MeshHandle) -> usize {
    let mut crossings = 0;
    for cell in mesh.cells(nav) {
        let floor = cell.floor(FloorIdx(0));
        for i in 0..floor.half_edge_count(nav) as u32 {
            let he: HalfEdgeHandle = floor.half_edge(HalfEdgeIdx(i));
            let pair = he.crossable_pair(nav, TerrainTypeMask::ALL);
            if pair.is_valid(nav) {
                assert_eq!(pair.pair_half_edge(nav), he);
                crossings += 1;
            }
        }
    }
    crossings
}

#[test]
fn readers_share_handles_across_threads() {
    let mut nav = StitchManager::new(StitchConfig::default().with_auto_stitch(true)).unwrap();
    let meshes = tiles(&mut nav);
    let expected: usize = meshes.iter().map(|m| walk(&nav, m)).sum();
    assert!(expected > 0);

    let nav = &nav;
    let totals: Vec<usize> = thread::scope(|s| {
        let workers: Vec<_> = (0..READERS)
            .map(|_| {
                let local = meshes.clone();
                s.spawn(move || local.iter().map(|m| walk(nav, m)).sum::<usize>())
            })
            .collect();
        workers.into_iter().map(|w| w.join().unwrap()).collect()
    });
    assert!(totals.iter().all(|&t| t == expected));

    // Every thread's clones were dropped on exit.
    for mesh in &meshes {
        assert_eq!(mesh.holder_count(), 1);
    }
}

#[test]
fn readers_observe_an_unload_after_the_quiesce_point() {
    let mut nav = StitchManager::new(StitchConfig::default().with_auto_stitch(true)).unwrap();
    let meshes = tiles(&mut nav);
    let seam: Vec<HalfEdgeHandle> = meshes[1]
        .cell(navstitch_core::CellIdx(0))
        .boundary_half_edges(&nav, CardinalDir::East);
    assert!(seam.iter().all(|he| he.cross_boundary(&nav).is_valid(&nav)));

    // Mutation happens between read phases, never during one.
    nav.unload_mesh(&meshes[2]);

    let nav = &nav;
    thread::scope(|s| {
        for _ in 0..READERS {
            let seam = seam.clone();
            let gone = meshes[2].clone();
            s.spawn(move || {
                assert!(!gone.is_valid(nav));
                for he in &seam {
                    assert!(he.is_valid(nav));
                    assert!(!he.cross_boundary(nav).is_valid(nav));
                    assert!(!he.is_edge_linked(nav, TerrainTypeMask::ALL));
                }
            });
        }
    });
}
