//! Integration test: random load / unload / stitch / reclaim churn.
//!
//! Six candidate meshes tile row 0 two columns apart, so every pair of
//! consecutive candidates shares a seam. Random operation sequences are
//! applied and after every step the manager must have no link into an
//! unloaded mesh, every link must cross back to where it started, and
//! every slot's holder count must equal the handles the test holds.

use std::sync::Arc;

use indexmap::IndexMap;
use navstitch_arena::SlotId;
use navstitch_core::{CardinalDir, NavMeshBlob, TerrainTypeMask};
use navstitch_mesh::{MeshHandle, StitchConfig, StitchManager};
use navstitch_test_utils::row_mesh;

const CANDIDATES: usize = 6;

fn candidate(k: usize) -> Arc<NavMeshBlob> {
    // Every third candidate is finer, so only some seams can link.
    let subdivisions = if k % 3 == 2 { 4 } else { 2 };
    Arc::new(row_mesh(k as u64 + 1, 2 * k as i32, 2, subdivisions, 4.0))
}

struct Driver {
    nav: StitchManager,
    loaded: Vec<Option<MeshHandle>>,
    held: Vec<MeshHandle>,
}

impl Driver {
    fn new(auto_stitch: bool) -> Self {
        let config = StitchConfig::default().with_auto_stitch(auto_stitch);
        Self {
            nav: StitchManager::new(config).unwrap(),
            loaded: (0..CANDIDATES).map(|_| None).collect(),
            held: Vec::new(),
        }
    }

    fn apply(&mut self, op: u8, a: usize, b: usize) {
        let (a, b) = (a % CANDIDATES, b % CANDIDATES);
        match op {
            0 => {
                if self.loaded[a].is_none() {
                    let handle = self.nav.load_mesh(candidate(a)).unwrap();
                    self.loaded[a] = Some(handle);
                }
            }
            1 => {
                if let Some(handle) = self.loaded[a].take() {
                    assert!(self.nav.unload_mesh(&handle));
                    assert!(!handle.is_valid(&self.nav));
                    self.held.push(handle);
                }
            }
            2 => {
                if let (Some(x), Some(y)) = (&self.loaded[a], &self.loaded[b]) {
                    let (x, y) = (x.clone(), y.clone());
                    assert!(self.nav.stitch_boundary(&x, &y).report().is_some());
                }
            }
            3 => {
                if let Some(x) = self.loaded[a].clone() {
                    assert!(self.nav.stitch_neighbours(&x).report().is_some());
                }
            }
            4 => {
                self.nav.reclaim_unused();
            }
            5 => {
                if let Some(x) = &self.loaded[a] {
                    self.held.push(x.clone());
                }
            }
            _ => {
                if !self.held.is_empty() {
                    let i = b % self.held.len();
                    self.held.swap_remove(i);
                }
            }
        }
    }

    fn check(&self) {
        let nav = &self.nav;
        let live: Vec<SlotId> = self
            .loaded
            .iter()
            .flatten()
            .filter_map(MeshHandle::slot_id)
            .collect();
        assert_eq!(nav.mesh_count(), live.len());
        assert_eq!(nav.cell_count(), 2 * live.len());

        for mesh in self.loaded.iter().flatten() {
            for cell in mesh.cells(nav) {
                let wrapper = cell.wrapper(nav).unwrap();
                for dir in CardinalDir::ALL {
                    for entry in wrapper.links(dir) {
                        if let Some(target) = entry.target {
                            assert!(live.contains(&target.slot), "dangling link");
                        }
                    }
                    for he in cell.boundary_half_edges(nav, dir) {
                        if he.is_edge_linked(nav, TerrainTypeMask::ALL) {
                            let across = he.cross_boundary(nav);
                            assert!(across.is_valid(nav));
                            assert_eq!(across.cross_boundary(nav), he);
                        } else {
                            assert!(!he.cross_boundary(nav).is_valid(nav));
                        }
                    }
                }
                let all_linked = CardinalDir::ALL
                    .iter()
                    .all(|&d| wrapper.links(d).iter().all(|e| e.is_linked()));
                assert_eq!(wrapper.is_stitched(), all_linked);
            }
        }

        let mut expected: IndexMap<SlotId, u32> = IndexMap::new();
        for handle in self.loaded.iter().flatten().chain(&self.held) {
            if let Some(id) = handle.slot_id() {
                *expected.entry(id).or_default() += 1;
            }
        }
        for handle in self.loaded.iter().flatten().chain(&self.held) {
            let id = handle.slot_id().unwrap();
            assert_eq!(handle.holder_count(), expected[&id]);
            assert!(nav.pool().get(id).is_some(), "held slot was reclaimed");
        }
    }
}

#[cfg(not(miri))]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn churn_preserves_link_and_holder_invariants(
            auto_stitch in any::<bool>(),
            ops in proptest::collection::vec((0u8..7, 0usize..CANDIDATES, 0usize..CANDIDATES), 1..60),
        ) {
            let mut driver = Driver::new(auto_stitch);
            for &(op, a, b) in &ops {
                driver.apply(op, a, b);
                driver.check();
            }
            driver.loaded.iter_mut().for_each(|slot| *slot = None);
            driver.held.clear();
            let expected = driver.nav.pool().len() - driver.nav.mesh_count();
            // Loaded meshes keep their slots; every other slot is free now.
            prop_assert_eq!(driver.nav.reclaim_unused(), expected);
        }
    }
}

#[test]
fn stitching_everything_links_every_matching_seam() {
    let mut driver = Driver::new(false);
    for k in 0..CANDIDATES {
        driver.apply(0, k, 0);
    }
    for k in 0..CANDIDATES {
        driver.apply(3, k, 0);
    }
    driver.check();

    // Seams between two subdivision-2 candidates link; seams touching a
    // subdivision-4 candidate do not.
    let linked_seams = (0..CANDIDATES - 1)
        .filter(|&k| k % 3 != 2 && (k + 1) % 3 != 2)
        .count();
    assert_eq!(linked_seams, 2);
    // One internal seam per candidate, one link per subdivision.
    let internal: usize = (0..CANDIDATES)
        .map(|k| if k % 3 == 2 { 4 } else { 2 })
        .sum();
    assert_eq!(
        driver.nav.metrics().links_created as usize,
        internal + linked_seams * 2
    );
}
