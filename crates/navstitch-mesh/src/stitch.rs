//! Boundary matching between adjacent loaded cells.
//!
//! Two cells at positions `p` and `p + d` share side `d` of the first and
//! side `d.opposite()` of the second. A boundary edge `s → e` of the
//! first matches an edge `s' → e'` of the second when `e == s'` and
//! `s == e'` on the ground plane, bit for bit, and the altitudes at both
//! ends agree within the tolerance. Links are always written on both
//! sides at once.
//!
//! These functions take the slab and the segment list separately so the
//! manager can lend out disjoint borrows of its fields.

use indexmap::IndexMap;
use smallvec::SmallVec;

use navstitch_arena::{MeshIdx, SegmentList, Slab};
use navstitch_core::{CardinalDir, CellIdx, CellPos, NavCell, Vec3};

use crate::grid::CellGrid;
use crate::manager::StitchReport;
use crate::wrapper::{CellWrapper, EdgeRef, LinkEntry, MeshWrapper};

type PlanarKey = ([u32; 2], [u32; 2]);

/// One side of a prospective cell pair.
#[derive(Clone, Copy)]
pub(crate) struct CellSite {
    pub mesh: MeshIdx,
    pub cell: CellIdx,
}

/// Position across side `dir`, or `None` at the edge of the grid.
fn neighbour_pos(cell: &NavCell, dir: CardinalDir) -> Option<CellPos> {
    let pos = cell.pos.neighbour(dir);
    (pos != cell.pos).then_some(pos)
}

fn endpoints(cell: &NavCell, entry: &LinkEntry) -> Option<(Vec3, Vec3)> {
    cell.floor(entry.floor)?.edge_positions(entry.half_edge)
}

/// Link the unlinked edges of `a` on side `dir` to those of `b` on the
/// opposite side. Returns the number of new links.
pub(crate) fn stitch_pair(
    meshes: &Slab<MeshWrapper>,
    cells: &mut SegmentList<CellWrapper>,
    a: CellSite,
    b: CellSite,
    dir: CardinalDir,
    altitude_tolerance: f32,
) -> usize {
    let back = dir.opposite();
    let (Some(mesh_a), Some(mesh_b)) = (meshes.get(a.mesh), meshes.get(b.mesh)) else {
        return 0;
    };
    let (Some(cell_a), Some(cell_b)) = (mesh_a.blob().cell(a.cell), mesh_b.blob().cell(b.cell))
    else {
        return 0;
    };
    let (Some(state_a), Some(state_b)) = (
        cells.get(mesh_a.cell_range(), a.cell.as_usize()),
        cells.get(mesh_b.cell_range(), b.cell.as_usize()),
    ) else {
        return 0;
    };

    let mut candidates: IndexMap<PlanarKey, SmallVec<[usize; 2]>> = IndexMap::new();
    for (j, entry) in state_b.links(back).iter().enumerate() {
        if entry.is_linked() {
            continue;
        }
        if let Some((s, e)) = endpoints(cell_b, entry) {
            candidates
                .entry((s.planar_bits(), e.planar_bits()))
                .or_default()
                .push(j);
        }
    }
    if candidates.is_empty() {
        return 0;
    }

    let links_a = state_a.links(dir);
    let links_b = state_b.links(back);
    let mut matches: SmallVec<[(usize, LinkEntry, usize, LinkEntry); 8]> = SmallVec::new();
    for (i, entry) in links_a.iter().enumerate() {
        if entry.is_linked() {
            continue;
        }
        let Some((sa, ea)) = endpoints(cell_a, entry) else {
            continue;
        };
        let Some(list) = candidates.get_mut(&(ea.planar_bits(), sa.planar_bits())) else {
            continue;
        };
        let hit = list.iter().position(|&j| {
            endpoints(cell_b, &links_b[j]).is_some_and(|(sb, eb)| {
                (sa.z - eb.z).abs() <= altitude_tolerance
                    && (ea.z - sb.z).abs() <= altitude_tolerance
            })
        });
        if let Some(k) = hit {
            let j = list.remove(k);
            matches.push((i, *entry, j, links_b[j]));
        }
    }
    if matches.is_empty() {
        return 0;
    }

    let (slot_a, range_a) = (mesh_a.slot(), mesh_a.cell_range());
    let (slot_b, range_b) = (mesh_b.slot(), mesh_b.cell_range());

    if let Some(state) = cells.get_mut(range_a, a.cell.as_usize()) {
        let side = state.links_mut(dir);
        for &(i, _, _, entry_b) in &matches {
            side[i].target = Some(EdgeRef {
                slot: slot_b,
                mesh: b.mesh,
                cell: b.cell,
                floor: entry_b.floor,
                half_edge: entry_b.half_edge,
            });
        }
        state.recompute_stitched();
    }
    if let Some(state) = cells.get_mut(range_b, b.cell.as_usize()) {
        let side = state.links_mut(back);
        for &(_, entry_a, j, _) in &matches {
            side[j].target = Some(EdgeRef {
                slot: slot_a,
                mesh: a.mesh,
                cell: a.cell,
                floor: entry_a.floor,
                half_edge: entry_a.half_edge,
            });
        }
        state.recompute_stitched();
    }

    matches.len()
}

/// Stitch every adjacent pair of cells inside mesh `idx`.
pub(crate) fn stitch_internal(
    meshes: &Slab<MeshWrapper>,
    cells: &mut SegmentList<CellWrapper>,
    idx: MeshIdx,
    altitude_tolerance: f32,
) -> StitchReport {
    let mut report = StitchReport::default();
    let Some(mesh) = meshes.get(idx) else {
        return report;
    };
    for (i, cell) in mesh.blob().cells.iter().enumerate() {
        // East and north only: each pair is visited once.
        for dir in [CardinalDir::East, CardinalDir::North] {
            let Some(other) = neighbour_pos(cell, dir).and_then(|p| mesh.cell_at(p)) else {
                continue;
            };
            report.cell_pairs += 1;
            report.new_links += stitch_pair(
                meshes,
                cells,
                CellSite {
                    mesh: idx,
                    cell: CellIdx(i as u32),
                },
                CellSite { mesh: idx, cell: other },
                dir,
                altitude_tolerance,
            );
        }
    }
    report
}

/// Stitch every cell of mesh `a` to the adjacent cells of mesh `b`.
pub(crate) fn stitch_between(
    meshes: &Slab<MeshWrapper>,
    cells: &mut SegmentList<CellWrapper>,
    a: MeshIdx,
    b: MeshIdx,
    altitude_tolerance: f32,
) -> StitchReport {
    let mut report = StitchReport::default();
    let (Some(mesh_a), Some(mesh_b)) = (meshes.get(a), meshes.get(b)) else {
        return report;
    };
    for (i, cell) in mesh_a.blob().cells.iter().enumerate() {
        for dir in CardinalDir::ALL {
            let Some(other) = neighbour_pos(cell, dir).and_then(|p| mesh_b.cell_at(p)) else {
                continue;
            };
            report.cell_pairs += 1;
            report.new_links += stitch_pair(
                meshes,
                cells,
                CellSite {
                    mesh: a,
                    cell: CellIdx(i as u32),
                },
                CellSite { mesh: b, cell: other },
                dir,
                altitude_tolerance,
            );
        }
    }
    report
}

/// Stitch mesh `idx` to every other loaded mesh it touches.
pub(crate) fn stitch_with_grid(
    meshes: &Slab<MeshWrapper>,
    cells: &mut SegmentList<CellWrapper>,
    grid: &CellGrid,
    idx: MeshIdx,
    altitude_tolerance: f32,
) -> StitchReport {
    let mut report = StitchReport::default();
    let Some(mesh) = meshes.get(idx) else {
        return report;
    };
    for (i, cell) in mesh.blob().cells.iter().enumerate() {
        for dir in CardinalDir::ALL {
            let Some(entry) = neighbour_pos(cell, dir).and_then(|p| grid.get(p)) else {
                continue;
            };
            if entry.mesh == idx {
                continue;
            }
            report.cell_pairs += 1;
            report.new_links += stitch_pair(
                meshes,
                cells,
                CellSite {
                    mesh: idx,
                    cell: CellIdx(i as u32),
                },
                CellSite {
                    mesh: entry.mesh,
                    cell: entry.cell,
                },
                dir,
                altitude_tolerance,
            );
        }
    }
    report
}

/// Break every link from a neighbouring mesh into mesh `idx`. Returns
/// the number of neighbour-side links dropped.
pub(crate) fn unlink_neighbours(
    meshes: &Slab<MeshWrapper>,
    cells: &mut SegmentList<CellWrapper>,
    grid: &CellGrid,
    idx: MeshIdx,
) -> usize {
    let Some(mesh) = meshes.get(idx) else {
        return 0;
    };
    let slot = mesh.slot();
    let mut broken = 0;
    for cell in &mesh.blob().cells {
        for dir in CardinalDir::ALL {
            let Some(entry) = neighbour_pos(cell, dir).and_then(|p| grid.get(p)) else {
                continue;
            };
            if entry.mesh == idx {
                continue;
            }
            let Some(range) = meshes.get(entry.mesh).map(MeshWrapper::cell_range) else {
                continue;
            };
            if let Some(state) = cells.get_mut(range, entry.cell.as_usize()) {
                let dropped = state.unlink_slot(dir.opposite(), slot);
                if dropped > 0 {
                    state.recompute_stitched();
                    broken += dropped;
                }
            }
        }
    }
    broken
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use navstitch_arena::SlotId;
    use navstitch_core::{Box2f, NavMeshBlob};
    use navstitch_test_utils::{raised_quad_cell, row_mesh, MeshBuilder};

    use crate::grid::GridEntry;

    /// The manager's storage without the manager.
    struct World {
        meshes: Slab<MeshWrapper>,
        cells: SegmentList<CellWrapper>,
        grid: CellGrid,
    }

    impl World {
        fn new() -> Self {
            Self {
                meshes: Slab::new(8),
                cells: SegmentList::new(64, 4),
                grid: CellGrid::new(),
            }
        }

        fn add(&mut self, blob: NavMeshBlob) -> MeshIdx {
            let slot = SlotId {
                index: self.meshes.len() as u32,
                generation: 0,
            };
            let range = self.cells.alloc(blob.cell_count() as u32).unwrap();
            for (i, (state, cell)) in self
                .cells
                .slice_mut(range)
                .iter_mut()
                .zip(&blob.cells)
                .enumerate()
            {
                *state = CellWrapper::new(CellIdx(i as u32), cell);
            }
            let positions: Vec<CellPos> = blob.cells.iter().map(|c| c.pos).collect();
            let idx = self
                .meshes
                .insert(MeshWrapper::new(Arc::new(blob), slot, range))
                .unwrap();
            for (i, pos) in positions.into_iter().enumerate() {
                self.grid.insert(
                    pos,
                    GridEntry {
                        slot,
                        mesh: idx,
                        cell: CellIdx(i as u32),
                    },
                );
            }
            idx
        }

        fn state(&self, mesh: MeshIdx, cell: u32) -> &CellWrapper {
            let range = self.meshes.get(mesh).unwrap().cell_range();
            self.cells.get(range, cell as usize).unwrap()
        }
    }

    fn site(mesh: MeshIdx, cell: u32) -> CellSite {
        CellSite {
            mesh,
            cell: CellIdx(cell),
        }
    }

    #[test]
    fn internal_pass_visits_each_pair_once() {
        let mut w = World::new();
        let a = w.add(row_mesh(1, 0, 3, 2, 4.0));
        let report = stitch_internal(&w.meshes, &mut w.cells, a, 0.5);
        assert_eq!(report.cell_pairs, 2);
        assert_eq!(report.new_links, 4);

        let again = stitch_internal(&w.meshes, &mut w.cells, a, 0.5);
        assert_eq!(again.cell_pairs, 2);
        assert_eq!(again.new_links, 0);
    }

    #[test]
    fn links_are_written_on_both_sides() {
        let mut w = World::new();
        let a = w.add(row_mesh(1, 0, 1, 2, 4.0));
        let b = w.add(row_mesh(2, 1, 1, 2, 4.0));
        let report = stitch_between(&w.meshes, &mut w.cells, a, b, 0.5);
        assert_eq!(report, StitchReport { cell_pairs: 1, new_links: 2 });

        let east = w.state(a, 0).links(CardinalDir::East);
        let west = w.state(b, 0).links(CardinalDir::West);
        for entry in east {
            let target = entry.target.unwrap();
            assert_eq!(target.mesh, b);
            let back = west
                .iter()
                .find(|e| e.half_edge == target.half_edge)
                .and_then(|e| e.target)
                .unwrap();
            assert_eq!(back.mesh, a);
            assert_eq!(back.half_edge, entry.half_edge);
        }
        // Only the shared side is linked.
        assert!(w
            .state(a, 0)
            .links(CardinalDir::West)
            .iter()
            .all(|e| !e.is_linked()));
    }

    #[test]
    fn altitude_tolerance_is_inclusive_of_small_steps() {
        let mut w = World::new();
        let low = MeshBuilder::new(1, 4.0)
            .cell(raised_quad_cell(CellPos::new(0, 0), 1, 4.0, 0.0))
            .build();
        let high = MeshBuilder::new(2, 4.0)
            .cell(raised_quad_cell(CellPos::new(1, 0), 1, 4.0, 0.3))
            .build();
        let (a, b) = (w.add(low), w.add(high));
        let pair = |w: &mut World, tol| {
            stitch_pair(&w.meshes, &mut w.cells, site(a, 0), site(b, 0), CardinalDir::East, tol)
        };
        assert_eq!(pair(&mut w, 0.2), 0);
        assert_eq!(pair(&mut w, 0.5), 1);
        assert_eq!(pair(&mut w, 0.5), 0);
    }

    #[test]
    fn grid_pass_skips_own_cells_and_unlink_breaks_neighbour_side() {
        let mut w = World::new();
        let a = w.add(row_mesh(1, 0, 2, 2, 4.0));
        let b = w.add(row_mesh(2, 2, 1, 2, 4.0));
        stitch_internal(&w.meshes, &mut w.cells, a, 0.5);

        let report = stitch_with_grid(&w.meshes, &mut w.cells, &w.grid, a, 0.5);
        assert_eq!(report, StitchReport { cell_pairs: 1, new_links: 2 });
        assert!(w.state(a, 1).links(CardinalDir::East).iter().all(|e| e.is_linked()));

        let broken = unlink_neighbours(&w.meshes, &mut w.cells, &w.grid, b);
        assert_eq!(broken, 2);
        assert!(w.state(a, 1).links(CardinalDir::East).iter().all(|e| !e.is_linked()));
        // Links inside `a` are untouched.
        assert!(w.state(a, 0).links(CardinalDir::East).iter().all(|e| e.is_linked()));
    }

    #[test]
    fn no_neighbour_past_the_grid_edge() {
        let cell = NavCell::new(CellPos::new(i32::MAX, 0), Box2f::default());
        assert_eq!(neighbour_pos(&cell, CardinalDir::East), None);
        assert_eq!(
            neighbour_pos(&cell, CardinalDir::West),
            Some(CellPos::new(i32::MAX - 1, 0))
        );
    }
}
