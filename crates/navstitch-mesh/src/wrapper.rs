//! Runtime state wrapped around a loaded blob.
//!
//! A [`MeshWrapper`] owns nothing but an `Arc` to its blob and the
//! address of its cell range; the [`CellWrapper`]s themselves live in
//! the manager's segment arena so that one mesh's cells can be released
//! as a single range.

use std::sync::Arc;

use indexmap::IndexMap;
use smallvec::SmallVec;

use navstitch_arena::{CellRange, MeshIdx, SlotId};
use navstitch_core::{
    CardinalDir, CellIdx, CellPos, FloorIdx, HalfEdgeIdx, MeshGuid, NavCell, NavMeshBlob,
};

/// Address of a half-edge in some loaded mesh.
///
/// Does not count as a holder of the slot; a link is broken by the
/// manager before the mesh it points into goes away.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EdgeRef {
    /// Slot of the target mesh.
    pub slot: SlotId,
    /// Slab index of the target mesh.
    pub mesh: MeshIdx,
    /// Cell within the target mesh.
    pub cell: CellIdx,
    /// Floor within that cell.
    pub floor: FloorIdx,
    /// Half-edge within that floor.
    pub half_edge: HalfEdgeIdx,
}

/// One boundary half-edge of a cell and what it is stitched to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinkEntry {
    /// Floor owning the boundary edge.
    pub floor: FloorIdx,
    /// The boundary edge.
    pub half_edge: HalfEdgeIdx,
    /// The matching edge in the neighbouring cell, once stitched.
    pub target: Option<EdgeRef>,
}

impl LinkEntry {
    /// Whether the entry has been stitched.
    pub fn is_linked(&self) -> bool {
        self.target.is_some()
    }
}

/// Runtime state of one loaded cell.
///
/// `links[d]` has one entry per blob boundary edge on side `d`, in the
/// blob's order, so a half-edge's `CellBoundary { dir, link }` indexes
/// straight into it.
#[derive(Clone, Debug, Default)]
pub struct CellWrapper {
    cell: CellIdx,
    stitched: bool,
    links: [SmallVec<[LinkEntry; 4]>; 4],
}

impl CellWrapper {
    pub(crate) fn new(cell: CellIdx, blob_cell: &NavCell) -> Self {
        let mut links: [SmallVec<[LinkEntry; 4]>; 4] = Default::default();
        for dir in CardinalDir::ALL {
            links[dir.index()] = blob_cell
                .boundary(dir)
                .iter()
                .map(|e| LinkEntry {
                    floor: e.floor,
                    half_edge: e.half_edge,
                    target: None,
                })
                .collect();
        }
        let mut wrapper = Self {
            cell,
            stitched: false,
            links,
        };
        wrapper.recompute_stitched();
        wrapper
    }

    /// Index of the wrapped cell in its blob.
    pub fn cell(&self) -> CellIdx {
        self.cell
    }

    /// Whether every boundary edge on every side is linked.
    pub fn is_stitched(&self) -> bool {
        self.stitched
    }

    /// Entries for side `dir`.
    pub fn links(&self, dir: CardinalDir) -> &[LinkEntry] {
        &self.links[dir.index()]
    }

    /// Entry `i` on side `dir`.
    pub fn link(&self, dir: CardinalDir, i: usize) -> Option<&LinkEntry> {
        self.links[dir.index()].get(i)
    }

    /// Linked entries over all sides.
    pub fn linked_count(&self) -> usize {
        self.links
            .iter()
            .flat_map(|side| side.iter())
            .filter(|e| e.is_linked())
            .count()
    }

    pub(crate) fn links_mut(&mut self, dir: CardinalDir) -> &mut [LinkEntry] {
        &mut self.links[dir.index()]
    }

    /// Drop every link on side `dir` that targets `slot`. Returns how
    /// many were dropped.
    pub(crate) fn unlink_slot(&mut self, dir: CardinalDir, slot: SlotId) -> usize {
        let mut broken = 0;
        for entry in self.links_mut(dir) {
            if entry.target.is_some_and(|t| t.slot == slot) {
                entry.target = None;
                broken += 1;
            }
        }
        broken
    }

    pub(crate) fn recompute_stitched(&mut self) {
        self.stitched = self
            .links
            .iter()
            .flat_map(|side| side.iter())
            .all(LinkEntry::is_linked);
    }
}

/// A loaded blob and where its cells live.
#[derive(Debug)]
pub struct MeshWrapper {
    blob: Arc<NavMeshBlob>,
    slot: SlotId,
    cells: CellRange,
    cell_lookup: IndexMap<CellPos, CellIdx>,
}

impl MeshWrapper {
    pub(crate) fn new(blob: Arc<NavMeshBlob>, slot: SlotId, cells: CellRange) -> Self {
        let cell_lookup = blob
            .cells
            .iter()
            .enumerate()
            .map(|(i, c)| (c.pos, CellIdx(i as u32)))
            .collect();
        Self {
            blob,
            slot,
            cells,
            cell_lookup,
        }
    }

    /// The wrapped blob.
    pub fn blob(&self) -> &Arc<NavMeshBlob> {
        &self.blob
    }

    /// Guid of the wrapped blob.
    pub fn guid(&self) -> MeshGuid {
        self.blob.guid
    }

    /// Slot naming this wrapper.
    pub fn slot(&self) -> SlotId {
        self.slot
    }

    /// Arena range holding the cell wrappers.
    pub fn cell_range(&self) -> CellRange {
        self.cells
    }

    /// Number of cells.
    pub fn cell_count(&self) -> usize {
        self.blob.cell_count()
    }

    /// Cell at grid position `pos`, if this mesh has one there.
    pub fn cell_at(&self, pos: CellPos) -> Option<CellIdx> {
        self.cell_lookup.get(&pos).copied()
    }

    /// Grid positions of every cell, in blob order.
    pub fn positions(&self) -> impl Iterator<Item = CellPos> + '_ {
        self.cell_lookup.keys().copied()
    }
}
