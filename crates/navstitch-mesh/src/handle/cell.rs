//! Handle to a cell of a loaded mesh.

use navstitch_core::{Box2f, CardinalDir, CellIdx, CellPos, FloorIdx, NavCell};

use super::{CellView, FloorHandle, HalfEdgeHandle, MeshHandle};
use crate::manager::StitchManager;
use crate::wrapper::CellWrapper;

/// Handle to one cell of a loaded mesh.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellHandle {
    mesh: MeshHandle,
    cell: CellIdx,
}

impl CellHandle {
    /// Cell `cell` of `mesh`.
    pub fn new(mesh: MeshHandle, cell: CellIdx) -> Self {
        Self { mesh, cell }
    }

    /// The owning mesh.
    pub fn mesh(&self) -> &MeshHandle {
        &self.mesh
    }

    /// Index of the cell within its mesh.
    pub fn index(&self) -> CellIdx {
        self.cell
    }

    pub(crate) fn view<'n>(&self, nav: &'n StitchManager) -> Option<CellView<'n>> {
        nav.resolve_cell(&self.mesh, self.cell)
    }

    /// Whether the mesh is loaded and the index in range.
    pub fn is_valid(&self, nav: &StitchManager) -> bool {
        self.view(nav).is_some()
    }

    /// Release the mesh and reset to the default handle.
    pub fn invalidate(&mut self) {
        self.mesh.invalidate();
        self.cell = CellIdx::INVALID;
    }

    /// Handle to floor `idx` of this cell.
    pub fn floor(&self, idx: FloorIdx) -> FloorHandle {
        FloorHandle::new(self.clone(), idx)
    }

    /// Like [`floor`](Self::floor), consuming `self`.
    pub fn into_floor(self, idx: FloorIdx) -> FloorHandle {
        FloorHandle::new(self, idx)
    }

    /// Handles to every floor, or none if invalid.
    pub fn floors(&self, nav: &StitchManager) -> Vec<FloorHandle> {
        (0..self.floor_count(nav) as u32)
            .map(|i| self.floor(FloorIdx(i)))
            .collect()
    }

    /// Number of floors; 0 if invalid.
    pub fn floor_count(&self, nav: &StitchManager) -> usize {
        self.nav_cell(nav).map_or(0, NavCell::floor_count)
    }

    /// Grid position.
    pub fn pos(&self, nav: &StitchManager) -> Option<CellPos> {
        self.nav_cell(nav).map(|c| c.pos)
    }

    /// Ground-plane extent.
    pub fn aabb(&self, nav: &StitchManager) -> Option<Box2f> {
        self.nav_cell(nav).map(|c| c.aabb)
    }

    /// Whether every boundary edge of the cell is linked. `false` if
    /// invalid.
    ///
    /// Cells at the edge of the loaded world stay unstitched but are
    /// still valid and walkable.
    pub fn is_stitched(&self, nav: &StitchManager) -> bool {
        self.view(nav).is_some_and(|v| v.state.is_stitched())
    }

    /// The blob cell.
    pub fn nav_cell<'n>(&self, nav: &'n StitchManager) -> Option<&'n NavCell> {
        self.view(nav).map(|v| v.cell)
    }

    /// The blob cell, without the `Option`.
    ///
    /// # Panics
    ///
    /// Panics if the handle is not valid in `nav`.
    pub fn nav_cell_unchecked<'n>(&self, nav: &'n StitchManager) -> &'n NavCell {
        self.nav_cell(nav)
            .expect("nav_cell_unchecked on an invalid CellHandle")
    }

    /// Runtime state of the cell: stitched flag and boundary links.
    pub fn wrapper<'n>(&self, nav: &'n StitchManager) -> Option<&'n CellWrapper> {
        self.view(nav).map(|v| v.state)
    }

    /// The loaded cell across side `dir`, which may belong to another
    /// mesh. Invalid if this handle is, or if nothing is loaded there.
    pub fn neighbour(&self, nav: &StitchManager, dir: CardinalDir) -> CellHandle {
        let Some(pos) = self.pos(nav) else {
            return CellHandle::default();
        };
        let across = pos.neighbour(dir);
        if across == pos {
            return CellHandle::default();
        }
        nav.cell_at(across)
    }

    /// Handles to the boundary half-edges on side `dir`, in blob order.
    pub fn boundary_half_edges(&self, nav: &StitchManager, dir: CardinalDir) -> Vec<HalfEdgeHandle> {
        let Some(cell) = self.nav_cell(nav) else {
            return Vec::new();
        };
        cell.boundary(dir)
            .iter()
            .map(|e| self.floor(e.floor).into_half_edge(e.half_edge))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StitchConfig;
    use navstitch_test_utils::{layered_cell, row_mesh, MeshBuilder};
    use std::sync::Arc;

    #[test]
    fn cell_reads_resolve_through_the_mesh() {
        let mut nav = StitchManager::new(StitchConfig::default()).unwrap();
        let mesh = nav.load_mesh(Arc::new(row_mesh(1, 4, 2, 2, 4.0))).unwrap();
        let cell = mesh.cell(CellIdx(1));
        assert!(cell.is_valid(&nav));
        assert_eq!(cell.pos(&nav), Some(CellPos::new(5, 0)));
        assert_eq!(cell.aabb(&nav).map(|b| b.min.x), Some(20.0));
        assert_eq!(cell.floor_count(&nav), 1);
        assert_eq!(cell.boundary_half_edges(&nav, CardinalDir::West).len(), 2);
        assert_eq!(cell.nav_cell_unchecked(&nav).pos, CellPos::new(5, 0));

        let west = cell.neighbour(&nav, CardinalDir::West);
        assert_eq!(west, mesh.cell(CellIdx(0)));
        assert!(!cell.neighbour(&nav, CardinalDir::East).is_valid(&nav));
    }

    #[test]
    fn out_of_range_cell_is_invalid() {
        let mut nav = StitchManager::new(StitchConfig::default()).unwrap();
        let mesh = nav.load_mesh(Arc::new(row_mesh(1, 0, 2, 1, 4.0))).unwrap();
        let cell = mesh.cell(CellIdx(2));
        assert!(!cell.is_valid(&nav));
        assert_eq!(cell.floor_count(&nav), 0);
        assert!(!cell.is_stitched(&nav));
        assert!(cell.floors(&nav).is_empty());
        assert!(!cell.floor(FloorIdx(0)).is_valid(&nav));
    }

    #[test]
    fn invalidate_resets_to_default() {
        let mut nav = StitchManager::new(StitchConfig::default()).unwrap();
        let blob = MeshBuilder::new(3, 4.0)
            .cell(layered_cell(CellPos::new(0, 0), 4.0))
            .build();
        let mesh = nav.load_mesh(Arc::new(blob)).unwrap();
        let mut cell = mesh.cell(CellIdx(0));
        assert_eq!(cell.floors(&nav).len(), 2);
        assert_eq!(mesh.holder_count(), 2);
        cell.invalidate();
        assert_eq!(cell, CellHandle::default());
        assert_eq!(mesh.holder_count(), 1);
        assert!(!cell.is_valid(&nav));
    }

    #[test]
    #[should_panic(expected = "invalid CellHandle")]
    fn unchecked_read_panics_when_invalid() {
        let nav = StitchManager::new(StitchConfig::default()).unwrap();
        CellHandle::default().nav_cell_unchecked(&nav);
    }
}
