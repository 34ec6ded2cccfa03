//! Handle to a floor of a cell.

use navstitch_core::{FloorIdx, HalfEdgeIdx, NavFloor, TerrainType, TriangleIdx, VertexIdx};

use super::{CellHandle, CellView, HalfEdgeHandle, TriangleHandle, VertexHandle};
use crate::manager::StitchManager;

/// Handle to one floor of a cell.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FloorHandle {
    cell: CellHandle,
    floor: FloorIdx,
}

impl FloorHandle {
    /// Floor `floor` of `cell`.
    pub fn new(cell: CellHandle, floor: FloorIdx) -> Self {
        Self { cell, floor }
    }

    /// The owning cell.
    pub fn cell(&self) -> &CellHandle {
        &self.cell
    }

    /// Index of the floor within its cell.
    pub fn index(&self) -> FloorIdx {
        self.floor
    }

    pub(crate) fn resolve<'n>(&self, nav: &'n StitchManager) -> Option<(CellView<'n>, &'n NavFloor)> {
        let view = self.cell.view(nav)?;
        let floor = view.cell.floor(self.floor)?;
        Some((view, floor))
    }

    /// Whether the cell is valid and the index in range.
    pub fn is_valid(&self, nav: &StitchManager) -> bool {
        self.resolve(nav).is_some()
    }

    /// Release the mesh and reset to the default handle.
    pub fn invalidate(&mut self) {
        self.cell.invalidate();
        self.floor = FloorIdx::INVALID;
    }

    /// The blob floor.
    pub fn nav_floor<'n>(&self, nav: &'n StitchManager) -> Option<&'n NavFloor> {
        self.resolve(nav).map(|(_, floor)| floor)
    }

    /// The blob floor, without the `Option`.
    ///
    /// # Panics
    ///
    /// Panics if the handle is not valid in `nav`.
    pub fn nav_floor_unchecked<'n>(&self, nav: &'n StitchManager) -> &'n NavFloor {
        self.nav_floor(nav)
            .expect("nav_floor_unchecked on an invalid FloorHandle")
    }

    /// Terrain of the floor; [`TerrainType::NONE`] if invalid.
    pub fn terrain(&self, nav: &StitchManager) -> TerrainType {
        self.nav_floor(nav).map_or(TerrainType::NONE, |f| f.terrain)
    }

    /// Handle to triangle `idx`.
    pub fn triangle(&self, idx: TriangleIdx) -> TriangleHandle {
        TriangleHandle::new(self.clone(), idx)
    }

    /// Handle to vertex `idx`.
    pub fn vertex(&self, idx: VertexIdx) -> VertexHandle {
        VertexHandle::new(self.clone(), idx)
    }

    /// Handle to half-edge `idx`.
    pub fn half_edge(&self, idx: HalfEdgeIdx) -> HalfEdgeHandle {
        HalfEdgeHandle::new(self.clone(), idx)
    }

    /// Like [`half_edge`](Self::half_edge), consuming `self`.
    pub fn into_half_edge(self, idx: HalfEdgeIdx) -> HalfEdgeHandle {
        HalfEdgeHandle::new(self, idx)
    }

    /// Number of triangles; 0 if invalid.
    pub fn triangle_count(&self, nav: &StitchManager) -> usize {
        self.nav_floor(nav).map_or(0, NavFloor::triangle_count)
    }

    /// Number of vertices; 0 if invalid.
    pub fn vertex_count(&self, nav: &StitchManager) -> usize {
        self.nav_floor(nav).map_or(0, NavFloor::vertex_count)
    }

    /// Number of half-edges; 0 if invalid.
    pub fn half_edge_count(&self, nav: &StitchManager) -> usize {
        self.nav_floor(nav).map_or(0, NavFloor::half_edge_count)
    }
}
