//! Handle to a vertex of a floor.

use navstitch_core::{Vec3, VertexIdx};

use super::FloorHandle;
use crate::manager::StitchManager;

/// Handle to one vertex of a floor.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexHandle {
    floor: FloorHandle,
    vertex: VertexIdx,
}

impl VertexHandle {
    /// Vertex `vertex` of `floor`.
    pub fn new(floor: FloorHandle, vertex: VertexIdx) -> Self {
        Self { floor, vertex }
    }

    /// The owning floor.
    pub fn floor(&self) -> &FloorHandle {
        &self.floor
    }

    /// Index of the vertex within its floor.
    pub fn index(&self) -> VertexIdx {
        self.vertex
    }

    /// Whether the floor is valid and the index in range.
    pub fn is_valid(&self, nav: &StitchManager) -> bool {
        self.position(nav).is_some()
    }

    /// Release the mesh and reset to the default handle.
    pub fn invalidate(&mut self) {
        self.floor.invalidate();
        self.vertex = VertexIdx::INVALID;
    }

    /// World position.
    pub fn position(&self, nav: &StitchManager) -> Option<Vec3> {
        self.floor.nav_floor(nav)?.vertex(self.vertex)
    }

    /// World position, without the `Option`.
    ///
    /// # Panics
    ///
    /// Panics if the handle is not valid in `nav`.
    pub fn position_unchecked(&self, nav: &StitchManager) -> Vec3 {
        self.position(nav)
            .expect("position_unchecked on an invalid VertexHandle")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StitchConfig;
    use navstitch_core::{CellIdx, CellPos, FloorIdx};
    use navstitch_test_utils::{raised_quad_cell, MeshBuilder};
    use std::sync::Arc;

    #[test]
    fn vertex_positions_and_bounds() {
        let mut nav = StitchManager::new(StitchConfig::default()).unwrap();
        let blob = MeshBuilder::new(1, 4.0)
            .cell(raised_quad_cell(CellPos::new(1, 1), 1, 4.0, 2.5))
            .build();
        let mesh = nav.load_mesh(Arc::new(blob)).unwrap();
        let floor = mesh.cell(CellIdx(0)).into_floor(FloorIdx(0));

        let v = floor.vertex(VertexIdx(3));
        assert!(v.is_valid(&nav));
        assert_eq!(v.position_unchecked(&nav), Vec3::new(8.0, 8.0, 2.5));
        assert!(!floor.vertex(VertexIdx(4)).is_valid(&nav));

        nav.unload_mesh(&mesh);
        assert_eq!(v.position(&nav), None);
    }
}
