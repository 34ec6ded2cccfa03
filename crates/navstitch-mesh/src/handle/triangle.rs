//! Handle to a triangle of a floor.

use navstitch_core::{NavFloor, TerrainType, TriangleIdx, Vec3};

use super::{FloorHandle, HalfEdgeHandle, VertexHandle};
use crate::manager::StitchManager;

/// Handle to one triangle of a floor.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TriangleHandle {
    floor: FloorHandle,
    triangle: TriangleIdx,
}

impl TriangleHandle {
    /// Triangle `triangle` of `floor`.
    pub fn new(floor: FloorHandle, triangle: TriangleIdx) -> Self {
        Self { floor, triangle }
    }

    /// The owning floor.
    pub fn floor(&self) -> &FloorHandle {
        &self.floor
    }

    /// Index of the triangle within its floor.
    pub fn index(&self) -> TriangleIdx {
        self.triangle
    }

    fn nav_floor<'n>(&self, nav: &'n StitchManager) -> Option<&'n NavFloor> {
        self.floor
            .nav_floor(nav)
            .filter(|f| self.triangle.as_usize() < f.triangle_count())
    }

    /// Whether the floor is valid and the index in range.
    pub fn is_valid(&self, nav: &StitchManager) -> bool {
        self.nav_floor(nav).is_some()
    }

    /// Release the mesh and reset to the default handle.
    pub fn invalidate(&mut self) {
        self.floor.invalidate();
        self.triangle = TriangleIdx::INVALID;
    }

    /// Half-edge `i` (taken mod 3) of the triangle. Invalid if the
    /// triangle is.
    pub fn half_edge(&self, nav: &StitchManager, i: u32) -> HalfEdgeHandle {
        if !self.is_valid(nav) {
            return HalfEdgeHandle::default();
        }
        self.floor
            .half_edge(NavFloor::triangle_half_edge(self.triangle, i))
    }

    /// The three half-edges in winding order.
    pub fn half_edges(&self, nav: &StitchManager) -> [HalfEdgeHandle; 3] {
        [0, 1, 2].map(|i| self.half_edge(nav, i))
    }

    /// Vertex `i` (taken mod 3): the start of half-edge `i`.
    pub fn vertex(&self, nav: &StitchManager, i: u32) -> VertexHandle {
        self.half_edge(nav, i).start_vertex(nav)
    }

    /// Corner positions in winding order.
    pub fn positions(&self, nav: &StitchManager) -> Option<[Vec3; 3]> {
        let floor = self.nav_floor(nav)?;
        let corner = |i: u32| {
            let he = NavFloor::triangle_half_edge(self.triangle, i);
            floor.vertex(floor.start_vertex(he)?)
        };
        Some([corner(0)?, corner(1)?, corner(2)?])
    }

    /// Terrain of the owning floor; [`TerrainType::NONE`] if invalid.
    pub fn terrain(&self, nav: &StitchManager) -> TerrainType {
        self.nav_floor(nav).map_or(TerrainType::NONE, |f| f.terrain)
    }
}
