//! Handle to a half-edge, with triangle walking and boundary crossing.

use navstitch_core::{
    HalfEdgeIdx, HalfEdgeKind, HalfEdgeType, NavFloor, NavHalfEdge, TerrainType, TerrainTypeMask,
    Vec3, VertexIdx,
};

use super::{CellView, FloorHandle, TriangleHandle, VertexHandle};
use crate::manager::StitchManager;
use crate::wrapper::EdgeRef;

/// Handle to one half-edge of a floor.
///
/// This is what a path search walks: [`next`](Self::next) and
/// [`prev`](Self::prev) move around a triangle,
/// [`pair_half_edge`](Self::pair_half_edge) steps to the neighbouring
/// triangle, whether it sits in the same floor, a sibling floor, or a
/// stitched neighbour cell.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HalfEdgeHandle {
    floor: FloorHandle,
    half_edge: HalfEdgeIdx,
}

impl HalfEdgeHandle {
    /// Half-edge `half_edge` of `floor`.
    pub fn new(floor: FloorHandle, half_edge: HalfEdgeIdx) -> Self {
        Self { floor, half_edge }
    }

    /// The owning floor.
    pub fn floor(&self) -> &FloorHandle {
        &self.floor
    }

    /// Index of the half-edge within its floor.
    pub fn index(&self) -> HalfEdgeIdx {
        self.half_edge
    }

    fn resolve<'n>(
        &self,
        nav: &'n StitchManager,
    ) -> Option<(CellView<'n>, &'n NavFloor, &'n NavHalfEdge)> {
        let (view, floor) = self.floor.resolve(nav)?;
        let edge = floor.half_edge(self.half_edge)?;
        Some((view, floor, edge))
    }

    /// Whether the floor is valid and the index in range.
    pub fn is_valid(&self, nav: &StitchManager) -> bool {
        self.resolve(nav).is_some()
    }

    /// Release the mesh and reset to the default handle.
    pub fn invalidate(&mut self) {
        self.floor.invalidate();
        self.half_edge = HalfEdgeIdx::INVALID;
    }

    /// The blob half-edge.
    pub fn nav_half_edge<'n>(&self, nav: &'n StitchManager) -> Option<&'n NavHalfEdge> {
        self.resolve(nav).map(|(_, _, edge)| edge)
    }

    /// The blob half-edge, without the `Option`.
    ///
    /// # Panics
    ///
    /// Panics if the handle is not valid in `nav`.
    pub fn nav_half_edge_unchecked<'n>(&self, nav: &'n StitchManager) -> &'n NavHalfEdge {
        self.nav_half_edge(nav)
            .expect("nav_half_edge_unchecked on an invalid HalfEdgeHandle")
    }

    /// What lies across the edge.
    pub fn kind(&self, nav: &StitchManager) -> Option<HalfEdgeKind> {
        self.nav_half_edge(nav).map(|e| e.kind)
    }

    /// Classification of the edge.
    pub fn edge_type(&self, nav: &StitchManager) -> Option<HalfEdgeType> {
        self.kind(nav).map(HalfEdgeKind::edge_type)
    }

    /// Terrain of the owning floor; [`TerrainType::NONE`] if invalid.
    pub fn terrain(&self, nav: &StitchManager) -> TerrainType {
        self.resolve(nav)
            .map_or(TerrainType::NONE, |(_, floor, _)| floor.terrain)
    }

    // ── Triangle walk ───────────────────────────────────────────

    /// Following half-edge around the same triangle.
    pub fn next(&self, nav: &StitchManager) -> HalfEdgeHandle {
        self.sibling(nav, NavFloor::next_in_triangle)
    }

    /// Preceding half-edge around the same triangle.
    pub fn prev(&self, nav: &StitchManager) -> HalfEdgeHandle {
        self.sibling(nav, NavFloor::prev_in_triangle)
    }

    fn sibling(&self, nav: &StitchManager, step: fn(HalfEdgeIdx) -> HalfEdgeIdx) -> HalfEdgeHandle {
        if !self.is_valid(nav) {
            return HalfEdgeHandle::default();
        }
        self.floor.half_edge(step(self.half_edge))
    }

    /// The triangle this edge belongs to.
    pub fn triangle(&self, nav: &StitchManager) -> TriangleHandle {
        if !self.is_valid(nav) {
            return TriangleHandle::default();
        }
        self.floor.triangle(NavFloor::triangle_of(self.half_edge))
    }

    // ── Vertices ────────────────────────────────────────────────

    fn vertex_with(
        &self,
        nav: &StitchManager,
        pick: fn(&NavFloor, HalfEdgeIdx) -> Option<VertexIdx>,
    ) -> VertexHandle {
        match self.resolve(nav).and_then(|(_, floor, _)| pick(floor, self.half_edge)) {
            Some(v) => self.floor.vertex(v),
            None => VertexHandle::default(),
        }
    }

    fn position_with(
        &self,
        nav: &StitchManager,
        pick: fn(&NavFloor, HalfEdgeIdx) -> Option<VertexIdx>,
    ) -> Option<Vec3> {
        let (_, floor, _) = self.resolve(nav)?;
        floor.vertex(pick(floor, self.half_edge)?)
    }

    /// Vertex the edge starts at.
    pub fn start_vertex(&self, nav: &StitchManager) -> VertexHandle {
        self.vertex_with(nav, NavFloor::start_vertex)
    }

    /// Vertex the edge ends at.
    pub fn end_vertex(&self, nav: &StitchManager) -> VertexHandle {
        self.vertex_with(nav, NavFloor::end_vertex)
    }

    /// Triangle vertex opposite the edge.
    pub fn third_vertex(&self, nav: &StitchManager) -> VertexHandle {
        self.vertex_with(nav, NavFloor::third_vertex)
    }

    /// Position of the start vertex.
    pub fn start_position(&self, nav: &StitchManager) -> Option<Vec3> {
        self.position_with(nav, NavFloor::start_vertex)
    }

    /// Position of the end vertex.
    pub fn end_position(&self, nav: &StitchManager) -> Option<Vec3> {
        self.position_with(nav, NavFloor::end_vertex)
    }

    /// Position of the opposite vertex.
    pub fn third_position(&self, nav: &StitchManager) -> Option<Vec3> {
        self.position_with(nav, NavFloor::third_vertex)
    }

    // ── Crossing ────────────────────────────────────────────────

    /// Next wall edge along the same obstacle contour. Invalid unless
    /// this is an obstacle edge.
    pub fn next_along_obstacle(&self, nav: &StitchManager) -> HalfEdgeHandle {
        match self.kind(nav) {
            Some(HalfEdgeKind::Obstacle { next }) => self.floor.half_edge(next),
            _ => HalfEdgeHandle::default(),
        }
    }

    /// The edge on the other side.
    ///
    /// Resolves the twin in the same floor, the matching edge of a
    /// sibling floor, or the stitched edge of the neighbouring cell.
    /// Invalid for obstacles and for cell boundaries not yet stitched.
    pub fn pair_half_edge(&self, nav: &StitchManager) -> HalfEdgeHandle {
        let Some((view, floor, edge)) = self.resolve(nav) else {
            return HalfEdgeHandle::default();
        };
        match edge.kind {
            HalfEdgeKind::Paired { pair } => self.floor.half_edge(pair),
            HalfEdgeKind::FloorBoundary { link } => match floor.floor_links.get(link as usize) {
                Some(target) => self.floor.cell().floor(target.floor).into_half_edge(target.half_edge),
                None => HalfEdgeHandle::default(),
            },
            HalfEdgeKind::CellBoundary { dir, link } => {
                match view.state.link(dir, link as usize).and_then(|e| e.target) {
                    Some(target) => nav.edge_handle(&target),
                    None => HalfEdgeHandle::default(),
                }
            }
            HalfEdgeKind::Obstacle { .. } => HalfEdgeHandle::default(),
        }
    }

    /// The stitched edge across a cell boundary.
    ///
    /// Invalid unless this is a linked cell-boundary edge. Crossing back
    /// from the result returns this edge.
    pub fn cross_boundary(&self, nav: &StitchManager) -> HalfEdgeHandle {
        match self.link_target(nav) {
            Some(target) => nav.edge_handle(&target),
            None => HalfEdgeHandle::default(),
        }
    }

    fn link_target(&self, nav: &StitchManager) -> Option<EdgeRef> {
        let (view, _, edge) = self.resolve(nav)?;
        match edge.kind {
            HalfEdgeKind::CellBoundary { dir, link } => view.state.link(dir, link as usize)?.target,
            _ => None,
        }
    }

    /// Whether this is a cell-boundary edge stitched to a neighbour whose
    /// floor terrain `mask` allows.
    pub fn is_edge_linked(&self, nav: &StitchManager, mask: TerrainTypeMask) -> bool {
        self.link_target(nav)
            .and_then(|target| nav.edge_floor(&target))
            .is_some_and(|floor| mask.allows(floor.terrain))
    }

    /// Whether an agent restricted to `mask` may cross this edge.
    ///
    /// Interior edges are crossable when the floor's own terrain is
    /// allowed, floor boundaries when the sibling floor's is, and cell
    /// boundaries when they are linked to an allowed floor. Obstacles
    /// never are.
    pub fn is_half_edge_crossable(&self, nav: &StitchManager, mask: TerrainTypeMask) -> bool {
        let Some((_, floor, edge)) = self.resolve(nav) else {
            return false;
        };
        match edge.kind {
            HalfEdgeKind::Paired { .. } => mask.allows(floor.terrain),
            HalfEdgeKind::FloorBoundary { link } => floor
                .floor_links
                .get(link as usize)
                .and_then(|target| self.floor.cell().floor(target.floor).nav_floor(nav))
                .is_some_and(|sibling| mask.allows(sibling.terrain)),
            HalfEdgeKind::CellBoundary { .. } => self.is_edge_linked(nav, mask),
            HalfEdgeKind::Obstacle { .. } => false,
        }
    }

    /// The edge on the other side if crossable under `mask`, otherwise
    /// an invalid handle.
    pub fn crossable_pair(&self, nav: &StitchManager, mask: TerrainTypeMask) -> HalfEdgeHandle {
        if self.is_half_edge_crossable(nav, mask) {
            self.pair_half_edge(nav)
        } else {
            HalfEdgeHandle::default()
        }
    }
}
