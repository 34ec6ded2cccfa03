//! The immutable navmesh blob model.
//!
//! A [`NavMeshBlob`] is what the offline pipeline produces for one
//! streamable region. It is never mutated after loading: the stitch
//! manager wraps it, records runtime link state next to it, and shares
//! it with the loader through an `Arc`.
//!
//! The nesting is mesh → cell → floor → (triangle, vertex, half-edge).
//! A floor stores its triangles implicitly: triangle `t` is the three
//! consecutive half-edges `3t`, `3t + 1`, `3t + 2`, each of which starts
//! at a vertex and ends at the start vertex of the next one.

use crate::geometry::{Box2f, CardinalDir, CellPos, Vec3};
use crate::id::{CellIdx, FloorIdx, HalfEdgeIdx, MeshGuid, TerrainType, TriangleIdx, VertexIdx};

/// Agent dimensions a mesh was generated for.
///
/// Meshes generated for different agents cannot be stitched together.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntityParameters {
    /// Agent radius.
    pub radius: f32,
    /// Agent height.
    pub height: f32,
    /// Maximum step height the agent can climb.
    pub step_max: f32,
    /// Maximum walkable slope, in degrees.
    pub slope_max: f32,
}

impl EntityParameters {
    /// Default agent radius.
    pub const DEFAULT_RADIUS: f32 = 0.4;
    /// Default agent height.
    pub const DEFAULT_HEIGHT: f32 = 1.8;
    /// Default maximum step height.
    pub const DEFAULT_STEP_MAX: f32 = 0.5;
    /// Default maximum slope.
    pub const DEFAULT_SLOPE_MAX: f32 = 45.0;
}

impl Default for EntityParameters {
    fn default() -> Self {
        Self {
            radius: Self::DEFAULT_RADIUS,
            height: Self::DEFAULT_HEIGHT,
            step_max: Self::DEFAULT_STEP_MAX,
            slope_max: Self::DEFAULT_SLOPE_MAX,
        }
    }
}

/// Classification of a half-edge, without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HalfEdgeType {
    /// Shared with another triangle of the same floor.
    Paired,
    /// Borders nothing walkable.
    Obstacle,
    /// Borders another floor of the same cell.
    FloorBoundary,
    /// Lies on a side of the cell and may be stitched to a neighbour.
    CellBoundary,
}

/// What lies on the other side of a half-edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HalfEdgeKind {
    /// Opposite half-edge in the same floor.
    Paired {
        /// The twin half-edge.
        pair: HalfEdgeIdx,
    },
    /// Wall. `next` is the following half-edge along the same obstacle
    /// contour, which lets a search walk the outline of a hole.
    Obstacle {
        /// Next obstacle half-edge in the contour.
        next: HalfEdgeIdx,
    },
    /// Crossing into a sibling floor of the same cell.
    FloorBoundary {
        /// Index into the owning floor's [`NavFloor::floor_links`].
        link: u32,
    },
    /// Crossing out of the cell on side `dir`.
    CellBoundary {
        /// Side of the cell this edge lies on.
        dir: CardinalDir,
        /// Index into the owning cell's `boundary_edges[dir]`.
        link: u32,
    },
}

impl HalfEdgeKind {
    /// The payload-free classification.
    pub fn edge_type(self) -> HalfEdgeType {
        match self {
            HalfEdgeKind::Paired { .. } => HalfEdgeType::Paired,
            HalfEdgeKind::Obstacle { .. } => HalfEdgeType::Obstacle,
            HalfEdgeKind::FloorBoundary { .. } => HalfEdgeType::FloorBoundary,
            HalfEdgeKind::CellBoundary { .. } => HalfEdgeType::CellBoundary,
        }
    }
}

/// One directed edge of a floor triangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NavHalfEdge {
    /// Vertex this edge starts at.
    pub start_vertex: VertexIdx,
    /// What lies across the edge.
    pub kind: HalfEdgeKind,
}

/// Target of a floor-boundary half-edge: a half-edge in a sibling floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FloorLink {
    /// Floor on the other side.
    pub floor: FloorIdx,
    /// Matching half-edge in that floor.
    pub half_edge: HalfEdgeIdx,
}

/// A half-edge lying on one side of its cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellBoundaryEdge {
    /// Floor owning the edge.
    pub floor: FloorIdx,
    /// The edge within that floor.
    pub half_edge: HalfEdgeIdx,
}

/// A connected walkable surface of one terrain type inside a cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NavFloor {
    /// Terrain type shared by every triangle of the floor.
    pub terrain: TerrainType,
    /// Vertex positions.
    pub vertices: Vec<Vec3>,
    /// Half-edges, three per triangle.
    pub half_edges: Vec<NavHalfEdge>,
    /// Targets of this floor's floor-boundary half-edges.
    pub floor_links: Vec<FloorLink>,
}

impl NavFloor {
    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.half_edges.len() / 3
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of half-edges.
    pub fn half_edge_count(&self) -> usize {
        self.half_edges.len()
    }

    /// Half-edge `idx`, if in range.
    pub fn half_edge(&self, idx: HalfEdgeIdx) -> Option<&NavHalfEdge> {
        self.half_edges.get(idx.as_usize())
    }

    /// Position of vertex `idx`, if in range.
    pub fn vertex(&self, idx: VertexIdx) -> Option<Vec3> {
        self.vertices.get(idx.as_usize()).copied()
    }

    /// Triangle owning half-edge `he`.
    pub fn triangle_of(he: HalfEdgeIdx) -> TriangleIdx {
        TriangleIdx(he.0 / 3)
    }

    /// The `i`-th half-edge (`i` in `0..3`) of triangle `t`.
    pub fn triangle_half_edge(t: TriangleIdx, i: u32) -> HalfEdgeIdx {
        HalfEdgeIdx(t.0 * 3 + i % 3)
    }

    /// Following half-edge around the same triangle.
    pub fn next_in_triangle(he: HalfEdgeIdx) -> HalfEdgeIdx {
        HalfEdgeIdx(he.0 - he.0 % 3 + (he.0 + 1) % 3)
    }

    /// Preceding half-edge around the same triangle.
    pub fn prev_in_triangle(he: HalfEdgeIdx) -> HalfEdgeIdx {
        HalfEdgeIdx(he.0 - he.0 % 3 + (he.0 + 2) % 3)
    }

    /// Start vertex of `he`, if in range.
    pub fn start_vertex(&self, he: HalfEdgeIdx) -> Option<VertexIdx> {
        self.half_edge(he).map(|e| e.start_vertex)
    }

    /// End vertex of `he`: the start of the next half-edge.
    pub fn end_vertex(&self, he: HalfEdgeIdx) -> Option<VertexIdx> {
        self.half_edge(he)?;
        self.start_vertex(Self::next_in_triangle(he))
    }

    /// The triangle vertex not touched by `he`.
    pub fn third_vertex(&self, he: HalfEdgeIdx) -> Option<VertexIdx> {
        self.half_edge(he)?;
        self.start_vertex(Self::prev_in_triangle(he))
    }

    /// Start and end positions of `he`.
    pub fn edge_positions(&self, he: HalfEdgeIdx) -> Option<(Vec3, Vec3)> {
        let a = self.vertex(self.start_vertex(he)?)?;
        let b = self.vertex(self.end_vertex(he)?)?;
        Some((a, b))
    }
}

/// One square tile of a mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct NavCell {
    /// Position in the global cell grid.
    pub pos: CellPos,
    /// Ground-plane extent.
    pub aabb: Box2f,
    /// Floors of the cell.
    pub floors: Vec<NavFloor>,
    /// Boundary half-edges per side, indexed by [`CardinalDir::index`].
    pub boundary_edges: [Vec<CellBoundaryEdge>; 4],
}

impl NavCell {
    /// An empty cell at `pos`.
    pub fn new(pos: CellPos, aabb: Box2f) -> Self {
        Self {
            pos,
            aabb,
            floors: Vec::new(),
            boundary_edges: Default::default(),
        }
    }

    /// Number of floors.
    pub fn floor_count(&self) -> usize {
        self.floors.len()
    }

    /// Floor `idx`, if in range.
    pub fn floor(&self, idx: FloorIdx) -> Option<&NavFloor> {
        self.floors.get(idx.as_usize())
    }

    /// Boundary half-edges on side `dir`.
    pub fn boundary(&self, dir: CardinalDir) -> &[CellBoundaryEdge] {
        &self.boundary_edges[dir.index()]
    }

    /// Total boundary half-edges over all four sides.
    pub fn boundary_edge_count(&self) -> usize {
        self.boundary_edges.iter().map(Vec::len).sum()
    }
}

/// An immutable, independently streamable navmesh region.
#[derive(Clone, Debug, PartialEq)]
pub struct NavMeshBlob {
    /// Blob identity.
    pub guid: MeshGuid,
    /// Side length of every cell, in world units.
    pub cell_size: f32,
    /// Agent the mesh was generated for.
    pub entity: EntityParameters,
    /// Cells of the region.
    pub cells: Vec<NavCell>,
}

impl NavMeshBlob {
    /// Number of cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Cell `idx`, if in range.
    pub fn cell(&self, idx: CellIdx) -> Option<&NavCell> {
        self.cells.get(idx.as_usize())
    }

    /// Boundary half-edges of cell `idx` on side `dir`; empty when the
    /// cell does not exist.
    pub fn cell_bounds(&self, idx: CellIdx, dir: CardinalDir) -> &[CellBoundaryEdge] {
        self.cell(idx).map(|c| c.boundary(dir)).unwrap_or(&[])
    }

    /// Whether `other` was generated with the same cell size and agent,
    /// which is required for the two to share a cell grid.
    pub fn is_compatible_with(&self, other: &NavMeshBlob) -> bool {
        self.cell_size == other.cell_size && self.entity == other.entity
    }
}
