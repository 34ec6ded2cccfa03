//! Programmatic cell and mesh construction.

use indexmap::IndexMap;

use navstitch_core::{
    Box2f, CardinalDir, CellBoundaryEdge, CellPos, EntityParameters, FloorIdx, FloorLink,
    HalfEdgeIdx, HalfEdgeKind, MeshGuid, NavCell, NavFloor, NavHalfEdge, NavMeshBlob, TerrainType,
    Vec2, Vec3, VertexIdx,
};

struct RawFloor {
    terrain: TerrainType,
    vertices: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
}

/// Builds one [`NavCell`] from counter-clockwise triangles.
///
/// Triangles of one floor must share vertex indices along interior
/// edges. Sibling floors are linked where their edges coincide exactly
/// in 3D.
pub struct CellBuilder {
    pos: CellPos,
    aabb: Box2f,
    floors: Vec<RawFloor>,
}

/// The ground-plane box of grid cell `pos`.
pub fn cell_aabb(pos: CellPos, cell_size: f32) -> Box2f {
    Box2f::new(
        Vec2::new(pos.x as f32 * cell_size, pos.y as f32 * cell_size),
        Vec2::new((pos.x + 1) as f32 * cell_size, (pos.y + 1) as f32 * cell_size),
    )
}

type EdgeKey = ([u32; 3], [u32; 3]);

fn point_key(v: Vec3) -> [u32; 3] {
    let [x, y] = v.planar_bits();
    [x, y, v.z.to_bits()]
}

impl CellBuilder {
    pub fn new(pos: CellPos, cell_size: f32) -> Self {
        Self {
            pos,
            aabb: cell_aabb(pos, cell_size),
            floors: Vec::new(),
        }
    }

    /// Add a floor. Each triangle lists three indices into `vertices`.
    pub fn floor(
        mut self,
        terrain: TerrainType,
        vertices: Vec<Vec3>,
        triangles: Vec<[u32; 3]>,
    ) -> Self {
        self.floors.push(RawFloor {
            terrain,
            vertices,
            triangles,
        });
        self
    }

    pub fn build(self) -> NavCell {
        let mut cell = NavCell::new(self.pos, self.aabb);

        // Unpaired edges of every floor, keyed by 3D endpoints.
        let mut open: IndexMap<EdgeKey, (FloorIdx, HalfEdgeIdx)> = IndexMap::new();
        let mut floors = Vec::with_capacity(self.floors.len());

        for (f, raw) in self.floors.iter().enumerate() {
            let mut half_edges = Vec::with_capacity(raw.triangles.len() * 3);
            let mut by_vertices: IndexMap<(u32, u32), u32> = IndexMap::new();
            for tri in &raw.triangles {
                for i in 0..3 {
                    let a = tri[i];
                    let b = tri[(i + 1) % 3];
                    by_vertices.insert((a, b), half_edges.len() as u32);
                    half_edges.push(NavHalfEdge {
                        start_vertex: VertexIdx(a),
                        kind: HalfEdgeKind::Obstacle {
                            next: HalfEdgeIdx::INVALID,
                        },
                    });
                }
            }

            for (&(a, b), &he) in &by_vertices {
                if let Some(&pair) = by_vertices.get(&(b, a)) {
                    half_edges[he as usize].kind = HalfEdgeKind::Paired {
                        pair: HalfEdgeIdx(pair),
                    };
                    continue;
                }
                let pa = raw.vertices[a as usize];
                let pb = raw.vertices[b as usize];
                let side = CardinalDir::ALL
                    .into_iter()
                    .find(|&d| self.aabb.segment_on_side(pa.xy(), pb.xy(), d));
                if let Some(dir) = side {
                    let list = &mut cell.boundary_edges[dir.index()];
                    half_edges[he as usize].kind = HalfEdgeKind::CellBoundary {
                        dir,
                        link: list.len() as u32,
                    };
                    list.push(CellBoundaryEdge {
                        floor: FloorIdx(f as u32),
                        half_edge: HalfEdgeIdx(he),
                    });
                    continue;
                }
                open.insert(
                    (point_key(pa), point_key(pb)),
                    (FloorIdx(f as u32), HalfEdgeIdx(he)),
                );
            }

            floors.push(NavFloor {
                terrain: raw.terrain,
                vertices: raw.vertices.clone(),
                half_edges,
                floor_links: Vec::new(),
            });
        }

        // Sibling floors whose open edges coincide in reverse.
        for (&(a, b), &(floor, he)) in &open {
            let Some(&(other_floor, other_he)) = open.get(&(b, a)) else {
                continue;
            };
            if other_floor == floor {
                continue;
            }
            let target = &mut floors[floor.as_usize()];
            let link = target.floor_links.len() as u32;
            target.floor_links.push(FloorLink {
                floor: other_floor,
                half_edge: other_he,
            });
            target.half_edges[he.as_usize()].kind = HalfEdgeKind::FloorBoundary { link };
        }

        // Everything still open is a wall; chain each to the wall leaving
        // its end vertex, or to itself when the contour turns into a
        // boundary.
        for floor in &mut floors {
            let mut wall_from: IndexMap<VertexIdx, HalfEdgeIdx> = IndexMap::new();
            for (i, he) in floor.half_edges.iter().enumerate() {
                if matches!(he.kind, HalfEdgeKind::Obstacle { .. }) {
                    wall_from.entry(he.start_vertex).or_insert(HalfEdgeIdx(i as u32));
                }
            }
            for i in 0..floor.half_edges.len() {
                let he = HalfEdgeIdx(i as u32);
                if !matches!(floor.half_edges[i].kind, HalfEdgeKind::Obstacle { .. }) {
                    continue;
                }
                let next = floor
                    .end_vertex(he)
                    .and_then(|v| wall_from.get(&v).copied())
                    .unwrap_or(he);
                floor.half_edges[i].kind = HalfEdgeKind::Obstacle { next };
            }
        }

        cell.floors = floors;
        cell
    }
}

/// Builds a [`NavMeshBlob`] from cells.
pub struct MeshBuilder {
    guid: MeshGuid,
    cell_size: f32,
    entity: EntityParameters,
    cells: Vec<NavCell>,
}

impl MeshBuilder {
    pub fn new(guid: u64, cell_size: f32) -> Self {
        Self {
            guid: MeshGuid(guid),
            cell_size,
            entity: EntityParameters::default(),
            cells: Vec::new(),
        }
    }

    pub fn entity(mut self, entity: EntityParameters) -> Self {
        self.entity = entity;
        self
    }

    pub fn cell(mut self, cell: NavCell) -> Self {
        self.cells.push(cell);
        self
    }

    pub fn cells(mut self, cells: impl IntoIterator<Item = NavCell>) -> Self {
        self.cells.extend(cells);
        self
    }

    pub fn build(self) -> NavMeshBlob {
        NavMeshBlob {
            guid: self.guid,
            cell_size: self.cell_size,
            entity: self.entity,
            cells: self.cells,
        }
    }
}
