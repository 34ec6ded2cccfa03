//! Structural validation of a [`NavMeshBlob`] before it is loaded.
//!
//! Everything the handle layer later relies on for bounds is checked
//! here once, so that resolving a handle never has to distrust the blob.

use indexmap::IndexSet;

use crate::blob::{CellBoundaryEdge, HalfEdgeKind, NavCell, NavFloor, NavMeshBlob};
use crate::error::LoadError;
use crate::geometry::CardinalDir;
use crate::id::{CellIdx, FloorIdx, HalfEdgeIdx};

impl NavMeshBlob {
    /// Check every index in the blob, returning the first violation.
    pub fn validate(&self) -> Result<(), LoadError> {
        if self.cells.is_empty() {
            return Err(LoadError::EmptyMesh);
        }
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(LoadError::InvalidCellSize {
                cell_size: self.cell_size,
            });
        }

        let mut seen = IndexSet::with_capacity(self.cells.len());
        for (i, cell) in self.cells.iter().enumerate() {
            if !seen.insert(cell.pos) {
                return Err(LoadError::DuplicateCellPos { pos: cell.pos });
            }
            validate_cell(CellIdx(i as u32), cell)?;
        }
        Ok(())
    }
}

fn validate_cell(cell_idx: CellIdx, cell: &NavCell) -> Result<(), LoadError> {
    for (f, floor) in cell.floors.iter().enumerate() {
        validate_floor(cell_idx, FloorIdx(f as u32), cell, floor)?;
    }

    for dir in CardinalDir::ALL {
        for (index, entry) in cell.boundary(dir).iter().enumerate() {
            let points_back = cell
                .floor(entry.floor)
                .and_then(|floor| floor.half_edge(entry.half_edge))
                .is_some_and(|he| {
                    he.kind
                        == HalfEdgeKind::CellBoundary {
                            dir,
                            link: index as u32,
                        }
                });
            if !points_back {
                return Err(LoadError::BoundaryEdgeMismatch {
                    cell: cell_idx,
                    dir,
                    index,
                });
            }
        }
    }
    Ok(())
}

fn validate_floor(
    cell_idx: CellIdx,
    floor_idx: FloorIdx,
    cell: &NavCell,
    floor: &NavFloor,
) -> Result<(), LoadError> {
    if floor.half_edges.len() % 3 != 0 {
        return Err(LoadError::MalformedTriangles {
            cell: cell_idx,
            floor: floor_idx,
            half_edges: floor.half_edges.len(),
        });
    }

    for (i, he) in floor.half_edges.iter().enumerate() {
        let half_edge = HalfEdgeIdx(i as u32);
        if floor.vertex(he.start_vertex).is_none() {
            return Err(LoadError::VertexOutOfRange {
                cell: cell_idx,
                floor: floor_idx,
                half_edge,
                vertex: he.start_vertex,
            });
        }

        match he.kind {
            HalfEdgeKind::Paired { pair } => {
                let symmetric = pair != half_edge
                    && floor
                        .half_edge(pair)
                        .is_some_and(|p| p.kind == HalfEdgeKind::Paired { pair: half_edge });
                if !symmetric {
                    return Err(LoadError::BrokenPair {
                        cell: cell_idx,
                        floor: floor_idx,
                        half_edge,
                    });
                }
            }
            HalfEdgeKind::Obstacle { next } => {
                let ok = floor
                    .half_edge(next)
                    .is_some_and(|n| matches!(n.kind, HalfEdgeKind::Obstacle { .. }));
                if !ok {
                    return Err(LoadError::ObstacleOutOfRange {
                        cell: cell_idx,
                        floor: floor_idx,
                        half_edge,
                    });
                }
            }
            HalfEdgeKind::FloorBoundary { link } => {
                let ok = floor.floor_links.get(link as usize).is_some_and(|l| {
                    l.floor != floor_idx
                        && cell
                            .floor(l.floor)
                            .and_then(|target| target.half_edge(l.half_edge))
                            .is_some_and(|t| matches!(t.kind, HalfEdgeKind::FloorBoundary { .. }))
                });
                if !ok {
                    return Err(LoadError::FloorLinkOutOfRange {
                        cell: cell_idx,
                        floor: floor_idx,
                        half_edge,
                    });
                }
            }
            HalfEdgeKind::CellBoundary { dir, link } => {
                let expected = CellBoundaryEdge {
                    floor: floor_idx,
                    half_edge,
                };
                if cell.boundary(dir).get(link as usize) != Some(&expected) {
                    return Err(LoadError::BoundaryEdgeMismatch {
                        cell: cell_idx,
                        dir,
                        index: link as usize,
                    });
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::{EntityParameters, FloorLink, NavHalfEdge};
    use crate::geometry::{Box2f, CellPos, Vec2, Vec3};
    use crate::id::{MeshGuid, TerrainType, VertexIdx};

    /// One cell holding one triangle with its two legs on the south and
    /// west sides and its hypotenuse an obstacle.
    fn corner_blob() -> NavMeshBlob {
        let mut cell = NavCell::new(
            CellPos::new(0, 0),
            Box2f::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0)),
        );
        cell.floors.push(NavFloor {
            terrain: TerrainType(1),
            vertices: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            half_edges: vec![
                NavHalfEdge {
                    start_vertex: VertexIdx(0),
                    kind: HalfEdgeKind::CellBoundary {
                        dir: CardinalDir::South,
                        link: 0,
                    },
                },
                NavHalfEdge {
                    start_vertex: VertexIdx(1),
                    kind: HalfEdgeKind::Obstacle {
                        next: HalfEdgeIdx(1),
                    },
                },
                NavHalfEdge {
                    start_vertex: VertexIdx(2),
                    kind: HalfEdgeKind::CellBoundary {
                        dir: CardinalDir::West,
                        link: 0,
                    },
                },
            ],
            floor_links: Vec::new(),
        });
        cell.boundary_edges[CardinalDir::South.index()].push(CellBoundaryEdge {
            floor: FloorIdx(0),
            half_edge: HalfEdgeIdx(0),
        });
        cell.boundary_edges[CardinalDir::West.index()].push(CellBoundaryEdge {
            floor: FloorIdx(0),
            half_edge: HalfEdgeIdx(2),
        });
        NavMeshBlob {
            guid: MeshGuid(7),
            cell_size: 1.0,
            entity: EntityParameters::default(),
            cells: vec![cell],
        }
    }

    #[test]
    fn well_formed_blob_passes() {
        assert_eq!(corner_blob().validate(), Ok(()));
    }

    #[test]
    fn empty_blob_is_rejected() {
        let mut blob = corner_blob();
        blob.cells.clear();
        assert_eq!(blob.validate(), Err(LoadError::EmptyMesh));
    }

    #[test]
    fn non_positive_cell_size_is_rejected() {
        let mut blob = corner_blob();
        blob.cell_size = 0.0;
        assert!(matches!(
            blob.validate(),
            Err(LoadError::InvalidCellSize { .. })
        ));
        blob.cell_size = f32::NAN;
        assert!(matches!(
            blob.validate(),
            Err(LoadError::InvalidCellSize { .. })
        ));
    }

    #[test]
    fn duplicate_position_is_rejected() {
        let mut blob = corner_blob();
        let copy = blob.cells[0].clone();
        blob.cells.push(copy);
        assert_eq!(
            blob.validate(),
            Err(LoadError::DuplicateCellPos {
                pos: CellPos::new(0, 0)
            })
        );
    }

    #[test]
    fn partial_triangle_is_rejected() {
        let mut blob = corner_blob();
        blob.cells[0].floors[0].half_edges.pop();
        blob.cells[0].boundary_edges[CardinalDir::West.index()].clear();
        assert!(matches!(
            blob.validate(),
            Err(LoadError::MalformedTriangles { half_edges: 2, .. })
        ));
    }

    #[test]
    fn missing_vertex_is_rejected() {
        let mut blob = corner_blob();
        blob.cells[0].floors[0].half_edges[1].start_vertex = VertexIdx(9);
        assert!(matches!(
            blob.validate(),
            Err(LoadError::VertexOutOfRange {
                vertex: VertexIdx(9),
                ..
            })
        ));
    }

    #[test]
    fn one_sided_pair_is_rejected() {
        let mut blob = corner_blob();
        blob.cells[0].floors[0].half_edges[1].kind = HalfEdgeKind::Paired {
            pair: HalfEdgeIdx(0),
        };
        assert!(matches!(
            blob.validate(),
            Err(LoadError::BrokenPair {
                half_edge: HalfEdgeIdx(1),
                ..
            })
        ));
    }

    #[test]
    fn obstacle_successor_must_be_an_obstacle() {
        let mut blob = corner_blob();
        blob.cells[0].floors[0].half_edges[1].kind = HalfEdgeKind::Obstacle {
            next: HalfEdgeIdx(0),
        };
        assert!(matches!(
            blob.validate(),
            Err(LoadError::ObstacleOutOfRange { .. })
        ));
    }

    #[test]
    fn dangling_floor_link_is_rejected() {
        let mut blob = corner_blob();
        let floor = &mut blob.cells[0].floors[0];
        floor.half_edges[1].kind = HalfEdgeKind::FloorBoundary { link: 0 };
        floor.floor_links.push(FloorLink {
            floor: FloorIdx(3),
            half_edge: HalfEdgeIdx(0),
        });
        assert!(matches!(
            blob.validate(),
            Err(LoadError::FloorLinkOutOfRange { .. })
        ));
    }

    #[test]
    fn boundary_list_must_agree_with_half_edges() {
        let mut blob = corner_blob();
        blob.cells[0].boundary_edges[CardinalDir::West.index()][0].half_edge = HalfEdgeIdx(1);
        assert_eq!(
            blob.validate(),
            Err(LoadError::BoundaryEdgeMismatch {
                cell: CellIdx(0),
                dir: CardinalDir::West,
                index: 0,
            })
        );
    }
}
