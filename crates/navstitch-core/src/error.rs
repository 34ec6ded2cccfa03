//! Blob loading errors.

use std::error::Error;
use std::fmt;

use crate::geometry::{CardinalDir, CellPos};
use crate::id::{CellIdx, FloorIdx, HalfEdgeIdx, VertexIdx};

/// A blob could not be obtained or failed validation.
///
/// Fatal to the one load call that produced it; no other loaded mesh
/// is affected.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadError {
    /// The blob has no cells.
    EmptyMesh,
    /// `cell_size` is zero, negative, or not finite.
    InvalidCellSize {
        /// The offending value.
        cell_size: f32,
    },
    /// A floor's half-edge count is not a multiple of three.
    MalformedTriangles {
        /// Cell of the floor.
        cell: CellIdx,
        /// The floor.
        floor: FloorIdx,
        /// Its half-edge count.
        half_edges: usize,
    },
    /// A half-edge starts at a vertex the floor does not have.
    VertexOutOfRange {
        /// Cell of the floor.
        cell: CellIdx,
        /// The floor.
        floor: FloorIdx,
        /// The half-edge.
        half_edge: HalfEdgeIdx,
        /// The missing vertex.
        vertex: VertexIdx,
    },
    /// A paired half-edge's twin is out of range or does not point back.
    BrokenPair {
        /// Cell of the floor.
        cell: CellIdx,
        /// The floor.
        floor: FloorIdx,
        /// The half-edge.
        half_edge: HalfEdgeIdx,
    },
    /// An obstacle half-edge's `next` is out of range or not an obstacle.
    ObstacleOutOfRange {
        /// Cell of the floor.
        cell: CellIdx,
        /// The floor.
        floor: FloorIdx,
        /// The half-edge.
        half_edge: HalfEdgeIdx,
    },
    /// A floor-boundary half-edge names a missing link, floor, or edge.
    FloorLinkOutOfRange {
        /// Cell of the floor.
        cell: CellIdx,
        /// The floor.
        floor: FloorIdx,
        /// The half-edge.
        half_edge: HalfEdgeIdx,
    },
    /// A cell-boundary half-edge and the cell's boundary lists disagree.
    BoundaryEdgeMismatch {
        /// The cell.
        cell: CellIdx,
        /// Side of the cell.
        dir: CardinalDir,
        /// Entry in the boundary list.
        index: usize,
    },
    /// Two cells of the blob share a grid position.
    DuplicateCellPos {
        /// The repeated position.
        pos: CellPos,
    },
    /// A blob source has nothing under `key`.
    NotFound {
        /// The requested key.
        key: String,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMesh => write!(f, "mesh has no cells"),
            Self::InvalidCellSize { cell_size } => {
                write!(f, "invalid cell size {cell_size}")
            }
            Self::MalformedTriangles {
                cell,
                floor,
                half_edges,
            } => write!(
                f,
                "cell {cell} floor {floor}: {half_edges} half-edges is not a whole number of triangles"
            ),
            Self::VertexOutOfRange {
                cell,
                floor,
                half_edge,
                vertex,
            } => write!(
                f,
                "cell {cell} floor {floor}: half-edge {half_edge} starts at missing vertex {vertex}"
            ),
            Self::BrokenPair {
                cell,
                floor,
                half_edge,
            } => write!(
                f,
                "cell {cell} floor {floor}: half-edge {half_edge} has a broken pair"
            ),
            Self::ObstacleOutOfRange {
                cell,
                floor,
                half_edge,
            } => write!(
                f,
                "cell {cell} floor {floor}: obstacle half-edge {half_edge} has a bad successor"
            ),
            Self::FloorLinkOutOfRange {
                cell,
                floor,
                half_edge,
            } => write!(
                f,
                "cell {cell} floor {floor}: half-edge {half_edge} has a bad floor link"
            ),
            Self::BoundaryEdgeMismatch { cell, dir, index } => write!(
                f,
                "cell {cell}: {dir} boundary entry {index} does not match its half-edge"
            ),
            Self::DuplicateCellPos { pos } => {
                write!(f, "duplicate cell position {pos}")
            }
            Self::NotFound { key } => write!(f, "no blob under key '{key}'"),
        }
    }
}

impl Error for LoadError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_location() {
        let err = LoadError::BrokenPair {
            cell: CellIdx(2),
            floor: FloorIdx(0),
            half_edge: HalfEdgeIdx(7),
        };
        assert_eq!(
            err.to_string(),
            "cell 2 floor 0: half-edge 7 has a broken pair"
        );
        let err = LoadError::BoundaryEdgeMismatch {
            cell: CellIdx(0),
            dir: CardinalDir::North,
            index: 3,
        };
        assert!(err.to_string().contains("north boundary entry 3"));
    }
}
