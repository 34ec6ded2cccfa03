//! Core types for the navstitch navigation-mesh runtime.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the index newtypes used to address the nested subdivisions of a mesh
//! (cell → floor → triangle / vertex / half-edge), cardinal directions
//! and cell positions, the immutable [`NavMeshBlob`] payload that the
//! loader hands over, blob validation, and the [`BlobSource`] seam.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod blob;
pub mod error;
pub mod geometry;
pub mod id;
pub mod source;
mod validate;

pub use blob::{
    CellBoundaryEdge, EntityParameters, FloorLink, HalfEdgeKind, HalfEdgeType, NavCell, NavFloor,
    NavHalfEdge, NavMeshBlob,
};
pub use error::LoadError;
pub use geometry::{Box2f, CardinalDir, CellPos, Vec2, Vec3};
pub use id::{
    CellIdx, FloorIdx, HalfEdgeIdx, MeshGuid, TerrainType, TerrainTypeMask, TriangleIdx, VertexIdx,
};
pub use source::{BlobSource, MemoryBlobSource};
