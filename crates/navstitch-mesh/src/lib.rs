//! Runtime for stitching independently streamed navmesh blobs together
//! and for addressing them through handles that survive unloads.
//!
//! # Architecture
//!
//! ```text
//! StitchManager
//! ├── ReferencePool          slots every handle resolves through
//! ├── Slab<MeshWrapper>      one per loaded blob (Arc<NavMeshBlob> + cell range)
//! ├── SegmentList<CellWrapper>
//! │   └── CellWrapper        stitched flag + per-direction boundary links
//! ├── CellGrid               CellPos → loaded cell
//! └── guid table             MeshGuid → slot
//! ```
//!
//! # Handles
//!
//! [`MeshHandle`] holds an `Arc` to its slot and counts itself as a
//! holder. Every other handle is its parent plus one local index:
//!
//! ```text
//! MeshHandle → CellHandle → FloorHandle → TriangleHandle
//!                                       → VertexHandle
//!                                       → HalfEdgeHandle
//! ```
//!
//! All reads take the manager by shared reference and perform one
//! resolution per call: slot data → wrapper → bounds. A handle into an
//! unloaded mesh never fails loudly; it resolves to nothing. Loading,
//! unloading and stitching take the manager by mutable reference, so no
//! read can overlap a mutation.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod grid;
pub mod handle;
pub mod manager;
pub mod metrics;
mod stitch;
pub mod wrapper;

pub use config::StitchConfig;
pub use error::StitchError;
pub use grid::{CellGrid, GridEntry};
pub use handle::{
    CellHandle, FloorHandle, HalfEdgeHandle, MeshHandle, TriangleHandle, VertexHandle,
};
pub use manager::{StitchManager, StitchOutcome, StitchReport};
pub use metrics::StitchMetrics;
pub use wrapper::{CellWrapper, EdgeRef, LinkEntry, MeshWrapper};
