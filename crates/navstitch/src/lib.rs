//! navstitch: runtime stitching of independently streamed navigation-mesh
//! blobs, addressed through handles that stay safe across unloads.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all navstitch sub-crates. For most users, adding `navstitch` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use navstitch::prelude::*;
//! use navstitch_test_utils::row_mesh;
//!
//! let mut nav = StitchManager::new(StitchConfig::default()).unwrap();
//! let a = nav.load_mesh(Arc::new(row_mesh(1, 0, 2, 2, 4.0))).unwrap();
//! let b = nav.load_mesh(Arc::new(row_mesh(2, 2, 1, 2, 4.0))).unwrap();
//!
//! let report = nav.stitch_boundary(&a, &b).report().unwrap();
//! assert_eq!(report.new_links, 2);
//!
//! // Cross from A's easternmost cell into B.
//! let seam = a.cell(CellIdx(1)).boundary_half_edges(&nav, CardinalDir::East);
//! let across = seam[0].cross_boundary(&nav);
//! assert_eq!(across.floor().cell().mesh(), &b);
//!
//! // After B is unloaded the handle resolves to nothing.
//! nav.unload_mesh(&b);
//! assert!(!across.is_valid(&nav));
//! assert!(!seam[0].is_edge_linked(&nav, TerrainTypeMask::ALL));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `navstitch-core` | Indices, geometry, the blob model, `BlobSource` |
//! | [`arena`] | `navstitch-arena` | Reference slots, slot pool, cell segments, mesh slab |
//! | [`mesh`] | `navstitch-mesh` | `StitchManager`, wrappers, handles, metrics |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core identifiers and the immutable blob model (`navstitch-core`).
///
/// Blobs are produced by a loader, validated with
/// [`types::NavMeshBlob::validate`], and handed to the manager behind an
/// `Arc`.
pub use navstitch_core as types;

/// Slot and cell storage (`navstitch-arena`).
///
/// Most users only touch [`arena::SlotId`] and [`arena::ArenaConfig`].
pub use navstitch_arena as arena;

/// The stitch manager and the handle family (`navstitch-mesh`).
pub use navstitch_mesh as mesh;

/// Common imports for typical navstitch usage.
///
/// ```rust
/// use navstitch::prelude::*;
/// ```
pub mod prelude {
    // Indices and geometry
    pub use navstitch_core::{
        CardinalDir, CellIdx, CellPos, FloorIdx, HalfEdgeIdx, HalfEdgeType, MeshGuid,
        TerrainType, TerrainTypeMask, TriangleIdx, Vec3, VertexIdx,
    };

    // Blobs
    pub use navstitch_core::{BlobSource, MemoryBlobSource, NavMeshBlob};

    // Errors
    pub use navstitch_arena::ArenaError;
    pub use navstitch_core::LoadError;
    pub use navstitch_mesh::StitchError;

    // Configuration
    pub use navstitch_arena::ArenaConfig;
    pub use navstitch_mesh::StitchConfig;

    // Manager
    pub use navstitch_mesh::{StitchManager, StitchMetrics, StitchOutcome, StitchReport};

    // Handles
    pub use navstitch_mesh::{
        CellHandle, FloorHandle, HalfEdgeHandle, MeshHandle, TriangleHandle, VertexHandle,
    };
}
