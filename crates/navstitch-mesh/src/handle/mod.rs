//! The safe handle family.
//!
//! Handles name loaded entities without owning them. Each one is a
//! [`MeshHandle`] plus a path of local indices, and every read resolves
//! the whole path through the [`StitchManager`](crate::StitchManager)
//! once. A handle whose mesh has been unloaded, or whose index has
//! fallen out of bounds, is simply invalid: checked accessors return
//! `None`, an invalid child handle, or a sentinel such as
//! [`TerrainType::NONE`](navstitch_core::TerrainType::NONE).
//!
//! The `*_unchecked` accessors skip the `Option` and panic instead. They
//! are for callers that checked [`is_valid`](MeshHandle::is_valid) on
//! the same manager borrow.
//!
//! Equality and ordering are lexicographic over the slot id and the
//! local indices. Handles holding no slot compare equal to each other
//! and before every other handle.

mod cell;
mod floor;
mod half_edge;
mod mesh;
mod triangle;
mod vertex;

pub use cell::CellHandle;
pub use floor::FloorHandle;
pub use half_edge::HalfEdgeHandle;
pub use mesh::MeshHandle;
pub use triangle::TriangleHandle;
pub use vertex::VertexHandle;

use navstitch_core::NavCell;

use crate::wrapper::CellWrapper;

/// One resolution of a cell handle: the blob cell and its runtime
/// state, both borrowed from the manager.
pub(crate) struct CellView<'a> {
    pub cell: &'a NavCell,
    pub state: &'a CellWrapper,
}

// Compile-time assertion: handles can cross threads and be shared.
const _: () = {
    #[allow(dead_code)]
    fn assert_send_sync<T: Send + Sync>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send_sync::<MeshHandle>();
        assert_send_sync::<CellHandle>();
        assert_send_sync::<FloorHandle>();
        assert_send_sync::<TriangleHandle>();
        assert_send_sync::<VertexHandle>();
        assert_send_sync::<HalfEdgeHandle>();
    }
};
