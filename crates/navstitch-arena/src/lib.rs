//! Storage for loaded navmesh wrappers and the slots handles point through.
//!
//! # Architecture
//!
//! ```text
//! ReferencePool
//! └── Arc<ReferenceSlot> × N   (stable identity, atomic data + holder count)
//!
//! Slab<MeshWrapper>            (dense mesh storage, hard limit)
//! SegmentList<CellWrapper>     (bump-allocated cell ranges, retired-range reuse)
//! ```
//!
//! A [`ReferenceSlot`] outlives the mesh it names. Unloading a mesh only
//! clears the slot's data; the slot itself is returned to the pool by
//! [`ReferencePool::reclaim_unused`] once no handle holds it, and its
//! index is then reissued under a new generation so an old [`SlotId`]
//! can never name the replacement.
//!
//! Nothing in this crate knows what a mesh is; the mesh crate supplies
//! the element types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod pool;
pub mod segment;
pub mod slab;
pub mod slot;

pub use config::ArenaConfig;
pub use error::ArenaError;
pub use pool::ReferencePool;
pub use segment::{CellRange, SegmentList};
pub use slab::Slab;
pub use slot::{MeshIdx, ReferenceSlot, SlotId};
