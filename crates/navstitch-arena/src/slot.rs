//! Reference slots: the stable record every handle points through.
//!
//! A slot pairs a never-reissued [`SlotId`] with two atomics: the
//! [`MeshIdx`] of the wrapper it currently names (if any) and the number
//! of handles holding it. Handles keep the slot alive through an `Arc`,
//! so a slot's memory is never freed under a handle; whether the slot
//! still *means* anything is answered by [`ReferenceSlot::data`].

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Identity of a reference slot: pool index plus reuse generation.
///
/// Ordered by index, then generation. Two ids are equal only when both
/// parts match, so an id from before a reclaim never equals the id the
/// pool hands out for the reused index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId {
    /// Index in the pool.
    pub index: u32,
    /// Number of times the index had been reclaimed when this id was issued.
    pub generation: u32,
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Index of a loaded mesh wrapper in the mesh slab.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshIdx(pub u32);

impl MeshIdx {
    /// The index as a `usize`.
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for MeshIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for MeshIdx {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

const NO_DATA: u32 = u32::MAX;

/// A heap-stable record naming at most one loaded mesh.
///
/// Eligible for reclamation iff it names no mesh and no handle holds it.
#[derive(Debug)]
pub struct ReferenceSlot {
    id: SlotId,
    data: AtomicU32,
    holders: AtomicU32,
}

impl ReferenceSlot {
    /// A slot naming nothing, held by nobody.
    pub fn new(id: SlotId) -> Self {
        Self {
            id,
            data: AtomicU32::new(NO_DATA),
            holders: AtomicU32::new(0),
        }
    }

    /// This slot's identity.
    pub fn id(&self) -> SlotId {
        self.id
    }

    /// The mesh this slot names, or `None` once it has been unloaded.
    pub fn data(&self) -> Option<MeshIdx> {
        match self.data.load(Ordering::Acquire) {
            NO_DATA => None,
            idx => Some(MeshIdx(idx)),
        }
    }

    /// Point the slot at `mesh`.
    pub fn set_data(&self, mesh: MeshIdx) {
        debug_assert_ne!(mesh.0, NO_DATA, "mesh index collides with the empty marker");
        self.data.store(mesh.0, Ordering::Release);
    }

    /// Forget the mesh. Every handle through this slot reads as invalid
    /// from now on.
    pub fn clear_data(&self) {
        self.data.store(NO_DATA, Ordering::Release);
    }

    /// Register one more holder.
    pub fn acquire(&self) {
        self.holders.fetch_add(1, Ordering::Relaxed);
    }

    /// Drop one holder.
    pub fn release(&self) {
        let prev = self.holders.fetch_sub(1, Ordering::Release);
        debug_assert!(prev > 0, "released slot {} with no holders", self.id);
    }

    /// Current number of holders.
    pub fn holder_count(&self) -> u32 {
        self.holders.load(Ordering::Acquire)
    }

    /// Whether the pool may reclaim this slot.
    pub fn is_reclaimable(&self) -> bool {
        self.data().is_none() && self.holder_count() == 0
    }
}
