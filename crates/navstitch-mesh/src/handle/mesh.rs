//! Counted handle to a loaded mesh.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use navstitch_arena::{ReferenceSlot, SlotId};
use navstitch_core::{CellIdx, MeshGuid, NavMeshBlob};

use super::CellHandle;
use crate::manager::StitchManager;
use crate::wrapper::MeshWrapper;

/// Handle to a loaded mesh.
///
/// Holds its slot and counts as one of its holders: construction and
/// `clone` increment the slot's holder count, drop and
/// [`invalidate`](Self::invalidate) decrement it. The default handle
/// holds no slot.
#[derive(Default)]
pub struct MeshHandle {
    slot: Option<Arc<ReferenceSlot>>,
}

impl MeshHandle {
    pub(crate) fn from_slot(slot: Arc<ReferenceSlot>) -> Self {
        slot.acquire();
        Self { slot: Some(slot) }
    }

    pub(crate) fn slot(&self) -> Option<&Arc<ReferenceSlot>> {
        self.slot.as_ref()
    }

    /// Id of the held slot.
    pub fn slot_id(&self) -> Option<SlotId> {
        self.slot.as_ref().map(|s| s.id())
    }

    /// Whether the handle holds a slot at all.
    pub fn holds_slot(&self) -> bool {
        self.slot.is_some()
    }

    /// Whether the held slot still names a mesh.
    ///
    /// Needs no manager. [`is_valid`](Self::is_valid) additionally checks
    /// that the slot belongs to the given manager.
    pub fn is_loaded(&self) -> bool {
        self.slot.as_ref().is_some_and(|s| s.data().is_some())
    }

    /// Whether the handle names a mesh loaded in `nav`.
    pub fn is_valid(&self, nav: &StitchManager) -> bool {
        nav.resolve_mesh(self).is_some()
    }

    /// Drop the held slot, leaving the default handle.
    pub fn invalidate(&mut self) {
        if let Some(slot) = self.slot.take() {
            slot.release();
        }
    }

    /// Holder count of the held slot; 0 when none is held.
    pub fn holder_count(&self) -> u32 {
        self.slot.as_ref().map_or(0, |s| s.holder_count())
    }

    /// Handle to cell `idx` of this mesh.
    pub fn cell(&self, idx: CellIdx) -> CellHandle {
        CellHandle::new(self.clone(), idx)
    }

    /// Like [`cell`](Self::cell), consuming `self`.
    pub fn into_cell(self, idx: CellIdx) -> CellHandle {
        CellHandle::new(self, idx)
    }

    /// Handles to every cell, or none if invalid.
    pub fn cells(&self, nav: &StitchManager) -> Vec<CellHandle> {
        (0..self.cell_count(nav) as u32)
            .map(|i| self.cell(CellIdx(i)))
            .collect()
    }

    /// Number of cells; 0 if invalid.
    pub fn cell_count(&self, nav: &StitchManager) -> usize {
        self.wrapper(nav).map_or(0, MeshWrapper::cell_count)
    }

    /// Guid of the loaded blob.
    pub fn guid(&self, nav: &StitchManager) -> Option<MeshGuid> {
        self.wrapper(nav).map(MeshWrapper::guid)
    }

    /// The loaded blob.
    pub fn blob<'n>(&self, nav: &'n StitchManager) -> Option<&'n Arc<NavMeshBlob>> {
        self.wrapper(nav).map(MeshWrapper::blob)
    }

    /// Runtime wrapper of the mesh.
    pub fn wrapper<'n>(&self, nav: &'n StitchManager) -> Option<&'n MeshWrapper> {
        nav.resolve_mesh(self).map(|(_, mesh)| mesh)
    }
}

impl Clone for MeshHandle {
    fn clone(&self) -> Self {
        match &self.slot {
            Some(slot) => Self::from_slot(Arc::clone(slot)),
            None => Self::default(),
        }
    }
}

impl Drop for MeshHandle {
    fn drop(&mut self) {
        self.invalidate();
    }
}

impl PartialEq for MeshHandle {
    fn eq(&self, other: &Self) -> bool {
        self.slot_id() == other.slot_id()
    }
}

impl Eq for MeshHandle {}

impl PartialOrd for MeshHandle {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MeshHandle {
    fn cmp(&self, other: &Self) -> Ordering {
        self.slot_id().cmp(&other.slot_id())
    }
}

impl Hash for MeshHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.slot_id().hash(state);
    }
}

impl fmt::Debug for MeshHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slot_id() {
            Some(id) => write!(f, "MeshHandle({id})"),
            None => write!(f, "MeshHandle(none)"),
        }
    }
}
