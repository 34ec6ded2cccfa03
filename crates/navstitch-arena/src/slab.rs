//! Dense slab holding loaded mesh wrappers.

use crate::error::ArenaError;
use crate::slot::MeshIdx;

/// Index-addressed storage with a free list and a hard limit.
///
/// Freed indices are reused immediately. An index alone therefore does
/// not identify a mesh across unloads; callers pair it with the owning
/// [`SlotId`](crate::SlotId) and check both.
pub struct Slab<T> {
    entries: Vec<Option<T>>,
    free_list: Vec<u32>,
    len: usize,
    limit: u32,
}

impl<T> Slab<T> {
    /// An empty slab holding at most `limit` values.
    pub fn new(limit: u32) -> Self {
        Self {
            entries: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            limit,
        }
    }

    /// Store `value`, returning its index.
    pub fn insert(&mut self, value: T) -> Result<MeshIdx, ArenaError> {
        let idx = if let Some(idx) = self.free_list.pop() {
            self.entries[idx as usize] = Some(value);
            idx
        } else {
            if self.entries.len() >= self.limit as usize {
                return Err(ArenaError::MeshLimitReached { limit: self.limit });
            }
            self.entries.push(Some(value));
            (self.entries.len() - 1) as u32
        };
        self.len += 1;
        Ok(MeshIdx(idx))
    }

    /// Take the value at `idx` out of the slab.
    pub fn remove(&mut self, idx: MeshIdx) -> Option<T> {
        let value = self.entries.get_mut(idx.as_usize())?.take()?;
        self.free_list.push(idx.0);
        self.len -= 1;
        Some(value)
    }

    /// The value at `idx`.
    pub fn get(&self, idx: MeshIdx) -> Option<&T> {
        self.entries.get(idx.as_usize())?.as_ref()
    }

    /// The value at `idx`, mutably.
    pub fn get_mut(&mut self, idx: MeshIdx) -> Option<&mut T> {
        self.entries.get_mut(idx.as_usize())?.as_mut()
    }

    /// Occupied entries in index order.
    pub fn iter(&self) -> impl Iterator<Item = (MeshIdx, &T)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.as_ref().map(|v| (MeshIdx(i as u32), v)))
    }

    /// Drop every value.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.free_list.clear();
        self.len = 0;
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the slab is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the next [`insert`](Self::insert) would fail.
    pub fn is_full(&self) -> bool {
        self.free_list.is_empty() && self.entries.len() >= self.limit as usize
    }

    /// Configured maximum.
    pub fn limit(&self) -> u32 {
        self.limit
    }
}
