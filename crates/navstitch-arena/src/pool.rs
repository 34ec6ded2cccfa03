//! The pool that owns every [`ReferenceSlot`].

use std::sync::Arc;

use crate::slot::{ReferenceSlot, SlotId};

struct PoolEntry {
    generation: u32,
    slot: Option<Arc<ReferenceSlot>>,
}

/// Growable collection of reference slots with a reclaim sweep.
///
/// Indices are reused after [`reclaim_unused`](Self::reclaim_unused),
/// but each reuse bumps the index's generation, so a [`SlotId`] is never
/// issued twice. An index whose generation would wrap is retired for
/// good instead.
#[derive(Default)]
pub struct ReferencePool {
    entries: Vec<PoolEntry>,
    free_list: Vec<u32>,
    live: usize,
}

impl ReferencePool {
    /// An empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot naming nothing, held by nobody.
    pub fn new_slot(&mut self) -> SlotId {
        self.new_shared_slot().id()
    }

    /// Like [`new_slot`](Self::new_slot), returning the slot itself.
    pub fn new_shared_slot(&mut self) -> Arc<ReferenceSlot> {
        let slot = if let Some(index) = self.free_list.pop() {
            let entry = &mut self.entries[index as usize];
            let slot = Arc::new(ReferenceSlot::new(SlotId {
                index,
                generation: entry.generation,
            }));
            entry.slot = Some(Arc::clone(&slot));
            slot
        } else {
            let slot = Arc::new(ReferenceSlot::new(SlotId {
                index: self.entries.len() as u32,
                generation: 0,
            }));
            self.entries.push(PoolEntry {
                generation: 0,
                slot: Some(Arc::clone(&slot)),
            });
            slot
        };
        self.live += 1;
        slot
    }

    /// The live slot for `id`; `None` if it was reclaimed.
    pub fn get(&self, id: SlotId) -> Option<&Arc<ReferenceSlot>> {
        let entry = self.entries.get(id.index as usize)?;
        if entry.generation != id.generation {
            return None;
        }
        entry.slot.as_ref()
    }

    /// Sweep every slot once, freeing those that name no mesh and have
    /// no holders. Returns the number freed.
    ///
    /// Never required for correctness; it only bounds the pool's size.
    pub fn reclaim_unused(&mut self) -> usize {
        let mut freed = 0;
        for (index, entry) in self.entries.iter_mut().enumerate() {
            let reclaimable = entry
                .slot
                .as_ref()
                .is_some_and(|slot| slot.is_reclaimable());
            if !reclaimable {
                continue;
            }
            entry.slot = None;
            freed += 1;
            if let Some(next) = entry.generation.checked_add(1) {
                entry.generation = next;
                self.free_list.push(index as u32);
            }
        }
        self.live -= freed;
        freed
    }

    /// Iterate over live slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ReferenceSlot>> {
        self.entries.iter().filter_map(|e| e.slot.as_ref())
    }

    /// Number of live (not yet reclaimed) slots.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether there are no live slots.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of indices waiting to be reused.
    pub fn free_count(&self) -> usize {
        self.free_list.len()
    }

    /// Indices ever allocated (live, free, and retired).
    pub fn total_slots(&self) -> usize {
        self.entries.len()
    }
}
