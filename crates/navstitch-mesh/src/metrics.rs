//! Counters and gauges for the stitch manager.
//!
//! [`StitchMetrics`] is updated in place by every mutating call on the
//! manager and read through
//! [`StitchManager::metrics`](crate::StitchManager::metrics).

/// Cumulative counters plus current arena gauges.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StitchMetrics {
    /// Cumulative successful loads.
    pub meshes_loaded: u64,
    /// Cumulative unloads, including those done by `clear()`.
    pub meshes_unloaded: u64,
    /// Cumulative rejected loads.
    pub loads_rejected: u64,
    /// Cumulative boundary links created (each side counted once).
    pub links_created: u64,
    /// Cumulative boundary links broken by unloads (neighbour side only).
    pub links_broken: u64,
    /// Cumulative slots returned to the pool.
    pub slots_reclaimed: u64,
    /// Meshes currently loaded.
    pub resident_meshes: u32,
    /// Cells currently loaded.
    pub resident_cells: u32,
    /// Slots in the pool that have not been reclaimed.
    pub live_slots: u32,
    /// Cell segments allocated so far.
    pub arena_segments: u32,
    /// Freed cell ranges waiting for reuse.
    pub arena_retired_ranges: u32,
}
