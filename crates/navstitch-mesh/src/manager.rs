//! The stitch manager: owner of every loaded mesh.
//!
//! [`StitchManager`] is the only component that creates or destroys
//! [`MeshWrapper`]s and the only one that writes boundary links. Handles
//! read through it by shared reference; loading, unloading and stitching
//! take it by mutable reference.
//!
//! # Teardown
//!
//! Unloading is two-phase. The mesh's links are broken and its slot is
//! nulled, so every outstanding handle reads as invalid, and only then
//! is its arena storage freed. The slot itself survives until
//! [`reclaim_unused`](StitchManager::reclaim_unused) finds it with no
//! holders left.

use std::sync::Arc;

use indexmap::IndexMap;

use navstitch_arena::{ArenaError, MeshIdx, ReferencePool, SegmentList, Slab, SlotId};
use navstitch_core::{
    BlobSource, CellIdx, CellPos, EntityParameters, MeshGuid, NavFloor, NavMeshBlob,
};

use crate::config::StitchConfig;
use crate::error::StitchError;
use crate::grid::{CellGrid, GridEntry};
use crate::handle::{CellHandle, CellView, HalfEdgeHandle, MeshHandle};
use crate::metrics::StitchMetrics;
use crate::stitch;
use crate::wrapper::{CellWrapper, EdgeRef, MeshWrapper};

// Compile-time assertion: the manager can be moved to and shared
// between threads. Mutation still requires `&mut`.
const _: () = {
    #[allow(dead_code)]
    fn assert_send_sync<T: Send + Sync>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send_sync::<StitchManager>();
    }
};

// ── StitchReport ────────────────────────────────────────────────

/// What one stitching pass did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StitchReport {
    /// Adjacent cell pairs examined.
    pub cell_pairs: usize,
    /// Boundary links created (each pair of edges counted once).
    pub new_links: usize,
}

impl StitchReport {
    fn merge(self, other: StitchReport) -> StitchReport {
        StitchReport {
            cell_pairs: self.cell_pairs + other.cell_pairs,
            new_links: self.new_links + other.new_links,
        }
    }
}

/// Result of a stitch request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StitchOutcome {
    /// A handle did not name a loaded mesh. Nothing changed.
    NotLoaded,
    /// The pass ran.
    Stitched(StitchReport),
}

impl StitchOutcome {
    /// The report, if the pass ran.
    pub fn report(self) -> Option<StitchReport> {
        match self {
            Self::NotLoaded => None,
            Self::Stitched(report) => Some(report),
        }
    }
}

// ── StitchManager ───────────────────────────────────────────────

/// Cell size and agent shared by every loaded mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
struct GenerationParams {
    cell_size: f32,
    entity: EntityParameters,
}

/// Loads, unloads and stitches navmesh blobs, and resolves handles.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use navstitch_core::CellIdx;
/// use navstitch_mesh::{StitchConfig, StitchManager};
/// use navstitch_test_utils::row_mesh;
///
/// let mut nav = StitchManager::new(StitchConfig::default()).unwrap();
/// let a = nav.load_mesh(Arc::new(row_mesh(1, 0, 2, 2, 4.0))).unwrap();
/// let b = nav.load_mesh(Arc::new(row_mesh(2, 2, 1, 2, 4.0))).unwrap();
/// assert_eq!(nav.stitch_boundary(&a, &b).report().unwrap().new_links, 2);
///
/// let cell = a.cell(CellIdx(0));
/// assert!(cell.is_valid(&nav));
/// nav.unload_mesh(&b);
/// assert!(!b.is_valid(&nav));
/// ```
pub struct StitchManager {
    config: StitchConfig,
    pool: ReferencePool,
    meshes: Slab<MeshWrapper>,
    cells: SegmentList<CellWrapper>,
    grid: CellGrid,
    guids: IndexMap<MeshGuid, SlotId>,
    generation: Option<GenerationParams>,
    metrics: StitchMetrics,
}

impl StitchManager {
    /// Create an empty manager.
    ///
    /// Fails if the config does not validate.
    pub fn new(config: StitchConfig) -> Result<Self, StitchError> {
        config.validate()?;
        Ok(Self {
            pool: ReferencePool::new(),
            meshes: Slab::new(config.arena.max_meshes),
            cells: SegmentList::new(config.arena.segment_size, config.arena.max_segments),
            grid: CellGrid::new(),
            guids: IndexMap::new(),
            generation: None,
            metrics: StitchMetrics::default(),
            config,
        })
    }

    /// Load `blob` and return a handle to it.
    ///
    /// The blob is validated, checked against the loaded set (guid,
    /// generation parameters, cell positions) and placed. Its own cells
    /// are stitched together before this returns. With
    /// [`auto_stitch`](StitchConfig::auto_stitch) it is also stitched to
    /// every adjacent loaded mesh.
    ///
    /// A rejected load leaves the manager unchanged.
    pub fn load_mesh(&mut self, blob: Arc<NavMeshBlob>) -> Result<MeshHandle, StitchError> {
        let guid = blob.guid;
        self.place(blob).inspect_err(|e| {
            self.metrics.loads_rejected += 1;
            tracing::warn!(guid = %guid, error = %e, "mesh load rejected");
        })
    }

    /// Fetch `key` from `source` and load it.
    pub fn load_from(
        &mut self,
        source: &dyn BlobSource,
        key: &str,
    ) -> Result<MeshHandle, StitchError> {
        let blob = source.load_blob(key).inspect_err(|e| {
            self.metrics.loads_rejected += 1;
            tracing::warn!(key, error = %e, "blob fetch failed");
        })?;
        self.load_mesh(blob)
    }

    fn place(&mut self, blob: Arc<NavMeshBlob>) -> Result<MeshHandle, StitchError> {
        blob.validate()?;
        let guid = blob.guid;
        if self.guids.contains_key(&guid) {
            return Err(StitchError::AlreadyLoaded { guid });
        }
        if !self.is_compatible(&blob) {
            return Err(StitchError::Incompatible { guid });
        }
        if let Some(pos) = self.grid.first_overlap(blob.cells.iter().map(|c| c.pos)) {
            return Err(StitchError::Overlap { guid, pos });
        }
        if self.meshes.is_full() {
            return Err(ArenaError::MeshLimitReached {
                limit: self.meshes.limit(),
            }
            .into());
        }

        let cell_count = blob.cell_count();
        let len = u32::try_from(cell_count).map_err(|_| ArenaError::CapacityExceeded {
            requested: cell_count,
            capacity: self.cells.capacity(),
        })?;
        let range = self.cells.alloc(len)?;
        for (i, (state, cell)) in self
            .cells
            .slice_mut(range)
            .iter_mut()
            .zip(&blob.cells)
            .enumerate()
        {
            *state = CellWrapper::new(CellIdx(i as u32), cell);
        }

        let slot = self.pool.new_shared_slot();
        let id = slot.id();
        let wrapper = MeshWrapper::new(Arc::clone(&blob), id, range);
        let idx = match self.meshes.insert(wrapper) {
            Ok(idx) => idx,
            Err(e) => {
                self.cells.free(range);
                return Err(e.into());
            }
        };
        slot.set_data(idx);

        for (i, cell) in blob.cells.iter().enumerate() {
            self.grid.insert(
                cell.pos,
                GridEntry {
                    slot: id,
                    mesh: idx,
                    cell: CellIdx(i as u32),
                },
            );
        }
        self.guids.insert(guid, id);
        self.generation.get_or_insert(GenerationParams {
            cell_size: blob.cell_size,
            entity: blob.entity,
        });

        let tolerance = self.config.altitude_tolerance;
        let internal = stitch::stitch_internal(&self.meshes, &mut self.cells, idx, tolerance);
        let external = if self.config.auto_stitch {
            stitch::stitch_with_grid(&self.meshes, &mut self.cells, &self.grid, idx, tolerance)
        } else {
            StitchReport::default()
        };

        self.metrics.meshes_loaded += 1;
        self.metrics.links_created += (internal.new_links + external.new_links) as u64;
        self.refresh_gauges();
        tracing::debug!(
            guid = %guid,
            slot = %id,
            cells = cell_count,
            internal_links = internal.new_links,
            external_links = external.new_links,
            "mesh loaded"
        );
        Ok(MeshHandle::from_slot(slot))
    }

    /// Unload the mesh `handle` names.
    ///
    /// Links from neighbouring meshes into it are broken first, then its
    /// slot is nulled, then its storage is freed. Returns `false`, and
    /// does nothing, if the handle names no loaded mesh.
    pub fn unload_mesh(&mut self, handle: &MeshHandle) -> bool {
        match self.mesh_index(handle) {
            Some(idx) => {
                self.unload_at(idx);
                true
            }
            None => false,
        }
    }

    fn unload_at(&mut self, idx: MeshIdx) {
        let broken = stitch::unlink_neighbours(&self.meshes, &mut self.cells, &self.grid, idx);

        let Some(id) = self.meshes.get(idx).map(MeshWrapper::slot) else {
            return;
        };
        if let Some(slot) = self.pool.get(id) {
            slot.clear_data();
        }
        let Some(mesh) = self.meshes.remove(idx) else {
            return;
        };
        for pos in mesh.positions() {
            self.grid.remove(pos);
        }
        self.guids.swap_remove(&mesh.guid());
        self.cells.free(mesh.cell_range());
        if self.meshes.is_empty() {
            self.generation = None;
        }

        self.metrics.meshes_unloaded += 1;
        self.metrics.links_broken += broken as u64;
        self.refresh_gauges();
        tracing::debug!(
            guid = %mesh.guid(),
            slot = %id,
            cells = mesh.cell_count(),
            links_broken = broken,
            "mesh unloaded"
        );
    }

    /// Stitch the facing boundaries of `a` and `b`.
    ///
    /// Edges already linked are left alone, so calling this again is a
    /// no-op. Passing the same mesh twice re-stitches its own cells.
    pub fn stitch_boundary(&mut self, a: &MeshHandle, b: &MeshHandle) -> StitchOutcome {
        let (Some(ia), Some(ib)) = (self.mesh_index(a), self.mesh_index(b)) else {
            return StitchOutcome::NotLoaded;
        };
        let tolerance = self.config.altitude_tolerance;
        let report = if ia == ib {
            stitch::stitch_internal(&self.meshes, &mut self.cells, ia, tolerance)
        } else {
            stitch::stitch_between(&self.meshes, &mut self.cells, ia, ib, tolerance)
        };
        self.record_stitch(ia, report);
        StitchOutcome::Stitched(report)
    }

    /// Stitch `mesh` to every adjacent loaded mesh.
    pub fn stitch_neighbours(&mut self, mesh: &MeshHandle) -> StitchOutcome {
        let Some(idx) = self.mesh_index(mesh) else {
            return StitchOutcome::NotLoaded;
        };
        let tolerance = self.config.altitude_tolerance;
        let report = stitch::stitch_with_grid(
            &self.meshes,
            &mut self.cells,
            &self.grid,
            idx,
            tolerance,
        )
        .merge(stitch::stitch_internal(
            &self.meshes,
            &mut self.cells,
            idx,
            tolerance,
        ));
        self.record_stitch(idx, report);
        StitchOutcome::Stitched(report)
    }

    fn record_stitch(&mut self, idx: MeshIdx, report: StitchReport) {
        self.metrics.links_created += report.new_links as u64;
        tracing::debug!(
            mesh = %idx,
            cell_pairs = report.cell_pairs,
            links = report.new_links,
            "stitch pass"
        );
    }

    /// Return slots that name no mesh and have no holders to the pool.
    /// Returns the number reclaimed.
    pub fn reclaim_unused(&mut self) -> usize {
        let freed = self.pool.reclaim_unused();
        self.metrics.slots_reclaimed += freed as u64;
        self.refresh_gauges();
        if freed > 0 {
            tracing::debug!(freed, live = self.pool.len(), "slots reclaimed");
        }
        freed
    }

    /// Unload every mesh.
    ///
    /// Outstanding handles become invalid exactly as with
    /// [`unload_mesh`](Self::unload_mesh). Slots are not reclaimed.
    pub fn clear(&mut self) {
        let mut unloaded = 0u64;
        for (_, mesh) in self.meshes.iter() {
            if let Some(slot) = self.pool.get(mesh.slot()) {
                slot.clear_data();
            }
            unloaded += 1;
        }
        self.meshes.clear();
        self.cells.reset();
        self.grid.clear();
        self.guids.clear();
        self.generation = None;

        self.metrics.meshes_unloaded += unloaded;
        self.refresh_gauges();
        tracing::debug!(meshes = unloaded, "manager cleared");
    }

    fn refresh_gauges(&mut self) {
        self.metrics.resident_meshes = self.meshes.len() as u32;
        self.metrics.resident_cells = self.cells.live_len() as u32;
        self.metrics.live_slots = self.pool.len() as u32;
        self.metrics.arena_segments = self.cells.segment_count() as u32;
        self.metrics.arena_retired_ranges = self.cells.retired_range_count() as u32;
    }

    // ── Queries ─────────────────────────────────────────────────

    /// The loaded cell at grid position `pos`, or an invalid handle.
    pub fn cell_at(&self, pos: CellPos) -> CellHandle {
        let Some(entry) = self.grid.get(pos) else {
            return CellHandle::default();
        };
        match self.pool.get(entry.slot) {
            Some(slot) => MeshHandle::from_slot(Arc::clone(slot)).into_cell(entry.cell),
            None => CellHandle::default(),
        }
    }

    /// Grid position containing world point `(x, y)`.
    ///
    /// `None` while nothing is loaded, since the cell size is only known
    /// from the loaded meshes.
    pub fn cell_pos_at(&self, x: f32, y: f32) -> Option<CellPos> {
        let params = self.generation?;
        CellGrid::pos_at(x, y, params.cell_size)
    }

    /// A handle to every loaded mesh, in slab order.
    pub fn loaded_meshes(&self) -> impl Iterator<Item = MeshHandle> + '_ {
        self.meshes
            .iter()
            .filter_map(|(_, mesh)| self.pool.get(mesh.slot()))
            .map(|slot| MeshHandle::from_slot(Arc::clone(slot)))
    }

    /// The loaded mesh with `guid`, or an invalid handle.
    pub fn mesh_by_guid(&self, guid: MeshGuid) -> MeshHandle {
        self.guids
            .get(&guid)
            .and_then(|&id| self.pool.get(id))
            .map(|slot| MeshHandle::from_slot(Arc::clone(slot)))
            .unwrap_or_default()
    }

    /// Number of loaded meshes.
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Number of loaded cells.
    pub fn cell_count(&self) -> usize {
        self.grid.len()
    }

    /// Whether `blob` shares cell size and agent with the loaded set.
    /// Always true while nothing is loaded.
    pub fn is_compatible(&self, blob: &NavMeshBlob) -> bool {
        self.generation.is_none_or(|params| {
            params.cell_size == blob.cell_size && params.entity == blob.entity
        })
    }

    /// The loaded cell grid.
    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    /// The slot pool.
    pub fn pool(&self) -> &ReferencePool {
        &self.pool
    }

    /// Counters and gauges.
    pub fn metrics(&self) -> &StitchMetrics {
        &self.metrics
    }

    /// The active config.
    pub fn config(&self) -> &StitchConfig {
        &self.config
    }

    // ── Resolution ──────────────────────────────────────────────

    /// Slab index and wrapper `handle` names, if it is loaded in this
    /// manager.
    pub(crate) fn resolve_mesh(&self, handle: &MeshHandle) -> Option<(MeshIdx, &MeshWrapper)> {
        let slot = handle.slot()?;
        // A slot from another manager can share an id with one of ours.
        if !Arc::ptr_eq(slot, self.pool.get(slot.id())?) {
            return None;
        }
        let idx = slot.data()?;
        let mesh = self.meshes.get(idx)?;
        (mesh.slot() == slot.id()).then_some((idx, mesh))
    }

    fn mesh_index(&self, handle: &MeshHandle) -> Option<MeshIdx> {
        self.resolve_mesh(handle).map(|(idx, _)| idx)
    }

    /// Everything a cell handle reads, in one resolution.
    pub(crate) fn resolve_cell(&self, mesh: &MeshHandle, cell: CellIdx) -> Option<CellView<'_>> {
        let (_, wrapper) = self.resolve_mesh(mesh)?;
        let nav_cell = wrapper.blob().cell(cell)?;
        let state = self.cells.get(wrapper.cell_range(), cell.as_usize())?;
        Some(CellView {
            cell: nav_cell,
            state,
        })
    }

    /// The floor a link target lives on, if its mesh is still loaded.
    pub(crate) fn edge_floor(&self, edge: &EdgeRef) -> Option<&NavFloor> {
        let mesh = self.meshes.get(edge.mesh)?;
        if mesh.slot() != edge.slot {
            return None;
        }
        mesh.blob().cell(edge.cell)?.floor(edge.floor)
    }

    /// A handle to a link target. Invalid if its mesh is gone.
    pub(crate) fn edge_handle(&self, edge: &EdgeRef) -> HalfEdgeHandle {
        match self.pool.get(edge.slot) {
            Some(slot) => MeshHandle::from_slot(Arc::clone(slot))
                .into_cell(edge.cell)
                .into_floor(edge.floor)
                .into_half_edge(edge.half_edge),
            None => HalfEdgeHandle::default(),
        }
    }
}
