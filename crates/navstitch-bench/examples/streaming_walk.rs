//! Streaming window walk example.
//!
//! Demonstrates: tile world → load the window around a moving focus →
//! stitch on load → walk east across seams through handles → unload the
//! tiles left behind → reclaim slots → repeat.
//!
//! Run with `RUST_LOG=debug` to see every load, unload and stitch.

use std::collections::BTreeSet;

use navstitch_bench::{reference_profile, ring_around, tile_key, tile_world};
use navstitch_core::{CardinalDir, CellPos, TerrainTypeMask};
use navstitch_mesh::{CellHandle, MeshHandle, StitchManager};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Step east from `cell` through its first crossable boundary edge.
fn step_east(nav: &StitchManager, cell: &CellHandle) -> Option<CellHandle> {
    cell.boundary_half_edges(nav, CardinalDir::East)
        .into_iter()
        .map(|he| he.crossable_pair(nav, TerrainTypeMask::ALL))
        .find(|pair| pair.is_valid(nav))
        .map(|pair| pair.floor().cell().clone())
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();

    let profile = reference_profile();
    let source = tile_world(&profile);
    let mut nav = StitchManager::new(profile.config().with_auto_stitch(true)).unwrap();
    let mut resident: Vec<((i32, i32), MeshHandle)> = Vec::new();

    let row = profile.tile_cells + 1;
    let mut walker = CellPos::new(0, row);
    let mut cells_walked = 0usize;
    let mut kept = MeshHandle::default();

    for focus in 0..profile.tiles {
        let wanted: BTreeSet<(i32, i32)> = ring_around(&profile, focus, 1, 1).into_iter().collect();

        // Unload first so the window never exceeds its footprint.
        resident.retain(|(tile, mesh)| {
            if wanted.contains(tile) {
                return true;
            }
            nav.unload_mesh(mesh);
            false
        });
        let reclaimed = nav.reclaim_unused();

        for &(tx, ty) in &wanted {
            if resident.iter().any(|(tile, _)| *tile == (tx, ty)) {
                continue;
            }
            let mesh = nav.load_from(&source, &tile_key(tx, ty)).unwrap();
            if kept.slot_id().is_none() {
                kept = mesh.clone();
            }
            resident.push(((tx, ty), mesh));
        }

        // Walk east until the loaded world runs out.
        let mut cell = nav.cell_at(walker);
        while let Some(next) = step_east(&nav, &cell) {
            cell = next;
            cells_walked += 1;
        }
        if let Some(pos) = cell.pos(&nav) {
            walker = pos;
        }

        let m = nav.metrics();
        info!(
            focus,
            meshes = m.resident_meshes,
            cells = m.resident_cells,
            links = m.links_created,
            broken = m.links_broken,
            reclaimed,
            walker_x = walker.x,
            "window moved"
        );
    }

    // A handle kept past its mesh's unload stays safe to query.
    info!(
        guid = ?kept.guid(&nav),
        valid = kept.is_valid(&nav),
        holders = kept.holder_count(),
        "first tile handle after the walk"
    );

    drop((resident, kept));
    nav.clear();
    let reclaimed = nav.reclaim_unused();
    let m = nav.metrics();
    info!(
        cells_walked,
        loaded = m.meshes_loaded,
        unloaded = m.meshes_unloaded,
        reclaimed,
        "done"
    );
}
