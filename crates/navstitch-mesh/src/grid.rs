//! The global cell grid: which loaded cell occupies each position.

use indexmap::IndexMap;

use navstitch_arena::{MeshIdx, SlotId};
use navstitch_core::{CellIdx, CellPos};

/// A loaded cell as seen from the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridEntry {
    /// Slot of the owning mesh.
    pub slot: SlotId,
    /// Slab index of the owning mesh.
    pub mesh: MeshIdx,
    /// Cell within the owning mesh.
    pub cell: CellIdx,
}

/// Position → loaded-cell map.
///
/// At most one cell may occupy a position; the manager rejects loads
/// that would overlap.
#[derive(Clone, Debug, Default)]
pub struct CellGrid {
    cells: IndexMap<CellPos, GridEntry>,
}

impl CellGrid {
    /// An empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cell at `pos`.
    pub fn get(&self, pos: CellPos) -> Option<GridEntry> {
        self.cells.get(&pos).copied()
    }

    /// Whether a cell occupies `pos`.
    pub fn contains(&self, pos: CellPos) -> bool {
        self.cells.contains_key(&pos)
    }

    /// First of `positions` that is already occupied.
    pub fn first_overlap(&self, positions: impl IntoIterator<Item = CellPos>) -> Option<CellPos> {
        positions.into_iter().find(|&p| self.contains(p))
    }

    pub(crate) fn insert(&mut self, pos: CellPos, entry: GridEntry) -> Option<GridEntry> {
        self.cells.insert(pos, entry)
    }

    pub(crate) fn remove(&mut self, pos: CellPos) -> Option<GridEntry> {
        self.cells.swap_remove(&pos)
    }

    pub(crate) fn clear(&mut self) {
        self.cells.clear();
    }

    /// Number of occupied positions.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell is loaded.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Occupied positions and their cells.
    pub fn iter(&self) -> impl Iterator<Item = (CellPos, GridEntry)> + '_ {
        self.cells.iter().map(|(&p, &e)| (p, e))
    }

    /// Grid position containing world point `(x, y)` for cells of side
    /// `cell_size`.
    ///
    /// Points on a shared side belong to the cell above or to the right.
    /// Returns `None` for non-finite input or positions outside `i32`.
    pub fn pos_at(x: f32, y: f32, cell_size: f32) -> Option<CellPos> {
        let cx = (x / cell_size).floor();
        let cy = (y / cell_size).floor();
        let range = i32::MIN as f32..i32::MAX as f32;
        if !range.contains(&cx) || !range.contains(&cy) {
            return None;
        }
        Some(CellPos::new(cx as i32, cy as i32))
    }
}
