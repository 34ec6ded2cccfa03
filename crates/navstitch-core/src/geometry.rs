//! Minimal geometry: points, boxes, cell positions, and directions.
//!
//! The mesh runtime never does real geometric queries; these types only
//! carry positions through the blob model and provide the exact-match
//! keys the stitcher needs to pair boundary edges.

use std::fmt;

/// A point on the ground plane.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl Vec2 {
    /// Construct a point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A navmesh vertex: ground-plane position plus altitude in `z`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
    /// Altitude.
    pub z: f32,
}

impl Vec3 {
    /// Construct a vertex.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Drop the altitude.
    pub fn xy(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Bit pattern of the ground-plane position, with `-0.0` folded
    /// into `0.0` so that both spellings of zero produce the same key.
    pub fn planar_bits(self) -> [u32; 2] {
        [canonical_bits(self.x), canonical_bits(self.y)]
    }
}

fn canonical_bits(v: f32) -> u32 {
    if v == 0.0 {
        0.0f32.to_bits()
    } else {
        v.to_bits()
    }
}

/// Axis-aligned rectangle on the ground plane.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Box2f {
    /// Minimum corner.
    pub min: Vec2,
    /// Maximum corner.
    pub max: Vec2,
}

impl Box2f {
    /// Construct a box from its corners.
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// The side of this box that `p` lies exactly on, if any.
    ///
    /// West and east are tested before south and north, so a corner
    /// reports its vertical side.
    pub fn boundary_dir(&self, p: Vec2) -> Option<CardinalDir> {
        if p.x == self.min.x {
            Some(CardinalDir::West)
        } else if p.x == self.max.x {
            Some(CardinalDir::East)
        } else if p.y == self.min.y {
            Some(CardinalDir::South)
        } else if p.y == self.max.y {
            Some(CardinalDir::North)
        } else {
            None
        }
    }

    /// Whether the segment `a → b` lies entirely on side `dir`.
    pub fn segment_on_side(&self, a: Vec2, b: Vec2, dir: CardinalDir) -> bool {
        match dir {
            CardinalDir::East => a.x == self.max.x && b.x == self.max.x,
            CardinalDir::West => a.x == self.min.x && b.x == self.min.x,
            CardinalDir::North => a.y == self.max.y && b.y == self.max.y,
            CardinalDir::South => a.y == self.min.y && b.y == self.min.y,
        }
    }
}

/// Position of a cell in the global cell grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellPos {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl CellPos {
    /// Construct a cell position.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The adjacent position across side `dir`.
    ///
    /// Saturates at the edges of the `i32` range rather than wrapping.
    pub fn neighbour(self, dir: CardinalDir) -> Self {
        let (dx, dy) = dir.offset();
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

impl fmt::Display for CellPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four sides of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CardinalDir {
    /// +X.
    East = 0,
    /// +Y.
    North = 1,
    /// -X.
    West = 2,
    /// -Y.
    South = 3,
}

impl CardinalDir {
    /// All four directions in index order.
    pub const ALL: [CardinalDir; 4] = [
        CardinalDir::East,
        CardinalDir::North,
        CardinalDir::West,
        CardinalDir::South,
    ];

    /// Array index of this direction (`0..4`).
    pub fn index(self) -> usize {
        self as usize
    }

    /// The direction facing back across the same side.
    pub fn opposite(self) -> Self {
        Self::ALL[(self.index() + 2) % 4]
    }

    /// Grid step `(dx, dy)` towards the neighbour on this side.
    pub fn offset(self) -> (i32, i32) {
        match self {
            CardinalDir::East => (1, 0),
            CardinalDir::North => (0, 1),
            CardinalDir::West => (-1, 0),
            CardinalDir::South => (0, -1),
        }
    }
}

impl fmt::Display for CardinalDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CardinalDir::East => "east",
            CardinalDir::North => "north",
            CardinalDir::West => "west",
            CardinalDir::South => "south",
        };
        f.write_str(name)
    }
}
