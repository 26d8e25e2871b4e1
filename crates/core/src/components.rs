//! Component records attached to entities in the [`World`](crate::world::World).
//!
//! Board coordinates are stored as floats (renderers interpolate them) but
//! pieces and blocks always sit on integer cells.

use crate::types::{CellPos, ShapeKind, BACKGROUND_COLOR};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn at_cell(x: i8, y: i8) -> Self {
        Self {
            x: x as f32,
            y: y as f32,
        }
    }

    /// Nearest board cell
    pub fn cell(&self) -> CellPos {
        (self.x.round() as i8, self.y.round() as i8)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity {
    pub vx: f32,
    pub vy: f32,
}

/// Four cell offsets relative to the piece origin, their colours, and the
/// rotation pivot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shape {
    pub kind: ShapeKind,
    pub cells: [CellPos; 4],
    pub colors: [u8; 4],
    pub pivot: (f32, f32),
}

impl Shape {
    pub const fn new(kind: ShapeKind, cells: [CellPos; 4], pivot: (f32, f32)) -> Self {
        Self {
            kind,
            cells,
            colors: [BACKGROUND_COLOR; 4],
            pivot,
        }
    }

    /// Absolute cells for a piece whose origin sits at `(x, y)`
    pub fn cells_at(&self, x: i8, y: i8) -> [CellPos; 4] {
        self.cells.map(|(dx, dy)| (x + dx, y + dy))
    }
}

/// A locked, single-cell occupant of the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub color: u8,
}

/// Decorative debris spawned when a block is cleared
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub ax: f32,
    pub ay: f32,
    /// Current spin angle (radians)
    pub angle: f32,
    /// Spin rate (radians per second)
    pub spin: f32,
    pub color: u8,
}
