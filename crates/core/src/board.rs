//! Board module - the 10x22 grid of block references
//!
//! Each cell is empty or holds the handle of the Block entity occupying it.
//! Uses a flat array in row-major order (`y * WIDTH + x`) with row 0 at the
//! bottom. Every operation that moves a handle also moves the Block's
//! `Position`, so a referenced block always sits on its cell.

use crate::components::{Block, Position};
use crate::shapes::catalog_shape;
use crate::types::{ShapeKind, BOARD_CELLS, BOARD_HEIGHT, BOARD_WIDTH, SPAWN_X, SPAWN_Y};
use crate::world::{Entity, World};

/// A grid cell: the occupying block, if any
pub type Cell = Option<Entity>;

const WIDTH: usize = BOARD_WIDTH as usize;
const HEIGHT: usize = BOARD_HEIGHT as usize;

/// Grid, active piece reference and the gravity countdown
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_CELLS],
    /// The falling piece entity, if one is in play
    pub active: Option<Entity>,
    /// Seconds until the next gravity / resolution step
    pub next_tick: f64,
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_CELLS],
            active: None,
            next_tick: 0.0,
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    pub fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * WIDTH + (x as usize))
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    pub fn is_in_bounds(&self, x: i8, y: i8) -> bool {
        Self::index(x, y).is_some()
    }

    /// Check if position is within bounds and empty
    pub fn is_open(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    /// Check if position is within bounds and filled
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= HEIGHT {
            return false;
        }
        let start = y * WIDTH;
        self.cells[start..start + WIDTH].iter().all(Option::is_some)
    }

    /// Colour of the block at (x, y), if any
    pub fn color_at(&self, world: &World, x: i8, y: i8) -> Option<u8> {
        let entity = self.get(x, y)??;
        let block = world.get::<Block>(entity);
        debug_assert!(block.is_some(), "grid cell ({x}, {y}) references a dead block");
        block.map(|b| b.color)
    }

    /// Create a Block entity at (x, y) and reference it from the grid.
    ///
    /// A block already in that cell is destroyed first so no entity is left
    /// orphaned. Returns None if (x, y) is out of bounds.
    pub fn place_block(&mut self, world: &mut World, x: i8, y: i8, color: u8) -> Option<Entity> {
        let idx = Self::index(x, y)?;
        if let Some(old) = self.cells[idx].take() {
            log::warn!("block placed over occupied cell ({x}, {y})");
            world.destroy(old);
        }
        let entity = world.create();
        world.add(entity, Position::at_cell(x, y));
        world.add(entity, Block { color });
        self.cells[idx] = Some(entity);
        Some(entity)
    }

    /// Remove row `y` and shift every row above it down by one.
    ///
    /// The caller is responsible for destroying the blocks in row `y` first.
    /// The top row is left empty.
    pub fn collapse_row(&mut self, world: &mut World, y: usize) {
        if y >= HEIGHT {
            return;
        }

        // copy_within handles the overlapping ranges
        let src = (y + 1) * WIDTH;
        self.cells.copy_within(src..BOARD_CELLS, y * WIDTH);
        for cell in &mut self.cells[(HEIGHT - 1) * WIDTH..] {
            *cell = None;
        }

        for row in y..HEIGHT - 1 {
            for x in 0..WIDTH {
                if let Some(entity) = self.cells[row * WIDTH + x] {
                    sync_position(world, entity, x, row);
                }
            }
        }
    }

    /// Remove cell (x, y) and shift the cells above it in that column down by one.
    ///
    /// The caller is responsible for destroying the block in (x, y) first.
    pub fn collapse_cell(&mut self, world: &mut World, x: usize, y: usize) {
        if x >= WIDTH || y >= HEIGHT {
            return;
        }
        for row in y..HEIGHT - 1 {
            let moved = self.cells[(row + 1) * WIDTH + x];
            self.cells[row * WIDTH + x] = moved;
            if let Some(entity) = moved {
                sync_position(world, entity, x, row);
            }
        }
        self.cells[(HEIGHT - 1) * WIDTH + x] = None;
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Whether any cell a freshly spawned shape could cover is occupied
    pub fn is_spawn_blocked(&self) -> bool {
        ShapeKind::ALL.iter().any(|&kind| {
            catalog_shape(kind)
                .cells_at(SPAWN_X, SPAWN_Y)
                .iter()
                .any(|&(x, y)| self.is_occupied(x, y))
        })
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Forget every reference and reset the timer. Entities are not touched.
    pub fn clear(&mut self) {
        self.cells = [None; BOARD_CELLS];
        self.active = None;
        self.next_tick = 0.0;
    }

    /// Colour grid for display, top row first (`.` empty, digit = colour)
    pub fn to_ascii(&self, world: &World) -> String {
        let mut out = String::with_capacity(BOARD_CELLS + HEIGHT);
        for y in (0..BOARD_HEIGHT as i8).rev() {
            for x in 0..BOARD_WIDTH as i8 {
                match self.color_at(world, x, y) {
                    Some(color) => out.push(char::from_digit(color as u32 % 36, 36).unwrap_or('#')),
                    None => out.push('.'),
                }
            }
            out.push('\n');
        }
        out
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

fn sync_position(world: &mut World, entity: Entity, x: usize, y: usize) {
    let pos = world.get_mut::<Position>(entity);
    debug_assert!(pos.is_some(), "grid references a block without a position");
    if let Some(pos) = pos {
        *pos = Position::at_cell(x as i8, y as i8);
    }
}
