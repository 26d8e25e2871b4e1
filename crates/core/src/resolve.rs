//! Resolution engine - line clears, colour-group clears and compaction
//!
//! One [`resolve`] call is one pass:
//!
//! 1. **Rows**: scan top-down (row 21 to 0). Every full row is shattered and
//!    the rows above drop by one. If any row cleared, the pass ends here.
//! 2. **Groups**: only when no row cleared. Cells are joined with their
//!    upper and right neighbours when both share a non-background colour;
//!    every cell whose group has at least [`GROUP_CLEAR_THRESHOLD`] members is
//!    shattered and its column drops by one. Columns are scanned top-down so
//!    each examined cell still holds the block the groups were built from.
//!
//! Callers repeat passes until one clears nothing (a chain). The session does
//! one pass per timer step; [`resolve_until_stable`] runs the whole chain at once.

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::particles::shatter_block;
use crate::types::{
    BoardEvent, EventSink, BACKGROUND_COLOR, BOARD_HEIGHT, BOARD_WIDTH, GROUP_CLEAR_THRESHOLD,
};
use crate::union_find::DisjointSet;
use crate::world::World;

const WIDTH: usize = BOARD_WIDTH as usize;
const HEIGHT: usize = BOARD_HEIGHT as usize;

/// Outcome of a single resolution pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Rows cleared this pass, in the order found (top-down)
    pub rows: ArrayVec<u8, HEIGHT>,
    /// Blocks destroyed this pass
    pub blocks: u32,
}

impl Resolution {
    pub fn cleared(&self) -> bool {
        self.blocks > 0
    }
}

/// Run one resolution pass. Row clears take priority over group clears.
pub fn resolve(board: &mut Board, world: &mut World, sink: &mut impl EventSink) -> Resolution {
    let rows = clear_full_rows(board, world);
    if !rows.is_empty() {
        let blocks = rows.len() as u32 * BOARD_WIDTH as u32;
        log::trace!("row pass cleared rows {:?}", rows.as_slice());
        sink.emit(BoardEvent::RowsCleared {
            rows: rows.to_vec(),
            blocks,
        });
        return Resolution { rows, blocks };
    }

    let blocks = clear_color_groups(board, world);
    if blocks > 0 {
        log::trace!("group pass cleared {blocks} blocks");
        sink.emit(BoardEvent::GroupsCleared { blocks });
    }
    Resolution { rows, blocks }
}

/// Resolve until a pass clears nothing. Returns the number of clearing passes.
///
/// Every clearing pass removes at least one block, so this terminates within
/// the board's occupied-cell count.
pub fn resolve_until_stable(board: &mut Board, world: &mut World, sink: &mut impl EventSink) -> u32 {
    let budget = board.occupied_count() as u32;
    let mut passes = 0;
    while resolve(board, world, sink).cleared() {
        passes += 1;
        debug_assert!(passes <= budget, "resolution chain outlived the blocks on the board");
    }
    sink.emit(BoardEvent::Settled { chain: passes });
    passes
}

/// Shatter and collapse every full row, scanning from the top.
///
/// Returns the row indices as they were found.
pub fn clear_full_rows(board: &mut Board, world: &mut World) -> ArrayVec<u8, HEIGHT> {
    let mut cleared = ArrayVec::new();
    for y in (0..HEIGHT).rev() {
        if !board.is_row_full(y) {
            continue;
        }
        for x in 0..BOARD_WIDTH as i8 {
            shatter_block(board, world, x, y as i8);
        }
        // Rows above were already scanned, so continuing at y - 1 is safe.
        board.collapse_row(world, y);
        cleared.push(y as u8);
    }
    cleared
}

/// Join every non-background cell with same-coloured upper and right neighbours
pub fn find_color_groups(board: &Board, world: &World) -> DisjointSet {
    let mut groups = DisjointSet::new();
    for y in 0..HEIGHT as i8 {
        for x in 0..WIDTH as i8 {
            let Some(color) = board.color_at(world, x, y) else {
                continue;
            };
            if color == BACKGROUND_COLOR {
                continue;
            }
            let here = y as usize * WIDTH + x as usize;
            if board.color_at(world, x, y + 1) == Some(color) {
                groups.union(here, here + WIDTH);
            }
            if board.color_at(world, x + 1, y) == Some(color) {
                groups.union(here, here + 1);
            }
        }
    }
    groups
}

/// Shatter every cell in a large enough same-colour group, collapsing each
/// column as its cells go. Returns the number of blocks destroyed.
pub fn clear_color_groups(board: &mut Board, world: &mut World) -> u32 {
    let mut groups = find_color_groups(board, world);
    let mut cleared = 0;

    for x in 0..WIDTH {
        for y in (0..HEIGHT).rev() {
            let Some(color) = board.color_at(world, x as i8, y as i8) else {
                continue;
            };
            if color == BACKGROUND_COLOR {
                continue;
            }
            if (groups.size_of(y * WIDTH + x) as u32) < GROUP_CLEAR_THRESHOLD {
                continue;
            }
            shatter_block(board, world, x as i8, y as i8);
            board.collapse_cell(world, x, y);
            cleared += 1;
        }
    }
    cleared
}
