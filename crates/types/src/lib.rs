//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data with no external dependencies, making them usable
//! from the board core, the input layer and any host (renderer, simulator).
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9, left to right)
//! - **Height**: 22 rows (indexed 0-21, row 0 is the bottom)
//! - **Spawn origin**: (4, 18) so the tallest shape fits in rows 18..=21
//!
//! # Rule Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_INTERVAL_SECS` | 0.25 | Gravity / resolution step period |
//! | `GROUP_CLEAR_THRESHOLD` | 3 | Minimum same-colour group size that clears |
//! | `BACKGROUND_COLOR` | 0 | Colour that never groups |
//! | `ACCENT_COLORS` | [1, 2] | Palette rolled for the two accent cells |
//! | `PARTICLES_PER_BLOCK` | 4 | Particles requested per cleared block |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{ShapeKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! assert_eq!(ShapeKind::from_str("t"), Some(ShapeKind::T));
//! assert_eq!(ShapeKind::ALL.len(), 7);
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 22);
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (22 rows)
pub const BOARD_HEIGHT: u8 = 22;

/// Total number of grid cells
pub const BOARD_CELLS: usize = BOARD_WIDTH as usize * BOARD_HEIGHT as usize;

/// Seconds between gravity (or resolution) steps
pub const TICK_INTERVAL_SECS: f64 = 0.25;

/// Connected same-colour cells needed for a group clear
pub const GROUP_CLEAR_THRESHOLD: u32 = 3;

/// Neutral colour index; never takes part in group clears
pub const BACKGROUND_COLOR: u8 = 0;

/// Palette for the two randomized accent cells of every drawn shape
pub const ACCENT_COLORS: [u8; 2] = [1, 2];

/// Shape cell indices that receive an accent colour when drawn from the bag
pub const ACCENT_CELLS: [usize; 2] = [0, 3];

/// Particles requested for every destroyed block
pub const PARTICLES_PER_BLOCK: usize = 4;

/// Particles below this height are culled by the particle step
pub const PARTICLE_CULL_Y: f32 = -8.0;

/// Spawn origin column
pub const SPAWN_X: i8 = 4;

/// Spawn origin row
pub const SPAWN_Y: i8 = 18;

/// The seven canonical tetromino shapes, in catalog order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    O,
    I,
    T,
    J,
    L,
    S,
    Z,
}

impl ShapeKind {
    /// Every kind, in catalog order
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::O,
        ShapeKind::I,
        ShapeKind::T,
        ShapeKind::J,
        ShapeKind::L,
        ShapeKind::S,
        ShapeKind::Z,
    ];

    /// Parse shape kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::from_str("i"), Some(ShapeKind::I));
    /// assert_eq!(ShapeKind::from_str("Z"), Some(ShapeKind::Z));
    /// assert_eq!(ShapeKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "o" => Some(ShapeKind::O),
            "i" => Some(ShapeKind::I),
            "t" => Some(ShapeKind::T),
            "j" => Some(ShapeKind::J),
            "l" => Some(ShapeKind::L),
            "s" => Some(ShapeKind::S),
            "z" => Some(ShapeKind::Z),
            _ => None,
        }
    }

    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::O => "o",
            ShapeKind::I => "i",
            ShapeKind::T => "t",
            ShapeKind::J => "j",
            ShapeKind::L => "l",
            ShapeKind::S => "s",
            ShapeKind::Z => "z",
        }
    }
}

/// Edge-triggered input sampled once per tick.
///
/// Produced by an input layer that already knows the press/held/release
/// history; the board core only reads it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputFrame {
    pub left_pressed: bool,
    pub right_pressed: bool,
    /// Rotate request
    pub up_pressed: bool,
    /// Soft drop (held state, not an edge)
    pub down_held: bool,
    /// Only meaningful to hosts; the board core ignores it.
    pub restart_pressed: bool,
}

impl InputFrame {
    pub const NONE: InputFrame = InputFrame {
        left_pressed: false,
        right_pressed: false,
        up_pressed: false,
        down_held: false,
        restart_pressed: false,
    };
}

/// Board cell coordinate, row 0 at the bottom
pub type CellPos = (i8, i8);

/// One-way notifications emitted by the board core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    /// A new active piece entered the board
    Spawned { kind: ShapeKind },
    /// The active piece became blocks at these cells
    Locked { cells: [CellPos; 4] },
    /// Full rows removed by one resolution pass (row indices as found, top-down)
    RowsCleared { rows: Vec<u8>, blocks: u32 },
    /// Same-colour groups removed by one resolution pass
    GroupsCleared { blocks: u32 },
    /// Resolution found nothing more to clear; `chain` clearing passes preceded it
    Settled { chain: u32 },
}

/// Receiver for [`BoardEvent`]s.
///
/// Injected wherever the core would otherwise call back into host logic.
pub trait EventSink {
    fn emit(&mut self, event: BoardEvent);
}

impl EventSink for Vec<BoardEvent> {
    fn emit(&mut self, event: BoardEvent) {
        self.push(event);
    }
}

/// Discards every event
impl EventSink for () {
    fn emit(&mut self, _event: BoardEvent) {}
}

/// Adapts a closure into an [`EventSink`]
pub struct FnSink<F>(pub F);

impl<F: FnMut(BoardEvent)> EventSink for FnSink<F> {
    fn emit(&mut self, event: BoardEvent) {
        (self.0)(event)
    }
}
