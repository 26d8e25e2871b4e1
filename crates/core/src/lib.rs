//! Board core - pure, deterministic, and testable
//!
//! This crate contains the falling-block simulation: the piece state machine
//! and the post-lock resolution algorithm. It has **zero dependencies** on
//! rendering, audio or windowing, making it:
//!
//! - **Deterministic**: the same seed deals the same pieces and colours
//! - **Testable**: every rule is exercised by unit and integration tests
//! - **Single-threaded**: one mutator, advanced once per frame by the host
//!
//! # Module Structure
//!
//! - [`world`]: generational entity store with one column per component
//! - [`components`]: position, velocity, shape, block and particle records
//! - [`shapes`]: the seven shapes and pivot rotation (no wall kicks)
//! - [`rng`]: 7-bag generation with two randomized accent cells per shape
//! - [`board`]: 10x22 grid of block references plus the step timer
//! - [`union_find`]: fixed-size disjoint sets for colour grouping
//! - [`resolve`]: row clears, colour-group clears, compaction and chains
//! - [`particles`]: the particle bursts that replace cleared blocks
//! - [`game_state`]: session lifecycle and the per-tick piece controller
//!
//! # Game Rules
//!
//! - **Gravity**: one step every 0.25s; holding down doubles the timer rate
//! - **Lock**: a piece with anything directly under any cell locks on the next step
//! - **Row clear**: full rows clear first and skip group clearing for that pass
//! - **Group clear**: 3+ connected cells of the same non-background colour clear
//! - **Chains**: resolution repeats on each step until nothing clears, then the next piece spawns
//!
//! # Example
//!
//! ```
//! use blockfall_core::GameState;
//! use blockfall_types::InputFrame;
//!
//! let mut game = GameState::new(12345);
//! game.start();
//!
//! let left = InputFrame { left_pressed: true, ..InputFrame::NONE };
//! game.tick(1.0 / 60.0, &left);
//! for _ in 0..600 {
//!     game.tick(1.0 / 60.0, &InputFrame::NONE);
//! }
//!
//! assert!(game.stats().pieces > 1);
//! ```

pub mod board;
pub mod components;
pub mod game_state;
pub mod particles;
pub mod resolve;
pub mod rng;
pub mod shapes;
pub mod snapshot;
pub mod union_find;
pub mod world;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, Cell};
pub use game_state::{GameState, Stats};
pub use particles::step_particles;
pub use resolve::{resolve, resolve_until_stable, Resolution};
pub use rng::{ShapeBag, SimpleRng};
pub use shapes::{catalog_shape, rotated};
pub use snapshot::{ActiveSnapshot, GameSnapshot, ParticleSnapshot};
pub use union_find::DisjointSet;
pub use world::{Component, Entity, World};
