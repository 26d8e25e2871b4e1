//! Input module (host-facing).
//!
//! Turns raw key state into the per-tick [`InputFrame`](crate::types::InputFrame)
//! the board core consumes. It keys off held/not-held transitions only, so it
//! works with terminals and windowing layers alike.

pub mod map;
pub mod table;

pub use blockfall_types as types;

pub use map::{map_key, should_quit, Control};
pub use table::InputTable;
