//! Blockfall (workspace facade crate).
//!
//! Re-exports the workspace crates under one roof as
//! `blockfall::{core, input, types}`. The implementation lives in the
//! dedicated crates under `crates/`; this crate adds the headless simulation
//! driver used by the `blockfall-sim` binary.

pub use blockfall_core as core;
pub use blockfall_input as input;
pub use blockfall_types as types;

pub mod config;
pub mod sim;
