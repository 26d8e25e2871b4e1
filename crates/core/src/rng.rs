//! RNG module - 7-bag shape generation
//!
//! Implements the "7-bag" randomization algorithm: the bag holds one of each
//! shape, shuffled, and is consumed from the back. When it runs dry it is
//! refilled and reshuffled, so every run of seven draws between refills
//! contains each shape exactly once.
//!
//! Any [`rand::Rng`] can drive the bag. [`SimpleRng`] is a small LCG for
//! deterministic, seedable sessions.

use arrayvec::ArrayVec;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use crate::components::Shape;
use crate::shapes::catalog_shape;
use crate::types::{ShapeKind, ACCENT_CELLS, ACCENT_COLORS};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Current internal state (seed for an identical continuation)
    pub fn state(&self) -> u32 {
        self.state
    }

    fn step(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }
}

impl RngCore for SimpleRng {
    fn next_u32(&mut self) -> u32 {
        // Low bits of a power-of-two LCG cycle quickly; mix the high half down.
        let x = self.step();
        x ^ (x >> 16)
    }

    fn next_u64(&mut self) -> u64 {
        let hi = self.next_u32() as u64;
        let lo = self.next_u32() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// 7-bag shape generator
#[derive(Debug, Clone, Default)]
pub struct ShapeBag {
    /// Undrawn kinds; the next draw comes off the back
    bag: ArrayVec<ShapeKind, 7>,
}

impl ShapeBag {
    /// An empty bag; the first draw fills it
    pub fn new() -> Self {
        Self {
            bag: ArrayVec::new(),
        }
    }

    fn refill<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.bag.clear();
        self.bag.extend(ShapeKind::ALL);
        self.bag.shuffle(rng);
    }

    /// Pop the next kind, refilling and reshuffling first if the bag is empty
    pub fn draw_kind<R: Rng + ?Sized>(&mut self, rng: &mut R) -> ShapeKind {
        if self.bag.is_empty() {
            self.refill(rng);
        }
        match self.bag.pop() {
            Some(kind) => kind,
            None => unreachable!("bag was just refilled"),
        }
    }

    /// Draw the next shape and roll its two accent colours.
    ///
    /// Only cells 0 and 3 are coloured; the other two stay background.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Shape {
        let mut shape = catalog_shape(self.draw_kind(rng));
        for cell in ACCENT_CELLS {
            shape.colors[cell] = ACCENT_COLORS[rng.gen_range(0..ACCENT_COLORS.len())];
        }
        shape
    }

    /// Kind the next draw returns, if the current bag is not exhausted
    pub fn peek(&self) -> Option<ShapeKind> {
        self.bag.last().copied()
    }

    /// Undrawn kinds of the current bag, last element drawn first
    pub fn remaining(&self) -> &[ShapeKind] {
        &self.bag
    }

    pub fn clear(&mut self) {
        self.bag.clear();
    }
}
