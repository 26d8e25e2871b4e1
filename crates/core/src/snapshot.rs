use serde::Serialize;

use crate::components::{Particle, Position, Shape};
use crate::world::World;
use crate::game_state::Stats;
use crate::types::{CellPos, BOARD_HEIGHT, BOARD_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActiveSnapshot {
    pub kind: &'static str,
    pub x: i8,
    pub y: i8,
    /// Absolute cells
    pub cells: [CellPos; 4],
    pub colors: [u8; 4],
}

impl ActiveSnapshot {
    pub fn new(x: i8, y: i8, shape: &Shape) -> Self {
        Self {
            kind: shape.kind.as_str(),
            x,
            y,
            cells: shape.cells_at(x, y),
            colors: shape.colors,
        }
    }
}

/// One live particle, in board units
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParticleSnapshot {
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub color: u8,
}

impl ParticleSnapshot {
    /// Every entity carrying both a particle and a position
    pub fn collect(world: &World) -> Vec<Self> {
        let mut out = Vec::with_capacity(world.count::<Particle>());
        world.for_each2::<Position, Particle>(|_, pos, particle| {
            out.push(Self {
                x: pos.x,
                y: pos.y,
                angle: particle.angle,
                color: particle.color,
            });
        });
        out
    }
}

/// Read-only view of a session, row 0 of `board` at the bottom
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub session_id: u32,
    pub board: [[Option<u8>; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
    pub active: Option<ActiveSnapshot>,
    pub next_tick: f64,
    pub chain: u32,
    pub stats: Stats,
    pub particles: Vec<ParticleSnapshot>,
}

impl GameSnapshot {
    pub fn occupied(&self) -> usize {
        self.board.iter().flatten().filter(|c| c.is_some()).count()
    }
}
