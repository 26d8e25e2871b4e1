//! Clear side-effects: particle bursts for destroyed blocks.
//!
//! The board core only requests particles. [`step_particles`] is a helper for
//! hosts that want the debris to move and eventually disappear; the core
//! never tracks particle lifetime itself.

use crate::board::Board;
use crate::components::{Block, Particle, Position, Velocity};
use crate::types::{PARTICLES_PER_BLOCK, PARTICLE_CULL_Y};
use crate::world::World;

/// Downward-biased acceleration applied to every particle
pub const PARTICLE_ACCEL: (f32, f32) = (0.0, -20.0);

/// Spin rate in radians per second
pub const PARTICLE_SPIN: f32 = 8.0;

/// Initial velocities of one burst, a small upward fan
const BURST_VELOCITIES: [(f32, f32); PARTICLES_PER_BLOCK] =
    [(-3.0, 6.0), (-1.0, 8.0), (1.0, 8.0), (3.0, 6.0)];

/// Spawn one burst of particles at (x, y) in `color`
pub fn emit_burst(world: &mut World, x: f32, y: f32, color: u8) {
    for (vx, vy) in BURST_VELOCITIES {
        let particle = world.create();
        world.add(particle, Position { x, y });
        world.add(particle, Velocity { vx, vy });
        world.add(
            particle,
            Particle {
                ax: PARTICLE_ACCEL.0,
                ay: PARTICLE_ACCEL.1,
                angle: 0.0,
                spin: PARTICLE_SPIN,
                color,
            },
        );
    }
}

/// Destroy the block in cell (x, y), replacing it with a particle burst.
///
/// Leaves the cell empty; compaction is up to the caller. Returns false if
/// the cell was already empty.
pub(crate) fn shatter_block(board: &mut Board, world: &mut World, x: i8, y: i8) -> bool {
    let Some(Some(entity)) = board.get(x, y) else {
        return false;
    };
    let block = world.get::<Block>(entity).copied();
    debug_assert!(block.is_some(), "grid cell ({x}, {y}) references a dead block");

    if let Some(block) = block {
        let pos = world.get::<Position>(entity).copied();
        debug_assert!(pos.is_some(), "block at ({x}, {y}) has no position");
        let pos = pos.unwrap_or(Position::at_cell(x, y));
        emit_burst(world, pos.x, pos.y, block.color);
    }
    world.destroy(entity);
    board.set(x, y, None);
    true
}

/// Advance every particle by `dt` seconds and destroy the ones that fell out of view.
///
/// Returns the number of particles destroyed.
pub fn step_particles(world: &mut World, dt: f32) -> usize {
    world.for_each3_mut::<Particle, Velocity, Position>(|_, particle, vel, pos| {
        particle.angle += particle.spin * dt;
        vel.vx += particle.ax * dt;
        vel.vy += particle.ay * dt;
        pos.x += vel.vx * dt;
        pos.y += vel.vy * dt;
    });

    let mut destroyed = 0;
    for index in 0..world.slot_count() {
        let Some(entity) = world.entity_at(index) else {
            continue;
        };
        let fallen = world.has::<Particle>(entity)
            && world
                .get::<Position>(entity)
                .is_some_and(|pos| pos.y < PARTICLE_CULL_Y);
        if fallen && world.destroy(entity) {
            destroyed += 1;
        }
    }
    destroyed
}
