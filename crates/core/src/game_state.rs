//! Game state module - one play session and its piece controller
//!
//! Ties together the entity store, the board, the shape bag and the
//! resolution engine. [`GameState::tick`] is the only entry point a host needs
//! to call each frame:
//!
//! 1. apply edge-triggered moves and rotation to the active piece;
//! 2. count the step timer down (twice as fast while down is held);
//! 3. when the timer expires, either drop/lock the active piece or, with no
//!    piece in play, run one resolution pass and spawn once the board is stable.

use rand::RngCore;
use serde::Serialize;

use crate::board::Board;
use crate::components::{Position, Shape};
use crate::resolve::resolve;
use crate::rng::{ShapeBag, SimpleRng};
use crate::shapes::try_rotate;
use crate::snapshot::{ActiveSnapshot, GameSnapshot, ParticleSnapshot};
use crate::types::*;
use crate::world::{Entity, World};

/// Running totals for a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// Blocks cleared, each weighted by its chain step
    pub score: u64,
    /// Full rows cleared
    pub lines: u32,
    pub blocks_cleared: u32,
    pub pieces: u32,
    /// Longest chain of clearing passes after a single lock
    pub max_chain: u32,
}

/// Complete state of one session
#[derive(Debug, Clone)]
pub struct GameState<R = SimpleRng> {
    world: World,
    board: Board,
    bag: ShapeBag,
    rng: R,
    /// Pending notifications for the host
    events: Vec<BoardEvent>,
    stats: Stats,
    /// Clearing passes since the last lock
    chain: u32,
    /// Increments on restart
    session_id: u32,
    started: bool,
}

impl GameState<SimpleRng> {
    /// Create a new session with a deterministic RNG
    pub fn new(seed: u32) -> Self {
        Self::with_rng(SimpleRng::new(seed))
    }
}

impl<R: RngCore> GameState<R> {
    /// Create a new session driven by any random generator
    pub fn with_rng(rng: R) -> Self {
        Self {
            world: World::new(),
            board: Board::new(),
            bag: ShapeBag::new(),
            rng,
            events: Vec::new(),
            stats: Stats::default(),
            chain: 0,
            session_id: 0,
            started: false,
        }
    }

    /// Start the session and spawn the first piece
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.spawn_piece();
    }

    /// Tear everything down and start a fresh session.
    ///
    /// The RNG stream continues, so a restarted session deals new pieces.
    pub fn restart(&mut self) {
        log::info!(
            "restarting session {} (score {}, lines {})",
            self.session_id,
            self.stats.score,
            self.stats.lines
        );
        self.world.clear();
        self.board.clear();
        self.bag.clear();
        self.events.clear();
        self.stats = Stats::default();
        self.chain = 0;
        self.session_id = self.session_id.wrapping_add(1);
        self.started = false;
        self.start();
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn session_id(&self) -> u32 {
        self.session_id
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Direct board access for hosts that seed levels or tests
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Board and world together, for setups that touch both
    pub fn parts_mut(&mut self) -> (&mut Board, &mut World) {
        (&mut self.board, &mut self.world)
    }

    pub fn bag(&self) -> &ShapeBag {
        &self.bag
    }

    /// Take the notifications emitted since the last call
    pub fn take_events(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }

    /// The active piece entity, if one is in play
    pub fn active(&self) -> Option<Entity> {
        self.board.active
    }

    /// Origin cell and shape of the active piece
    pub fn active_piece(&self) -> Option<((i8, i8), Shape)> {
        let entity = self.board.active?;
        let pos = self.world.get::<Position>(entity);
        let shape = self.world.get::<Shape>(entity);
        debug_assert!(
            pos.is_some() && shape.is_some(),
            "active piece {entity:?} is missing its components"
        );
        Some((pos?.cell(), *shape?))
    }

    /// Absolute cells of the active piece
    pub fn active_cells(&self) -> Option<[CellPos; 4]> {
        self.active_piece()
            .map(|((x, y), shape)| shape.cells_at(x, y))
    }

    /// Whether the active piece overlaps locked blocks (it spawned into them).
    ///
    /// The core has no game-over state; hosts use this to end or restart.
    pub fn topped_out(&self) -> bool {
        self.active_cells()
            .is_some_and(|cells| cells.iter().any(|&(x, y)| self.board.is_occupied(x, y)))
    }

    /// Draw the next shape from the bag and put it in play at the spawn origin
    pub fn spawn_piece(&mut self) -> Entity {
        debug_assert!(self.board.active.is_none(), "spawning over an active piece");
        let shape = self.bag.draw(&mut self.rng);

        let piece = self.world.create();
        self.world.add(piece, Position::at_cell(SPAWN_X, SPAWN_Y));
        self.world.add(piece, shape);
        self.board.active = Some(piece);
        self.stats.pieces += 1;

        log::debug!("spawned {:?} with colours {:?}", shape.kind, shape.colors);
        self.events.push(BoardEvent::Spawned { kind: shape.kind });
        piece
    }

    /// Shift the active piece `dx` columns. Rejected moves leave it untouched.
    pub fn try_move(&mut self, dx: i8) -> bool {
        let Some(((x, y), shape)) = self.active_piece() else {
            return false;
        };

        let fits = shape
            .cells_at(x + dx, y)
            .iter()
            .all(|&(cx, cy)| self.board.is_open(cx, cy));
        if !fits {
            return false;
        }
        self.set_active_origin(x + dx, y);
        true
    }

    /// Rotate the active piece about its pivot. No wall kicks: the rotation
    /// is applied in place or rejected.
    pub fn try_rotate(&mut self) -> bool {
        let Some(((x, y), shape)) = self.active_piece() else {
            return false;
        };

        let board = &self.board;
        let Some(rotated) = try_rotate(&shape, x, y, |cx, cy| board.is_open(cx, cy)) else {
            return false;
        };
        if let Some(entity) = self.board.active {
            self.world.add(entity, rotated);
        }
        true
    }

    /// Advance one frame.
    ///
    /// The down input speeds the timer up by subtracting `delta` a second
    /// time, whether or not a piece is active.
    pub fn tick(&mut self, delta: f64, input: &InputFrame) {
        if !self.started {
            return;
        }

        if self.board.active.is_some() {
            if input.left_pressed {
                self.try_move(-1);
            }
            if input.right_pressed {
                self.try_move(1);
            }
            if input.up_pressed {
                self.try_rotate();
            }
        }

        self.board.next_tick -= delta;
        if input.down_held {
            self.board.next_tick -= delta;
        }

        if self.board.next_tick <= 0.0 {
            self.board.next_tick += TICK_INTERVAL_SECS;
            if self.board.active.is_some() {
                self.gravity_step();
            } else {
                self.resolve_step();
            }
        }
    }

    /// Drop the active piece one row, or lock it if anything is beneath.
    ///
    /// Returns true if the piece locked.
    pub fn gravity_step(&mut self) -> bool {
        let Some(cells) = self.active_cells() else {
            return false;
        };

        let grounded = cells
            .iter()
            .any(|&(x, y)| y - 1 < 0 || self.board.is_occupied(x, y - 1));
        if grounded {
            self.lock_piece();
            return true;
        }

        if let Some(((x, y), _)) = self.active_piece() {
            self.set_active_origin(x, y - 1);
        }
        false
    }

    /// Turn the active piece into blocks, then run one resolution pass.
    ///
    /// The next piece spawns right away only if nothing cleared; otherwise the
    /// chain continues on later timer steps.
    pub fn lock_piece(&mut self) {
        let Some(((x, y), shape)) = self.active_piece() else {
            return;
        };
        let Some(piece) = self.board.active.take() else {
            return;
        };

        let cells = shape.cells_at(x, y);
        for (&(cx, cy), &color) in cells.iter().zip(shape.colors.iter()) {
            let placed = self.board.place_block(&mut self.world, cx, cy, color);
            debug_assert!(placed.is_some(), "locked cell ({cx}, {cy}) is off the board");
        }
        self.world.destroy(piece);

        log::debug!("locked {:?} at {:?}", shape.kind, cells);
        self.events.push(BoardEvent::Locked { cells });
        self.chain = 0;
        self.resolve_step();
    }

    /// One resolution pass while no piece is active. Spawns the next piece
    /// when the pass clears nothing. Returns true if anything cleared.
    pub fn resolve_step(&mut self) -> bool {
        let outcome = resolve(&mut self.board, &mut self.world, &mut self.events);
        if !outcome.cleared() {
            if self.chain > 0 {
                log::debug!("chain settled after {} passes", self.chain);
            }
            self.events.push(BoardEvent::Settled { chain: self.chain });
            self.chain = 0;
            self.spawn_piece();
            return false;
        }

        self.chain += 1;
        self.stats.lines += outcome.rows.len() as u32;
        self.stats.blocks_cleared += outcome.blocks;
        self.stats.score += outcome.blocks as u64 * self.chain as u64;
        self.stats.max_chain = self.stats.max_chain.max(self.chain);
        log::debug!(
            "chain step {}: {} blocks, rows {:?}",
            self.chain,
            outcome.blocks,
            outcome.rows.as_slice()
        );
        true
    }

    /// Current clearing-pass count since the last lock
    pub fn chain(&self) -> u32 {
        self.chain
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut board = [[None; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];
        for (y, row) in board.iter_mut().enumerate() {
            for (x, cell) in row.iter_mut().enumerate() {
                *cell = self.board.color_at(&self.world, x as i8, y as i8);
            }
        }

        GameSnapshot {
            session_id: self.session_id,
            board,
            active: self
                .active_piece()
                .map(|((x, y), shape)| ActiveSnapshot::new(x, y, &shape)),
            next_tick: self.board.next_tick,
            chain: self.chain,
            stats: self.stats,
            particles: ParticleSnapshot::collect(&self.world),
        }
    }

    fn set_active_origin(&mut self, x: i8, y: i8) {
        let Some(entity) = self.board.active else {
            return;
        };
        let pos = self.world.get_mut::<Position>(entity);
        debug_assert!(pos.is_some(), "active piece {entity:?} has no position");
        if let Some(pos) = pos {
            *pos = Position::at_cell(x, y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(seed: u32) -> GameState {
        let mut game = GameState::new(seed);
        game.start();
        game
    }

    #[test]
    fn test_start_spawns_once() {
        let mut game = GameState::new(1);
        assert!(game.active().is_none());
        game.start();
        let first = game.active();
        assert!(first.is_some());
        game.start();
        assert_eq!(game.active(), first);
        assert_eq!(game.stats().pieces, 1);
    }

    #[test]
    fn test_tick_before_start_does_nothing() {
        let mut game = GameState::new(1);
        game.tick(1.0, &InputFrame::NONE);
        assert!(game.active().is_none());
        assert!(game.world().is_empty());
    }

    #[test]
    fn test_spawn_origin() {
        let game = started(5);
        let ((x, y), _) = game.active_piece().unwrap();
        assert_eq!((x, y), (SPAWN_X, SPAWN_Y));
        assert!(!game.topped_out());
    }

    #[test]
    fn test_gravity_step_moves_down_one_row() {
        let mut game = started(5);
        let before = game.active_cells().unwrap();
        assert!(!game.gravity_step());
        let after = game.active_cells().unwrap();
        for (b, a) in before.iter().zip(after.iter()) {
            assert_eq!((b.0, b.1 - 1), *a);
        }
    }

    #[test]
    fn test_restart_resets_session() {
        let mut game = started(5);
        game.gravity_step();
        let (board, world) = game.parts_mut();
        board.place_block(world, 0, 0, 1);

        game.restart();
        assert_eq!(game.session_id(), 1);
        assert_eq!(game.board().occupied_count(), 0);
        assert_eq!(game.world().len(), 1);
        assert_eq!(game.stats().pieces, 1);
        let events = game.take_events();
        assert!(matches!(events.as_slice(), [BoardEvent::Spawned { .. }]));
    }
}
