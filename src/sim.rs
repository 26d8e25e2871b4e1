//! Headless simulation: a scripted player drives the board core through the
//! same input table a terminal host would use.

use rand::RngCore;

use crate::config::SimConfig;
use crate::core::{step_particles, GameSnapshot, GameState, SimpleRng, Stats};
use crate::input::{Control, InputTable};
use crate::types::{BoardEvent, BOARD_WIDTH};

/// Fixed frame length of the simulation
pub const FRAME_DELTA: f64 = 1.0 / 60.0;

/// Picks a column and a rotation count for every new piece, then taps toward
/// them one control per frame and holds down once lined up.
#[derive(Debug, Clone)]
pub struct Autopilot {
    rng: SimpleRng,
    target_column: i8,
    rotations: u8,
    /// Frames to wait so the next tap registers as a fresh press
    cooldown: u8,
}

impl Autopilot {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
            target_column: 0,
            rotations: 0,
            cooldown: 0,
        }
    }

    pub fn target(&self) -> (i8, u8) {
        (self.target_column, self.rotations)
    }

    /// Choose a plan for a freshly spawned piece
    pub fn on_spawn(&mut self) {
        self.target_column = (self.rng.next_u32() % BOARD_WIDTH as u32) as i8;
        self.rotations = (self.rng.next_u32() % 4) as u8;
        self.cooldown = 0;
    }

    /// Update held controls for this frame given the active piece origin
    pub fn drive(&mut self, table: &mut InputTable, origin: Option<(i8, i8)>) {
        table.release(Control::Left);
        table.release(Control::Right);
        table.release(Control::Rotate);
        table.release(Control::Restart);

        let Some((x, _)) = origin else {
            table.release(Control::Down);
            return;
        };

        if self.cooldown > 0 {
            self.cooldown -= 1;
            return;
        }

        let tap = if self.rotations > 0 {
            self.rotations -= 1;
            Some(Control::Rotate)
        } else if x < self.target_column {
            Some(Control::Right)
        } else if x > self.target_column {
            Some(Control::Left)
        } else {
            None
        };

        match tap {
            Some(control) => {
                table.release(Control::Down);
                table.press(control);
                self.cooldown = 1;
            }
            None => table.press(Control::Down),
        }
    }
}

/// Outcome of a simulation run
#[derive(Debug, Clone)]
pub struct SimReport {
    pub frames: u64,
    /// Stats of every session played, the last one possibly unfinished
    pub sessions: Vec<Stats>,
    pub events: usize,
    pub snapshot: GameSnapshot,
    /// Final board, top row first
    pub board: String,
}

impl SimReport {
    pub fn best_score(&self) -> u64 {
        self.sessions.iter().map(|s| s.score).max().unwrap_or(0)
    }

    pub fn total_lines(&self) -> u32 {
        self.sessions.iter().map(|s| s.lines).sum()
    }

    pub fn longest_chain(&self) -> u32 {
        self.sessions.iter().map(|s| s.max_chain).max().unwrap_or(0)
    }
}

/// Play for `config.seconds` of simulated time, restarting on top-out until
/// `config.max_restarts` is used up.
pub fn run(config: &SimConfig) -> SimReport {
    let mut game = GameState::new(config.seed);
    let mut pilot = Autopilot::new(config.seed.rotate_left(16) ^ 0x5bd1_e995);
    let mut table = InputTable::new();
    let mut sessions = Vec::new();
    let mut restarts = 0;
    let mut events = 0;
    let mut restart_pending = false;

    game.start();
    pilot.on_spawn();

    let total = config.frames(FRAME_DELTA);
    let mut frames = 0;
    while frames < total {
        frames += 1;

        let origin = game.active_piece().map(|(origin, _)| origin);
        pilot.drive(&mut table, origin);
        if restart_pending {
            table.press(Control::Restart);
            restart_pending = false;
        }

        let frame = table.frame();
        if frame.restart_pressed {
            sessions.push(game.stats());
            game.restart();
            restarts += 1;
        } else {
            game.tick(FRAME_DELTA, &frame);
        }
        table.end_frame();
        step_particles(game.world_mut(), FRAME_DELTA as f32);

        for event in game.take_events() {
            events += 1;
            match event {
                BoardEvent::Spawned { kind } => {
                    log::trace!("frame {frames}: spawned {kind:?}");
                    pilot.on_spawn();
                }
                BoardEvent::RowsCleared { rows, blocks } => {
                    log::debug!("frame {frames}: cleared rows {rows:?} ({blocks} blocks)");
                }
                BoardEvent::GroupsCleared { blocks } => {
                    log::debug!("frame {frames}: cleared colour groups ({blocks} blocks)");
                }
                BoardEvent::Settled { chain } if chain > 1 => {
                    log::info!("frame {frames}: chain of {chain}");
                }
                _ => {}
            }
        }

        if game.topped_out() {
            log::info!(
                "session {} topped out after {} pieces",
                game.session_id(),
                game.stats().pieces
            );
            if restarts >= config.max_restarts {
                break;
            }
            restart_pending = true;
        }
    }

    sessions.push(game.stats());
    SimReport {
        frames,
        sessions,
        events,
        snapshot: game.snapshot(),
        board: game.board().to_ascii(game.world()),
    }
}
