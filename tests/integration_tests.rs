//! Session-level tests: spawning, movement, gravity, locking and chains

use std::collections::HashSet;

use blockfall::core::components::Block;
use blockfall::core::GameState;
use blockfall::types::{
    BoardEvent, CellPos, InputFrame, ShapeKind, BOARD_WIDTH, PARTICLES_PER_BLOCK, SPAWN_X, SPAWN_Y,
    TICK_INTERVAL_SECS,
};

const DT: f64 = 1.0 / 60.0;

fn started(seed: u32) -> GameState {
    let mut game = GameState::new(seed);
    game.start();
    game
}

fn drop_until_locked(game: &mut GameState) -> [CellPos; 4] {
    for _ in 0..30 {
        let cells = game.active_cells().unwrap();
        if game.gravity_step() {
            return cells;
        }
    }
    panic!("piece never locked");
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_first_spawn_event_and_origin() {
    let mut game = started(11);
    let ((x, y), shape) = game.active_piece().unwrap();
    assert_eq!((x, y), (SPAWN_X, SPAWN_Y));

    let events = game.take_events();
    assert_eq!(events, vec![BoardEvent::Spawned { kind: shape.kind }]);
    assert!(game.take_events().is_empty());
}

#[test]
fn test_first_bag_deals_seven_kinds() {
    let mut game = started(3);
    let mut kinds = HashSet::new();
    for _ in 0..7 {
        kinds.insert(game.active_piece().unwrap().1.kind);
        // Drop straight onto the floor at the spawn column, then clear the
        // board so the next piece never tops out.
        drop_until_locked(&mut game);
        let board = game.board_mut();
        let active = board.active;
        board.clear();
        board.active = active;
    }
    assert_eq!(kinds.len(), ShapeKind::ALL.len());
}

#[test]
fn test_move_left_until_wall() {
    let mut game = started(21);
    let mut moves = 0;
    while game.try_move(-1) {
        moves += 1;
        assert!(moves <= BOARD_WIDTH as i32, "moved through the wall");
    }
    let cells = game.active_cells().unwrap();
    assert_eq!(cells.iter().map(|c| c.0).min(), Some(0));

    // A rejected move leaves the piece where it was.
    assert!(!game.try_move(-1));
    assert_eq!(game.active_cells().unwrap(), cells);
    assert!(game.try_move(1));
}

#[test]
fn test_move_blocked_by_locked_block() {
    let mut game = started(21);
    let cells = game.active_cells().unwrap();
    let (rx, ry) = *cells.iter().max_by_key(|c| c.0).unwrap();
    let (board, world) = game.parts_mut();
    board.place_block(world, rx + 1, ry, 1);

    assert!(!game.try_move(1));
    assert_eq!(game.active_cells().unwrap(), cells);
}

#[test]
fn test_rotation_rejected_when_boxed_in() {
    let mut game = started(5);
    let ((x, y), shape) = game.active_piece().unwrap();
    let own: HashSet<CellPos> = shape.cells_at(x, y).into_iter().collect();

    let (board, world) = game.parts_mut();
    for by in 0..22 {
        for bx in 0..10 {
            if !own.contains(&(bx, by)) {
                board.place_block(world, bx, by, 0);
            }
        }
    }

    let rotated = game.try_rotate();
    let after: HashSet<CellPos> = game.active_cells().unwrap().into_iter().collect();
    // Only a rotation onto the same cells (the O shape) can fit.
    assert_eq!(after, own);
    assert_eq!(rotated, shape.kind == ShapeKind::O);
}

#[test]
fn test_first_tick_steps_immediately() {
    let mut game = started(9);
    let before = game.active_cells().unwrap();
    game.tick(DT, &InputFrame::NONE);
    let after = game.active_cells().unwrap();
    for (b, a) in before.iter().zip(after.iter()) {
        assert_eq!((b.0, b.1 - 1), *a);
    }
    assert!(close(game.board().next_tick, TICK_INTERVAL_SECS - DT));
}

#[test]
fn test_gravity_waits_for_timer() {
    let mut game = started(9);
    game.tick(0.01, &InputFrame::NONE);
    let after_first = game.active_cells().unwrap();

    game.tick(0.2, &InputFrame::NONE);
    assert_eq!(game.active_cells().unwrap(), after_first);

    game.tick(0.05, &InputFrame::NONE);
    assert_ne!(game.active_cells().unwrap(), after_first);
}

#[test]
fn test_soft_drop_subtracts_delta_twice() {
    let mut game = started(9);
    game.tick(0.01, &InputFrame::NONE);
    let timer = game.board().next_tick;

    let down = InputFrame {
        down_held: true,
        ..InputFrame::NONE
    };
    game.tick(0.05, &down);
    assert!(close(game.board().next_tick, timer - 0.1));
}

#[test]
fn test_soft_drop_also_speeds_up_without_active_piece() {
    let mut game = started(9);
    game.tick(0.01, &InputFrame::NONE);
    let timer = game.board().next_tick;
    game.board_mut().active = None;

    let down = InputFrame {
        down_held: true,
        ..InputFrame::NONE
    };
    game.tick(0.05, &down);
    assert!(close(game.board().next_tick, timer - 0.1));

    // Expiry with no piece runs a resolution pass; nothing clears, so a new
    // piece spawns.
    game.take_events();
    game.tick(0.1, &down);
    assert!(game.active().is_some());
    let events = game.take_events();
    assert!(matches!(
        events.as_slice(),
        [BoardEvent::Settled { chain: 0 }, BoardEvent::Spawned { .. }]
    ));
}

#[test]
fn test_lock_turns_piece_into_blocks_and_spawns() {
    let mut game = started(13);
    let first = game.active().unwrap();
    let (_, shape) = game.active_piece().unwrap();
    game.take_events();

    let cells = drop_until_locked(&mut game);
    assert!(cells.iter().any(|&(_, y)| y == 0), "locked on the floor");

    for (&(x, y), &color) in cells.iter().zip(shape.colors.iter()) {
        assert_eq!(game.board().color_at(game.world(), x, y), Some(color));
    }
    assert!(!game.world().is_alive(first));
    assert_eq!(game.world().count::<Block>(), 4);

    let second = game.active().unwrap();
    assert_ne!(second, first);
    assert_eq!(game.stats().pieces, 2);

    let events = game.take_events();
    assert!(matches!(
        events.as_slice(),
        [
            BoardEvent::Locked { .. },
            BoardEvent::Settled { chain: 0 },
            BoardEvent::Spawned { .. }
        ]
    ));
}

#[test]
fn test_lock_onto_stack() {
    let mut game = started(17);
    let cells = game.active_cells().unwrap();
    let lowest = cells.iter().map(|c| c.1).min().unwrap();
    let (x, _) = *cells.iter().find(|c| c.1 == lowest).unwrap();
    let (board, world) = game.parts_mut();
    board.place_block(world, x, 5, 0);

    let locked = drop_until_locked(&mut game);
    assert!(locked.contains(&(x, 6)));
}

#[test]
fn test_row_clear_chain_delays_spawn() {
    let mut game = started(23);
    let cells = game.active_cells().unwrap();
    let bottom = cells.iter().map(|c| c.1).min().unwrap() - SPAWN_Y;
    let columns: HashSet<i8> = cells
        .iter()
        .filter(|c| c.1 - SPAWN_Y == bottom)
        .map(|c| c.0)
        .collect();

    // Fill row 0 except under the piece's lowest cells
    let (board, world) = game.parts_mut();
    for x in 0..BOARD_WIDTH as i8 {
        if !columns.contains(&x) {
            board.place_block(world, x, 0, 0);
        }
    }
    game.take_events();

    drop_until_locked(&mut game);
    assert!(game.active().is_none(), "chain in progress holds the spawn");
    assert_eq!(game.chain(), 1);
    assert_eq!(game.stats().lines, 1);
    assert_eq!(game.stats().pieces, 1);

    // The next timer steps keep resolving until nothing clears.
    for _ in 0..40 {
        game.tick(DT, &InputFrame::NONE);
        if game.active().is_some() {
            break;
        }
    }
    assert!(game.active().is_some());
    assert_eq!(game.stats().pieces, 2);

    let events = game.take_events();
    assert!(matches!(events.first(), Some(BoardEvent::Locked { .. })));
    assert!(matches!(events.get(1), Some(BoardEvent::RowsCleared { .. })));
    let settled = events
        .iter()
        .find_map(|e| match e {
            BoardEvent::Settled { chain } => Some(*chain),
            _ => None,
        })
        .unwrap();
    assert!(settled >= 1);
    assert_eq!(game.stats().max_chain, settled);
}

#[test]
fn test_score_weights_blocks_by_chain_step() {
    let mut game = started(23);
    let (board, world) = game.parts_mut();
    let active = board.active.take();
    for x in 0..BOARD_WIDTH as i8 {
        board.place_block(world, x, 0, 0);
    }
    for x in 0..3 {
        board.place_block(world, x, 1, 2);
    }
    if let Some(piece) = active {
        world.destroy(piece);
    }

    assert!(game.resolve_step());
    assert!(game.resolve_step());
    assert!(!game.resolve_step());

    let stats = game.stats();
    assert_eq!(stats.lines, 1);
    assert_eq!(stats.blocks_cleared, 13);
    assert_eq!(stats.score, 10 + 3 * 2);
    assert_eq!(stats.max_chain, 2);
    assert!(game.active().is_some());
}

#[test]
fn test_snapshot_lists_debris_from_a_clear() {
    let mut game = started(23);
    let (board, world) = game.parts_mut();
    if let Some(piece) = board.active.take() {
        world.destroy(piece);
    }
    for x in 0..BOARD_WIDTH as i8 {
        board.place_block(world, x, 0, 3);
    }
    assert!(game.snapshot().particles.is_empty());

    assert!(game.resolve_step());
    let particles = game.snapshot().particles;
    assert_eq!(particles.len(), BOARD_WIDTH as usize * PARTICLES_PER_BLOCK);
    assert!(particles.iter().all(|p| p.color == 3 && p.angle == 0.0));
    assert!(particles.iter().all(|p| p.y >= 0.0 && p.y < 1.0));
}

#[test]
fn test_topped_out_when_spawn_overlaps() {
    let mut game = started(31);
    assert!(!game.topped_out());
    let cells = game.active_cells().unwrap();
    let (board, world) = game.parts_mut();
    board.place_block(world, cells[0].0, cells[0].1, 0);
    assert!(game.topped_out());

    game.restart();
    assert!(!game.topped_out());
    assert_eq!(game.board().occupied_count(), 0);
}

#[test]
fn test_same_seed_same_game() {
    let play = |seed| {
        let mut game = started(seed);
        let left = InputFrame {
            left_pressed: true,
            ..InputFrame::NONE
        };
        for i in 0..2000 {
            let input = if i % 7 == 0 { left } else { InputFrame::NONE };
            game.tick(DT, &input);
            if game.topped_out() {
                break;
            }
        }
        game.snapshot()
    };
    assert_eq!(play(1234), play(1234));
}

#[test]
fn test_snapshot_serializes() {
    let game = started(2);
    let snapshot = game.snapshot();
    assert!(snapshot.active.is_some());
    assert_eq!(snapshot.occupied(), 0);

    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["session_id"], 0);
    assert_eq!(json["board"].as_array().unwrap().len(), 22);
    assert_eq!(json["stats"]["pieces"], 1);
}
