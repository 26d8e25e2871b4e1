//! Row clears, colour-group clears and chains

use rand::Rng;

use blockfall::core::components::{Block, Particle, Position};
use blockfall::core::resolve::{clear_color_groups, clear_full_rows, find_color_groups};
use blockfall::core::{resolve, resolve_until_stable, Board, SimpleRng, World};
use blockfall::types::{
    BoardEvent, BACKGROUND_COLOR, BOARD_HEIGHT, BOARD_WIDTH, GROUP_CLEAR_THRESHOLD,
    PARTICLES_PER_BLOCK,
};

fn fill_row(board: &mut Board, world: &mut World, y: i8, color: u8) {
    for x in 0..BOARD_WIDTH as i8 {
        board.place_block(world, x, y, color);
    }
}

#[test]
fn test_row_clear_shifts_rows_above_only() {
    let mut world = World::new();
    let mut board = Board::new();

    let below = board.place_block(&mut world, 0, 1, 0).unwrap();
    fill_row(&mut board, &mut world, 3, 0);
    let above = board.place_block(&mut world, 4, 5, 1).unwrap();

    let mut events = Vec::new();
    let outcome = resolve(&mut board, &mut world, &mut events);

    assert_eq!(outcome.rows.as_slice(), &[3]);
    assert_eq!(outcome.blocks, 10);
    assert_eq!(board.get(0, 1), Some(Some(below)));
    assert_eq!(board.get(4, 4), Some(Some(above)));
    assert_eq!(board.get(4, 5), Some(None));
    assert_eq!(world.get::<Position>(above).unwrap().cell(), (4, 4));
    assert_eq!(world.get::<Position>(below).unwrap().cell(), (0, 1));

    assert_eq!(world.count::<Block>(), 2);
    assert_eq!(world.count::<Particle>(), 10 * PARTICLES_PER_BLOCK);
    assert_eq!(
        events,
        vec![BoardEvent::RowsCleared {
            rows: vec![3],
            blocks: 10
        }]
    );
}

#[test]
fn test_multiple_rows_clear_top_down() {
    let mut world = World::new();
    let mut board = Board::new();

    fill_row(&mut board, &mut world, 1, 0);
    fill_row(&mut board, &mut world, 3, 0);
    let a = board.place_block(&mut world, 2, 0, 1).unwrap();
    let b = board.place_block(&mut world, 2, 2, 1).unwrap();
    let c = board.place_block(&mut world, 2, 4, 1).unwrap();

    let rows = clear_full_rows(&mut board, &mut world);
    assert_eq!(rows.as_slice(), &[3, 1]);
    assert_eq!(board.get(2, 0), Some(Some(a)));
    assert_eq!(board.get(2, 1), Some(Some(b)));
    assert_eq!(board.get(2, 2), Some(Some(c)));
    assert_eq!(board.occupied_count(), 3);
    assert_eq!(world.count::<Particle>(), 20 * PARTICLES_PER_BLOCK);
}

#[test]
fn test_particles_start_at_cleared_block() {
    let mut world = World::new();
    let mut board = Board::new();
    fill_row(&mut board, &mut world, 6, 2);
    clear_full_rows(&mut board, &mut world);

    world.for_each::<Particle>(|entity, particle| {
        assert_eq!(particle.color, 2);
        let pos = world.get::<Position>(entity).unwrap();
        assert_eq!(pos.y, 6.0);
    });
}

#[test]
fn test_group_of_three_clears_and_column_compacts() {
    let mut world = World::new();
    let mut board = Board::new();

    // L of colour 1, with a colour 2 block resting on top of it
    board.place_block(&mut world, 0, 0, 1);
    board.place_block(&mut world, 1, 0, 1);
    board.place_block(&mut world, 0, 1, 1);
    let rider = board.place_block(&mut world, 0, 2, 2).unwrap();

    let cleared = clear_color_groups(&mut board, &mut world);
    assert_eq!(cleared, 3);
    assert_eq!(board.get(0, 0), Some(Some(rider)));
    assert_eq!(world.get::<Position>(rider).unwrap().cell(), (0, 0));
    assert_eq!(board.get(1, 0), Some(None));
    assert_eq!(board.occupied_count(), 1);
    assert_eq!(world.count::<Particle>(), 3 * PARTICLES_PER_BLOCK);
}

#[test]
fn test_disjoint_groups_clear_in_one_pass() {
    let mut world = World::new();
    let mut board = Board::new();

    // Horizontal run of colour 1
    for x in 0..3 {
        board.place_block(&mut world, x, 0, 1);
    }
    // Vertical run of colour 2 carrying a colour 1 block
    for y in 0..3 {
        board.place_block(&mut world, 7, y, 2);
    }
    let rider = board.place_block(&mut world, 7, 3, 1).unwrap();
    // Colour 1 pair, too small and not touching either run
    board.place_block(&mut world, 4, 0, 1);
    board.place_block(&mut world, 5, 0, 1);

    let mut events = Vec::new();
    let outcome = resolve(&mut board, &mut world, &mut events);

    assert!(outcome.rows.is_empty());
    assert_eq!(outcome.blocks, 6);
    assert_eq!(events, vec![BoardEvent::GroupsCleared { blocks: 6 }]);
    assert_eq!(board.occupied_count(), 3);
    assert_eq!(board.get(7, 0), Some(Some(rider)));
    assert_eq!(world.get::<Position>(rider).unwrap().cell(), (7, 0));
    for y in 1..4 {
        assert_eq!(board.get(7, y), Some(None));
    }
    assert_eq!(board.color_at(&world, 4, 0), Some(1));
    assert_eq!(board.color_at(&world, 5, 0), Some(1));
    assert_eq!(world.count::<Block>(), 3);
}

#[test]
fn test_small_and_background_groups_stay() {
    let mut world = World::new();
    let mut board = Board::new();

    // Pair of colour 2
    board.place_block(&mut world, 5, 0, 2);
    board.place_block(&mut world, 6, 0, 2);
    // Background never groups
    board.place_block(&mut world, 3, 0, 0);
    board.place_block(&mut world, 3, 1, 0);
    board.place_block(&mut world, 3, 2, 0);
    // Diagonal neighbours are not connected
    board.place_block(&mut world, 8, 0, 1);
    board.place_block(&mut world, 9, 1, 1);
    board.place_block(&mut world, 8, 2, 1);

    let mut events = Vec::new();
    let outcome = resolve(&mut board, &mut world, &mut events);
    assert!(!outcome.cleared());
    assert!(events.is_empty());
    assert_eq!(board.occupied_count(), 8);
}

#[test]
fn test_rows_take_priority_over_groups() {
    let mut world = World::new();
    let mut board = Board::new();

    fill_row(&mut board, &mut world, 0, 0);
    for x in 0..3 {
        board.place_block(&mut world, x, 1, 1);
    }

    let mut events = Vec::new();
    let first = resolve(&mut board, &mut world, &mut events);
    assert_eq!(first.rows.as_slice(), &[0]);
    // The group dropped into row 0 but was not touched this pass.
    assert_eq!(board.occupied_count(), 3);
    assert_eq!(board.color_at(&world, 1, 0), Some(1));

    let second = resolve(&mut board, &mut world, &mut events);
    assert!(second.rows.is_empty());
    assert_eq!(second.blocks, 3);
    assert_eq!(board.occupied_count(), 0);
}

#[test]
fn test_chain_runs_until_stable() {
    let mut world = World::new();
    let mut board = Board::new();

    fill_row(&mut board, &mut world, 0, 0);
    for x in 0..3 {
        board.place_block(&mut world, x, 1, 1);
    }
    let survivor = board.place_block(&mut world, 9, 1, 2).unwrap();

    let mut events = Vec::new();
    let passes = resolve_until_stable(&mut board, &mut world, &mut events);

    assert_eq!(passes, 2);
    assert_eq!(
        events,
        vec![
            BoardEvent::RowsCleared {
                rows: vec![0],
                blocks: 10
            },
            BoardEvent::GroupsCleared { blocks: 3 },
            BoardEvent::Settled { chain: 2 },
        ]
    );
    assert_eq!(board.get(9, 0), Some(Some(survivor)));
    assert_eq!(board.occupied_count(), 1);
}

#[test]
fn test_stable_board_settles_immediately() {
    let mut world = World::new();
    let mut board = Board::new();
    board.place_block(&mut world, 0, 0, 1);

    let mut events = Vec::new();
    assert_eq!(resolve_until_stable(&mut board, &mut world, &mut events), 0);
    assert_eq!(events, vec![BoardEvent::Settled { chain: 0 }]);
}

#[test]
fn test_discarding_sink() {
    let mut world = World::new();
    let mut board = Board::new();
    fill_row(&mut board, &mut world, 0, 0);
    let outcome = resolve(&mut board, &mut world, &mut ());
    assert_eq!(outcome.blocks, 10);
}

#[test]
fn test_random_boards_settle_cleanly() {
    let mut rng = SimpleRng::new(2024);

    for round in 0..500 {
        let mut world = World::new();
        let mut board = Board::new();
        for y in 0..BOARD_HEIGHT as i8 {
            for x in 0..BOARD_WIDTH as i8 {
                if rng.gen_range(0..100) < 80 {
                    let color = rng.gen_range(0..=2u8);
                    board.place_block(&mut world, x, y, color);
                }
            }
        }
        let start = board.occupied_count() as u32;

        let passes = resolve_until_stable(&mut board, &mut world, &mut ());
        assert!(passes <= start, "round {round}: {passes} passes for {start} blocks");

        for y in 0..BOARD_HEIGHT as usize {
            assert!(!board.is_row_full(y), "round {round}: row {y} still full");
        }

        let mut groups = find_color_groups(&board, &world);
        for y in 0..BOARD_HEIGHT as i8 {
            for x in 0..BOARD_WIDTH as i8 {
                let Some(Some(entity)) = board.get(x, y) else {
                    continue;
                };
                assert_eq!(
                    world.get::<Position>(entity).map(|p| p.cell()),
                    Some((x, y)),
                    "round {round}: block out of place"
                );
                let color = board.color_at(&world, x, y).unwrap();
                if color != BACKGROUND_COLOR {
                    let size = groups.size_of(y as usize * BOARD_WIDTH as usize + x as usize);
                    assert!(
                        (size as u32) < GROUP_CLEAR_THRESHOLD,
                        "round {round}: group of {size} at ({x}, {y}) survived"
                    );
                }
            }
        }

        assert_eq!(world.count::<Block>(), board.occupied_count(), "round {round}");
    }
}
