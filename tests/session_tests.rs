//! Session integration tests - command handling, timers and invariants

use blocktris::core::{EventPayload, GameSnapshot, Session, SimpleRng};
use blocktris::types::{
    Cell, CellState, Command, EventKind, SessionState, BOARD_HEIGHT, BOARD_WIDTH, CLEAR_DELAY_MS,
    MAX_START_LEVEL,
};

const PLAYER_COMMANDS: [Command; 6] = [
    Command::MoveLeft,
    Command::MoveRight,
    Command::SoftDrop,
    Command::Rotate { clockwise: true },
    Command::Rotate { clockwise: false },
    Command::HardDrop,
];

fn started(seed: u32, level: u32) -> Session {
    let mut session = Session::new(seed, false);
    session.apply(Command::Start { level });
    session
}

/// The falling piece is painted exactly where it is, except over merged cells
fn assert_consistent(session: &Session) {
    let stage = session.stage();
    let settling = stage
        .cells()
        .iter()
        .filter(|c| c.state == CellState::Settling)
        .count();

    match session.player() {
        Some(p) if session.state() == SessionState::Playing && !p.collided => {
            let mut painted = 0;
            for (cx, cy) in p.shape.cells() {
                let (x, y) = (p.x + cx, p.y + cy);
                assert!((0..BOARD_WIDTH as i8).contains(&x), "piece left the walls");
                if let Some(cell) = stage.get(x, y) {
                    if !cell.is_merged() {
                        assert_eq!(cell, Cell::settling(p.kind));
                        painted += 1;
                    }
                }
            }
            assert_eq!(settling, painted);
        }
        _ => {}
    }
}

#[test]
fn test_session_lifecycle() {
    let mut session = Session::new(12345, false);
    assert_eq!(session.state(), SessionState::Menu);

    assert!(session.apply(Command::Start { level: 0 }));
    assert_eq!(session.state(), SessionState::Playing);
    assert!(session.player().is_some());

    assert!(session.apply(Command::Pause));
    assert_eq!(session.state(), SessionState::Paused);
    assert!(session.apply(Command::Resume));
    assert!(session.apply(Command::Quit));
    assert_eq!(session.state(), SessionState::Menu);
}

#[test]
fn test_same_seed_same_game() {
    let mut a = started(777, 0);
    let mut b = started(777, 0);
    let mut picker = SimpleRng::new(3);

    for _ in 0..500 {
        let command = PLAYER_COMMANDS[picker.next_range(PLAYER_COMMANDS.len() as u32) as usize];
        let elapsed = picker.next_range(400);
        assert_eq!(a.apply(command), b.apply(command));
        a.advance(elapsed);
        b.advance(elapsed);
    }
    assert_eq!(a.snapshot(), b.snapshot());
}

#[test]
fn test_random_play_keeps_invariants() {
    let mut session = started(4242, 5);
    let mut picker = SimpleRng::new(11);
    let mut last_seq = session.last_sequence();
    let mut last_score = session.score();
    let mut game_overs = 0;

    for _ in 0..3000 {
        let command = PLAYER_COMMANDS[picker.next_range(PLAYER_COMMANDS.len() as u32) as usize];
        session.apply(command);
        session.advance(picker.next_range(150));
        assert_consistent(&session);

        // Sequence numbers never go backwards; score never decreases within a session.
        assert!(session.last_sequence() >= last_seq);
        assert!(session.score() >= last_score);
        last_seq = session.last_sequence();
        last_score = session.score();

        // Gravity runs exactly when playing with nothing pending.
        let expect_gravity =
            session.state() == SessionState::Playing && session.pending_rows().is_empty();
        assert_eq!(session.gravity_interval_ms().is_some(), expect_gravity);

        if session.state() == SessionState::GameOver {
            game_overs += 1;
            assert_eq!(session.last_event().unwrap().kind, EventKind::GameOver);
            session.apply(Command::Start { level: 5 });
            last_score = 0;
        }
    }
    assert!(game_overs > 0, "3000 random commands should end at least one game");
}

#[test]
fn test_hard_drops_end_in_exactly_one_game_over() {
    let mut session = started(1, 0);
    let mut game_over_events = 0;
    let mut seen_seq = session.last_sequence();

    for _ in 0..200 {
        session.apply(Command::HardDrop);
        // Let any pending removal finish before the next drop.
        session.advance(CLEAR_DELAY_MS);
        if session.last_sequence() != seen_seq {
            seen_seq = session.last_sequence();
            if session.last_event().unwrap().kind == EventKind::GameOver {
                game_over_events += 1;
            }
        }
    }

    assert_eq!(session.state(), SessionState::GameOver);
    assert_eq!(game_over_events, 1);
}

#[test]
fn test_game_over_ignores_everything_but_start_and_quit() {
    let mut session = started(1, 0);
    while session.state() != SessionState::GameOver {
        session.apply(Command::HardDrop);
        session.advance(CLEAR_DELAY_MS);
    }
    let frozen: GameSnapshot = session.snapshot();

    for command in PLAYER_COMMANDS {
        assert!(!session.apply(command));
    }
    assert!(!session.apply(Command::Pause));
    assert!(!session.apply(Command::Resume));
    session.advance(60_000);
    assert_eq!(session.snapshot(), frozen);

    assert!(session.apply(Command::Start { level: 0 }));
    assert_eq!(session.state(), SessionState::Playing);
    assert_eq!(session.score(), 0);
    assert!(session.stage().cells().iter().all(|c| !c.is_merged()));
}

#[test]
fn test_pause_freezes_gravity() {
    let mut session = started(9, 0);
    let y = session.player().unwrap().y;
    session.apply(Command::Pause);
    session.advance(10_000);
    assert_eq!(session.player().unwrap().y, y);

    session.apply(Command::Resume);
    session.advance(1000);
    assert_eq!(session.player().unwrap().y, y + 1);
}

#[test]
fn test_gravity_speeds_up_with_level() {
    let mut session = started(9, 10);
    let y = session.player().unwrap().y;
    session.advance(500);
    assert_eq!(session.player().unwrap().y, y + 1);

    let session = started(9, 99);
    assert_eq!(session.level(), MAX_START_LEVEL);
    assert_eq!(session.gravity_interval_ms(), Some(100));
}

#[test]
fn test_soft_drop_reaches_the_floor_and_locks() {
    let mut session = started(21, 0);
    let mut steps = 0;
    let before = session.last_sequence();
    while session.last_sequence() == before {
        assert!(session.apply(Command::SoftDrop));
        steps += 1;
        assert!(steps <= BOARD_HEIGHT as usize + 4);
    }

    let event = session.last_event().unwrap();
    assert_eq!(event.kind, EventKind::Lock);
    let merged = session.stage().cells().iter().filter(|c| c.is_merged()).count();
    assert!(merged == 3 || merged == 4);
}

#[test]
fn test_hard_drop_reports_landing_before_lock() {
    let mut session = started(5, 0);
    let player = session.player().unwrap();
    let ghost = session.ghost_row().unwrap();
    let before = session.last_sequence();

    session.apply(Command::HardDrop);

    // Drop then Lock; the lock is the latest and lands on the ghost row.
    assert_eq!(session.last_sequence(), before + 2);
    assert_eq!(
        session.last_event().unwrap().payload,
        EventPayload::Lock {
            x: player.x,
            y: ghost
        }
    );
}

#[test]
fn test_restart_keeps_sequence_numbers_increasing() {
    let mut session = started(5, 0);
    session.apply(Command::HardDrop);
    let seq = session.last_sequence();

    session.apply(Command::Start { level: 0 });
    assert!(session.last_event().is_none());
    assert_eq!(session.session_id(), 2);

    session.apply(Command::HardDrop);
    assert!(session.last_event().unwrap().sequence > seq);
}

#[test]
fn test_moves_stay_inside_walls() {
    let mut session = started(8, 0);
    for _ in 0..BOARD_WIDTH {
        session.apply(Command::MoveLeft);
    }
    assert!(!session.apply(Command::MoveLeft));
    assert_consistent(&session);

    for _ in 0..BOARD_WIDTH {
        session.apply(Command::MoveRight);
    }
    assert!(!session.apply(Command::MoveRight));
    assert_consistent(&session);
}

#[test]
fn test_extended_catalog_session() {
    let mut session = Session::new(31, true);
    session.apply(Command::Start { level: 0 });
    let mut saw_extended = false;
    for _ in 0..400 {
        if session.player().map(|p| p.kind.is_extended()).unwrap_or(false) {
            saw_extended = true;
            break;
        }
        session.apply(Command::HardDrop);
        session.advance(CLEAR_DELAY_MS);
        if session.state() == SessionState::GameOver {
            session.apply(Command::Start { level: 0 });
        }
    }
    assert!(saw_extended);
}
