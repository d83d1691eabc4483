//! Shape catalog and rotation tests

use blocktris::core::{resolve_rotation, spawn_shape, PieceGenerator, Stage};
use blocktris::types::{PieceKind, BOARD_WIDTH};

#[test]
fn test_four_turns_restore_every_shape() {
    for kind in PieceKind::ALL {
        let shape = spawn_shape(kind);
        let cw = (0..4).fold(shape, |s, _| s.rotated(true));
        let ccw = (0..4).fold(shape, |s, _| s.rotated(false));
        assert_eq!(cw, shape, "{:?} clockwise", kind);
        assert_eq!(ccw, shape, "{:?} counter-clockwise", kind);
    }
}

#[test]
fn test_rotation_preserves_cell_count() {
    for kind in PieceKind::ALL {
        let shape = spawn_shape(kind);
        assert_eq!(shape.rotated(true).cell_count(), shape.cell_count());
    }
}

#[test]
fn test_o_piece_rotation_is_identity() {
    let o = spawn_shape(PieceKind::O);
    assert_eq!(o.rotated(true), o);
    assert_eq!(o.rotated(false), o);
}

#[test]
fn test_every_kind_rotates_at_spawn_on_empty_stage() {
    let stage = Stage::new();
    for kind in PieceKind::ALL {
        let shape = spawn_shape(kind);
        let (rotated, x) = resolve_rotation(&stage, &shape, 3, 0, true)
            .unwrap_or_else(|| panic!("{:?} failed to rotate", kind));
        assert_eq!(x, 3);
        assert_eq!(rotated, shape.rotated(true));
    }
}

#[test]
fn test_kicked_rotation_stays_in_bounds() {
    let stage = Stage::new();
    for kind in PieceKind::ALL {
        let shape = spawn_shape(kind);
        let size = shape.size() as i8;
        // Push against each wall as far as the shape allows.
        for start_x in [-(size - 1), BOARD_WIDTH as i8 - 1] {
            if stage.collides(&shape, start_x, 5, 0, 0) {
                continue;
            }
            for clockwise in [true, false] {
                if let Some((rotated, x)) = resolve_rotation(&stage, &shape, start_x, 5, clockwise) {
                    assert!(!stage.collides(&rotated, x, 5, 0, 0), "{:?}", kind);
                }
            }
        }
    }
}

#[test]
fn test_generator_is_deterministic() {
    let mut a = PieceGenerator::new(99, false);
    let mut b = PieceGenerator::new(99, false);
    for _ in 0..100 {
        assert_eq!(a.draw(), b.draw());
    }
}

#[test]
fn test_base_catalog_never_draws_triominoes() {
    let mut generator = PieceGenerator::new(7, false);
    for _ in 0..1000 {
        assert!(!generator.draw().is_extended());
    }
}

#[test]
fn test_extended_catalog_draws_every_kind() {
    let mut generator = PieceGenerator::new(7, true);
    let mut seen = [false; 9];
    for _ in 0..2000 {
        seen[(generator.draw().code() - 1) as usize] = true;
    }
    assert!(seen.iter().all(|&s| s));
}
