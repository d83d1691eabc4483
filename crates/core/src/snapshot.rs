use crate::events::Event;
use crate::session::Player;
use crate::shapes::Shape;
use crate::stage::RowList;
use crate::types::{Cell, PieceKind, SessionState, BOARD_HEIGHT, BOARD_WIDTH};

pub type Grid = [[Cell; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerSnapshot {
    pub kind: PieceKind,
    pub shape: Shape,
    pub x: i8,
    pub y: i8,
    pub collided: bool,
}

impl From<Player> for PlayerSnapshot {
    fn from(value: Player) -> Self {
        Self {
            kind: value.kind,
            shape: value.shape,
            x: value.x,
            y: value.y,
            collided: value.collided,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    /// Rows top to bottom; the falling piece appears as settling cells
    pub cells: Grid,
    pub player: Option<PlayerSnapshot>,
    pub next: PieceKind,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub pending_rows: RowList,
    pub tetris: bool,
    pub ghost_row: Option<i8>,
    pub state: SessionState,
    pub session_id: u32,
    pub gravity_ms: Option<u32>,
    pub last_event: Option<Event>,
}

impl GameSnapshot {
    /// Grid as kind codes (0 empty, 1..=9 kind), merged and settling alike
    pub fn codes(&self) -> [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize] {
        let mut out = [[0u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];
        for (dst, src) in out.iter_mut().zip(self.cells.iter()) {
            for (d, cell) in dst.iter_mut().zip(src.iter()) {
                *d = cell.code();
            }
        }
        out
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            cells: [[Cell::EMPTY; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            player: None,
            next: PieceKind::I,
            score: 0,
            level: 0,
            lines: 0,
            pending_rows: RowList::new(),
            tetris: false,
            ghost_row: None,
            state: SessionState::Menu,
            session_id: 0,
            gravity_ms: None,
            last_event: None,
        }
    }
}
