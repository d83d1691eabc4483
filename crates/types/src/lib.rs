//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, real-time driver, JSON protocol).
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 at the top)
//! - **Spawn position**: (`BOARD_WIDTH / 2 - 2`, 0) for every piece
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `BASE_DROP_MS` | 1000 | Gravity interval at level 0 |
//! | `DROP_STEP_MS` | 50 | Interval reduction per level |
//! | `DROP_INTERVAL_MIN_MS` | 100 | Fastest gravity interval |
//! | `CLEAR_DELAY_MS` | 300 | Delay between a sweep and the physical row removal |
//!
//! # Drop Intervals by Level
//!
//! `interval(level) = max(100, 1000 - level * 50)`:
//!
//! | Level | Interval |
//! |-------|----------|
//! | 0 | 1000ms |
//! | 1 | 950ms |
//! | 10 | 500ms |
//! | 18+ | 100ms |
//!
//! # Examples
//!
//! ```
//! use blocktris_types::{Command, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
//! assert_eq!(PieceKind::from_str("I3"), Some(PieceKind::I3));
//!
//! assert_eq!(Command::from_str("moveLeft"), Some(Command::MoveLeft));
//! assert_eq!(
//!     Command::from_str("rotateCcw"),
//!     Some(Command::Rotate { clockwise: false })
//! );
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Horizontal spawn column of a piece's bounding-box origin
pub const SPAWN_X: i8 = (BOARD_WIDTH / 2) as i8 - 2;

/// Vertical spawn row of a piece's bounding-box origin
pub const SPAWN_Y: i8 = 0;

/// Largest bounding box of any catalog shape (the long piece)
pub const MAX_SHAPE_SIZE: usize = 4;

/// Gravity interval at level 0 (1000ms = 1 second per row)
pub const BASE_DROP_MS: u32 = 1000;

/// Gravity speed-up per level
pub const DROP_STEP_MS: u32 = 50;

/// Absolute minimum gravity interval (100ms)
pub const DROP_INTERVAL_MIN_MS: u32 = 100;

/// Delay between detecting full rows and removing them from the grid
pub const CLEAR_DELAY_MS: u32 = 300;

/// Lines per level step: level `n` ends once more than `(n + 1) * 10` lines are cleared
pub const LINES_PER_LEVEL: u32 = 10;

/// Highest level accepted by `Command::Start`
pub const MAX_START_LEVEL: u32 = 20;

/// Number of rows cleared at once that counts as a "tetris"
pub const TETRIS_LINES: usize = 4;

/// Line clear scoring table (Classic Nintendo scoring)
///
/// Base points for clearing N lines at level 0, indexed by `N - 1`:
/// - 1 line: 40 points
/// - 2 lines: 100 points
/// - 3 lines: 300 points
/// - 4 lines: 1200 points
///
/// Points are multiplied by (level + 1).
pub const LINE_SCORES: [u32; 4] = [40, 100, 300, 1200];


/// The piece kinds of the catalog
///
/// Seven base tetrominoes plus two extended triominoes:
/// - **I**: long bar (4x4 box)
/// - **J**, **L**: hooks (3x3 box)
/// - **O**: 2x2 square
/// - **S**, **Z**: skew pieces (3x3 box)
/// - **T**: T-shaped (3x3 box)
/// - **I3**: three-in-a-row (extended)
/// - **L3**: corner piece (extended)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
    I3,
    L3,
}

impl PieceKind {
    /// Base catalog (tetrominoes only)
    pub const BASE: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Extended catalog (base plus triominoes)
    pub const ALL: [PieceKind; 9] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
        PieceKind::I3,
        PieceKind::L3,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blocktris_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("l3"), Some(PieceKind::L3));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            "o" => Some(PieceKind::O),
            "s" => Some(PieceKind::S),
            "t" => Some(PieceKind::T),
            "z" => Some(PieceKind::Z),
            "i3" => Some(PieceKind::I3),
            "l3" => Some(PieceKind::L3),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::J => "j",
            PieceKind::L => "l",
            PieceKind::O => "o",
            PieceKind::S => "s",
            PieceKind::T => "t",
            PieceKind::Z => "z",
            PieceKind::I3 => "i3",
            PieceKind::L3 => "l3",
        }
    }

    /// Compact non-zero code (1..=9) used by the board encoding; 0 means empty.
    pub fn code(&self) -> u8 {
        match self {
            PieceKind::I => 1,
            PieceKind::J => 2,
            PieceKind::L => 3,
            PieceKind::O => 4,
            PieceKind::S => 5,
            PieceKind::T => 6,
            PieceKind::Z => 7,
            PieceKind::I3 => 8,
            PieceKind::L3 => 9,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        code.checked_sub(1)
            .and_then(|i| Self::ALL.get(i as usize).copied())
    }

    /// Whether the kind only appears when the extended catalog is active
    pub fn is_extended(&self) -> bool {
        matches!(self, PieceKind::I3 | PieceKind::L3)
    }

    /// Display color as an RGB triple (presentation metadata, unused by game rules)
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            PieceKind::I => (80, 227, 230),
            PieceKind::J => (36, 120, 223),
            PieceKind::L => (60, 180, 200),
            PieceKind::O => (200, 240, 255),
            PieceKind::S => (0, 255, 200),
            PieceKind::T => (100, 150, 255),
            PieceKind::Z => (0, 100, 180),
            PieceKind::I3 => (255, 100, 100),
            PieceKind::L3 => (255, 0, 255),
        }
    }
}

/// Lifecycle of a grid cell
///
/// - **Empty**: nothing here
/// - **Settling**: painted by the currently falling piece, erased on every redraw
/// - **Merged**: permanently locked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellState {
    #[default]
    Empty,
    Settling,
    Merged,
}

/// A cell on the stage
///
/// `kind` is `None` exactly when `state` is [`CellState::Empty`]; the
/// constructors below are the only way the engine builds cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    pub kind: Option<PieceKind>,
    pub state: CellState,
}

impl Cell {
    pub const EMPTY: Cell = Cell {
        kind: None,
        state: CellState::Empty,
    };

    pub fn settling(kind: PieceKind) -> Self {
        Self {
            kind: Some(kind),
            state: CellState::Settling,
        }
    }

    pub fn merged(kind: PieceKind) -> Self {
        Self {
            kind: Some(kind),
            state: CellState::Merged,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
    }

    pub fn is_merged(&self) -> bool {
        self.state == CellState::Merged
    }

    /// Board code of the occupying kind, 0 when empty
    pub fn code(&self) -> u8 {
        self.kind.map(|k| k.code()).unwrap_or(0)
    }
}

/// Abstract commands accepted by the session controller
///
/// These are produced by input collaborators (keyboard, touch, scripted
/// drivers) and by the gravity scheduler, which issues `SoftDrop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Begin a new session at the given starting level (clamped to 0..=20)
    Start { level: u32 },
    /// Freeze gravity and movement
    Pause,
    /// Leave the paused state
    Resume,
    /// Abandon the session and return to the menu
    Quit,
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Move piece one cell down, locking it if blocked
    SoftDrop,
    /// Rotate piece 90° with horizontal kick search
    Rotate { clockwise: bool },
    /// Drop piece to its landing row and lock immediately
    HardDrop,
}

impl Command {
    /// Parse a command word (case-insensitive)
    ///
    /// `start` without a level means level 0; see the protocol module for
    /// the `start <level>` line form.
    ///
    /// # Examples
    ///
    /// ```
    /// use blocktris_types::Command;
    ///
    /// assert_eq!(Command::from_str("softDrop"), Some(Command::SoftDrop));
    /// assert_eq!(Command::from_str("rotateCw"), Some(Command::Rotate { clockwise: true }));
    /// assert_eq!(Command::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "start" => Some(Command::Start { level: 0 }),
            "pause" => Some(Command::Pause),
            "resume" => Some(Command::Resume),
            "quit" => Some(Command::Quit),
            "moveleft" => Some(Command::MoveLeft),
            "moveright" => Some(Command::MoveRight),
            "softdrop" => Some(Command::SoftDrop),
            "rotate" | "rotatecw" => Some(Command::Rotate { clockwise: true }),
            "rotateccw" => Some(Command::Rotate { clockwise: false }),
            "harddrop" => Some(Command::HardDrop),
            _ => None,
        }
    }

    /// Convert to camelCase command word
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Start { .. } => "start",
            Command::Pause => "pause",
            Command::Resume => "resume",
            Command::Quit => "quit",
            Command::MoveLeft => "moveLeft",
            Command::MoveRight => "moveRight",
            Command::SoftDrop => "softDrop",
            Command::Rotate { clockwise: true } => "rotateCw",
            Command::Rotate { clockwise: false } => "rotateCcw",
            Command::HardDrop => "hardDrop",
        }
    }
}

/// Session lifecycle
///
/// `Menu -> Playing -> {Paused <-> Playing, GameOver}`; `GameOver -> Menu`
/// on quit or straight back to `Playing` on a new start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    #[default]
    Menu,
    Playing,
    Paused,
    GameOver,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Menu => "menu",
            SessionState::Playing => "playing",
            SessionState::Paused => "paused",
            SessionState::GameOver => "gameOver",
        }
    }
}

/// Kinds of semantic events emitted by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Hard drop landed (emitted before the lock)
    Drop,
    /// Piece merged into the grid
    Lock,
    /// One or more rows became full
    Clear,
    /// Level increased
    LevelUp,
    /// Session ended
    GameOver,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Drop => "drop",
            EventKind::Lock => "lock",
            EventKind::Clear => "clear",
            EventKind::LevelUp => "levelUp",
            EventKind::GameOver => "gameOver",
        }
    }
}
