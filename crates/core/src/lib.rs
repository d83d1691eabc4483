//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains all the rules of a session: the shape catalog, the
//! stage with its collision checks, the rotation resolver, scoring, the
//! logical timers and the event emitter. It has **no dependencies** on
//! rendering, input devices, wall-clock time or I/O:
//!
//! - **Deterministic**: same seed and same command/elapsed-time sequence produce
//!   identical sessions
//! - **Single owner**: one [`Session`] value holds the grid and the falling
//!   piece; every mutation goes through `&mut self`
//! - **Zero-allocation hot paths**: fixed-size grid and `arrayvec` row lists
//!
//! # Module Structure
//!
//! - [`shapes`]: piece matrices and 90° rotation
//! - [`rng`]: seeded uniform piece draws
//! - [`stage`]: 10x20 grid with collision detection and row removal
//! - [`rotation`]: horizontal kick search
//! - [`scoring`]: line-clear points, gravity interval, level thresholds
//! - [`scheduler`]: gravity and deferred row removal timers
//! - [`events`]: event emitter with the latest event and a drainable backlog
//! - [`session`]: the session controller
//! - [`snapshot`]: reusable read-only views for presenters
//!
//! # Rules at a glance
//!
//! | Rule | Behavior |
//! |------|----------|
//! | Randomizer | Uniform over 7 (or 9 with triominoes) kinds, no bag |
//! | Rotation | Matrix turn + horizontal kicks `+1, -1, +2, -2, ...` |
//! | Lock | Immediately on a blocked downward move, no lock delay |
//! | Clear | Scored on lock, rows removed 300ms later |
//! | Game over | A lock with the piece origin at row 0 or above |
//!
//! # Example
//!
//! ```
//! use blocktris_core::Session;
//! use blocktris_types::{Command, SessionState};
//!
//! let mut session = Session::new(12345, false);
//! session.apply(Command::Start { level: 0 });
//! assert_eq!(session.state(), SessionState::Playing);
//!
//! session.apply(Command::MoveRight);
//! session.apply(Command::Rotate { clockwise: true });
//! session.apply(Command::HardDrop);
//!
//! // One second of game time: one gravity step for the new piece.
//! session.advance(1000);
//! assert_eq!(session.player().unwrap().y, 1);
//! ```

pub mod events;
pub mod rng;
pub mod rotation;
pub mod scheduler;
pub mod scoring;
pub mod session;
pub mod shapes;
pub mod snapshot;
pub mod stage;

pub use blocktris_types as types;

// Re-export commonly used types for convenience
pub use events::{ClearedRows, Event, EventEmitter, EventPayload, RECENT_EVENTS};
pub use rng::{PieceGenerator, SimpleRng};
pub use rotation::resolve_rotation;
pub use scheduler::{ClearToken, Due, Scheduler};
pub use scoring::{drop_interval_ms, level_up_due, line_clear_points};
pub use session::{Player, Session};
pub use shapes::{spawn_shape, Shape};
pub use snapshot::{GameSnapshot, PlayerSnapshot};
pub use stage::{RowList, Stage};
