//! Session module - the authoritative game state and its command surface
//!
//! This module ties together all core components: stage, shapes, rotation,
//! scoring, scheduler and event emitter. Gravity ticks and user commands both
//! enter through [`Session::apply`], and each one runs to completion before
//! the next is admitted, so the grid and the falling piece can never be seen
//! half-updated.
//!
//! # Lock & sweep
//!
//! A rejected downward move (or a hard drop) merges the piece, checks for game
//! over, spawns the next piece and then sweeps full rows. Full rows are scored
//! immediately but only removed from the grid [`CLEAR_DELAY_MS`] later; gravity
//! is suspended while a removal is pending.

use crate::events::{ClearedRows, Event, EventEmitter, EventPayload, RECENT_EVENTS};
use crate::rng::PieceGenerator;
use crate::rotation::resolve_rotation;
use crate::scheduler::{ClearToken, Due, Scheduler};
use crate::scoring::{drop_interval_ms, level_up_due, line_clear_points};
use crate::shapes::{spawn_shape, Shape};
use crate::snapshot::{GameSnapshot, PlayerSnapshot};
use crate::stage::{RowList, Stage};
use crate::types::*;

/// The currently falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Player {
    pub kind: PieceKind,
    pub shape: Shape,
    pub x: i8,
    pub y: i8,
    pub collided: bool,
}

impl Player {
    /// Create a new piece at the spawn position in its default orientation
    pub fn spawn(kind: PieceKind) -> Self {
        Self {
            kind,
            shape: spawn_shape(kind),
            x: SPAWN_X,
            y: SPAWN_Y,
            collided: false,
        }
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct Session {
    stage: Stage,
    player: Option<Player>,
    next: PieceKind,
    generator: PieceGenerator,
    score: u32,
    level: u32,
    lines: u32,
    /// Rows scored but not yet removed, top to bottom.
    pending_rows: RowList,
    tetris: bool,
    state: SessionState,
    scheduler: Scheduler,
    events: EventEmitter,
    /// Monotonic id, incremented by every `Start`.
    session_id: u32,
}

impl Session {
    /// Create a session in the menu state
    pub fn new(seed: u32, extended: bool) -> Self {
        let mut generator = PieceGenerator::new(seed, extended);
        let next = generator.draw();

        Self {
            stage: Stage::new(),
            player: None,
            next,
            generator,
            score: 0,
            level: 0,
            lines: 0,
            pending_rows: RowList::new(),
            tetris: false,
            state: SessionState::Menu,
            scheduler: Scheduler::new(),
            events: EventEmitter::new(),
            session_id: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn player(&self) -> Option<Player> {
        self.player
    }

    pub fn next_kind(&self) -> PieceKind {
        self.next
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn pending_rows(&self) -> &[u8] {
        &self.pending_rows
    }

    pub fn tetris(&self) -> bool {
        self.tetris
    }

    pub fn session_id(&self) -> u32 {
        self.session_id
    }

    pub fn extended(&self) -> bool {
        self.generator.extended()
    }

    /// Switch catalogs; takes effect from the next draw
    pub fn set_extended(&mut self, extended: bool) {
        self.generator.set_extended(extended);
    }

    pub fn last_event(&self) -> Option<&Event> {
        self.events.latest()
    }

    pub fn last_sequence(&self) -> u64 {
        self.events.last_sequence()
    }

    /// Every event emitted since the last drain, oldest first
    pub fn recent_events(&self) -> &[Event] {
        self.events.recent()
    }

    pub fn drain_events(&mut self) -> arrayvec::Drain<'_, Event, RECENT_EVENTS> {
        self.events.drain_recent()
    }

    /// Gravity interval while gravity is running
    pub fn gravity_interval_ms(&self) -> Option<u32> {
        self.scheduler.gravity_interval_ms()
    }

    /// Milliseconds until the next timer fires (gravity or row removal)
    pub fn next_deadline_ms(&self) -> Option<u32> {
        self.scheduler.next_deadline_ms()
    }

    /// Token of the pending row removal, if any
    pub fn pending_clear_token(&self) -> Option<ClearToken> {
        self.scheduler.pending_token()
    }

    #[cfg(test)]
    pub(crate) fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    /// Replace the falling piece (test setup)
    #[cfg(test)]
    pub(crate) fn set_player(&mut self, player: Player) {
        self.player = Some(player);
        self.redraw();
    }

    /// Apply a command; returns true if anything changed
    pub fn apply(&mut self, command: Command) -> bool {
        let changed = match command {
            Command::Start { level } => {
                self.start(level);
                true
            }
            Command::Quit => self.quit(),
            Command::Pause => self.pause(),
            Command::Resume => self.resume(),
            _ if self.state != SessionState::Playing => false,
            Command::MoveLeft => self.try_move(-1),
            Command::MoveRight => self.try_move(1),
            Command::SoftDrop => self.drop_step(),
            Command::Rotate { clockwise } => self.try_rotate(clockwise),
            Command::HardDrop => self.hard_drop(),
        };
        self.sync_gravity();
        changed
    }

    /// Advance the logical clock, firing every timer that comes due in order
    pub fn advance(&mut self, elapsed_ms: u32) {
        let mut budget = elapsed_ms;
        while let Some((consumed, due)) = self.scheduler.poll(budget) {
            budget -= consumed;
            match due {
                Due::Gravity => {
                    self.apply(Command::SoftDrop);
                }
                Due::Clear(token) => {
                    self.finish_clear(token);
                }
            }
        }
    }

    /// Start (or restart) a session at `level`, clamped to 0..=20
    fn start(&mut self, level: u32) {
        self.scheduler.cancel_clear();
        self.stage.clear();
        self.score = 0;
        self.lines = 0;
        self.level = level.min(MAX_START_LEVEL);
        self.pending_rows.clear();
        self.tetris = false;
        self.events.clear_latest();
        self.session_id = self.session_id.wrapping_add(1);
        self.state = SessionState::Playing;

        self.player = Some(Player::spawn(self.generator.draw()));
        self.next = self.generator.draw();
        self.redraw();
    }

    fn quit(&mut self) -> bool {
        if self.state == SessionState::Menu {
            return false;
        }
        self.scheduler.cancel_clear();
        self.pending_rows.clear();
        self.tetris = false;
        self.player = None;
        self.stage.clear_settling();
        self.state = SessionState::Menu;
        true
    }

    fn pause(&mut self) -> bool {
        if self.state != SessionState::Playing {
            return false;
        }
        self.state = SessionState::Paused;
        true
    }

    fn resume(&mut self) -> bool {
        if self.state != SessionState::Paused {
            return false;
        }
        self.state = SessionState::Playing;
        true
    }

    /// Active piece, unless it is already collided
    fn movable_player(&self) -> Option<Player> {
        self.player.filter(|p| !p.collided)
    }

    fn try_move(&mut self, dx: i8) -> bool {
        let Some(mut player) = self.movable_player() else {
            return false;
        };
        if self
            .stage
            .collides(&player.shape, player.x, player.y, dx, 0)
        {
            return false;
        }
        player.x += dx;
        self.player = Some(player);
        self.redraw();
        true
    }

    /// Move down one row, or lock in place if blocked
    fn drop_step(&mut self) -> bool {
        let Some(mut player) = self.movable_player() else {
            return false;
        };
        if self
            .stage
            .collides(&player.shape, player.x, player.y, 0, 1)
        {
            self.lock(player);
        } else {
            player.y += 1;
            self.player = Some(player);
            self.redraw();
        }
        true
    }

    fn hard_drop(&mut self) -> bool {
        let Some(mut player) = self.movable_player() else {
            return false;
        };
        player.y = self.stage.landing_row(&player.shape, player.x, player.y);
        self.events.emit(EventPayload::Drop {
            x: player.x,
            y: player.y,
            shape: player.shape,
        });
        self.lock(player);
        true
    }

    fn try_rotate(&mut self, clockwise: bool) -> bool {
        let Some(player) = self.movable_player() else {
            return false;
        };
        let Some((shape, x)) =
            resolve_rotation(&self.stage, &player.shape, player.x, player.y, clockwise)
        else {
            return false;
        };
        self.player = Some(Player {
            shape,
            x,
            ..player
        });
        self.redraw();
        true
    }

    /// Merge the piece, then either end the session or spawn and sweep
    fn lock(&mut self, mut player: Player) {
        player.collided = true;
        self.player = Some(player);

        self.stage.clear_settling();
        self.stage.stamp(
            &player.shape,
            player.x,
            player.y,
            player.kind,
            CellState::Merged,
        );

        if player.y <= 0 {
            self.state = SessionState::GameOver;
            self.events.emit(EventPayload::GameOver);
            return;
        }

        self.events.emit(EventPayload::Lock {
            x: player.x,
            y: player.y,
        });

        self.player = Some(Player::spawn(self.next));
        self.next = self.generator.draw();

        self.sweep();
        self.redraw();
    }

    /// Score newly full rows and schedule their removal
    fn sweep(&mut self) {
        let mut fresh = ClearedRows::new();
        for row in self.stage.full_rows() {
            if !self.pending_rows.contains(&row) && fresh.try_push(row).is_err() {
                break;
            }
        }
        if fresh.is_empty() {
            return;
        }

        let count = fresh.len();
        for &row in &fresh {
            self.pending_rows.push(row);
        }
        self.pending_rows.sort_unstable();
        if count >= TETRIS_LINES {
            self.tetris = true;
        }

        let points = line_clear_points(count, self.level);
        self.score = self.score.saturating_add(points);
        self.lines = self.lines.saturating_add(count as u32);
        self.events.emit(EventPayload::Clear {
            rows: fresh,
            points,
            count: count as u32,
        });

        if level_up_due(self.lines, self.level) {
            self.level += 1;
            self.events
                .emit(EventPayload::LevelUp { level: self.level });
        }

        self.scheduler.schedule_clear(CLEAR_DELAY_MS);
    }

    /// Physically remove the pending rows if `token` is still current
    pub fn finish_clear(&mut self, token: ClearToken) -> bool {
        if !self.scheduler.is_current(token) || self.pending_rows.is_empty() {
            return false;
        }
        self.stage.remove_rows(&self.pending_rows);
        self.pending_rows.clear();
        self.tetris = false;
        self.redraw();
        self.sync_gravity();
        true
    }

    /// Erase the old settling paint and stamp the piece at its current position
    fn redraw(&mut self) {
        self.stage.clear_settling();
        if let Some(player) = self.movable_player() {
            self.stage.stamp(
                &player.shape,
                player.x,
                player.y,
                player.kind,
                CellState::Settling,
            );
        }
    }

    /// Gravity runs only while playing with no removal pending
    fn sync_gravity(&mut self) {
        let interval = if self.state == SessionState::Playing && self.pending_rows.is_empty() {
            Some(drop_interval_ms(self.level))
        } else {
            None
        };
        self.scheduler.set_gravity(interval);
    }

    /// Row the piece would land on, for display only
    pub fn ghost_row(&self) -> Option<i8> {
        if self.state != SessionState::Playing {
            return None;
        }
        let player = self.movable_player()?;
        Some(self.stage.landing_row(&player.shape, player.x, player.y))
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.stage.write_grid(&mut out.cells);
        out.player = self.player.map(PlayerSnapshot::from);
        out.next = self.next;
        out.score = self.score;
        out.level = self.level;
        out.lines = self.lines;
        out.pending_rows = self.pending_rows.clone();
        out.tetris = self.tetris;
        out.ghost_row = self.ghost_row();
        out.state = self.state;
        out.session_id = self.session_id;
        out.gravity_ms = self.scheduler.gravity_interval_ms();
        out.last_event = self.events.latest().cloned();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(1, false)
    }
}
