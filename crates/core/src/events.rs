//! Events module - latest-value event emitter
//!
//! Every meaningful mutation is wrapped in an [`Event`] carrying a sequence
//! number. Consumers of the latest event compare sequence numbers to notice new
//! events, because payloads can repeat (two locks at the same coordinates look
//! identical otherwise).
//!
//! A single command can emit several events (a hard drop emits `Drop`, `Lock`
//! and possibly `Clear` and `LevelUp`). Those also go into a small bounded
//! buffer that a driver drains after each step; when it overflows the oldest
//! entries are discarded.

use arrayvec::ArrayVec;

use crate::shapes::Shape;
use crate::types::{EventKind, TETRIS_LINES};

/// Rows cleared by a single lock (a piece spans at most four rows)
pub type ClearedRows = ArrayVec<u8, TETRIS_LINES>;

/// Events kept for draining between steps
pub const RECENT_EVENTS: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventPayload {
    /// Hard drop reached its landing row
    Drop { x: i8, y: i8, shape: Shape },
    /// Piece merged into the grid with its origin at (x, y)
    Lock { x: i8, y: i8 },
    /// Rows became full; `count` rows worth `points`
    Clear {
        rows: ClearedRows,
        points: u32,
        count: u32,
    },
    LevelUp { level: u32 },
    GameOver,
}

impl EventPayload {
    pub fn kind(&self) -> EventKind {
        match self {
            EventPayload::Drop { .. } => EventKind::Drop,
            EventPayload::Lock { .. } => EventKind::Lock,
            EventPayload::Clear { .. } => EventKind::Clear,
            EventPayload::LevelUp { .. } => EventKind::LevelUp,
            EventPayload::GameOver => EventKind::GameOver,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub sequence: u64,
    pub kind: EventKind,
    pub payload: EventPayload,
}

#[derive(Debug, Clone)]
pub struct EventEmitter {
    next_sequence: u64,
    latest: Option<Event>,
    recent: ArrayVec<Event, RECENT_EVENTS>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self {
            next_sequence: 1,
            latest: None,
            recent: ArrayVec::new(),
        }
    }

    /// Record `payload` as the latest event and return its sequence number
    pub fn emit(&mut self, payload: EventPayload) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        let event = Event {
            sequence,
            kind: payload.kind(),
            payload,
        };
        if self.recent.is_full() {
            self.recent.remove(0);
        }
        self.recent.push(event.clone());
        self.latest = Some(event);
        sequence
    }

    /// Events emitted since the last drain, oldest first
    pub fn recent(&self) -> &[Event] {
        &self.recent
    }

    pub fn drain_recent(&mut self) -> arrayvec::Drain<'_, Event, RECENT_EVENTS> {
        self.recent.drain(..)
    }

    pub fn latest(&self) -> Option<&Event> {
        self.latest.as_ref()
    }

    /// Sequence of the latest event, 0 if nothing was emitted yet
    pub fn last_sequence(&self) -> u64 {
        self.next_sequence - 1
    }

    /// Forget the latest event; numbering continues
    pub fn clear_latest(&mut self) {
        self.latest = None;
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_is_monotonic() {
        let mut emitter = EventEmitter::new();
        assert_eq!(emitter.last_sequence(), 0);
        assert!(emitter.latest().is_none());

        let a = emitter.emit(EventPayload::Lock { x: 3, y: 18 });
        let b = emitter.emit(EventPayload::Lock { x: 3, y: 18 });
        assert_eq!(a, 1);
        assert_eq!(b, 2);

        // Same payload, distinguishable only by sequence.
        let latest = emitter.latest().unwrap();
        assert_eq!(latest.sequence, 2);
        assert_eq!(latest.kind, EventKind::Lock);
    }

    #[test]
    fn test_recent_keeps_every_event_until_drained() {
        let mut emitter = EventEmitter::new();
        emitter.emit(EventPayload::Lock { x: 3, y: 18 });
        emitter.emit(EventPayload::LevelUp { level: 1 });

        let kinds: Vec<EventKind> = emitter.recent().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EventKind::Lock, EventKind::LevelUp]);

        let drained: Vec<u64> = emitter.drain_recent().map(|e| e.sequence).collect();
        assert_eq!(drained, vec![1, 2]);
        assert!(emitter.recent().is_empty());
        assert_eq!(emitter.latest().unwrap().sequence, 2);
    }

    #[test]
    fn test_recent_discards_oldest_on_overflow() {
        let mut emitter = EventEmitter::new();
        for _ in 0..RECENT_EVENTS + 3 {
            emitter.emit(EventPayload::GameOver);
        }
        let recent = emitter.recent();
        assert_eq!(recent.len(), RECENT_EVENTS);
        assert_eq!(recent[0].sequence, 4);
        assert_eq!(recent[RECENT_EVENTS - 1].sequence, RECENT_EVENTS as u64 + 3);
    }

    #[test]
    fn test_clear_latest_keeps_numbering() {
        let mut emitter = EventEmitter::new();
        emitter.emit(EventPayload::GameOver);
        emitter.clear_latest();
        assert!(emitter.latest().is_none());
        assert_eq!(emitter.emit(EventPayload::LevelUp { level: 1 }), 2);
    }
}
