//! Protocol module - line-delimited JSON messages
//!
//! Inbound lines are either tagged JSON objects or bare command words:
//!
//! ```text
//! {"type":"command","command":"moveLeft"}
//! {"type":"command","command":"start","level":3}
//! {"type":"command","command":"rotate","clockwise":false}
//! {"type":"snapshot"}
//! moveLeft
//! start 3
//! ```
//!
//! Outbound lines are `event`, `snapshot` and `error` objects.

use serde::{Deserialize, Serialize};

use blocktris_core::{Event, EventPayload, GameSnapshot, PlayerSnapshot};
use blocktris_types::{CellState, Command, EventKind, BOARD_HEIGHT, BOARD_WIDTH};

use crate::error::EngineError;

// ============== Client -> Engine Messages ==============

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandMessage {
    pub command: String,
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub clockwise: Option<bool>,
}

impl CommandMessage {
    pub fn to_command(&self) -> Result<Command, EngineError> {
        let command = Command::from_str(&self.command)
            .ok_or_else(|| EngineError::UnknownCommand(self.command.clone()))?;
        Ok(match command {
            Command::Start { .. } => Command::Start {
                level: self.level.unwrap_or(0),
            },
            Command::Rotate { clockwise } => Command::Rotate {
                clockwise: self.clockwise.unwrap_or(clockwise),
            },
            other => other,
        })
    }
}

/// Parsed inbound line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Command(Command),
    Snapshot,
}

/// Parse a tagged JSON message
pub fn parse_message(json: &str) -> Result<Request, EngineError> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type")]
    enum InboundMessage {
        #[serde(rename = "command")]
        Command(CommandMessage),
        #[serde(rename = "snapshot")]
        Snapshot,
    }

    match serde_json::from_str::<InboundMessage>(json)? {
        InboundMessage::Command(m) => Ok(Request::Command(m.to_command()?)),
        InboundMessage::Snapshot => Ok(Request::Snapshot),
    }
}

/// Parse one input line: JSON if it looks like an object, otherwise words
pub fn parse_line(line: &str) -> Result<Request, EngineError> {
    let trimmed = line.trim();
    if trimmed.starts_with('{') {
        return parse_message(trimmed);
    }

    let mut words = trimmed.split_whitespace();
    let word = words.next().unwrap_or_default();
    if word.eq_ignore_ascii_case("snapshot") {
        return Ok(Request::Snapshot);
    }

    let command = Command::from_str(word)
        .ok_or_else(|| EngineError::UnknownCommand(word.to_string()))?;
    match (command, words.next()) {
        (Command::Start { .. }, Some(arg)) => {
            let level = arg
                .parse()
                .map_err(|_| EngineError::InvalidLevel(arg.to_string()))?;
            Ok(Request::Command(Command::Start { level }))
        }
        (command, _) => Ok(Request::Command(command)),
    }
}

// ============== Engine -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MessageType {
    #[serde(rename = "event")]
    Event,
    #[serde(rename = "snapshot")]
    Snapshot,
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventKindLower {
    #[serde(rename = "drop")]
    Drop,
    #[serde(rename = "lock")]
    Lock,
    #[serde(rename = "clear")]
    Clear,
    #[serde(rename = "levelUp")]
    LevelUp,
    #[serde(rename = "gameOver")]
    GameOver,
}

impl From<EventKind> for EventKindLower {
    fn from(value: EventKind) -> Self {
        match value {
            EventKind::Drop => Self::Drop,
            EventKind::Lock => Self::Lock,
            EventKind::Clear => Self::Clear,
            EventKind::LevelUp => Self::LevelUp,
            EventKind::GameOver => Self::GameOver,
        }
    }
}

/// Event with its payload flattened into optional fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventMessage {
    #[serde(rename = "type")]
    pub msg_type: MessageType,
    pub seq: u64,
    pub kind: EventKindLower,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<i8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<i8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<Vec<Vec<u8>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
}

impl From<&Event> for EventMessage {
    fn from(event: &Event) -> Self {
        let mut msg = EventMessage {
            msg_type: MessageType::Event,
            seq: event.sequence,
            kind: event.kind.into(),
            x: None,
            y: None,
            shape: None,
            rows: None,
            points: None,
            count: None,
            level: None,
        };
        match &event.payload {
            EventPayload::Drop { x, y, shape } => {
                msg.x = Some(*x);
                msg.y = Some(*y);
                msg.shape = Some(shape.to_rows());
            }
            EventPayload::Lock { x, y } => {
                msg.x = Some(*x);
                msg.y = Some(*y);
            }
            EventPayload::Clear {
                rows,
                points,
                count,
            } => {
                msg.rows = Some(rows.to_vec());
                msg.points = Some(*points);
                msg.count = Some(*count);
            }
            EventPayload::LevelUp { level } => msg.level = Some(*level),
            EventPayload::GameOver => {}
        }
        msg
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BoardMessage {
    pub width: u8,
    pub height: u8,
    /// 0 = empty, 1-9 = piece kind; includes the falling piece
    pub cells: [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
    /// `[x, y]` of every cell painted by the falling piece
    pub settling: Vec<[u8; 2]>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerMessage {
    pub kind: &'static str,
    pub x: i8,
    pub y: i8,
    pub shape: Vec<Vec<u8>>,
    pub collided: bool,
}

impl From<PlayerSnapshot> for PlayerMessage {
    fn from(value: PlayerSnapshot) -> Self {
        Self {
            kind: value.kind.as_str(),
            x: value.x,
            y: value.y,
            shape: value.shape.to_rows(),
            collided: value.collided,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SnapshotMessage {
    #[serde(rename = "type")]
    pub msg_type: MessageType,
    pub state: &'static str,
    pub session_id: u32,
    pub board: BoardMessage,
    pub player: Option<PlayerMessage>,
    pub next: &'static str,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub pending_rows: Vec<u8>,
    pub tetris: bool,
    pub ghost_row: Option<i8>,
    pub gravity_ms: Option<u32>,
    pub last_event: Option<EventMessage>,
}

impl From<&GameSnapshot> for SnapshotMessage {
    fn from(snap: &GameSnapshot) -> Self {
        let mut settling = Vec::new();
        for (y, row) in snap.cells.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                if cell.state == CellState::Settling {
                    settling.push([x as u8, y as u8]);
                }
            }
        }

        Self {
            msg_type: MessageType::Snapshot,
            state: snap.state.as_str(),
            session_id: snap.session_id,
            board: BoardMessage {
                width: BOARD_WIDTH,
                height: BOARD_HEIGHT,
                cells: snap.codes(),
                settling,
            },
            player: snap.player.map(PlayerMessage::from),
            next: snap.next.as_str(),
            score: snap.score,
            level: snap.level,
            lines: snap.lines,
            pending_rows: snap.pending_rows.to_vec(),
            tetris: snap.tetris,
            ghost_row: snap.ghost_row,
            gravity_ms: snap.gravity_ms,
            last_event: snap.last_event.as_ref().map(EventMessage::from),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: MessageType,
    pub message: String,
}

/// Create an error message
pub fn create_error(message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: MessageType::Error,
        message: message.to_string(),
    }
}

/// Serialize any outbound message as one line (no trailing newline)
pub fn encode_line<T: Serialize>(msg: &T) -> Result<String, EngineError> {
    Ok(serde_json::to_string(msg)?)
}
