//! Engine configuration
//!
//! Read from environment variables; every variable is optional.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `BLOCKTRIS_SEED` | derived from the clock | RNG seed |
//! | `BLOCKTRIS_EXTENDED_SHAPES` | off | `1`/`true` adds the two triominoes |
//! | `BLOCKTRIS_START_LEVEL` | unset | start a session at this level on launch |
//! | `BLOCKTRIS_EVENT_LOG` | unset | append every event as a JSON line to this file |
//! | `BLOCKTRIS_MAX_PENDING` | 64 | command channel capacity |

use std::env;
use std::time::{SystemTime, UNIX_EPOCH};

pub const DEFAULT_MAX_PENDING: usize = 64;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub seed: u32,
    pub extended_shapes: bool,
    pub start_level: Option<u32>,
    pub event_log_path: Option<String>,
    pub max_pending_commands: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            extended_shapes: false,
            start_level: None,
            event_log_path: None,
            max_pending_commands: DEFAULT_MAX_PENDING,
        }
    }
}

impl EngineConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let seed = env::var("BLOCKTRIS_SEED")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or_else(clock_seed);

        let extended_shapes = env::var("BLOCKTRIS_EXTENDED_SHAPES")
            .map(|v| is_truthy(&v))
            .unwrap_or(false);

        let start_level = env::var("BLOCKTRIS_START_LEVEL")
            .ok()
            .and_then(|s| s.trim().parse().ok());

        let event_log_path = env::var("BLOCKTRIS_EVENT_LOG")
            .ok()
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) });

        let max_pending_commands = env::var("BLOCKTRIS_MAX_PENDING")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_MAX_PENDING);

        Self {
            seed,
            extended_shapes,
            start_level,
            event_log_path,
            max_pending_commands,
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }
}

fn is_truthy(v: &str) -> bool {
    let v = v.trim();
    v == "1" || v.eq_ignore_ascii_case("true")
}

fn clock_seed() -> u32 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    (nanos as u32) ^ ((nanos >> 32) as u32)
}
