//! Real-time driver for the block-stacking engine
//!
//! Wraps one deterministic [`blocktris_core::Session`] in a tokio task and
//! exposes it through channels:
//!
//! - [`runtime`]: the actor, its handle and command sender
//! - [`protocol`]: JSON-lines encoding of commands, events and snapshots
//! - [`config`]: environment configuration
//! - [`event_log`]: optional append-only event file
//!
//! # Example
//!
//! ```no_run
//! use blocktris_engine::{Engine, EngineConfig};
//! use blocktris_types::Command;
//!
//! # async fn run() -> Result<(), blocktris_engine::EngineError> {
//! let engine = Engine::spawn(EngineConfig::from_env());
//! engine.send(Command::Start { level: 0 }).await?;
//! engine.send(Command::HardDrop).await?;
//! println!("score {}", engine.snapshot().score);
//! engine.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod event_log;
pub mod protocol;
pub mod runtime;

pub use blocktris_core as core;
pub use blocktris_types as types;

pub use config::EngineConfig;
pub use error::EngineError;
pub use protocol::{parse_line, EventMessage, Request, SnapshotMessage};
pub use runtime::{CommandSender, Engine, EngineHandle};
