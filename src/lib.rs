//! Blocktris (workspace facade crate).
//!
//! Re-exports the workspace crates as `blocktris::{types,core,engine}` so
//! integration tests and the binary depend on one path.

pub use blocktris_core as core;
pub use blocktris_engine as engine;
pub use blocktris_types as types;
