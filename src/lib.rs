//! Picross (workspace facade crate).
//!
//! This package exposes the engine under `picross::{core,events,engine,types}`
//! while the implementation lives in dedicated crates under `crates/`.

pub use picross_core as core;
pub use picross_engine as engine;
pub use picross_events as events;
pub use picross_types as types;
