//! Tiles (workspace facade crate).
//!
//! Re-exports the workspace crates under one `tiles::{core,codec,engine,store,input,types}`
//! namespace, plus the host configuration shared by the binary.

pub mod config;

pub use tiles_codec as codec;
pub use tiles_core as core;
pub use tiles_engine as engine;
pub use tiles_input as input;
pub use tiles_store as store;
pub use tiles_types as types;
