//! Control-surface library for VerseCast
//!
//! Owns the content staging store, the rapid-selection engine, the surface
//! liveness tracker and the broadcast sync tasks. The binary in `main.rs`
//! wires these together under an axum HTTP API; everything here is also
//! reachable from integration tests without a socket.

pub mod api;
pub mod error;
pub mod events;
pub mod history;
pub mod liveness;
pub mod selection;
pub mod staging;
pub mod styles;
pub mod sync;

pub use error::{Error, Result};
