//! Rendering-surface library for VerseCast
//!
//! A display holds a read-only projection of the operator's live content
//! and style properties, fed entirely by broadcast messages. The actual
//! pixel rendering is left to whatever UI embeds this crate; `main.rs`
//! ships a logging renderer.

pub mod state;
