//! # VerseCast Common Library
//!
//! Shared code for the VerseCast control and display surfaces including:
//! - Canonical book table and corpus index
//! - Scripture reference parsing and resolution
//! - Broadcast message vocabulary (SurfaceMessage enum)
//! - Multicast channel plumbing
//! - Configuration loading
//! - Common error types

pub mod books;
pub mod channel;
pub mod config;
pub mod corpus;
pub mod error;
pub mod media;
pub mod messages;
pub mod reference;
pub mod resolver;

pub use error::{Error, Result};
