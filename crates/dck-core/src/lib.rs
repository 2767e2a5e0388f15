//! Core logic for devchat-keeper: keep one user inside one group chat.
//!
//! This crate is intentionally framework-agnostic. The Telegram client lives
//! behind a port (trait) implemented in the adapter crate, so the resolver
//! and reconciler can be driven against an in-memory fake in tests.

pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod pacing;
pub mod port;
pub mod reconciler;
pub mod resolver;

#[cfg(test)]
pub(crate) mod testing;

pub use errors::{Error, Result};
