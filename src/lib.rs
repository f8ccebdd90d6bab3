//! Library entry point for the newsfeed crate.
//! This file re-exports key types for use by the binary and the tests.

pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod fs;
pub mod log;
pub mod model;
pub mod net;
pub mod server;
pub mod service;
pub mod utils;

#[macro_use]
pub mod macros;

pub use utils::*;

/// Default buffer size used for the actors' message channels.
pub const BUFFER_SIZE: usize = 128;
