//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! signals.rs:  SIGINT/SIGTERM → wait_for_shutdown returns
//! shutdown.rs: trigger() → every subscriber (server) stops accepting and drains
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
