//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Init logging/metrics → Create service → Spawn initial load → Serve
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain in-flight requests → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - The server starts before the first load finishes; clients see `loading`
//! - Background tasks share one broadcast shutdown signal

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
