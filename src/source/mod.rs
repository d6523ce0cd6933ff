//! Data access subsystem.
//!
//! # Data Flow
//! ```text
//! file / http(s) URL
//!     → fetch.rs (read with timeout, decode JSON)
//!     → models::dedupe (keep-first on country and year)
//!     → service.rs (publish {snapshot, is_loading} via watch channel)
//!     → subscribers (HTTP handlers, SSE stream, callbacks)
//!
//! On source change (optional):
//!     watcher.rs detects file modification
//!     → service.rs reload
//! ```
//!
//! # Design Decisions
//! - The service owns the only copy of the snapshot
//! - Errors stop at the service boundary: consumers get an empty snapshot
//! - No retries; every reload is an independent attempt

pub mod fetch;
pub mod service;
pub mod watcher;

pub use fetch::{DataSource, Fetcher, LoadError};
pub use service::{DashboardState, OlympicService, Snapshot, StateView, Subscription};
