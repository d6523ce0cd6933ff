//! HTTP API subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → handlers.rs (read service state, run aggregators)
//!     → response.rs (JSON errors, not-found redirects)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::{ApiError, NOT_FOUND_PATH};
pub use server::{AppState, HttpServer};
