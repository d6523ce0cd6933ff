//! Network layer.
//!
//! Plain TCP listeners come straight from Tokio; this module only covers
//! TLS material for the optional HTTPS listener.

pub mod tls;
