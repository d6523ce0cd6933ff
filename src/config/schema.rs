//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the dashboard.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the dashboard service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DashboardConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Where the Olympic payload comes from and how it is fetched.
    pub source: SourceConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Chart colours.
    pub palette: PaletteConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Data source configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceConfig {
    /// File path or http(s) URL of the JSON payload.
    pub location: String,

    /// Upper bound on a single fetch, in seconds.
    pub request_timeout_secs: u64,

    /// Artificial latency before each fetch, in milliseconds.
    /// Only useful for exercising loading states in a UI.
    pub simulated_delay_ms: u64,

    /// Reload the snapshot when the source file changes on disk.
    pub watch: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            location: "./assets/mock/olympic.json".to_string(),
            request_timeout_secs: 5,
            simulated_delay_ms: 0,
            watch: false,
        }
    }
}

/// Timeout configuration for the HTTP surface.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Chart colour configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PaletteConfig {
    /// Colours assigned to countries by position.
    pub colors: Vec<String>,

    /// Colour used by the detail view when none (or an invalid one) is supplied.
    pub default_detail_color: String,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            colors: ["#956065", "#793d52", "#89a1db", "#9780A1", "#BFE0F1", "#B8CBE7"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            default_detail_color: "956065".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Enable security headers.
    pub enable_headers: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self { enable_headers: true }
    }
}
