//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, URLs and colour codes
//! - Validate value ranges (timeouts > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DashboardConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::DashboardConfig;
use crate::dashboard::palette::is_hex_color;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &DashboardConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    let location = config.source.location.trim();
    if location.is_empty() {
        errors.push(ValidationError::new("source.location", "must not be empty"));
    } else if location.contains("://") {
        match url::Url::parse(location) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(ValidationError::new(
                "source.location",
                format!("unsupported scheme '{}'", url.scheme()),
            )),
            Err(e) => errors.push(ValidationError::new("source.location", format!("invalid URL: {}", e))),
        }
    }

    if config.source.request_timeout_secs == 0 {
        errors.push(ValidationError::new("source.request_timeout_secs", "must be greater than 0"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    } else {
        let load_secs = config.source.request_timeout_secs + config.source.simulated_delay_ms.div_ceil(1000);
        if config.timeouts.request_secs < load_secs {
            errors.push(ValidationError::new(
                "timeouts.request_secs",
                format!("must be at least {} (source timeout plus simulated delay)", load_secs),
            ));
        }
    }

    if config.palette.colors.is_empty() {
        errors.push(ValidationError::new("palette.colors", "must contain at least one colour"));
    }
    for color in &config.palette.colors {
        if !is_hex_color(color) {
            errors.push(ValidationError::new("palette.colors", format!("'{}' is not a hex colour", color)));
        }
    }
    if !is_hex_color(&config.palette.default_detail_color) {
        errors.push(ValidationError::new(
            "palette.default_detail_color",
            format!("'{}' is not a hex colour", config.palette.default_detail_color),
        ));
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", config.observability.log_level),
        ));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
