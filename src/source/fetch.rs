//! Payload retrieval from a file or an HTTP endpoint.
//!
//! # Responsibilities
//! - Resolve the configured location into a concrete source
//! - Read the raw payload with a deadline
//! - Decode it into country records

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tokio::time;
use url::Url;

use crate::config::SourceConfig;
use crate::models::CountryRecord;

/// Errors that can occur while loading the payload.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Reading the source file failed.
    #[error("I/O error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP request could not be completed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The HTTP endpoint answered with a non-success status.
    #[error("Source responded with status {0}")]
    Status(u16),

    /// The payload is not a JSON array of country records.
    #[error("Malformed payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// The fetch did not finish in time.
    #[error("Load timed out after {0:?}")]
    Timeout(Duration),

    /// The configured location cannot be used.
    #[error("Invalid source location '{0}'")]
    InvalidLocation(String),
}

impl LoadError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            LoadError::Io { .. } => "io",
            LoadError::Http(_) => "http",
            LoadError::Status(_) => "status",
            LoadError::Decode(_) => "decode",
            LoadError::Timeout(_) => "timeout",
            LoadError::InvalidLocation(_) => "location",
        }
    }
}

/// Where the payload lives.
#[derive(Debug, Clone)]
pub enum DataSource {
    File(PathBuf),
    Http { url: Url, client: reqwest::Client },
}

impl DataSource {
    /// Interpret a location string: `http(s)://` URLs go over the network,
    /// anything else is treated as a filesystem path.
    pub fn from_location(location: &str) -> Result<Self, LoadError> {
        let location = location.trim();
        if location.is_empty() {
            return Err(LoadError::InvalidLocation(location.to_string()));
        }

        if !location.contains("://") {
            return Ok(DataSource::File(PathBuf::from(location)));
        }

        let url = Url::parse(location).map_err(|_| LoadError::InvalidLocation(location.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(DataSource::Http {
                url,
                client: reqwest::Client::new(),
            }),
            "file" => url
                .to_file_path()
                .map(DataSource::File)
                .map_err(|_| LoadError::InvalidLocation(location.to_string())),
            _ => Err(LoadError::InvalidLocation(location.to_string())),
        }
    }

    /// Path to observe for changes, if the source is a local file.
    pub fn watch_path(&self) -> Option<&Path> {
        match self {
            DataSource::File(path) => Some(path),
            DataSource::Http { .. } => None,
        }
    }

    async fn read(&self) -> Result<Vec<u8>, LoadError> {
        match self {
            DataSource::File(path) => tokio::fs::read(path).await.map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            }),
            DataSource::Http { url, client } => {
                let response = client.get(url.clone()).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(LoadError::Status(status.as_u16()));
                }
                Ok(response.bytes().await?.to_vec())
            }
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Http { url, .. } => write!(f, "{}", url),
        }
    }
}

/// Fetches and decodes the payload under a timeout.
#[derive(Debug, Clone)]
pub struct Fetcher {
    source: DataSource,
    timeout: Duration,
    delay: Duration,
}

impl Fetcher {
    pub fn new(source: DataSource, timeout: Duration, delay: Duration) -> Self {
        Self { source, timeout, delay }
    }

    /// Build a fetcher from the `[source]` configuration section.
    pub fn from_config(config: &SourceConfig) -> Result<Self, LoadError> {
        Ok(Self::new(
            DataSource::from_location(&config.location)?,
            Duration::from_secs(config.request_timeout_secs),
            Duration::from_millis(config.simulated_delay_ms),
        ))
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    /// Fetch the payload and decode it. Records are returned as found;
    /// de-duplication is the caller's concern.
    pub async fn fetch(&self) -> Result<Vec<CountryRecord>, LoadError> {
        if !self.delay.is_zero() {
            time::sleep(self.delay).await;
        }

        let bytes = match time::timeout(self.timeout, self.source.read()).await {
            Ok(result) => result?,
            Err(_) => return Err(LoadError::Timeout(self.timeout)),
        };

        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("olympic-fetch-{}-{}.json", name, std::process::id()));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_location_parsing() {
        assert!(matches!(
            DataSource::from_location("./assets/mock/olympic.json").unwrap(),
            DataSource::File(_)
        ));
        assert!(matches!(
            DataSource::from_location("http://localhost:4200/olympic.json").unwrap(),
            DataSource::Http { .. }
        ));
        assert!(matches!(
            DataSource::from_location("ftp://host/olympic.json"),
            Err(LoadError::InvalidLocation(_))
        ));
        assert!(DataSource::from_location("  ").is_err());
    }

    #[tokio::test]
    async fn test_fetch_from_file() {
        let path = temp_file(
            "ok",
            r#"[{"id": 1, "country": "Italy", "participations": [
                {"id": 1, "year": 2016, "city": "Rio", "medalsCount": 28, "athleteCount": 375}
            ]}]"#,
        );
        let fetcher = Fetcher::new(DataSource::File(path.clone()), Duration::from_secs(1), Duration::ZERO);

        let records = fetcher.fetch().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].country, "Italy");

        std::fs::remove_file(path).unwrap_or_default();
    }

    #[tokio::test]
    async fn test_missing_file() {
        let path = std::env::temp_dir().join("olympic-fetch-does-not-exist.json");
        let fetcher = Fetcher::new(DataSource::File(path), Duration::from_secs(1), Duration::ZERO);

        let err = fetcher.fetch().await.unwrap_err();
        assert_eq!(err.kind(), "io");
    }

    #[tokio::test]
    async fn test_malformed_payload() {
        let path = temp_file("bad", r#"{"country": "not an array"}"#);
        let fetcher = Fetcher::new(DataSource::File(path.clone()), Duration::from_secs(1), Duration::ZERO);

        let err = fetcher.fetch().await.unwrap_err();
        assert!(matches!(err, LoadError::Decode(_)));

        std::fs::remove_file(path).unwrap_or_default();
    }

    #[test]
    fn test_error_display() {
        let err = LoadError::Timeout(Duration::from_secs(5));
        assert_eq!(err.to_string(), "Load timed out after 5s");
        assert_eq!(LoadError::Status(503).to_string(), "Source responded with status 503");
    }
}
