//! Chart colours and country selection.

use serde::{Deserialize, Serialize};

use crate::config::PaletteConfig;
use crate::models::CountryRecord;

/// True for `RRGGBB` or `#RRGGBB`.
pub fn is_hex_color(value: &str) -> bool {
    let digits = value.strip_prefix('#').unwrap_or(value);
    digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// Ordered colours handed out by country position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<String>,
}

impl Palette {
    /// An empty list falls back to the default palette.
    pub fn new(colors: Vec<String>) -> Self {
        if colors.is_empty() {
            return Self::default();
        }
        Self { colors }
    }

    pub fn from_config(config: &PaletteConfig) -> Self {
        Self::new(config.colors.clone())
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Colour for the country at `index`, wrapping around the palette.
    pub fn color_for(&self, index: usize) -> &str {
        &self.colors[index % self.colors.len()]
    }

    /// Selection event for `country_name`, or `None` if it is not in `records`.
    ///
    /// Stable only as long as the collection order is.
    pub fn select(&self, records: &[CountryRecord], country_name: &str) -> Option<SelectionEvent> {
        records
            .iter()
            .position(|record| record.country == country_name)
            .map(|index| SelectionEvent {
                country_name: country_name.to_string(),
                assigned_color: self.color_for(index).to_string(),
            })
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_config(&PaletteConfig::default())
    }
}

/// Emitted when a country is picked on the dashboard chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionEvent {
    pub country_name: String,
    pub assigned_color: String,
}

impl SelectionEvent {
    /// Path of the detail view for this selection, colour included.
    pub fn detail_path(&self) -> String {
        let color = self.assigned_color.trim_start_matches('#');
        let mut url = match url::Url::parse("http://localhost/api/countries/") {
            Ok(url) => url,
            Err(_) => return format!("/api/countries/{}?color={}", self.country_name, color),
        };
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&self.country_name);
        }
        url.query_pairs_mut().append_pair("color", color);
        match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        }
    }
}

/// Colour requested for the detail chart: six hex digits, stored without `#`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DisplayColor(String);

impl DisplayColor {
    /// Accept `requested` when it is a valid hex colour, otherwise use `default`.
    pub fn parse_or(requested: Option<&str>, default: &str) -> Self {
        let chosen = match requested {
            Some(value) if is_hex_color(value) => value,
            Some(value) => {
                tracing::debug!(color = %value, "Ignoring invalid display colour");
                default
            }
            None => default,
        };
        Self(chosen.trim_start_matches('#').to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
