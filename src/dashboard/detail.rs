//! Per-country detail aggregates.

use serde::Serialize;

use crate::dashboard::chart::{ChartPoint, ChartSeries};
use crate::dashboard::palette::DisplayColor;
use crate::models::CountryRecord;

/// Share of the medal range added above and below the line chart.
const AXIS_MARGIN_RATIO: f64 = 0.5;

/// Y-axis bounds for the medal chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AxisRange {
    pub min: i64,
    pub max: i64,
}

/// Padded y-axis range around the medal counts.
///
/// Empty input yields `0..0`.
pub fn y_axis_bounds(medals: &[u32]) -> AxisRange {
    let (Some(&min), Some(&max)) = (medals.iter().min(), medals.iter().max()) else {
        return AxisRange { min: 0, max: 0 };
    };

    let (min, max) = (f64::from(min), f64::from(max));
    let margin = (max - min) * AXIS_MARGIN_RATIO;
    AxisRange {
        min: (min - margin).max(0.0).round() as i64,
        max: (max + margin).round() as i64,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryDetail {
    pub country: String,
    pub color: DisplayColor,
    pub entry_count: usize,
    pub total_medals: u64,
    pub total_athletes: u64,
    pub medal_series: Vec<ChartSeries>,
    pub y_axis: AxisRange,
}

impl CountryDetail {
    pub fn from_record(record: &CountryRecord, color: DisplayColor) -> Self {
        let medals: Vec<u32> = record.participations.iter().map(|p| p.medals_count).collect();

        let series = ChartSeries {
            name: record.country.clone(),
            series: record
                .participations
                .iter()
                .map(|p| ChartPoint::new(p.year.to_string(), u64::from(p.medals_count)))
                .collect(),
        };

        Self {
            country: record.country.clone(),
            color,
            entry_count: record.participations.len(),
            total_medals: record.total_medals(),
            total_athletes: record.total_athletes(),
            medal_series: vec![series],
            y_axis: y_axis_bounds(&medals),
        }
    }
}

/// Result of a detail request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailOutcome {
    Found(CountryDetail),
    /// The caller should route to its not-found view.
    NotFound { country: String },
}

impl DetailOutcome {
    pub fn resolve(name: &str, record: Option<&CountryRecord>, color: DisplayColor) -> Self {
        match record {
            Some(record) => DetailOutcome::Found(CountryDetail::from_record(record, color)),
            None => DetailOutcome::NotFound {
                country: name.to_string(),
            },
        }
    }
}
