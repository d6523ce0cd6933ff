//! Dashboard aggregates over the whole snapshot.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::dashboard::chart::ChartPoint;
use crate::dashboard::palette::Palette;
use crate::models::CountryRecord;
use crate::source::DashboardState;

/// Per-country medal totals in snapshot order.
pub fn medal_series(records: &[CountryRecord]) -> Vec<ChartPoint> {
    records
        .iter()
        .map(|record| ChartPoint::new(record.country.clone(), record.total_medals()))
        .collect()
}

/// Number of distinct games years across all countries.
pub fn count_olympic_years(records: &[CountryRecord]) -> usize {
    records
        .iter()
        .flat_map(|record| record.participations.iter().map(|p| p.year))
        .collect::<HashSet<_>>()
        .len()
}

/// An update is usable only if every record in it is.
pub fn is_acceptable(records: &[CountryRecord]) -> bool {
    records.iter().all(CountryRecord::is_well_formed)
}

/// One pie slice: country, medal total and its palette colour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountrySlice {
    pub name: String,
    pub value: u64,
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub loading: bool,
    pub country_count: usize,
    pub olympic_count: usize,
    pub series: Vec<CountrySlice>,
}

impl DashboardSummary {
    pub fn compute(records: &[CountryRecord], loading: bool, palette: &Palette) -> Self {
        let series = medal_series(records)
            .into_iter()
            .enumerate()
            .map(|(index, point)| CountrySlice {
                name: point.name,
                value: point.value,
                color: palette.color_for(index).to_string(),
            })
            .collect();

        Self {
            loading,
            country_count: records.len(),
            olympic_count: count_olympic_years(records),
            series,
        }
    }
}

/// Keeps the latest accepted summary, recomputing as states arrive.
#[derive(Debug)]
pub struct DashboardAggregator {
    palette: Palette,
    summary: DashboardSummary,
    applied: Option<(u64, bool)>,
}

impl DashboardAggregator {
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            summary: DashboardSummary::default(),
            applied: None,
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn summary(&self) -> &DashboardSummary {
        &self.summary
    }

    /// Fold a new state in. Returns `false` when the update was skipped,
    /// either because it was already applied or because a record is malformed.
    pub fn apply(&mut self, state: &DashboardState) -> bool {
        let key = (state.generation, state.is_loading);
        if self.applied == Some(key) {
            return false;
        }

        if !is_acceptable(&state.snapshot) {
            tracing::warn!(
                generation = state.generation,
                "Snapshot contains malformed records, keeping previous dashboard"
            );
            // The records are rejected but the loading flag is still current.
            self.summary.loading = state.is_loading;
            self.applied = Some(key);
            return false;
        }

        self.summary = DashboardSummary::compute(&state.snapshot, state.is_loading, &self.palette);
        self.applied = Some(key);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ParticipationRecord;
    use std::sync::Arc;

    fn record(name: &str, games: &[(i32, u32)]) -> CountryRecord {
        CountryRecord {
            id: 0,
            country: name.to_string(),
            participations: games
                .iter()
                .map(|&(year, medals)| ParticipationRecord {
                    id: 0,
                    year,
                    city: String::new(),
                    medals_count: medals,
                    athlete_count: 10,
                })
                .collect(),
        }
    }

    fn state(records: Vec<CountryRecord>, generation: u64) -> DashboardState {
        DashboardState {
            snapshot: Arc::from(records),
            is_loading: false,
            generation,
        }
    }

    #[test]
    fn test_medal_series() {
        let records = vec![
            record("Italy", &[(2012, 28), (2016, 28), (2020, 40)]),
            record("Spain", &[(2012, 20)]),
        ];
        assert_eq!(
            medal_series(&records),
            vec![ChartPoint::new("Italy", 96), ChartPoint::new("Spain", 20)]
        );
    }

    #[test]
    fn test_count_olympic_years() {
        let records = vec![
            record("Italy", &[(2012, 1), (2016, 1)]),
            record("Spain", &[(2012, 1), (2020, 1)]),
            record("Chad", &[]),
        ];
        assert_eq!(count_olympic_years(&records), 3);
        assert_eq!(count_olympic_years(&[]), 0);
    }

    #[test]
    fn test_summary_assigns_palette_colors() {
        let palette = Palette::default();
        let records: Vec<CountryRecord> = (0..8).map(|i| record(&format!("C{}", i), &[(2000, i)])).collect();

        let summary = DashboardSummary::compute(&records, false, &palette);
        assert_eq!(summary.country_count, 8);
        assert_eq!(summary.olympic_count, 1);
        assert_eq!(summary.series[6].color, palette.color_for(0));
        assert_eq!(summary.series[7].value, 7);
    }

    #[test]
    fn test_aggregator_skips_malformed_update() {
        let mut aggregator = DashboardAggregator::new(Palette::default());
        assert!(aggregator.apply(&state(vec![record("Italy", &[(2012, 28)])], 1)));
        assert_eq!(aggregator.summary().country_count, 1);

        assert!(!aggregator.apply(&state(vec![record("Spain", &[]), record(" ", &[])], 2)));
        assert_eq!(aggregator.summary().series[0].name, "Italy");
    }

    #[test]
    fn test_rejected_update_still_tracks_loading() {
        let mut aggregator = DashboardAggregator::new(Palette::default());
        assert!(aggregator.apply(&state(vec![record("Italy", &[(2012, 28)])], 1)));
        assert!(!aggregator.summary().loading);

        let mut in_flight = state(vec![record("", &[])], 1);
        in_flight.is_loading = true;
        assert!(!aggregator.apply(&in_flight));
        assert!(aggregator.summary().loading);
        assert_eq!(aggregator.summary().series[0].name, "Italy");

        let mut settled = state(vec![record("", &[])], 2);
        settled.is_loading = false;
        assert!(!aggregator.apply(&settled));
        assert!(!aggregator.summary().loading);
    }

    #[test]
    fn test_aggregator_ignores_repeated_state() {
        let mut aggregator = DashboardAggregator::new(Palette::default());
        let current = state(vec![record("Italy", &[(2012, 28)])], 1);
        assert!(aggregator.apply(&current));
        assert!(!aggregator.apply(&current));
    }

    #[test]
    fn test_summary_serializes_camel_case() {
        let summary = DashboardSummary::compute(&[record("Italy", &[(2012, 28)])], false, &Palette::default());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["countryCount"], 1);
        assert_eq!(json["olympicCount"], 1);
        assert_eq!(json["series"][0]["value"], 28);
    }
}
