//! Country and participation records as loaded from the source payload.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// One country's statistics for a single Olympic games edition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipationRecord {
    #[serde(default)]
    pub id: u64,
    pub year: i32,
    pub city: String,
    pub medals_count: u32,
    pub athlete_count: u32,
}

/// A country's Olympic participation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryRecord {
    pub id: u64,
    pub country: String,
    pub participations: Vec<ParticipationRecord>,
}

impl CountryRecord {
    /// Sum of `medals_count` over every participation.
    pub fn total_medals(&self) -> u64 {
        self.participations.iter().map(|p| u64::from(p.medals_count)).sum()
    }

    /// Sum of `athlete_count` over every participation.
    pub fn total_athletes(&self) -> u64 {
        self.participations.iter().map(|p| u64::from(p.athlete_count)).sum()
    }

    /// A record is usable by the aggregators only when it names a country.
    pub fn is_well_formed(&self) -> bool {
        !self.country.trim().is_empty()
    }

    /// Drop participations whose year was already seen, keeping the first.
    fn dedupe_participations(&mut self) -> usize {
        let before = self.participations.len();
        let mut seen = HashSet::new();
        self.participations.retain(|p| seen.insert(p.year));
        before - self.participations.len()
    }
}

/// Remove repeated countries and repeated years within each country.
///
/// Keep-first on both levels, input order otherwise preserved.
pub fn dedupe(records: Vec<CountryRecord>) -> Vec<CountryRecord> {
    let mut seen = HashSet::new();
    let mut dropped_countries = 0usize;
    let mut dropped_years = 0usize;

    let cleaned: Vec<CountryRecord> = records
        .into_iter()
        .filter_map(|mut record| {
            if !seen.insert(record.country.clone()) {
                dropped_countries += 1;
                return None;
            }
            dropped_years += record.dedupe_participations();
            Some(record)
        })
        .collect();

    if dropped_countries > 0 || dropped_years > 0 {
        tracing::warn!(
            dropped_countries,
            dropped_years,
            "Removed duplicate entries from payload"
        );
    }

    cleaned
}
