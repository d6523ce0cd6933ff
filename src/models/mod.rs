//! Data model.
//!
//! # Records
//! ```text
//! CountryRecord { id, country, participations[] }
//!     └── ParticipationRecord { id, year, city, medalsCount, athleteCount }
//! ```
//!
//! # Design Decisions
//! - Records are immutable values once published
//! - Keys: `country` within a collection, `year` within a country
//! - Duplicates are removed keep-first before a snapshot is published

pub mod olympic;

pub use olympic::{dedupe, CountryRecord, ParticipationRecord};
