//! Aggregation subsystem.
//!
//! # Data Flow
//! ```text
//! DashboardState (from source::service)
//!     → summary.rs (medal totals, distinct years, country count)
//!     → palette.rs (colour per country, selection events)
//!
//! CountryRecord (from a lookup)
//!     → detail.rs (totals, medal series, y-axis range)
//!     → DetailOutcome::Found | NotFound
//! ```
//!
//! # Design Decisions
//! - Pure functions over the snapshot; no I/O here
//! - Output shapes (chart.rs) are chart-library agnostic
//! - Colours depend on snapshot order, nothing else

pub mod chart;
pub mod detail;
pub mod palette;
pub mod summary;

pub use chart::{ChartPoint, ChartSeries};
pub use detail::{AxisRange, CountryDetail, DetailOutcome};
pub use palette::{DisplayColor, Palette, SelectionEvent};
pub use summary::{DashboardAggregator, DashboardSummary};
