//! Chart-widget data shapes.
//!
//! Any category/series chart accepts these: `{name, value}` for pie and bar
//! charts, `{name, series: [{name, value}]}` for line charts.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub name: String,
    pub value: u64,
}

impl ChartPoint {
    pub fn new(name: impl Into<String>, value: u64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub name: String,
    pub series: Vec<ChartPoint>,
}
