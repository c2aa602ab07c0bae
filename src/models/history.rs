//! Denormalized per-shift history rows, rebuilt from a planning day on every
//! commit. The roster Info view and the finance aggregation read these.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::planning::Mult;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRow {
    pub crewcode: Option<String>,
    pub name: String,
    pub date: NaiveDate,
    pub project: String,
    pub zones: Vec<String>,
    pub mult: Mult,
    pub hours: f64,
    pub score: u32,
    pub box2: u32,
    pub box2s: u32,
    pub box4: u32,
    pub box4s: u32,
    pub game: f64,
}
