//! Planning sheet records: one day, up to three zones, up to three shift
//! entries per zone.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const MAX_ZONES: usize = 3;
pub const MAX_ENTRIES_PER_ZONE: usize = 3;

/// Zone pay multiplier, one of the fixed percentage steps.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Mult {
    #[default]
    #[serde(rename = "100%")]
    X100,
    #[serde(rename = "125%")]
    X125,
    #[serde(rename = "150%")]
    X150,
    #[serde(rename = "200%")]
    X200,
}

impl Mult {
    pub fn label(&self) -> &'static str {
        match self {
            Mult::X100 => "100%",
            Mult::X125 => "125%",
            Mult::X150 => "150%",
            Mult::X200 => "200%",
        }
    }

    pub fn factor(&self) -> f64 {
        match self {
            Mult::X100 => 1.0,
            Mult::X125 => 1.25,
            Mult::X150 => 1.5,
            Mult::X200 => 2.0,
        }
    }

    pub fn parse(raw: &str) -> Option<Mult> {
        match raw.trim() {
            "100%" | "100" => Some(Mult::X100),
            "125%" | "125" => Some(Mult::X125),
            "150%" | "150" => Some(Mult::X150),
            "200%" | "200" => Some(Mult::X200),
            _ => None,
        }
    }
}

/// One recruiter's shift line inside a zone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ShiftEntry {
    pub name: String,
    pub crewcode: Option<String>,
    pub hours: f64,
    pub score: u32,
    pub box2: u32,
    /// Box 2 starred: discounted-price sub-category of box 2.
    pub box2s: u32,
    pub box4: u32,
    pub box4s: u32,
    /// Sales-game revenue attributed to the shift.
    pub game: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub name: String,
    pub mult: Mult,
    pub entries: Vec<ShiftEntry>,
}

impl Zone {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mult: Mult::X100,
            entries: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanningDay {
    pub date: NaiveDate,
    pub zones: Vec<Zone>,
}

impl PlanningDay {
    /// Fresh day as the edit dialog opens it: one empty zone.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            zones: vec![Zone::new("")],
        }
    }

    pub fn all_entries(&self) -> impl Iterator<Item = &ShiftEntry> {
        self.zones.iter().flat_map(|zone| zone.entries.iter())
    }
}
