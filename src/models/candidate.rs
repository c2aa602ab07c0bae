//! Candidate pipeline records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Pipeline position. A candidate is in exactly one stage; the enum is the
/// single source of truth (membership in parallel lists cannot enforce that).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    Leads,
    Interview,
    Formation,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Leads => "leads",
            Stage::Interview => "interview",
            Stage::Formation => "formation",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Stage::Leads => 0,
            Stage::Interview => 1,
            Stage::Formation => 2,
        }
    }

    /// Stage moves are monotonic: only one step forward or backward.
    pub fn is_adjacent(&self, other: Stage) -> bool {
        self.rank().abs_diff(other.rank()) == 1
    }

    pub fn is_forward_of(&self, other: Stage) -> bool {
        self.rank() > other.rank()
    }
}

/// Where the lead came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum Source {
    Indeed,
    Street,
    Referral,
    #[default]
    Other,
}

impl Source {
    pub fn parse(raw: &str) -> Source {
        match raw.trim().to_lowercase().as_str() {
            "indeed" => Source::Indeed,
            "street" => Source::Street,
            "referral" => Source::Referral,
            _ => Source::Other,
        }
    }
}

/// Scheduled interview or formation slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub date: Option<NaiveDate>,
    /// Free-text HH:MM, kept as entered.
    pub time: Option<String>,
}

impl Appointment {
    pub fn is_complete(&self) -> bool {
        self.date.is_some() && self.time.as_deref().is_some_and(|t| !t.is_empty())
    }
}

pub const MAX_CALLS: u8 = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub source: Source,
    pub stage: Stage,
    /// Call attempts, clamped to [0, 3].
    pub calls: u8,
    pub appointment: Option<Appointment>,
    /// Set when an operator pre-assigns a crewcode before hire.
    pub crewcode: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Candidate {
    pub fn has_contact(&self) -> bool {
        !self.phone.trim().is_empty() || !self.email.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacency_is_one_step_only() {
        assert!(Stage::Leads.is_adjacent(Stage::Interview));
        assert!(Stage::Formation.is_adjacent(Stage::Interview));
        assert!(!Stage::Leads.is_adjacent(Stage::Formation));
        assert!(!Stage::Interview.is_adjacent(Stage::Interview));
    }

    #[test]
    fn appointment_completeness_requires_both_halves() {
        let date = chrono::NaiveDate::from_ymd_opt(2025, 6, 1);
        assert!(!Appointment { date, time: None }.is_complete());
        assert!(!Appointment {
            date: None,
            time: Some("14:00".into())
        }
        .is_complete());
        assert!(Appointment {
            date,
            time: Some("14:00".into())
        }
        .is_complete());
    }
}
