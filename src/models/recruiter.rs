//! Recruiter roster records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role ladder, ascending seniority: rookie up to branch manager.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Role {
    RK,
    PR,
    PC,
    TC,
    SM,
    BM,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::RK => "RK",
            Role::PR => "PR",
            Role::PC => "PC",
            Role::TC => "TC",
            Role::SM => "SM",
            Role::BM => "BM",
        }
    }

    pub fn parse(raw: &str) -> Option<Role> {
        match raw.trim().to_uppercase().as_str() {
            "RK" => Some(Role::RK),
            "PR" => Some(Role::PR),
            "PC" => Some(Role::PC),
            "TC" => Some(Role::TC),
            "SM" => Some(Role::SM),
            "BM" => Some(Role::BM),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recruiter {
    pub id: String,
    pub name: String,
    pub role: Role,
    /// Five-digit operator-assigned code; the reliable join key across stores.
    pub crewcode: String,
    pub active: bool,
    /// Inline `data:<mime>;base64,...` URI; no separate blob store.
    pub avatar: Option<String>,
    pub commission: f64,
    pub hired_at: DateTime<Utc>,
}
