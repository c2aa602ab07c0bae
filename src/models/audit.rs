//! Append-only audit log entries. Written on every mutating action; read only
//! by the Settings log viewer, never replayed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    /// Which module produced the entry: "inflow", "roster", "planning", ...
    pub area: String,
    pub action: String,
    pub context: serde_json::Value,
    pub at: DateTime<Utc>,
}
