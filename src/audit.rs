//! Append-only audit log over the store. Every mutating user action across the
//! modules records one entry; the Settings viewer lists them newest first.

use anyhow::Result;
use chrono::Utc;
use log::warn;

use crate::models::AuditEntry;
use crate::store::{keys, Store};

#[derive(Clone)]
pub struct AuditLog {
    store: Store,
}

impl AuditLog {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Append one entry. Failures are logged and swallowed: losing an audit
    /// line must never abort the user action that produced it.
    pub fn record(&self, area: &str, action: &str, context: serde_json::Value) {
        if let Err(err) = self.try_record(area, action, context) {
            warn!("audit write failed for {area}/{action}: {err}");
        }
    }

    fn try_record(&self, area: &str, action: &str, context: serde_json::Value) -> Result<()> {
        let mut entries: Vec<AuditEntry> = self.store.get(keys::AUDIT, Vec::new());
        entries.push(AuditEntry {
            area: area.to_string(),
            action: action.to_string(),
            context,
            at: Utc::now(),
        });
        self.store.set(keys::AUDIT, &entries)
    }

    /// Newest-first listing for the log viewer.
    pub fn list(&self) -> Vec<AuditEntry> {
        let mut entries: Vec<AuditEntry> = self.store.get(keys::AUDIT, Vec::new());
        entries.reverse();
        entries
    }
}
