//! Proago: a small internal recruiting CRM core. Candidates move through a
//! Leads / Interview / Formation pipeline, hires become recruiters, planning
//! sheets record daily shifts, and pay is aggregated from the shift history.
//! Everything persists as JSON documents under one data directory.

pub mod audit;
pub mod finance;
pub mod models;
pub mod notify;
pub mod pipeline;
pub mod planning;
pub mod report;
pub mod roster;
pub mod settings;
pub mod store;
pub mod util;

use std::path::PathBuf;

use anyhow::Result;

pub use audit::AuditLog;
pub use finance::{Finance, PayLine, PaySummary};
pub use notify::NotifyPreview;
pub use pipeline::{ImportOutcome, NewCandidate, Pipeline};
pub use planning::{EntryField, Planning};
pub use report::ReportKind;
pub use roster::{CascadeOutcome, Performance, Roster, RosterView};
pub use settings::SettingsStore;
pub use store::Store;

/// Initialize logging (reads RUST_LOG env var).
pub fn init_logging() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
}

/// One handle per domain area, all sharing the same store and audit log.
pub struct App {
    pub pipeline: Pipeline,
    pub roster: Roster,
    pub planning: Planning,
    pub finance: Finance,
    pub settings: SettingsStore,
}

impl App {
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        let store = Store::new(data_dir)?;
        let audit = AuditLog::new(store.clone());
        let roster = Roster::new(store.clone(), audit.clone());
        let app = Self {
            pipeline: Pipeline::new(store.clone(), audit.clone()),
            roster: roster.clone(),
            planning: Planning::new(store.clone(), audit.clone()),
            finance: Finance::new(store.clone()),
            settings: SettingsStore::new(store, audit, roster),
        };
        app.settings.ensure_defaults()?;
        Ok(app)
    }
}
