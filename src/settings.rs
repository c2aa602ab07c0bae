//! Settings operations: rate bands, conversion targets, notification
//! templates and sender identities, the audit log viewer, and the
//! destructive cascade delete. The settings document is one store key;
//! every edit rewrites it whole.

use anyhow::{bail, Result};
use serde_json::json;

use crate::audit::AuditLog;
use crate::models::{
    AuditEntry, ConversionTargets, Language, NotifyFrom, RateBand, Settings, Stage,
};
use crate::roster::{CascadeOutcome, Roster};
use crate::store::{keys, Store};

#[derive(Clone)]
pub struct SettingsStore {
    store: Store,
    audit: AuditLog,
    roster: Roster,
}

impl SettingsStore {
    pub fn new(store: Store, audit: AuditLog, roster: Roster) -> Self {
        Self {
            store,
            audit,
            roster,
        }
    }

    pub fn get(&self) -> Settings {
        self.store.get(keys::SETTINGS, Settings::default())
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        self.store.set(keys::SETTINGS, settings)
    }

    /// Write the default document if settings have never been saved, so the
    /// file exists on disk from first launch.
    pub fn ensure_defaults(&self) -> Result<()> {
        let settings = self.get();
        self.save(&settings)
    }

    pub fn set_projects(&self, projects: Vec<String>) -> Result<()> {
        let mut settings = self.get();
        settings.projects = projects;
        self.save(&settings)?;
        self.audit
            .record("settings", "projects", json!({ "count": settings.projects.len() }));
        Ok(())
    }

    /// Replace the rate bands. Bands are stored sorted by effective date so
    /// the rate lookup stays a simple reverse scan.
    pub fn set_rate_bands(&self, mut bands: Vec<RateBand>) -> Result<()> {
        if bands.is_empty() {
            bail!("at least one rate band is required");
        }
        bands.sort_by_key(|band| band.start);
        let mut settings = self.get();
        settings.rate_bands = bands;
        self.save(&settings)?;
        self.audit.record(
            "settings",
            "rate-bands",
            json!({ "count": settings.rate_bands.len() }),
        );
        Ok(())
    }

    pub fn set_conversion(&self, conversion: ConversionTargets) -> Result<()> {
        let mut settings = self.get();
        settings.conversion = conversion;
        self.save(&settings)?;
        self.audit.record("settings", "conversion", json!({}));
        Ok(())
    }

    pub fn set_template(
        &self,
        stage: Stage,
        language: Language,
        email: String,
        sms: String,
    ) -> Result<()> {
        let mut settings = self.get();
        let template = settings
            .templates
            .for_stage_mut(stage)
            .for_language_mut(language);
        template.email = email;
        template.sms = sms;
        self.save(&settings)?;
        self.audit
            .record("settings", "template", json!({ "stage": stage.as_str() }));
        Ok(())
    }

    pub fn set_notify_from(&self, notify_from: NotifyFrom) -> Result<()> {
        let mut settings = self.get();
        settings.notify_from = notify_from;
        self.save(&settings)?;
        self.audit.record("settings", "notify-from", json!({}));
        Ok(())
    }

    /// Danger zone: remove a recruiter everywhere. See
    /// `Roster::cascade_delete` for what gets touched.
    pub fn delete_recruiter(&self, crewcode: &str) -> Result<CascadeOutcome> {
        self.roster.cascade_delete(crewcode)
    }

    /// Newest-first audit log for the viewer.
    pub fn audit_log(&self) -> Vec<AuditEntry> {
        self.audit.list()
    }
}
