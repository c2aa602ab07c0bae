//! Candidate pipeline: Leads → Interview → Formation, ending in hire or
//! deletion. The whole candidate list is one store document; every operation
//! loads it, mutates in memory, and writes it back wholesale.

mod import;

pub use import::ImportOutcome;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use log::info;
use serde_json::json;
use std::collections::HashMap;
use uuid::Uuid;

use crate::audit::AuditLog;
use crate::models::candidate::MAX_CALLS;
use crate::models::{Appointment, Candidate, Language, Recruiter, Role, Settings, Source, Stage};
use crate::notify::{render, NotifyPreview};
use crate::store::{keys, Store};
use crate::util::{format_phone, is_valid_lux_phone, to_ddmmyyyy};

pub struct NewCandidate {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub source: Source,
}

#[derive(Clone)]
pub struct Pipeline {
    store: Store,
    audit: AuditLog,
}

impl Pipeline {
    pub fn new(store: Store, audit: AuditLog) -> Self {
        Self { store, audit }
    }

    pub fn list(&self) -> Vec<Candidate> {
        self.store.get(keys::CANDIDATES, Vec::new())
    }

    pub fn by_stage(&self, stage: Stage) -> Vec<Candidate> {
        self.list()
            .into_iter()
            .filter(|c| c.stage == stage)
            .collect()
    }

    fn save(&self, candidates: &[Candidate]) -> Result<()> {
        self.store.set(keys::CANDIDATES, &candidates.to_vec())
    }

    fn validate_contact(name: &str, phone: &str, email: &str) -> Result<String> {
        if name.trim().is_empty() {
            bail!("candidate name is required");
        }
        if phone.trim().is_empty() && email.trim().is_empty() {
            bail!("at least one of phone or email is required");
        }
        if !email.trim().is_empty() && !email.contains('@') {
            bail!("'{email}' is not a valid email address");
        }
        let formatted = format_phone(phone);
        if formatted.starts_with("+352") && !is_valid_lux_phone(&formatted) {
            bail!("Luxembourg numbers must be +352 followed by 9 digits");
        }
        Ok(formatted)
    }

    /// Add a manually entered candidate at the top of the Leads list.
    pub fn add(&self, new: NewCandidate) -> Result<Candidate> {
        let phone = Self::validate_contact(&new.name, &new.phone, &new.email)?;
        let candidate = Candidate {
            id: Uuid::new_v4().to_string(),
            name: new.name.trim().to_string(),
            phone,
            email: new.email.trim().to_string(),
            source: new.source,
            stage: Stage::Leads,
            calls: 0,
            appointment: None,
            crewcode: None,
            created_at: Utc::now(),
        };

        let mut candidates = self.list();
        candidates.insert(0, candidate.clone());
        self.save(&candidates)?;
        self.audit.record(
            "inflow",
            "add",
            json!({ "id": candidate.id, "name": candidate.name }),
        );
        Ok(candidate)
    }

    /// Bulk import from a file's content; see `import.rs` for accepted formats.
    pub fn import(&self, content: &str) -> Result<ImportOutcome> {
        let rows = import::parse(content)?;
        let mut imported = Vec::new();
        for row in rows {
            // Rows without any contact channel are dropped, not rejected.
            if row.phone.trim().is_empty() && row.email.trim().is_empty() {
                continue;
            }
            imported.push(Candidate {
                id: Uuid::new_v4().to_string(),
                name: row.name,
                phone: format_phone(&row.phone),
                email: row.email,
                source: row.source,
                stage: Stage::Leads,
                calls: row.calls.min(MAX_CALLS),
                appointment: row.appointment,
                crewcode: None,
                created_at: Utc::now(),
            });
        }
        if imported.is_empty() {
            bail!("no valid rows found in the imported file");
        }

        let count = imported.len();
        let mut candidates = self.list();
        imported.extend(candidates.drain(..));
        self.save(&imported)?;
        self.audit
            .record("inflow", "import", json!({ "count": count }));
        info!("imported {count} candidate(s)");
        Ok(ImportOutcome { count })
    }

    fn update<F>(&self, id: &str, mutate: F) -> Result<Candidate>
    where
        F: FnOnce(&mut Candidate) -> Result<()>,
    {
        let mut candidates = self.list();
        let candidate = candidates
            .iter_mut()
            .find(|c| c.id == id)
            .with_context(|| format!("no candidate with id {id}"))?;
        mutate(candidate)?;
        let updated = candidate.clone();
        self.save(&candidates)?;
        Ok(updated)
    }

    pub fn set_email(&self, id: &str, email: &str) -> Result<Candidate> {
        self.update(id, |c| {
            if !email.trim().is_empty() && !email.contains('@') {
                bail!("'{email}' is not a valid email address");
            }
            c.email = email.trim().to_string();
            Ok(())
        })
    }

    pub fn set_phone(&self, id: &str, phone: &str) -> Result<Candidate> {
        self.update(id, |c| {
            let formatted = format_phone(phone);
            if formatted.starts_with("+352") && !is_valid_lux_phone(&formatted) {
                bail!("Luxembourg numbers must be +352 followed by 9 digits");
            }
            c.phone = formatted;
            Ok(())
        })
    }

    pub fn set_source(&self, id: &str, source: Source) -> Result<Candidate> {
        self.update(id, |c| {
            c.source = source;
            Ok(())
        })
    }

    /// Set or patch the appointment; a `None` half leaves that half untouched.
    pub fn set_appointment(
        &self,
        id: &str,
        date: Option<NaiveDate>,
        time: Option<String>,
    ) -> Result<Candidate> {
        self.update(id, |c| {
            let current = c.appointment.take().unwrap_or(Appointment {
                date: None,
                time: None,
            });
            c.appointment = Some(Appointment {
                date: date.or(current.date),
                time: time.or(current.time),
            });
            Ok(())
        })
    }

    /// Saturating call counter; a fourth attempt is a no-op.
    pub fn increment_calls(&self, id: &str) -> Result<u8> {
        let updated = self.update(id, |c| {
            if c.calls < MAX_CALLS {
                c.calls += 1;
            }
            Ok(())
        })?;
        self.audit.record(
            "inflow",
            "calls",
            json!({ "id": id, "calls": updated.calls }),
        );
        Ok(updated.calls)
    }

    /// Move a candidate one stage forward or backward. A move resets the
    /// appointment so stale slots are never carried between stages.
    pub fn move_stage(&self, id: &str, to: Stage) -> Result<Candidate> {
        let updated = self.update(id, |c| {
            if !c.stage.is_adjacent(to) {
                bail!(
                    "cannot move from {} to {}: stages only advance one step",
                    c.stage.as_str(),
                    to.as_str()
                );
            }
            c.stage = to;
            c.appointment = None;
            Ok(())
        })?;
        self.audit.record(
            "inflow",
            "move",
            json!({ "id": id, "stage": updated.stage.as_str() }),
        );
        Ok(updated)
    }

    /// Convert a Formation-stage candidate into a recruiter. The crewcode must
    /// be exactly five digits; anything else leaves the pipeline untouched.
    pub fn hire(&self, id: &str, crewcode: &str) -> Result<Recruiter> {
        let crewcode = crewcode.trim();
        if crewcode.len() != 5 || !crewcode.chars().all(|c| c.is_ascii_digit()) {
            bail!("crewcode must be exactly 5 digits");
        }

        let mut candidates = self.list();
        let position = candidates
            .iter()
            .position(|c| c.id == id)
            .with_context(|| format!("no candidate with id {id}"))?;
        if candidates[position].stage != Stage::Formation {
            bail!("only Formation-stage candidates can be hired");
        }
        let candidate = candidates.remove(position);

        let recruiter = Recruiter {
            id: Uuid::new_v4().to_string(),
            name: candidate.name.clone(),
            role: Role::RK,
            crewcode: crewcode.to_string(),
            active: true,
            avatar: None,
            commission: 1.0,
            hired_at: Utc::now(),
        };

        let mut recruiters: Vec<Recruiter> = self.store.get(keys::RECRUITERS, Vec::new());
        recruiters.push(recruiter.clone());
        self.store.set(keys::RECRUITERS, &recruiters)?;
        self.save(&candidates)?;
        self.audit.record(
            "inflow",
            "hire",
            json!({ "name": recruiter.name, "crewcode": recruiter.crewcode }),
        );
        info!("hired {} as {}", recruiter.name, recruiter.crewcode);
        Ok(recruiter)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        let mut candidates = self.list();
        let before = candidates.len();
        candidates.retain(|c| c.id != id);
        if candidates.len() == before {
            bail!("no candidate with id {id}");
        }
        self.save(&candidates)?;
        self.audit.record("inflow", "delete", json!({ "id": id }));
        Ok(())
    }

    /// Stage-dependent notify rule: Leads after the third call, Interview and
    /// Formation only once both appointment halves are set.
    pub fn notify_eligible(candidate: &Candidate) -> bool {
        match candidate.stage {
            Stage::Leads => candidate.calls == MAX_CALLS,
            Stage::Interview | Stage::Formation => candidate
                .appointment
                .as_ref()
                .is_some_and(Appointment::is_complete),
        }
    }

    /// Render the stage template for the candidate and log the simulated send.
    /// There is no transport; the audit entry is the whole delivery.
    pub fn notify(&self, id: &str, language: Language) -> Result<NotifyPreview> {
        let candidates = self.list();
        let candidate = candidates
            .iter()
            .find(|c| c.id == id)
            .with_context(|| format!("no candidate with id {id}"))?;
        if !Self::notify_eligible(candidate) {
            bail!("{} is not eligible for notification yet", candidate.name);
        }

        let settings: Settings = self.store.get(keys::SETTINGS, Settings::default());
        let appointment = candidate.appointment.clone().unwrap_or(Appointment {
            date: None,
            time: None,
        });
        let date = appointment
            .date
            .map(to_ddmmyyyy)
            .unwrap_or_else(|| to_ddmmyyyy(Utc::now().date_naive()));
        let time = appointment.time.unwrap_or_default();
        let vars = HashMap::from([
            ("name", candidate.name.clone()),
            ("date", date),
            ("time", time),
        ]);

        let template = settings
            .templates
            .for_stage(candidate.stage)
            .for_language(language);
        let preview = NotifyPreview {
            email: render(&template.email, &vars),
            sms: render(&template.sms, &vars),
            from_email: settings.notify_from.email.clone(),
            from_sms: settings.notify_from.phone.clone(),
            to_email: candidate.email.clone(),
            to_phone: candidate.phone.clone(),
        };

        self.audit.record(
            "inflow",
            "notify",
            json!({
                "id": candidate.id,
                "stage": candidate.stage.as_str(),
                "toEmail": preview.to_email,
                "toPhone": preview.to_phone,
                "email": preview.email,
                "sms": preview.sms,
            }),
        );
        Ok(preview)
    }
}
