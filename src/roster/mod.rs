//! Recruiter roster: list filters, field mutators, and the derived
//! performance aggregates joined from planning history. Aggregates are
//! recomputed on every read; deleting planning data is therefore reflected
//! immediately without invalidation logic.

pub mod matching;

use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD as B64, Engine};
use chrono::{Days, NaiveDate, Utc};
use log::info;
use serde_json::json;

use crate::audit::AuditLog;
use crate::models::{Candidate, HistoryRow, PlanningDay, Recruiter, Role};
use crate::store::{keys, Store};
use crate::util::round2;

use matching::entry_matches;

/// Trailing window for the box conversion percentages: 8 weeks.
const BOX_WINDOW_DAYS: u64 = 56;

/// Up to this many recent scores make up the "Form" strip.
const FORM_LEN: usize = 5;

pub const BOX2_TARGET_PCT: f64 = 70.0;
pub const BOX4_TARGET_PCT: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterView {
    Active,
    Inactive,
    All,
}

/// Derived aggregates for one recruiter.
#[derive(Debug, Clone, PartialEq)]
pub struct Performance {
    /// Most recent scores (up to 5), oldest to newest: reads chronologically,
    /// unlike the history table which reads newest-first.
    pub form: Vec<u32>,
    /// Mean of the form scores, 2 decimals.
    pub average: f64,
    /// 100 · Σ(box2+box2s) / Σscore over the trailing 8-week window.
    pub box2_pct: f64,
    /// 100 · Σ(box4+box4s) / Σ(box2+box2s) over the same window.
    pub box4_pct: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CascadeOutcome {
    pub recruiters_removed: usize,
    pub candidates_removed: usize,
    pub shift_entries_removed: usize,
    pub history_rows_removed: usize,
}

#[derive(Clone)]
pub struct Roster {
    store: Store,
    audit: AuditLog,
}

impl Roster {
    pub fn new(store: Store, audit: AuditLog) -> Self {
        Self { store, audit }
    }

    pub fn list(&self, view: RosterView) -> Vec<Recruiter> {
        let recruiters: Vec<Recruiter> = self.store.get(keys::RECRUITERS, Vec::new());
        recruiters
            .into_iter()
            .filter(|r| match view {
                RosterView::Active => r.active,
                RosterView::Inactive => !r.active,
                RosterView::All => true,
            })
            .collect()
    }

    fn update<F>(&self, id: &str, mutate: F) -> Result<Recruiter>
    where
        F: FnOnce(&mut Recruiter),
    {
        let mut recruiters: Vec<Recruiter> = self.store.get(keys::RECRUITERS, Vec::new());
        let recruiter = recruiters
            .iter_mut()
            .find(|r| r.id == id)
            .with_context(|| format!("no recruiter with id {id}"))?;
        mutate(recruiter);
        let updated = recruiter.clone();
        self.store.set(keys::RECRUITERS, &recruiters)?;
        Ok(updated)
    }

    pub fn rename(&self, id: &str, name: &str) -> Result<Recruiter> {
        if name.trim().is_empty() {
            bail!("recruiter name cannot be empty");
        }
        let updated = self.update(id, |r| r.name = name.trim().to_string())?;
        self.audit
            .record("roster", "rename", json!({ "id": id, "name": updated.name }));
        Ok(updated)
    }

    pub fn set_role(&self, id: &str, role: Role) -> Result<Recruiter> {
        let updated = self.update(id, |r| r.role = role)?;
        self.audit
            .record("roster", "role", json!({ "id": id, "role": role.as_str() }));
        Ok(updated)
    }

    pub fn set_crewcode(&self, id: &str, crewcode: &str) -> Result<Recruiter> {
        let crewcode = crewcode.trim();
        if crewcode.len() != 5 || !crewcode.chars().all(|c| c.is_ascii_digit()) {
            bail!("crewcode must be exactly 5 digits");
        }
        let updated = self.update(id, |r| r.crewcode = crewcode.to_string())?;
        self.audit
            .record("roster", "crewcode", json!({ "id": id, "crewcode": crewcode }));
        Ok(updated)
    }

    pub fn set_commission(&self, id: &str, commission: f64) -> Result<Recruiter> {
        let updated = self.update(id, |r| r.commission = commission)?;
        self.audit.record(
            "roster",
            "commission",
            json!({ "id": id, "commission": commission }),
        );
        Ok(updated)
    }

    /// Toggle active/inactive. No cascading side effects beyond list filtering.
    pub fn set_active(&self, id: &str, active: bool) -> Result<Recruiter> {
        let updated = self.update(id, |r| r.active = active)?;
        self.audit
            .record("roster", "status", json!({ "id": id, "active": active }));
        Ok(updated)
    }

    /// Store an avatar inline as a `data:` URI; no separate blob store.
    pub fn set_avatar(&self, id: &str, mime: &str, bytes: &[u8]) -> Result<Recruiter> {
        let uri = format!("data:{mime};base64,{}", B64.encode(bytes));
        let updated = self.update(id, |r| r.avatar = Some(uri))?;
        self.audit.record("roster", "avatar", json!({ "id": id }));
        Ok(updated)
    }

    pub fn remove_avatar(&self, id: &str) -> Result<Recruiter> {
        let updated = self.update(id, |r| r.avatar = None)?;
        self.audit
            .record("roster", "avatar-removed", json!({ "id": id }));
        Ok(updated)
    }

    /// All planning shift entries belonging to this recruiter, newest first.
    fn matched_rows(&self, recruiter: &Recruiter) -> Vec<(NaiveDate, crate::models::ShiftEntry)> {
        let days: Vec<PlanningDay> = self.store.get(keys::PLANNING, Vec::new());
        let mut rows: Vec<(NaiveDate, crate::models::ShiftEntry)> = days
            .iter()
            .flat_map(|day| {
                day.all_entries()
                    .filter(|entry| {
                        entry_matches(
                            &recruiter.name,
                            &recruiter.crewcode,
                            &entry.name,
                            entry.crewcode.as_deref(),
                        )
                    })
                    .map(|entry| (day.date, entry.clone()))
                    .collect::<Vec<_>>()
            })
            .collect();
        rows.sort_by(|a, b| b.0.cmp(&a.0));
        rows
    }

    pub fn performance(&self, id: &str) -> Result<Performance> {
        self.performance_as_of(id, Utc::now().date_naive())
    }

    /// A recruiter with no matched rows gets empty/zero aggregates, never an
    /// error (join misses are an expected state).
    pub fn performance_as_of(&self, id: &str, today: NaiveDate) -> Result<Performance> {
        let recruiters: Vec<Recruiter> = self.store.get(keys::RECRUITERS, Vec::new());
        let recruiter = recruiters
            .iter()
            .find(|r| r.id == id)
            .with_context(|| format!("no recruiter with id {id}"))?;

        let rows = self.matched_rows(recruiter);

        let mut form: Vec<u32> = rows
            .iter()
            .take(FORM_LEN)
            .map(|(_, entry)| entry.score)
            .collect();
        form.reverse(); // newest-first rows, rendered oldest to newest

        let average = if form.is_empty() {
            0.0
        } else {
            round2(form.iter().sum::<u32>() as f64 / form.len() as f64)
        };

        let cutoff = today
            .checked_sub_days(Days::new(BOX_WINDOW_DAYS))
            .unwrap_or(today);
        let window: Vec<_> = rows
            .iter()
            .filter(|(date, _)| *date >= cutoff)
            .map(|(_, entry)| entry)
            .collect();
        let score_sum: u32 = window.iter().map(|e| e.score).sum();
        let box2_sum: u32 = window.iter().map(|e| e.box2 + e.box2s).sum();
        let box4_sum: u32 = window.iter().map(|e| e.box4 + e.box4s).sum();

        let box2_pct = if score_sum == 0 {
            0.0
        } else {
            round2(100.0 * box2_sum as f64 / score_sum as f64)
        };
        let box4_pct = if box2_sum == 0 {
            0.0
        } else {
            round2(100.0 * box4_sum as f64 / box2_sum as f64)
        };

        Ok(Performance {
            form,
            average,
            box2_pct,
            box4_pct,
        })
    }

    /// Matched history rows for the Info dialog, newest first.
    pub fn history(&self, id: &str) -> Result<Vec<HistoryRow>> {
        let recruiters: Vec<Recruiter> = self.store.get(keys::RECRUITERS, Vec::new());
        let recruiter = recruiters
            .iter()
            .find(|r| r.id == id)
            .with_context(|| format!("no recruiter with id {id}"))?;

        let rows: Vec<HistoryRow> = self.store.get(keys::HISTORY, Vec::new());
        let mut matched: Vec<HistoryRow> = rows
            .into_iter()
            .filter(|row| {
                entry_matches(
                    &recruiter.name,
                    &recruiter.crewcode,
                    &row.name,
                    row.crewcode.as_deref(),
                )
            })
            .collect();
        matched.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(matched)
    }

    /// Remove a recruiter everywhere: roster record, pipeline candidates with
    /// the crewcode, planning shift entries, and history rows. All new store
    /// values are computed before anything is written, so a skipped step can
    /// never leave ghost rows for the join to resurrect.
    pub fn cascade_delete(&self, crewcode: &str) -> Result<CascadeOutcome> {
        let crewcode = crewcode.trim();
        if crewcode.is_empty() {
            bail!("a crewcode is required to delete a recruiter");
        }

        let recruiters: Vec<Recruiter> = self.store.get(keys::RECRUITERS, Vec::new());
        let target = recruiters
            .iter()
            .find(|r| r.crewcode == crewcode)
            .with_context(|| format!("no recruiter with crewcode {crewcode}"))?
            .clone();

        let kept_recruiters: Vec<Recruiter> = recruiters
            .iter()
            .filter(|r| r.crewcode != crewcode)
            .cloned()
            .collect();

        let candidates: Vec<Candidate> = self.store.get(keys::CANDIDATES, Vec::new());
        let kept_candidates: Vec<Candidate> = candidates
            .iter()
            .filter(|c| c.crewcode.as_deref() != Some(crewcode))
            .cloned()
            .collect();

        let days: Vec<PlanningDay> = self.store.get(keys::PLANNING, Vec::new());
        let mut entries_removed = 0usize;
        let kept_days: Vec<PlanningDay> = days
            .into_iter()
            .map(|mut day| {
                for zone in &mut day.zones {
                    let before = zone.entries.len();
                    zone.entries.retain(|entry| {
                        !entry_matches(
                            &target.name,
                            &target.crewcode,
                            &entry.name,
                            entry.crewcode.as_deref(),
                        )
                    });
                    entries_removed += before - zone.entries.len();
                }
                day
            })
            .collect();

        let history: Vec<HistoryRow> = self.store.get(keys::HISTORY, Vec::new());
        let kept_history: Vec<HistoryRow> = history
            .iter()
            .filter(|row| {
                !entry_matches(
                    &target.name,
                    &target.crewcode,
                    &row.name,
                    row.crewcode.as_deref(),
                )
            })
            .cloned()
            .collect();

        let outcome = CascadeOutcome {
            recruiters_removed: recruiters.len() - kept_recruiters.len(),
            candidates_removed: candidates.len() - kept_candidates.len(),
            shift_entries_removed: entries_removed,
            history_rows_removed: history.len() - kept_history.len(),
        };

        self.store.set(keys::RECRUITERS, &kept_recruiters)?;
        self.store.set(keys::CANDIDATES, &kept_candidates)?;
        self.store.set(keys::PLANNING, &kept_days)?;
        self.store.set(keys::HISTORY, &kept_history)?;

        self.audit.record(
            "settings",
            "cascade-delete",
            json!({
                "crewcode": crewcode,
                "name": target.name,
                "recruiters": outcome.recruiters_removed,
                "candidates": outcome.candidates_removed,
                "shiftEntries": outcome.shift_entries_removed,
                "historyRows": outcome.history_rows_removed,
            }),
        );
        info!("cascade-deleted recruiter {crewcode} ({})", target.name);
        Ok(outcome)
    }
}

/// Green/red threshold helpers for the roster pills.
pub fn box2_on_target(pct: f64) -> bool {
    pct >= BOX2_TARGET_PCT
}

pub fn box4_on_target(pct: f64) -> bool {
    pct >= BOX4_TARGET_PCT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Mult, ShiftEntry, Zone};
    use uuid::Uuid;

    fn roster() -> Roster {
        let dir = std::env::temp_dir().join(format!("proago-roster-{}", Uuid::new_v4()));
        let store = Store::new(dir).unwrap();
        let audit = AuditLog::new(store.clone());
        Roster::new(store, audit)
    }

    fn seed_recruiter(roster: &Roster, name: &str, crewcode: &str) -> Recruiter {
        let recruiter = Recruiter {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            role: Role::RK,
            crewcode: crewcode.to_string(),
            active: true,
            avatar: None,
            commission: 1.0,
            hired_at: Utc::now(),
        };
        let mut all: Vec<Recruiter> = roster.store.get(keys::RECRUITERS, Vec::new());
        all.push(recruiter.clone());
        roster.store.set(keys::RECRUITERS, &all).unwrap();
        recruiter
    }

    fn day_with_entry(date: NaiveDate, entry: ShiftEntry) -> PlanningDay {
        PlanningDay {
            date,
            zones: vec![Zone {
                name: "Gare".into(),
                mult: Mult::X100,
                entries: vec![entry],
            }],
        }
    }

    fn entry(name: &str, code: Option<&str>, score: u32, box2: u32, box4: u32) -> ShiftEntry {
        ShiftEntry {
            name: name.into(),
            crewcode: code.map(String::from),
            score,
            box2,
            box4,
            ..ShiftEntry::default()
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn view_filters_on_active_flag() {
        let r = roster();
        let a = seed_recruiter(&r, "Jane Doe", "11111");
        seed_recruiter(&r, "John Roe", "22222");
        r.set_active(&a.id, false).unwrap();

        assert_eq!(r.list(RosterView::Active).len(), 1);
        assert_eq!(r.list(RosterView::Inactive).len(), 1);
        assert_eq!(r.list(RosterView::All).len(), 2);
    }

    #[test]
    fn crewcode_mutator_enforces_five_digits() {
        let r = roster();
        let a = seed_recruiter(&r, "Jane Doe", "11111");
        assert!(r.set_crewcode(&a.id, "123").is_err());
        assert!(r.set_crewcode(&a.id, "54321").is_ok());
    }

    #[test]
    fn avatar_round_trip_as_data_uri() {
        let r = roster();
        let a = seed_recruiter(&r, "Jane Doe", "11111");
        let updated = r.set_avatar(&a.id, "image/png", &[1, 2, 3]).unwrap();
        let uri = updated.avatar.unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
        let cleared = r.remove_avatar(&a.id).unwrap();
        assert!(cleared.avatar.is_none());
    }

    #[test]
    fn performance_form_reads_oldest_to_newest() {
        let r = roster();
        let a = seed_recruiter(&r, "Jane Doe", "11111");
        let days: Vec<PlanningDay> = (1..=6)
            .map(|d| {
                day_with_entry(
                    date(2025, 6, d),
                    entry("Jane Doe", Some("11111"), d, 0, 0),
                )
            })
            .collect();
        r.store.set(keys::PLANNING, &days).unwrap();

        let perf = r.performance_as_of(&a.id, date(2025, 6, 7)).unwrap();
        // Six shifts: the oldest falls off, the rest read chronologically.
        assert_eq!(perf.form, vec![2, 3, 4, 5, 6]);
        assert_eq!(perf.average, 4.0);
    }

    #[test]
    fn box_percentages_use_eight_week_window() {
        let r = roster();
        let a = seed_recruiter(&r, "Jane Doe", "11111");
        let days = vec![
            // Inside the window: 10 score, 7 box2, 3 box4.
            day_with_entry(date(2025, 6, 1), entry("Jane Doe", Some("11111"), 10, 7, 3)),
            // Far outside the window; must not count.
            day_with_entry(date(2024, 1, 1), entry("Jane Doe", Some("11111"), 100, 0, 0)),
        ];
        r.store.set(keys::PLANNING, &days).unwrap();

        let perf = r.performance_as_of(&a.id, date(2025, 6, 10)).unwrap();
        assert_eq!(perf.box2_pct, 70.0);
        assert_eq!(perf.box4_pct, round2(100.0 * 3.0 / 7.0));
        assert!(box2_on_target(perf.box2_pct));
        assert!(box4_on_target(perf.box4_pct));
    }

    #[test]
    fn unmatched_recruiter_gets_zero_aggregates() {
        let r = roster();
        let a = seed_recruiter(&r, "Jane Doe", "11111");
        let perf = r.performance_as_of(&a.id, date(2025, 6, 10)).unwrap();
        assert!(perf.form.is_empty());
        assert_eq!(perf.average, 0.0);
        assert_eq!(perf.box2_pct, 0.0);
        assert_eq!(perf.box4_pct, 0.0);
    }

    #[test]
    fn cascade_delete_purges_all_stores() {
        let r = roster();
        let target = seed_recruiter(&r, "Jane Doe", "11111");
        seed_recruiter(&r, "John Roe", "22222");

        let days = vec![day_with_entry(
            date(2025, 6, 1),
            entry("Jane Doe", Some("11111"), 5, 2, 1),
        )];
        r.store.set(keys::PLANNING, &days).unwrap();
        let history = vec![HistoryRow {
            crewcode: Some("11111".into()),
            name: "Jane Doe".into(),
            date: date(2025, 6, 1),
            project: "Hello Fresh".into(),
            zones: vec!["Gare".into()],
            mult: Mult::X100,
            hours: 6.0,
            score: 5,
            box2: 2,
            box2s: 0,
            box4: 1,
            box4s: 0,
            game: 0.0,
        }];
        r.store.set(keys::HISTORY, &history).unwrap();

        let outcome = r.cascade_delete("11111").unwrap();
        assert_eq!(outcome.recruiters_removed, 1);
        assert_eq!(outcome.shift_entries_removed, 1);
        assert_eq!(outcome.history_rows_removed, 1);

        assert_eq!(r.list(RosterView::All).len(), 1);
        let days: Vec<PlanningDay> = r.store.get(keys::PLANNING, Vec::new());
        assert!(days[0].all_entries().next().is_none());
        let history: Vec<HistoryRow> = r.store.get(keys::HISTORY, Vec::new());
        assert!(history.is_empty());
        assert_eq!(target.crewcode, "11111");
    }

    #[test]
    fn cascade_delete_unknown_crewcode_is_an_error() {
        let r = roster();
        assert!(r.cascade_delete("99999").is_err());
    }
}
