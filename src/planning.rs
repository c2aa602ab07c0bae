//! Planning sheet: per-day zones and shift entries, edited as a draft and
//! committed explicitly. The box-count invariant is clamped on every edit,
//! never rejected: `box2 + box2s <= score` and `box4 + box4s <= box2 + box2s`,
//! with violating pairs proportionally scaled down (floor division).

use anyhow::{bail, Result};
use chrono::NaiveDate;
use log::info;
use serde_json::json;

use crate::audit::AuditLog;
use crate::models::planning::{MAX_ENTRIES_PER_ZONE, MAX_ZONES};
use crate::models::{HistoryRow, PlanningDay, Settings, ShiftEntry, Zone};
use crate::store::{keys, Store};
use crate::util::{parse_comma_number, round2, sanitize_numeric, to_ddmmyyyy};

/// Editable numeric columns of a shift entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryField {
    Hours,
    Score,
    Box2,
    Box2s,
    Box4,
    Box4s,
    Game,
}

/// Scale `a` and `b` down proportionally (floor) until their sum fits `cap`.
/// Intermediate arithmetic runs in u64 so large entered counts clamp instead
/// of overflowing.
fn scale_pair(a: &mut u32, b: &mut u32, cap: u32) {
    let sum = *a as u64 + *b as u64;
    if sum > cap as u64 {
        *a = (*a as u64 * cap as u64 / sum) as u32;
        *b = (*b as u64 * cap as u64 / sum) as u32;
    }
}

/// Re-establish the box-count invariant on one entry. Pure, so it is
/// unit-testable without any store or UI around it.
pub fn clamp_entry(entry: &mut ShiftEntry) {
    scale_pair(&mut entry.box2, &mut entry.box2s, entry.score);
    let box2_total = entry.box2 + entry.box2s;
    scale_pair(&mut entry.box4, &mut entry.box4s, box2_total);
}

/// Draft mutators. The day being edited is a deep copy; nothing touches the
/// store until `Planning::commit_day`.
pub fn add_zone(day: &mut PlanningDay) -> Result<()> {
    if day.zones.len() >= MAX_ZONES {
        bail!("a day holds at most {MAX_ZONES} zones");
    }
    day.zones.push(Zone::new(""));
    Ok(())
}

pub fn remove_zone(day: &mut PlanningDay, index: usize) -> Result<()> {
    if index >= day.zones.len() {
        bail!("no zone at index {index}");
    }
    day.zones.remove(index);
    Ok(())
}

pub fn add_entry(day: &mut PlanningDay, zone: usize) -> Result<()> {
    let zone = day
        .zones
        .get_mut(zone)
        .ok_or_else(|| anyhow::anyhow!("no zone at index {zone}"))?;
    if zone.entries.len() >= MAX_ENTRIES_PER_ZONE {
        bail!("a zone holds at most {MAX_ENTRIES_PER_ZONE} recruiters");
    }
    zone.entries.push(ShiftEntry::default());
    Ok(())
}

pub fn remove_entry(day: &mut PlanningDay, zone: usize, index: usize) -> Result<()> {
    let zone = day
        .zones
        .get_mut(zone)
        .ok_or_else(|| anyhow::anyhow!("no zone at index {zone}"))?;
    if index >= zone.entries.len() {
        bail!("no entry at index {index}");
    }
    zone.entries.remove(index);
    Ok(())
}

/// Apply one numeric keystroke: comma decimals accepted, negative input
/// floored at zero, and the box clamp re-run immediately.
pub fn set_entry_field(
    day: &mut PlanningDay,
    zone: usize,
    index: usize,
    field: EntryField,
    raw: &str,
) -> Result<()> {
    let entry = day
        .zones
        .get_mut(zone)
        .and_then(|z| z.entries.get_mut(index))
        .ok_or_else(|| anyhow::anyhow!("no entry at zone {zone}, index {index}"))?;

    let value = parse_comma_number(&sanitize_numeric(raw)).max(0.0);
    match field {
        EntryField::Hours => entry.hours = value,
        EntryField::Score => entry.score = value as u32,
        EntryField::Box2 => entry.box2 = value as u32,
        EntryField::Box2s => entry.box2s = value as u32,
        EntryField::Box4 => entry.box4 = value as u32,
        EntryField::Box4s => entry.box4s = value as u32,
        EntryField::Game => entry.game = value,
    }
    clamp_entry(entry);
    Ok(())
}

#[derive(Clone)]
pub struct Planning {
    store: Store,
    audit: AuditLog,
}

impl Planning {
    pub fn new(store: Store, audit: AuditLog) -> Self {
        Self { store, audit }
    }

    pub fn list_days(&self) -> Vec<PlanningDay> {
        self.store.get(keys::PLANNING, Vec::new())
    }

    pub fn find_day(&self, date: NaiveDate) -> Option<PlanningDay> {
        self.list_days().into_iter().find(|d| d.date == date)
    }

    /// Deep copy of the stored day for editing, or a fresh one-zone day.
    /// Creation is idempotent: committing twice for the same date updates in
    /// place rather than duplicating.
    pub fn open_day(&self, date: NaiveDate) -> PlanningDay {
        self.find_day(date).unwrap_or_else(|| PlanningDay::new(date))
    }

    /// Re-validate and upsert the day, then rebuild its history rows so the
    /// roster and finance reads stay consistent.
    pub fn commit_day(&self, draft: &PlanningDay) -> Result<PlanningDay> {
        if draft.zones.len() > MAX_ZONES {
            bail!("a day holds at most {MAX_ZONES} zones");
        }
        if draft
            .zones
            .iter()
            .any(|z| z.entries.len() > MAX_ENTRIES_PER_ZONE)
        {
            bail!("a zone holds at most {MAX_ENTRIES_PER_ZONE} recruiters");
        }

        let mut day = draft.clone();
        for zone in &mut day.zones {
            for entry in &mut zone.entries {
                clamp_entry(entry);
            }
        }

        let mut days = self.list_days();
        let existed = match days.iter_mut().find(|d| d.date == day.date) {
            Some(stored) => {
                *stored = day.clone();
                true
            }
            None => {
                days.push(day.clone());
                false
            }
        };
        days.sort_by_key(|d| d.date);
        self.store.set(keys::PLANNING, &days)?;
        self.rebuild_history(&day)?;

        let action = if existed { "update-day" } else { "add-day" };
        self.audit
            .record("planning", action, json!({ "date": to_ddmmyyyy(day.date) }));
        info!("{action} {}", to_ddmmyyyy(day.date));
        Ok(day)
    }

    pub fn delete_day(&self, date: NaiveDate) -> Result<()> {
        let mut days = self.list_days();
        let before = days.len();
        days.retain(|d| d.date != date);
        if days.len() == before {
            bail!("no planning day for {}", to_ddmmyyyy(date));
        }
        self.store.set(keys::PLANNING, &days)?;

        let mut history: Vec<HistoryRow> = self.store.get(keys::HISTORY, Vec::new());
        history.retain(|row| row.date != date);
        self.store.set(keys::HISTORY, &history)?;

        self.audit
            .record("planning", "delete-day", json!({ "date": to_ddmmyyyy(date) }));
        Ok(())
    }

    /// Replace the date's history rows with fresh ones derived from the day.
    fn rebuild_history(&self, day: &PlanningDay) -> Result<()> {
        let settings: Settings = self.store.get(keys::SETTINGS, Settings::default());
        let project = settings.projects.first().cloned().unwrap_or_default();

        let mut history: Vec<HistoryRow> = self.store.get(keys::HISTORY, Vec::new());
        history.retain(|row| row.date != day.date);
        for zone in &day.zones {
            for entry in &zone.entries {
                history.push(HistoryRow {
                    crewcode: entry.crewcode.clone(),
                    name: entry.name.clone(),
                    date: day.date,
                    project: project.clone(),
                    zones: vec![zone.name.clone()],
                    mult: zone.mult,
                    hours: entry.hours,
                    score: entry.score,
                    box2: entry.box2,
                    box2s: entry.box2s,
                    box4: entry.box4,
                    box4s: entry.box4s,
                    game: entry.game,
                });
            }
        }
        history.sort_by_key(|row| row.date);
        self.store.set(keys::HISTORY, &history)
    }

    /// Mean score over the day's entries with score > 0, two decimals.
    pub fn day_average(&self, date: NaiveDate) -> f64 {
        match self.find_day(date) {
            Some(day) => day_average_of(&day),
            None => 0.0,
        }
    }
}

pub fn day_average_of(day: &PlanningDay) -> f64 {
    let scores: Vec<u32> = day
        .all_entries()
        .map(|e| e.score)
        .filter(|s| *s > 0)
        .collect();
    if scores.is_empty() {
        return 0.0;
    }
    round2(scores.iter().sum::<u32>() as f64 / scores.len() as f64)
}
