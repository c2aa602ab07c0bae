//! End-to-end flows through the `App` facade, against a real data directory.

use chrono::NaiveDate;
use proago::models::{Language, Role, Source, Stage};
use proago::planning::{add_entry, set_entry_field};
use proago::{App, EntryField, NewCandidate, RosterView};
use uuid::Uuid;

fn app() -> App {
    let dir = std::env::temp_dir().join(format!("proago-app-{}", Uuid::new_v4()));
    App::new(dir).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn add_jane(app: &App) -> String {
    app.pipeline
        .add(NewCandidate {
            name: "Jane Doe".into(),
            phone: "+352691999999".into(),
            email: "jane@x.com".into(),
            source: Source::Indeed,
        })
        .unwrap()
        .id
}

fn hire_jane(app: &App) -> String {
    let id = add_jane(app);
    app.pipeline.move_stage(&id, Stage::Interview).unwrap();
    app.pipeline.move_stage(&id, Stage::Formation).unwrap();
    app.pipeline.hire(&id, "11111").unwrap().id
}

#[test]
fn settings_file_exists_from_first_launch() {
    let dir = std::env::temp_dir().join(format!("proago-app-{}", Uuid::new_v4()));
    App::new(dir.clone()).unwrap();
    assert!(dir.join("proago.settings.json").exists());

    // A second open over the same directory sees the same document.
    let reopened = App::new(dir).unwrap();
    assert_eq!(reopened.settings.get().projects, vec!["Hello Fresh"]);
}

#[test]
fn import_drops_contactless_rows_and_audits_the_count() {
    let app = app();
    let outcome = app
        .pipeline
        .import(r#"[{"name":"Jane Doe","email":"jane@x.com"},{"name":"No Contact"}]"#)
        .unwrap();
    assert_eq!(outcome.count, 1);
    assert_eq!(app.pipeline.by_stage(Stage::Leads).len(), 1);

    let log = app.settings.audit_log();
    assert_eq!(log[0].area, "inflow");
    assert_eq!(log[0].action, "import");
    assert_eq!(log[0].context["count"], 1);
}

#[test]
fn hire_flow_moves_a_candidate_onto_the_roster() {
    let app = app();
    hire_jane(&app);

    assert!(app.pipeline.list().is_empty());
    let roster = app.roster.list(RosterView::Active);
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].name, "Jane Doe");
    assert_eq!(roster[0].role, Role::RK);
    assert_eq!(roster[0].crewcode, "11111");
}

#[test]
fn notify_uses_saved_templates() {
    let app = app();
    let id = add_jane(&app);
    for _ in 0..3 {
        app.pipeline.increment_calls(&id).unwrap();
    }

    app.settings
        .set_template(
            Stage::Leads,
            Language::French,
            "Bonjour {name}".into(),
            "Toujours partant, {name} ?".into(),
        )
        .unwrap();

    let preview = app.pipeline.notify(&id, Language::French).unwrap();
    assert_eq!(preview.email, "Bonjour Jane Doe");
    assert_eq!(preview.to_email, "jane@x.com");
    assert_eq!(preview.from_email, "noreply@proago.com");
}

#[test]
fn committed_planning_feeds_roster_performance_and_finance() {
    let app = app();
    let recruiter_id = hire_jane(&app);

    let mut draft = app.planning.open_day(date(2025, 6, 1));
    draft.zones[0].name = "Gare".into();
    add_entry(&mut draft, 0).unwrap();
    draft.zones[0].entries[0].name = "Jane Doe".into();
    draft.zones[0].entries[0].crewcode = Some("11111".into());
    set_entry_field(&mut draft, 0, 0, EntryField::Hours, "6").unwrap();
    set_entry_field(&mut draft, 0, 0, EntryField::Score, "5").unwrap();
    set_entry_field(&mut draft, 0, 0, EntryField::Box2, "3").unwrap();
    set_entry_field(&mut draft, 0, 0, EntryField::Game, "20").unwrap();
    app.planning.commit_day(&draft).unwrap();

    let performance = app
        .roster
        .performance_as_of(&recruiter_id, date(2025, 6, 2))
        .unwrap();
    assert_eq!(performance.form, vec![5]);
    assert_eq!(performance.average, 5.0);

    let summary = app.finance.summary();
    assert_eq!(summary.lines.len(), 1);
    // 2025-06-01 falls in the 15.6285 default band.
    assert_eq!(summary.lines[0].wages, proago::util::round2(6.0 * 15.6285));
    assert_eq!(summary.lines[0].game, 20.0);

    // Deleting the day empties the aggregates on the next read.
    app.planning.delete_day(date(2025, 6, 1)).unwrap();
    assert_eq!(app.finance.summary().lines[0].total, 0.0);
    let performance = app
        .roster
        .performance_as_of(&recruiter_id, date(2025, 6, 2))
        .unwrap();
    assert!(performance.form.is_empty());
}

#[test]
fn cascade_delete_purges_every_reference() {
    let app = app();
    hire_jane(&app);

    let mut draft = app.planning.open_day(date(2025, 6, 1));
    add_entry(&mut draft, 0).unwrap();
    draft.zones[0].entries[0].name = "Jane Doe".into();
    draft.zones[0].entries[0].crewcode = Some("11111".into());
    app.planning.commit_day(&draft).unwrap();

    let outcome = app.settings.delete_recruiter("11111").unwrap();
    assert_eq!(outcome.recruiters_removed, 1);

    assert!(app.roster.list(RosterView::All).is_empty());
    let days = app.planning.list_days();
    assert!(days
        .iter()
        .flat_map(|d| d.all_entries())
        .all(|e| e.crewcode.as_deref() != Some("11111")));
    assert!(app.finance.summary().lines.is_empty());
}
