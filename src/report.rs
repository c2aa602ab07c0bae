//! Printable day reports. Pure presentation: each report renders one planning
//! day to a self-contained HTML page carrying the same aggregates the roster
//! and finance views compute. No state, nothing written.

use crate::models::PlanningDay;
use crate::planning::day_average_of;
use crate::util::{round2, to_ddmmyyyy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// Scores, box counts and game revenue per entry.
    Sales,
    /// Box conversion rates per entry, for coaching review.
    Quality,
    /// Zone assignments only, handed out before the shift starts.
    TeamPrep,
}

impl ReportKind {
    pub fn title(self) -> &'static str {
        match self {
            ReportKind::Sales => "Sales",
            ReportKind::Quality => "Quality",
            ReportKind::TeamPrep => "Team Prep",
        }
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn pct(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round2(part as f64 * 100.0 / whole as f64)
}

/// Render one day to a printable HTML page.
pub fn render_day(kind: ReportKind, day: &PlanningDay) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html><html><head><meta charset=\"utf-8\">");
    html.push_str(&format!(
        "<title>{} {}</title>",
        kind.title(),
        to_ddmmyyyy(day.date)
    ));
    html.push_str(
        "<style>body{font-family:sans-serif;margin:2rem}table{border-collapse:collapse;width:100%;margin-bottom:1.5rem}th,td{border:1px solid #ccc;padding:4px 8px;text-align:left}h2{margin-bottom:.25rem}</style>",
    );
    html.push_str("</head><body>");
    html.push_str(&format!(
        "<h1>{} &mdash; {}</h1>",
        kind.title(),
        to_ddmmyyyy(day.date)
    ));

    for zone in &day.zones {
        let zone_name = if zone.name.is_empty() {
            "Unnamed zone"
        } else {
            &zone.name
        };
        html.push_str(&format!(
            "<h2>{} ({})</h2>",
            escape(zone_name),
            zone.mult.label()
        ));
        html.push_str("<table><tr>");
        match kind {
            ReportKind::Sales => {
                html.push_str(
                    "<th>Recruiter</th><th>Hours</th><th>Score</th><th>Box2</th><th>Box2*</th><th>Box4</th><th>Box4*</th><th>Game</th></tr>",
                );
                for entry in &zone.entries {
                    html.push_str(&format!(
                        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.2}</td></tr>",
                        escape(&entry.name),
                        entry.hours,
                        entry.score,
                        entry.box2,
                        entry.box2s,
                        entry.box4,
                        entry.box4s,
                        entry.game,
                    ));
                }
            }
            ReportKind::Quality => {
                html.push_str(
                    "<th>Recruiter</th><th>Score</th><th>Box2 %</th><th>Box4 %</th></tr>",
                );
                for entry in &zone.entries {
                    let box2_total = entry.box2 + entry.box2s;
                    let box4_total = entry.box4 + entry.box4s;
                    html.push_str(&format!(
                        "<tr><td>{}</td><td>{}</td><td>{:.2}</td><td>{:.2}</td></tr>",
                        escape(&entry.name),
                        entry.score,
                        pct(box2_total, entry.score),
                        pct(box4_total, box2_total),
                    ));
                }
            }
            ReportKind::TeamPrep => {
                html.push_str("<th>Recruiter</th><th>Crewcode</th></tr>");
                for entry in &zone.entries {
                    html.push_str(&format!(
                        "<tr><td>{}</td><td>{}</td></tr>",
                        escape(&entry.name),
                        escape(entry.crewcode.as_deref().unwrap_or("")),
                    ));
                }
            }
        }
        html.push_str("</table>");
    }

    if kind != ReportKind::TeamPrep {
        let game: f64 = day.all_entries().map(|e| e.game).sum();
        html.push_str(&format!(
            "<p>Day average: <strong>{:.2}</strong> &middot; Game total: <strong>{:.2}</strong></p>",
            day_average_of(day),
            round2(game),
        ));
    }

    html.push_str("</body></html>");
    html
}
