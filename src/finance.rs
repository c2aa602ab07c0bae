//! Read-side pay aggregation. No state of its own: every call re-joins the
//! history rows to the roster and recomputes, so deleted planning data is
//! reflected immediately.

use chrono::NaiveDate;

use crate::models::{HistoryRow, Recruiter, Settings};
use crate::roster::matching::entry_matches;
use crate::store::{keys, Store};
use crate::util::round2;

#[derive(Debug, Clone, PartialEq)]
pub struct PayLine {
    pub recruiter_id: String,
    pub name: String,
    pub crewcode: String,
    pub wages: f64,
    pub bonus: f64,
    pub game: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PaySummary {
    pub lines: Vec<PayLine>,
    pub total_wages: f64,
    pub total_bonus: f64,
    pub total_game: f64,
    pub grand_total: f64,
}

#[derive(Clone)]
pub struct Finance {
    store: Store,
}

impl Finance {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Wages for one history row: hours at the rate band effective on its
    /// date. Bonus is the zone multiplier surplus on top of those wages.
    fn row_pay(settings: &Settings, row: &HistoryRow) -> (f64, f64) {
        let wages = row.hours * settings.rate_for(row.date);
        let bonus = wages * (row.mult.factor() - 1.0);
        (wages, bonus)
    }

    pub fn summary(&self) -> PaySummary {
        self.summary_between(None, None)
    }

    /// Aggregate pay per recruiter over an optional date range.
    pub fn summary_between(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> PaySummary {
        let settings: Settings = self.store.get(keys::SETTINGS, Settings::default());
        let recruiters: Vec<Recruiter> = self.store.get(keys::RECRUITERS, Vec::new());
        let history: Vec<HistoryRow> = self.store.get(keys::HISTORY, Vec::new());

        let in_range = |date: NaiveDate| {
            from.map_or(true, |f| date >= f) && to.map_or(true, |t| date <= t)
        };

        let mut summary = PaySummary::default();
        for recruiter in &recruiters {
            let mut wages = 0.0;
            let mut bonus = 0.0;
            let mut game = 0.0;
            for row in history.iter().filter(|row| in_range(row.date)) {
                if !entry_matches(
                    &recruiter.name,
                    &recruiter.crewcode,
                    &row.name,
                    row.crewcode.as_deref(),
                ) {
                    continue;
                }
                let (row_wages, row_bonus) = Self::row_pay(&settings, row);
                wages += row_wages;
                bonus += row_bonus;
                game += row.game;
            }

            let line = PayLine {
                recruiter_id: recruiter.id.clone(),
                name: recruiter.name.clone(),
                crewcode: recruiter.crewcode.clone(),
                wages: round2(wages),
                bonus: round2(bonus),
                game: round2(game),
                total: round2(wages + bonus + game),
            };
            summary.total_wages += line.wages;
            summary.total_bonus += line.bonus;
            summary.total_game += line.game;
            summary.lines.push(line);
        }
        summary.total_wages = round2(summary.total_wages);
        summary.total_bonus = round2(summary.total_bonus);
        summary.total_game = round2(summary.total_game);
        summary.grand_total =
            round2(summary.total_wages + summary.total_bonus + summary.total_game);
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Mult, Role};
    use chrono::Utc;
    use uuid::Uuid;

    fn finance() -> Finance {
        let dir = std::env::temp_dir().join(format!("proago-finance-{}", Uuid::new_v4()));
        Finance::new(Store::new(dir).unwrap())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seed(finance: &Finance, name: &str, crewcode: &str, rows: Vec<HistoryRow>) {
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
        finance
            .store
            .set(keys::RECRUITERS, &vec![recruiter])
            .unwrap();
        finance.store.set(keys::HISTORY, &rows).unwrap();
    }

    fn row(crewcode: &str, name: &str, d: NaiveDate, hours: f64, mult: Mult, game: f64) -> HistoryRow {
        HistoryRow {
            crewcode: Some(crewcode.into()),
            name: name.into(),
            date: d,
            project: "Hello Fresh".into(),
            zones: vec!["Gare".into()],
            mult,
            hours,
            score: 5,
            box2: 2,
            box2s: 0,
            box4: 1,
            box4s: 0,
            game,
        }
    }

    #[test]
    fn sums_wages_bonus_and_game_per_recruiter() {
        let f = finance();
        seed(
            &f,
            "Jane Doe",
            "11111",
            vec![
                // 2025-06-01 falls in the 15.6285 band; 150% zone.
                row("11111", "Jane Doe", date(2025, 6, 1), 6.0, Mult::X150, 20.0),
                // 2025-02-01 falls in the 15.2473 band; flat zone.
                row("11111", "Jane Doe", date(2025, 2, 1), 4.0, Mult::X100, 0.0),
            ],
        );

        let summary = f.summary();
        assert_eq!(summary.lines.len(), 1);
        let line = &summary.lines[0];
        let wages = 6.0 * 15.6285 + 4.0 * 15.2473;
        let bonus = 6.0 * 15.6285 * 0.5;
        assert_eq!(line.wages, round2(wages));
        assert_eq!(line.bonus, round2(bonus));
        assert_eq!(line.game, 20.0);
        assert_eq!(summary.grand_total, round2(line.wages + line.bonus + line.game));
    }

    #[test]
    fn unmatched_rows_do_not_count() {
        let f = finance();
        seed(
            &f,
            "Jane Doe",
            "11111",
            vec![row("99999", "Someone Else", date(2025, 6, 1), 6.0, Mult::X100, 50.0)],
        );
        let summary = f.summary();
        assert_eq!(summary.lines[0].total, 0.0);
        assert_eq!(summary.grand_total, 0.0);
    }

    #[test]
    fn date_range_filters_rows() {
        let f = finance();
        seed(
            &f,
            "Jane Doe",
            "11111",
            vec![
                row("11111", "Jane Doe", date(2025, 6, 1), 6.0, Mult::X100, 10.0),
                row("11111", "Jane Doe", date(2025, 7, 1), 6.0, Mult::X100, 30.0),
            ],
        );
        let summary = f.summary_between(Some(date(2025, 6, 15)), None);
        assert_eq!(summary.lines[0].game, 30.0);
    }
}
