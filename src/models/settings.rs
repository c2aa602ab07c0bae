//! Configuration object: pay-rate bands, box-conversion targets, notification
//! sender identities and message templates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::candidate::Stage;

/// Hourly rate effective from `start` until superseded by a later band.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RateBand {
    pub start: NaiveDate,
    pub rate: f64,
}

/// Informational box2/box4 targets for one sales category. Not enforced by the
/// planning validation; shown as reference values only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTargets {
    pub box2: f64,
    pub box4: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConversionTargets {
    pub d2d: CategoryTargets,
    pub d2d_discount: CategoryTargets,
    pub events: CategoryTargets,
    pub events_discount: CategoryTargets,
}

/// Template language. "lb" is the local default.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "lb")]
    Luxembourgish,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "de")]
    German,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub email: String,
    pub sms: String,
}

/// Per-language bodies for one pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StageTemplates {
    pub lb: Template,
    pub fr: Template,
    pub de: Template,
}

impl StageTemplates {
    pub fn for_language(&self, language: Language) -> &Template {
        match language {
            Language::Luxembourgish => &self.lb,
            Language::French => &self.fr,
            Language::German => &self.de,
        }
    }

    pub fn for_language_mut(&mut self, language: Language) -> &mut Template {
        match language {
            Language::Luxembourgish => &mut self.lb,
            Language::French => &mut self.fr,
            Language::German => &mut self.de,
        }
    }
}

/// Templates keyed by stage: `call` for leads, then interview and formation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateLibrary {
    pub call: StageTemplates,
    pub interview: StageTemplates,
    pub formation: StageTemplates,
}

impl TemplateLibrary {
    pub fn for_stage(&self, stage: Stage) -> &StageTemplates {
        match stage {
            Stage::Leads => &self.call,
            Stage::Interview => &self.interview,
            Stage::Formation => &self.formation,
        }
    }

    pub fn for_stage_mut(&mut self, stage: Stage) -> &mut StageTemplates {
        match stage {
            Stage::Leads => &mut self.call,
            Stage::Interview => &mut self.interview,
            Stage::Formation => &mut self.formation,
        }
    }
}

/// Sender identities. Labels only; nothing here is a transport secret.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotifyFrom {
    pub email: String,
    pub phone: String,
    pub email_froms: Vec<String>,
    pub sms_froms: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub projects: Vec<String>,
    pub rate_bands: Vec<RateBand>,
    pub conversion: ConversionTargets,
    pub templates: TemplateLibrary,
    pub notify_from: NotifyFrom,
}

fn stage_defaults(call: bool, what: &str, what_fr: &str, what_de: &str) -> StageTemplates {
    if call {
        return StageTemplates {
            lb: Template {
                email: "Moien {name}, merci fir Ären Interessi. Mir mellen eis geschwënn!".into(),
                sms: "Moien {name}, sidd Dir nach interesséiert un der Plaz bei Proago?".into(),
            },
            fr: Template {
                email: "Bonjour {name}, merci pour votre intérêt. Nous vous recontactons vite !"
                    .into(),
                sms: "Bonjour {name}, êtes-vous toujours intéressé(e) par le poste chez Proago ?"
                    .into(),
            },
            de: Template {
                email: "Hallo {name}, danke für Ihr Interesse. Wir melden uns in Kürze!".into(),
                sms: "Hallo {name}, sind Sie noch an der Stelle bei Proago interessiert?".into(),
            },
        };
    }
    StageTemplates {
        lb: Template {
            email: format!("Moien {{name}}, Är {what} ass festgeluecht fir den {{date}} um {{time}}."),
            sms: format!("Moien {{name}}, {what}: {{date}} um {{time}}."),
        },
        fr: Template {
            email: format!(
                "Bonjour {{name}}, votre {what_fr} est fixé au {{date}} à {{time}}."
            ),
            sms: format!("Bonjour {{name}}, {what_fr} : {{date}} à {{time}}."),
        },
        de: Template {
            email: format!("Hallo {{name}}, Ihr {what_de} ist am {{date}} um {{time}} geplant."),
            sms: format!("Hallo {{name}}, {what_de}: {{date}} um {{time}}."),
        },
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            projects: vec!["Hello Fresh".to_string()],
            rate_bands: vec![
                RateBand {
                    start: NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date"),
                    rate: 15.2473,
                },
                RateBand {
                    start: NaiveDate::from_ymd_opt(2025, 5, 1).expect("valid date"),
                    rate: 15.6285,
                },
            ],
            conversion: ConversionTargets {
                d2d: CategoryTargets {
                    box2: 95.0,
                    box4: 125.0,
                },
                d2d_discount: CategoryTargets {
                    box2: 80.0,
                    box4: 110.0,
                },
                events: CategoryTargets {
                    box2: 60.0,
                    box4: 70.0,
                },
                events_discount: CategoryTargets {
                    box2: 45.0,
                    box4: 55.0,
                },
            },
            templates: TemplateLibrary {
                call: stage_defaults(true, "", "", ""),
                interview: stage_defaults(false, "Entretien", "entretien", "Gespräch"),
                formation: stage_defaults(false, "Formatioun", "formation", "Schulung"),
            },
            notify_from: NotifyFrom {
                email: "noreply@proago.com".to_string(),
                phone: "+352 600 000 000".to_string(),
                email_froms: Vec::new(),
                sms_froms: Vec::new(),
            },
        }
    }
}

impl Settings {
    /// Hourly rate effective on `date`: the latest band starting on or before
    /// it, falling back to the earliest band when the date predates them all.
    pub fn rate_for(&self, date: NaiveDate) -> f64 {
        let mut bands = self.rate_bands.clone();
        bands.sort_by_key(|band| band.start);
        let applicable = bands
            .iter()
            .rev()
            .find(|band| band.start <= date)
            .or_else(|| bands.first());
        applicable.map(|band| band.rate).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn rate_lookup_picks_latest_band_at_or_before_date() {
        let settings = Settings::default();
        assert_eq!(settings.rate_for(date(2025, 4, 30)), 15.2473);
        assert_eq!(settings.rate_for(date(2025, 5, 1)), 15.6285);
        assert_eq!(settings.rate_for(date(2026, 1, 1)), 15.6285);
    }

    #[test]
    fn rate_lookup_falls_back_to_earliest_band() {
        let settings = Settings::default();
        assert_eq!(settings.rate_for(date(2024, 1, 1)), 15.2473);
    }

    #[test]
    fn default_templates_cover_every_stage_and_language() {
        let settings = Settings::default();
        for stage in [Stage::Leads, Stage::Interview, Stage::Formation] {
            for language in [Language::Luxembourgish, Language::French, Language::German] {
                let template = settings.templates.for_stage(stage).for_language(language);
                assert!(template.email.contains("{name}"));
                assert!(!template.sms.is_empty());
            }
        }
    }
}
