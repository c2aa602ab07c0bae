pub mod audit;
pub mod candidate;
pub mod history;
pub mod planning;
pub mod recruiter;
pub mod settings;

pub use audit::AuditEntry;
pub use candidate::{Appointment, Candidate, Source, Stage};
pub use history::HistoryRow;
pub use planning::{Mult, PlanningDay, ShiftEntry, Zone};
pub use recruiter::{Recruiter, Role};
pub use settings::{
    ConversionTargets, Language, NotifyFrom, RateBand, Settings, StageTemplates, Template,
    TemplateLibrary,
};
