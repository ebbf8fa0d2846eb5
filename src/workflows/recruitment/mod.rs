//! Recruitment intake pipeline: text extraction from uploaded applicant documents, keyword
//! analysis, weighted screening, and the plain-text reviewer summary.

pub mod domain;
pub mod events;
pub mod extraction;
pub mod keywords;
pub mod processing;
pub mod repository;
pub mod screening;
pub mod store;
pub mod summary;

#[cfg(test)]
mod tests;

pub use domain::{
    Application, ApplicationId, ApplicationStatus, Document, DocumentId, DocumentKind,
    Education, ExtractionRecord, ExtractionStatus, Gender, PersonalDetails, QualificationLevel,
    Reference, StoredFile, VacancyId, VacancyProvince, VacancySnapshot, Verification,
    WorkExperience,
};
pub use events::{channel, handle_event, run_consumer, DocumentEvent, EventSender, QueueClosed};
pub use extraction::{Extraction, ExtractionMethod, ExtractionRouter, StageOutcome};
pub use keywords::KeywordCatalog;
pub use processing::{
    system_clock, ApplicationRun, Clock, DocumentOutcome, DocumentProcessor, DocumentReport,
    ProcessingError, VacancyScreening,
};
pub use repository::{ApplicationRepository, DocumentRepository, RepositoryError};
pub use screening::{
    ScoreComponent, ScoreFactor, ScreeningConfig, ScreeningEngine, ScreeningOutcome, Shortlist,
    DEFAULT_SHORTLIST_THRESHOLD,
};
pub use store::{JsonStore, StoreError};
pub use summary::{ScoreBand, SummaryGenerator};
