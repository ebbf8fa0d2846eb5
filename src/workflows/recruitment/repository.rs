use super::domain::{
    Application, ApplicationId, Document, DocumentId, ExtractionRecord, VacancyId,
};

/// Storage abstraction for applications so the orchestrator can be exercised in isolation.
///
/// Form fields are owned by the intake side; this crate only writes the score and summary.
pub trait ApplicationRepository: Send + Sync {
    fn application(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError>;
    fn applications_for_vacancy(
        &self,
        vacancy: &VacancyId,
    ) -> Result<Vec<Application>, RepositoryError>;
    fn save_summary(&self, id: &ApplicationId, summary: String) -> Result<(), RepositoryError>;
    /// Persist score and summary as one update.
    fn save_screening(
        &self,
        id: &ApplicationId,
        total_score: f64,
        summary: String,
    ) -> Result<(), RepositoryError>;
}

/// Storage abstraction for uploaded documents.
pub trait DocumentRepository: Send + Sync {
    fn document(&self, id: &DocumentId) -> Result<Option<Document>, RepositoryError>;
    /// Documents of one application in upload order.
    fn documents_for(&self, application: &ApplicationId) -> Result<Vec<Document>, RepositoryError>;
    fn save_extraction(
        &self,
        id: &DocumentId,
        text: String,
        record: ExtractionRecord,
    ) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
