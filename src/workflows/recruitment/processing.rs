//! Orchestration of extraction, summary regeneration, and screening over the repositories.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, info_span, warn};

use super::domain::{
    Application, ApplicationId, Document, DocumentId, ExtractionRecord, VacancyId,
};
use super::extraction::{ExtractionMethod, ExtractionRouter};
use super::keywords::word_count;
use super::repository::{ApplicationRepository, DocumentRepository, RepositoryError};
use super::screening::{ScreeningEngine, ScreeningOutcome, Shortlist};
use super::summary::SummaryGenerator;

/// Source of "now" for extraction records and report timestamps.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub fn system_clock() -> Clock {
    Arc::new(Utc::now)
}

/// What happened to one document during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentOutcome {
    Extracted {
        method: ExtractionMethod,
        words: usize,
    },
    /// Text already present; nothing was done.
    Skipped,
    MissingFile {
        path: String,
    },
    Failed {
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentReport {
    pub document_id: DocumentId,
    #[serde(flatten)]
    pub outcome: DocumentOutcome,
}

/// Result of an application-level run: per-document reports plus the fresh summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationRun {
    pub application_id: ApplicationId,
    pub documents: Vec<DocumentReport>,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreeningFailure {
    pub application_id: ApplicationId,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VacancyScreening {
    pub vacancy_id: VacancyId,
    pub scored: Vec<ScreeningOutcome>,
    pub failed: Vec<ScreeningFailure>,
}

/// Error raised by the orchestrator for failures that concern the whole call.
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("application {0} not found")]
    ApplicationNotFound(ApplicationId),
    #[error("document {0} not found")]
    DocumentNotFound(DocumentId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Composes the extraction router, summary generator and screening engine over the stores.
pub struct DocumentProcessor<A, D> {
    applications: Arc<A>,
    documents: Arc<D>,
    router: ExtractionRouter,
    summaries: SummaryGenerator,
    engine: ScreeningEngine,
    clock: Clock,
}

impl<A, D> DocumentProcessor<A, D>
where
    A: ApplicationRepository + 'static,
    D: DocumentRepository + 'static,
{
    pub fn new(
        applications: Arc<A>,
        documents: Arc<D>,
        router: ExtractionRouter,
        summaries: SummaryGenerator,
        engine: ScreeningEngine,
    ) -> Self {
        Self {
            applications,
            documents,
            router,
            summaries,
            engine,
            clock: system_clock(),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Extract text for `document` unless it already has some.
    pub fn process_one(&self, document: &Document) -> DocumentReport {
        let span = info_span!("document", document_id = %document.id);
        let _entered = span.enter();

        if !document.needs_extraction() {
            return DocumentReport {
                document_id: document.id.clone(),
                outcome: DocumentOutcome::Skipped,
            };
        }
        self.extract_and_save(document)
    }

    /// Single-document path used when an upload completes: `process_one` followed by a summary
    /// refresh for the owning application.
    pub fn process_document(&self, id: &DocumentId) -> Result<DocumentReport, ProcessingError> {
        let document = self
            .documents
            .document(id)?
            .ok_or_else(|| ProcessingError::DocumentNotFound(id.clone()))?;
        let report = self.process_one(&document);
        self.refresh_summary(&document.application_id)?;
        Ok(report)
    }

    /// Extract every document still lacking text, then regenerate the summary.
    pub fn process_application(&self, id: &ApplicationId) -> Result<ApplicationRun, ProcessingError> {
        self.run_application(id, |document| self.process_one(document))
    }

    /// Re-extract every document regardless of existing text, then regenerate the summary.
    pub fn force_reprocess(&self, id: &ApplicationId) -> Result<ApplicationRun, ProcessingError> {
        self.run_application(id, |document| {
            let span = info_span!("document", document_id = %document.id);
            let _entered = span.enter();
            self.extract_and_save(document)
        })
    }

    /// Rebuild and persist the summary from the stored application and documents.
    pub fn refresh_summary(&self, id: &ApplicationId) -> Result<String, ProcessingError> {
        let application = self.load_application(id)?;
        let documents = self.documents.documents_for(id)?;
        let summary = self.summaries.render(&application, &documents, (self.clock)());
        self.applications.save_summary(id, summary.clone())?;
        Ok(summary)
    }

    /// Score one application and store the total together with a summary that shows it.
    pub fn screen(&self, id: &ApplicationId) -> Result<ScreeningOutcome, ProcessingError> {
        let application = self.load_application(id)?;
        self.screen_loaded(application)
    }

    /// Score every application of a vacancy. Individual failures are collected, not raised.
    pub fn screen_vacancy(&self, vacancy: &VacancyId) -> Result<VacancyScreening, ProcessingError> {
        let applications = self.applications.applications_for_vacancy(vacancy)?;
        let mut scored = Vec::new();
        let mut failed = Vec::new();

        for application in applications {
            let application_id = application.id.clone();
            match self.screen_loaded(application) {
                Ok(outcome) => scored.push(outcome),
                Err(err) => {
                    warn!(application_id = %application_id, error = %err, "screening failed");
                    failed.push(ScreeningFailure {
                        application_id,
                        reason: err.to_string(),
                    });
                }
            }
        }

        info!(
            vacancy_id = %vacancy,
            scored = scored.len(),
            failed = failed.len(),
            "vacancy screening complete"
        );
        Ok(VacancyScreening {
            vacancy_id: vacancy.clone(),
            scored,
            failed,
        })
    }

    pub fn shortlist(&self, vacancy: &VacancyId, threshold: f64) -> Result<Shortlist, ProcessingError> {
        let applications = self.applications.applications_for_vacancy(vacancy)?;
        Ok(Shortlist::rank(&applications, threshold))
    }

    fn screen_loaded(&self, mut application: Application) -> Result<ScreeningOutcome, ProcessingError> {
        let outcome = self.engine.score(&application);
        application.total_score = Some(outcome.total_score);

        let documents = self.documents.documents_for(&application.id)?;
        let summary = self.summaries.render(&application, &documents, (self.clock)());
        self.applications
            .save_screening(&application.id, outcome.total_score, summary)?;

        info!(
            application_id = %application.id,
            total_score = outcome.total_score,
            "application screened"
        );
        Ok(outcome)
    }

    fn run_application<F>(&self, id: &ApplicationId, mut step: F) -> Result<ApplicationRun, ProcessingError>
    where
        F: FnMut(&Document) -> DocumentReport,
    {
        // Fail before touching any document when the application is gone.
        self.load_application(id)?;
        let documents = self.documents.documents_for(id)?;
        let reports = documents.iter().map(&mut step).collect();
        let summary = self.refresh_summary(id)?;

        Ok(ApplicationRun {
            application_id: id.clone(),
            documents: reports,
            summary,
        })
    }

    fn extract_and_save(&self, document: &Document) -> DocumentReport {
        let path = &document.file.path;
        if !path.exists() {
            warn!(path = %path.display(), "document file not found; skipping extraction");
            return DocumentReport {
                document_id: document.id.clone(),
                outcome: DocumentOutcome::MissingFile {
                    path: path.display().to_string(),
                },
            };
        }

        let extraction = self.router.extract(path);
        let words = word_count(&extraction.text);
        let record = ExtractionRecord {
            method: extraction.method,
            completed_at: (self.clock)(),
        };

        let outcome = match self
            .documents
            .save_extraction(&document.id, extraction.text, record)
        {
            Ok(()) => {
                info!(method = %extraction.method, words, "extraction complete");
                DocumentOutcome::Extracted {
                    method: extraction.method,
                    words,
                }
            }
            Err(err) => {
                warn!(error = %err, "failed to persist extracted text");
                DocumentOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        };

        DocumentReport {
            document_id: document.id.clone(),
            outcome,
        }
    }

    fn load_application(&self, id: &ApplicationId) -> Result<Application, ProcessingError> {
        self.applications
            .application(id)?
            .ok_or_else(|| ProcessingError::ApplicationNotFound(id.clone()))
    }
}
