use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use super::domain::{
    Application, ApplicationId, Document, DocumentId, ExtractionRecord, VacancyId,
};
use super::repository::{ApplicationRepository, DocumentRepository, RepositoryError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreData {
    #[serde(default)]
    next_application: u64,
    #[serde(default)]
    next_document: u64,
    #[serde(default)]
    applications: Vec<Application>,
    #[serde(default)]
    documents: Vec<Document>,
}

/// Error raised while loading a store file.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed store file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Record store backed by a pretty-printed JSON file, atomically replaced after every mutation.
/// An in-memory store skips the file entirely.
#[derive(Debug)]
pub struct JsonStore {
    path: Option<PathBuf>,
    data: Mutex<StoreData>,
}

impl JsonStore {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: Mutex::new(StoreData::default()),
        }
    }

    /// Load `path`, or start empty when the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let data = if path.exists() {
            let raw = std::fs::read_to_string(&path).map_err(|source| StoreError::Read {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
                path: path.clone(),
                source,
            })?
        } else {
            StoreData::default()
        };

        Ok(Self {
            path: Some(path),
            data: Mutex::new(data),
        })
    }

    /// Register an application, allocating an id when the given one is blank.
    pub fn insert_application(
        &self,
        mut application: Application,
    ) -> Result<ApplicationId, RepositoryError> {
        self.commit(|data| {
            if application.id.0.trim().is_empty() {
                application.id = loop {
                    data.next_application += 1;
                    let candidate = ApplicationId(format!("app-{:06}", data.next_application));
                    if !data.applications.iter().any(|a| a.id == candidate) {
                        break candidate;
                    }
                };
            } else if data.applications.iter().any(|a| a.id == application.id) {
                return Err(RepositoryError::Conflict);
            }

            let id = application.id.clone();
            data.applications.push(application);
            Ok(id)
        })
    }

    /// Register a document for an existing application, allocating an id when blank.
    pub fn insert_document(&self, mut document: Document) -> Result<DocumentId, RepositoryError> {
        self.commit(|data| {
            if !data
                .applications
                .iter()
                .any(|a| a.id == document.application_id)
            {
                return Err(RepositoryError::NotFound);
            }
            if document.id.0.trim().is_empty() {
                document.id = loop {
                    data.next_document += 1;
                    let candidate = DocumentId(format!("doc-{:06}", data.next_document));
                    if !data.documents.iter().any(|d| d.id == candidate) {
                        break candidate;
                    }
                };
            } else if data.documents.iter().any(|d| d.id == document.id) {
                return Err(RepositoryError::Conflict);
            }

            let id = document.id.clone();
            data.documents.push(document);
            Ok(id)
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreData>, RepositoryError> {
        self.data
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store lock poisoned".to_string()))
    }

    /// Apply `change` to a staged copy and swap it in only after the file write succeeds.
    fn commit<T>(
        &self,
        change: impl FnOnce(&mut StoreData) -> Result<T, RepositoryError>,
    ) -> Result<T, RepositoryError> {
        let mut data = self.lock()?;
        let mut staged = data.clone();
        let value = change(&mut staged)?;
        self.persist(&staged)?;
        *data = staged;
        Ok(value)
    }

    fn persist(&self, data: &StoreData) -> Result<(), RepositoryError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let unavailable = |err: &dyn std::fmt::Display| {
            RepositoryError::Unavailable(format!("failed to write {}: {err}", path.display()))
        };

        let encoded = serde_json::to_vec_pretty(data)
            .map_err(|err| RepositoryError::Unavailable(err.to_string()))?;
        let parent = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut staged = NamedTempFile::new_in(parent).map_err(|err| unavailable(&err))?;
        staged.write_all(&encoded).map_err(|err| unavailable(&err))?;
        staged.persist(path).map_err(|err| unavailable(&err.error))?;
        debug!(path = %path.display(), "store persisted");
        Ok(())
    }
}

impl ApplicationRepository for JsonStore {
    fn application(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        let data = self.lock()?;
        Ok(data.applications.iter().find(|a| &a.id == id).cloned())
    }

    fn applications_for_vacancy(
        &self,
        vacancy: &VacancyId,
    ) -> Result<Vec<Application>, RepositoryError> {
        let data = self.lock()?;
        Ok(data
            .applications
            .iter()
            .filter(|a| &a.vacancy.id == vacancy)
            .cloned()
            .collect())
    }

    fn save_summary(&self, id: &ApplicationId, summary: String) -> Result<(), RepositoryError> {
        self.commit(|data| {
            let application = data
                .applications
                .iter_mut()
                .find(|a| &a.id == id)
                .ok_or(RepositoryError::NotFound)?;
            application.summary = Some(summary);
            Ok(())
        })
    }

    fn save_screening(
        &self,
        id: &ApplicationId,
        total_score: f64,
        summary: String,
    ) -> Result<(), RepositoryError> {
        self.commit(|data| {
            let application = data
                .applications
                .iter_mut()
                .find(|a| &a.id == id)
                .ok_or(RepositoryError::NotFound)?;
            application.total_score = Some(total_score);
            application.summary = Some(summary);
            Ok(())
        })
    }
}

impl DocumentRepository for JsonStore {
    fn document(&self, id: &DocumentId) -> Result<Option<Document>, RepositoryError> {
        let data = self.lock()?;
        Ok(data.documents.iter().find(|d| &d.id == id).cloned())
    }

    fn documents_for(&self, application: &ApplicationId) -> Result<Vec<Document>, RepositoryError> {
        let data = self.lock()?;
        Ok(data
            .documents
            .iter()
            .filter(|d| &d.application_id == application)
            .cloned()
            .collect())
    }

    fn save_extraction(
        &self,
        id: &DocumentId,
        text: String,
        record: ExtractionRecord,
    ) -> Result<(), RepositoryError> {
        self.commit(|data| {
            let document = data
                .documents
                .iter_mut()
                .find(|d| &d.id == id)
                .ok_or(RepositoryError::NotFound)?;
            document.extracted_text = text;
            document.extraction = Some(record);
            Ok(())
        })
    }
}
