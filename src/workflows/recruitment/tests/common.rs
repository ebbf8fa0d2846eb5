use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::workflows::recruitment::domain::{
    Application, ApplicationId, ApplicationStatus, Document, DocumentId, DocumentKind,
    Education, ExtractionRecord, Gender, PersonalDetails, QualificationLevel, Reference,
    StoredFile, VacancyId, VacancyProvince, VacancySnapshot, WorkExperience,
};
use crate::workflows::recruitment::extraction::{
    ExtractionError, ExtractionRouter, OcrEngine, PdfBackend, PdfFallbackPolicy,
};
use crate::workflows::recruitment::processing::{Clock, DocumentProcessor};
use crate::workflows::recruitment::repository::{
    ApplicationRepository, DocumentRepository, RepositoryError,
};
use crate::workflows::recruitment::screening::{ScreeningConfig, ScreeningEngine};
use crate::workflows::recruitment::store::JsonStore;
use crate::workflows::recruitment::summary::SummaryGenerator;

pub(super) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn fixed_clock() -> Clock {
    Arc::new(fixed_now)
}

pub(super) fn vacancy() -> VacancySnapshot {
    VacancySnapshot {
        id: VacancyId("vac-001".to_string()),
        title: "Correctional Officer Grade 1".to_string(),
        reference_number: "DCS/2025/014".to_string(),
        department: "Correctional Services".to_string(),
        province: VacancyProvince::Only("Gauteng".to_string()),
    }
}

/// Degree, "GPA 3.7/4.0", five years, matching province, two of five optional fields.
pub(super) fn application(suffix: &str) -> Application {
    Application {
        id: ApplicationId(format!("app-{suffix}")),
        vacancy: vacancy(),
        applicant_ref: format!("REF-{suffix}"),
        personal: PersonalDetails {
            first_name: "Thandiwe".to_string(),
            last_name: "Mokoena".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1995, 8, 20).expect("valid date"),
            gender: Gender::Female,
            province: "Gauteng".to_string(),
            address: "12 Jacaranda Street, Pretoria".to_string(),
            phone: "+27 82 555 0101".to_string(),
            email: "thandiwe@example.org".to_string(),
            nationality: "South African".to_string(),
        },
        education: Education {
            highest_qualification: QualificationLevel::Degree,
            institution: "University of Pretoria".to_string(),
            year_completed: 2017,
            grade_result: "GPA 3.7/4.0".to_string(),
        },
        experience: WorkExperience {
            years_experience: 5,
            current_employer: String::new(),
            current_position: String::new(),
            work_history: "Five years in offender case management and security operations."
                .to_string(),
        },
        primary_reference: Reference {
            name: "Sipho Ndlovu".to_string(),
            position: "Unit Manager".to_string(),
            phone: "+27 12 555 0199".to_string(),
        },
        secondary_reference: Reference::default(),
        cover_letter: "I am applying for the correctional officer post.".to_string(),
        hr_notes: String::new(),
        status: ApplicationStatus::Submitted,
        total_score: None,
        summary: None,
    }
}

pub(super) fn document(id: &str, application_id: &ApplicationId, path: PathBuf) -> Document {
    let original_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Document {
        id: DocumentId(id.to_string()),
        application_id: application_id.clone(),
        kind: DocumentKind::Cv,
        file: StoredFile {
            path,
            original_name,
        },
        extracted_text: String::new(),
        extraction: None,
        verification: None,
    }
}

/// Write `contents` to `name` inside `dir` and return the path.
pub(super) fn write_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write fixture file");
    path
}

/// OCR engine returning canned text, or failing when built with `failing()`.
#[derive(Default)]
pub(super) struct FakeOcr {
    text: Option<String>,
    calls: AtomicUsize,
}

impl FakeOcr {
    pub(super) fn returning(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn failing() -> Self {
        Self::default()
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl OcrEngine for FakeOcr {
    fn recognize(&self, _image: &Path) -> Result<String, ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.text
            .clone()
            .ok_or_else(|| ExtractionError::ToolNotFound("tesseract".to_string()))
    }
}

/// PDF backend with a canned text layer and a fixed number of rendered pages.
pub(super) struct FakePdf {
    embedded: Option<String>,
    pages: Option<usize>,
    embedded_calls: AtomicUsize,
    raster_calls: AtomicUsize,
}

impl FakePdf {
    pub(super) fn new(embedded: &str, pages: usize) -> Self {
        Self {
            embedded: Some(embedded.to_string()),
            pages: Some(pages),
            embedded_calls: AtomicUsize::new(0),
            raster_calls: AtomicUsize::new(0),
        }
    }

    /// Text layer unreadable and rasterization unavailable.
    pub(super) fn broken() -> Self {
        Self {
            embedded: None,
            pages: None,
            embedded_calls: AtomicUsize::new(0),
            raster_calls: AtomicUsize::new(0),
        }
    }

    /// Text layer readable, rasterization unavailable.
    pub(super) fn without_renderer(embedded: &str) -> Self {
        Self {
            embedded: Some(embedded.to_string()),
            pages: None,
            embedded_calls: AtomicUsize::new(0),
            raster_calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn embedded_calls(&self) -> usize {
        self.embedded_calls.load(Ordering::SeqCst)
    }

    pub(super) fn raster_calls(&self) -> usize {
        self.raster_calls.load(Ordering::SeqCst)
    }
}

impl PdfBackend for FakePdf {
    fn embedded_text(&self, _pdf: &Path) -> Result<String, ExtractionError> {
        self.embedded_calls.fetch_add(1, Ordering::SeqCst);
        self.embedded.clone().ok_or_else(|| ExtractionError::ToolFailed {
            tool: "pdftotext".to_string(),
            detail: "Syntax Error: Couldn't find trailer dictionary".to_string(),
        })
    }

    fn rasterize(
        &self,
        pdf: &Path,
        _dpi: u32,
        max_pages: u32,
        out_dir: &Path,
    ) -> Result<Vec<PathBuf>, ExtractionError> {
        self.raster_calls.fetch_add(1, Ordering::SeqCst);
        let pages = self
            .pages
            .ok_or_else(|| ExtractionError::ToolNotFound("pdftoppm".to_string()))?;
        if pages == 0 {
            return Err(ExtractionError::NoPagesRendered(pdf.to_path_buf()));
        }
        Ok((1..=pages.min(max_pages as usize))
            .map(|page| out_dir.join(format!("page-{page}.png")))
            .collect())
    }
}

pub(super) fn router(ocr: Arc<FakeOcr>, pdf: Arc<FakePdf>) -> ExtractionRouter {
    ExtractionRouter::with_engines(ocr, pdf, PdfFallbackPolicy::default())
}

pub(super) fn processor(
    store: Arc<JsonStore>,
    router: ExtractionRouter,
) -> DocumentProcessor<JsonStore, JsonStore> {
    DocumentProcessor::new(
        store.clone(),
        store,
        router,
        SummaryGenerator::default(),
        ScreeningEngine::new(ScreeningConfig::default()),
    )
    .with_clock(fixed_clock())
}

/// Application repository that reads from a store but refuses every write.
pub(super) struct ReadOnlyApplications {
    pub(super) inner: Arc<JsonStore>,
    pub(super) rejected_writes: Mutex<Vec<ApplicationId>>,
}

impl ReadOnlyApplications {
    pub(super) fn new(inner: Arc<JsonStore>) -> Self {
        Self {
            inner,
            rejected_writes: Mutex::new(Vec::new()),
        }
    }

    fn reject(&self, id: &ApplicationId) -> Result<(), RepositoryError> {
        self.rejected_writes
            .lock()
            .expect("rejected writes mutex poisoned")
            .push(id.clone());
        Err(RepositoryError::Unavailable("read only".to_string()))
    }
}

impl ApplicationRepository for ReadOnlyApplications {
    fn application(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        self.inner.application(id)
    }

    fn applications_for_vacancy(
        &self,
        vacancy: &VacancyId,
    ) -> Result<Vec<Application>, RepositoryError> {
        self.inner.applications_for_vacancy(vacancy)
    }

    fn save_summary(&self, id: &ApplicationId, _summary: String) -> Result<(), RepositoryError> {
        self.reject(id)
    }

    fn save_screening(
        &self,
        id: &ApplicationId,
        _total_score: f64,
        _summary: String,
    ) -> Result<(), RepositoryError> {
        self.reject(id)
    }
}

/// Document repository whose writes always fail.
pub(super) struct UnavailableDocuments {
    pub(super) inner: Arc<JsonStore>,
}

impl DocumentRepository for UnavailableDocuments {
    fn document(&self, id: &DocumentId) -> Result<Option<Document>, RepositoryError> {
        self.inner.document(id)
    }

    fn documents_for(&self, application: &ApplicationId) -> Result<Vec<Document>, RepositoryError> {
        self.inner.documents_for(application)
    }

    fn save_extraction(
        &self,
        _id: &DocumentId,
        _text: String,
        _record: ExtractionRecord,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("disk full".to_string()))
    }
}
