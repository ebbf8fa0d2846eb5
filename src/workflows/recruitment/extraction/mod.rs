//! Text extraction for uploaded applicant documents.
//!
//! The router picks one extractor by file extension. Every extractor is built from stages that
//! each either yield text or record a diagnostic; no stage failure escapes as an error.

mod docx;
mod image;
mod pdf;
pub mod tools;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::ExtractionConfig;

pub use docx::DocxExtractor;
pub use image::ImageExtractor;
pub use pdf::{PdfExtractor, PdfFallbackPolicy};
pub use tools::{OcrEngine, PdfBackend, Poppler, Tesseract};

/// Errors raised inside a single extraction stage. They are converted into
/// [`StageOutcome`] diagnostics before leaving the extractor.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("external tool not found: {0}")]
    ToolNotFound(String),
    #[error("{tool} failed: {detail}")]
    ToolFailed { tool: String, detail: String },
    #[error("no pages rendered from {}", .0.display())]
    NoPagesRendered(PathBuf),
    #[error("unreadable word-processor document: {0}")]
    Docx(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Extractor actually used for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    Pdf,
    ImageOcr,
    Docx,
    Unsupported,
}

const IMAGE_EXTENSIONS: [&str; 8] = ["jpg", "jpeg", "png", "bmp", "tiff", "tif", "gif", "webp"];
const WORD_EXTENSIONS: [&str; 2] = ["docx", "doc"];

impl ExtractionMethod {
    /// Classify a file by its extension, case-insensitively.
    pub fn for_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if extension == "pdf" {
            ExtractionMethod::Pdf
        } else if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            ExtractionMethod::ImageOcr
        } else if WORD_EXTENSIONS.contains(&extension.as_str()) {
            ExtractionMethod::Docx
        } else {
            ExtractionMethod::Unsupported
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ExtractionMethod::Pdf => "pdf",
            ExtractionMethod::ImageOcr => "image_ocr",
            ExtractionMethod::Docx => "docx",
            ExtractionMethod::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStage {
    EmbeddedText,
    RasterOcr,
    ImageOcr,
    Paragraphs,
}

impl ExtractionStage {
    pub const fn label(self) -> &'static str {
        match self {
            ExtractionStage::EmbeddedText => "embedded_text",
            ExtractionStage::RasterOcr => "raster_ocr",
            ExtractionStage::ImageOcr => "image_ocr",
            ExtractionStage::Paragraphs => "paragraphs",
        }
    }
}

/// What one stage produced. A failed stage carries empty text and a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageOutcome {
    pub stage: ExtractionStage,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

impl StageOutcome {
    pub fn completed(stage: ExtractionStage, text: String) -> Self {
        Self {
            stage,
            text,
            diagnostic: None,
        }
    }

    /// Record a failed stage. The warning is emitted inside the caller's document span.
    pub fn failed(stage: ExtractionStage, error: &ExtractionError) -> Self {
        warn!(stage = stage.label(), %error, "extraction stage produced no text");
        Self {
            stage,
            text: String::new(),
            diagnostic: Some(error.to_string()),
        }
    }

    pub(crate) fn from_result(stage: ExtractionStage, result: Result<String, ExtractionError>) -> Self {
        match result {
            Ok(text) => Self::completed(stage, text),
            Err(error) => Self::failed(stage, &error),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.diagnostic.is_some()
    }
}

/// Final text for a document plus the trail of stages that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction {
    pub text: String,
    pub method: ExtractionMethod,
    pub stages: Vec<StageOutcome>,
}

impl Extraction {
    pub fn unsupported() -> Self {
        Self {
            text: String::new(),
            method: ExtractionMethod::Unsupported,
            stages: Vec::new(),
        }
    }
}

/// Dispatches a file to exactly one extractor by extension.
#[derive(Clone)]
pub struct ExtractionRouter {
    pdf: PdfExtractor,
    image: ImageExtractor,
    docx: DocxExtractor,
}

impl ExtractionRouter {
    pub fn new(pdf: PdfExtractor, image: ImageExtractor, docx: DocxExtractor) -> Self {
        Self { pdf, image, docx }
    }

    /// Share one OCR engine between the PDF fallback and direct image OCR.
    pub fn with_engines(
        ocr: Arc<dyn OcrEngine>,
        pdf_backend: Arc<dyn PdfBackend>,
        policy: PdfFallbackPolicy,
    ) -> Self {
        Self::new(
            PdfExtractor::new(pdf_backend, ocr.clone(), policy),
            ImageExtractor::new(ocr),
            DocxExtractor,
        )
    }

    /// Router wired to the poppler and tesseract binaries named in `config`.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        let ocr: Arc<dyn OcrEngine> = Arc::new(Tesseract::new(
            config.tesseract_binary.clone(),
            config.ocr_language.clone(),
        ));
        let pdf: Arc<dyn PdfBackend> = Arc::new(Poppler::new(
            config.pdftotext_binary.clone(),
            config.pdftoppm_binary.clone(),
        ));
        Self::with_engines(ocr, pdf, PdfFallbackPolicy::from(config))
    }

    pub fn extract(&self, path: &Path) -> Extraction {
        let method = ExtractionMethod::for_path(path);
        let stages = match method {
            ExtractionMethod::Pdf => self.pdf.extract(path),
            ExtractionMethod::ImageOcr => vec![self.image.extract(path)],
            ExtractionMethod::Docx => vec![self.docx.extract(path)],
            ExtractionMethod::Unsupported => return Extraction::unsupported(),
        };

        let text = match method {
            ExtractionMethod::Pdf => pdf::select_text(&stages),
            _ => stages
                .first()
                .map(|stage| stage.text.clone())
                .unwrap_or_default(),
        };

        Extraction {
            text,
            method,
            stages,
        }
    }
}

impl fmt::Debug for ExtractionRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionRouter")
            .field("pdf_policy", self.pdf.policy())
            .finish_non_exhaustive()
    }
}
