use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;
use tracing::{debug, warn};

use super::tools::{OcrEngine, PdfBackend};
use super::{ExtractionError, ExtractionStage, StageOutcome};
use crate::config::ExtractionConfig;

/// When and how the OCR fallback runs for PDFs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdfFallbackPolicy {
    /// Embedded text with fewer characters than this (after trimming) is treated as unusable.
    pub min_embedded_chars: usize,
    pub raster_dpi: u32,
    pub max_pages: u32,
}

impl Default for PdfFallbackPolicy {
    fn default() -> Self {
        Self {
            min_embedded_chars: 50,
            raster_dpi: 200,
            max_pages: 10,
        }
    }
}

impl From<&ExtractionConfig> for PdfFallbackPolicy {
    fn from(config: &ExtractionConfig) -> Self {
        Self {
            min_embedded_chars: config.min_embedded_chars,
            raster_dpi: config.raster_dpi,
            max_pages: config.max_raster_pages,
        }
    }
}

impl PdfFallbackPolicy {
    pub fn needs_ocr(&self, embedded: &str) -> bool {
        embedded.chars().count() < self.min_embedded_chars
    }
}

/// Two-tier PDF extraction: text layer first, rasterize-and-OCR when it is too thin.
#[derive(Clone)]
pub struct PdfExtractor {
    backend: Arc<dyn PdfBackend>,
    ocr: Arc<dyn OcrEngine>,
    policy: PdfFallbackPolicy,
}

impl PdfExtractor {
    pub fn new(
        backend: Arc<dyn PdfBackend>,
        ocr: Arc<dyn OcrEngine>,
        policy: PdfFallbackPolicy,
    ) -> Self {
        Self {
            backend,
            ocr,
            policy,
        }
    }

    pub fn policy(&self) -> &PdfFallbackPolicy {
        &self.policy
    }

    /// Returns the embedded-text stage and, when the fallback ran, the raster OCR stage.
    pub fn extract(&self, path: &Path) -> Vec<StageOutcome> {
        let embedded = StageOutcome::from_result(
            ExtractionStage::EmbeddedText,
            self.backend
                .embedded_text(path)
                .map(|text| text.trim().to_string()),
        );

        if !self.policy.needs_ocr(&embedded.text) {
            return vec![embedded];
        }

        debug!(
            chars = embedded.text.chars().count(),
            threshold = self.policy.min_embedded_chars,
            "embedded text below threshold, rasterizing for OCR"
        );
        let raster = StageOutcome::from_result(ExtractionStage::RasterOcr, self.raster_ocr(path));
        vec![embedded, raster]
    }

    fn raster_ocr(&self, path: &Path) -> Result<String, ExtractionError> {
        let workdir = TempDir::new()?;
        let pages = self.backend.rasterize(
            path,
            self.policy.raster_dpi,
            self.policy.max_pages,
            workdir.path(),
        )?;

        let mut texts = Vec::with_capacity(pages.len());
        for (index, page) in pages.iter().take(self.policy.max_pages as usize).enumerate() {
            match self.ocr.recognize(page) {
                Ok(text) => texts.push(text),
                Err(error) => warn!(page = index + 1, %error, "OCR failed for rendered page"),
            }
        }

        // A run where no page was recognised keeps the text layer instead.
        if texts.is_empty() {
            return Err(ExtractionError::ToolFailed {
                tool: "ocr".to_string(),
                detail: format!("none of {} rendered page(s) could be recognised", pages.len()),
            });
        }

        Ok(texts.join("\n").trim().to_string())
    }
}

/// The raster stage wins whenever it ran to completion; otherwise keep the text layer.
pub(super) fn select_text(stages: &[StageOutcome]) -> String {
    match stages {
        [_, raster] if !raster.is_failure() => raster.text.clone(),
        [embedded, ..] => embedded.text.clone(),
        [] => String::new(),
    }
}
