use std::path::Path;
use std::sync::Arc;

use super::tools::OcrEngine;
use super::{ExtractionStage, StageOutcome};

/// Direct OCR over a raster image.
#[derive(Clone)]
pub struct ImageExtractor {
    ocr: Arc<dyn OcrEngine>,
}

impl ImageExtractor {
    pub fn new(ocr: Arc<dyn OcrEngine>) -> Self {
        Self { ocr }
    }

    pub fn extract(&self, path: &Path) -> StageOutcome {
        StageOutcome::from_result(
            ExtractionStage::ImageOcr,
            self.ocr.recognize(path).map(|text| text.trim().to_string()),
        )
    }
}
