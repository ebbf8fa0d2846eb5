//! Thin wrappers around the external binaries the extractors shell out to.
//!
//! `pdftotext` and `pdftoppm` come from poppler-utils, `tesseract` from tesseract-ocr. Both
//! seams are traits so the extractors can be exercised without the binaries installed.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use super::ExtractionError;
use crate::config::ExtractionConfig;

/// Optical character recognition over a single raster image.
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image: &Path) -> Result<String, ExtractionError>;
}

/// PDF access: the embedded text layer and page rasterization.
pub trait PdfBackend: Send + Sync {
    /// All pages of the embedded text layer, newline separated.
    fn embedded_text(&self, pdf: &Path) -> Result<String, ExtractionError>;

    /// Render pages `1..=max_pages` at `dpi` into `out_dir`, returning image paths in page order.
    fn rasterize(
        &self,
        pdf: &Path,
        dpi: u32,
        max_pages: u32,
        out_dir: &Path,
    ) -> Result<Vec<PathBuf>, ExtractionError>;
}

fn handle_output(
    result: std::io::Result<Output>,
    tool: &str,
) -> Result<Output, ExtractionError> {
    match result {
        Ok(output) if output.status.success() => Ok(output),
        Ok(output) => Err(ExtractionError::ToolFailed {
            tool: tool.to_string(),
            detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            Err(ExtractionError::ToolNotFound(tool.to_string()))
        }
        Err(err) => Err(ExtractionError::Io(err)),
    }
}

/// Tesseract CLI invoked as `tesseract <image> stdout -l <lang>`.
#[derive(Debug, Clone)]
pub struct Tesseract {
    binary: String,
    language: String,
}

impl Tesseract {
    pub fn new(binary: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            language: language.into(),
        }
    }
}

impl Default for Tesseract {
    fn default() -> Self {
        Self::new("tesseract", "eng")
    }
}

impl OcrEngine for Tesseract {
    fn recognize(&self, image: &Path) -> Result<String, ExtractionError> {
        let output = Command::new(&self.binary)
            .arg(image)
            .arg("stdout")
            .args(["-l", self.language.as_str()])
            .output();

        let output = handle_output(output, &self.binary)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Poppler utilities: `pdftotext` for the text layer, `pdftoppm` for rasterizing.
#[derive(Debug, Clone)]
pub struct Poppler {
    pdftotext: String,
    pdftoppm: String,
}

impl Poppler {
    pub fn new(pdftotext: impl Into<String>, pdftoppm: impl Into<String>) -> Self {
        Self {
            pdftotext: pdftotext.into(),
            pdftoppm: pdftoppm.into(),
        }
    }
}

impl Default for Poppler {
    fn default() -> Self {
        Self::new("pdftotext", "pdftoppm")
    }
}

impl PdfBackend for Poppler {
    fn embedded_text(&self, pdf: &Path) -> Result<String, ExtractionError> {
        let output = Command::new(&self.pdftotext)
            .args(["-enc", "UTF-8"])
            .arg(pdf)
            .arg("-")
            .output();

        let output = handle_output(output, &self.pdftotext)?;
        let raw = String::from_utf8_lossy(&output.stdout);
        // pdftotext ends every page with a form feed.
        let pages: Vec<&str> = raw
            .split('\u{c}')
            .map(str::trim_end)
            .filter(|page| !page.is_empty())
            .collect();
        Ok(pages.join("\n"))
    }

    fn rasterize(
        &self,
        pdf: &Path,
        dpi: u32,
        max_pages: u32,
        out_dir: &Path,
    ) -> Result<Vec<PathBuf>, ExtractionError> {
        let dpi = dpi.to_string();
        let last_page = max_pages.to_string();
        let output = Command::new(&self.pdftoppm)
            .args([
                "-png",
                "-r",
                dpi.as_str(),
                "-f",
                "1",
                "-l",
                last_page.as_str(),
            ])
            .arg(pdf)
            .arg(out_dir.join("page"))
            .output();
        handle_output(output, &self.pdftoppm)?;

        // pdftoppm zero-pads page numbers to a common width, so a lexical sort is page order.
        let mut images: Vec<PathBuf> = std::fs::read_dir(out_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().map(|ext| ext == "png").unwrap_or(false))
            .collect();
        images.sort();

        if images.is_empty() {
            return Err(ExtractionError::NoPagesRendered(pdf.to_path_buf()));
        }
        Ok(images)
    }
}

/// Whether each configured binary resolves on `PATH`.
pub fn tool_availability(config: &ExtractionConfig) -> Vec<(String, bool)> {
    [
        &config.pdftotext_binary,
        &config.pdftoppm_binary,
        &config.tesseract_binary,
    ]
    .into_iter()
    .map(|binary| (binary.clone(), which::which(binary).is_ok()))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_binary_reports_tool_not_found() {
        let engine = Tesseract::new("recruit-intake-no-such-ocr-binary", "eng");
        match engine.recognize(Path::new("scan.png")) {
            Err(ExtractionError::ToolNotFound(tool)) => {
                assert_eq!(tool, "recruit-intake-no-such-ocr-binary")
            }
            other => panic!("expected missing tool, got {other:?}"),
        }
    }

    #[test]
    fn availability_lists_every_configured_binary() {
        let config = ExtractionConfig {
            tesseract_binary: "recruit-intake-missing-tesseract".to_string(),
            ..ExtractionConfig::default()
        };
        let tools = tool_availability(&config);
        assert_eq!(tools.len(), 3);
        assert!(tools
            .iter()
            .any(|(name, found)| name == "recruit-intake-missing-tesseract" && !found));
    }
}
