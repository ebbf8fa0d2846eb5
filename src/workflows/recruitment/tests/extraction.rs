use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use docx_rs::{Docx, Paragraph, Run};

use super::common::*;
use crate::workflows::recruitment::extraction::{
    ExtractionMethod, ExtractionRouter, ExtractionStage, PdfFallbackPolicy,
};

fn text_of_len(len: usize) -> String {
    "x".repeat(len)
}

fn write_docx(path: &Path, paragraphs: &[&str]) {
    let mut docx = Docx::new();
    for text in paragraphs {
        let paragraph = if text.is_empty() {
            Paragraph::new()
        } else {
            Paragraph::new().add_run(Run::new().add_text(*text))
        };
        docx = docx.add_paragraph(paragraph);
    }
    let file = File::create(path).expect("create docx");
    docx.build().pack(file).expect("pack docx");
}

#[test]
fn routes_by_extension_case_insensitively() {
    assert_eq!(
        ExtractionMethod::for_path(Path::new("cv.PDF")),
        ExtractionMethod::Pdf
    );
    assert_eq!(
        ExtractionMethod::for_path(Path::new("scan.JpEg")),
        ExtractionMethod::ImageOcr
    );
    assert_eq!(
        ExtractionMethod::for_path(Path::new("letter.doc")),
        ExtractionMethod::Docx
    );
    assert_eq!(
        ExtractionMethod::for_path(Path::new("notes.txt")),
        ExtractionMethod::Unsupported
    );
    assert_eq!(
        ExtractionMethod::for_path(Path::new("no_extension")),
        ExtractionMethod::Unsupported
    );
}

#[test]
fn unsupported_files_yield_empty_text_without_running_any_stage() {
    let ocr = Arc::new(FakeOcr::returning("never used"));
    let pdf = Arc::new(FakePdf::new("never used", 1));
    let router = router(ocr.clone(), pdf.clone());

    let extraction = router.extract(Path::new("archive.zip"));

    assert_eq!(extraction.text, "");
    assert_eq!(extraction.method, ExtractionMethod::Unsupported);
    assert!(extraction.stages.is_empty());
    assert_eq!(ocr.calls(), 0);
    assert_eq!(pdf.embedded_calls(), 0);
}

#[test]
fn pdf_with_enough_embedded_text_skips_ocr() {
    let ocr = Arc::new(FakeOcr::returning("scanned"));
    let pdf = Arc::new(FakePdf::new(&format!("  {}  ", text_of_len(50)), 3));
    let router = router(ocr.clone(), pdf.clone());

    let extraction = router.extract(Path::new("cv.pdf"));

    assert_eq!(extraction.text, text_of_len(50));
    assert_eq!(extraction.method, ExtractionMethod::Pdf);
    assert_eq!(extraction.stages.len(), 1);
    assert_eq!(pdf.raster_calls(), 0);
    assert_eq!(ocr.calls(), 0);
}

#[test]
fn pdf_below_threshold_falls_back_to_page_ocr() {
    let ocr = Arc::new(FakeOcr::returning("Scanned page"));
    let pdf = Arc::new(FakePdf::new(&text_of_len(49), 2));
    let router = router(ocr.clone(), pdf.clone());

    let extraction = router.extract(Path::new("scan.pdf"));

    assert_eq!(extraction.text, "Scanned page\nScanned page");
    assert_eq!(pdf.raster_calls(), 1);
    assert_eq!(ocr.calls(), 2);
    let stages: Vec<_> = extraction.stages.iter().map(|s| s.stage).collect();
    assert_eq!(
        stages,
        vec![ExtractionStage::EmbeddedText, ExtractionStage::RasterOcr]
    );
}

#[test]
fn page_ocr_is_capped_at_the_configured_page_count() {
    let ocr = Arc::new(FakeOcr::returning("page"));
    let pdf = Arc::new(FakePdf::new("", 15));
    let router = router(ocr.clone(), pdf.clone());

    router.extract(Path::new("long-scan.pdf"));

    assert_eq!(ocr.calls(), PdfFallbackPolicy::default().max_pages as usize);
}

#[test]
fn failed_fallback_keeps_the_embedded_text() {
    let ocr = Arc::new(FakeOcr::returning("unused"));
    let pdf = Arc::new(FakePdf::without_renderer("short text layer"));
    let router = router(ocr.clone(), pdf);

    let extraction = router.extract(Path::new("thin.pdf"));

    assert_eq!(extraction.text, "short text layer");
    assert!(extraction.stages[1].is_failure());
    assert_eq!(ocr.calls(), 0);
}

#[test]
fn unrecognisable_pages_keep_the_embedded_text() {
    let ocr = Arc::new(FakeOcr::failing());
    let pdf = Arc::new(FakePdf::new("tiny", 2));
    let router = router(ocr.clone(), pdf);

    let extraction = router.extract(Path::new("thin.pdf"));

    assert_eq!(extraction.text, "tiny");
    assert_eq!(ocr.calls(), 2);
    assert!(extraction.stages[1].is_failure());
}

#[test]
fn broken_pdf_degrades_to_empty_text_with_diagnostics() {
    let ocr = Arc::new(FakeOcr::returning("unused"));
    let pdf = Arc::new(FakePdf::broken());
    let router = router(ocr, pdf);

    let extraction = router.extract(Path::new("corrupt.pdf"));

    assert_eq!(extraction.text, "");
    assert_eq!(extraction.method, ExtractionMethod::Pdf);
    assert!(extraction.stages.iter().all(|stage| stage.is_failure()));
    assert!(extraction.stages[0]
        .diagnostic
        .as_deref()
        .is_some_and(|message| message.contains("pdftotext")));
}

#[test]
fn image_ocr_text_is_trimmed() {
    let ocr = Arc::new(FakeOcr::returning("\n  NATIONAL IDENTITY CARD \n"));
    let router = router(ocr, Arc::new(FakePdf::new("", 0)));

    let extraction = router.extract(Path::new("id.png"));

    assert_eq!(extraction.text, "NATIONAL IDENTITY CARD");
    assert_eq!(extraction.method, ExtractionMethod::ImageOcr);
}

#[test]
fn image_ocr_failure_is_reported_as_empty_text() {
    let router = router(Arc::new(FakeOcr::failing()), Arc::new(FakePdf::new("", 0)));

    let extraction = router.extract(Path::new("id.tiff"));

    assert_eq!(extraction.text, "");
    assert_eq!(extraction.method, ExtractionMethod::ImageOcr);
    assert!(extraction.stages[0].is_failure());
}

#[test]
fn docx_paragraphs_are_joined_and_blank_ones_skipped() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("cover-letter.docx");
    write_docx(
        &path,
        &["Dear Hiring Manager,", "", "I hold a National Diploma in Policing."],
    );

    let extraction = ExtractionRouter::with_engines(
        Arc::new(FakeOcr::failing()),
        Arc::new(FakePdf::broken()),
        PdfFallbackPolicy::default(),
    )
    .extract(&path);

    assert_eq!(extraction.method, ExtractionMethod::Docx);
    assert_eq!(
        extraction.text,
        "Dear Hiring Manager,\nI hold a National Diploma in Policing."
    );
}

#[test]
fn unreadable_word_document_yields_empty_text() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_file(dir.path(), "legacy.doc", b"\xD0\xCF\x11\xE0 not a zip container");

    let extraction = router(Arc::new(FakeOcr::failing()), Arc::new(FakePdf::broken())).extract(&path);

    assert_eq!(extraction.text, "");
    assert_eq!(extraction.method, ExtractionMethod::Docx);
    assert!(extraction.stages[0].is_failure());
}

#[test]
fn fallback_threshold_counts_characters() {
    let policy = PdfFallbackPolicy::default();
    assert!(policy.needs_ocr(&text_of_len(49)));
    assert!(!policy.needs_ocr(&text_of_len(50)));
    assert!(policy.needs_ocr(&"é".repeat(49)));
}
