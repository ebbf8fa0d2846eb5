use std::path::Path;

use docx_rs::{DocumentChild, Paragraph, ParagraphChild, RunChild};

use super::{ExtractionError, ExtractionStage, StageOutcome};

/// Paragraph text from an OOXML word-processing container.
///
/// Only body-level paragraphs are read; tables, headers and footers are skipped. Legacy binary
/// `.doc` files fail to parse and degrade to an empty stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxExtractor;

impl DocxExtractor {
    pub fn extract(&self, path: &Path) -> StageOutcome {
        StageOutcome::from_result(ExtractionStage::Paragraphs, read_paragraphs(path))
    }
}

fn read_paragraphs(path: &Path) -> Result<String, ExtractionError> {
    let bytes = std::fs::read(path)?;
    let document =
        docx_rs::read_docx(&bytes).map_err(|err| ExtractionError::Docx(err.to_string()))?;

    let paragraphs: Vec<String> = document
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(paragraph) => Some(paragraph_text(paragraph)),
            _ => None,
        })
        .filter(|text| !text.trim().is_empty())
        .collect();

    Ok(paragraphs.join("\n").trim().to_string())
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    for child in &paragraph.children {
        push_child_text(child, &mut text);
    }
    text
}

fn push_child_text(child: &ParagraphChild, text: &mut String) {
    match child {
        ParagraphChild::Run(run) => {
            for run_child in &run.children {
                match run_child {
                    RunChild::Text(t) => text.push_str(&t.text),
                    RunChild::Tab(_) => text.push('\t'),
                    RunChild::Break(_) => text.push('\n'),
                    _ => {}
                }
            }
        }
        ParagraphChild::Hyperlink(link) => {
            for nested in &link.children {
                push_child_text(nested, text);
            }
        }
        _ => {}
    }
}
