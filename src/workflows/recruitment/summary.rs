//! Plain-text reviewer report combining form answers with extracted document text.

use chrono::{DateTime, Utc};

use super::domain::{Application, Document, Reference};
use super::keywords::{word_count, KeywordCatalog};

const RULE_WIDTH: usize = 60;
const WORK_HISTORY_CAP: usize = 300;
const COVER_LETTER_CAP: usize = 400;
const PREVIEW_CAP: usize = 250;
const MAX_KEYWORDS: usize = 10;

/// Reviewer-facing rating derived from the total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Excellent,
    Good,
    Average,
    BelowAverage,
}

impl ScoreBand {
    pub fn for_score(score: f64) -> Self {
        if score >= 80.0 {
            ScoreBand::Excellent
        } else if score >= 65.0 {
            ScoreBand::Good
        } else if score >= 50.0 {
            ScoreBand::Average
        } else {
            ScoreBand::BelowAverage
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "EXCELLENT — Strongly recommended for interview",
            ScoreBand::Good => "GOOD — Recommended for shortlisting",
            ScoreBand::Average => "AVERAGE — Consider based on vacancy demand",
            ScoreBand::BelowAverage => "BELOW AVERAGE — Review carefully before shortlisting",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SummaryGenerator {
    catalog: KeywordCatalog,
}

impl SummaryGenerator {
    pub fn new(catalog: KeywordCatalog) -> Self {
        Self { catalog }
    }

    /// Render the report. `documents` are shown in the order given; `generated_at` drives both
    /// the footer timestamp and the applicant's age.
    pub fn render(
        &self,
        application: &Application,
        documents: &[Document],
        generated_at: DateTime<Utc>,
    ) -> String {
        let rule = "─".repeat(RULE_WIDTH);
        let mut lines: Vec<String> = Vec::new();

        lines.push(format!("APPLICATION SUMMARY — #{}", application.id));
        lines.push(rule.clone());

        let personal = &application.personal;
        lines.push("PERSONAL DETAILS".to_string());
        lines.push(format!("  Name          : {}", personal.full_name()));
        lines.push(format!("  Gender        : {}", personal.gender.label()));
        lines.push(format!(
            "  Age           : {} years",
            personal.age_on(generated_at.date_naive())
        ));
        lines.push(format!("  Province      : {}", personal.province));
        lines.push(format!("  Nationality   : {}", personal.nationality));
        lines.push(format!(
            "  Contact       : {} | {}",
            personal.phone, personal.email
        ));
        lines.push(String::new());

        let vacancy = &application.vacancy;
        lines.push("POSITION APPLIED FOR".to_string());
        lines.push(format!("  Vacancy       : {}", vacancy.title));
        lines.push(format!("  Reference     : {}", vacancy.reference_number));
        lines.push(format!("  Department    : {}", vacancy.department));
        lines.push(format!("  Province      : {}", vacancy.province.label()));
        lines.push(String::new());

        let education = &application.education;
        lines.push("EDUCATION".to_string());
        lines.push(format!(
            "  Qualification : {}",
            education.highest_qualification.label()
        ));
        lines.push(format!("  Institution   : {}", education.institution));
        lines.push(format!("  Year          : {}", education.year_completed));
        lines.push(format!("  Result/Grade  : {}", education.grade_result));
        lines.push(String::new());

        let experience = &application.experience;
        lines.push("WORK EXPERIENCE".to_string());
        lines.push(format!("  Years         : {}", experience.years_experience));
        if !experience.current_employer.trim().is_empty() {
            lines.push(format!(
                "  Current Employer: {}",
                experience.current_employer
            ));
        }
        if !experience.current_position.trim().is_empty() {
            lines.push(format!(
                "  Current Position: {}",
                experience.current_position
            ));
        }
        if !experience.work_history.trim().is_empty() {
            lines.push(format!(
                "  History       : {}",
                truncate(&experience.work_history, WORK_HISTORY_CAP)
            ));
        }
        lines.push(String::new());

        if !application.cover_letter.trim().is_empty() {
            lines.push("COVER LETTER (EXCERPT)".to_string());
            lines.push(format!(
                "  {}",
                truncate(&application.cover_letter, COVER_LETTER_CAP)
            ));
            lines.push(String::new());
        }

        lines.push("REFERENCES".to_string());
        lines.push(reference_line(1, &application.primary_reference));
        if !application.secondary_reference.is_blank() {
            lines.push(reference_line(2, &application.secondary_reference));
        }
        lines.push(String::new());

        if !documents.is_empty() {
            lines.push("UPLOADED DOCUMENTS & OCR ANALYSIS".to_string());
            for document in documents {
                self.push_document(&mut lines, document);
            }
        }

        lines.push("AUTOMATED SCREENING SCORE".to_string());
        match application.total_score {
            Some(score) => {
                lines.push(format!("  Total Score   : {score:.2}/100"));
                lines.push(format!(
                    "  Rating        : {}",
                    ScoreBand::for_score(score).label()
                ));
            }
            None => lines.push("  Score not yet computed — run auto-screening.".to_string()),
        }
        lines.push(String::new());

        if !application.hr_notes.trim().is_empty() {
            lines.push("HR NOTES".to_string());
            lines.push(format!("  {}", application.hr_notes));
            lines.push(String::new());
        }

        lines.push(rule);
        lines.push(format!(
            "Summary generated on {}",
            generated_at.format("%d %B %Y, %H:%M")
        ));

        lines.join("\n")
    }

    fn push_document(&self, lines: &mut Vec<String>, document: &Document) {
        lines.push(format!(
            "  [{}] {}",
            document.kind.label(),
            document.file.original_name
        ));
        if document.extracted_text.is_empty() {
            lines.push("    → No OCR text extracted".to_string());
        } else {
            let text = &document.extracted_text;
            lines.push(format!(
                "    → {} words extracted via OCR",
                word_count(text)
            ));
            let keywords = self.catalog.detect(text);
            if !keywords.is_empty() {
                let shown: Vec<&str> = keywords
                    .iter()
                    .take(MAX_KEYWORDS)
                    .map(String::as_str)
                    .collect();
                lines.push(format!("    → Key terms found: {}", shown.join(", ")));
            }
            lines.push(format!("    → Preview: {}", truncate(text, PREVIEW_CAP)));
        }
        lines.push(String::new());
    }
}

fn reference_line(position: u8, reference: &Reference) -> String {
    format!(
        "  {position}. {} — {} ({})",
        reference.name, reference.position, reference.phone
    )
}

/// Cut `text` to at most `cap` characters, back off to the last space and append `…`.
/// Text within the cap is returned unchanged.
pub fn truncate(text: &str, cap: usize) -> String {
    if text.chars().count() <= cap {
        return text.to_string();
    }
    let head: String = text.chars().take(cap).collect();
    let kept = match head.rsplit_once(' ') {
        Some((before, _)) => before,
        None => head.as_str(),
    };
    format!("{kept}…")
}
