use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::extraction::ExtractionMethod;

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for uploaded documents.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub String);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VacancyId(pub String);

impl fmt::Display for VacancyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Province coverage advertised on a vacancy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VacancyProvince {
    All,
    Only(String),
}

impl VacancyProvince {
    pub fn accepts(&self, province: &str) -> bool {
        match self {
            VacancyProvince::All => true,
            VacancyProvince::Only(expected) => expected == province,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            VacancyProvince::All => "All Provinces",
            VacancyProvince::Only(name) => name,
        }
    }
}

impl From<String> for VacancyProvince {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("all") || trimmed.eq_ignore_ascii_case("all provinces") {
            VacancyProvince::All
        } else {
            VacancyProvince::Only(value)
        }
    }
}

impl From<VacancyProvince> for String {
    fn from(value: VacancyProvince) -> Self {
        match value {
            VacancyProvince::All => "All".to_string(),
            VacancyProvince::Only(name) => name,
        }
    }
}

/// The slice of a vacancy the pipeline needs; the vacancy itself is owned elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacancySnapshot {
    pub id: VacancyId,
    pub title: String,
    pub reference_number: String,
    pub department: String,
    pub province: VacancyProvince,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QualificationLevel {
    #[serde(rename = "grade_10")]
    Grade10,
    #[serde(rename = "grade_12")]
    Grade12,
    #[serde(rename = "certificate")]
    Certificate,
    #[serde(rename = "diploma")]
    Diploma,
    #[serde(rename = "degree")]
    Degree,
    #[serde(rename = "postgraduate")]
    Postgraduate,
    /// Any category the intake form did not recognise.
    #[serde(rename = "unknown")]
    #[serde(other)]
    Unknown,
}

impl QualificationLevel {
    pub const fn label(self) -> &'static str {
        match self {
            QualificationLevel::Grade10 => "Grade 10",
            QualificationLevel::Grade12 => "Grade 12",
            QualificationLevel::Certificate => "Certificate",
            QualificationLevel::Diploma => "Diploma",
            QualificationLevel::Degree => "Bachelor's Degree",
            QualificationLevel::Postgraduate => "Postgraduate",
            QualificationLevel::Unknown => "Unspecified",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

/// Workflow state owned by the reviewer tooling; read-only here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Submitted,
    UnderReview,
    Shortlisted,
    InterviewScheduled,
    Interviewed,
    Selected,
    Rejected,
    Withdrawn,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalDetails {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub province: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub nationality: String,
}

impl PersonalDetails {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whole years between the date of birth and `on`.
    pub fn age_on(&self, on: NaiveDate) -> i32 {
        let dob = self.date_of_birth;
        let had_birthday = (on.month(), on.day()) >= (dob.month(), dob.day());
        on.year() - dob.year() - if had_birthday { 0 } else { 1 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
    pub highest_qualification: QualificationLevel,
    pub institution: String,
    pub year_completed: u16,
    /// Free text such as "GPA 3.5/4.0", "Credit", or "Distinction".
    pub grade_result: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkExperience {
    pub years_experience: u32,
    #[serde(default)]
    pub current_employer: String,
    #[serde(default)]
    pub current_position: String,
    #[serde(default)]
    pub work_history: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub name: String,
    pub position: String,
    pub phone: String,
}

impl Reference {
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
    }
}

/// A submitted application. Form fields are never mutated by this crate; only `total_score`
/// and `summary` are written, and always together when screening.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub vacancy: VacancySnapshot,
    pub applicant_ref: String,
    pub personal: PersonalDetails,
    pub education: Education,
    pub experience: WorkExperience,
    pub primary_reference: Reference,
    #[serde(default)]
    pub secondary_reference: Reference,
    #[serde(default)]
    pub cover_letter: String,
    #[serde(default)]
    pub hr_notes: String,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub total_score: Option<f64>,
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Cv,
    CoverLetter,
    NationalId,
    BirthCertificate,
    AcademicTranscript,
    Qualification,
    ReferenceLetter,
    Other,
}

impl DocumentKind {
    pub const fn label(self) -> &'static str {
        match self {
            DocumentKind::Cv => "Curriculum Vitae (CV)",
            DocumentKind::CoverLetter => "Cover Letter",
            DocumentKind::NationalId => "National ID / Passport",
            DocumentKind::BirthCertificate => "Birth Certificate",
            DocumentKind::AcademicTranscript => "Academic Transcript / Results",
            DocumentKind::Qualification => "Qualification / Certificate",
            DocumentKind::ReferenceLetter => "Reference Letter",
            DocumentKind::Other => "Other",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let kind = match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "cv" | "resume" => DocumentKind::Cv,
            "cover_letter" => DocumentKind::CoverLetter,
            "national_id" | "passport" => DocumentKind::NationalId,
            "birth_certificate" => DocumentKind::BirthCertificate,
            "academic_transcript" | "transcript" => DocumentKind::AcademicTranscript,
            "qualification" | "certificate" => DocumentKind::Qualification,
            "reference_letter" => DocumentKind::ReferenceLetter,
            "other" => DocumentKind::Other,
            _ => return None,
        };
        Some(kind)
    }
}

/// Handle to the uploaded bytes on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    pub path: PathBuf,
    pub original_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verification {
    pub verified_by: String,
    pub verified_at: DateTime<Utc>,
}

/// Written next to the extracted text whenever an extraction run completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    pub method: ExtractionMethod,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStatus {
    Unprocessed,
    ProcessedEmpty,
    ProcessedWithText,
}

impl ExtractionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ExtractionStatus::Unprocessed => "unprocessed",
            ExtractionStatus::ProcessedEmpty => "processed, no text",
            ExtractionStatus::ProcessedWithText => "processed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub application_id: ApplicationId,
    pub kind: DocumentKind,
    pub file: StoredFile,
    /// Never null. Empty means either "not yet processed" or "nothing was found".
    #[serde(default)]
    pub extracted_text: String,
    #[serde(default)]
    pub extraction: Option<ExtractionRecord>,
    #[serde(default)]
    pub verification: Option<Verification>,
}

impl Document {
    /// Whether the document still needs a pass through the extractors.
    pub fn needs_extraction(&self) -> bool {
        self.extracted_text.is_empty()
    }

    pub fn extraction_status(&self) -> ExtractionStatus {
        match (&self.extraction, self.extracted_text.is_empty()) {
            (_, false) => ExtractionStatus::ProcessedWithText,
            (Some(_), true) => ExtractionStatus::ProcessedEmpty,
            (None, true) => ExtractionStatus::Unprocessed,
        }
    }
}
