use serde::{Deserialize, Serialize};

use super::super::domain::QualificationLevel;

/// Share of the 100-point total given to each factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningWeights {
    pub education: f64,
    pub grade: f64,
    pub experience: f64,
    pub location: f64,
    pub completeness: f64,
}

impl Default for ScreeningWeights {
    fn default() -> Self {
        Self {
            education: 30.0,
            grade: 25.0,
            experience: 20.0,
            location: 10.0,
            completeness: 15.0,
        }
    }
}

/// One rung of the grade ladder: any marker found in the lower-cased result awards `points`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeTier {
    pub label: String,
    pub points: f64,
    pub markers: Vec<String>,
}

impl GradeTier {
    pub fn new(label: &str, points: f64, markers: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            points,
            markers: markers.iter().map(|marker| marker.to_string()).collect(),
        }
    }

    pub fn matches(&self, normalized: &str) -> bool {
        self.markers
            .iter()
            .any(|marker| normalized.contains(marker.as_str()))
    }
}

/// Rubric tables for the screening engine. Tiers are evaluated in order; the first hit wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningConfig {
    pub weights: ScreeningWeights,
    pub education_points: Vec<(QualificationLevel, f64)>,
    pub grade_tiers: Vec<GradeTier>,
    pub default_grade_points: f64,
    pub experience_cap_years: u32,
    pub experience_points_per_year: f64,
    /// Points (of 100) when the applicant's province does not match the vacancy.
    pub location_mismatch_points: f64,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            weights: ScreeningWeights::default(),
            education_points: vec![
                (QualificationLevel::Grade10, 10.0),
                (QualificationLevel::Grade12, 20.0),
                (QualificationLevel::Certificate, 60.0),
                (QualificationLevel::Diploma, 75.0),
                (QualificationLevel::Degree, 90.0),
                (QualificationLevel::Postgraduate, 100.0),
            ],
            grade_tiers: vec![
                GradeTier::new(
                    "distinction",
                    100.0,
                    &["distinction", "high distinction", "4.0", "a+"],
                ),
                GradeTier::new("credit", 80.0, &["credit", "merit", "3.5", "3.7", "b+"]),
                GradeTier::new("pass", 60.0, &["pass", "3.0", "b", "c"]),
                GradeTier::new("weak pass", 40.0, &["2.0", "2.5", "d"]),
            ],
            default_grade_points: 50.0,
            experience_cap_years: 10,
            experience_points_per_year: 10.0,
            location_mismatch_points: 60.0,
        }
    }
}

impl ScreeningConfig {
    pub fn education_points_for(&self, level: QualificationLevel) -> f64 {
        self.education_points
            .iter()
            .find(|(candidate, _)| *candidate == level)
            .map(|(_, points)| *points)
            .unwrap_or(0.0)
    }
}
