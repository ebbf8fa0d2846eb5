mod config;
mod rules;
mod shortlist;

pub use config::{GradeTier, ScreeningConfig, ScreeningWeights};
pub use shortlist::{Shortlist, ShortlistEntry, DEFAULT_SHORTLIST_THRESHOLD};

use serde::{Deserialize, Serialize};

use super::domain::{Application, ApplicationId};

/// Stateless scorer that applies the rubric configuration to an application.
#[derive(Debug, Clone, Default)]
pub struct ScreeningEngine {
    config: ScreeningConfig,
}

impl ScreeningEngine {
    pub fn new(config: ScreeningConfig) -> Self {
        Self { config }
    }

    pub fn score(&self, application: &Application) -> ScreeningOutcome {
        let (components, total_score) = rules::score_application(application, &self.config);
        ScreeningOutcome {
            application_id: application.id.clone(),
            total_score,
            components,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    Education,
    Grade,
    Experience,
    Location,
    Completeness,
}

impl ScoreFactor {
    pub const fn label(self) -> &'static str {
        match self {
            ScoreFactor::Education => "education",
            ScoreFactor::Grade => "grade",
            ScoreFactor::Experience => "experience",
            ScoreFactor::Location => "location",
            ScoreFactor::Completeness => "completeness",
        }
    }
}

/// Discrete contribution to a screening score, kept for audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    /// Raw rating on a 0-100 scale before weighting.
    pub points: f64,
    pub weighted: f64,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningOutcome {
    pub application_id: ApplicationId,
    pub total_score: f64,
    pub components: Vec<ScoreComponent>,
}

impl ScreeningOutcome {
    pub fn component(&self, factor: ScoreFactor) -> Option<&ScoreComponent> {
        self.components
            .iter()
            .find(|component| component.factor == factor)
    }
}
