use std::cmp::Ordering;

use serde::Serialize;

use super::super::domain::{Application, ApplicationId};

pub const DEFAULT_SHORTLIST_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortlistEntry {
    pub application_id: ApplicationId,
    pub applicant_ref: String,
    pub name: String,
    pub score: f64,
}

/// Read-only ranking of a vacancy's applications by stored score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shortlist {
    pub threshold: f64,
    pub qualified: Vec<ShortlistEntry>,
    pub below_threshold: Vec<ShortlistEntry>,
    pub unscored: Vec<ApplicationId>,
}

impl Shortlist {
    /// Rank scored applications by descending score, ties broken by application id.
    /// The threshold is inclusive.
    pub fn rank<'a, I>(applications: I, threshold: f64) -> Self
    where
        I: IntoIterator<Item = &'a Application>,
    {
        let mut scored = Vec::new();
        let mut unscored = Vec::new();
        for application in applications {
            match application.total_score {
                Some(score) => scored.push(ShortlistEntry {
                    application_id: application.id.clone(),
                    applicant_ref: application.applicant_ref.clone(),
                    name: application.personal.full_name(),
                    score,
                }),
                None => unscored.push(application.id.clone()),
            }
        }

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.application_id.cmp(&b.application_id))
        });
        unscored.sort();

        let (qualified, below_threshold): (Vec<_>, Vec<_>) = scored
            .into_iter()
            .partition(|entry| entry.score >= threshold);

        Self {
            threshold,
            qualified,
            below_threshold,
            unscored,
        }
    }
}
