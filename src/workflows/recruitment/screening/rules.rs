use super::super::domain::Application;
use super::config::ScreeningConfig;
use super::{ScoreComponent, ScoreFactor};

pub(crate) fn score_application(
    application: &Application,
    config: &ScreeningConfig,
) -> (Vec<ScoreComponent>, f64) {
    let weights = &config.weights;
    let components = vec![
        education_component(application, config, weights.education),
        grade_component(application, config, weights.grade),
        experience_component(application, config, weights.experience),
        location_component(application, config, weights.location),
        completeness_component(application, weights.completeness),
    ];

    let total: f64 = components.iter().map(|component| component.weighted).sum();
    (components, round_to_cents(total).clamp(0.0, 100.0))
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn weighted(points: f64, weight: f64) -> f64 {
    (points / 100.0) * weight
}

fn education_component(
    application: &Application,
    config: &ScreeningConfig,
    weight: f64,
) -> ScoreComponent {
    let level = application.education.highest_qualification;
    let points = config.education_points_for(level);
    ScoreComponent {
        factor: ScoreFactor::Education,
        points,
        weighted: weighted(points, weight),
        notes: format!("{} rated {points:.0}/100", level.label()),
    }
}

fn grade_component(
    application: &Application,
    config: &ScreeningConfig,
    weight: f64,
) -> ScoreComponent {
    let normalized = normalize_grade(&application.education.grade_result);
    let tier = config
        .grade_tiers
        .iter()
        .find(|tier| tier.matches(&normalized));

    let (points, notes) = match tier {
        Some(tier) => (
            tier.points,
            format!(
                "'{}' classified as {} tier",
                application.education.grade_result.trim(),
                tier.label
            ),
        ),
        None => (
            config.default_grade_points,
            format!(
                "'{}' matched no grade tier",
                application.education.grade_result.trim()
            ),
        ),
    };

    ScoreComponent {
        factor: ScoreFactor::Grade,
        points,
        weighted: weighted(points, weight),
        notes,
    }
}

/// Lower-case a free-text result and drop grading-scale denominators ("/4.0", "out of 7") so
/// the scale itself is not mistaken for the grade.
pub(crate) fn normalize_grade(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let without_slash = strip_denominators(&lowered, "/");
    strip_denominators(&without_slash, "out of")
}

fn strip_denominators(text: &str, marker: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(position) = rest.find(marker) {
        let after = &rest[position + marker.len()..];
        let candidate = after.trim_start();
        let number_len = candidate
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(candidate.len());

        if candidate.starts_with(|c: char| c.is_ascii_digit()) {
            out.push_str(rest[..position].trim_end());
            rest = &candidate[number_len..];
        } else {
            out.push_str(&rest[..position + marker.len()]);
            rest = after;
        }
    }
    out.push_str(rest);
    out
}

fn experience_component(
    application: &Application,
    config: &ScreeningConfig,
    weight: f64,
) -> ScoreComponent {
    let years = application.experience.years_experience;
    let capped = years.min(config.experience_cap_years);
    let points = (f64::from(capped) * config.experience_points_per_year).min(100.0);
    ScoreComponent {
        factor: ScoreFactor::Experience,
        points,
        weighted: weighted(points, weight),
        notes: format!("{years} year(s) of experience, {capped} counted"),
    }
}

fn location_component(
    application: &Application,
    config: &ScreeningConfig,
    weight: f64,
) -> ScoreComponent {
    let province = &application.personal.province;
    let matches = application.vacancy.province.accepts(province);
    let points = if matches {
        100.0
    } else {
        config.location_mismatch_points
    };
    let notes = if matches {
        format!("{province} eligible for {}", application.vacancy.province.label())
    } else {
        format!(
            "{province} outside vacancy province {}",
            application.vacancy.province.label()
        )
    };
    ScoreComponent {
        factor: ScoreFactor::Location,
        points,
        weighted: weighted(points, weight),
        notes,
    }
}

fn optional_fields(application: &Application) -> [&str; 5] {
    [
        &application.experience.work_history,
        &application.cover_letter,
        &application.experience.current_employer,
        &application.secondary_reference.name,
        &application.secondary_reference.phone,
    ]
}

fn completeness_component(application: &Application, weight: f64) -> ScoreComponent {
    let fields = optional_fields(application);
    let filled = fields
        .iter()
        .filter(|field| !field.trim().is_empty())
        .count();
    let points = (filled as f64 / fields.len() as f64) * 100.0;
    ScoreComponent {
        factor: ScoreFactor::Completeness,
        points,
        weighted: weighted(points, weight),
        notes: format!("{filled} of {} optional fields completed", fields.len()),
    }
}
