use super::common::*;
use crate::workflows::recruitment::domain::{
    Application, QualificationLevel, Reference, VacancyProvince,
};
use crate::workflows::recruitment::screening::{
    ScoreFactor, ScreeningConfig, ScreeningEngine, Shortlist,
};

fn engine() -> ScreeningEngine {
    ScreeningEngine::new(ScreeningConfig::default())
}

fn weighted(factor: ScoreFactor, application: &Application) -> f64 {
    engine()
        .score(application)
        .component(factor)
        .expect("component present")
        .weighted
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn reference_candidate_scores_seventy_three() {
    let outcome = engine().score(&application("001"));

    assert_eq!(outcome.total_score, 73.0);
    assert_eq!(format!("{:.2}", outcome.total_score), "73.00");
    let factors: Vec<_> = outcome.components.iter().map(|c| c.factor).collect();
    assert_eq!(
        factors,
        vec![
            ScoreFactor::Education,
            ScoreFactor::Grade,
            ScoreFactor::Experience,
            ScoreFactor::Location,
            ScoreFactor::Completeness,
        ]
    );
    let expected = [27.0, 20.0, 10.0, 10.0, 6.0];
    for (component, expected) in outcome.components.iter().zip(expected) {
        assert_close(component.weighted, expected);
    }
}

#[test]
fn education_points_follow_the_qualification_table() {
    let cases = [
        (QualificationLevel::Grade10, 3.0),
        (QualificationLevel::Grade12, 6.0),
        (QualificationLevel::Certificate, 18.0),
        (QualificationLevel::Diploma, 22.5),
        (QualificationLevel::Degree, 27.0),
        (QualificationLevel::Postgraduate, 30.0),
        (QualificationLevel::Unknown, 0.0),
    ];
    for (level, expected) in cases {
        let mut candidate = application("edu");
        candidate.education.highest_qualification = level;
        assert_close(weighted(ScoreFactor::Education, &candidate), expected);
    }
}

#[test]
fn grade_tiers_are_checked_in_priority_order() {
    let cases = [
        ("Distinction with a pass in Afrikaans", 25.0),
        ("High Distinction", 25.0),
        ("GPA 4.0", 25.0),
        ("Credit", 20.0),
        ("Merit", 20.0),
        ("GPA 3.7/4.0", 20.0),
        ("3.5 out of 4.0", 20.0),
        ("Pass", 15.0),
        ("3.0", 15.0),
        ("2.5", 10.0),
        ("average", 12.5),
        ("", 12.5),
    ];
    for (grade, expected) in cases {
        let mut candidate = application("grade");
        candidate.education.grade_result = grade.to_string();
        assert_close(weighted(ScoreFactor::Grade, &candidate), expected);
    }
}

#[test]
fn scale_denominator_alone_does_not_award_distinction() {
    let mut candidate = application("scale");
    candidate.education.grade_result = "4.0/4.0".to_string();
    assert_close(weighted(ScoreFactor::Grade, &candidate), 25.0);

    candidate.education.grade_result = "GPA 2.0 / 4.0".to_string();
    assert_close(weighted(ScoreFactor::Grade, &candidate), 10.0);
}

#[test]
fn experience_saturates_at_ten_years() {
    let mut ten = application("ten");
    ten.experience.years_experience = 10;
    let mut fifteen = application("fifteen");
    fifteen.experience.years_experience = 15;
    let mut none = application("none");
    none.experience.years_experience = 0;

    assert_close(weighted(ScoreFactor::Experience, &ten), 20.0);
    assert_close(weighted(ScoreFactor::Experience, &fifteen), 20.0);
    assert_close(weighted(ScoreFactor::Experience, &none), 0.0);
}

#[test]
fn location_gives_partial_credit_outside_the_vacancy_province() {
    let mut elsewhere = application("kzn");
    elsewhere.personal.province = "KwaZulu-Natal".to_string();
    assert_close(weighted(ScoreFactor::Location, &elsewhere), 6.0);

    elsewhere.vacancy.province = VacancyProvince::All;
    assert_close(weighted(ScoreFactor::Location, &elsewhere), 10.0);
}

#[test]
fn completeness_counts_non_blank_optional_fields() {
    let mut empty = application("empty");
    empty.experience.work_history = "   ".to_string();
    empty.cover_letter = String::new();
    assert_close(weighted(ScoreFactor::Completeness, &empty), 0.0);

    let mut full = application("full");
    full.experience.current_employer = "Department of Correctional Services".to_string();
    full.secondary_reference = Reference {
        name: "Lerato Khumalo".to_string(),
        position: "Shift Supervisor".to_string(),
        phone: "+27 11 555 0123".to_string(),
    };
    assert_close(weighted(ScoreFactor::Completeness, &full), 15.0);
}

#[test]
fn totals_stay_within_bounds() {
    let mut best = application("best");
    best.education.highest_qualification = QualificationLevel::Postgraduate;
    best.education.grade_result = "Distinction".to_string();
    best.experience.years_experience = 25;
    best.experience.current_employer = "DCS".to_string();
    best.secondary_reference = Reference {
        name: "Lerato Khumalo".to_string(),
        position: "Supervisor".to_string(),
        phone: "+27 11 555 0123".to_string(),
    };
    assert_eq!(engine().score(&best).total_score, 100.0);

    let mut worst = application("worst");
    worst.education.highest_qualification = QualificationLevel::Unknown;
    worst.education.grade_result = "2.0".to_string();
    worst.experience.years_experience = 0;
    worst.experience.work_history = String::new();
    worst.cover_letter = String::new();
    worst.personal.province = "Limpopo".to_string();
    let total = engine().score(&worst).total_score;
    assert_eq!(total, 16.0);
    assert!((0.0..=100.0).contains(&total));
}

#[test]
fn totals_are_rounded_to_two_decimals() {
    let mut candidate = application("round");
    candidate.education.highest_qualification = QualificationLevel::Diploma;
    candidate.experience.years_experience = 3;
    let total = engine().score(&candidate).total_score;
    assert_eq!(total, 22.5 + 20.0 + 6.0 + 10.0 + 6.0);
    assert_eq!((total * 100.0).round() / 100.0, total);
}

#[test]
fn shortlist_orders_by_score_with_inclusive_threshold() {
    let mut first = application("003");
    first.total_score = Some(81.5);
    let mut tie_a = application("001");
    tie_a.total_score = Some(50.0);
    let mut tie_b = application("002");
    tie_b.total_score = Some(50.0);
    let mut low = application("004");
    low.total_score = Some(49.99);
    let pending = application("005");

    let shortlist = Shortlist::rank(&[low, pending, tie_b, first, tie_a], 50.0);

    let qualified: Vec<_> = shortlist
        .qualified
        .iter()
        .map(|entry| entry.application_id.0.as_str())
        .collect();
    assert_eq!(qualified, vec!["app-003", "app-001", "app-002"]);
    assert_eq!(shortlist.below_threshold.len(), 1);
    assert_eq!(shortlist.below_threshold[0].application_id.0, "app-004");
    assert_eq!(shortlist.unscored.len(), 1);
    assert_eq!(shortlist.unscored[0].0, "app-005");
    assert_eq!(shortlist.qualified[0].name, "Thandiwe Mokoena");
}
