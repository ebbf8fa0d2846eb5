use std::collections::BTreeSet;

/// Qualification markers looked for in extracted text.
pub const QUALIFICATION_TERMS: &[&str] = &[
    "bachelor",
    "degree",
    "diploma",
    "certificate",
    "master",
    "phd",
    "grade 12",
    "grade 10",
    "form 6",
    "form 4",
    "postgraduate",
];

/// Skill and domain words looked for in extracted text.
pub const SKILL_TERMS: &[&str] = &[
    "management",
    "leadership",
    "communication",
    "teamwork",
    "microsoft office",
    "excel",
    "word",
    "powerpoint",
    "accounting",
    "finance",
    "law",
    "legal",
    "nursing",
    "health",
    "engineering",
    "it",
    "information technology",
    "correctional",
    "security",
    "administration",
    "procurement",
    "audit",
];

/// Curated term lists matched by plain substring containment against lower-cased text.
///
/// Short terms such as "it" or "law" match inside longer words ("submit", "lawn"); that is the
/// intended recall-over-precision trade for a reviewer hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordCatalog {
    qualifications: Vec<String>,
    skills: Vec<String>,
}

impl Default for KeywordCatalog {
    fn default() -> Self {
        Self::new(QUALIFICATION_TERMS, SKILL_TERMS)
    }
}

impl KeywordCatalog {
    pub fn new(qualifications: &[&str], skills: &[&str]) -> Self {
        let normalize = |terms: &[&str]| {
            terms
                .iter()
                .map(|term| term.trim().to_lowercase())
                .filter(|term| !term.is_empty())
                .collect()
        };
        Self {
            qualifications: normalize(qualifications),
            skills: normalize(skills),
        }
    }

    /// Title-cased terms found in `text`, deduplicated and in sorted order.
    pub fn detect(&self, text: &str) -> Vec<String> {
        let haystack = text.to_lowercase();
        self.qualifications
            .iter()
            .chain(self.skills.iter())
            .filter(|term| haystack.contains(term.as_str()))
            .map(|term| title_case(term))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Upper-case the first letter of every alphabetic run and lower-case the rest.
pub fn title_case(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    let mut previous_is_letter = false;
    for ch in term.chars() {
        if ch.is_alphabetic() {
            if previous_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(ch);
            previous_is_letter = false;
        }
    }
    out
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
