// src/patterns.rs
use serde::Serialize;

/// One named group of guessed addresses. Guesses are never validated and
/// never merged into aggregated results; they are a separate channel the
/// report labels as such.
#[derive(Debug, Clone, Serialize)]
pub struct PatternSet {
    pub group_name: String,
    pub candidates: Vec<String>,
}

impl PatternSet {
    fn build(group_name: &str, locals: &[&str], domain: &str) -> Self {
        Self {
            group_name: group_name.to_string(),
            candidates: locals
                .iter()
                .map(|local| format!("{}@{}", local, domain))
                .collect(),
        }
    }
}

const GERMAN_COUNTRIES: &[&str] = &["germany", "deutschland", "de"];

/// Industry keyword sets in match order; the first hit wins and industries
/// are never composed.
const INDUSTRY_GROUPS: &[(&str, &[&str], &[&str])] = &[
    (
        "Education",
        &["education", "school", "university", "bildung"],
        &["admissions", "registrar", "faculty", "academic", "students"],
    ),
    (
        "Technology",
        &["tech", "technology", "software"],
        &["dev", "tech", "engineering", "product", "api"],
    ),
    (
        "Healthcare",
        &["healthcare", "medical", "hospital"],
        &["appointments", "patients", "medical", "clinic"],
    ),
];

/// Synthesize plausible-but-unverified addresses for a domain. Pure; no
/// I/O, no validation.
pub fn generate(domain: &str, country: &str, industry: &str) -> Vec<PatternSet> {
    let mut sets = vec![
        PatternSet::build(
            "Standard Business",
            &["info", "contact", "hello", "office", "mail", "admin"],
            domain,
        ),
        PatternSet::build(
            "Executive",
            &["ceo", "president", "director", "manager", "leadership"],
            domain,
        ),
        PatternSet::build(
            "Departments",
            &["sales", "marketing", "hr", "support", "finance", "operations"],
            domain,
        ),
    ];

    if GERMAN_COUNTRIES.contains(&country.to_lowercase().as_str()) {
        sets.push(PatternSet::build(
            "German Business",
            &[
                "kontakt",
                "personal",
                "bewerbung",
                "geschaeftsleitung",
                "verwaltung",
                "vertrieb",
            ],
            domain,
        ));
    }

    let industry_lower = industry.to_lowercase();
    if !industry_lower.is_empty() {
        for (group_name, keywords, locals) in INDUSTRY_GROUPS {
            if keywords.iter().any(|keyword| industry_lower.contains(keyword)) {
                sets.push(PatternSet::build(group_name, locals, domain));
                break;
            }
        }
    }

    sets
}
