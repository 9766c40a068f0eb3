// src/categorizer.rs
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Category {
    Executive,
    Sales,
    Support,
    Hr,
    Technical,
    Marketing,
    Finance,
    General,
    Personal,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Executive => "executive",
            Category::Sales => "sales",
            Category::Support => "support",
            Category::Hr => "hr",
            Category::Technical => "technical",
            Category::Marketing => "marketing",
            Category::Finance => "finance",
            Category::General => "general",
            Category::Personal => "personal",
        }
    }
}

/// Role rules in evaluation order. First group with any fragment hit wins,
/// so the slice order is behaviorally significant — never reorder, and
/// never turn this into a map.
const CATEGORY_RULES: &[(Category, &[&str])] = &[
    (
        Category::Executive,
        &[
            "ceo",
            "president",
            "director",
            "manager",
            "chief",
            "geschaeftsfueh",
            "vorstand",
        ],
    ),
    (
        Category::Sales,
        &["sales", "business", "commercial", "vertrieb", "verkauf"],
    ),
    (
        Category::Support,
        &["support", "help", "service", "kunde", "customer"],
    ),
    (
        Category::Hr,
        &["hr", "personal", "bewerbung", "career", "jobs", "recruiting"],
    ),
    (
        Category::Technical,
        &["tech", "it", "dev", "admin", "webmaster", "engineering"],
    ),
    (
        Category::Marketing,
        &["marketing", "promotion", "pr", "media", "communication"],
    ),
    (
        Category::Finance,
        &["finance", "accounting", "billing", "invoice", "buchhal"],
    ),
    (
        Category::General,
        &["info", "contact", "office", "hello", "kontakt", "mail"],
    ),
];

/// Substring hit, except that one- and two-letter fragments ("it", "hr",
/// "pr") must stand alone between separators so "smith" does not read as
/// IT and "christine" does not read as HR.
fn fragment_hits(local_part: &str, fragment: &str) -> bool {
    if fragment.len() > 2 {
        return local_part.contains(fragment);
    }
    let bytes = local_part.as_bytes();
    let mut start = 0;
    while let Some(offset) = local_part[start..].find(fragment) {
        let begin = start + offset;
        let end = begin + fragment.len();
        let bounded_left = begin == 0 || !bytes[begin - 1].is_ascii_alphanumeric();
        let bounded_right = end == bytes.len() || !bytes[end].is_ascii_alphanumeric();
        if bounded_left && bounded_right {
            return true;
        }
        start = begin + 1;
    }
    false
}

/// Assign one category to an email by its local part.
pub fn categorize_email(email: &str) -> Category {
    let local_part = email.split('@').next().unwrap_or("").to_lowercase();

    for (category, fragments) in CATEGORY_RULES {
        if fragments
            .iter()
            .any(|fragment| fragment_hits(&local_part, fragment))
        {
            return *category;
        }
    }

    // firstname.lastname heuristic, checked only after every role rule
    // has failed.
    let segments: Vec<&str> = local_part.split('.').collect();
    if segments.len() == 2 && segments.iter().all(|s| !s.is_empty()) {
        Category::Personal
    } else {
        Category::General
    }
}

/// Group validated emails by category, keeping only non-empty categories.
/// Emails are sorted within each category for deterministic output.
pub fn categorize<'a, I>(emails: I) -> BTreeMap<Category, Vec<String>>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut categories: BTreeMap<Category, Vec<String>> = BTreeMap::new();
    for email in emails {
        categories
            .entry(categorize_email(email))
            .or_default()
            .push(email.clone());
    }
    for bucket in categories.values_mut() {
        bucket.sort();
    }
    categories
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_rules_apply_in_documented_order() {
        // "sales.hr" hits both the sales and hr groups; sales is checked
        // first and must win.
        assert_eq!(categorize_email("sales.hr@x.com"), Category::Sales);
        // And the symmetric case never reaches the personal fallback.
        assert_eq!(categorize_email("hr.sales@x.com"), Category::Sales);
    }

    #[test]
    fn personal_fallback_for_firstname_lastname() {
        assert_eq!(categorize_email("john.smith@x.com"), Category::Personal);
    }

    #[test]
    fn general_fallback_when_nothing_matches() {
        assert_eq!(categorize_email("zzz@x.com"), Category::General);
        // Trailing dot leaves an empty segment, so not personal.
        assert_eq!(categorize_email("john.@x.com"), Category::General);
        assert_eq!(categorize_email("a.b.c@x.com"), Category::General);
    }

    #[test]
    fn german_role_variants_are_recognized() {
        assert_eq!(categorize_email("vertrieb@acme.de"), Category::Sales);
        assert_eq!(categorize_email("bewerbung@acme.de"), Category::Hr);
        assert_eq!(categorize_email("buchhaltung@acme.de"), Category::Finance);
        assert_eq!(
            categorize_email("geschaeftsfuehrung@acme.de"),
            Category::Executive
        );
    }

    #[test]
    fn executive_outranks_later_groups() {
        // "director" (executive) also contains no other fragment, but
        // "it" appears inside many words; executive is checked first.
        assert_eq!(categorize_email("marketing.director@x.com"), Category::Executive);
    }

    #[test]
    fn short_fragments_need_separators() {
        // "it" buried in a name must not trigger the technical group.
        assert_eq!(categorize_email("keith.white@x.com"), Category::Personal);
        assert_eq!(categorize_email("it@x.com"), Category::Technical);
        assert_eq!(categorize_email("it-helpdesk@x.com"), Category::Support);
        assert_eq!(categorize_email("christine@x.com"), Category::General);
    }

    #[test]
    fn categorize_drops_empty_categories_and_sorts() {
        let emails: Vec<String> = ["info@x.com", "ceo@x.com", "contact@x.com"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let categories = categorize(emails.iter());
        assert_eq!(categories.len(), 2);
        assert_eq!(
            categories.get(&Category::General).unwrap(),
            &vec!["contact@x.com".to_string(), "info@x.com".to_string()]
        );
        assert_eq!(
            categories.get(&Category::Executive).unwrap(),
            &vec!["ceo@x.com".to_string()]
        );
        assert!(!categories.contains_key(&Category::Hr));
    }
}
