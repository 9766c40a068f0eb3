// src/extractor/normalizer.rs
use scraper::{ElementRef, Html, Node, Selector};

/// Boilerplate containers whose text inflates false-positive phone matches
/// (copyright years, CSS, menu labels) and never carries real contacts.
const SKIPPED_TAGS: &[&str] = &[
    "script", "style", "nav", "footer", "header", "aside", "noscript",
];

/// Output of one page: collapsed content text for the pattern engine plus
/// the structured out-of-band candidates that bypass it.
#[derive(Debug, Default)]
pub struct NormalizedPage {
    pub text: String,
    /// From mailto: links and JSON-LD `email` fields. Still validated.
    pub emails: Vec<String>,
    /// From tel: links and JSON-LD `telephone` fields. Still digit-floored.
    pub phones: Vec<String>,
}

pub fn normalize(html: &str) -> NormalizedPage {
    let document = Html::parse_document(html);

    let mut raw_text = String::new();
    collect_text(document.root_element(), &mut raw_text);
    let text = raw_text.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut page = NormalizedPage {
        text,
        ..Default::default()
    };
    collect_link_targets(&document, &mut page);
    collect_structured_data(&document, &mut page);
    page
}

fn collect_text(element: ElementRef, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                out.push_str(text);
                out.push(' ');
            }
            Node::Element(el) if !SKIPPED_TAGS.contains(&el.name()) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, out);
                }
            }
            _ => {}
        }
    }
}

fn collect_link_targets(document: &Html, page: &mut NormalizedPage) {
    let link_selector = Selector::parse("a[href]").unwrap();
    for element in document.select(&link_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if let Some(target) = href.strip_prefix("mailto:") {
            // Drop any ?subject=... tail.
            let email = target.split('?').next().unwrap_or_default().trim();
            if !email.is_empty() {
                page.emails.push(email.to_lowercase());
            }
        } else if let Some(target) = href.strip_prefix("tel:") {
            let phone = target.trim();
            if !phone.is_empty() {
                page.phones.push(phone.to_string());
            }
        }
    }
}

fn collect_structured_data(document: &Html, page: &mut NormalizedPage) {
    let script_selector = Selector::parse(r#"script[type="application/ld+json"]"#).unwrap();
    for script in document.select(&script_selector) {
        let raw = script.text().collect::<String>();
        // Malformed JSON-LD is skipped, never an error.
        let Ok(value) = serde_json::from_str::<serde_json::Value>(&raw) else {
            continue;
        };
        if let Some(object) = value.as_object() {
            if let Some(email) = object.get("email").and_then(|v| v.as_str()) {
                page.emails.push(email.to_lowercase());
            }
            if let Some(phone) = object.get("telephone").and_then(|v| v.as_str()) {
                page.phones.push(phone.to_string());
            }
        }
    }
}
