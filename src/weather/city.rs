use std::sync::OnceLock;

use regex::Regex;

static CITY_PATTERN: OnceLock<Regex> = OnceLock::new();

fn city_pattern() -> &'static Regex {
    CITY_PATTERN.get_or_init(|| {
        // "in <city>" up to a time word, punctuation or end of input.
        Regex::new(r"(?i)in ([A-Za-z ]+?)(?:\s+(?:today|tomorrow|now|right now)|\?|\.|,|!|$)")
            .expect("city pattern is a valid regex")
    })
}

/// Guess the city a question is about, falling back to `default_city`.
pub fn extract_city(question: &str, default_city: &str) -> String {
    city_pattern()
        .captures(question)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|city| !city.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| default_city.to_string())
}
