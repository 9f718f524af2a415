use once_cell::sync::Lazy;
use regex::Regex;

pub const EMAIL_PATTERN: &str = r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b";

/// Loose multi-group numeric pattern. Over-matches on purpose; the
/// classifier decides what is a usable number.
pub const PHONE_PATTERN: &str =
    r"[+]?[0-9]{1,4}?[-.\s(]?[0-9]{1,3}?\)?[-.\s]?[0-9]{1,4}[-.\s]?[0-9]{1,9}";

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(EMAIL_PATTERN).expect("email pattern compiles"));

static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(PHONE_PATTERN).expect("phone pattern compiles"));

/// Email matches verbatim, in order of position.
pub fn extract_emails(text: &str) -> Vec<String> {
    EMAIL_REGEX
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Candidate phone matches verbatim, in order of position. May contain
/// duplicates and fragments of longer numbers.
pub fn extract_phones(text: &str) -> Vec<String> {
    PHONE_REGEX
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}
