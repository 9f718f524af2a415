//! Fixed-country phone heuristic.
//!
//! This is not E.164 validation: a ten-digit number starting with 6-9 is a
//! mobile, anything numeric of ten or more digits is a landline, and the rest
//! is invalid. The optional prefix strip assumes a single configured country.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhoneCategory {
    Mobile,
    Landline,
    Invalid,
}

impl PhoneCategory {
    pub fn label(&self) -> &'static str {
        match self {
            PhoneCategory::Mobile => "Mobiles",
            PhoneCategory::Landline => "Landlines",
            PhoneCategory::Invalid => "Invalid Phones",
        }
    }
}

impl fmt::Display for PhoneCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PhoneCategory::Mobile => "mobile",
            PhoneCategory::Landline => "landline",
            PhoneCategory::Invalid => "invalid",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedPhone {
    pub normalized_digits: String,
    pub category: PhoneCategory,
}

#[derive(Debug, Clone)]
pub struct PhoneClassifier {
    strip_country_code: bool,
    country_code: String,
}

impl PhoneClassifier {
    pub const MOBILE_LENGTH: usize = 10;
    pub const MOBILE_LEADING_DIGITS: [char; 4] = ['6', '7', '8', '9'];

    pub fn new<S: Into<String>>(strip_country_code: bool, country_code: S) -> Self {
        Self {
            strip_country_code,
            country_code: country_code.into(),
        }
    }

    pub fn classify(&self, raw: &str) -> ClassifiedPhone {
        let cleaned: String = raw
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
            .collect();

        let digits = if self.strip_country_code && !self.country_code.is_empty() {
            cleaned
                .strip_prefix(self.country_code.as_str())
                .unwrap_or(&cleaned)
        } else {
            cleaned.as_str()
        };

        // Non-numeric leftovers keep the raw match for the export.
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return ClassifiedPhone {
                normalized_digits: raw.to_string(),
                category: PhoneCategory::Invalid,
            };
        }

        let category = if digits.len() == Self::MOBILE_LENGTH
            && digits.starts_with(Self::MOBILE_LEADING_DIGITS)
        {
            PhoneCategory::Mobile
        } else if digits.len() >= Self::MOBILE_LENGTH {
            PhoneCategory::Landline
        } else {
            PhoneCategory::Invalid
        };

        ClassifiedPhone {
            normalized_digits: digits.to_string(),
            category,
        }
    }
}

impl Default for PhoneClassifier {
    fn default() -> Self {
        Self::new(true, "+91")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mobile_with_country_code_stripped() {
        let phone = PhoneClassifier::default().classify("+91 98765 43210");
        assert_eq!(phone.category, PhoneCategory::Mobile);
        assert_eq!(phone.normalized_digits, "9876543210");
    }

    #[test]
    fn test_country_code_kept_when_not_stripping() {
        let phone = PhoneClassifier::new(false, "+91").classify("+91 98765 43210");
        assert_eq!(phone.category, PhoneCategory::Invalid);
        assert_eq!(phone.normalized_digits, "+91 98765 43210");
    }

    #[test]
    fn test_landline() {
        let phone = PhoneClassifier::default().classify("022-12345678");
        assert_eq!(phone.category, PhoneCategory::Landline);
        assert_eq!(phone.normalized_digits, "02212345678");
    }

    #[test]
    fn test_ten_digits_not_starting_with_mobile_digit() {
        let phone = PhoneClassifier::default().classify("(040) 2345 6789");
        assert_eq!(phone.category, PhoneCategory::Landline);
        assert_eq!(phone.normalized_digits, "04023456789");

        let phone = PhoneClassifier::default().classify("5876543210");
        assert_eq!(phone.category, PhoneCategory::Landline);
    }

    #[test]
    fn test_non_numeric_keeps_raw_string() {
        let raw = "98765.43210";
        let phone = PhoneClassifier::default().classify(raw);
        assert_eq!(phone.category, PhoneCategory::Invalid);
        assert_eq!(phone.normalized_digits, raw);
    }

    #[test]
    fn test_short_numeric_keeps_cleaned_string() {
        let phone = PhoneClassifier::default().classify("+91 98765");
        assert_eq!(phone.category, PhoneCategory::Invalid);
        assert_eq!(phone.normalized_digits, "98765");
    }

    #[test]
    fn test_classification_is_deterministic() {
        let classifier = PhoneClassifier::default();
        for raw in ["+91 98765 43210", "022-12345678", "12 34", "+1 (555) 010-9999"] {
            assert_eq!(classifier.classify(raw), classifier.classify(raw));
        }
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(PhoneCategory::Invalid.label(), "Invalid Phones");
        assert_eq!(PhoneCategory::Mobile.to_string(), "mobile");
    }
}
