use crate::batch::Limits;
use crate::extractor::{extract_emails, extract_phones, PhoneCategory, PhoneClassifier};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

/// What one file contributed. Built once and merged into the aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionResult {
    pub emails: Vec<String>,
    pub phones: Vec<String>,
    pub errors: Vec<String>,
}

impl ExtractionResult {
    pub fn from_text(text: &str) -> Self {
        Self {
            emails: extract_emails(text),
            phones: extract_phones(text),
            errors: Vec::new(),
        }
    }

    pub fn failed<S: Into<String>>(error: S) -> Self {
        Self {
            errors: vec![error.into()],
            ..Self::default()
        }
    }
}

/// Results across a whole batch.
///
/// Emails keep every occurrence in discovery order. Phone categories are
/// deduplicated on normalized digits and iterate in sorted order, so exports
/// are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub emails: Vec<String>,
    pub mobiles: BTreeSet<String>,
    pub landlines: BTreeSet<String>,
    pub invalids: BTreeSet<String>,
    pub errors: Vec<String>,
}

impl AggregateResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge(&mut self, result: ExtractionResult, classifier: &PhoneClassifier) {
        self.emails.extend(result.emails);

        for raw in &result.phones {
            let phone = classifier.classify(raw);
            self.phones_mut(phone.category).insert(phone.normalized_digits);
        }

        self.errors.extend(result.errors);
    }

    pub fn phones(&self, category: PhoneCategory) -> &BTreeSet<String> {
        match category {
            PhoneCategory::Mobile => &self.mobiles,
            PhoneCategory::Landline => &self.landlines,
            PhoneCategory::Invalid => &self.invalids,
        }
    }

    pub fn phones_mut(&mut self, category: PhoneCategory) -> &mut BTreeSet<String> {
        match category {
            PhoneCategory::Mobile => &mut self.mobiles,
            PhoneCategory::Landline => &mut self.landlines,
            PhoneCategory::Invalid => &mut self.invalids,
        }
    }

    pub fn phone_count(&self) -> usize {
        self.mobiles.len() + self.landlines.len() + self.invalids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty() && self.phone_count() == 0 && self.errors.is_empty()
    }

    pub fn counts(&self) -> CategoryCounts {
        CategoryCounts {
            emails: self.emails.len(),
            mobiles: self.mobiles.len(),
            landlines: self.landlines.len(),
            invalid_phones: self.invalids.len(),
            errors: self.errors.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub emails: usize,
    pub mobiles: usize,
    pub landlines: usize,
    pub invalid_phones: usize,
    pub errors: usize,
}

impl CategoryCounts {
    /// Rows in the order the summary table shows them.
    pub fn rows(&self) -> [(&'static str, usize); 5] {
        [
            ("Emails", self.emails),
            ("Mobiles", self.mobiles),
            ("Landlines", self.landlines),
            ("Invalid Phones", self.invalid_phones),
            ("Errors", self.errors),
        ]
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub aggregate: AggregateResult,
    pub per_file_email_counts: BTreeMap<String, usize>,
    pub per_file_phone_counts: BTreeMap<String, usize>,
    pub files_requested: usize,
    pub files_processed: usize,
    pub limits_applied: bool,
    pub cancelled: bool,
    pub duration: Duration,
}

impl BatchOutcome {
    pub fn counts(&self) -> CategoryCounts {
        self.aggregate.counts()
    }

    /// Errors other than the limits notice.
    pub fn has_file_errors(&self) -> bool {
        self.aggregate
            .errors
            .iter()
            .any(|e| !e.starts_with(Limits::NOTICE_PREFIX))
    }
}
