use crate::batch::AggregateResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Post-hoc truncation policy for a constrained tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    pub max_files: usize,
    pub max_emails: usize,
    pub max_phones: usize,
}

impl Limits {
    pub const NOTICE_PREFIX: &'static str = "Limits applied";

    pub fn free_tier() -> Self {
        Self {
            max_files: 3,
            max_emails: 100,
            max_phones: 100,
        }
    }

    /// Share of `max_phones` each phone category may keep.
    pub fn per_category_phones(&self) -> usize {
        self.max_phones / 3
    }

    pub fn is_exceeded(&self, aggregate: &AggregateResult, total_files: usize) -> bool {
        total_files > self.max_files
            || aggregate.emails.len() > self.max_emails
            || aggregate.phone_count() > self.max_phones
    }

    /// Truncates every category once any limit is exceeded and appends one
    /// notice to the errors. Returns whether truncation happened.
    pub fn apply(&self, aggregate: &mut AggregateResult, total_files: usize) -> bool {
        if !self.is_exceeded(aggregate, total_files) {
            return false;
        }

        let per_category = self.per_category_phones();
        aggregate.emails.truncate(self.max_emails);
        truncate_set(&mut aggregate.mobiles, per_category);
        truncate_set(&mut aggregate.landlines, per_category);
        truncate_set(&mut aggregate.invalids, per_category);
        aggregate.errors.push(self.notice());

        true
    }

    pub fn notice(&self) -> String {
        format!(
            "{}: {} emails, {} phones, {} files.",
            Self::NOTICE_PREFIX,
            self.max_emails,
            self.max_phones,
            self.max_files
        )
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::free_tier()
    }
}

fn truncate_set(set: &mut BTreeSet<String>, len: usize) {
    if set.len() > len {
        *set = std::mem::take(set).into_iter().take(len).collect();
    }
}
