pub mod classifier;
pub mod patterns;

pub use classifier::{ClassifiedPhone, PhoneCategory, PhoneClassifier};
pub use patterns::{extract_emails, extract_phones};
