use crate::domain::ports::{Intent, IntentClassifier};

pub const BOOKING_KEYWORDS: &[&str] = &[
    "appointment",
    "book",
    "booking",
    "schedule",
    "consultation",
    "visit",
    "checkup",
];

/// Flags booking intent when any keyword occurs as a case-insensitive substring.
pub struct KeywordIntentClassifier {
    keywords: Vec<String>,
}

impl Default for KeywordIntentClassifier {
    fn default() -> Self {
        Self::new(BOOKING_KEYWORDS.iter().map(|k| k.to_string()).collect())
    }
}

impl KeywordIntentClassifier {
    pub fn new(keywords: Vec<String>) -> Self {
        Self {
            keywords: keywords.into_iter().map(|k| k.to_lowercase()).collect(),
        }
    }
}

impl IntentClassifier for KeywordIntentClassifier {
    fn classify(&self, text: &str) -> Intent {
        let text = text.to_lowercase();
        if self.keywords.iter().any(|k| text.contains(k.as_str())) {
            Intent::Booking
        } else {
            Intent::General
        }
    }
}
