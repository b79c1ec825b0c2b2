use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use regex::Regex;
use std::sync::LazyLock;

const PREFERRED_TIME_FORMAT: &str = "%Y-%m-%d at %H:%M";

// chrono's parser tolerates unpadded fields and signed years; the literal shape is checked first
static PREFERRED_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2} at \d{2}:\d{2}$").unwrap());

/// Converts visitor-entered preferred times from the clinic's zone to UTC.
#[derive(Debug, Clone, Copy)]
pub struct TimeNormalizer {
    tz: Tz,
}

impl TimeNormalizer {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// `None` when the text is not `YYYY-MM-DD at HH:MM`, names an impossible date,
    /// or falls in a DST gap. Ambiguous wall times resolve to the earlier instant.
    pub fn normalize(&self, text: &str) -> Option<DateTime<Utc>> {
        let text = text.trim();
        if !PREFERRED_TIME_RE.is_match(text) {
            return None;
        }
        let naive = NaiveDateTime::parse_from_str(text, PREFERRED_TIME_FORMAT).ok()?;
        self.tz
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    }
}
